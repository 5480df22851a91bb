//! # Error Types for the Navigable Tree Map
//!
//! This module defines the errors reported by the map, its range views and
//! its cursors.
//!
//! ## Error Handling Strategy
//!
//! The map has no transient failure modes: there is no I/O and no lock
//! contention. Every error is a deterministic contract violation that the
//! caller could have detected before making the call, so nothing is retried
//! internally and every error is surfaced immediately.
//!
//! Absence is not an error. Lookups and navigation queries that find nothing
//! return `None`; only the accessors that promise an element (`first_key`,
//! `last_key`) report [`Error::NoSuchElement`].
//!
//! ## Error Flow
//!
//! ```text
//! view.insert(key, value)
//!      │
//!      ▼
//! key within view bounds? ──── no ───► Err(KeyOutOfRange)
//!      │
//!      ▼ (yes)
//! engine insert + rebalance
//!      │
//!      ▼
//! Ok(previous value)
//! ```

use thiserror::Error;

/// Errors that can occur during map, view and cursor operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// An element was requested from an empty map or view.
	///
	/// Returned by `first_key`/`last_key` and their key-set counterparts.
	/// The `poll_*` and navigation methods never return this; they report
	/// absence with `None`.
	#[error("no such element")]
	NoSuchElement,

	/// A key lies outside the bounds of a range view.
	///
	/// This error occurs when:
	/// - Inserting or accumulating through a view with a key it cannot hold
	/// - Requesting a sub-view whose bounds leave the parent view's range
	///
	/// Lookups and removals with an out-of-range key do not fail; the key
	/// simply does not belong to the view.
	#[error("key out of range")]
	KeyOutOfRange,

	/// A range was requested whose start lies after its end.
	#[error("range start is greater than range end")]
	InvalidRange,

	/// A cursor was asked to act on its last returned element when there is
	/// none.
	///
	/// This error occurs when:
	/// - `remove` is called before the first `next`/`prev`
	/// - `remove` is called twice without an intervening `next`/`prev`
	#[error("cursor is not positioned on an element")]
	IllegalState,

	/// The operation is not supported by this view.
	///
	/// Key, value and entry views are read/remove-only: a key cannot be added
	/// without a value.
	#[error("operation not supported by this view")]
	Unsupported,
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;
