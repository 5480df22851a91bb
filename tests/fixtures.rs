//! # Fixture-Based Tests for the Navigable Tree Map
//!
//! This module replays scenarios stored as JSON under `tests/fixtures/`.
//! Each scenario names an initial set of entries, a list of steps with their
//! expected outcomes and the entries expected at the end. Every scenario is
//! replayed against both balancing strategies.

use navtree::{Avl, Balance, RedBlack, TreeMap};
use serde::Deserialize;

// ===========================================================================
// Fixture Format
// ===========================================================================

#[derive(Deserialize, Debug)]
struct Scenario {
	name: String,
	initial: Vec<(i64, i64)>,
	steps: Vec<Step>,
	#[serde(rename = "final")]
	expected: Vec<(i64, i64)>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
	Insert {
		key: i64,
		value: i64,
		expect: Option<i64>,
	},
	Remove {
		key: i64,
		expect: Option<i64>,
	},
	Get {
		key: i64,
		expect: Option<i64>,
	},
	Lower {
		key: i64,
		expect: Option<i64>,
	},
	Floor {
		key: i64,
		expect: Option<i64>,
	},
	Ceiling {
		key: i64,
		expect: Option<i64>,
	},
	Higher {
		key: i64,
		expect: Option<i64>,
	},
	AddTo {
		key: i64,
		delta: i64,
		expect: i64,
	},
	SubFrom {
		key: i64,
		delta: i64,
		expect: i64,
	},
	SubMap {
		from: i64,
		from_inclusive: bool,
		to: i64,
		to_inclusive: bool,
		#[serde(default)]
		keys: Vec<i64>,
		error: Option<String>,
	},
	SubMapInsert {
		from: i64,
		from_inclusive: bool,
		to: i64,
		to_inclusive: bool,
		key: i64,
		value: i64,
		error: Option<String>,
	},
	SubMapClear {
		from: i64,
		from_inclusive: bool,
		to: i64,
		to_inclusive: bool,
	},
	HeadMap {
		to: i64,
		inclusive: bool,
		keys: Vec<i64>,
	},
	TailMap {
		from: i64,
		inclusive: bool,
		keys: Vec<i64>,
	},
	Descending {
		keys: Vec<i64>,
	},
	CursorRemove {
		at: i64,
		next: Option<i64>,
	},
}

fn load(json: &str) -> Vec<Scenario> {
	serde_json::from_str(json).expect("fixture should parse")
}

// ===========================================================================
// Replay
// ===========================================================================

fn error_name<T>(result: navtree::Result<T>) -> Option<String> {
	result.err().map(|e| format!("{:?}", e))
}

fn replay<B: Balance>(scenario: &Scenario) {
	let name = &scenario.name;
	let mut map: TreeMap<i64, i64, B> = scenario.initial.iter().copied().collect();

	for (i, step) in scenario.steps.iter().enumerate() {
		let ctx = format!("{} [{}] step {}: {:?}", name, B::NAME, i, step);
		match step {
			Step::Insert {
				key,
				value,
				expect,
			} => assert_eq!(map.insert(*key, *value), *expect, "{}", ctx),
			Step::Remove {
				key,
				expect,
			} => assert_eq!(map.remove(key), *expect, "{}", ctx),
			Step::Get {
				key,
				expect,
			} => assert_eq!(map.get(key).copied(), *expect, "{}", ctx),
			Step::Lower {
				key,
				expect,
			} => assert_eq!(map.lower_key(key).copied(), *expect, "{}", ctx),
			Step::Floor {
				key,
				expect,
			} => assert_eq!(map.floor_key(key).copied(), *expect, "{}", ctx),
			Step::Ceiling {
				key,
				expect,
			} => assert_eq!(map.ceiling_key(key).copied(), *expect, "{}", ctx),
			Step::Higher {
				key,
				expect,
			} => assert_eq!(map.higher_key(key).copied(), *expect, "{}", ctx),
			Step::AddTo {
				key,
				delta,
				expect,
			} => assert_eq!(map.add_to(*key, *delta), *expect, "{}", ctx),
			Step::SubFrom {
				key,
				delta,
				expect,
			} => assert_eq!(map.sub_from(*key, *delta), *expect, "{}", ctx),
			Step::SubMap {
				from,
				from_inclusive,
				to,
				to_inclusive,
				keys,
				error,
			} => match map.sub_map(*from, *from_inclusive, *to, *to_inclusive) {
				Ok(view) => {
					assert_eq!(error, &None, "{}", ctx);
					let seen: Vec<i64> = view.key_set().iter().copied().collect();
					assert_eq!(&seen, keys, "{}", ctx);
				}
				Err(e) => assert_eq!(error.as_deref(), Some(format!("{:?}", e).as_str()), "{}", ctx),
			},
			Step::SubMapInsert {
				from,
				from_inclusive,
				to,
				to_inclusive,
				key,
				value,
				error,
			} => {
				let mut view = map.sub_map_mut(*from, *from_inclusive, *to, *to_inclusive).expect("valid range");
				assert_eq!(&error_name(view.insert(*key, *value)), error, "{}", ctx);
			}
			Step::SubMapClear {
				from,
				from_inclusive,
				to,
				to_inclusive,
			} => map.sub_map_mut(*from, *from_inclusive, *to, *to_inclusive).expect("valid range").clear(),
			Step::HeadMap {
				to,
				inclusive,
				keys,
			} => {
				let seen: Vec<i64> = map.head_map(*to, *inclusive).iter().map(|(k, _)| *k).collect();
				assert_eq!(&seen, keys, "{}", ctx);
			}
			Step::TailMap {
				from,
				inclusive,
				keys,
			} => {
				let seen: Vec<i64> = map.tail_map(*from, *inclusive).iter().map(|(k, _)| *k).collect();
				assert_eq!(&seen, keys, "{}", ctx);
			}
			Step::Descending {
				keys,
			} => {
				let seen: Vec<i64> = map.descending_key_set().iter().copied().collect();
				assert_eq!(&seen, keys, "{}", ctx);
			}
			Step::CursorRemove {
				at,
				next,
			} => {
				let mut cursor = map.cursor_mut();
				while cursor.next().is_some_and(|(k, _)| k != at) {}
				assert_eq!(cursor.remove().map(|(k, _)| k), Ok(*at), "{}", ctx);
				assert_eq!(cursor.next().map(|(k, _)| *k), *next, "{}", ctx);
			}
		}
		map.assert_invariants();
	}

	let entries: Vec<(i64, i64)> = map.into_iter().collect();
	assert_eq!(entries, scenario.expected, "{}: final entries", name);
}

fn replay_all(json: &str) {
	for scenario in load(json) {
		replay::<RedBlack>(&scenario);
		replay::<Avl>(&scenario);
	}
}

// ===========================================================================
// Scenario Files
// ===========================================================================

#[test]
fn navigation_fixtures() {
	replay_all(include_str!("fixtures/navigation.json"));
}

#[test]
fn range_view_fixtures() {
	replay_all(include_str!("fixtures/range_views.json"));
}

#[test]
fn accumulator_fixtures() {
	replay_all(include_str!("fixtures/accumulator.json"));
}

#[test]
fn cursor_fixtures() {
	replay_all(include_str!("fixtures/cursor.json"));
}

#[test]
fn fixtures_are_well_formed() {
	for json in [
		include_str!("fixtures/navigation.json"),
		include_str!("fixtures/range_views.json"),
		include_str!("fixtures/accumulator.json"),
		include_str!("fixtures/cursor.json"),
	] {
		for scenario in load(json) {
			assert!(!scenario.name.is_empty());
			assert!(!scenario.steps.is_empty(), "{} has no steps", scenario.name);
		}
	}
}
