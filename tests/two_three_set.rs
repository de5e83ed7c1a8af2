use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use two_three_tree::{Error, TwoThreeSet};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates values in a range narrow enough to force collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

// ─── Randomized cross-validation against BTreeSet ────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both TwoThreeSet and
    /// BTreeSet and asserts identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut tt_set: TwoThreeSet<i64> = TwoThreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(tt_set.insert(*v), bt_set.insert(*v), "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(tt_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(tt_set.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::First => {
                    prop_assert_eq!(tt_set.first().ok(), bt_set.first(), "first()");
                }
                SetOp::Last => {
                    prop_assert_eq!(tt_set.last().ok(), bt_set.last(), "last()");
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(tt_set.pop_first(), bt_set.pop_first(), "pop_first()");
                }
                SetOp::PopLast => {
                    prop_assert_eq!(tt_set.pop_last(), bt_set.pop_last(), "pop_last()");
                }
            }
            prop_assert_eq!(tt_set.len(), bt_set.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(tt_set.is_empty(), bt_set.is_empty(), "is_empty mismatch after {:?}", op);
        }

        let tt_items: Vec<_> = tt_set.iter().copied().collect();
        let bt_items: Vec<_> = bt_set.iter().copied().collect();
        prop_assert_eq!(tt_items, bt_items, "final iteration mismatch");
    }

    /// Iteration order matches BTreeSet after random insertions.
    #[test]
    fn iter_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let tt_set: TwoThreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        let tt_items: Vec<_> = tt_set.iter().copied().collect();
        let bt_items: Vec<_> = bt_set.iter().copied().collect();
        prop_assert_eq!(&tt_items, &bt_items, "iter() mismatch");

        prop_assert_eq!(tt_set.iter().len(), tt_set.len(), "ExactSizeIterator len mismatch");
    }

    /// Ascending enumeration is strictly ascending and duplicate-free for
    /// any insertion sequence.
    #[test]
    fn iteration_is_strictly_ascending(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let set: TwoThreeSet<i64> = values.iter().copied().collect();

        let items: Vec<_> = set.iter().copied().collect();
        prop_assert_eq!(items.len(), set.len());
        for pair in items.windows(2) {
            prop_assert!(pair[0] < pair[1], "not strictly ascending: {} then {}", pair[0], pair[1]);
        }
        prop_assert_eq!(set.first().ok(), items.first());
        prop_assert_eq!(set.last().ok(), items.last());
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn small_set_observations() {
    let mut set = TwoThreeSet::new();
    for value in [5, 2, 8, 1] {
        assert!(set.insert(value));
    }

    assert_eq!(set.len(), 4);
    assert_eq!(set.first(), Ok(&1));
    assert_eq!(set.last(), Ok(&8));
    let ascending: Vec<_> = set.iter().copied().collect();
    assert_eq!(ascending, vec![1, 2, 5, 8]);
}

#[test]
fn duplicate_insert_is_rejected() {
    let mut set = TwoThreeSet::new();
    assert!(set.insert(5));
    assert!(!set.insert(5));
    assert_eq!(set.len(), 1);
}

#[test]
fn removing_an_absent_value_changes_nothing() {
    let mut set: TwoThreeSet<i32> = [5, 2, 8, 1].into_iter().collect();
    assert!(!set.remove(&42));
    assert_eq!(set.len(), 4);
    let ascending: Vec<_> = set.iter().copied().collect();
    assert_eq!(ascending, vec![1, 2, 5, 8]);
}

#[test]
fn removing_an_interior_key_keeps_order() {
    let mut set: TwoThreeSet<i32> = (1..=7).collect();
    assert!(set.remove(&4));
    assert_eq!(set.len(), 6);
    let ascending: Vec<_> = set.iter().copied().collect();
    assert_eq!(ascending, vec![1, 2, 3, 5, 6, 7]);
}

/// Deterministic pseudo-random keys from a simple LCG.
fn random_keys(n: usize) -> Vec<i64> {
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    while keys.len() < n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        let key = (x >> 33) as i64;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

#[test]
fn round_trip_against_reference_set() {
    let keys = random_keys(500);

    let mut tt_set: TwoThreeSet<i64> = TwoThreeSet::new();
    let mut bt_set: BTreeSet<i64> = BTreeSet::new();
    for &key in &keys {
        assert_eq!(tt_set.insert(key), bt_set.insert(key));
    }
    assert_eq!(tt_set.len(), 500);

    // Tear down in insertion order, cross-validating after every removal.
    for &key in &keys {
        assert!(tt_set.remove(&key));
        assert!(bt_set.remove(&key));
        assert_eq!(tt_set.len(), bt_set.len());

        let tt_items: Vec<_> = tt_set.iter().copied().collect();
        let bt_items: Vec<_> = bt_set.iter().copied().collect();
        assert_eq!(tt_items, bt_items);
    }

    assert_eq!(tt_set.len(), 0);
    assert_eq!(tt_set.first(), Err(Error::EmptyCollection));
    assert_eq!(tt_set.last(), Err(Error::EmptyCollection));
}

#[test]
fn range_views_always_fail() {
    let set: TwoThreeSet<i32> = (1..=10).collect();
    assert_eq!(set.sub_set(&2, &5).err(), Some(Error::Unsupported("sub_set")));
    assert_eq!(set.head_set(&5).err(), Some(Error::Unsupported("head_set")));
    assert_eq!(set.tail_set(&5).err(), Some(Error::Unsupported("tail_set")));

    // State-independent: an empty set reports the same errors.
    let empty: TwoThreeSet<i32> = TwoThreeSet::new();
    assert_eq!(empty.sub_set(&0, &1).err(), Some(Error::Unsupported("sub_set")));
}

#[test]
fn borrowed_lookups() {
    let set: TwoThreeSet<String> = ["cherry", "apple", "banana"].into_iter().map(String::from).collect();
    assert!(set.contains("banana"));
    assert!(!set.contains("durian"));

    let mut set = set;
    assert!(set.remove("apple"));
    assert_eq!(set.first(), Ok(&"banana".to_string()));
}
