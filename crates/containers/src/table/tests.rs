use colonnade_shape::{FieldType, ShapeError, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn score() -> Shape {
	Shape::builder().field("score", FieldType::F64).build().unwrap()
}

fn s(x: f64) -> Aggregate {
	Aggregate::new(&score(), [Value::from(x)]).unwrap()
}

fn table(keys: &[i32]) -> SoaMap {
	SoaMap::from_entries(&score(), keys.iter().map(|&k| (k, s(k as f64)))).unwrap()
}

#[test]
fn colliding_keys_stay_reachable() {
	let mut map = SoaMap::for_shape_with_capacity(&score(), 0).unwrap();
	for key in [1, 17, 33] {
		assert_eq!(map.put(key, s(key as f64)).unwrap(), None);
	}
	assert_eq!(map.len(), 3);
	assert_eq!(map.get(33), Some(s(33.0)));

	assert_eq!(map.remove(1), Some(s(1.0)));
	assert_eq!(map.get(1), None);
	assert_eq!(map.get(17), Some(s(17.0)));
	assert_eq!(map.get(33), Some(s(33.0)));

	// Re-inserting a key that sits behind a tombstone must not duplicate it.
	map.put(33, s(0.5)).unwrap();
	assert_eq!(map.len(), 2);
	assert_eq!(map.remove(33), Some(s(0.5)));
	assert_eq!(map.get(33), None);
	assert_eq!(map.keys().collect::<Vec<_>>(), [17]);
}

#[test]
fn tombstone_reuse_does_not_resurrect_or_hide_keys() {
	// 1, 33 and 65 share a home slot in a 32-slot index.
	let mut map = table(&[1, 33]);
	map.remove(1);
	assert_eq!(map.index.tombstones(), 1);

	map.put(65, s(65.0)).unwrap();
	assert_eq!(map.index.tombstones(), 0);
	assert_eq!(map.get(1), None);
	assert_eq!(map.get(33), Some(s(33.0)));
	assert_eq!(map.get(65), Some(s(65.0)));
	assert_eq!(map.len(), 2);
}

#[test]
fn overwrite_returns_old_value_and_is_not_structural() {
	let mut map = table(&[1, 2]);
	let mut cursor = map.key_cursor();
	assert_eq!(cursor.next(&map).unwrap(), Some(1));
	assert_eq!(map.put(2, s(9.0)).unwrap(), Some(s(2.0)));
	assert_eq!(cursor.next(&map).unwrap(), Some(2));
	assert_eq!(map.len(), 2);
	assert_eq!(map.get(2), Some(s(9.0)));
}

#[test]
fn replace_never_inserts() {
	let mut map = table(&[1]);
	assert_eq!(map.replace(2, s(2.0)).unwrap(), None);
	assert!(!map.contains_key(2));
	assert_eq!(map.replace(1, s(4.0)).unwrap(), Some(s(1.0)));
	assert_eq!(map.get(1), Some(s(4.0)));
}

#[test]
fn remove_moves_last_entry_into_gap() {
	let mut map = table(&[1, 2, 3, 4]);
	assert_eq!(map.remove(2), Some(s(2.0)));
	assert_eq!(map.keys().collect::<Vec<_>>(), [1, 4, 3]);
	assert_eq!(map.get(4), Some(s(4.0)));
	assert_eq!(map.remove(2), None);
	assert_eq!(map.remove(3), Some(s(3.0)));
	assert_eq!(map.keys().collect::<Vec<_>>(), [1, 4]);
}

#[test]
fn negative_and_extreme_keys() {
	let keys = [-1, i32::MIN, i32::MAX, 0, -17];
	let map = table(&keys);
	for key in keys {
		assert_eq!(map.get(key), Some(s(key as f64)));
	}
	assert!(!map.contains_key(-2));
}

#[test]
fn growth_doubles_and_keeps_entries() {
	let keys: Vec<i32> = (0..17).map(|i| i * 16).collect();
	let mut map = SoaMap::for_shape(&score()).unwrap();
	for &key in &keys[..16] {
		map.put(key, s(key as f64)).unwrap();
	}
	assert_eq!(map.capacity(), 16);
	assert_eq!(map.index.len(), 32);
	map.put(keys[16], s(0.0)).unwrap();
	assert_eq!(map.capacity(), 32);
	assert_eq!(map.index.len(), 64);
	for &key in &keys[..16] {
		assert_eq!(map.get(key), Some(s(key as f64)));
	}
	assert_eq!(map.keys().collect::<Vec<_>>(), keys);
}

#[test]
fn tombstones_are_purged_under_churn() {
	let mut map = table(&[-100]);
	for key in 0..10_000 {
		map.put(key, s(1.0)).unwrap();
		assert_eq!(map.remove(key), Some(s(1.0)));
		assert!(map.index.tombstones() * 4 <= map.index.len() * 3);
	}
	assert_eq!(map.capacity(), 16);
	assert_eq!(map.len(), 1);
	assert_eq!(map.get(-100), Some(s(-100.0)));
}

#[test]
fn wrong_shape_is_rejected() {
	let mut map = table(&[1]);
	let other = Shape::builder().field("score", FieldType::F32).build().unwrap();
	let stray = Aggregate::new(&other, [Value::F32(1.0)]).unwrap();
	assert!(matches!(map.put(2, stray.clone()), Err(SoaError::Shape(ShapeError::Mismatch { .. }))));
	assert!(map.replace(1, stray.clone()).is_err());
	assert_eq!(map.len(), 1);
	assert!(!map.contains_value(&stray));
}

#[test]
fn values_view_follows_storage_order() {
	let map = table(&[3, 1, 2]);
	let values = map.values();
	assert_eq!(values.len(), 3);
	assert_eq!(values.to_vec(), [s(3.0), s(1.0), s(2.0)]);
	assert_eq!(values.index_of(&s(2.0)), Some(2));
	assert!(map.contains_value(&s(1.0)));
	assert!(!map.contains_value(&s(7.0)));
}

#[test]
fn entries_iterate_in_storage_order() {
	let map = table(&[5, 6, 7]);
	let pairs: Vec<_> = map.iter().collect();
	assert_eq!(pairs, [(5, s(5.0)), (6, s(6.0)), (7, s(7.0))]);
	assert_eq!(map.iter().rev().next(), Some((7, s(7.0))));
	assert_eq!(map.iter().len(), 3);

	let mut seen = Vec::new();
	map.for_each(|key, value| seen.push((key, value)));
	assert_eq!(seen, pairs);
}

#[rstest]
#[case::put_new(|map: &mut SoaMap| { map.put(99, s(0.0)).unwrap(); })]
#[case::remove(|map: &mut SoaMap| { map.remove(1); })]
#[case::clear(|map: &mut SoaMap| map.clear())]
fn structural_change_invalidates_cursors(#[case] mutate: fn(&mut SoaMap)) {
	let mut map = table(&[1, 2, 3]);
	let mut keys = map.key_cursor();
	let mut entries = map.entry_cursor();
	keys.next(&map).unwrap();
	let entry = entries.next(&map).unwrap().unwrap();
	mutate(&mut map);
	assert_eq!(keys.next(&map).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(entries.next(&map).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(entry.value(&map).unwrap_err(), SoaError::ConcurrentModification);
	assert!(entry.set_value(&mut map, s(0.0)).unwrap_err().is_structural_conflict());
}

#[test]
fn entries_and_cursors_reject_other_tables() {
	// Both tables saw 17 structural changes, but `b` only has 16 slots.
	let mut a = table(&(0..17).collect::<Vec<_>>());
	let mut b = table(&(0..16).collect::<Vec<_>>());
	b.remove(0);
	assert_eq!(b.capacity(), 16);

	let mut entries = a.entry_cursor();
	let mut last = None;
	while let Some(entry) = entries.next(&a).unwrap() {
		last = Some(entry);
	}
	let last = last.unwrap();
	assert_eq!(last.key(), 16);
	assert_eq!(last.value(&b).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(last.set_value(&mut b, s(1.0)).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(last.set_value(&mut a, s(1.0)).unwrap(), s(16.0));

	let mut keys = a.key_cursor();
	assert_eq!(keys.next(&b).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(a.entry_cursor().next(&b).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(keys.next(&a).unwrap(), Some(0));
}

#[test]
fn cursors_do_not_carry_over_to_clones() {
	let map = table(&[1, 2]);
	let copy = map.clone();
	let mut cursor = map.entry_cursor();
	let entry = cursor.next(&map).unwrap().unwrap();
	assert_eq!(entry.value(&copy).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(map.key_cursor().next(&copy).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(entry.value(&map).unwrap(), s(1.0));
}

#[test]
fn removing_an_absent_key_is_not_structural() {
	let mut map = table(&[1]);
	let mut cursor = map.key_cursor();
	assert_eq!(map.remove(2), None);
	assert_eq!(cursor.next(&map).unwrap(), Some(1));
	assert!(!cursor.has_next(&map));
	assert_eq!(cursor.next(&map).unwrap(), None);
}

#[test]
fn entry_set_value_writes_through() {
	let mut map = table(&[1, 2]);
	let mut cursor = map.entry_cursor();
	while let Some(entry) = cursor.next(&map).unwrap() {
		let old = entry.set_value(&mut map, s(entry.key() as f64 * 10.0)).unwrap();
		assert_eq!(old, s(entry.key() as f64));
		assert_eq!(entry.value(&map).unwrap(), s(entry.key() as f64 * 10.0));
	}
	assert_eq!(map.get(1), Some(s(10.0)));
	assert_eq!(map.get(2), Some(s(20.0)));
}

#[test]
fn get_or_falls_back() {
	let map = table(&[1]);
	assert_eq!(map.get_or(1, s(0.0)), s(1.0));
	assert_eq!(map.get_or(2, s(0.0)), s(0.0));
}

#[test]
fn clear_resets_to_minimum_capacity() {
	let mut map = table(&(0..40).collect::<Vec<_>>());
	assert_eq!(map.capacity(), 64);
	map.clear();
	assert!(map.is_empty());
	assert_eq!(map.capacity(), 16);
	assert_eq!(map.get(3), None);
	map.put(3, s(3.0)).unwrap();
	assert_eq!(map.get(3), Some(s(3.0)));
}

#[test]
fn from_entries_later_duplicates_win() {
	let map = SoaMap::from_entries(&score(), [(1, s(1.0)), (2, s(2.0)), (1, s(3.0))]).unwrap();
	assert_eq!(map.len(), 2);
	assert_eq!(map.get(1), Some(s(3.0)));
}

#[test]
fn equality_ignores_storage_order() {
	let a = table(&[1, 2, 3]);
	let b = table(&[3, 1, 2]);
	assert_eq!(a, b);
	let mut c = b.clone();
	c.put(2, s(0.0)).unwrap();
	assert_ne!(a, c);
	assert_ne!(a, table(&[1, 2]));
}

#[test]
fn debug_prints_as_map() {
	let mut map = SoaMap::for_shape(&score()).unwrap();
	map.put(4, s(1.5)).unwrap();
	assert_eq!(format!("{map:?}"), "{4: Aggregate{score: 1.5}}");
}

#[rstest]
#[case(0, 16)]
#[case(1, 16)]
#[case(16, 16)]
#[case(17, 32)]
#[case(1000, 1024)]
fn capacity_is_rounded(#[case] requested: usize, #[case] expected: usize) {
	let map = SoaMap::for_shape_with_capacity(&score(), requested).unwrap();
	assert_eq!(map.capacity(), expected);
	assert_eq!(map.index.len(), expected * 2);
}

#[test]
fn capacity_limit() {
	let err = SoaMap::for_shape_with_capacity(&score(), MAX_CAPACITY + 1).unwrap_err();
	assert_eq!(
		err,
		SoaError::InvalidCapacity {
			requested: MAX_CAPACITY + 1,
			max: MAX_CAPACITY,
		}
	);
	assert!(err.is_usage_error());
}
