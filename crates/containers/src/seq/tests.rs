use std::sync::Arc;

use colonnade_shape::{FieldType, ShapeError, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn person() -> Shape {
	Shape::builder()
		.field("age", FieldType::I32)
		.field("name", FieldType::Str)
		.build()
		.unwrap()
}

fn p(age: i32, name: &str) -> Aggregate {
	Aggregate::new(&person(), [Value::from(age), Value::from(name)]).unwrap()
}

fn people(names: &[&str]) -> SoaVec {
	let items = names.iter().enumerate().map(|(i, name)| p(i as i32, name));
	SoaVec::from_aggregates(&person(), items).unwrap()
}

fn names(seq: &SoaVec) -> Vec<String> {
	seq.iter()
		.map(|a| a.get("name").and_then(Value::as_str).unwrap_or_default().to_string())
		.collect()
}

#[test]
fn push_then_get_is_equal() {
	let mut seq = SoaVec::for_shape(&person()).unwrap();
	seq.push(p(21, "Ana")).unwrap();
	assert_eq!(seq.len(), 1);
	assert_eq!(seq.get(0).unwrap(), p(21, "Ana"));
}

#[test]
fn get_is_bounds_checked() {
	let seq = people(&["A"]);
	assert_eq!(seq.get(1).unwrap_err(), SoaError::OutOfRange { index: 1, len: 1 });
}

#[test]
fn growth_policy() {
	let mut seq = SoaVec::for_shape(&person()).unwrap();
	assert_eq!(seq.capacity(), 0);
	seq.push(p(0, "a")).unwrap();
	assert_eq!(seq.capacity(), 16);
	for i in 1..17 {
		seq.push(p(i, "x")).unwrap();
	}
	assert_eq!(seq.capacity(), 24);
	assert_eq!(seq.len(), 17);
}

#[test]
fn growth_rounds_up() {
	let mut seq = SoaVec::for_shape_with_capacity(&person(), 1).unwrap();
	seq.push(p(0, "a")).unwrap();
	seq.push(p(1, "b")).unwrap();
	assert_eq!(seq.capacity(), 2);
	seq.push(p(2, "c")).unwrap();
	assert_eq!(seq.capacity(), 3);
}

#[test]
fn set_returns_previous_value() {
	let mut seq = people(&["A", "B"]);
	let old = seq.set(1, p(9, "Z")).unwrap();
	assert_eq!(old, p(1, "B"));
	assert_eq!(names(&seq), ["A", "Z"]);
	assert!(matches!(seq.set(2, p(0, "Q")), Err(SoaError::OutOfRange { .. })));
}

#[test]
fn wrong_shape_is_rejected_before_any_change() {
	let mut seq = people(&["A"]);
	let other = Shape::builder().field("x", FieldType::F64).build().unwrap();
	let stray = Aggregate::new(&other, [Value::from(1.0)]).unwrap();

	assert!(matches!(seq.push(stray.clone()), Err(SoaError::Shape(ShapeError::Mismatch { .. }))));
	assert!(matches!(seq.set(0, stray.clone()), Err(SoaError::Shape(_))));
	assert_eq!(seq.len(), 1);
	assert_eq!(seq.index_of(&stray), None);
	assert!(!seq.remove_item(&stray));
}

#[test]
fn insert_is_unsupported() {
	let mut seq = people(&["A"]);
	assert_eq!(
		seq.insert(0, p(0, "B")).unwrap_err(),
		SoaError::Unsupported { operation: "insert" }
	);
	assert_eq!(seq.len(), 1);
}

#[test]
fn remove_shifts_and_preserves_order() {
	let mut seq = people(&["A", "B", "C", "D"]);
	assert_eq!(seq.remove(1).unwrap(), p(1, "B"));
	assert_eq!(names(&seq), ["A", "C", "D"]);
	assert_eq!(seq.remove(2).unwrap(), p(3, "D"));
	assert_eq!(names(&seq), ["A", "C"]);
	assert!(seq.remove(2).is_err());
}

#[test]
fn swap_remove_moves_last_into_gap() {
	let mut seq = people(&["A", "B", "C", "D"]);
	assert_eq!(seq.swap_remove(1).unwrap(), p(1, "B"));
	assert_eq!(names(&seq), ["A", "D", "C"]);
	assert_eq!(seq.swap_remove(2).unwrap(), p(2, "C"));
	assert_eq!(names(&seq), ["A", "D"]);
}

#[test]
fn removal_releases_references() {
	let name: Arc<str> = Arc::from("Ana");
	let ana = Aggregate::new(&person(), [Value::from(1), Value::Str(Some(name.clone()))]).unwrap();
	let mut seq = SoaVec::for_shape(&person()).unwrap();
	seq.push(ana.clone()).unwrap();
	drop(ana);
	assert_eq!(Arc::strong_count(&name), 2);
	seq.swap_remove(0).unwrap();
	assert_eq!(Arc::strong_count(&name), 1);
}

#[test]
fn index_of_scans_both_ways() {
	let mut seq = people(&["A", "B"]);
	seq.push(p(0, "A")).unwrap();
	assert_eq!(seq.index_of(&p(0, "A")), Some(0));
	assert_eq!(seq.last_index_of(&p(0, "A")), Some(2));
	assert_eq!(seq.index_of(&p(5, "A")), None);
	assert!(seq.contains(&p(1, "B")));
}

#[test]
fn remove_item_removes_first_match() {
	let mut seq = people(&["A", "B"]);
	seq.push(p(0, "A")).unwrap();
	assert!(seq.remove_item(&p(0, "A")));
	assert_eq!(names(&seq), ["B", "A"]);
	assert!(!seq.remove_item(&p(7, "Q")));
}

#[test]
fn null_references_compare_by_value() {
	let mut seq = SoaVec::for_shape(&person()).unwrap();
	let nameless = Aggregate::new(&person(), [Value::from(3), Value::Str(None)]).unwrap();
	seq.push(p(3, "")).unwrap();
	seq.push(nameless.clone()).unwrap();
	assert_eq!(seq.index_of(&nameless), Some(1));
}

#[test]
fn clear_releases_storage() {
	let mut seq = people(&["A", "B"]);
	seq.clear();
	assert!(seq.is_empty());
	assert_eq!(seq.capacity(), 0);
	seq.push(p(1, "C")).unwrap();
	assert_eq!(names(&seq), ["C"]);
}

#[test]
fn iteration_is_double_ended_and_exact() {
	let seq = people(&["A", "B", "C"]);
	let mut iter = seq.iter();
	assert_eq!(iter.len(), 3);
	assert_eq!(iter.next_back().unwrap(), p(2, "C"));
	assert_eq!(iter.next().unwrap(), p(0, "A"));
	assert_eq!(iter.len(), 1);
	assert_eq!(iter.next().unwrap(), p(1, "B"));
	assert!(iter.next().is_none());
	assert!(iter.next_back().is_none());
	assert_eq!(seq.iter().rev().count(), 3);
}

#[test]
fn cursor_walks_both_directions() {
	let seq = people(&["A", "B"]);
	let mut cursor = seq.cursor();
	assert!(!cursor.has_previous());
	assert_eq!(cursor.next(&seq).unwrap(), Some(p(0, "A")));
	assert_eq!(cursor.next(&seq).unwrap(), Some(p(1, "B")));
	assert!(!cursor.has_next(&seq));
	assert_eq!(cursor.next(&seq).unwrap(), None);
	assert_eq!(cursor.previous_index(), Some(1));
	assert_eq!(cursor.previous(&seq).unwrap(), Some(p(1, "B")));
	assert_eq!(cursor.previous(&seq).unwrap(), Some(p(0, "A")));
	assert_eq!(cursor.previous(&seq).unwrap(), None);
	assert_eq!(cursor.next_index(), 0);
}

#[test]
fn cursor_at_bounds() {
	let seq = people(&["A", "B"]);
	let mut cursor = seq.cursor_at(2).unwrap();
	assert_eq!(cursor.previous(&seq).unwrap(), Some(p(1, "B")));
	assert!(matches!(seq.cursor_at(3), Err(SoaError::OutOfRange { index: 3, len: 2 })));
}

#[rstest]
#[case::push(|seq: &mut SoaVec| seq.push(p(9, "Z")).unwrap())]
#[case::remove(|seq: &mut SoaVec| { seq.remove(0).unwrap(); })]
#[case::swap_remove(|seq: &mut SoaVec| { seq.swap_remove(0).unwrap(); })]
#[case::remove_item(|seq: &mut SoaVec| { seq.remove_item(&p(1, "B")); })]
#[case::clear(|seq: &mut SoaVec| seq.clear())]
fn structural_change_invalidates_cursor(#[case] mutate: fn(&mut SoaVec)) {
	let mut seq = people(&["A", "B", "C"]);
	let mut cursor = seq.cursor();
	cursor.next(&seq).unwrap();
	mutate(&mut seq);
	assert_eq!(cursor.next(&seq).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(cursor.previous(&seq).unwrap_err(), SoaError::ConcurrentModification);
	assert!(matches!(cursor.set(&mut seq, p(0, "Q")), Err(SoaError::ConcurrentModification)));
}

#[test]
fn set_through_cursor_keeps_it_valid() {
	let mut seq = people(&["A", "B", "C"]);
	let mut cursor = seq.cursor();
	cursor.next(&seq).unwrap();
	cursor.next(&seq).unwrap();
	cursor.set(&mut seq, p(7, "X")).unwrap();
	assert_eq!(cursor.next(&seq).unwrap(), Some(p(2, "C")));
	assert_eq!(names(&seq), ["A", "X", "C"]);

	// Positional set is not structural either.
	seq.set(0, p(8, "Y")).unwrap();
	assert_eq!(cursor.previous(&seq).unwrap(), Some(p(2, "C")));
}

#[test]
fn cursor_rejects_other_sequences() {
	let mut a = people(&["A", "B"]);
	let mut b = people(&["C", "D"]);
	// Same number of structural changes on both sides.
	assert_eq!(a.len(), b.len());

	let mut cursor = a.cursor();
	assert_eq!(cursor.next(&b).unwrap_err(), SoaError::ConcurrentModification);
	assert!(matches!(cursor.set(&mut b, p(0, "Q")), Err(SoaError::ConcurrentModification)));
	assert_eq!(cursor.next(&a).unwrap(), Some(p(0, "A")));
	cursor.set(&mut a, p(0, "Q")).unwrap();
	assert_eq!(names(&b), ["C", "D"]);
}

#[test]
fn cursor_does_not_carry_over_to_clones() {
	let seq = people(&["A"]);
	let copy = seq.clone();
	let mut cursor = seq.cursor();
	assert_eq!(cursor.next(&copy).unwrap_err(), SoaError::ConcurrentModification);
	assert_eq!(cursor.next(&seq).unwrap(), Some(p(0, "A")));
}

#[test]
fn cursor_set_needs_a_current_element() {
	let mut seq = people(&["A"]);
	let mut cursor = seq.cursor();
	assert_eq!(cursor.set(&mut seq, p(0, "Q")).unwrap_err(), SoaError::NoCurrentElement);
	cursor.next(&seq).unwrap();
	cursor.set(&mut seq, p(0, "Q")).unwrap();
	assert_eq!(cursor.set(&mut seq, p(0, "R")).unwrap_err(), SoaError::NoCurrentElement);
	assert_eq!(names(&seq), ["Q"]);
}

#[test]
fn views_are_read_only_snapshots_of_the_live_range() {
	let seq = people(&["A", "B"]);
	let view = seq.view();
	assert_eq!(view.len(), 2);
	assert_eq!(view.get(1).unwrap(), p(1, "B"));
	assert!(view.get(2).is_err());
	assert_eq!(view.to_vec(), seq.to_vec());
	assert_eq!(view.last_index_of(&p(0, "A")), Some(0));
}

#[test]
fn equality_and_debug() {
	let a = people(&["A", "B"]);
	let mut b = SoaVec::for_shape_with_capacity(&person(), 64).unwrap();
	b.extend_from(a.iter()).unwrap();
	assert_eq!(a, b);
	b.swap_remove(0).unwrap();
	assert_ne!(a, b);
	assert_eq!(
		format!("{:?}", people(&["A"])),
		r#"[Aggregate{age: 0, name: "A"}]"#
	);
}

#[test]
fn clones_are_independent() {
	let a = people(&["A", "B"]);
	let mut b = a.clone();
	b.set(0, p(5, "Q")).unwrap();
	assert_eq!(names(&a), ["A", "B"]);
	assert_eq!(names(&b), ["Q", "B"]);
}

#[rstest]
#[case(FieldType::Bool, Value::Bool(true))]
#[case(FieldType::I8, Value::I8(-8))]
#[case(FieldType::I16, Value::I16(1600))]
#[case(FieldType::I32, Value::I32(-32))]
#[case(FieldType::I64, Value::I64(i64::MIN))]
#[case(FieldType::F32, Value::F32(f32::NAN))]
#[case(FieldType::F64, Value::F64(-0.0))]
#[case(FieldType::Char, Value::Char('λ'))]
#[case(FieldType::Str, Value::from("text"))]
#[case(FieldType::Bytes, Value::from(vec![0u8, 1, 2]))]
fn every_field_type_round_trips(#[case] ty: FieldType, #[case] value: Value) {
	let shape = Shape::builder().field("v", ty).build().unwrap();
	let item = Aggregate::new(&shape, [value]).unwrap();
	let mut seq = SoaVec::for_shape(&shape).unwrap();
	seq.push(item.clone()).unwrap();
	assert_eq!(seq.get(0).unwrap(), item);
	assert_eq!(seq.index_of(&item), Some(0));
}

#[test]
fn capacity_limit() {
	assert_eq!(
		SoaVec::for_shape_with_capacity(&person(), MAX_CAPACITY + 1).unwrap_err(),
		SoaError::InvalidCapacity {
			requested: MAX_CAPACITY + 1,
			max: MAX_CAPACITY,
		}
	);
}
