mod common;

use common::{grouped_entity, split_entity};
use indexable::{
    concatenate, ArrayColumn, Entity, IndexSpec, IndexableError, MaskedColumn, MemberSelection,
    Selection, Sliceable, Value,
};

#[test]
fn test_cardinality_is_enforced() {
    let err = Entity::builder()
        .array("a", vec![1.0, 2.0, 3.0])
        .array("b", vec![1_i64, 2])
        .build()
        .unwrap_err();
    assert!(matches!(err, IndexableError::Cardinality(_)));

    // opaque fields do not take part in the cardinality check
    let entity = Entity::builder()
        .array("a", vec![1.0, 2.0, 3.0])
        .opaque("frame", "equatorial")
        .build()
        .unwrap();
    assert_eq!(entity.member_length(), 3);
}

#[test]
fn test_default_index_is_identity() {
    let entity = Entity::builder()
        .array("x", vec![10.0, 20.0, 30.0, 40.0])
        .build()
        .unwrap();

    assert_eq!(entity.len(), entity.member_length());
    assert_eq!(
        entity.index(),
        &[Value::Int(0), Value::Int(1), Value::Int(2), Value::Int(3)]
    );
    for position in 0..entity.len() {
        assert_eq!(
            entity.resolve(position).unwrap().to_positions(),
            vec![position]
        );
    }
}

#[test]
fn test_grouping_round_trip() {
    let entity = grouped_entity();
    assert_eq!(entity.len(), 3);
    assert!(entity.mapping().is_slice_form());
    assert_eq!(
        entity.index(),
        &[Value::from("a"), Value::from("b"), Value::from("c")]
    );

    let c = entity.get(2).unwrap();
    assert_eq!(c.len(), 1);
    assert_eq!(c.array("x").unwrap().as_f64(), Some(&[3.0, 4.0, 5.0][..]));
    assert_eq!(
        c.temporal("times").unwrap().mjd(),
        &[60003.0, 60004.0, 60005.0]
    );
    assert_eq!(c.index(), &[Value::from("c")]);
}

#[test]
fn test_non_contiguous_groups_fall_back_to_raw_form() {
    let entity = split_entity();
    assert!(!entity.mapping().is_slice_form());
    assert_eq!(entity.len(), 3);

    // rows of `a` come back in their original order
    assert_eq!(
        entity.resolve(0).unwrap(),
        MemberSelection::Positions(vec![0, 2, 5])
    );

    let a = entity.get(0).unwrap();
    assert_eq!(a.array("x").unwrap().as_f64(), Some(&[0.0, 2.0, 5.0][..]));
    // the extracted group is contiguous again
    assert!(a.mapping().is_slice_form());
}

#[test]
fn test_delete_keeps_fields_consistent() {
    let mut entity = grouped_entity();
    entity.delete(1).unwrap();

    assert_eq!(entity.len(), 2);
    assert_eq!(entity.member_length(), 5);
    assert_eq!(
        entity.array("x").unwrap().as_f64(),
        Some(&[0.0, 1.0, 3.0, 4.0, 5.0][..])
    );
    assert_eq!(entity.temporal("times").unwrap().len(), 5);
    assert_eq!(entity.index(), &[Value::from("a"), Value::from("c")]);
}

#[test]
fn test_delete_shrinks_masks_and_nested_rows() {
    let states = Entity::builder()
        .array("vx", vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5])
        .build()
        .unwrap();
    let mag = MaskedColumn::new(
        ArrayColumn::from(vec![20.0, 21.0, 22.0, 23.0, 24.0, 25.0]),
        vec![false, true, false, true, false, false],
    )
    .unwrap();

    let mut entity = Entity::builder()
        .array("orbit_id", vec!["a", "a", "b", "c", "c", "c"])
        .masked("mag", mag)
        .nested("states", states)
        .index("orbit_id")
        .build()
        .unwrap();
    entity.delete(0).unwrap();

    let mag = entity.masked("mag").unwrap();
    assert_eq!(mag.mask(), &[false, true, false, false]);
    assert_eq!(
        mag.values(),
        &ArrayColumn::from(vec![22.0, 23.0, 24.0, 25.0])
    );

    let states = entity.nested("states").unwrap();
    assert_eq!(states.member_length(), 4);
    assert_eq!(states.len(), 4);
    assert_eq!(
        states.array("vx").unwrap().as_f64(),
        Some(&[0.2, 0.3, 0.4, 0.5][..])
    );
    assert_eq!(entity.index(), &[Value::from("b"), Value::from("c")]);
}

#[test]
fn test_delete_duplicated_positions_once() {
    let mut split = split_entity();
    split.delete(Selection::Positions(vec![0, 0])).unwrap();
    assert_eq!(split.member_length(), 3);
    assert_eq!(split.index(), &[Value::from("b"), Value::from("c")]);
}

#[test]
fn test_failed_delete_leaves_entity_untouched() {
    let mut entity = grouped_entity();
    let before = entity.clone();

    assert_eq!(
        entity.delete(Selection::Positions(vec![0, 7])),
        Err(IndexableError::OutOfRange { index: 7, len: 3 })
    );
    assert_eq!(entity, before);
}

#[test]
fn test_concatenation_round_trip() {
    let entity = grouped_entity();
    let left = entity.get(..2).unwrap();
    let right = entity.get(2..).unwrap();

    let joined = concatenate([&left, &right]).unwrap();
    assert_eq!(joined, entity);
}

#[test]
fn test_concatenation_merges_shared_keys() {
    let entity = grouped_entity();
    let joined = concatenate([&entity, &entity]).unwrap();

    assert_eq!(joined.member_length(), 12);
    // `a` now appears in two separate runs
    assert_eq!(joined.len(), 3);
    assert!(!joined.mapping().is_slice_form());
}

#[test]
fn test_concatenation_rejects_mismatched_schemas() {
    let entity = grouped_entity();
    let other = Entity::builder()
        .array("orbit_id", vec!["d"])
        .array("y", vec![0.0])
        .build()
        .unwrap();

    assert!(matches!(
        concatenate([&entity, &other]),
        Err(IndexableError::Consistency(_))
    ));
    assert_eq!(
        concatenate(std::iter::empty::<&Entity>()),
        Err(IndexableError::EmptyConcatenation)
    );
}

#[test]
fn test_sort_is_stable() {
    let entity = Entity::builder()
        .array("id", vec![0_i64, 1, 2, 3, 4])
        .array("group", vec![2_i64, 1, 2, 1, 0])
        .build()
        .unwrap();

    let sorted = entity.sort_values(&["group"], &[]).unwrap();
    assert_eq!(
        sorted.array("id").unwrap().as_i64(),
        Some(&[4_i64, 1, 3, 0, 2][..])
    );

    let descending = entity.sort_values(&["group"], &[false]).unwrap();
    assert_eq!(
        descending.array("id").unwrap().as_i64(),
        Some(&[0_i64, 2, 1, 3, 4][..])
    );

    assert_eq!(
        entity.sort_values(&["group", "id"], &[true, false, true]),
        Err(IndexableError::SortSpecMismatch {
            by: 2,
            ascending: 3
        })
    );
}

#[test]
fn test_consecutive_slices_are_fused() {
    let entity = grouped_entity();

    assert_eq!(entity.resolve(1..3).unwrap(), MemberSelection::Range(2..6));
    assert_eq!(entity.resolve(..).unwrap(), MemberSelection::Range(0..6));
    assert_eq!(
        entity.resolve(Selection::stepped(0..3, 2)).unwrap(),
        MemberSelection::Positions(vec![0, 1, 3, 4, 5])
    );
}

#[test]
fn test_fused_range_matches_unfused_groups() {
    // 100 rows in 10 groups of 10
    let entity = Entity::builder()
        .array("group", (0..100).map(|row| row / 10).collect::<Vec<i64>>())
        .array("x", (0..100).map(|row| row as f64).collect::<Vec<_>>())
        .index("group")
        .build()
        .unwrap();
    assert_eq!(entity.len(), 10);

    let fused = entity.resolve(2..5).unwrap();
    assert_eq!(fused, MemberSelection::Range(20..50));

    let unfused: Vec<usize> = (2..5_usize)
        .flat_map(|p| entity.resolve(p).unwrap().to_positions())
        .collect();
    assert_eq!(fused.to_positions(), unfused);

    let groups: Vec<Entity> = [2_usize, 3, 4]
        .iter()
        .map(|&p| entity.get(p).unwrap())
        .collect();
    assert_eq!(entity.get(2..5).unwrap(), concatenate(&groups).unwrap());
}

#[test]
fn test_selection_errors() {
    let entity = grouped_entity();
    assert_eq!(
        entity.get(3),
        Err(IndexableError::OutOfRange { index: 3, len: 3 })
    );
    assert!(matches!(
        entity.get(Selection::stepped(0..3, 0)),
        Err(IndexableError::InvalidSelection(_))
    ));
    // a range running past the end is clamped
    assert_eq!(entity.get(1..10).unwrap().len(), 2);
    assert_eq!(
        entity.get(Selection::Position(usize::MAX)),
        Err(IndexableError::OutOfRange {
            index: usize::MAX,
            len: 3
        })
    );
}

#[test]
fn test_explicit_index_travels_with_rows() {
    let mut entity = Entity::builder()
        .array("x", vec![1.0, 2.0, 3.0])
        .index(IndexSpec::explicit(["k1", "k2", "k2"]))
        .build()
        .unwrap();
    assert_eq!(entity.len(), 2);

    let sorted = entity.sort_values(&["x"], &[false]).unwrap();
    assert_eq!(sorted.index(), &[Value::from("k2"), Value::from("k1")]);

    entity.delete(0).unwrap();
    assert_eq!(entity.index(), &[Value::from("k2")]);
    assert_eq!(entity.member_length(), 2);

    entity.reset_index();
    assert_eq!(entity.index_spec(), &IndexSpec::Range);
    assert_eq!(entity.len(), 2);
}

#[test]
fn test_iteration_and_chunks() {
    let entity = grouped_entity();

    let keys: Vec<_> = entity.iter().map(|e| e.index()[0].clone()).collect();
    assert_eq!(
        keys,
        vec![Value::from("a"), Value::from("b"), Value::from("c")]
    );

    let chunks: Vec<_> = entity.yield_chunks(2).unwrap().collect();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].member_length(), 3);
    assert_eq!(chunks[1].member_length(), 3);
    assert!(entity.yield_chunks(0).is_err());
}
