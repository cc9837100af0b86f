#![allow(dead_code)]

use approx::assert_relative_eq;
use hifitime::TimeScale;
use indexable::coordinates::CartesianCoordinates;
use indexable::{Entity, EpochColumn};
use nalgebra::DMatrix;

/// Six rows grouped by `orbit_id` in contiguous runs: `a` → 0..2, `b` → 2..3, `c` → 3..6.
pub fn grouped_entity() -> Entity {
    Entity::builder()
        .array("orbit_id", vec!["a", "a", "b", "c", "c", "c"])
        .array("x", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
        .temporal(
            "times",
            EpochColumn::new(
                vec![60000.0, 60001.0, 60002.0, 60003.0, 60004.0, 60005.0],
                TimeScale::TDB,
            ),
        )
        .opaque("frame", "ecliptic")
        .index("orbit_id")
        .build()
        .unwrap()
}

/// Same rows as [`grouped_entity`] with group `a` split around the other groups.
pub fn split_entity() -> Entity {
    Entity::builder()
        .array("orbit_id", vec!["a", "b", "a", "c", "c", "a"])
        .array("x", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
        .index("orbit_id")
        .build()
        .unwrap()
}

/// `n` states at increasing distance along the x axis, one day apart.
pub fn line_coordinates(n: usize) -> CartesianCoordinates {
    let states = DMatrix::from_fn(n, 6, |row, col| {
        if col == 0 {
            row as f64 + 1.0
        } else {
            0.0
        }
    });
    let times = EpochColumn::new(
        (0..n).map(|i| 60000.0 + i as f64).collect(),
        TimeScale::TDB,
    );
    CartesianCoordinates::new(&states, Some(times), "ecliptic").unwrap()
}

pub fn assert_slice_close(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, epsilon = epsilon);
    }
}
