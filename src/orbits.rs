//! # Orbits
//!
//! [`Orbits`] pairs each Cartesian state with an orbit identifier and an object
//! identifier. The states live in a nested [`CartesianCoordinates`] entity, so every read,
//! delete, sort or concatenation of the orbits slices the coordinates in lock-step.
//!
//! When identifiers are not supplied, orbit ids default to the integer range `0..n` and object
//! ids to the string `"None"`. Both can be replaced (length-checked) or reset to these defaults.
use crate::{
    coordinates::CartesianCoordinates,
    entity::{record::Indexable, Entity},
    field::ArrayColumn,
    indexable_errors::IndexableError,
};

const ORBIT_IDS: &str = "orbit_ids";
const OBJECT_IDS: &str = "object_ids";
const COORDINATES: &str = "coordinates";

/// Object id used when none is known.
pub const UNKNOWN_OBJECT_ID: &str = "None";

fn default_orbit_ids(n: usize) -> ArrayColumn {
    ArrayColumn::Int((0..n as i64).collect())
}

fn default_object_ids(n: usize) -> ArrayColumn {
    ArrayColumn::Str(vec![UNKNOWN_OBJECT_ID.to_string(); n])
}

#[derive(Debug, Clone, PartialEq)]
pub struct Orbits {
    entity: Entity,
}

impl Orbits {
    /// Build orbits around `coordinates`.
    ///
    /// Arguments
    /// -----------------
    /// * `coordinates`: one state per orbit.
    /// * `orbit_ids`: orbit identifiers, `0..n` when `None`.
    /// * `object_ids`: object identifiers, `"None"` when `None`.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Cardinality`] if the identifiers do not have one entry per state.
    pub fn new(
        coordinates: CartesianCoordinates,
        orbit_ids: Option<ArrayColumn>,
        object_ids: Option<ArrayColumn>,
    ) -> Result<Self, IndexableError> {
        let n = coordinates.entity().member_length();

        let orbit_ids = orbit_ids.unwrap_or_else(|| default_orbit_ids(n));
        let object_ids = object_ids.unwrap_or_else(|| default_object_ids(n));

        let entity = Entity::builder()
            .array(ORBIT_IDS, orbit_ids)
            .array(OBJECT_IDS, object_ids)
            .nested(COORDINATES, coordinates.into())
            .build()?;

        Ok(Orbits { entity })
    }

    /// Validate that `entity` has the layout of [`Orbits`].
    pub fn from_entity(entity: Entity) -> Result<Self, IndexableError> {
        entity.array(ORBIT_IDS)?;
        entity.array(OBJECT_IDS)?;
        CartesianCoordinates::from_entity(entity.nested(COORDINATES)?.clone())?;
        Ok(Orbits { entity })
    }

    pub fn orbit_ids(&self) -> Result<&ArrayColumn, IndexableError> {
        self.entity.array(ORBIT_IDS)
    }

    pub fn object_ids(&self) -> Result<&ArrayColumn, IndexableError> {
        self.entity.array(OBJECT_IDS)
    }

    /// Copy of the nested coordinates.
    pub fn coordinates(&self) -> Result<CartesianCoordinates, IndexableError> {
        Ok(CartesianCoordinates::wrap(
            self.entity.nested(COORDINATES)?.clone(),
        ))
    }

    /// Replace the orbit ids; the index is rebuilt if it is set on them.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Cardinality`] if `orbit_ids` does not have one entry per orbit.
    pub fn set_orbit_ids(
        &mut self,
        orbit_ids: impl Into<ArrayColumn>,
    ) -> Result<(), IndexableError> {
        self.entity.set_field(ORBIT_IDS, orbit_ids.into())
    }

    /// Go back to the `0..n` orbit ids.
    pub fn reset_orbit_ids(&mut self) -> Result<(), IndexableError> {
        let n = self.entity.member_length();
        self.entity.set_field(ORBIT_IDS, default_orbit_ids(n))
    }

    /// Replace the object ids.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Cardinality`] if `object_ids` does not have one entry per orbit.
    pub fn set_object_ids(
        &mut self,
        object_ids: impl Into<ArrayColumn>,
    ) -> Result<(), IndexableError> {
        self.entity.set_field(OBJECT_IDS, object_ids.into())
    }

    pub fn reset_object_ids(&mut self) -> Result<(), IndexableError> {
        let n = self.entity.member_length();
        self.entity.set_field(OBJECT_IDS, default_object_ids(n))
    }
}

impl Indexable for Orbits {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn wrap(entity: Entity) -> Self {
        Orbits { entity }
    }
}

#[cfg(test)]
mod orbits_test {
    use super::*;
    use crate::value::Value;
    use hifitime::TimeScale;
    use nalgebra::DMatrix;

    use crate::time::EpochColumn;

    fn coordinates(n: usize) -> CartesianCoordinates {
        let states = DMatrix::from_fn(n, 6, |row, col| (row * 10 + col) as f64);
        let times = EpochColumn::new(
            (0..n).map(|i| 60000.0 + i as f64).collect(),
            TimeScale::TDB,
        );
        CartesianCoordinates::new(&states, Some(times), "ecliptic").unwrap()
    }

    #[test]
    fn test_default_ids() {
        let orbits = Orbits::new(coordinates(3), None, None).unwrap();
        assert_eq!(
            orbits.orbit_ids().unwrap(),
            &ArrayColumn::from(vec![0_i64, 1, 2])
        );
        assert_eq!(
            orbits.object_ids().unwrap(),
            &ArrayColumn::from(vec!["None", "None", "None"])
        );
    }

    #[test]
    fn test_id_setters_are_validated() {
        let mut orbits = Orbits::new(coordinates(3), None, None).unwrap();
        orbits.set_index(ORBIT_IDS).unwrap();

        orbits.set_orbit_ids(vec!["a", "b", "b"]).unwrap();
        assert_eq!(orbits.index(), &[Value::from("a"), Value::from("b")]);

        let err = orbits.set_orbit_ids(vec!["a"]).unwrap_err();
        assert!(matches!(err, IndexableError::Cardinality(_)));
        assert_eq!(orbits.len(), 2);

        orbits.reset_orbit_ids().unwrap();
        assert_eq!(orbits.len(), 3);

        orbits.set_object_ids(vec!["2013 RR165", "Eros", "Ceres"]).unwrap();
        assert!(orbits.set_object_ids(vec!["Eros"]).is_err());
        orbits.reset_object_ids().unwrap();
        assert_eq!(
            orbits.object_ids().unwrap().value(2),
            Some(Value::from(UNKNOWN_OBJECT_ID))
        );
    }

    #[test]
    fn test_coordinates_follow_orbits() {
        let mut orbits = Orbits::new(
            coordinates(4),
            Some(ArrayColumn::from(vec!["o1", "o2", "o1", "o3"])),
            None,
        )
        .unwrap();
        orbits.set_index(ORBIT_IDS).unwrap();

        let o1 = orbits.get(0).unwrap();
        assert_eq!(o1.coordinates().unwrap().x().unwrap(), &[0.0, 20.0]);
        assert_eq!(
            o1.coordinates().unwrap().times().unwrap().mjd(),
            &[60000.0, 60002.0]
        );

        orbits.delete(0).unwrap();
        assert_eq!(
            orbits.coordinates().unwrap().x().unwrap(),
            &[10.0, 30.0]
        );
        assert!(Orbits::from_entity(orbits.entity().clone()).is_ok());

        let sorted = orbits.sort_values(&["x"], &[false]).unwrap();
        assert_eq!(
            sorted.orbit_ids().unwrap(),
            &ArrayColumn::from(vec!["o3", "o2"])
        );
    }
}
