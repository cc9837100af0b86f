//! # Cartesian state vectors
//!
//! [`CartesianCoordinates`] is an [`Indexable`] record holding one heliocentric (or other
//! origin) Cartesian state per row:
//!
//! | Field          | Kind     | Content                                              |
//! |----------------|----------|------------------------------------------------------|
//! | `x`, `y`, `z`  | array    | position components (AU)                             |
//! | `vx`,`vy`,`vz` | array    | velocity components (AU/day)                         |
//! | `times`        | temporal | epoch of each state, optional                        |
//! | `covariances`  | masked   | flattened 6×6 covariance per row (36 columns), optional |
//! | `origin`       | array    | origin code of each state, optional                  |
//! | `frame`        | opaque   | reference frame name shared by every row             |
//!
//! No frame or representation transform lives here; the type only exposes the states as
//! `nalgebra` vectors and matrices.
use nalgebra::{DMatrix, Matrix6, Vector3};

use crate::{
    entity::{record::Indexable, Entity},
    field::{ArrayColumn, Field, FieldKind, MaskedColumn, OpaqueValue},
    indexable_errors::IndexableError,
    time::EpochColumn,
};

/// Names of the six state components, in state-vector order.
pub const STATE_COMPONENTS: [&str; 6] = ["x", "y", "z", "vx", "vy", "vz"];

/// Number of entries of a flattened 6×6 covariance matrix.
const COVARIANCE_SIZE: usize = 36;

#[derive(Debug, Clone, PartialEq)]
pub struct CartesianCoordinates {
    entity: Entity,
}

impl CartesianCoordinates {
    /// Build coordinates from an `n × 6` state matrix.
    ///
    /// Arguments
    /// -----------------
    /// * `states`: one `[x, y, z, vx, vy, vz]` state per row.
    /// * `times`: epoch of each state, if known.
    /// * `frame`: name of the reference frame (e.g. `"ecliptic"`).
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::InvalidShape`] if `states` does not have six columns.
    /// * [`IndexableError::Cardinality`] if `times` does not have one epoch per state.
    pub fn new(
        states: &DMatrix<f64>,
        times: Option<EpochColumn>,
        frame: &str,
    ) -> Result<Self, IndexableError> {
        if states.ncols() != STATE_COMPONENTS.len() {
            return Err(IndexableError::InvalidShape(format!(
                "states must have {} columns, found {}",
                STATE_COMPONENTS.len(),
                states.ncols()
            )));
        }

        let mut builder = Entity::builder();
        for (i, name) in STATE_COMPONENTS.iter().enumerate() {
            builder = builder.array(*name, states.column(i).iter().copied().collect::<Vec<_>>());
        }
        if let Some(times) = times {
            builder = builder.temporal("times", times);
        }

        Ok(CartesianCoordinates {
            entity: builder.opaque("frame", frame).build()?,
        })
    }

    /// Validate that `entity` carries the state components and a frame.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::FieldNotFound`] / [`IndexableError::UnsupportedField`] if a
    ///   component is missing or is not a float array, or if the frame is missing.
    pub fn from_entity(entity: Entity) -> Result<Self, IndexableError> {
        for name in STATE_COMPONENTS {
            if entity.array(name)?.as_f64().is_none() {
                return Err(IndexableError::UnsupportedField {
                    name: name.to_string(),
                    kind: FieldKind::Array,
                    operation: "state component",
                });
            }
        }
        entity.opaque("frame")?;
        Ok(CartesianCoordinates { entity })
    }

    /// Attach flattened covariance matrices, one 36-column row per state.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::InvalidShape`] if the rows are not flattened 6×6 matrices.
    /// * [`IndexableError::Cardinality`] if there is not one covariance per state.
    pub fn with_covariances(mut self, covariances: MaskedColumn) -> Result<Self, IndexableError> {
        match covariances.values().as_matrix() {
            Some(m) if m.ncols() == COVARIANCE_SIZE => {}
            _ => {
                return Err(IndexableError::InvalidShape(format!(
                    "covariances must be stored as rows of {COVARIANCE_SIZE} values"
                )))
            }
        }
        self.entity.set_field("covariances", covariances)?;
        Ok(self)
    }

    /// Attach the origin code of each state.
    pub fn with_origin(mut self, origin: Vec<&str>) -> Result<Self, IndexableError> {
        self.entity.set_field("origin", ArrayColumn::from(origin))?;
        Ok(self)
    }

    /// Values of the state component `name`.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::FieldNotFound`] if the component was removed.
    /// * [`IndexableError::UnsupportedField`] if it was replaced by a non-float column.
    fn component(&self, name: &str) -> Result<&[f64], IndexableError> {
        self.entity
            .array(name)?
            .as_f64()
            .ok_or_else(|| IndexableError::UnsupportedField {
                name: name.to_string(),
                kind: FieldKind::Array,
                operation: "state component",
            })
    }

    pub fn x(&self) -> Result<&[f64], IndexableError> {
        self.component("x")
    }

    pub fn y(&self) -> Result<&[f64], IndexableError> {
        self.component("y")
    }

    pub fn z(&self) -> Result<&[f64], IndexableError> {
        self.component("z")
    }

    pub fn vx(&self) -> Result<&[f64], IndexableError> {
        self.component("vx")
    }

    pub fn vy(&self) -> Result<&[f64], IndexableError> {
        self.component("vy")
    }

    pub fn vz(&self) -> Result<&[f64], IndexableError> {
        self.component("vz")
    }

    pub fn times(&self) -> Option<&EpochColumn> {
        self.entity.temporal("times").ok()
    }

    pub fn frame(&self) -> Option<&str> {
        match self.entity.opaque("frame") {
            Ok(OpaqueValue::Scalar(value)) => value.as_str(),
            _ => None,
        }
    }

    pub fn origin(&self) -> Option<&[String]> {
        self.entity.array("origin").ok().and_then(ArrayColumn::as_str)
    }

    /// Vector made of the components `names` at member row `row`.
    fn vector(&self, names: [&str; 3], row: usize) -> Result<Vector3<f64>, IndexableError> {
        let len = self.entity.member_length();
        if row >= len {
            return Err(IndexableError::OutOfRange { index: row, len });
        }
        let [a, b, c] = names;
        Ok(Vector3::new(
            self.component(a)?[row],
            self.component(b)?[row],
            self.component(c)?[row],
        ))
    }

    /// Position of member row `row`.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::OutOfRange`] if `row` is not a member row.
    pub fn position(&self, row: usize) -> Result<Vector3<f64>, IndexableError> {
        self.vector(["x", "y", "z"], row)
    }

    /// Velocity of member row `row`.
    pub fn velocity(&self, row: usize) -> Result<Vector3<f64>, IndexableError> {
        self.vector(["vx", "vy", "vz"], row)
    }

    /// `n × 6` matrix of every state, one row per member.
    pub fn states(&self) -> Result<DMatrix<f64>, IndexableError> {
        let columns = STATE_COMPONENTS
            .iter()
            .map(|name| self.component(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DMatrix::from_fn(
            self.entity.member_length(),
            columns.len(),
            |row, col| columns[col][row],
        ))
    }

    /// Distance of every state from its origin.
    pub fn r_mag(&self) -> Result<Vec<f64>, IndexableError> {
        let (x, y, z) = (self.x()?, self.y()?, self.z()?);
        let r_mag = x
            .iter()
            .zip(y)
            .zip(z)
            .map(|((x, y), z)| Vector3::new(*x, *y, *z).norm())
            .collect();
        Ok(r_mag)
    }

    /// Covariance of member row `row`, `None` if absent or masked.
    pub fn covariance(&self, row: usize) -> Option<Matrix6<f64>> {
        let covariances = self.entity.masked("covariances").ok()?;
        if covariances.is_masked(row) {
            return None;
        }
        let matrix = covariances.values().as_matrix()?;
        if row >= matrix.nrows() {
            return None;
        }
        Some(Matrix6::from_row_iterator(matrix.row(row).iter().copied()))
    }

    /// 1-σ uncertainty of each component for member row `row`.
    pub fn sigmas(&self, row: usize) -> Option<[f64; 6]> {
        let covariance = self.covariance(row)?;
        Some(std::array::from_fn(|i| covariance[(i, i)].sqrt()))
    }
}

impl Indexable for CartesianCoordinates {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn wrap(entity: Entity) -> Self {
        CartesianCoordinates { entity }
    }
}

impl From<CartesianCoordinates> for Entity {
    fn from(coordinates: CartesianCoordinates) -> Self {
        coordinates.entity
    }
}
