//! # Fields and field classification
//!
//! An entity is a set of named [`Field`]s. Each field belongs to exactly one [`FieldKind`],
//! fixed when the field is created:
//!
//! | Kind        | Type                                  | Row cardinality | Read / delete / concat      |
//! |-------------|---------------------------------------|-----------------|-----------------------------|
//! | `Array`     | [`ArrayColumn`]                       | yes             | gathered along rows         |
//! | `Masked`    | [`MaskedColumn`]                      | yes             | values and mask in lock-step|
//! | `Temporal`  | [`EpochColumn`](crate::time::EpochColumn) | yes         | via MJD, scale preserved    |
//! | `Nested`    | [`Entity`]                            | yes             | recursive                   |
//! | `Opaque`    | [`OpaqueValue`]                       | no              | shared; must match on concat|
//!
//! Every row-carrying kind implements [`Sliceable`]; [`Field`] dispatches to it with a single
//! match per operation.
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use itertools::Itertools;

use crate::{
    entity::Entity,
    index::MemberSelection,
    indexable_errors::IndexableError,
    time::EpochColumn,
    value::Value,
};

pub mod array;
pub mod masked;

pub use array::ArrayColumn;
pub use masked::MaskedColumn;

/// Row-level operations shared by every column kind.
pub trait Sliceable: Sized {
    /// Number of rows along the leading axis.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the selected rows, in selection order.
    fn take(&self, members: &MemberSelection) -> Self;

    /// Drop every row whose `keep` entry is `false`, in place.
    fn retain_rows(&mut self, keep: &[bool]);

    /// Concatenate `parts` along the row axis, in order.
    fn concat(parts: &[&Self]) -> Result<Self, IndexableError>;
}

/// Classification of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Array,
    Masked,
    Temporal,
    Nested,
    Opaque,
}

impl FieldKind {
    /// `true` for kinds that carry one element per row.
    pub fn is_sliceable(&self) -> bool {
        !matches!(self, FieldKind::Opaque)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Array => "array",
            FieldKind::Masked => "masked array",
            FieldKind::Temporal => "temporal",
            FieldKind::Nested => "nested entity",
            FieldKind::Opaque => "opaque",
        };
        write!(f, "{name}")
    }
}

/// A value shared by every row of an entity (frame name, configuration flags, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum OpaqueValue {
    Null,
    Scalar(Value),
    Set(BTreeSet<Value>),
    Map(BTreeMap<String, Value>),
}

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueValue::Null => write!(f, "None"),
            OpaqueValue::Scalar(v) => write!(f, "{v}"),
            OpaqueValue::Set(set) => write!(f, "{{{}}}", set.iter().join(", ")),
            OpaqueValue::Map(map) => write!(
                f,
                "{{{}}}",
                map.iter().map(|(k, v)| format!("{k}: {v}")).join(", ")
            ),
        }
    }
}

impl From<Value> for OpaqueValue {
    fn from(value: Value) -> Self {
        OpaqueValue::Scalar(value)
    }
}

impl From<&str> for OpaqueValue {
    fn from(value: &str) -> Self {
        OpaqueValue::Scalar(Value::from(value))
    }
}

impl From<String> for OpaqueValue {
    fn from(value: String) -> Self {
        OpaqueValue::Scalar(Value::from(value))
    }
}

impl From<f64> for OpaqueValue {
    fn from(value: f64) -> Self {
        OpaqueValue::Scalar(Value::from(value))
    }
}

impl From<i64> for OpaqueValue {
    fn from(value: i64) -> Self {
        OpaqueValue::Scalar(Value::from(value))
    }
}

impl From<bool> for OpaqueValue {
    fn from(value: bool) -> Self {
        OpaqueValue::Scalar(Value::from(value))
    }
}

/// A named member of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Array(ArrayColumn),
    Masked(MaskedColumn),
    Temporal(EpochColumn),
    Nested(Box<Entity>),
    Opaque(OpaqueValue),
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Array(_) => FieldKind::Array,
            Field::Masked(_) => FieldKind::Masked,
            Field::Temporal(_) => FieldKind::Temporal,
            Field::Nested(_) => FieldKind::Nested,
            Field::Opaque(_) => FieldKind::Opaque,
        }
    }

    /// Row count of a sliceable field, `None` for opaque values.
    ///
    /// Nested entities contribute their member length, not the length of their class index.
    pub fn member_len(&self) -> Option<usize> {
        match self {
            Field::Array(a) => Some(a.len()),
            Field::Masked(m) => Some(m.len()),
            Field::Temporal(t) => Some(t.len()),
            Field::Nested(e) => Some(e.member_length()),
            Field::Opaque(_) => None,
        }
    }

    pub(crate) fn take(&self, members: &MemberSelection) -> Field {
        match self {
            Field::Array(a) => Field::Array(a.take(members)),
            Field::Masked(m) => Field::Masked(m.take(members)),
            Field::Temporal(t) => Field::Temporal(t.take(members)),
            Field::Nested(e) => Field::Nested(Box::new(e.take(members))),
            Field::Opaque(o) => Field::Opaque(o.clone()),
        }
    }

    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        match self {
            Field::Array(a) => a.retain_rows(keep),
            Field::Masked(m) => m.retain_rows(keep),
            Field::Temporal(t) => t.retain_rows(keep),
            Field::Nested(e) => e.retain_rows(keep),
            Field::Opaque(_) => {}
        }
    }

    /// Concatenate the same field taken from several entities.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Consistency`] if the parts are of different kinds, if opaque values
    ///   differ, or if the column-level concatenation rejects the parts.
    pub(crate) fn concat(name: &str, parts: &[&Field]) -> Result<Field, IndexableError> {
        let Some(first) = parts.first() else {
            return Err(IndexableError::EmptyConcatenation);
        };

        let mismatch = || {
            IndexableError::Consistency(format!(
                "field '{name}' does not have the same kind in every entity"
            ))
        };

        let field = match first {
            Field::Array(_) => Field::Array(ArrayColumn::concat(
                &same_kind(parts, |f| match f {
                    Field::Array(a) => Some(a),
                    _ => None,
                })
                .ok_or_else(mismatch)?,
            )?),
            Field::Masked(_) => Field::Masked(MaskedColumn::concat(
                &same_kind(parts, |f| match f {
                    Field::Masked(m) => Some(m),
                    _ => None,
                })
                .ok_or_else(mismatch)?,
            )?),
            Field::Temporal(_) => Field::Temporal(EpochColumn::concat(
                &same_kind(parts, |f| match f {
                    Field::Temporal(t) => Some(t),
                    _ => None,
                })
                .ok_or_else(mismatch)?,
            )?),
            Field::Nested(_) => Field::Nested(Box::new(Entity::concat(
                &same_kind(parts, |f| match f {
                    Field::Nested(e) => Some(&**e),
                    _ => None,
                })
                .ok_or_else(mismatch)?,
            )?)),
            Field::Opaque(value) => {
                for part in &parts[1..] {
                    match part {
                        Field::Opaque(other) if other == value => {}
                        Field::Opaque(_) => {
                            return Err(IndexableError::Consistency(format!(
                                "opaque field '{name}' differs between entities"
                            )))
                        }
                        _ => return Err(mismatch()),
                    }
                }
                Field::Opaque(value.clone())
            }
        };

        Ok(field)
    }

    /// One comparable value per row, used to derive index keys and sort keys.
    ///
    /// Masked columns produce their filled values and temporal columns their MJD values.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::UnsupportedField`] for matrix columns, nested entities and opaque
    ///   values.
    pub(crate) fn row_values(
        &self,
        name: &str,
        operation: &'static str,
    ) -> Result<Vec<Value>, IndexableError> {
        let values = match self {
            Field::Array(a) => a.values(),
            Field::Masked(m) => m.filled(),
            Field::Temporal(t) => Some(t.mjd().iter().map(|&mjd| Value::float(mjd)).collect()),
            Field::Nested(_) | Field::Opaque(_) => None,
        };

        values.ok_or_else(|| IndexableError::UnsupportedField {
            name: name.to_string(),
            kind: self.kind(),
            operation,
        })
    }
}

/// Borrow the inner column of every part, or `None` if one part is of another kind.
fn same_kind<'a, T, F>(parts: &[&'a Field], pick: F) -> Option<Vec<&'a T>>
where
    F: Fn(&'a Field) -> Option<&'a T>,
{
    parts.iter().map(|&part| pick(part)).collect()
}

impl From<ArrayColumn> for Field {
    fn from(column: ArrayColumn) -> Self {
        Field::Array(column)
    }
}

impl From<MaskedColumn> for Field {
    fn from(column: MaskedColumn) -> Self {
        Field::Masked(column)
    }
}

impl From<EpochColumn> for Field {
    fn from(column: EpochColumn) -> Self {
        Field::Temporal(column)
    }
}

impl From<Entity> for Field {
    fn from(entity: Entity) -> Self {
        Field::Nested(Box::new(entity))
    }
}

impl From<OpaqueValue> for Field {
    fn from(value: OpaqueValue) -> Self {
        Field::Opaque(value)
    }
}
