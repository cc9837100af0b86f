//! # Sorting
//!
//! Stable multi-key sort of the member rows of an entity.
//!
//! Sort keys are looked up on the entity first, then on its nested entities (the first one
//! carrying a field of that name wins). Masked keys sort on their filled values and temporal
//! keys on their MJD values. `NaN` keys always sort last, whatever the direction.
use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::{
    constants::MemberPosition,
    entity::Entity,
    field::{Field, Sliceable},
    index::MemberSelection,
    indexable_errors::IndexableError,
    value::Value,
};

/// One key column and its direction.
type SortKeys = SmallVec<[(Vec<Value>, bool); 4]>;

fn compare_keys(a: &Value, b: &Value, ascending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if ascending => a.cmp(b),
        (false, false) => b.cmp(a),
    }
}

impl Entity {
    /// Row values of the sort key `name`, on this entity or on its first nested entity
    /// carrying it.
    fn sort_key(&self, name: &str) -> Result<Vec<Value>, IndexableError> {
        if let Some(field) = self.field(name) {
            return field.row_values(name, "sort");
        }

        self.fields
            .iter()
            .find_map(|(_, field)| match field {
                Field::Nested(nested) => nested.field(name),
                _ => None,
            })
            .ok_or_else(|| IndexableError::FieldNotFound(name.to_string()))?
            .row_values(name, "sort")
    }

    /// Member-row order that sorts the entity by `by`.
    ///
    /// Arguments
    /// -----------------
    /// * `by`: key names, most significant first.
    /// * `ascending`: one flag per key, a single flag applied to every key, or empty for an
    ///   ascending sort on every key.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::InvalidSelection`] if `by` is empty.
    /// * [`IndexableError::SortSpecMismatch`] if the flags cannot be matched with the keys.
    /// * [`IndexableError::FieldNotFound`] / [`IndexableError::UnsupportedField`] for keys that
    ///   are missing or not scalar.
    pub fn argsort(
        &self,
        by: &[&str],
        ascending: &[bool],
    ) -> Result<Vec<MemberPosition>, IndexableError> {
        if by.is_empty() {
            return Err(IndexableError::InvalidSelection(
                "at least one sort key is required".into(),
            ));
        }

        let direction = |i: usize| match ascending.len() {
            0 => Ok(true),
            1 => Ok(ascending[0]),
            n if n == by.len() => Ok(ascending[i]),
            n => Err(IndexableError::SortSpecMismatch {
                by: by.len(),
                ascending: n,
            }),
        };

        let keys = by
            .iter()
            .enumerate()
            .map(|(i, name)| -> Result<_, IndexableError> {
                Ok((self.sort_key(name)?, direction(i)?))
            })
            .collect::<Result<SortKeys, _>>()?;

        let mut order: Vec<MemberPosition> = (0..self.member_length()).collect();
        order.sort_by(|&a, &b| {
            keys.iter()
                .map(|(values, asc)| compare_keys(&values[a], &values[b], *asc))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        tracing::debug!(keys = by.len(), rows = order.len(), "sorted member rows");

        Ok(order)
    }

    /// Copy of the entity sorted by `by`; the index source is kept.
    ///
    /// See [`Entity::argsort`] for the arguments and failure modes.
    pub fn sort_values(&self, by: &[&str], ascending: &[bool]) -> Result<Entity, IndexableError> {
        let order = self.argsort(by, ascending)?;
        Ok(self.take(&MemberSelection::Positions(order)))
    }

    /// Sort the entity in place by `by`; the entity is unchanged on error.
    pub fn sort_values_in_place(
        &mut self,
        by: &[&str],
        ascending: &[bool],
    ) -> Result<(), IndexableError> {
        *self = self.sort_values(by, ascending)?;
        Ok(())
    }
}
