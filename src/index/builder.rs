//! # Index builder
//!
//! Derives an [`IndexState`] from the fields of an entity and an [`IndexSpec`]:
//!
//! 1. [`check_member_validity`] computes the common length of every sliceable and nested field.
//! 2. The raw keys (one per row) are encoded as dense integer codes in order of first
//!    occurrence, which also yields the unique class-index keys.
//! 3. [`group_into_slices`] tries to compress the codes into one contiguous row range per key;
//!    a single split group switches the whole mapping to raw form.
use std::{borrow::Cow, ops::Range};

use ahash::RandomState;

use crate::{
    constants::{FastHashMap, MemberPosition},
    field::Field,
    index::{IndexSpec, IndexState, MemberMapping, MemberSelection},
    indexable_errors::IndexableError,
    value::Value,
};

/// Scan the sliceable members and return their common length.
///
/// Arguments
/// -----------------
/// * `fields`: named fields of the entity, in declaration order.
///
/// Return
/// ----------
/// * The length shared by every sliceable-array and nested-entity field.
///
/// Errors
/// ----------
/// * [`IndexableError::Cardinality`] if the lengths differ or no field is sliceable.
pub fn check_member_validity(fields: &[(String, Field)]) -> Result<usize, IndexableError> {
    let lengths: Vec<(&str, usize)> = fields
        .iter()
        .filter_map(|(name, field)| field.member_len().map(|len| (name.as_str(), len)))
        .collect();

    let Some(&(_, member_length)) = lengths.first() else {
        return Err(IndexableError::Cardinality(
            "no sliceable member to derive a length from".into(),
        ));
    };

    if lengths.iter().any(|&(_, len)| len != member_length) {
        let detail = lengths
            .iter()
            .map(|(name, len)| format!("{name}={len}"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(IndexableError::Cardinality(detail));
    }

    Ok(member_length)
}

/// Encode `raw` as dense integer codes, assigned in order of first occurrence.
///
/// Return
/// ----------
/// * `(unique, codes)` where `unique[codes[row]] == raw[row]` for every row.
pub(crate) fn encode_first_occurrence(raw: &[Value]) -> (Vec<Value>, Vec<usize>) {
    let mut lookup: FastHashMap<&Value, usize> =
        FastHashMap::with_capacity_and_hasher(raw.len(), RandomState::default());
    let mut unique = Vec::new();

    let codes = raw
        .iter()
        .map(|value| {
            *lookup.entry(value).or_insert_with(|| {
                unique.push(value.clone());
                unique.len() - 1
            })
        })
        .collect();

    (unique, codes)
}

/// Convert dense first-occurrence codes into one row range per code.
///
/// Returns `None` as soon as a group is found to be split over non-consecutive rows. Groups of
/// size one are trivially contiguous.
pub(crate) fn group_into_slices(codes: &[usize], n_groups: usize) -> Option<Vec<Range<usize>>> {
    let mut slices: Vec<Range<usize>> = Vec::with_capacity(n_groups);

    for (row, &code) in codes.iter().enumerate() {
        if code == slices.len() {
            slices.push(row..row + 1);
        } else if code + 1 == slices.len() && slices[code].end == row {
            slices[code].end += 1;
        } else {
            return None;
        }
    }

    Some(slices)
}

/// Unique keys and slice-form (or raw-form) mapping of one key per row.
fn derive_mapping(row_keys: &[Value]) -> (Vec<Value>, MemberMapping) {
    let (keys, codes) = encode_first_occurrence(row_keys);

    let mapping = match group_into_slices(&codes, keys.len()) {
        Some(slices) => {
            tracing::debug!(
                groups = keys.len(),
                rows = row_keys.len(),
                "class index values are grouped, mapping stored as slices"
            );
            MemberMapping::Slices(slices)
        }
        None => {
            tracing::debug!(
                groups = keys.len(),
                rows = row_keys.len(),
                "class index values are not grouped, mapping stored as raw codes"
            );
            MemberMapping::Raw(codes)
        }
    };

    (keys, mapping)
}

impl IndexState {
    /// Default index: one key per row.
    pub(crate) fn range(member_length: usize) -> Self {
        IndexState {
            spec: IndexSpec::Range,
            keys: (0..member_length).map(Value::from).collect(),
            mapping: MemberMapping::Slices((0..member_length).map(|i| i..i + 1).collect()),
            member_length,
        }
    }

    /// Build the index from one raw key per row.
    ///
    /// `spec` is stored as-is and is expected to describe where `row_keys` came from.
    pub(crate) fn from_row_keys(spec: IndexSpec, row_keys: &[Value]) -> Self {
        let (keys, mapping) = derive_mapping(row_keys);
        IndexState {
            spec,
            keys,
            mapping,
            member_length: row_keys.len(),
        }
    }

    /// Explicit index owning its per-row keys.
    pub(crate) fn explicit(row_keys: Vec<Value>) -> Self {
        let (keys, mapping) = derive_mapping(&row_keys);
        IndexState {
            member_length: row_keys.len(),
            spec: IndexSpec::Explicit(row_keys),
            keys,
            mapping,
        }
    }

    /// Build the index described by `spec`.
    ///
    /// Arguments
    /// -----------------
    /// * `spec`: index source.
    /// * `member_length`: common length already validated by [`check_member_validity`].
    /// * `attribute_keys`: values of the named field when `spec` is an attribute.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Cardinality`] if explicit or attribute keys do not have one entry per
    ///   row.
    /// * [`IndexableError::FieldNotFound`] if `spec` names an attribute but no values were given.
    pub(crate) fn build(
        spec: IndexSpec,
        member_length: usize,
        attribute_keys: Option<Vec<Value>>,
    ) -> Result<Self, IndexableError> {
        let check_length = |len: usize| {
            if len == member_length {
                Ok(())
            } else {
                Err(IndexableError::Cardinality(format!(
                    "index has {len} keys but members have length {member_length}"
                )))
            }
        };

        match (spec, attribute_keys) {
            (IndexSpec::Range, _) => Ok(IndexState::range(member_length)),
            (IndexSpec::Explicit(keys), _) => {
                check_length(keys.len())?;
                Ok(IndexState::explicit(keys))
            }
            (spec @ IndexSpec::Attribute(_), Some(keys)) => {
                check_length(keys.len())?;
                Ok(IndexState::from_row_keys(spec, &keys))
            }
            (IndexSpec::Attribute(name), None) => Err(IndexableError::FieldNotFound(name)),
        }
    }

    /// Dense group code of every row.
    pub(crate) fn row_codes(&self) -> Cow<'_, [usize]> {
        match &self.mapping {
            MemberMapping::Raw(codes) => Cow::Borrowed(codes),
            MemberMapping::Slices(slices) => {
                let mut codes = vec![0; self.member_length];
                for (code, rows) in slices.iter().enumerate() {
                    codes[rows.clone()].fill(code);
                }
                Cow::Owned(codes)
            }
        }
    }

    /// Keys of the given rows, in the given order.
    fn keys_of_rows<I>(&self, rows: I) -> Vec<Value>
    where
        I: IntoIterator<Item = MemberPosition>,
    {
        let codes = self.row_codes();
        rows.into_iter()
            .map(|row| self.keys[codes[row]].clone())
            .collect()
    }

    /// Index of the entity obtained by keeping only `members`, in selection order.
    ///
    /// The grouping is recomputed from the keys of the kept rows, so the derived copy keeps the
    /// index source of its parent without looking its attribute up again.
    pub(crate) fn take(&self, members: &MemberSelection) -> IndexState {
        match &self.spec {
            IndexSpec::Range => IndexState::range(members.len()),
            IndexSpec::Explicit(keys) => IndexState::explicit(members.gather(keys)),
            IndexSpec::Attribute(_) => {
                let kept = self.keys_of_rows(members.iter());
                IndexState::from_row_keys(self.spec.clone(), &kept)
            }
        }
    }

    /// Index of the entity obtained by dropping every row whose `keep` entry is `false`.
    pub(crate) fn retain(&self, keep: &[bool]) -> IndexState {
        let kept_rows = keep
            .iter()
            .enumerate()
            .filter_map(|(row, &k)| k.then_some(row));

        match &self.spec {
            IndexSpec::Range => IndexState::range(keep.iter().filter(|&&k| k).count()),
            IndexSpec::Explicit(keys) => {
                IndexState::explicit(kept_rows.map(|row| keys[row].clone()).collect())
            }
            IndexSpec::Attribute(_) => {
                let kept = self.keys_of_rows(kept_rows);
                IndexState::from_row_keys(self.spec.clone(), &kept)
            }
        }
    }
}
