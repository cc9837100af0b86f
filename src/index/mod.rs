//! # Class index and member mapping
//!
//! Every [`Entity`](crate::entity::Entity) keeps two indexes:
//!
//! - the **class index**: the externally facing, ordered set of unique keys. Its size is the
//!   length of the entity.
//! - the **members**: the rows of the underlying columns. Several rows may belong to the same
//!   class-index key (e.g. ten propagated states of the same orbit).
//!
//! ```text
//! class index        : [ "a",  "b",     "c"    ]
//! member rows        : [ 0, 1,  2,  3, 4, 5    ]
//! slice-form mapping : [ 0..2, 2..3, 3..6      ]
//! raw-form mapping   : [ 0, 0, 1, 2, 2, 2      ]   (dense group code per row)
//! ```
//!
//! The mapping is stored in **slice form** whenever every group occupies a contiguous run of
//! rows, which lets a range of class positions be answered with a single fused row range. When
//! any group is split, the whole mapping falls back to **raw form** and queries are answered
//! with a membership test over the per-row group codes.
//!
//! Submodules
//! -----------------
//! * [`builder`] – cardinality validation, dense key encoding, slice-form compression.
//! * [`query`] – translation of a [`Selection`] into a [`MemberSelection`].
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use itertools::Either;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{ClassPosition, MemberPosition},
    value::Value,
};

pub mod builder;
pub mod query;

/// How the class index of an entity is derived.
///
/// Variants
/// -----------------
/// * `Range` – one key per row, `[0, member_length)`.
/// * `Attribute` – the values of the named field; rows sharing a value are grouped.
/// * `Explicit` – one key per row supplied by the caller; same grouping semantics as
///   `Attribute`. The keys travel with their rows through read, delete, sort and
///   concatenation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum IndexSpec {
    #[default]
    Range,
    Attribute(String),
    Explicit(Vec<Value>),
}

impl IndexSpec {
    /// Build an explicit index from any iterable of key-like values.
    pub fn explicit<I, V>(keys: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        IndexSpec::Explicit(keys.into_iter().map(Into::into).collect())
    }

    /// Name of the indexed attribute, if the index was set on a field.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            IndexSpec::Attribute(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for IndexSpec {
    fn from(name: &str) -> Self {
        IndexSpec::Attribute(name.to_string())
    }
}

impl From<String> for IndexSpec {
    fn from(name: String) -> Self {
        IndexSpec::Attribute(name)
    }
}

impl From<Option<&str>> for IndexSpec {
    fn from(name: Option<&str>) -> Self {
        name.map_or(IndexSpec::Range, IndexSpec::from)
    }
}

/// A selection expressed in **class-index** space.
///
/// A single position is always treated as a length-1 range, so reading one element returns an
/// entity of length one instead of collapsing to a scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Position(ClassPosition),
    Range {
        start: Option<ClassPosition>,
        stop: Option<ClassPosition>,
        step: usize,
    },
    Positions(Vec<ClassPosition>),
}

impl Selection {
    /// A range with an explicit step, e.g. every other class position.
    pub fn stepped(range: Range<ClassPosition>, step: usize) -> Self {
        Selection::Range {
            start: Some(range.start),
            stop: Some(range.end),
            step,
        }
    }
}

impl From<usize> for Selection {
    fn from(position: usize) -> Self {
        Selection::Position(position)
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Selection::stepped(range, 1)
    }
}

impl From<RangeInclusive<usize>> for Selection {
    fn from(range: RangeInclusive<usize>) -> Self {
        Selection::Range {
            start: Some(*range.start()),
            stop: range.end().checked_add(1),
            step: 1,
        }
    }
}

impl From<RangeFrom<usize>> for Selection {
    fn from(range: RangeFrom<usize>) -> Self {
        Selection::Range {
            start: Some(range.start),
            stop: None,
            step: 1,
        }
    }
}

impl From<RangeTo<usize>> for Selection {
    fn from(range: RangeTo<usize>) -> Self {
        Selection::Range {
            start: None,
            stop: Some(range.end),
            step: 1,
        }
    }
}

impl From<RangeFull> for Selection {
    fn from(_: RangeFull) -> Self {
        Selection::Range {
            start: None,
            stop: None,
            step: 1,
        }
    }
}

impl From<Vec<usize>> for Selection {
    fn from(positions: Vec<usize>) -> Self {
        Selection::Positions(positions)
    }
}

impl From<&[usize]> for Selection {
    fn from(positions: &[usize]) -> Self {
        Selection::Positions(positions.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Selection {
    fn from(positions: [usize; N]) -> Self {
        Selection::Positions(positions.to_vec())
    }
}

/// A selection resolved into **member-row** space.
///
/// `Range` is the fused form produced when the requested class positions cover a single
/// contiguous run of rows; `Positions` lists the rows one by one, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSelection {
    Range(Range<MemberPosition>),
    Positions(Vec<MemberPosition>),
}

impl MemberSelection {
    pub fn len(&self) -> usize {
        match self {
            MemberSelection::Range(r) => r.len(),
            MemberSelection::Positions(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` when the selection is a single fused row range.
    pub fn is_fused(&self) -> bool {
        matches!(self, MemberSelection::Range(_))
    }

    /// Iterate over the selected rows, in output order.
    pub fn iter(&self) -> impl Iterator<Item = MemberPosition> + '_ {
        match self {
            MemberSelection::Range(r) => Either::Left(r.clone()),
            MemberSelection::Positions(p) => Either::Right(p.iter().copied()),
        }
    }

    /// Materialize the selected rows as explicit positions.
    pub fn to_positions(&self) -> Vec<MemberPosition> {
        self.iter().collect()
    }

    /// Copy the selected elements out of `values`.
    pub fn gather<T: Clone>(&self, values: &[T]) -> Vec<T> {
        match self {
            MemberSelection::Range(r) => values[r.clone()].to_vec(),
            MemberSelection::Positions(p) => p.iter().map(|&i| values[i].clone()).collect(),
        }
    }

    /// Per-row mask of the rows that survive a deletion of this selection.
    ///
    /// Duplicated positions are removed once; the relative order of the remaining rows is
    /// untouched.
    pub fn keep_mask(&self, member_length: usize) -> Vec<bool> {
        let mut keep = vec![true; member_length];
        match self {
            MemberSelection::Range(r) => keep[r.clone()].fill(false),
            MemberSelection::Positions(p) => p.iter().for_each(|&i| keep[i] = false),
        }
        keep
    }
}

/// Drop the elements of `values` whose mask entry is `false`, preserving order.
pub(crate) fn retain_by_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut mask = keep.iter();
    values.retain(|_| mask.next().copied().unwrap_or(true));
}

/// Association between class-index positions and member rows.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberMapping {
    /// One contiguous row range per class-index position.
    Slices(Vec<Range<MemberPosition>>),
    /// Dense group code of every row; code `k` belongs to class position `k`.
    Raw(Vec<usize>),
}

impl MemberMapping {
    pub fn is_slice_form(&self) -> bool {
        matches!(self, MemberMapping::Slices(_))
    }
}

/// Resolved index of an entity.
///
/// Fields
/// -----------------
/// * `spec` – where the keys come from; reused on every rebuild.
/// * `keys` – unique class-index keys, in order of first occurrence.
/// * `mapping` – slice-form or raw-form association of keys to rows.
/// * `member_length` – common length of every sliceable field.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexState {
    pub(crate) spec: IndexSpec,
    pub(crate) keys: Vec<Value>,
    pub(crate) mapping: MemberMapping,
    pub(crate) member_length: usize,
}

impl IndexState {
    pub fn spec(&self) -> &IndexSpec {
        &self.spec
    }

    pub fn keys(&self) -> &[Value] {
        &self.keys
    }

    pub fn mapping(&self) -> &MemberMapping {
        &self.mapping
    }

    pub fn member_length(&self) -> usize {
        self.member_length
    }

    /// Number of class-index positions.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
