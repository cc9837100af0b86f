//! # Query engine
//!
//! Translates a [`Selection`] in class-index space into a [`MemberSelection`] in member-row
//! space.
//!
//! Resolution paths
//! -----------------
//! * **Slice form + range** – the row ranges covered by the requested class positions are
//!   fused into one range when they are pairwise consecutive. Member arrays are usually much
//!   longer than the class index (many rows per key), so this turns an `O(rows)` gather into an
//!   `O(1)` range descriptor. Non-consecutive ranges (stepped selections) are expanded row by
//!   row.
//! * **Slice form + list** – row ranges of each listed position, in list order. When every group
//!   has size one the positions are used directly.
//! * **Raw form** – membership test of the per-row group codes against the requested keys; rows
//!   come back in their original order.
//!
//! Every path returns rows in **member-row space**.
use crate::{
    constants::{ClassPosition, MemberPosition},
    index::{IndexState, MemberMapping, MemberSelection, Selection},
    indexable_errors::IndexableError,
};

impl IndexState {
    /// Resolve a class-index selection into member rows.
    ///
    /// Arguments
    /// -----------------
    /// * `selection`: single position, range or list of class-index positions.
    ///
    /// Return
    /// ----------
    /// * The member rows covered by the selection.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::OutOfRange`] if a range starts at or beyond the length of the index,
    ///   or if a listed position is beyond it.
    /// * [`IndexableError::InvalidSelection`] for a zero step.
    pub fn resolve(&self, selection: &Selection) -> Result<MemberSelection, IndexableError> {
        match selection {
            Selection::Position(position) => {
                self.resolve_range(Some(*position), Some(position.saturating_add(1)), 1)
            }
            Selection::Range { start, stop, step } => self.resolve_range(*start, *stop, *step),
            Selection::Positions(positions) => self.resolve_positions(positions),
        }
    }

    fn resolve_range(
        &self,
        start: Option<ClassPosition>,
        stop: Option<ClassPosition>,
        step: usize,
    ) -> Result<MemberSelection, IndexableError> {
        if step == 0 {
            return Err(IndexableError::InvalidSelection(
                "slice step cannot be zero".into(),
            ));
        }

        let len = self.len();
        if let Some(start) = start {
            if start >= len {
                return Err(IndexableError::OutOfRange { index: start, len });
            }
        }

        let start = start.unwrap_or(0);
        let stop = stop.unwrap_or(len).min(len);
        if stop <= start {
            return Ok(MemberSelection::Positions(Vec::new()));
        }

        Ok(self.resolve_valid_range(start, stop, step))
    }

    /// Resolve `start..stop` stepped by `step`, all assumed within bounds.
    pub(crate) fn resolve_valid_range(
        &self,
        start: ClassPosition,
        stop: ClassPosition,
        step: usize,
    ) -> MemberSelection {
        match &self.mapping {
            MemberMapping::Slices(slices) => {
                let covered: Vec<_> = slices[start..stop].iter().step_by(step).collect();
                let consecutive = covered.windows(2).all(|pair| pair[0].end == pair[1].start);

                match (covered.first(), covered.last()) {
                    (Some(first), Some(last)) if consecutive => {
                        tracing::trace!(
                            start = first.start,
                            end = last.end,
                            "slices are consecutive, fused into a single member range"
                        );
                        MemberSelection::Range(first.start..last.end)
                    }
                    _ => {
                        tracing::trace!(
                            slices = covered.len(),
                            "slices are not consecutive, concatenating member rows"
                        );
                        MemberSelection::Positions(
                            covered.into_iter().flat_map(|rows| rows.clone()).collect(),
                        )
                    }
                }
            }
            MemberMapping::Raw(codes) => self.membership(codes, (start..stop).step_by(step)),
        }
    }

    fn resolve_positions(
        &self,
        positions: &[ClassPosition],
    ) -> Result<MemberSelection, IndexableError> {
        let len = self.len();
        if let Some(&index) = positions.iter().find(|&&p| p >= len) {
            return Err(IndexableError::OutOfRange { index, len });
        }

        let members = match &self.mapping {
            MemberMapping::Slices(_) if self.member_length == len => {
                tracing::trace!("using class positions to index member rows directly");
                MemberSelection::Positions(positions.to_vec())
            }
            MemberMapping::Slices(slices) => MemberSelection::Positions(
                positions.iter().flat_map(|&p| slices[p].clone()).collect(),
            ),
            MemberMapping::Raw(codes) => self.membership(codes, positions.iter().copied()),
        };

        Ok(members)
    }

    /// Rows whose group code is one of `requested`, in original row order.
    fn membership<I>(&self, codes: &[usize], requested: I) -> MemberSelection
    where
        I: IntoIterator<Item = ClassPosition>,
    {
        let mut wanted = vec![false; self.len()];
        for position in requested {
            wanted[position] = true;
        }

        tracing::trace!(
            rows = codes.len(),
            "using unique class index to select member rows by membership"
        );

        MemberSelection::Positions(
            codes
                .iter()
                .enumerate()
                .filter_map(|(row, &code)| wanted[code].then_some(row as MemberPosition))
                .collect(),
        )
    }
}
