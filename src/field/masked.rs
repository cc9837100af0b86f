//! Masked array columns.
//!
//! A [`MaskedColumn`] pairs an [`ArrayColumn`] with a per-row boolean mask (`true` = masked).
//! Every row operation applies to values and mask in lock-step. When a column has to be
//! materialized as plain values (sort keys, index keys, display), masked rows are replaced by
//! the fill value of the column.
use crate::{
    constants::{DEFAULT_FILL_BOOL, DEFAULT_FILL_FLOAT, DEFAULT_FILL_INT, DEFAULT_FILL_STR},
    field::{ArrayColumn, Sliceable},
    index::{retain_by_mask, MemberSelection},
    indexable_errors::IndexableError,
    value::Value,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MaskedColumn {
    values: ArrayColumn,
    mask: Vec<bool>,
    fill_value: Option<Value>,
}

impl MaskedColumn {
    /// Wrap `values` with a per-row `mask`.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Cardinality`] if the mask does not have one entry per row.
    pub fn new(values: ArrayColumn, mask: Vec<bool>) -> Result<Self, IndexableError> {
        if mask.len() != values.len() {
            return Err(IndexableError::Cardinality(format!(
                "values={}, mask={}",
                values.len(),
                mask.len()
            )));
        }

        Ok(MaskedColumn {
            values,
            mask,
            fill_value: None,
        })
    }

    /// A column where no row is masked.
    pub fn unmasked(values: ArrayColumn) -> Self {
        let mask = vec![false; values.len()];
        MaskedColumn {
            values,
            mask,
            fill_value: None,
        }
    }

    /// Override the fill value used when the column is materialized.
    pub fn with_fill_value(mut self, fill_value: impl Into<Value>) -> Self {
        self.fill_value = Some(fill_value.into());
        self
    }

    /// Fill value of the column, falling back to the default of its dtype.
    pub fn fill_value(&self) -> Option<Value> {
        if let Some(fill) = &self.fill_value {
            return Some(fill.clone());
        }
        match &self.values {
            ArrayColumn::Bool(_) => Some(Value::Bool(DEFAULT_FILL_BOOL)),
            ArrayColumn::Int(_) => Some(Value::Int(DEFAULT_FILL_INT)),
            ArrayColumn::Float(_) => Some(Value::float(DEFAULT_FILL_FLOAT)),
            ArrayColumn::Str(_) => Some(Value::from(DEFAULT_FILL_STR)),
            ArrayColumn::Matrix(_) => None,
        }
    }

    pub fn values(&self) -> &ArrayColumn {
        &self.values
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn is_masked(&self, row: usize) -> bool {
        self.mask.get(row).copied().unwrap_or(false)
    }

    pub fn count_masked(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Scalar values with masked rows replaced by the fill value, `None` for matrix columns.
    pub fn filled(&self) -> Option<Vec<Value>> {
        let fill = self.fill_value()?;
        let values = self.values.values()?;
        Some(
            values
                .into_iter()
                .zip(&self.mask)
                .map(|(value, &masked)| if masked { fill.clone() } else { value })
                .collect(),
        )
    }
}

impl Sliceable for MaskedColumn {
    fn len(&self) -> usize {
        self.mask.len()
    }

    fn take(&self, members: &MemberSelection) -> Self {
        MaskedColumn {
            values: self.values.take(members),
            mask: members.gather(&self.mask),
            fill_value: self.fill_value.clone(),
        }
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        self.values.retain_rows(keep);
        retain_by_mask(&mut self.mask, keep);
    }

    /// The fill value of the first part is kept.
    fn concat(parts: &[&Self]) -> Result<Self, IndexableError> {
        let Some(first) = parts.first() else {
            return Err(IndexableError::EmptyConcatenation);
        };

        let values: Vec<&ArrayColumn> = parts.iter().map(|p| &p.values).collect();
        let mask = parts.iter().flat_map(|p| p.mask.iter().copied()).collect();

        Ok(MaskedColumn {
            values: ArrayColumn::concat(&values)?,
            mask,
            fill_value: first.fill_value.clone(),
        })
    }
}
