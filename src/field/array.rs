//! Plain array columns.
//!
//! Scalar columns are stored as `Vec<T>`; multi-dimensional columns (state vectors,
//! flattened covariance matrices) are stored as a [`DMatrix`] whose **rows** are the members.
use nalgebra::DMatrix;

use crate::{
    field::Sliceable,
    index::{retain_by_mask, MemberSelection},
    indexable_errors::IndexableError,
    value::Value,
};

/// An ordered column indexable along its leading axis.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayColumn {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
    /// One member per matrix row.
    Matrix(DMatrix<f64>),
}

impl ArrayColumn {
    /// Name of the element type, used in error messages and headers.
    pub fn dtype(&self) -> &'static str {
        match self {
            ArrayColumn::Bool(_) => "bool",
            ArrayColumn::Int(_) => "int64",
            ArrayColumn::Float(_) => "float64",
            ArrayColumn::Str(_) => "str",
            ArrayColumn::Matrix(_) => "matrix",
        }
    }

    /// Scalar value of row `i`, `None` for matrix columns or out-of-range rows.
    pub fn value(&self, i: usize) -> Option<Value> {
        match self {
            ArrayColumn::Bool(v) => v.get(i).map(|&b| Value::Bool(b)),
            ArrayColumn::Int(v) => v.get(i).map(|&x| Value::Int(x)),
            ArrayColumn::Float(v) => v.get(i).map(|&x| Value::float(x)),
            ArrayColumn::Str(v) => v.get(i).map(|s| Value::Str(s.clone())),
            ArrayColumn::Matrix(_) => None,
        }
    }

    /// All rows as scalar values, `None` for matrix columns.
    pub fn values(&self) -> Option<Vec<Value>> {
        match self {
            ArrayColumn::Matrix(_) => None,
            _ => Some((0..self.len()).filter_map(|i| self.value(i)).collect()),
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            ArrayColumn::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match self {
            ArrayColumn::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&[String]> {
        match self {
            ArrayColumn::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match self {
            ArrayColumn::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            ArrayColumn::Matrix(m) => Some(m),
            _ => None,
        }
    }
}

fn concat_vec<T: Clone>(parts: &[&Vec<T>]) -> Vec<T> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

fn concat_matrix(parts: &[&DMatrix<f64>]) -> Result<DMatrix<f64>, IndexableError> {
    let ncols = parts.first().map_or(0, |m| m.ncols());
    if let Some(bad) = parts.iter().find(|m| m.ncols() != ncols) {
        return Err(IndexableError::Consistency(format!(
            "cannot concatenate matrices with {ncols} and {} columns",
            bad.ncols()
        )));
    }

    let nrows = parts.iter().map(|m| m.nrows()).sum::<usize>();
    let mut values = Vec::with_capacity(nrows * ncols);
    for part in parts {
        values.extend_from_slice(part.transpose().as_slice());
    }
    Ok(DMatrix::from_row_slice(nrows, ncols, &values))
}

fn select_matrix_rows(matrix: &DMatrix<f64>, members: &MemberSelection) -> DMatrix<f64> {
    match members {
        MemberSelection::Range(r) => matrix.rows(r.start, r.len()).into_owned(),
        MemberSelection::Positions(p) => matrix.select_rows(p.iter()),
    }
}

impl Sliceable for ArrayColumn {
    fn len(&self) -> usize {
        match self {
            ArrayColumn::Bool(v) => v.len(),
            ArrayColumn::Int(v) => v.len(),
            ArrayColumn::Float(v) => v.len(),
            ArrayColumn::Str(v) => v.len(),
            ArrayColumn::Matrix(m) => m.nrows(),
        }
    }

    fn take(&self, members: &MemberSelection) -> Self {
        match self {
            ArrayColumn::Bool(v) => ArrayColumn::Bool(members.gather(v)),
            ArrayColumn::Int(v) => ArrayColumn::Int(members.gather(v)),
            ArrayColumn::Float(v) => ArrayColumn::Float(members.gather(v)),
            ArrayColumn::Str(v) => ArrayColumn::Str(members.gather(v)),
            ArrayColumn::Matrix(m) => ArrayColumn::Matrix(select_matrix_rows(m, members)),
        }
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        match self {
            ArrayColumn::Bool(v) => retain_by_mask(v, keep),
            ArrayColumn::Int(v) => retain_by_mask(v, keep),
            ArrayColumn::Float(v) => retain_by_mask(v, keep),
            ArrayColumn::Str(v) => retain_by_mask(v, keep),
            ArrayColumn::Matrix(m) => {
                let kept: Vec<usize> = keep
                    .iter()
                    .enumerate()
                    .filter_map(|(row, &k)| k.then_some(row))
                    .collect();
                *m = m.select_rows(kept.iter());
            }
        }
    }

    fn concat(parts: &[&Self]) -> Result<Self, IndexableError> {
        macro_rules! same_dtype {
            ($variant:ident) => {
                parts
                    .iter()
                    .map(|part| match part {
                        ArrayColumn::$variant(inner) => Some(inner),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
            };
        }

        let Some(first) = parts.first() else {
            return Err(IndexableError::EmptyConcatenation);
        };

        let column = match first {
            ArrayColumn::Bool(_) => same_dtype!(Bool).map(|p| ArrayColumn::Bool(concat_vec(&p))),
            ArrayColumn::Int(_) => same_dtype!(Int).map(|p| ArrayColumn::Int(concat_vec(&p))),
            ArrayColumn::Float(_) => {
                same_dtype!(Float).map(|p| ArrayColumn::Float(concat_vec(&p)))
            }
            ArrayColumn::Str(_) => same_dtype!(Str).map(|p| ArrayColumn::Str(concat_vec(&p))),
            ArrayColumn::Matrix(_) => match same_dtype!(Matrix) {
                Some(p) => Some(ArrayColumn::Matrix(concat_matrix(&p)?)),
                None => None,
            },
        };

        column.ok_or_else(|| {
            IndexableError::Consistency(format!(
                "cannot concatenate {} arrays with arrays of another dtype",
                first.dtype()
            ))
        })
    }
}

impl From<Vec<bool>> for ArrayColumn {
    fn from(v: Vec<bool>) -> Self {
        ArrayColumn::Bool(v)
    }
}

impl From<Vec<i64>> for ArrayColumn {
    fn from(v: Vec<i64>) -> Self {
        ArrayColumn::Int(v)
    }
}

impl From<Vec<f64>> for ArrayColumn {
    fn from(v: Vec<f64>) -> Self {
        ArrayColumn::Float(v)
    }
}

impl From<Vec<String>> for ArrayColumn {
    fn from(v: Vec<String>) -> Self {
        ArrayColumn::Str(v)
    }
}

impl From<Vec<&str>> for ArrayColumn {
    fn from(v: Vec<&str>) -> Self {
        ArrayColumn::Str(v.into_iter().map(String::from).collect())
    }
}

impl From<DMatrix<f64>> for ArrayColumn {
    fn from(m: DMatrix<f64>) -> Self {
        ArrayColumn::Matrix(m)
    }
}

#[cfg(test)]
mod array_test {
    use super::*;

    fn states() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 2, &[1.0, 10.0, 2.0, 20.0, 3.0, 30.0])
    }

    #[test]
    fn test_take_scalar_column() {
        let ids = ArrayColumn::from(vec!["a", "b", "c"]);
        assert_eq!(
            ids.take(&MemberSelection::Positions(vec![2, 0])),
            ArrayColumn::from(vec!["c", "a"])
        );
        assert_eq!(
            ids.take(&MemberSelection::Range(1..3)),
            ArrayColumn::from(vec!["b", "c"])
        );
    }

    #[test]
    fn test_take_matrix_rows() {
        let column = ArrayColumn::from(states());
        let taken = column.take(&MemberSelection::Positions(vec![2, 0]));
        assert_eq!(
            taken,
            ArrayColumn::from(DMatrix::from_row_slice(2, 2, &[3.0, 30.0, 1.0, 10.0]))
        );

        let fused = column.take(&MemberSelection::Range(1..3));
        assert_eq!(
            fused,
            ArrayColumn::from(DMatrix::from_row_slice(2, 2, &[2.0, 20.0, 3.0, 30.0]))
        );
    }

    #[test]
    fn test_retain_rows() {
        let mut column = ArrayColumn::from(states());
        column.retain_rows(&[true, false, true]);
        assert_eq!(
            column,
            ArrayColumn::from(DMatrix::from_row_slice(2, 2, &[1.0, 10.0, 3.0, 30.0]))
        );

        let mut ids = ArrayColumn::from(vec![1_i64, 2, 3]);
        ids.retain_rows(&[false, true, true]);
        assert_eq!(ids, ArrayColumn::from(vec![2_i64, 3]));
    }

    #[test]
    fn test_concat() {
        let a = ArrayColumn::from(vec![1.0, 2.0]);
        let b = ArrayColumn::from(vec![3.0]);
        assert_eq!(
            ArrayColumn::concat(&[&a, &b]).unwrap(),
            ArrayColumn::from(vec![1.0, 2.0, 3.0])
        );

        let m = ArrayColumn::from(states());
        let joined = ArrayColumn::concat(&[&m, &m]).unwrap();
        assert_eq!(joined.len(), 6);
        assert_eq!(joined.as_matrix().unwrap()[(3, 1)], 10.0);

        let ints = ArrayColumn::from(vec![1_i64]);
        assert!(matches!(
            ArrayColumn::concat(&[&a, &ints]),
            Err(IndexableError::Consistency(_))
        ));

        let narrow = ArrayColumn::from(DMatrix::from_row_slice(1, 1, &[0.0]));
        assert!(ArrayColumn::concat(&[&m, &narrow]).is_err());
    }

    #[test]
    fn test_values() {
        let ids = ArrayColumn::from(vec![4_i64, 5]);
        assert_eq!(ids.values(), Some(vec![Value::Int(4), Value::Int(5)]));
        assert_eq!(ArrayColumn::from(states()).values(), None);
    }
}
