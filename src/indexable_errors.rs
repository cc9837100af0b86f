use thiserror::Error;

use crate::field::FieldKind;

#[derive(Error, Debug)]
pub enum IndexableError {
    #[error("All sliceable members must have the same length, found: {0}")]
    Cardinality(String),

    #[error("Index {index} is out of bounds for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Field '{name}' of kind {kind} is not supported by {operation}")]
    UnsupportedField {
        name: String,
        kind: FieldKind,
        operation: &'static str,
    },

    #[error("Inconsistent entities: {0}")]
    Consistency(String),

    #[error("{0} attribute could not be found")]
    FieldNotFound(String),

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Cannot concatenate an empty sequence of entities")]
    EmptyConcatenation,

    #[error("Sort specification mismatch: {by} keys but {ascending} ascending flags")]
    SortSpecMismatch { by: usize, ascending: usize },

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Ephemeris kernel not found at: {0}")]
    KernelNotFound(String),
}

impl PartialEq for IndexableError {
    fn eq(&self, other: &Self) -> bool {
        use IndexableError::*;
        match (self, other) {
            (Cardinality(a), Cardinality(b)) => a == b,
            (OutOfRange { index: a, len: la }, OutOfRange { index: b, len: lb }) => {
                a == b && la == lb
            }
            (InvalidSelection(a), InvalidSelection(b)) => a == b,
            (
                UnsupportedField {
                    name: a,
                    kind: ka,
                    operation: oa,
                },
                UnsupportedField {
                    name: b,
                    kind: kb,
                    operation: ob,
                },
            ) => a == b && ka == kb && oa == ob,
            (Consistency(a), Consistency(b)) => a == b,
            (FieldNotFound(a), FieldNotFound(b)) => a == b,
            (DuplicateField(a), DuplicateField(b)) => a == b,
            (InvalidShape(a), InvalidShape(b)) => a == b,
            (KernelNotFound(a), KernelNotFound(b)) => a == b,
            (
                SortSpecMismatch {
                    by: a,
                    ascending: aa,
                },
                SortSpecMismatch {
                    by: b,
                    ascending: ab,
                },
            ) => a == b && aa == ab,

            // Unit variants
            (EmptyConcatenation, EmptyConcatenation) => true,

            _ => false,
        }
    }
}
