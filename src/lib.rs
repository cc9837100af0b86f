pub mod constants;
pub mod coordinates;
pub mod entity;
pub mod field;
pub mod index;
pub mod indexable_errors;
pub mod kernels;
pub mod orbits;
pub mod time;
pub mod value;

pub use entity::{
    concat::concatenate,
    record::{concatenate_records, Indexable},
    Entity, EntityBuilder,
};
pub use field::{ArrayColumn, Field, FieldKind, MaskedColumn, OpaqueValue, Sliceable};
pub use index::{IndexSpec, MemberMapping, MemberSelection, Selection};
pub use indexable_errors::IndexableError;
pub use time::{EpochColumn, TimeFormat};
pub use value::Value;
