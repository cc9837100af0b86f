//! # Indexed entities
//!
//! An [`Entity`] is an ordered set of named [`Field`]s sharing one row cardinality, together
//! with the [`IndexState`] that maps its externally visible class index onto those rows.
//!
//! Every structural operation keeps the fields in lock-step and leaves a valid index behind:
//!
//! | Operation                              | Fields                         | Index                         |
//! |----------------------------------------|--------------------------------|-------------------------------|
//! | [`get`](Entity::get)                   | gathered into a copy           | rebuilt on the copy           |
//! | [`delete`](Entity::delete)             | rows dropped in place          | rebuilt from the same source  |
//! | [`concatenate`](concat::concatenate)   | joined end-to-end              | rebuilt from the first source |
//! | [`sort_values`](Entity::sort_values)   | permuted                       | rebuilt from the same source  |
//!
//! Submodules
//! -----------------
//! * [`concat`] – concatenation of same-shaped entities.
//! * [`sort`] – stable multi-key sort.
//! * [`iter`] – element and chunk iterators.
//! * [`record`] – the [`Indexable`](record::Indexable) trait implemented by typed records.
//! * `display` – `comfy-table` rendering, behind the `display` feature.
use crate::{
    field::{ArrayColumn, Field, FieldKind, MaskedColumn, OpaqueValue, Sliceable},
    index::{
        builder::check_member_validity, IndexSpec, IndexState, MemberMapping, MemberSelection,
        Selection,
    },
    indexable_errors::IndexableError,
    time::EpochColumn,
    value::Value,
};

pub mod concat;
#[cfg(feature = "display")]
pub mod display;
pub mod iter;
pub mod record;
pub mod sort;

/// A collection of equal-cardinality fields addressed through a class index.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    fields: Vec<(String, Field)>,
    index: IndexState,
}

/// Fluent constructor for [`Entity`].
///
/// Fields keep their declaration order. Validation is deferred to [`EntityBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct EntityBuilder {
    fields: Vec<(String, Field)>,
    index: IndexSpec,
}

impl EntityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.push((name.into(), field.into()));
        self
    }

    pub fn array(self, name: impl Into<String>, column: impl Into<ArrayColumn>) -> Self {
        self.field(name, column.into())
    }

    pub fn masked(self, name: impl Into<String>, column: MaskedColumn) -> Self {
        self.field(name, column)
    }

    pub fn temporal(self, name: impl Into<String>, column: EpochColumn) -> Self {
        self.field(name, column)
    }

    pub fn nested(self, name: impl Into<String>, entity: Entity) -> Self {
        self.field(name, entity)
    }

    pub fn opaque(self, name: impl Into<String>, value: impl Into<OpaqueValue>) -> Self {
        self.field(name, value.into())
    }

    /// Index used once the entity is built, the default range when not called.
    pub fn index(mut self, spec: impl Into<IndexSpec>) -> Self {
        self.index = spec.into();
        self
    }

    /// Validate the fields and build the index.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::DuplicateField`] if two fields share a name.
    /// * [`IndexableError::Cardinality`] if sliceable members differ in length.
    /// * [`IndexableError::FieldNotFound`] / [`IndexableError::UnsupportedField`] if the index
    ///   names a missing or non-scalar field.
    pub fn build(self) -> Result<Entity, IndexableError> {
        Entity::from_fields(self.fields, self.index)
    }
}

impl Entity {
    pub fn builder() -> EntityBuilder {
        EntityBuilder::new()
    }

    /// Build an entity from its fields and index source.
    ///
    /// See [`EntityBuilder::build`] for the failure modes.
    pub fn from_fields(
        fields: Vec<(String, Field)>,
        spec: impl Into<IndexSpec>,
    ) -> Result<Self, IndexableError> {
        for (i, (name, _)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(other, _)| other == name) {
                return Err(IndexableError::DuplicateField(name.clone()));
            }
        }

        let member_length = check_member_validity(&fields)?;
        let spec = spec.into();
        let attribute_keys = attribute_keys(&fields, &spec)?;
        let index = IndexState::build(spec, member_length, attribute_keys)?;

        Ok(Entity { fields, index })
    }

    /// Number of class-index positions.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Common row count of every sliceable field.
    pub fn member_length(&self) -> usize {
        self.index.member_length()
    }

    /// Unique class-index keys, in order of first occurrence.
    pub fn index(&self) -> &[Value] {
        self.index.keys()
    }

    pub fn index_spec(&self) -> &IndexSpec {
        self.index.spec()
    }

    /// Name of the indexed field, `None` for range and explicit indexes.
    pub fn index_attribute(&self) -> Option<&str> {
        self.index.spec().attribute()
    }

    pub fn mapping(&self) -> &MemberMapping {
        self.index.mapping()
    }

    pub fn index_state(&self) -> &IndexState {
        &self.index
    }

    /// Replace the class index.
    ///
    /// The entity is left untouched when the new index cannot be built.
    pub fn set_index(&mut self, spec: impl Into<IndexSpec>) -> Result<(), IndexableError> {
        let spec = spec.into();
        let attribute_keys = attribute_keys(&self.fields, &spec)?;
        self.index = IndexState::build(spec, self.member_length(), attribute_keys)?;
        Ok(())
    }

    /// Go back to the default range index.
    pub fn reset_index(&mut self) {
        self.index = IndexState::range(self.member_length());
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find_map(|(n, field)| (n == name).then_some(field))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Name and kind of every field, in declaration order.
    pub fn schema(&self) -> Vec<(&str, FieldKind)> {
        self.fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.kind()))
            .collect()
    }

    fn require(&self, name: &str) -> Result<&Field, IndexableError> {
        self.field(name)
            .ok_or_else(|| IndexableError::FieldNotFound(name.to_string()))
    }

    fn wrong_kind(name: &str, field: &Field, operation: &'static str) -> IndexableError {
        IndexableError::UnsupportedField {
            name: name.to_string(),
            kind: field.kind(),
            operation,
        }
    }

    pub fn array(&self, name: &str) -> Result<&ArrayColumn, IndexableError> {
        match self.require(name)? {
            Field::Array(column) => Ok(column),
            other => Err(Self::wrong_kind(name, other, "array access")),
        }
    }

    pub fn masked(&self, name: &str) -> Result<&MaskedColumn, IndexableError> {
        match self.require(name)? {
            Field::Masked(column) => Ok(column),
            other => Err(Self::wrong_kind(name, other, "masked array access")),
        }
    }

    pub fn temporal(&self, name: &str) -> Result<&EpochColumn, IndexableError> {
        match self.require(name)? {
            Field::Temporal(column) => Ok(column),
            other => Err(Self::wrong_kind(name, other, "temporal access")),
        }
    }

    pub fn nested(&self, name: &str) -> Result<&Entity, IndexableError> {
        match self.require(name)? {
            Field::Nested(entity) => Ok(entity),
            other => Err(Self::wrong_kind(name, other, "nested entity access")),
        }
    }

    pub fn opaque(&self, name: &str) -> Result<&OpaqueValue, IndexableError> {
        match self.require(name)? {
            Field::Opaque(value) => Ok(value),
            other => Err(Self::wrong_kind(name, other, "opaque access")),
        }
    }

    /// Add a field, or replace the field of the same name, then rebuild the index.
    ///
    /// The entity is left untouched on error.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Cardinality`] if the new field does not have one row per member.
    /// * Any error raised while re-deriving an attribute index from the new values.
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        field: impl Into<Field>,
    ) -> Result<(), IndexableError> {
        let name = name.into();
        let mut fields = self.fields.clone();
        match fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = field.into(),
            None => fields.push((name, field.into())),
        }

        *self = Entity::from_fields(fields, self.index.spec().clone())?;
        Ok(())
    }

    /// One comparable value per row of the scalar field `name`.
    pub fn key_values(&self, name: &str) -> Result<Vec<Value>, IndexableError> {
        self.require(name)?.row_values(name, "index")
    }

    /// Member rows covered by a class-index selection.
    pub fn resolve(
        &self,
        selection: impl Into<Selection>,
    ) -> Result<MemberSelection, IndexableError> {
        self.index.resolve(&selection.into())
    }

    /// Copy of the elements covered by `selection`.
    ///
    /// A single position yields an entity of length one. The copy inherits the index source of
    /// `self`.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::OutOfRange`] / [`IndexableError::InvalidSelection`] if the selection
    ///   cannot be resolved.
    pub fn get(&self, selection: impl Into<Selection>) -> Result<Entity, IndexableError> {
        let members = self.resolve(selection)?;
        Ok(self.take(&members))
    }

    /// Remove the elements covered by `selection`, in place.
    ///
    /// The selection is fully resolved before any field is touched, so a failed delete leaves
    /// the entity unchanged.
    pub fn delete(&mut self, selection: impl Into<Selection>) -> Result<(), IndexableError> {
        let members = self.resolve(selection)?;
        let keep = members.keep_mask(self.member_length());

        tracing::debug!(
            rows = self.member_length(),
            deleted = keep.iter().filter(|&&k| !k).count(),
            "deleting member rows"
        );

        self.retain_rows(&keep);
        Ok(())
    }
}

/// Values of the indexed field when `spec` names one.
fn attribute_keys(
    fields: &[(String, Field)],
    spec: &IndexSpec,
) -> Result<Option<Vec<Value>>, IndexableError> {
    let Some(name) = spec.attribute() else {
        return Ok(None);
    };

    let field = fields
        .iter()
        .find_map(|(n, field)| (n == name).then_some(field))
        .ok_or_else(|| IndexableError::FieldNotFound(name.to_string()))?;

    field.row_values(name, "set_index").map(Some)
}

impl Sliceable for Entity {
    /// Member length; [`Entity::len`] is the length of the class index.
    fn len(&self) -> usize {
        self.member_length()
    }

    fn take(&self, members: &MemberSelection) -> Self {
        Entity {
            fields: self
                .fields
                .iter()
                .map(|(name, field)| (name.clone(), field.take(members)))
                .collect(),
            index: self.index.take(members),
        }
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        for (_, field) in self.fields.iter_mut() {
            field.retain_rows(keep);
        }
        self.index = self.index.retain(keep);
    }

    fn concat(parts: &[&Self]) -> Result<Self, IndexableError> {
        concat::concatenate(parts.iter().copied())
    }
}
