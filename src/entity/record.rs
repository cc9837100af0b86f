//! # Typed records
//!
//! Domain types such as [`Orbits`](crate::orbits::Orbits) or
//! [`CartesianCoordinates`](crate::coordinates::CartesianCoordinates) are thin wrappers around
//! an [`Entity`] with a fixed schema. Implementing [`Indexable`] gives them every structural
//! operation of the core (read, delete, sort, iteration, chunking, concatenation) while
//! returning the typed wrapper instead of a bare entity.
use crate::{
    entity::{concat::concatenate, iter::Chunks, Entity},
    index::{IndexSpec, Selection},
    indexable_errors::IndexableError,
    value::Value,
};

pub trait Indexable: Sized {
    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    /// Wrap an entity derived from a record of this type (read, sort, concatenation), which
    /// therefore already has the expected schema.
    fn wrap(entity: Entity) -> Self;

    fn len(&self) -> usize {
        self.entity().len()
    }

    fn is_empty(&self) -> bool {
        self.entity().is_empty()
    }

    fn index(&self) -> &[Value] {
        self.entity().index()
    }

    fn set_index(&mut self, spec: impl Into<IndexSpec>) -> Result<(), IndexableError> {
        self.entity_mut().set_index(spec)
    }

    fn reset_index(&mut self) {
        self.entity_mut().reset_index()
    }

    fn get(&self, selection: impl Into<Selection>) -> Result<Self, IndexableError> {
        self.entity().get(selection).map(Self::wrap)
    }

    fn delete(&mut self, selection: impl Into<Selection>) -> Result<(), IndexableError> {
        self.entity_mut().delete(selection)
    }

    fn sort_values(&self, by: &[&str], ascending: &[bool]) -> Result<Self, IndexableError> {
        self.entity().sort_values(by, ascending).map(Self::wrap)
    }

    fn sort_values_in_place(
        &mut self,
        by: &[&str],
        ascending: &[bool],
    ) -> Result<(), IndexableError> {
        self.entity_mut().sort_values_in_place(by, ascending)
    }

    fn iter(&self) -> RecordIter<'_, Self> {
        RecordIter {
            inner: Box::new(self.entity().iter()),
            wrap: Self::wrap,
        }
    }

    fn yield_chunks(&self, chunk_size: usize) -> Result<RecordIter<'_, Self>, IndexableError> {
        let chunks: Chunks<'_> = self.entity().yield_chunks(chunk_size)?;
        Ok(RecordIter {
            inner: Box::new(chunks),
            wrap: Self::wrap,
        })
    }
}

/// Iterator over typed elements or chunks of a record.
pub struct RecordIter<'a, T> {
    inner: Box<dyn Iterator<Item = Entity> + 'a>,
    wrap: fn(Entity) -> T,
}

impl<T> Iterator for RecordIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(self.wrap)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Concatenate typed records end-to-end.
///
/// See [`concatenate`] for the failure modes.
pub fn concatenate_records<'a, T, I>(records: I) -> Result<T, IndexableError>
where
    T: Indexable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    concatenate(records.into_iter().map(Indexable::entity)).map(T::wrap)
}
