//! Element and chunk iterators.
//!
//! Both iterators borrow the entity and own their cursor, so any number of them can walk the
//! same entity independently.
use std::iter::FusedIterator;

use crate::{
    constants::ClassPosition,
    entity::Entity,
    field::Sliceable,
    indexable_errors::IndexableError,
};

/// Yields one length-1 entity per class-index position.
#[derive(Debug, Clone)]
pub struct EntityIter<'a> {
    entity: &'a Entity,
    position: ClassPosition,
    end: ClassPosition,
}

impl Iterator for EntityIter<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.end {
            return None;
        }
        let members = self
            .entity
            .index
            .resolve_valid_range(self.position, self.position + 1, 1);
        self.position += 1;
        Some(self.entity.take(&members))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EntityIter<'_> {}
impl FusedIterator for EntityIter<'_> {}

/// Yields consecutive sub-entities of at most `size` class-index positions.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    entity: &'a Entity,
    position: ClassPosition,
    size: usize,
}

impl Iterator for Chunks<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.entity.len();
        if self.position >= len {
            return None;
        }
        let stop = (self.position + self.size).min(len);
        let members = self.entity.index.resolve_valid_range(self.position, stop, 1);
        self.position = stop;
        Some(self.entity.take(&members))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.entity.len() - self.position).div_ceil(self.size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}
impl FusedIterator for Chunks<'_> {}

impl Entity {
    pub fn iter(&self) -> EntityIter<'_> {
        EntityIter {
            entity: self,
            position: 0,
            end: self.len(),
        }
    }

    /// Lazily split the entity into chunks of `chunk_size` class-index positions; the last
    /// chunk may be shorter.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::InvalidSelection`] if `chunk_size` is zero.
    pub fn yield_chunks(&self, chunk_size: usize) -> Result<Chunks<'_>, IndexableError> {
        if chunk_size == 0 {
            return Err(IndexableError::InvalidSelection(
                "chunk size must be strictly positive".into(),
            ));
        }
        Ok(Chunks {
            entity: self,
            position: 0,
            size: chunk_size,
        })
    }
}

impl<'a> IntoIterator for &'a Entity {
    type Item = Entity;
    type IntoIter = EntityIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
