//! Storage abstraction for positioned entities.
//!
//! The reindexing engine never touches a concrete map. It reads through
//! [`EntityStore`] and writes every change of one operation as a single
//! [`ChangeSet`], which the store must apply all-or-nothing. [`MemStore`] is
//! the in-memory implementation used by the server and by tests.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::BoardError;

/// Errors reported by a store backend.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend failed to read or write.
    #[error("store backend failure: {0}")]
    Backend(String),
    /// No identifiers are left to assign.
    #[error("identifier space exhausted")]
    IdsExhausted,
}

/// An entity with a rank inside some ordering scope (its container).
pub trait Positioned: Clone + fmt::Debug {
    /// Identifier type, convertible to and from its raw `u32`.
    type Id: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + From<u32> + Into<u32>;
    /// Ordering scope; positions are contiguous per container.
    type Container: Copy + Eq + Hash + fmt::Debug;

    /// Returns the identifier.
    fn id(&self) -> Self::Id;
    /// Returns the container this entity is ranked in.
    fn container(&self) -> Self::Container;
    /// Returns the zero-based rank.
    fn position(&self) -> u32;
    /// Overwrites the rank.
    fn set_position(&mut self, position: u32);
    /// Error reported when `id` does not exist.
    fn not_found(id: Self::Id) -> BoardError;
}

/// A positioned entity that can change container.
pub trait Relocatable: Positioned {
    /// Moves the entity to another container without touching its rank.
    fn set_container(&mut self, container: Self::Container);
}

/// Writes produced by one engine operation.
///
/// Deletes are applied before puts. A later put of the same id wins.
#[derive(Debug, Clone)]
pub struct ChangeSet<E: Positioned> {
    puts: Vec<E>,
    deletes: Vec<E::Id>,
}

impl<E: Positioned> Default for ChangeSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Positioned> ChangeSet<E> {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            puts: Vec::new(),
            deletes: Vec::new(),
        }
    }

    /// Records an insert or overwrite.
    pub fn put(&mut self, entity: E) {
        self.puts.push(entity);
    }

    /// Records a removal.
    pub fn delete(&mut self, id: E::Id) {
        self.deletes.push(id);
    }

    /// Returns `true` if nothing would be written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.deletes.is_empty()
    }

    /// Number of recorded writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.puts.len() + self.deletes.len()
    }

    /// Splits into `(puts, deletes)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<E>, Vec<E::Id>) {
        (self.puts, self.deletes)
    }
}

/// Repository of positioned entities.
///
/// `list` must return a container's entities ordered by position, ties
/// broken by id. `commit` must apply the whole change set or none of it.
pub trait EntityStore<E: Positioned> {
    /// Returns every entity in `container`, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list(&self, container: E::Container) -> Result<Vec<E>, StoreError>;

    /// Returns every stored entity in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list_all(&self) -> Result<Vec<E>, StoreError>;

    /// Looks up one entity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn get(&self, id: E::Id) -> Result<Option<E>, StoreError>;

    /// Reserves the next identifier. Identifiers are never reused.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IdsExhausted`] once the id space is used up.
    fn next_id(&mut self) -> Result<E::Id, StoreError>;

    /// Applies a change set atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails; nothing is applied then.
    fn commit(&mut self, changes: ChangeSet<E>) -> Result<(), StoreError>;

    /// Inserts or overwrites one entity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn put(&mut self, entity: E) -> Result<(), StoreError> {
        let mut changes = ChangeSet::new();
        changes.put(entity);
        self.commit(changes)
    }

    /// Removes one entity. Removing a missing id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn delete(&mut self, id: E::Id) -> Result<(), StoreError> {
        let mut changes = ChangeSet::new();
        changes.delete(id);
        self.commit(changes)
    }
}

/// In-memory [`EntityStore`] keyed by id with a monotonic id counter.
///
/// Not synchronized; callers wrap the owning board in a lock.
#[derive(Debug, Clone)]
pub struct MemStore<E: Positioned> {
    entities: HashMap<E::Id, E>,
    next_id: u32,
}

impl<E: Positioned> Default for MemStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Positioned> MemStore<E> {
    /// Creates an empty store whose first id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates a store pre-filled with `entities`.
    ///
    /// The id counter continues after the highest seeded id. Positions are
    /// taken as given.
    #[must_use]
    pub fn with_entities(entities: impl IntoIterator<Item = E>) -> Self {
        let entities: HashMap<E::Id, E> = entities.into_iter().map(|e| (e.id(), e)).collect();
        let next_id = entities
            .keys()
            .map(|id| Into::<u32>::into(*id))
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self { entities, next_id }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entities.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<E: Positioned> EntityStore<E> for MemStore<E> {
    fn list(&self, container: E::Container) -> Result<Vec<E>, StoreError> {
        let mut listed: Vec<E> = self
            .entities
            .values()
            .filter(|e| e.container() == container)
            .cloned()
            .collect();
        listed.sort_by_key(|e| (e.position(), e.id()));
        Ok(listed)
    }

    fn list_all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.entities.values().cloned().collect())
    }

    fn get(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.entities.get(&id).cloned())
    }

    fn next_id(&mut self) -> Result<E::Id, StoreError> {
        if self.next_id == u32::MAX {
            return Err(StoreError::IdsExhausted);
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(E::Id::from(id))
    }

    fn commit(&mut self, changes: ChangeSet<E>) -> Result<(), StoreError> {
        let (puts, deletes) = changes.into_parts();
        for id in deletes {
            self.entities.remove(&id);
        }
        for entity in puts {
            self.entities.insert(entity.id(), entity);
        }
        Ok(())
    }
}
