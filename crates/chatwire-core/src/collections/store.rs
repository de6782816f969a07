//! Insertion-ordered keyed store
//!
//! The session mirror keeps every entity collection in a `Store`: a Vec-backed
//! sequence indexed by the entity's identity. Iteration order is insertion
//! order, and `update` replaces a value without moving it, so code walking the
//! store mid-update never observes reordering artifacts.

use crate::value_objects::Snowflake;

/// Entities stored in a [`Store`] expose their primary discriminator
pub trait Keyed {
    /// The identity this entity is indexed under
    fn key(&self) -> Snowflake;
}

/// Insertion-ordered collection keyed by entity identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store<T> {
    items: Vec<T>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> Store<T> {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity if its key is absent
    ///
    /// Idempotent: re-adding an entity with an existing key is a no-op and
    /// returns the already-stored value.
    pub fn add(&mut self, entity: T) -> &T {
        match self.position(entity.key()) {
            Some(idx) => &self.items[idx],
            None => {
                self.items.push(entity);
                self.items.last().expect("just pushed")
            }
        }
    }

    /// Look up an entity by identity
    #[must_use]
    pub fn get(&self, id: Snowflake) -> Option<&T> {
        self.items.iter().find(|e| e.key() == id)
    }

    /// Look up an entity by identity, mutably
    pub fn get_mut(&mut self, id: Snowflake) -> Option<&mut T> {
        self.items.iter_mut().find(|e| e.key() == id)
    }

    /// Position of an entity in the ordered sequence
    #[must_use]
    pub fn position(&self, id: Snowflake) -> Option<usize> {
        self.items.iter().position(|e| e.key() == id)
    }

    /// Check whether an identity is present
    #[must_use]
    pub fn contains(&self, id: Snowflake) -> bool {
        self.position(id).is_some()
    }

    /// Remove an entity by identity, returning it if it was present
    pub fn remove(&mut self, id: Snowflake) -> Option<T> {
        self.position(id).map(|idx| self.items.remove(idx))
    }

    /// Replace the entity stored under `id`, preserving its position
    ///
    /// Silent no-op returning `false` when `id` is no longer present.
    pub fn update(&mut self, id: Snowflake, new: T) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.items[idx] = new;
                true
            }
            None => false,
        }
    }

    /// Iterate entities in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate entities in insertion order, mutably
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Number of stored entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every entity matching the predicate
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(f);
    }
}

impl<'a, T: Keyed> IntoIterator for &'a Store<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Keyed> FromIterator<T> for Store<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut store = Store::new();
        for item in iter {
            store.add(item);
        }
        store
    }
}
