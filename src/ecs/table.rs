//! Sparse-set component table
//!
//! Rows are densely packed for iteration; a sparse index maps entity ids to
//! dense slots. Removal swaps the last row into the hole, so iteration order
//! is insertion order until the first removal.

use super::Entity;

const VACANT: u32 = u32::MAX;

#[derive(Clone, Debug)]
pub struct Table<T> {
    sparse: Vec<u32>,
    ids: Vec<Entity>,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self { sparse: Vec::new(), ids: Vec::new(), rows: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    fn slot(&self, id: Entity) -> Option<usize> {
        match self.sparse.get(id as usize) {
            Some(&s) if s != VACANT => Some(s as usize),
            _ => None,
        }
    }

    #[inline]
    pub fn contains(&self, id: Entity) -> bool {
        self.slot(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: Entity) -> Option<&T> {
        self.slot(id).map(|s| &self.rows[s])
    }

    #[inline]
    pub fn get_mut(&mut self, id: Entity) -> Option<&mut T> {
        match self.slot(id) {
            Some(s) => Some(&mut self.rows[s]),
            None => None,
        }
    }

    /// Insert or replace; returns the replaced value.
    pub fn insert(&mut self, id: Entity, value: T) -> Option<T> {
        if let Some(s) = self.slot(id) {
            return Some(std::mem::replace(&mut self.rows[s], value));
        }
        let idx = id as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, VACANT);
        }
        self.sparse[idx] = self.rows.len() as u32;
        self.ids.push(id);
        self.rows.push(value);
        None
    }

    pub fn remove(&mut self, id: Entity) -> Option<T> {
        let s = self.slot(id)?;
        self.sparse[id as usize] = VACANT;
        let value = self.rows.swap_remove(s);
        self.ids.swap_remove(s);
        if let Some(&moved) = self.ids.get(s) {
            self.sparse[moved as usize] = s as u32;
        }
        Some(value)
    }

    pub fn clear(&mut self) {
        self.sparse.clear();
        self.ids.clear();
        self.rows.clear();
    }

    /// Entity ids in dense (iteration) order.
    #[inline]
    pub fn ids(&self) -> &[Entity] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.ids.iter().copied().zip(self.rows.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.ids.iter().copied().zip(self.rows.iter_mut())
    }

    /// Ids alongside mutable rows, for passes that split the work.
    pub(crate) fn parts_mut(&mut self) -> (&[Entity], &mut [T]) {
        (&self.ids, &mut self.rows)
    }
}
