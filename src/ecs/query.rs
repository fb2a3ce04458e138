//! Query iteration over the store
//!
//! Both iterators pick the least-populated of the requested tables as the
//! driver and filter its ids against the rest, so cost scales with the
//! rarest component rather than with the entity count. They borrow the store
//! immutably; passes that mutate per id collect first (`Store::query_ids`)
//! and re-resolve each id, skipping ids that have lost a component.

use super::store::{Component, ComponentKind, Store};
use super::Entity;

fn driver<'a>(store: &'a Store, kinds: &[ComponentKind]) -> (&'a [Entity], usize) {
    let mut best: &[Entity] = &[];
    let mut best_idx = 0;
    for (i, &kind) in kinds.iter().enumerate() {
        let ids = store.ids_of(kind);
        if i == 0 || ids.len() < best.len() {
            best = ids;
            best_idx = i;
        }
    }
    (best, best_idx)
}

/// Lazy sequence of ids holding all requested component kinds.
pub struct Query<'a> {
    store: &'a Store,
    kinds: Vec<ComponentKind>,
    driver: &'a [Entity],
    driver_idx: usize,
    cursor: usize,
}

impl<'a> Query<'a> {
    pub(crate) fn new(store: &'a Store, kinds: &[ComponentKind]) -> Self {
        let (driver, driver_idx) = driver(store, kinds);
        Self { store, kinds: kinds.to_vec(), driver, driver_idx, cursor: 0 }
    }

    /// Driver rows visited so far.
    pub fn scanned(&self) -> usize {
        self.cursor
    }

    /// The kind whose table drives iteration, if any kinds were requested.
    pub fn driver_kind(&self) -> Option<ComponentKind> {
        self.kinds.get(self.driver_idx).copied()
    }
}

impl Iterator for Query<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        'outer: while let Some(&id) = self.driver.get(self.cursor) {
            self.cursor += 1;
            for (i, &kind) in self.kinds.iter().enumerate() {
                if i != self.driver_idx && !self.store.has_kind(kind, id) {
                    continue 'outer;
                }
            }
            return Some(id);
        }
        None
    }
}

/// A tuple of component types fetched together by [`Store::query_rows`].
pub trait Fetch<'a> {
    type Item;
    fn kinds() -> Vec<ComponentKind>;
    /// `None` as soon as any component is missing.
    fn fetch(store: &'a Store, id: Entity) -> Option<Self::Item>;
}

macro_rules! impl_fetch {
    ($($ty:ident),+) => {
        impl<'a, $($ty: Component),+> Fetch<'a> for ($($ty,)+) {
            type Item = ($(&'a $ty,)+);

            fn kinds() -> Vec<ComponentKind> {
                vec![$($ty::KIND),+]
            }

            #[inline]
            fn fetch(store: &'a Store, id: Entity) -> Option<Self::Item> {
                Some(($(store.get::<$ty>(id)?,)+))
            }
        }
    };
}

impl_fetch!(A);
impl_fetch!(A, B);
impl_fetch!(A, B, C);
impl_fetch!(A, B, C, D);

/// Lazy sequence of `(id, components)` rows.
pub struct Rows<'a, R: Fetch<'a>> {
    store: &'a Store,
    driver: &'a [Entity],
    cursor: usize,
    _fetch: std::marker::PhantomData<R>,
}

impl<'a, R: Fetch<'a>> Rows<'a, R> {
    pub(crate) fn new(store: &'a Store) -> Self {
        let (driver, _) = driver(store, &R::kinds());
        Self { store, driver, cursor: 0, _fetch: std::marker::PhantomData }
    }

    /// Driver rows visited so far.
    pub fn scanned(&self) -> usize {
        self.cursor
    }
}

impl<'a, R: Fetch<'a>> Iterator for Rows<'a, R> {
    type Item = (Entity, R::Item);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&id) = self.driver.get(self.cursor) {
            self.cursor += 1;
            if let Some(row) = R::fetch(self.store, id) {
                return Some((id, row));
            }
        }
        None
    }
}
