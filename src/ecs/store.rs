//! Store - entity identities plus one sparse table per component type
//!
//! The store is the only shared mutable state in the engine. Collaborators
//! read it through `get`/`query`; the solver writes bodies, positions, sleep
//! records and constraint impulses during a step.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{StoreError, StoreResult};
use crate::domain::{
    Aabb, Body, Circle, Collider, Constraint, Group, GroupRef, Position, Sleep, Spring,
};

use super::query::{Fetch, Query, Rows};
use super::table::Table;
use super::Entity;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Store`] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

/// Runtime tag for each component type, used by `query` and named spawning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Position,
    Body,
    Collider,
    Circle,
    Aabb,
    Sleep,
    Group,
    GroupRef,
    Constraint,
    Spring,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Position,
        ComponentKind::Body,
        ComponentKind::Collider,
        ComponentKind::Circle,
        ComponentKind::Aabb,
        ComponentKind::Sleep,
        ComponentKind::Group,
        ComponentKind::GroupRef,
        ComponentKind::Constraint,
        ComponentKind::Spring,
    ];

    /// Name used in entity specs.
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Position => "position",
            ComponentKind::Body => "body",
            ComponentKind::Collider => "collider",
            ComponentKind::Circle => "circle",
            ComponentKind::Aabb => "aabb",
            ComponentKind::Sleep => "sleep",
            ComponentKind::Group => "group",
            ComponentKind::GroupRef => "groupRef",
            ComponentKind::Constraint => "constraint",
            ComponentKind::Spring => "spring",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type stored in one of the store's tables.
pub trait Component: Sized + 'static {
    const KIND: ComponentKind;
    fn table(store: &Store) -> &Table<Self>;
    fn table_mut(store: &mut Store) -> &mut Table<Self>;
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;
            #[inline]
            fn table(store: &Store) -> &Table<Self> {
                &store.$field
            }
            #[inline]
            fn table_mut(store: &mut Store) -> &mut Table<Self> {
                &mut store.$field
            }
        }
    };
}

impl_component!(Position, Position, position);
impl_component!(Body, Body, body);
impl_component!(Collider, Collider, collider);
impl_component!(Circle, Circle, circle);
impl_component!(Aabb, Aabb, aabb);
impl_component!(Sleep, Sleep, sleep);
impl_component!(Group, Group, group);
impl_component!(GroupRef, GroupRef, group_ref);
impl_component!(Constraint, Constraint, constraint);
impl_component!(Spring, Spring, spring);

#[derive(Debug)]
pub struct Store {
    id: StoreId,
    next_id: Entity,
    alive: HashSet<Entity>,

    pub(crate) position: Table<Position>,
    pub(crate) body: Table<Body>,
    pub(crate) collider: Table<Collider>,
    pub(crate) circle: Table<Circle>,
    pub(crate) aabb: Table<Aabb>,
    pub(crate) sleep: Table<Sleep>,
    pub(crate) group: Table<Group>,
    pub(crate) group_ref: Table<GroupRef>,
    pub(crate) constraint: Table<Constraint>,
    pub(crate) spring: Table<Spring>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            id: StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed)),
            next_id: 0,
            alive: HashSet::new(),
            position: Table::new(),
            body: Table::new(),
            collider: Table::new(),
            circle: Table::new(),
            aabb: Table::new(),
            sleep: Table::new(),
            group: Table::new(),
            group_ref: Table::new(),
            constraint: Table::new(),
            spring: Table::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    // === Entities ===

    /// Allocate a fresh id. Ids are never reused.
    pub fn create(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        self.alive.insert(id);
        id
    }

    #[inline]
    pub fn contains(&self, id: Entity) -> bool {
        self.alive.contains(&id)
    }

    /// Remove the entity and every component it has. Returns false if the id
    /// was not alive.
    pub fn destroy(&mut self, id: Entity) -> bool {
        if !self.alive.remove(&id) {
            return false;
        }
        self.position.remove(id);
        self.body.remove(id);
        self.collider.remove(id);
        self.circle.remove(id);
        self.aabb.remove(id);
        self.sleep.remove(id);
        self.group.remove(id);
        self.group_ref.remove(id);
        self.constraint.remove(id);
        self.spring.remove(id);
        true
    }

    // === Components ===

    /// Attach (or replace) a component. Fails for unknown entities.
    pub fn add<C: Component>(&mut self, id: Entity, component: C) -> StoreResult<&mut Self> {
        if !self.contains(id) {
            return Err(StoreError::UnknownEntity(id));
        }
        C::table_mut(self).insert(id, component);
        Ok(self)
    }

    pub fn remove<C: Component>(&mut self, id: Entity) -> Option<C> {
        C::table_mut(self).remove(id)
    }

    #[inline]
    pub fn has<C: Component>(&self, id: Entity) -> bool {
        C::table(self).contains(id)
    }

    #[inline]
    pub fn get<C: Component>(&self, id: Entity) -> Option<&C> {
        C::table(self).get(id)
    }

    #[inline]
    pub fn get_mut<C: Component>(&mut self, id: Entity) -> Option<&mut C> {
        C::table_mut(self).get_mut(id)
    }

    #[inline]
    pub fn table<C: Component>(&self) -> &Table<C> {
        C::table(self)
    }

    #[inline]
    pub fn table_mut<C: Component>(&mut self) -> &mut Table<C> {
        C::table_mut(self)
    }

    pub(crate) fn has_kind(&self, kind: ComponentKind, id: Entity) -> bool {
        match kind {
            ComponentKind::Position => self.position.contains(id),
            ComponentKind::Body => self.body.contains(id),
            ComponentKind::Collider => self.collider.contains(id),
            ComponentKind::Circle => self.circle.contains(id),
            ComponentKind::Aabb => self.aabb.contains(id),
            ComponentKind::Sleep => self.sleep.contains(id),
            ComponentKind::Group => self.group.contains(id),
            ComponentKind::GroupRef => self.group_ref.contains(id),
            ComponentKind::Constraint => self.constraint.contains(id),
            ComponentKind::Spring => self.spring.contains(id),
        }
    }

    pub(crate) fn ids_of(&self, kind: ComponentKind) -> &[Entity] {
        match kind {
            ComponentKind::Position => self.position.ids(),
            ComponentKind::Body => self.body.ids(),
            ComponentKind::Collider => self.collider.ids(),
            ComponentKind::Circle => self.circle.ids(),
            ComponentKind::Aabb => self.aabb.ids(),
            ComponentKind::Sleep => self.sleep.ids(),
            ComponentKind::Group => self.group.ids(),
            ComponentKind::GroupRef => self.group_ref.ids(),
            ComponentKind::Constraint => self.constraint.ids(),
            ComponentKind::Spring => self.spring.ids(),
        }
    }

    /// Number of entities holding `kind`.
    pub fn count(&self, kind: ComponentKind) -> usize {
        self.ids_of(kind).len()
    }

    // === Queries ===

    /// Lazily yield ids holding every listed kind. Iteration is driven by the
    /// smallest of the listed tables.
    pub fn query(&self, kinds: &[ComponentKind]) -> Query<'_> {
        Query::new(self, kinds)
    }

    /// Collect a query up front, for passes that mutate the store per id.
    pub fn query_ids(&self, kinds: &[ComponentKind]) -> Vec<Entity> {
        self.query(kinds).collect()
    }

    /// Like [`Store::query`], but also yields the components:
    /// `store.query_rows::<(Position, Body)>()` yields `(id, (&Position, &Body))`.
    pub fn query_rows<'a, R: Fetch<'a>>(&'a self) -> Rows<'a, R> {
        Rows::new(self)
    }
}
