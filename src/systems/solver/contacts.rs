//! Persistent contact table
//!
//! Contacts survive across steps so their accumulated impulses can warm start
//! the next solve. Each detection pass bumps a generation counter; contacts
//! re-reported in that pass are stamped with it, and the sweep drops the rest.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::Vector;
use crate::ecs::Entity;
use crate::systems::collision::{BoundaryTag, ContactReport, Counterpart};

/// Canonical identity of a contact across steps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactKey {
    /// Entity pair, smaller id first.
    Pair(Entity, Entity),
    Boundary(Entity, BoundaryTag),
}

impl ContactKey {
    pub fn of(report: &ContactReport) -> Self {
        match report.other {
            Counterpart::Body(b) => Self::Pair(report.a.min(b), report.a.max(b)),
            Counterpart::Boundary(tag) => Self::Boundary(report.a, tag),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub a: Entity,
    /// `None` for boundary contacts.
    pub b: Option<Entity>,
    pub boundary: Option<BoundaryTag>,
    /// Unit a->b.
    pub normal: Vector,
    pub penetration: f64,
    /// Accumulated normal impulse.
    pub jn: f64,
    /// Accumulated friction impulse.
    pub jt: f64,
    /// Accumulated positional-correction impulse.
    pub bias: f64,
    /// Target separating velocity for this step.
    pub bounce: f64,
    key: ContactKey,
    seen: u64,
}

impl Contact {
    fn from_report(report: &ContactReport, seen: u64) -> Self {
        let mut contact = Self {
            a: report.a,
            b: None,
            boundary: None,
            normal: report.normal,
            penetration: report.penetration,
            jn: 0.0,
            jt: 0.0,
            bias: 0.0,
            bounce: 0.0,
            key: ContactKey::of(report),
            seen,
        };
        contact.refresh(report, seen);
        contact
    }

    fn refresh(&mut self, report: &ContactReport, seen: u64) {
        self.a = report.a;
        match report.other {
            Counterpart::Body(b) => {
                self.b = Some(b);
                self.boundary = None;
            }
            Counterpart::Boundary(tag) => {
                self.b = None;
                self.boundary = Some(tag);
            }
        }
        self.key = ContactKey::of(report);
        self.normal = report.normal;
        self.penetration = report.penetration;
        self.bounce = 0.0;
        self.seen = seen;
    }

    #[inline]
    pub fn key(&self) -> ContactKey {
        self.key
    }
}

/// Read-only view of a contact handed to event consumers
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Option<Entity>,
    pub boundary: Option<BoundaryTag>,
    pub normal: Vector,
    pub penetration: f64,
}

impl From<&Contact> for CollisionEvent {
    fn from(c: &Contact) -> Self {
        Self { a: c.a, b: c.b, boundary: c.boundary, normal: c.normal, penetration: c.penetration }
    }
}

/// Insertion-ordered contacts with a key index
#[derive(Debug, Default)]
pub struct ContactTable {
    contacts: Vec<Contact>,
    index: HashMap<ContactKey, usize>,
    generation: u64,
}

impl ContactTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, key: ContactKey) -> Option<&Contact> {
        self.index.get(&key).map(|&i| &self.contacts[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Contact] {
        &mut self.contacts
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
        self.index.clear();
    }

    /// Start a detection pass.
    pub(crate) fn begin(&mut self) {
        self.generation += 1;
    }

    /// Insert a new contact or refresh the geometry of an existing one,
    /// keeping its accumulated impulses.
    pub(crate) fn upsert(&mut self, report: &ContactReport) {
        let key = ContactKey::of(report);
        match self.index.get(&key) {
            Some(&i) => self.contacts[i].refresh(report, self.generation),
            None => {
                self.index.insert(key, self.contacts.len());
                self.contacts.push(Contact::from_report(report, self.generation));
            }
        }
    }

    /// Drop contacts not reported since `begin`, keeping order.
    pub(crate) fn sweep(&mut self) {
        let generation = self.generation;
        self.contacts.retain(|c| c.seen == generation);
        self.index.clear();
        for (i, c) in self.contacts.iter().enumerate() {
            self.index.insert(c.key(), i);
        }
    }
}
