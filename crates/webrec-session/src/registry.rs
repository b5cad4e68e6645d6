//! Window id to session table.

use crate::session::Session;
use std::collections::hash_map::{Entry, HashMap};
use webrec_common_core::WindowId;

/// Outcome of [`SessionRegistry::create`].
#[derive(Debug)]
pub enum Registration<'a> {
    /// A new session was built and stored.
    Created(&'a Session),
    /// The window was already recording; nothing was built.
    AlreadyActive(&'a Session),
}

/// Live sessions keyed by window.
///
/// Not synchronized: the owner serializes access.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<WindowId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session for `id` built by `build`, unless one is already active.
    ///
    /// `build` only runs when a new session is needed, so a duplicate
    /// request creates no resources.
    pub fn create<E>(
        &mut self,
        id: WindowId,
        build: impl FnOnce() -> Result<Session, E>,
    ) -> Result<Registration<'_>, E> {
        match self.sessions.entry(id) {
            Entry::Occupied(entry) if entry.get().is_recording() => {
                Ok(Registration::AlreadyActive(entry.into_mut()))
            }
            Entry::Occupied(mut entry) => {
                entry.insert(build()?);
                Ok(Registration::Created(entry.into_mut()))
            }
            Entry::Vacant(entry) => Ok(Registration::Created(entry.insert(build()?))),
        }
    }

    pub fn get(&self, id: WindowId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn remove(&mut self, id: WindowId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    pub fn ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<_> = self.sessions.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
