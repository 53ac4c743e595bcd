//! The UI-observable application snapshot.

use crate::contact::{Contact, ContactDraft};

/// One snapshot of everything the presentation screens render.
///
/// The holder task owns the only mutable copy; screens observe cloned
/// snapshots through a watch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// True until the first live-query emission arrives.
    pub is_loading: bool,
    /// Scratch edit state for the contact being created or edited.
    pub draft: ContactDraft,
    /// Last-observed full contact list, in store order.
    pub contacts: Vec<Contact>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            is_loading: true,
            draft: ContactDraft::default(),
            contacts: Vec::new(),
        }
    }
}
