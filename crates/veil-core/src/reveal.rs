//! Server-confirmed "secret shown" flags
//!
//! A flag is scoped to the viewer it was confirmed for. The ledger never
//! answers `true` for any other viewer, so a flag left over from a previous
//! identity degrades to the ownership check alone.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::identifiers::{ContentKey, UserId};
use crate::viewer::Viewer;

/// Reveal state of one secret-bearing entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealFlag {
    /// Whether the server confirmed the secret as shown
    pub shown: bool,
    /// Viewer the confirmation was issued for
    pub shown_for_viewer_id: UserId,
}

impl RevealFlag {
    /// Flag confirmed for the given viewer
    pub fn shown_for(viewer_id: UserId) -> Self {
        Self {
            shown: true,
            shown_for_viewer_id: viewer_id,
        }
    }

    /// Whether the flag applies to this viewer
    pub fn applies_to(&self, viewer: &Viewer) -> bool {
        self.shown && !viewer.is_anonymous() && self.shown_for_viewer_id == viewer.id
    }

    /// Whether the flag was set for someone other than this viewer
    pub fn is_stale_for(&self, viewer: &Viewer) -> bool {
        self.shown && self.shown_for_viewer_id != viewer.id
    }
}

/// Reveal flags keyed by entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealLedger {
    flags: HashMap<ContentKey, RevealFlag>,
}

impl RevealLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a flag, replacing any previous one for the key
    pub fn record(&mut self, key: ContentKey, flag: RevealFlag) {
        self.flags.insert(key, flag);
    }

    /// Builder form of [`RevealLedger::record`]
    pub fn with(mut self, key: ContentKey, flag: RevealFlag) -> Self {
        self.record(key, flag);
        self
    }

    /// Whether the secret on `key` has been revealed to this viewer
    pub fn shown_for(&self, key: &ContentKey, viewer: &Viewer) -> bool {
        self.flags
            .get(key)
            .map(|flag| flag.applies_to(viewer))
            .unwrap_or(false)
    }

    /// Whether the ledger holds a flag for `key` issued to another viewer
    pub fn is_stale(&self, key: &ContentKey, viewer: &Viewer) -> bool {
        self.flags
            .get(key)
            .map(|flag| flag.is_stale_for(viewer))
            .unwrap_or(false)
    }

    /// Remove the flag for a key
    pub fn remove(&mut self, key: &ContentKey) -> Option<RevealFlag> {
        self.flags.remove(key)
    }

    /// Drop every flag
    pub fn clear(&mut self) {
        self.flags.clear();
    }

    /// Number of recorded flags
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no flag is recorded
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_only_applies_to_its_viewer() {
        let key = ContentKey::subject(5);
        let ledger = RevealLedger::new().with(key, RevealFlag::shown_for(UserId(9)));

        assert!(ledger.shown_for(&key, &Viewer::new(9, 1)));
        assert!(!ledger.shown_for(&key, &Viewer::new(10, 1)));
        assert!(ledger.is_stale(&key, &Viewer::new(10, 1)));
        assert!(!ledger.shown_for(&ContentKey::subject(6), &Viewer::new(9, 1)));
    }

    #[test]
    fn test_anonymous_viewer_never_matches() {
        let key = ContentKey::subject(5);
        let ledger = RevealLedger::new().with(key, RevealFlag::shown_for(UserId::ANONYMOUS));
        assert!(!ledger.shown_for(&key, &Viewer::anonymous()));
    }

    #[test]
    fn test_unshown_flag_is_never_stale() {
        let key = ContentKey::subject(5);
        let ledger = RevealLedger::new().with(key, RevealFlag::default());
        assert!(!ledger.is_stale(&key, &Viewer::new(3, 1)));
        assert!(!ledger.shown_for(&key, &Viewer::new(0, 1)));
    }
}
