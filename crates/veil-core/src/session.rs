//! Viewer session: the viewer identity and its reveal ledger as one unit
//!
//! The viewer and the reveal flags confirmed for it live behind a single
//! lock. Changing identity replaces the viewer and clears the ledger in the
//! same write, so a resolution pass can never pair the new viewer with flags
//! confirmed for the old one.
//!
//! Change notification is poll-based: a [`SessionSubscription`] remembers the
//! last version it saw and yields a fresh snapshot once the session moves on.
//!
//! ```rust,ignore
//! let session = ViewerSession::anonymous();
//! let mut sub = session.subscribe();
//!
//! session.set_viewer(Viewer::new(3, 2));
//! let snapshot = sub.poll().unwrap();
//! assert!(snapshot.reveals.is_empty());
//! ```

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::identifiers::{ContentKey, UserId};
use crate::reveal::{RevealFlag, RevealLedger};
use crate::viewer::Viewer;

struct SessionState {
    viewer: Viewer,
    reveals: RevealLedger,
}

struct SessionInner {
    state: RwLock<SessionState>,
    /// Bumped while the write lock is held so snapshots stay consistent
    version: AtomicU64,
}

/// Consistent view of the session at one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current viewer
    pub viewer: Viewer,
    /// Reveal flags confirmed for that viewer
    pub reveals: RevealLedger,
    /// Session version the snapshot was taken at
    pub version: u64,
}

/// Shared handle to the viewer session
#[derive(Clone)]
pub struct ViewerSession {
    inner: Arc<SessionInner>,
}

impl ViewerSession {
    /// Session for the given viewer with an empty ledger
    pub fn new(viewer: Viewer) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState {
                    viewer,
                    reveals: RevealLedger::new(),
                }),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Logged-out session
    pub fn anonymous() -> Self {
        Self::new(Viewer::anonymous())
    }

    /// Current viewer
    pub fn viewer(&self) -> Viewer {
        self.inner.state.read().viewer
    }

    /// Current version
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Viewer, ledger and version read under one lock
    pub fn snapshot(&self) -> SessionSnapshot {
        let guard = self.inner.state.read();
        SessionSnapshot {
            viewer: guard.viewer,
            reveals: guard.reveals.clone(),
            version: self.inner.version.load(Ordering::Acquire),
        }
    }

    /// Replace the viewer
    ///
    /// A different id (login, logout, account switch) clears the reveal
    /// ledger in the same write. A rank or capability change for the same id
    /// keeps it. Returns whether the identity changed.
    pub fn set_viewer(&self, viewer: Viewer) -> bool {
        let mut guard = self.inner.state.write();
        let identity_changed = guard.viewer.id != viewer.id;
        if identity_changed {
            tracing::debug!(
                from = %guard.viewer.id,
                to = %viewer.id,
                dropped_reveals = guard.reveals.len(),
                "viewer identity changed; clearing reveal state"
            );
            guard.reveals.clear();
        }
        guard.viewer = viewer;
        self.inner.version.fetch_add(1, Ordering::Release);
        identity_changed
    }

    /// Record a server-confirmed reveal
    ///
    /// The confirmation is dropped when it was issued for a viewer other than
    /// the current one, which happens when a reveal request completes after an
    /// account switch. Returns whether the flag was recorded.
    pub fn mark_revealed(&self, key: ContentKey, confirmed_for: UserId) -> bool {
        let mut guard = self.inner.state.write();
        if guard.viewer.is_anonymous() || guard.viewer.id != confirmed_for {
            tracing::debug!(
                %key,
                %confirmed_for,
                current = %guard.viewer.id,
                "dropping reveal confirmed for a different viewer"
            );
            return false;
        }
        guard.reveals.record(key, RevealFlag::shown_for(confirmed_for));
        self.inner.version.fetch_add(1, Ordering::Release);
        true
    }

    /// Forget the reveal flag for one entity
    pub fn forget_reveal(&self, key: &ContentKey) {
        let mut guard = self.inner.state.write();
        if guard.reveals.remove(key).is_some() {
            self.inner.version.fetch_add(1, Ordering::Release);
        }
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            session: self.clone(),
            last_version: self.version(),
        }
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl std::fmt::Debug for ViewerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("viewer", &self.viewer())
            .field("version", &self.version())
            .finish()
    }
}

/// Polling subscription to a [`ViewerSession`]
pub struct SessionSubscription {
    session: ViewerSession,
    last_version: u64,
}

impl SessionSubscription {
    /// Snapshot of the session if it changed since the last poll
    pub fn poll(&mut self) -> Option<SessionSnapshot> {
        let snapshot = self.session.snapshot();
        if snapshot.version == self.last_version {
            return None;
        }
        self.last_version = snapshot.version;
        Some(snapshot)
    }

    /// Whether the session changed since the last poll
    pub fn has_changed(&self) -> bool {
        self.session.version() != self.last_version
    }
}
