//! The admin gate: who may manage the catalog, and a stream of sign-in
//! activity.
//!
//! The allow-list is data. It starts from the settings table (or
//! `ADMIN_EMAILS`) and is reloaded from the settings table on each login
//! attempt and on each authenticated request, so removing an address takes
//! effect on that session's next request.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use twinkle_core::{AdminAllowList, Email, UserProfile};

use crate::db::AllowListSource;

const EVENT_CAPACITY: usize = 64;

/// A change in someone's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Email),
    SignedOut,
}

#[derive(Clone)]
pub struct AuthGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    allow_list: RwLock<AdminAllowList>,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthGate {
    #[must_use]
    pub fn new(allow_list: AdminAllowList) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(GateInner {
                allow_list: RwLock::new(allow_list),
                events,
            }),
        }
    }

    /// Build the gate from the first list available: `source`, then
    /// `fallback`. An empty result is allowed but nobody can sign in.
    pub async fn load(source: &dyn AllowListSource, fallback: &AdminAllowList) -> Self {
        let list = match source.load_allow_list().await {
            Ok(Some(list)) => {
                tracing::info!(entries = list.len(), "Allow-list loaded from settings");
                list
            }
            Ok(None) => fallback.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read allow-list from settings");
                fallback.clone()
            }
        };

        if list.is_empty() {
            tracing::warn!("Admin allow-list is empty; nobody can sign in");
        }

        Self::new(list)
    }

    /// Snapshot of the current list.
    pub async fn allow_list(&self) -> AdminAllowList {
        self.inner.allow_list.read().await.clone()
    }

    pub async fn replace_allow_list(&self, list: AdminAllowList) {
        *self.inner.allow_list.write().await = list;
    }

    /// Refresh from `source`. A missing or unreadable stored list keeps the
    /// current one.
    pub async fn reload(&self, source: &dyn AllowListSource) {
        match source.load_allow_list().await {
            Ok(Some(list)) => self.replace_allow_list(list).await,
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Allow-list reload failed, keeping current list"),
        }
    }

    pub async fn is_admin(&self, profile: &UserProfile) -> bool {
        self.inner.allow_list.read().await.is_admin(profile)
    }

    /// Start listening for session events. Drop the receiver to stop.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn publish(&self, event: SessionEvent) {
        // Err only means nobody is listening
        let _ = self.inner.events.send(event);
    }
}

/// Log every session event until the task is aborted.
#[must_use]
pub fn spawn_audit_log(gate: &AuthGate) -> JoinHandle<()> {
    let mut events = gate.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn(email)) => {
                    tracing::info!(email = %email, "Admin signed in");
                }
                Ok(SessionEvent::SignedOut) => tracing::info!("Admin signed out"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Audit log fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
