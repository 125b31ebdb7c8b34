//! Per-channel session registry.
//!
//! One [`TriageSession`] per (network, channel). A session is created by
//! `start`, looked up by every other command and dropped on `end` or after
//! sitting idle too long.
//!
//! Each session lives behind its own async mutex. Command handlers hold that
//! lock for the whole command, tracker calls included, so commands for one
//! channel are applied strictly one at a time while other channels proceed
//! independently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use triage_domain::{ChannelKey, TriageSession};

pub type SharedSession = Arc<Mutex<TriageSession>>;

struct Entry {
    session: SharedSession,
    last_activity: Instant,
}

impl Entry {
    fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(TriageSession::new())),
            last_activity: Instant::now(),
        }
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<ChannelKey, Entry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for `key`, created if the channel has none yet.
    pub async fn get_or_create(&self, key: &ChannelKey) -> SharedSession {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.entry(key.clone()).or_insert_with(|| {
            debug!("Creating triage session for {}", key);
            Entry::new()
        });
        entry.last_activity = Instant::now();
        Arc::clone(&entry.session)
    }

    /// Session for `key`, if one is running.
    pub async fn get(&self, key: &ChannelKey) -> Option<SharedSession> {
        let mut sessions = self.sessions.lock().await;
        sessions.get_mut(key).map(|entry| {
            entry.last_activity = Instant::now();
            Arc::clone(&entry.session)
        })
    }

    /// Whether `key` still maps to `session`.
    pub async fn is_current(&self, key: &ChannelKey, session: &SharedSession) -> bool {
        self.sessions
            .lock()
            .await
            .get(key)
            .is_some_and(|entry| Arc::ptr_eq(&entry.session, session))
    }

    /// Remove `key` only if it still maps to `session`, so a session that
    /// replaced it is left alone.
    pub async fn release(&self, key: &ChannelKey, session: &SharedSession) -> bool {
        let mut sessions = self.sessions.lock().await;
        if sessions
            .get(key)
            .is_some_and(|entry| Arc::ptr_eq(&entry.session, session))
        {
            sessions.remove(key);
            return true;
        }
        false
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Drop every session idle for longer than `max_idle`.
    /// Returns the channels that were evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> Vec<ChannelKey> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        let expired: Vec<ChannelKey> = sessions
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_activity) > max_idle)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            sessions.remove(key);
            info!("Dropped idle triage session for {}", key);
        }
        expired
    }

    /// Periodically evict idle sessions until `token` is cancelled.
    pub fn spawn_idle_sweeper(
        self: Arc<Self>,
        max_idle: Duration,
        interval: Duration,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Idle session sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.evict_idle(max_idle).await;
                    }
                }
            }
        })
    }
}
