//! Draft auto-save sessions
//!
//! One auto-saver per (form, user). Drafts are written through the form use
//! cases once the editor has been quiet for the configured window. A session
//! whose last save has settled is closed after `idle` without new drafts.

use formbuilder_core::application::{AutoSaveConfig, AutoSaver, SaveStatus, ServiceSaveTarget};
use formbuilder_core::{FormDocument, FormId, FormUseCases, Identity};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

type SessionKey = (u64, String);
type SessionMap = Mutex<HashMap<SessionKey, Session>>;

struct Session {
    saver: AutoSaver,
    generation: u64,
}

pub struct DraftSessions {
    forms: Arc<dyn FormUseCases>,
    config: AutoSaveConfig,
    idle: Duration,
    sessions: Arc<SessionMap>,
    generation: AtomicU64,
}

impl DraftSessions {
    pub fn new(forms: Arc<dyn FormUseCases>, config: AutoSaveConfig, idle: Duration) -> Self {
        Self {
            forms,
            config,
            idle,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn debounce_ms(&self) -> u64 {
        self.config.debounce.as_millis() as u64
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue a snapshot for `actor`'s session on form `id`
    pub fn schedule(&self, actor: &Identity, id: FormId, document: FormDocument) -> bool {
        let key = (id.value(), actor.user_id.clone());
        let mut sessions = self.sessions.lock();
        let session = sessions.entry(key.clone()).or_insert_with(|| {
            let target = ServiceSaveTarget::new(self.forms.clone(), actor.clone(), id);
            let saver = AutoSaver::spawn(Arc::new(target), self.config.clone());
            let generation = self.generation.fetch_add(1, Ordering::Relaxed);
            tokio::spawn(close_when_idle(
                Arc::downgrade(&self.sessions),
                key,
                generation,
                saver.subscribe(),
                self.idle,
            ));
            Session { saver, generation }
        });
        session.saver.schedule(document)
    }

    pub fn status(&self, actor: &Identity, id: FormId) -> Option<SaveStatus> {
        self.sessions
            .lock()
            .get(&(id.value(), actor.user_id.clone()))
            .map(|session| session.saver.status())
    }

    /// Drop every session of a deleted form without saving
    pub fn discard(&self, id: FormId) -> usize {
        let mut sessions = self.sessions.lock();
        let keys: Vec<SessionKey> = sessions.keys().filter(|(form, _)| *form == id.value()).cloned().collect();
        for key in &keys {
            if let Some(session) = sessions.remove(key) {
                session.saver.abort();
            }
        }
        if !keys.is_empty() {
            info!(form_id = %id, sessions = keys.len(), "Discarded draft sessions");
        }
        keys.len()
    }

    /// Save every pending draft and close all sessions
    pub async fn flush_all(&self) {
        let sessions: Vec<Session> = self.sessions.lock().drain().map(|(_, session)| session).collect();
        info!(sessions = sessions.len(), "Flushing draft sessions");
        for session in sessions {
            session.saver.shutdown().await;
        }
    }
}

/// Remove the session once its status has stayed settled for `idle`
async fn close_when_idle(
    sessions: Weak<SessionMap>,
    key: SessionKey,
    generation: u64,
    mut status: watch::Receiver<SaveStatus>,
    idle: Duration,
) {
    loop {
        let settled = status.borrow_and_update().is_settled();
        if settled {
            match tokio::time::timeout(idle, status.changed()).await {
                Err(_) => break,
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return,
            }
        } else if status.changed().await.is_err() {
            return;
        }
    }

    let Some(sessions) = sessions.upgrade() else {
        return;
    };
    let mut sessions = sessions.lock();
    let current = sessions
        .get(&key)
        .map(|session| session.generation == generation && session.saver.status().is_settled())
        .unwrap_or(false);
    if current {
        // A snapshot queued since the last status change is still drained by the worker.
        sessions.remove(&key);
        debug!(form_id = key.0, user_id = %key.1, "Closed idle draft session");
    }
}
