//! In-memory registry of open wizard sessions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use studentbank_core::applications::ApplicationGatewayTrait;
use studentbank_core::notifications::{BufferedNotificationSink, Notice};
use studentbank_core::wizard::{WizardConfig, WizardController};
use tokio::sync::Mutex;

/// One applicant's wizard plus the notices it has raised since the last response.
pub struct WizardSession {
    pub wizard: WizardController,
    notices: BufferedNotificationSink,
    last_touched: Instant,
}

impl WizardSession {
    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Records activity on the session, resetting its idle clock.
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_touched.elapsed()
    }
}

pub type SharedSession = Arc<Mutex<WizardSession>>;

pub struct SessionRegistry {
    sessions: DashMap<String, SharedSession>,
    gateway: Arc<dyn ApplicationGatewayTrait>,
    default_config: WizardConfig,
}

impl SessionRegistry {
    pub fn new(gateway: Arc<dyn ApplicationGatewayTrait>, default_config: WizardConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            gateway,
            default_config,
        }
    }

    /// Opens a fresh wizard and returns its session id.
    pub fn open(&self, config: Option<WizardConfig>) -> (String, SharedSession) {
        let notices = BufferedNotificationSink::new();
        let wizard = WizardController::new(
            self.gateway.clone(),
            Arc::new(notices.clone()),
            config.unwrap_or(self.default_config),
        );
        let session_id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(WizardSession {
            wizard,
            notices,
            last_touched: Instant::now(),
        }));
        self.sessions.insert(session_id.clone(), session.clone());
        (session_id, session)
    }

    pub fn get(&self, session_id: &str) -> Option<SharedSession> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// Drops a session. Returns false when it was not open.
    pub fn close(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Drops every session left untouched for at least `ttl`.
    ///
    /// Sessions locked by a request are in use and always kept. Returns the
    /// number of sessions dropped.
    pub fn expire_idle(&self, ttl: Duration) -> usize {
        let mut expired = 0;
        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(session) if session.idle_for() >= ttl => {
                expired += 1;
                false
            }
            _ => true,
        });
        expired
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use studentbank_core::applications::{ApplicationDraft, ApplicationSession};

    struct StaticGateway;

    #[async_trait]
    impl ApplicationGatewayTrait for StaticGateway {
        async fn save(
            &self,
            _session: &mut ApplicationSession,
            _draft: &mut ApplicationDraft,
        ) -> studentbank_core::Result<String> {
            Ok("app-1".to_string())
        }

        async fn submit(
            &self,
            _session: &mut ApplicationSession,
            _draft: &mut ApplicationDraft,
        ) -> bool {
            true
        }
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(StaticGateway), WizardConfig::default())
    }

    #[tokio::test]
    async fn idle_sessions_expire_unless_in_use() {
        let registry = registry();
        let (idle_id, _) = registry.open(None);
        let (busy_id, busy) = registry.open(None);
        let _in_use = busy.lock().await;

        let expired = registry.expire_idle(Duration::ZERO);

        assert_eq!(expired, 1);
        assert!(registry.get(&idle_id).is_none());
        assert!(registry.get(&busy_id).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn recently_touched_sessions_are_kept() {
        let registry = registry();
        let (session_id, session) = registry.open(None);
        session.lock().await.touch();

        assert_eq!(registry.expire_idle(Duration::from_secs(60)), 0);
        assert!(!registry.is_empty());

        assert!(registry.close(&session_id));
        assert!(registry.is_empty());
    }
}
