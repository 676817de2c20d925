use super::assets::FlowAssets;
use super::session::{ActionEffect, FlowError, FlowView, OnboardingFlow, ScreenAction};
use super::screens::ScreenId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Anything that is not a uuid cannot name a live session.
    pub fn parse(raw: &str) -> Result<Self, FlowError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| FlowError::UnknownSession(raw.to_string()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where live flows are kept between requests.
pub trait SessionStore: Send + Sync {
    fn insert(&self, id: SessionId, flow: OnboardingFlow);
    fn remove(&self, id: &SessionId) -> bool;
    fn with_flow<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut OnboardingFlow) -> R,
    ) -> Result<R, FlowError>;
    fn len(&self) -> usize;
}

struct StoredFlow {
    flow: OnboardingFlow,
    last_used: u64,
}

#[derive(Default)]
struct Sessions {
    flows: HashMap<SessionId, StoredFlow>,
    clock: u64,
}

impl Sessions {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn least_recently_used(&self) -> Option<SessionId> {
        self.flows
            .iter()
            .min_by_key(|(_, stored)| stored.last_used)
            .map(|(id, _)| *id)
    }
}

/// Bounded in-memory store; the least recently used session is evicted once
/// the limit is reached.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<Sessions>>,
    limit: usize,
}

impl InMemorySessionStore {
    pub const DEFAULT_LIMIT: usize = 1024;

    pub fn with_limit(limit: usize) -> Self {
        Self {
            sessions: Arc::default(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, id: SessionId, flow: OnboardingFlow) {
        let evicted = {
            let mut guard = self.sessions.lock().expect("session store mutex poisoned");
            let evicted = if !guard.flows.contains_key(&id) && guard.flows.len() >= self.limit {
                let oldest = guard.least_recently_used();
                oldest.and_then(|oldest| guard.flows.remove_entry(&oldest))
            } else {
                None
            };
            let last_used = guard.tick();
            guard.flows.insert(id, StoredFlow { flow, last_used });
            evicted
        };
        if let Some((evicted_id, _)) = evicted {
            info!(session_id = %evicted_id, limit = self.limit, "evicted least recently used session");
        }
    }

    fn remove(&self, id: &SessionId) -> bool {
        let removed = {
            let mut guard = self.sessions.lock().expect("session store mutex poisoned");
            guard.flows.remove(id)
        };
        removed.is_some()
    }

    fn with_flow<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut OnboardingFlow) -> R,
    ) -> Result<R, FlowError> {
        let mut guard = self.sessions.lock().expect("session store mutex poisoned");
        let last_used = guard.tick();
        let stored = guard
            .flows
            .get_mut(id)
            .ok_or_else(|| FlowError::UnknownSession(id.to_string()))?;
        stored.last_used = last_used;
        Ok(f(&mut stored.flow))
    }

    fn len(&self) -> usize {
        self.sessions
            .lock()
            .expect("session store mutex poisoned")
            .flows
            .len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
    pub view: FlowView,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    #[serde(flatten)]
    pub effect: ActionEffect,
    pub view: FlowView,
}

/// Session-level operations behind the HTTP routes.
pub struct SessionService<S> {
    store: S,
    assets: FlowAssets,
}

impl<S: SessionStore> SessionService<S> {
    pub fn new(store: S, assets: FlowAssets) -> Self {
        Self { store, assets }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Must run inside a tokio runtime.
    pub fn create(&self) -> SessionCreated {
        let id = SessionId::new();
        let flow = OnboardingFlow::new(self.assets.clone());
        let view = flow.view();
        self.store.insert(id, flow);
        info!(session_id = %id, "onboarding session started");
        SessionCreated {
            session_id: id,
            view,
        }
    }

    pub fn view(&self, id: &SessionId) -> Result<FlowView, FlowError> {
        self.store.with_flow(id, |flow| flow.view())
    }

    pub fn navigate(&self, id: &SessionId, screen: &str) -> Result<FlowView, FlowError> {
        self.store.with_flow(id, |flow| {
            flow.navigate(screen);
            flow.view()
        })
    }

    pub fn back(&self, id: &SessionId) -> Result<FlowView, FlowError> {
        self.store.with_flow(id, |flow| {
            flow.back();
            flow.view()
        })
    }

    pub fn act(&self, id: &SessionId, action: ScreenAction) -> Result<ActionResponse, FlowError> {
        self.store.with_flow(id, |flow| -> Result<ActionResponse, FlowError> {
            let effect = flow.apply(action)?;
            Ok(ActionResponse {
                effect,
                view: flow.view(),
            })
        })?
    }

    pub fn current_screen(&self, id: &SessionId) -> Result<ScreenId, FlowError> {
        self.store.with_flow(id, |flow| flow.current())
    }

    pub fn close(&self, id: &SessionId) -> Result<(), FlowError> {
        if self.store.remove(id) {
            info!(session_id = %id, "onboarding session closed");
            Ok(())
        } else {
            Err(FlowError::UnknownSession(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PacingConfig;
    use crate::flows::onboarding::LoginField;

    fn service() -> SessionService<InMemorySessionStore> {
        SessionService::new(
            InMemorySessionStore::default(),
            FlowAssets::standard(PacingConfig::instant()),
        )
    }

    #[test]
    fn sessions_are_isolated() {
        let service = service();
        let first = service.create().session_id;
        let second = service.create().session_id;
        assert_eq!(service.store().len(), 2);

        service.navigate(&first, "readiness").expect("navigate");
        assert_eq!(service.current_screen(&first), Ok(ScreenId::Readiness));
        assert_eq!(service.current_screen(&second), Ok(ScreenId::Login));
    }

    #[test]
    fn closed_sessions_are_unknown() {
        let service = service();
        let id = service.create().session_id;
        service.close(&id).expect("close");

        assert_eq!(
            service.view(&id).map(|view| view.position),
            Err(FlowError::UnknownSession(id.to_string()))
        );
        assert!(service.close(&id).is_err());
    }

    #[test]
    fn actions_return_effect_and_view() {
        let service = service();
        let id = service.create().session_id;
        let response = service
            .act(
                &id,
                ScreenAction::SetLoginField {
                    field: LoginField::Name,
                    value: "Asha".to_string(),
                },
            )
            .expect("action accepted");
        assert_eq!(response.effect, ActionEffect::Updated);
        assert_eq!(response.view.label, "Login");
    }

    #[test]
    fn profile_last_step_view_keeps_the_store_usable() {
        let service = service();
        let id = service.create().session_id;
        service.navigate(&id, "profile").expect("navigate");
        service.act(&id, ScreenAction::ProfileNext).expect("step 2");
        let response = service.act(&id, ScreenAction::ProfileNext).expect("step 3");
        assert_eq!(response.view.label, "Profile");

        service.create();
        assert_eq!(service.store().len(), 2);
    }

    #[test]
    fn store_evicts_the_least_recently_used_session() {
        let service = SessionService::new(
            InMemorySessionStore::with_limit(2),
            FlowAssets::standard(PacingConfig::instant()),
        );
        let first = service.create().session_id;
        let second = service.create().session_id;
        service.view(&first).expect("first is live");

        let third = service.create().session_id;
        assert_eq!(service.store().len(), 2);
        assert!(service.view(&first).is_ok());
        assert!(service.view(&third).is_ok());
        assert_eq!(
            service.view(&second).map(|view| view.position),
            Err(FlowError::UnknownSession(second.to_string()))
        );
    }

    #[test]
    fn malformed_ids_are_unknown_sessions() {
        assert_eq!(
            SessionId::parse("not-a-uuid"),
            Err(FlowError::UnknownSession("not-a-uuid".to_string()))
        );
    }
}
