use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::catalog::ServiceVariant;
use super::composer::ServiceRequest;
use super::domain::{FieldValue, FormData, FormField};
use super::gateway::{SubmissionError, SubmissionGateway};
use super::wizard::{Advance, WizardError, WizardPhase, WizardState};

/// Identifier wrapper for in-progress wizard sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// A user action against the wizard, as received over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardCommand {
    SelectService { service: ServiceVariant },
    SetField { field: FormField, value: FieldValue },
    ToggleChoice { field: FormField, value: String },
    Advance,
    Retreat,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved,
    /// The gateway accepted this request and the wizard is now confirmed.
    Submitted(ServiceRequest),
    /// Another advance is already submitting; nothing happened.
    Ignored,
}

/// Default idle time after which a registry forgets a session.
pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Wizard state plus the ticket of the submission allowed to complete it.
///
/// Every submission start and every reset bumps the ticket, so a completion that arrives after a
/// reset leaves the fresh wizard alone.
#[derive(Debug, Default)]
struct SessionSlot {
    wizard: WizardState,
    ticket: u64,
}

impl SessionSlot {
    fn complete(&mut self, ticket: u64, accepted: bool) {
        if self.ticket != ticket {
            return;
        }
        if let Ok(next) = self.wizard.complete_submission(accepted) {
            self.wizard = next;
        }
    }
}

/// One user's wizard plus the gateway its final request goes to.
pub struct WizardSession<G> {
    id: SessionId,
    slot: Arc<Mutex<SessionSlot>>,
    gateway: Arc<G>,
    last_active: StdMutex<Instant>,
}

impl<G> WizardSession<G>
where
    G: SubmissionGateway + 'static,
{
    pub fn new(id: SessionId, gateway: Arc<G>) -> Self {
        Self {
            id,
            slot: Arc::new(Mutex::new(SessionSlot::default())),
            gateway,
            last_active: StdMutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub async fn snapshot(&self) -> WizardState {
        self.slot.lock().await.wizard.clone()
    }

    pub async fn view(&self) -> SessionView {
        SessionView::new(&self.id, &self.slot.lock().await.wizard)
    }

    pub async fn select_service(&self, service: ServiceVariant) -> Result<WizardState, WizardError> {
        self.update(|state| state.select_service(service)).await
    }

    pub async fn set_field(
        &self,
        field: FormField,
        value: FieldValue,
    ) -> Result<WizardState, WizardError> {
        self.update(|state| state.with_field(field, value)).await
    }

    pub async fn toggle_choice(
        &self,
        field: FormField,
        choice: &str,
    ) -> Result<WizardState, WizardError> {
        self.update(|state| state.toggle_choice(field, choice)).await
    }

    pub async fn retreat(&self) -> Result<WizardState, WizardError> {
        self.update(WizardState::retreat).await
    }

    /// Start over. A submission still in flight completes on its own but no longer moves this
    /// wizard.
    pub async fn reset(&self) -> WizardState {
        let mut slot = self.slot.lock().await;
        if slot.wizard.is_submitting() {
            debug!(session = %self.id.0, "reset while a submission is in flight");
        }
        slot.ticket += 1;
        slot.wizard = slot.wizard.reset();
        slot.wizard.clone()
    }

    /// Move forward, submitting through the gateway when leaving the contact phase.
    ///
    /// The gateway call runs on its own task and reports back into the session, so dropping this
    /// future never leaves the wizard locked. Concurrent advances observe the in-flight flag and
    /// return [`AdvanceOutcome::Ignored`].
    pub async fn advance(&self) -> Result<(AdvanceOutcome, WizardState), WizardError> {
        let (request, ticket) = {
            let mut slot = self.slot.lock().await;
            match slot.wizard.advance() {
                Ok(Advance::Moved(next)) => {
                    debug!(
                        session = %self.id.0,
                        phase = %next.phase(),
                        sub_step = ?next.sub_step(),
                        "wizard advanced"
                    );
                    slot.wizard = next;
                    return Ok((AdvanceOutcome::Moved, slot.wizard.clone()));
                }
                Ok(Advance::Ignored) => {
                    debug!(session = %self.id.0, "advance ignored while submitting");
                    return Ok((AdvanceOutcome::Ignored, slot.wizard.clone()));
                }
                Ok(Advance::Submit { pending, request }) => {
                    slot.wizard = pending;
                    slot.ticket += 1;
                    (request, slot.ticket)
                }
                Err(err) => {
                    warn!(
                        session = %self.id.0,
                        phase = %slot.wizard.phase(),
                        error = %err,
                        "advance blocked"
                    );
                    return Err(err);
                }
            }
        };

        let completion = tokio::spawn(submit_and_complete(
            self.slot.clone(),
            self.gateway.clone(),
            self.id.clone(),
            request.clone(),
            ticket,
        ));

        match completion.await {
            Ok(Ok(state)) => Ok((AdvanceOutcome::Submitted(request), state)),
            Ok(Err(err)) => Err(WizardError::Submission(err)),
            Err(join_error) => {
                self.slot.lock().await.complete(ticket, false);
                warn!(session = %self.id.0, error = %join_error, "submission task aborted");
                Err(WizardError::Submission(SubmissionError::Unavailable(
                    join_error.to_string(),
                )))
            }
        }
    }

    pub async fn apply(&self, command: WizardCommand) -> Result<WizardState, WizardError> {
        match command {
            WizardCommand::SelectService { service } => self.select_service(service).await,
            WizardCommand::SetField { field, value } => self.set_field(field, value).await,
            WizardCommand::ToggleChoice { field, value } => {
                self.toggle_choice(field, &value).await
            }
            WizardCommand::Advance => self.advance().await.map(|(_, state)| state),
            WizardCommand::Retreat => self.retreat().await,
            WizardCommand::Reset => Ok(self.reset().await),
        }
    }

    /// Mark the session as used now.
    pub fn touch(&self) {
        *self
            .last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Time since the session was last used, measured at `now`.
    pub fn idle_for(&self, now: Instant) -> Duration {
        let last_active = *self
            .last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last_active)
    }

    async fn update<F>(&self, reducer: F) -> Result<WizardState, WizardError>
    where
        F: FnOnce(&WizardState) -> Result<WizardState, WizardError>,
    {
        let mut slot = self.slot.lock().await;
        slot.wizard = reducer(&slot.wizard)?;
        Ok(slot.wizard.clone())
    }
}

async fn submit_and_complete<G>(
    slot: Arc<Mutex<SessionSlot>>,
    gateway: Arc<G>,
    session: SessionId,
    request: ServiceRequest,
    ticket: u64,
) -> Result<WizardState, SubmissionError>
where
    G: SubmissionGateway + 'static,
{
    let service = request.service_type;
    let result = gateway.submit(request).await;

    let mut slot = slot.lock().await;
    slot.complete(ticket, result.is_ok());

    match result {
        Ok(()) => {
            info!(session = %session.0, %service, "intake request submitted");
            Ok(slot.wizard.clone())
        }
        Err(err) => {
            warn!(session = %session.0, error = %err, "intake submission failed");
            Err(err)
        }
    }
}

/// Serializable snapshot of a session for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub phase: WizardPhase,
    pub phase_index: u8,
    pub sub_step: Option<u8>,
    pub max_sub_steps: Option<u8>,
    pub selected_service: Option<ServiceVariant>,
    pub submitting: bool,
    pub form: FormData,
}

impl SessionView {
    pub fn new(id: &SessionId, state: &WizardState) -> Self {
        Self {
            session_id: id.clone(),
            phase: state.phase(),
            phase_index: state.phase().index(),
            sub_step: state.sub_step(),
            max_sub_steps: state
                .definition()
                .map(|definition| definition.max_detail_substeps),
            selected_service: state.selected_service(),
            submitting: state.is_submitting(),
            form: state.form().clone(),
        }
    }
}

/// Live sessions keyed by id. Each session guards its own state.
pub struct SessionRegistry<G> {
    gateway: Arc<G>,
    sessions: RwLock<HashMap<SessionId, Arc<WizardSession<G>>>>,
    sequence: AtomicU64,
    idle_ttl: Duration,
}

impl<G> SessionRegistry<G>
where
    G: SubmissionGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            sessions: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(1),
            idle_ttl: DEFAULT_SESSION_IDLE_TTL,
        }
    }

    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub async fn open(&self) -> Arc<WizardSession<G>> {
        let id = SessionId(format!(
            "ses-{:06}",
            self.sequence.fetch_add(1, Ordering::Relaxed)
        ));
        let session = Arc::new(WizardSession::new(id.clone(), self.gateway.clone()));
        self.sessions.write().await.insert(id, session.clone());
        session
    }

    /// Look up a session and mark it active.
    pub async fn get(&self, id: &SessionId) -> Option<Arc<WizardSession<G>>> {
        let session = self.sessions.read().await.get(id).cloned()?;
        session.touch();
        Some(session)
    }

    /// End a session, discarding its in-progress wizard.
    pub async fn close(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every session idle for at least the configured TTL as of `now`.
    pub async fn evict_idle_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for(now) < self.idle_ttl);
        before - sessions.len()
    }

    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now()).await
    }

    /// Periodically evict idle sessions until the returned task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle().await;
                if evicted > 0 {
                    debug!(evicted, "idle intake sessions evicted");
                }
            }
        })
    }
}
