// ── Controller ──
//
// Orchestrates every operation: auth calls run inline under one lock,
// contact commands go through a single writer task so the list is only
// ever mutated in submission order. Each session owns a cancellation
// token; ending the session fires it.

use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use phonebook_api::transport::{TlsMode, TransportConfig};
use phonebook_api::{
    AuthResponse, BearerToken, ContactPayload, LoginCredentials, PhonebookClient,
    SignupCredentials,
};

use crate::command::requests::{ContactUpdate, LoginRequest, NewContact, RegisterRequest};
use crate::command::{CommandEnvelope, CommandResult, ContactCommand};
use crate::config::{LogoutPolicy, RefreshFailurePolicy, SessionConfig, TlsVerification};
use crate::error::{CoreError, DEFAULT_STATUS, ErrorInfo, ErrorKind};
use crate::model::{Contact, ContactId, User};
use crate::store::{AuthState, ContactsState, FilterState, Store};
use crate::stream::StateStream;

const COMMAND_CHANNEL_SIZE: usize = 64;

/// Result of a logout that cleared the local session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogoutOutcome {
    /// Set when the server call failed but the session was cleared anyway
    /// ([`LogoutPolicy::Always`]).
    pub server_error: Option<ErrorInfo>,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Owns the HTTP client,
/// the [`Store`], and the contact command writer.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: SessionConfig,
    client: PhonebookClient,
    store: Arc<Store>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
    /// Serializes register/login/logout/refresh.
    auth_lock: Mutex<()>,
    /// Cancellation token of the current session.
    session: StdMutex<CancellationToken>,
    shutdown: CancellationToken,
}

impl Controller {
    /// Build a controller. No request is made until an operation runs.
    pub fn new(config: SessionConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = PhonebookClient::new(config.base_url.as_str(), &transport)?;
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                store: Arc::new(Store::new()),
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                writer: Mutex::new(None),
                auth_lock: Mutex::new(()),
                session: StdMutex::new(CancellationToken::new()),
                shutdown: CancellationToken::new(),
            }),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.inner.store
    }

    // ── Auth operations ──────────────────────────────────────────

    /// Create an account and start a session with it.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, ErrorInfo> {
        let _guard = self.inner.auth_lock.lock().await;
        debug!("registering account");
        self.inner.store.auth_pending();
        let credentials = SignupCredentials::from(request);
        let result = self.inner.client.signup(&credentials).await;
        self.complete_auth(result, "Registration failed")
    }

    /// Start a session with existing credentials.
    pub async fn login(&self, request: LoginRequest) -> Result<User, ErrorInfo> {
        let _guard = self.inner.auth_lock.lock().await;
        debug!("logging in");
        self.inner.store.auth_pending();
        let credentials = LoginCredentials::from(request);
        let result = self.inner.client.login(&credentials).await;
        self.complete_auth(result, "Login failed")
    }

    fn complete_auth(
        &self,
        result: Result<AuthResponse, phonebook_api::Error>,
        fallback: &str,
    ) -> Result<User, ErrorInfo> {
        let store = &self.inner.store;
        match result {
            Ok(response) => {
                if store.is_logged_in() {
                    debug!("replacing existing session");
                    self.cancel_session_requests();
                    store.contacts_cleared();
                }
                let user = User::from(response.user);
                store.auth_fulfilled(user.clone(), BearerToken::new(response.token));
                info!(user = %user.name, "session started");
                Ok(user)
            }
            Err(e) => {
                let error = ErrorInfo::from_api(&e, fallback);
                warn!(status = error.status, error = %error.message, "authentication failed");
                store.auth_rejected(error.clone());
                Err(error)
            }
        }
    }

    /// End the session.
    ///
    /// Without a token this fails with `Unauthorized` and leaves the store
    /// untouched. Otherwise the outcome depends on
    /// [`LogoutPolicy`]: `Always` clears the session even when the server
    /// call fails (the failure is returned in [`LogoutOutcome`]);
    /// `RequireServer` keeps it and returns the error.
    pub async fn logout(&self) -> Result<LogoutOutcome, ErrorInfo> {
        let _guard = self.inner.auth_lock.lock().await;
        let Some(token) = self.inner.store.token() else {
            debug!("logout requested without a session");
            return Err(ErrorInfo::no_token());
        };

        let policy = self.inner.config.logout_policy;
        if policy == LogoutPolicy::Always {
            self.cancel_session_requests();
        }
        self.inner.store.auth_pending();

        match self.inner.client.logout(&token).await {
            Ok(()) => {
                self.end_session();
                info!("logged out");
                Ok(LogoutOutcome::default())
            }
            Err(e) => {
                let error = ErrorInfo::from_api(&e, "Logout failed");
                match policy {
                    LogoutPolicy::Always => {
                        warn!(
                            status = error.status,
                            error = %error.message,
                            "server logout failed, local session cleared"
                        );
                        self.end_session();
                        Ok(LogoutOutcome {
                            server_error: Some(error),
                        })
                    }
                    LogoutPolicy::RequireServer => {
                        warn!(
                            status = error.status,
                            error = %error.message,
                            "server logout failed, session kept"
                        );
                        self.inner.store.auth_rejected(error.clone());
                        Err(error)
                    }
                }
            }
        }
    }

    /// Re-validate the token and reload the current user.
    pub async fn refresh_user(&self) -> Result<User, ErrorInfo> {
        let _guard = self.inner.auth_lock.lock().await;
        let store = &self.inner.store;
        let Some(token) = store.token() else {
            debug!("refresh requested without a session");
            return Err(ErrorInfo::no_token());
        };

        store.refresh_pending();
        match self.inner.client.current_user(&token).await {
            Ok(dto) => {
                let user = User::from(dto);
                store.refresh_fulfilled(user.clone());
                debug!(user = %user.name, "session refreshed");
                Ok(user)
            }
            Err(e) => {
                let error = ErrorInfo::from_api(&e, "Refresh failed");
                let clear = self.inner.config.refresh_failure_policy
                    == RefreshFailurePolicy::ClearOnUnauthorized
                    && error.is_unauthorized();
                warn!(
                    status = error.status,
                    error = %error.message,
                    cleared = clear,
                    "session refresh failed"
                );
                if clear {
                    self.cancel_session_requests();
                    store.contacts_cleared();
                }
                store.refresh_rejected(error.clone(), clear);
                Err(error)
            }
        }
    }

    /// Install a persisted token. The user is unknown until
    /// [`refresh_user`](Self::refresh_user) succeeds.
    pub fn restore_session(&self, token: BearerToken) {
        if self.inner.store.is_logged_in() {
            self.cancel_session_requests();
            self.inner.store.contacts_cleared();
        }
        self.inner.store.token_restored(token);
        debug!("session token restored");
    }

    // ── Contact operations ───────────────────────────────────────

    /// Replace the local list with the server's.
    pub async fn fetch_contacts(&self) -> Result<Arc<Vec<Contact>>, ErrorInfo> {
        match self.execute(ContactCommand::Fetch).await? {
            CommandResult::Contacts(items) => Ok(items),
            other => Err(unexpected_result(&other)),
        }
    }

    /// Create a contact; the stored contact (with its server id) is returned.
    pub async fn add_contact(&self, contact: NewContact) -> Result<Contact, ErrorInfo> {
        match self.execute(ContactCommand::Add(contact)).await? {
            CommandResult::Contact(contact) => Ok(contact),
            other => Err(unexpected_result(&other)),
        }
    }

    pub async fn update_contact(&self, update: ContactUpdate) -> Result<Contact, ErrorInfo> {
        match self.execute(ContactCommand::Update(update)).await? {
            CommandResult::Contact(contact) => Ok(contact),
            other => Err(unexpected_result(&other)),
        }
    }

    pub async fn delete_contact(&self, id: ContactId) -> Result<ContactId, ErrorInfo> {
        match self.execute(ContactCommand::Delete(id)).await? {
            CommandResult::Deleted(id) => Ok(id),
            other => Err(unexpected_result(&other)),
        }
    }

    /// Submit a contact command and wait for the writer to apply it.
    ///
    /// The token and session are captured now; commands resolve strictly
    /// in submission order.
    pub async fn execute(&self, command: ContactCommand) -> Result<CommandResult, ErrorInfo> {
        self.ensure_writer().await;

        let (tx, rx) = oneshot::channel();
        let envelope = CommandEnvelope {
            command,
            token: self.inner.store.token(),
            cancel: self.current_session(),
            response_tx: tx,
        };

        self.inner
            .command_tx
            .send(envelope)
            .await
            .map_err(|_| ErrorInfo::cancelled())?;

        rx.await.map_err(|_| ErrorInfo::cancelled())?
    }

    // ── Filter ───────────────────────────────────────────────────

    pub fn set_filter(&self, text: &str) {
        self.inner.store.set_filter(text);
    }

    pub fn clear_filter(&self) {
        self.inner.store.clear_filter();
    }

    /// Contacts matching the current filter (memoized).
    pub fn filtered_contacts(&self) -> Arc<Vec<Contact>> {
        self.inner.store.filtered_contacts()
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn subscribe_auth(&self) -> StateStream<AuthState> {
        self.inner.store.subscribe_auth()
    }

    pub fn subscribe_contacts(&self) -> StateStream<ContactsState> {
        self.inner.store.subscribe_contacts()
    }

    pub fn subscribe_filter(&self) -> StateStream<FilterState> {
        self.inner.store.subscribe_filter()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Stop the command writer. Pending and later commands resolve as
    /// `Cancelled`.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.current_session().cancel();

        if let Some(handle) = self.inner.writer.lock().await.take() {
            let _ = handle.await;
        }
        debug!("controller shut down");
    }

    // ── Internals ────────────────────────────────────────────────

    /// Spawn the writer on first use.
    async fn ensure_writer(&self) {
        let mut slot = self.inner.command_rx.lock().await;
        if let Some(rx) = slot.take() {
            let handle = tokio::spawn(command_processor_task(
                self.inner.client.clone(),
                Arc::clone(&self.inner.store),
                rx,
                self.inner.shutdown.clone(),
            ));
            *self.inner.writer.lock().await = Some(handle);
        }
    }

    /// The slot only ever holds a whole token, so a poisoned lock is
    /// still consistent.
    fn session_slot(&self) -> MutexGuard<'_, CancellationToken> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn current_session(&self) -> CancellationToken {
        self.session_slot().clone()
    }

    /// Fire the current session's token and start a fresh one.
    fn cancel_session_requests(&self) {
        let previous = std::mem::replace(&mut *self.session_slot(), CancellationToken::new());
        previous.cancel();
    }

    fn end_session(&self) {
        self.cancel_session_requests();
        self.inner.store.session_cleared();
        self.inner.store.contacts_cleared();
    }
}

// ── Command writer ───────────────────────────────────────────────

async fn command_processor_task(
    client: PhonebookClient,
    store: Arc<Store>,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let CommandEnvelope { command, token, cancel, response_tx } = envelope;
                let result = process_command(&client, &store, command, token, &cancel).await;
                let _ = response_tx.send(result);
            }
        }
    }
    debug!("contact command writer stopped");
}

/// Outcome of a successful request, before it is applied to the store.
enum Applied {
    Fetched(Vec<Contact>),
    Added(Contact),
    Updated(Contact),
    Deleted(ContactId),
}

async fn process_command(
    client: &PhonebookClient,
    store: &Store,
    command: ContactCommand,
    token: Option<BearerToken>,
    cancel: &CancellationToken,
) -> Result<CommandResult, ErrorInfo> {
    let name = command.name();
    if cancel.is_cancelled() {
        debug!(command = name, "dropping command from ended session");
        return Err(ErrorInfo::cancelled());
    }

    store.contacts_pending();
    let Some(token) = token else {
        let error = ErrorInfo::no_token();
        store.contacts_rejected(error.clone(), cancel);
        return Err(error);
    };

    let fallback = command.fallback_message();
    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        result = route_command(client, &token, command) => Some(result),
    };

    let result = match outcome {
        Some(result) if !cancel.is_cancelled() => result,
        _ => {
            debug!(command = name, "command cancelled by logout");
            store.contacts_settled();
            return Err(ErrorInfo::cancelled());
        }
    };

    let stored = match result {
        Ok(applied) => apply(store, applied, cancel).map(Ok),
        Err(e) => {
            let error = ErrorInfo::from_api(&e, fallback);
            warn!(
                command = name,
                status = error.status,
                error = %error.message,
                "contact command failed"
            );
            store.contacts_rejected(error.clone(), cancel).then_some(Err(error))
        }
    };

    match stored {
        Some(result) => {
            if result.is_ok() {
                debug!(command = name, "contact command applied");
            }
            result
        }
        None => {
            debug!(command = name, "session ended before the result was stored");
            store.contacts_settled();
            Err(ErrorInfo::cancelled())
        }
    }
}

async fn route_command(
    client: &PhonebookClient,
    token: &BearerToken,
    command: ContactCommand,
) -> Result<Applied, phonebook_api::Error> {
    match command {
        ContactCommand::Fetch => {
            let list = client.list_contacts(token).await?;
            Ok(Applied::Fetched(list.into_iter().map(Contact::from).collect()))
        }
        ContactCommand::Add(contact) => {
            let payload = ContactPayload {
                name: &contact.name,
                number: &contact.number,
            };
            let created = client.create_contact(token, &payload).await?;
            Ok(Applied::Added(created.into()))
        }
        ContactCommand::Update(update) => {
            let payload = ContactPayload {
                name: &update.name,
                number: &update.number,
            };
            let updated = client
                .update_contact(token, update.id.as_str(), &payload)
                .await?;
            Ok(Applied::Updated(updated.into()))
        }
        ContactCommand::Delete(id) => {
            client.delete_contact(token, id.as_str()).await?;
            Ok(Applied::Deleted(id))
        }
    }
}

/// Write a successful outcome. `None` when the session ended first.
fn apply(store: &Store, applied: Applied, cancel: &CancellationToken) -> Option<CommandResult> {
    match applied {
        Applied::Fetched(items) => store.contacts_fetched(items, cancel).map(CommandResult::Contacts),
        Applied::Added(contact) => store
            .contact_added(contact.clone(), cancel)
            .then_some(CommandResult::Contact(contact)),
        Applied::Updated(contact) => store
            .contact_updated(contact.clone(), cancel)
            .then_some(CommandResult::Contact(contact)),
        Applied::Deleted(id) => store
            .contact_removed(&id, cancel)
            .then_some(CommandResult::Deleted(id)),
    }
}

fn unexpected_result(result: &CommandResult) -> ErrorInfo {
    ErrorInfo::new(
        ErrorKind::Server,
        format!("unexpected command result: {result:?}"),
        DEFAULT_STATUS,
    )
}

// ── Transport ────────────────────────────────────────────────────

fn build_transport(config: &SessionConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        ..TransportConfig::default()
    }
    .with_timeout(config.timeout)
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
