use crate::clients::PersistenceClient;
use crate::config::SessionConfig;
use crate::models::{
    Collaborator, DocumentOwner, DocumentUpdate, PermissionLevel, SessionError, SharePermission,
    ShareRequest,
};
use crate::session::status::{LoadState, SaveStatus};
use crate::session::surface::{EditingSurface, SyncMode};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// The two independently persisted streams of a document session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamKind {
    Title,
    Content,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Title => write!(f, "title"),
            StreamKind::Content => write!(f, "content"),
        }
    }
}

/// Ephemeral per-stream save state.
///
/// `timer` holds the id of the currently armed debounce timer. Cancellation
/// is by invalidation: clearing or replacing the id makes the sleeping task
/// wake, see it is stale and exit without flushing. In-flight calls are never
/// cancelled; their results pass through the value guard instead.
#[derive(Debug, Default)]
struct StreamState {
    dirty: bool,
    timer: Option<u64>,
    in_flight: usize,
}

impl StreamState {
    fn is_settled(&self) -> bool {
        !self.dirty && self.timer.is_none() && self.in_flight == 0
    }
}

#[derive(Debug)]
struct SessionState {
    title: String,
    collaborators: Vec<Collaborator>,
    status: SaveStatus,
    title_stream: StreamState,
    content_stream: StreamState,
    timer_seq: u64,
    closed: bool,
}

impl SessionState {
    fn stream_mut(&mut self, stream: StreamKind) -> &mut StreamState {
        match stream {
            StreamKind::Title => &mut self.title_stream,
            StreamKind::Content => &mut self.content_stream,
        }
    }
}

struct SessionShared<P, S> {
    client: P,
    surface: S,
    id: String,
    owner: Option<DocumentOwner>,
    permission: PermissionLevel,
    config: SessionConfig,
    state: Mutex<SessionState>,
    status_tx: watch::Sender<SaveStatus>,
}

impl<P, S> SessionShared<P, S> {
    // The lock is never held across an await point, so a poisoned mutex can
    // only mean a panic in a pure state transition; the state is still
    // consistent and the guard is recovered.
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, state: &mut SessionState, status: SaveStatus) {
        if state.status != status {
            debug!("Save status for document '{}': {} -> {}", self.id, state.status, status);
            state.status = status.clone();
            self.status_tx.send_replace(status);
        }
    }
}

impl<P, S> SessionShared<P, S>
where
    P: PersistenceClient + 'static,
    S: EditingSurface + 'static,
{
    /// Debounce timer fired: flush unless this timer has been superseded
    async fn flush_if_armed(shared: Arc<Self>, stream: StreamKind, timer_id: u64) {
        {
            let mut state = shared.lock_state();
            let s = state.stream_mut(stream);
            if s.timer != Some(timer_id) {
                // Superseded by a newer edit or cancelled on teardown
                return;
            }
            s.timer = None;
        }
        Self::flush_now(shared, stream).await;
    }

    /// Persist the stream's latest value.
    ///
    /// The value is read at flush time, never at arm time. On success the
    /// dirty flag is cleared only if the value we saved is still the current
    /// value at completion time; otherwise a newer debounce cycle owns the
    /// stream and will flush again.
    async fn flush_now(shared: Arc<Self>, stream: StreamKind) {
        {
            let mut state = shared.lock_state();
            let s = state.stream_mut(stream);
            if !s.dirty {
                return;
            }
            s.in_flight += 1;
        }

        let (update, saved_title, saved_snapshot) = match stream {
            StreamKind::Title => {
                let title = shared.lock_state().title.clone();
                (DocumentUpdate::title(title.clone()), Some(title), None)
            }
            StreamKind::Content => {
                let snapshot = shared.surface.snapshot();
                (DocumentUpdate::content(snapshot.clone()), None, Some(snapshot))
            }
        };

        debug!("Flushing {} for document '{}'", stream, shared.id);
        let result = shared.client.update_document(&shared.id, update).await;

        // Anything may have interleaved during the call; re-check under the lock.
        let current_snapshot = match stream {
            StreamKind::Title => None,
            StreamKind::Content => Some(shared.surface.snapshot()),
        };
        let mut state = shared.lock_state();
        match result {
            Ok(()) => {
                let still_current = match stream {
                    StreamKind::Title => saved_title.as_deref() == Some(state.title.as_str()),
                    StreamKind::Content => saved_snapshot == current_snapshot,
                };
                let s = state.stream_mut(stream);
                s.in_flight -= 1;
                if still_current {
                    s.dirty = false;
                } else {
                    debug!(
                        "{} of document '{}' changed while its flush was in flight; stream stays dirty",
                        stream, shared.id
                    );
                }
                if state.title_stream.is_settled()
                    && state.content_stream.is_settled()
                    && state.status.is_pending()
                {
                    shared.set_status(&mut state, SaveStatus::Saved);
                }
                info!("Persisted {} for document '{}'", stream, shared.id);
            }
            Err(e) => {
                state.stream_mut(stream).in_flight -= 1;
                error!("Failed to persist {} for document '{}': {}", stream, shared.id, e);
                shared.set_status(&mut state, SaveStatus::Error("Error saving".to_string()));
            }
        }
    }
}

/// Result of a successful share, distinguishing a new collaborator from a
/// permission change so the caller acknowledges only the former.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    AddedCollaborator,
    UpdatedPermission,
}

impl ShareOutcome {
    pub fn is_new_collaborator(self) -> bool {
        matches!(self, ShareOutcome::AddedCollaborator)
    }
}

/// Coordination layer for one open document.
///
/// Sits between the editing surface, the optional realtime channel and the
/// persistence backend: tracks dirty state per stream, debounces flushes,
/// derives the combined save status, gates every mutation on the current
/// user's permission and reconciles the collaborator set after a share.
///
/// Permission is evaluated once at load; a downgrade issued while the session
/// is open takes effect on the next load.
pub struct SessionCoordinator<P, S> {
    shared: Arc<SessionShared<P, S>>,
}

impl<P, S> SessionCoordinator<P, S>
where
    P: PersistenceClient + 'static,
    S: EditingSurface + 'static,
{
    /// Fetch the document and bring up the editing surface.
    ///
    /// Terminal outcomes: `NotFound` when the backend has no such document,
    /// `LoadFailure` when the fetch itself fails. No persistence or share
    /// call is ever issued after either. In `Realtime` mode the channel
    /// supplies the surface's initial state, so the local content bootstrap
    /// is skipped.
    pub async fn open(
        id: impl Into<String>,
        client: P,
        surface: S,
        sync_mode: SyncMode,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let id = id.into();
        info!("Opening {} session for document '{}'", sync_mode, id);

        let document = match client.fetch_document(&id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                warn!("Document '{}' not found", id);
                return Err(SessionError::NotFound(id));
            }
            Err(e) => {
                error!("Failed to load document '{}': {}", id, e);
                return Err(e);
            }
        };

        let permission = document.current_user_permission;
        if permission.can_edit() {
            surface.set_editable(true);
        } else {
            info!("Read-only session for document '{}'", id);
            surface.set_editable(false);
        }

        if sync_mode == SyncMode::Standalone {
            if let Some(content) = document.content {
                surface.replace_content(content);
            }
        }
        if permission.can_edit() {
            surface.focus_end();
        }

        let (status_tx, _) = watch::channel(SaveStatus::Saved);
        let shared = Arc::new(SessionShared {
            client,
            surface,
            id,
            owner: document.owner,
            permission,
            config,
            state: Mutex::new(SessionState {
                title: document.title,
                collaborators: document.collaborators,
                status: SaveStatus::Saved,
                title_stream: StreamState::default(),
                content_stream: StreamState::default(),
                timer_seq: 0,
                closed: false,
            }),
            status_tx,
        });

        Ok(Self { shared })
    }

    /// A keystroke in the title field.
    ///
    /// The working title is updated synchronously so the field reflects the
    /// keystroke without latency; persistence is trailing-edge debounced and
    /// each keystroke re-arms the timer.
    pub fn on_title_changed(&self, new_title: impl Into<String>) -> Result<(), SessionError> {
        if self.shared.permission != PermissionLevel::Owner {
            warn!("Rejected title change on document '{}' for non-owner", self.shared.id);
            return Err(SessionError::PermissionDenied("rename"));
        }
        let mut state = self.shared.lock_state();
        if state.closed {
            return Ok(());
        }
        state.title = new_title.into();
        self.mark_dirty_and_arm(&mut state, StreamKind::Title);
        Ok(())
    }

    /// Focus left the title field.
    ///
    /// If the working title carries surrounding whitespace it is trimmed and
    /// flushed immediately, bypassing any armed debounce timer, so a pending
    /// edit is never lost to a blur. Already-trimmed titles are untouched.
    pub async fn on_title_blurred(&self) -> Result<(), SessionError> {
        if self.shared.permission != PermissionLevel::Owner {
            return Err(SessionError::PermissionDenied("rename"));
        }
        let needs_flush = {
            let mut state = self.shared.lock_state();
            if state.closed {
                return Ok(());
            }
            let trimmed = state.title.trim().to_string();
            if trimmed == state.title {
                false
            } else {
                state.title = trimmed;
                let s = state.stream_mut(StreamKind::Title);
                s.timer = None;
                s.dirty = true;
                self.shared.set_status(&mut state, SaveStatus::Pending);
                true
            }
        };
        if needs_flush {
            SessionShared::flush_now(Arc::clone(&self.shared), StreamKind::Title).await;
        }
        Ok(())
    }

    /// The editing surface reported a content mutation.
    ///
    /// Same trailing-edge debounce discipline as the title, on an independent
    /// timer; the flush reads the surface snapshot at fire time.
    pub fn on_content_changed(&self) -> Result<(), SessionError> {
        if !self.shared.permission.can_edit() {
            warn!("Ignoring content change on read-only document '{}'", self.shared.id);
            return Err(SessionError::PermissionDenied("edit"));
        }
        let mut state = self.shared.lock_state();
        if state.closed {
            return Ok(());
        }
        self.mark_dirty_and_arm(&mut state, StreamKind::Content);
        Ok(())
    }

    /// Share the document with another user.
    ///
    /// The collaborator set is reconciled only after the backend accepted the
    /// share: an existing entry gets its permission replaced in place, a new
    /// address is appended. On failure the set is untouched and the caller
    /// may simply resubmit.
    pub async fn share(
        &self,
        email: &str,
        permission: SharePermission,
    ) -> Result<ShareOutcome, SessionError> {
        if self.shared.permission != PermissionLevel::Owner {
            warn!("Rejected share on document '{}' for non-owner", self.shared.id);
            return Err(SessionError::PermissionDenied("share"));
        }
        let email = email.trim();
        // Minimal syntactic check; full address validation is the backend's
        if email.is_empty() || !email.contains('@') {
            return Err(SessionError::InvalidAddress(email.to_string()));
        }

        let request = ShareRequest {
            email: email.to_string(),
            permission,
        };
        self.shared
            .client
            .share_document(&self.shared.id, request)
            .await?;

        let mut state = self.shared.lock_state();
        let outcome = match state.collaborators.iter_mut().find(|c| c.email == email) {
            Some(existing) => {
                existing.permission = permission;
                ShareOutcome::UpdatedPermission
            }
            None => {
                state.collaborators.push(Collaborator {
                    email: email.to_string(),
                    permission,
                });
                ShareOutcome::AddedCollaborator
            }
        };
        info!(
            "Shared document '{}' with {} as {} ({:?})",
            self.shared.id, email, permission, outcome
        );
        Ok(outcome)
    }

    fn mark_dirty_and_arm(&self, state: &mut SessionState, stream: StreamKind) {
        state.timer_seq += 1;
        let timer_id = state.timer_seq;
        {
            let s = state.stream_mut(stream);
            s.dirty = true;
            s.timer = Some(timer_id);
        }
        self.shared.set_status(state, SaveStatus::Pending);

        let delay = self.shared.config.debounce_delay();
        let shared = Arc::clone(&self.shared);
        // Capture the deadline at arm time: the quiet period runs from the
        // edit itself, not from when the spawned task is first polled.
        let sleep = tokio::time::sleep(delay);
        tokio::spawn(async move {
            sleep.await;
            SessionShared::flush_if_armed(shared, stream, timer_id).await;
        });
    }

    // --- accessors for the display layer ---

    pub fn document_id(&self) -> &str {
        &self.shared.id
    }

    /// Current working title, including edits not yet persisted
    pub fn title(&self) -> String {
        self.shared.lock_state().title.clone()
    }

    pub fn owner(&self) -> Option<DocumentOwner> {
        self.shared.owner.clone()
    }

    pub fn collaborators(&self) -> Vec<Collaborator> {
        self.shared.lock_state().collaborators.clone()
    }

    pub fn permission(&self) -> PermissionLevel {
        self.shared.permission
    }

    /// Whether the share control should be exposed at all
    pub fn can_share(&self) -> bool {
        self.shared.permission.can_share()
    }

    pub fn is_editable(&self) -> bool {
        self.shared.permission.can_edit()
    }

    /// Always `Ready` once `open` has returned; the terminal states are the
    /// `open` errors
    pub fn load_state(&self) -> LoadState {
        LoadState::Ready
    }

    /// Current combined save status
    pub fn status(&self) -> SaveStatus {
        self.shared.lock_state().status.clone()
    }

    /// Watch channel the display layer can await status transitions on
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.shared.status_tx.subscribe()
    }
}

impl<P, S> SessionCoordinator<P, S> {
    /// Cancel both stream timers and stop accepting edits. In-flight calls
    /// settle normally. Also runs on drop.
    pub fn close(&self) {
        let mut state = self.shared.lock_state();
        if state.closed {
            return;
        }
        state.closed = true;
        state.title_stream.timer = None;
        state.content_stream.timer = None;
        debug!("Closed session for document '{}'", self.shared.id);
    }
}

impl<P, S> Drop for SessionCoordinator<P, S> {
    fn drop(&mut self) {
        self.close();
    }
}
