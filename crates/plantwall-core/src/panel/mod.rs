// ── Panel controller ──
//
// One `Panel<K>` per backend resource. It owns the panel's observable
// state in a `watch` channel, a background poll task, and the short
// timers that clear banners and re-fetch after a write. Every state
// write goes through `apply`, which is a no-op once the panel has been
// disposed, so late HTTP responses and pending timers never touch an
// unmounted panel.
//
// Fetch results are applied in completion order. Two overlapping
// fetches (poll tick vs. post-write re-fetch) can land out of order and
// the later-landing one wins, even if it was dispatched first.

mod kind;
mod lighting;
mod watering;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use plantwall_api::PlantWallClient;

use crate::config::PanelConfig;
use crate::error::CoreError;
use crate::stream::PanelStream;

pub use kind::{ControlKind, Lighting, Overview, PanelKind, Sensors, Watering};
pub use lighting::LightingForm;
pub use watering::WateringForm;

pub type OverviewPanel = Panel<Overview>;
pub type SensorsPanel = Panel<Sensors>;
pub type LightingPanel = Panel<Lighting>;
pub type WateringPanel = Panel<Watering>;

// ── Observable state ─────────────────────────────────────────────────

/// Where a panel is in its fetch/submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum PanelPhase {
    /// No data yet; the first fetch is outstanding.
    Loading,
    Ready,
    /// A write is in flight; controls are disabled.
    Updating,
    /// The last fetch or write failed and an error banner is up.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Transient feedback message. At most one per panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    /// Monotonic per panel; a clear timer only removes its own banner.
    pub id: u64,
    pub raised_at: DateTime<Utc>,
}

/// Snapshot of a panel, as published to subscribers.
#[derive(Debug, Clone)]
pub struct PanelState<K: PanelKind> {
    pub phase: PanelPhase,
    pub status: Option<Arc<K::Status>>,
    pub form: K::Form,
    pub banner: Option<Banner>,
    pub last_refresh: Option<DateTime<Utc>>,
    form_seeded: bool,
    disposed: bool,
}

impl<K: PanelKind> Default for PanelState<K> {
    fn default() -> Self {
        Self {
            phase: PanelPhase::Loading,
            status: None,
            form: K::Form::default(),
            banner: None,
            last_refresh: None,
            form_seeded: false,
            disposed: false,
        }
    }
}

impl<K: PanelKind> PanelState<K> {
    /// First fetch still outstanding.
    pub fn is_loading(&self) -> bool {
        self.phase == PanelPhase::Loading
    }

    pub fn is_updating(&self) -> bool {
        self.phase == PanelPhase::Updating
    }

    /// Controls accept input only when no write is in flight.
    pub fn controls_enabled(&self) -> bool {
        !self.is_updating() && !self.disposed
    }

    pub fn error(&self) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.kind == BannerKind::Error)
            .map(|b| b.text.as_str())
    }

    pub fn message(&self) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.kind == BannerKind::Success)
            .map(|b| b.text.as_str())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Has data and no outstanding error.
    pub fn is_healthy(&self) -> bool {
        self.status.is_some() && self.error().is_none()
    }

    /// Phase to fall back to when an error banner goes away.
    fn settled_phase(&self) -> PanelPhase {
        if self.status.is_some() {
            PanelPhase::Ready
        } else {
            PanelPhase::Loading
        }
    }
}

// ── Panel ────────────────────────────────────────────────────────────

/// Poll-and-reconcile controller for one backend resource.
///
/// Cheaply cloneable; clones share the same state and tasks.
pub struct Panel<K: PanelKind> {
    inner: Arc<PanelInner<K>>,
}

impl<K: PanelKind> Clone for Panel<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct PanelInner<K: PanelKind> {
    api: Arc<PlantWallClient>,
    config: PanelConfig,
    state: watch::Sender<PanelState<K>>,
    cancel: CancellationToken,
    mounted: AtomicBool,
    banner_seq: AtomicU64,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<K: PanelKind> Panel<K> {
    pub fn new(api: Arc<PlantWallClient>, config: PanelConfig) -> Self {
        Self::with_cancel(api, config, CancellationToken::new())
    }

    /// Build a panel whose tasks also stop when `parent` is cancelled.
    pub(crate) fn with_parent(
        api: Arc<PlantWallClient>,
        config: PanelConfig,
        parent: &CancellationToken,
    ) -> Self {
        Self::with_cancel(api, config, parent.child_token())
    }

    fn with_cancel(api: Arc<PlantWallClient>, config: PanelConfig, cancel: CancellationToken) -> Self {
        let (state, _) = watch::channel(PanelState::default());
        Self {
            inner: Arc::new(PanelInner {
                api,
                config,
                state,
                cancel,
                mounted: AtomicBool::new(false),
                banner_seq: AtomicU64::new(0),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        K::NAME
    }

    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    // ── Observation ──────────────────────────────────────────────

    /// Current snapshot.
    pub fn state(&self) -> PanelState<K> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelState<K>> {
        self.inner.state.subscribe()
    }

    pub fn stream(&self) -> PanelStream<K> {
        PanelStream::new(self.subscribe())
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start the initial fetch and the background poll.
    ///
    /// The returned guard unmounts the panel when dropped.
    pub fn mount(&self) -> Result<PanelSubscription<K>, CoreError> {
        if self.inner.state.borrow().disposed {
            return Err(CoreError::Unmounted);
        }
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return Err(CoreError::AlreadyMounted);
        }

        debug!(panel = K::NAME, "mounting panel");
        let panel = self.clone();
        let cancel = self.inner.cancel.clone();
        self.track(tokio::spawn(poll_task(panel, cancel)));

        Ok(PanelSubscription {
            panel: self.clone(),
            active: true,
        })
    }

    /// Mark disposed and cancel every pending task. Synchronous so it
    /// can run from `Drop`.
    fn dispose(&self) {
        // Flag only; subscribers see no further change after unmount.
        self.inner.state.send_if_modified(|s| {
            s.disposed = true;
            false
        });
        self.inner.cancel.cancel();
    }

    /// Dispose and wait for background tasks to finish.
    async fn shutdown(&self) {
        self.dispose();
        let handles: Vec<_> = self
            .inner
            .task_handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            let _ = handle.await;
        }
        debug!(panel = K::NAME, "panel unmounted");
    }

    // ── Fetch ────────────────────────────────────────────────────

    /// Fetch the resource once and apply the outcome.
    ///
    /// The result lands whenever the request completes. It is dropped
    /// only if the panel has been unmounted meanwhile.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        if self.is_disposed() {
            return Err(CoreError::Unmounted);
        }

        match K::fetch(&self.inner.api).await {
            Ok(status) => {
                let applied = self.apply(|s| {
                    if !s.form_seeded {
                        K::seed(&mut s.form, &status);
                        s.form_seeded = true;
                    }
                    s.status = Some(Arc::new(status));
                    s.last_refresh = Some(Utc::now());
                    if s.error().is_some() {
                        s.banner = None;
                    }
                    if s.phase != PanelPhase::Updating {
                        s.phase = PanelPhase::Ready;
                    }
                });
                if applied {
                    Ok(())
                } else {
                    debug!(panel = K::NAME, "discarding response for unmounted panel");
                    Err(CoreError::Unmounted)
                }
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(panel = K::NAME, error = %err, "fetch failed");
                self.raise_error(format!("Failed to fetch {}: {err}", K::NAME), false);
                Err(err)
            }
        }
    }

    /// Wait until a fetch newer than `since` has landed, or an error
    /// banner is up. Used by one-shot callers to print the state that
    /// the post-write re-fetch brings in.
    pub async fn settled(&self, since: Option<DateTime<Utc>>) -> Result<PanelState<K>, CoreError> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|s| s.disposed || s.last_refresh > since || s.error().is_some())
            .await
            .map_err(|_| CoreError::Unmounted)?;
        Ok(state.clone())
    }

    // ── Form ─────────────────────────────────────────────────────

    /// Edit the local draft. Rejected while a write is in flight.
    pub fn edit_form(&self, edit: impl FnOnce(&mut K::Form)) -> Result<(), CoreError> {
        let mut outcome = Err(CoreError::Unmounted);
        self.inner.state.send_if_modified(|s| {
            if s.disposed {
                return false;
            }
            if s.phase == PanelPhase::Updating {
                outcome = Err(CoreError::Busy);
                return false;
            }
            let before = s.form.clone();
            edit(&mut s.form);
            outcome = Ok(());
            s.form != before
        });
        outcome
    }

    /// Remove the current banner early.
    pub fn dismiss_banner(&self) {
        self.apply(|s| {
            if s.banner.take().is_some() && s.phase == PanelPhase::Error {
                s.phase = s.settled_phase();
            }
        });
    }

    // ── State plumbing ───────────────────────────────────────────

    fn is_disposed(&self) -> bool {
        self.inner.state.borrow().disposed
    }

    /// Apply a mutation unless disposed. Returns whether it was applied.
    fn apply(&self, mutate: impl FnOnce(&mut PanelState<K>)) -> bool {
        self.inner.state.send_if_modified(|s| {
            if s.disposed {
                return false;
            }
            mutate(s);
            true
        })
    }

    fn next_banner_id(&self) -> u64 {
        self.inner.banner_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Raise an error banner. A fetch failure leaves an in-flight write's
    /// `Updating` phase alone; a failed write always ends in `Error`.
    fn raise_error(&self, text: String, from_write: bool) {
        let id = self.next_banner_id();
        let applied = self.apply(|s| {
            s.banner = Some(Banner {
                kind: BannerKind::Error,
                text,
                id,
                raised_at: Utc::now(),
            });
            if from_write || s.phase != PanelPhase::Updating {
                s.phase = PanelPhase::Error;
            }
        });
        if applied {
            self.schedule_banner_clear(id);
        }
    }

    fn schedule_banner_clear(&self, id: u64) {
        let panel = self.clone();
        let cancel = self.inner.cancel.clone();
        let ttl = self.inner.config.banner_ttl;
        self.track(tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(ttl) => {
                    panel.apply(|s| {
                        if s.banner.as_ref().is_some_and(|b| b.id == id) {
                            s.banner = None;
                            if s.phase == PanelPhase::Error {
                                s.phase = s.settled_phase();
                            }
                        }
                    });
                }
            }
        }));
    }

    fn schedule_refresh(&self) {
        let panel = self.clone();
        let cancel = self.inner.cancel.clone();
        let delay = self.inner.config.settle_delay;
        self.track(tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if let Err(e) = panel.refresh().await {
                        debug!(panel = K::NAME, error = %e, "post-write refresh failed");
                    }
                }
            }
        }));
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self
            .inner
            .task_handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }
}

// ── Writes ───────────────────────────────────────────────────────────

impl<K: ControlKind> Panel<K> {
    /// Shared submit path for every control operation.
    ///
    /// `build` runs atomically with the `Updating` transition, so two
    /// concurrent submits can never both pass the busy check. It may
    /// also refuse the write (e.g. emergency stop), in which case no
    /// request is sent. `on_accept` applies the optimistic form change
    /// and returns the success banner text.
    pub(crate) async fn submit(
        &self,
        action: &'static str,
        build: impl FnOnce(&PanelState<K>) -> Result<K::Control, CoreError>,
        on_accept: impl FnOnce(&mut K::Form, &K::Control) -> String,
    ) -> Result<(), CoreError> {
        let control = match self.begin_update(build) {
            Ok(control) => control,
            Err(e @ (CoreError::Busy | CoreError::Unmounted)) => return Err(e),
            Err(e) => return Err(self.fail(action, e)),
        };

        debug!(panel = K::NAME, action, ?control, "submitting control");
        match K::send(&self.inner.api, &control).await {
            Ok(ack) if ack.is_one_of(K::ACCEPTED) => {
                self.accept(&control, on_accept);
                Ok(())
            }
            Ok(ack) => Err(self.fail(
                action,
                CoreError::UnexpectedResponse { status: ack.status },
            )),
            Err(e) => Err(self.fail(action, e.into())),
        }
    }

    fn begin_update(
        &self,
        build: impl FnOnce(&PanelState<K>) -> Result<K::Control, CoreError>,
    ) -> Result<K::Control, CoreError> {
        let mut outcome = Err(CoreError::Unmounted);
        self.inner.state.send_if_modified(|s| {
            if s.disposed {
                return false;
            }
            if s.phase == PanelPhase::Updating {
                outcome = Err(CoreError::Busy);
                return false;
            }
            outcome = build(s);
            if outcome.is_ok() {
                s.phase = PanelPhase::Updating;
                true
            } else {
                false
            }
        });
        outcome
    }

    fn accept(
        &self,
        control: &K::Control,
        on_accept: impl FnOnce(&mut K::Form, &K::Control) -> String,
    ) {
        let id = self.next_banner_id();
        let applied = self.apply(|s| {
            let text = on_accept(&mut s.form, control);
            s.banner = Some(Banner {
                kind: BannerKind::Success,
                text,
                id,
                raised_at: Utc::now(),
            });
            s.phase = PanelPhase::Ready;
        });
        if applied {
            self.schedule_banner_clear(id);
            self.schedule_refresh();
        }
    }

    fn fail(&self, action: &str, err: CoreError) -> CoreError {
        warn!(panel = K::NAME, action, error = %err, "control write failed");
        let text = if matches!(err, CoreError::EmergencyStop) {
            format!("Cannot {action}: {err}")
        } else {
            format!("Failed to {action}: {err}")
        };
        self.raise_error(text, true);
        err
    }
}

// ── Mount guard ──────────────────────────────────────────────────────

/// Keeps a panel mounted. Dropping it unmounts the panel: pending
/// timers are cancelled and late responses are discarded.
pub struct PanelSubscription<K: PanelKind> {
    panel: Panel<K>,
    active: bool,
}

impl<K: PanelKind> PanelSubscription<K> {
    pub fn panel(&self) -> &Panel<K> {
        &self.panel
    }

    /// Unmount and wait for background tasks to wind down.
    pub async fn unmount(mut self) {
        self.active = false;
        self.panel.shutdown().await;
    }
}

impl<K: PanelKind> Drop for PanelSubscription<K> {
    fn drop(&mut self) {
        if self.active {
            self.panel.dispose();
        }
    }
}

// ── Background poll ──────────────────────────────────────────────────

async fn poll_task<K: PanelKind>(panel: Panel<K>, cancel: CancellationToken) {
    tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        result = panel.refresh() => {
            if let Err(e) = result {
                debug!(panel = K::NAME, error = %e, "initial fetch failed");
            }
        }
    }

    let mut interval = tokio::time::interval(panel.inner.config.poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = panel.refresh().await {
                    debug!(panel = K::NAME, error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_loading() {
        let state = PanelState::<Lighting>::default();
        assert!(state.is_loading());
        assert!(state.controls_enabled());
        assert!(!state.is_healthy());
        assert_eq!(state.form, LightingForm::default());
    }

    #[test]
    fn banner_accessors_split_by_kind() {
        let mut state = PanelState::<Overview>::default();
        state.banner = Some(Banner {
            kind: BannerKind::Error,
            text: "Failed to fetch system status: boom".into(),
            id: 1,
            raised_at: Utc::now(),
        });
        assert_eq!(state.error(), Some("Failed to fetch system status: boom"));
        assert_eq!(state.message(), None);
    }

    #[test]
    fn phase_names_are_lowercase() {
        assert_eq!(PanelPhase::Updating.to_string(), "updating");
        let name: &'static str = PanelPhase::Error.into();
        assert_eq!(name, "error");
    }
}
