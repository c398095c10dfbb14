//! Durable storage for preferences and imported themes.
//!
//! Writes happen on a dedicated thread fed by a channel. Callers never wait
//! on storage: they submit the new value and move on, reading from their own
//! in-memory copy. The writer coalesces bursts of updates into one save and
//! retries failed saves with exponential backoff.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::PersistenceError;
use crate::preference::Preference;
use crate::transport::ThemeRecord;

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preference: Preference,
    #[serde(default)]
    pub themes: Vec<ThemeRecord>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self::new(Preference::default(), Vec::new())
    }
}

impl PersistedState {
    pub fn new(preference: Preference, themes: Vec<ThemeRecord>) -> Self {
        Self {
            version: STATE_VERSION,
            saved_at: None,
            preference,
            themes,
        }
    }
}

pub trait Storage: Send + 'static {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError>;
    fn save(&mut self, state: &PersistedState) -> Result<(), PersistenceError>;
}

/// TOML file on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let state: PersistedState =
            toml::from_str(&content).map_err(|e| PersistenceError::Decode(e.to_string()))?;
        if state.version > STATE_VERSION {
            return Err(PersistenceError::Decode(format!(
                "state version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }
        Ok(Some(state))
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(state).map_err(|e| PersistenceError::Encode(e.to_string()))?;
        let temp = self.temp_path();
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    state: Option<PersistedState>,
    saves: usize,
    failures_remaining: u32,
    corrupt: bool,
}

/// In-memory storage. Clones share the same slot, so a test can keep one
/// handle while the writer owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        let storage = Self::new();
        storage.lock().state = Some(state);
        storage
    }

    /// Make the next `count` saves fail.
    pub fn fail_next(&self, count: u32) {
        self.lock().failures_remaining = count;
    }

    /// Make every load report undecodable data.
    pub fn corrupt(&self) {
        self.lock().corrupt = true;
    }

    pub fn saved(&self) -> Option<PersistedState> {
        self.lock().state.clone()
    }

    /// Successful saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // a panicking test thread must not hide the stored value
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        let inner = self.lock();
        if inner.corrupt {
            return Err(PersistenceError::Decode("corrupt state".to_string()));
        }
        Ok(inner.state.clone())
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), PersistenceError> {
        let mut inner = self.lock();
        if inner.failures_remaining > 0 {
            inner.failures_remaining -= 1;
            return Err(PersistenceError::Io(std::io::Error::other(
                "simulated write failure",
            )));
        }
        inner.state = Some(state.clone());
        inner.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Wait after the given failed attempt (1-based): base, 2×base, 4×base...
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

enum WriterMessage {
    Preference(Preference),
    Themes(Vec<ThemeRecord>),
    Flush(mpsc::Sender<()>),
    Shutdown,
}

/// Cheap sender side of the writer. A detached handle drops every update,
/// which is what hosts without storage want.
#[derive(Debug, Clone, Default)]
pub struct PersistHandle {
    tx: Option<mpsc::Sender<WriterMessage>>,
}

impl PersistHandle {
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn is_detached(&self) -> bool {
        self.tx.is_none()
    }

    pub fn submit_preference(&self, preference: Preference) {
        self.send(WriterMessage::Preference(preference));
    }

    pub fn submit_themes(&self, themes: Vec<ThemeRecord>) {
        self.send(WriterMessage::Themes(themes));
    }

    fn send(&self, message: WriterMessage) {
        if let Some(tx) = &self.tx {
            if tx.send(message).is_err() {
                warn!("Persistence writer has stopped, update not saved");
            }
        }
    }
}

pub struct PersistenceWriter {
    tx: mpsc::Sender<WriterMessage>,
    thread: Option<JoinHandle<()>>,
}

impl PersistenceWriter {
    /// Start the writer thread. `initial` is the state the first save
    /// builds on, normally whatever was just loaded.
    pub fn spawn<S: Storage>(storage: S, initial: PersistedState, policy: RetryPolicy) -> Self {
        let (tx, rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("theme-persistence".to_string())
            .spawn(move || run_writer(storage, initial, policy, rx));

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(error = %e, "Failed to start persistence writer, changes will not be saved");
                None
            }
        };
        Self { tx, thread }
    }

    pub fn handle(&self) -> PersistHandle {
        PersistHandle {
            tx: Some(self.tx.clone()),
        }
    }

    /// Block until every update submitted before this call has been written
    /// or has exhausted its retries.
    pub fn flush(&self) {
        if self.thread.is_none() {
            return;
        }
        let (done_tx, done_rx) = mpsc::channel();
        if self.tx.send(WriterMessage::Flush(done_tx)).is_ok() {
            let _ = done_rx.recv();
        }
    }
}

impl Drop for PersistenceWriter {
    fn drop(&mut self) {
        let _ = self.tx.send(WriterMessage::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Persistence writer panicked");
            }
        }
    }
}

fn run_writer<S: Storage>(
    mut storage: S,
    mut state: PersistedState,
    policy: RetryPolicy,
    rx: mpsc::Receiver<WriterMessage>,
) {
    debug!("Persistence writer started");

    while let Ok(first) = rx.recv() {
        let mut dirty = false;
        let mut waiters = Vec::new();
        let mut shutdown = false;

        // take everything already queued so a burst becomes one save
        let mut next = Some(first);
        while let Some(message) = next {
            match message {
                WriterMessage::Preference(preference) => {
                    state.preference = preference;
                    dirty = true;
                }
                WriterMessage::Themes(themes) => {
                    state.themes = themes;
                    dirty = true;
                }
                WriterMessage::Flush(done) => waiters.push(done),
                WriterMessage::Shutdown => shutdown = true,
            }
            next = rx.try_recv().ok();
        }

        if dirty {
            save_with_retry(&mut storage, &mut state, &policy);
        }
        for waiter in waiters {
            let _ = waiter.send(());
        }
        if shutdown {
            break;
        }
    }

    debug!("Persistence writer stopped");
}

fn save_with_retry<S: Storage>(storage: &mut S, state: &mut PersistedState, policy: &RetryPolicy) {
    state.version = STATE_VERSION;
    state.saved_at = Some(Utc::now());

    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        match storage.save(state) {
            Ok(()) => {
                if attempt > 1 {
                    info!(attempt, "Persisted theme state after retry");
                } else {
                    debug!("Persisted theme state");
                }
                return;
            }
            Err(e) => {
                warn!(attempt, error = %e, "Failed to persist theme state");
                if attempt < attempts {
                    thread::sleep(policy.delay_after(attempt));
                }
            }
        }
    }

    error!(
        attempts,
        "Giving up on persisting theme state until the next change"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::AppearanceMode;
    use pretty_assertions::assert_eq;

    fn preference(id: &str) -> Preference {
        Preference {
            active_theme_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_retry_delays_grow_exponentially() {
        let policy = RetryPolicy::new(4, Duration::from_millis(100));
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn test_writer_saves_latest_value() {
        let storage = MemoryStorage::new();
        let writer =
            PersistenceWriter::spawn(storage.clone(), PersistedState::default(), RetryPolicy::immediate(1));
        let handle = writer.handle();

        handle.submit_preference(preference("default-dark"));
        handle.submit_preference(preference("warm-hearth"));
        writer.flush();

        let saved = storage.saved().unwrap();
        assert_eq!(saved.preference.active_theme_id, "warm-hearth");
        assert_eq!(saved.version, STATE_VERSION);
        assert!(saved.saved_at.is_some());
        assert!(storage.save_count() >= 1);
    }

    #[test]
    fn test_writer_retries_until_success() {
        let storage = MemoryStorage::new();
        storage.fail_next(2);
        let writer =
            PersistenceWriter::spawn(storage.clone(), PersistedState::default(), RetryPolicy::immediate(3));

        writer.handle().submit_preference(preference("sage-garden"));
        writer.flush();

        assert_eq!(storage.save_count(), 1);
        assert_eq!(storage.saved().unwrap().preference.active_theme_id, "sage-garden");
    }

    #[test]
    fn test_exhausted_retries_recover_on_next_change() {
        let storage = MemoryStorage::new();
        storage.fail_next(2);
        let writer =
            PersistenceWriter::spawn(storage.clone(), PersistedState::default(), RetryPolicy::immediate(2));
        let handle = writer.handle();

        handle.submit_preference(preference("sage-garden"));
        writer.flush();
        assert!(storage.saved().is_none());

        handle.submit_preference(Preference {
            appearance: AppearanceMode::Dark,
            ..preference("sage-garden")
        });
        writer.flush();
        let saved = storage.saved().unwrap();
        assert_eq!(saved.preference.active_theme_id, "sage-garden");
        assert_eq!(saved.preference.appearance, AppearanceMode::Dark);
    }

    #[test]
    fn test_themes_and_preference_share_one_record() {
        let storage = MemoryStorage::new();
        let writer =
            PersistenceWriter::spawn(storage.clone(), PersistedState::default(), RetryPolicy::immediate(1));
        let handle = writer.handle();

        handle.submit_preference(preference("default-dark"));
        handle.submit_themes(Vec::new());
        writer.flush();

        let saved = storage.saved().unwrap();
        assert_eq!(saved.preference.active_theme_id, "default-dark");
        assert!(saved.themes.is_empty());
    }

    #[test]
    fn test_drop_writes_pending_updates() {
        let storage = MemoryStorage::new();
        {
            let writer = PersistenceWriter::spawn(
                storage.clone(),
                PersistedState::default(),
                RetryPolicy::immediate(1),
            );
            writer.handle().submit_preference(preference("lavender-calm"));
        }
        assert_eq!(
            storage.saved().unwrap().preference.active_theme_id,
            "lavender-calm"
        );
    }

    #[test]
    fn test_detached_handle_ignores_updates() {
        let handle = PersistHandle::detached();
        assert!(handle.is_detached());
        handle.submit_preference(Preference::default());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested").join("state.toml"));
        assert!(storage.load().unwrap().is_none());

        let mut state = PersistedState::new(preference("forest-evening"), Vec::new());
        state.saved_at = Some(Utc::now());
        storage.save(&state).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.preference, state.preference);
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_file_storage_reports_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "this is { not toml").unwrap();
        let storage = FileStorage::new(&path);
        assert!(matches!(storage.load(), Err(PersistenceError::Decode(_))));
    }

    #[test]
    fn test_file_storage_rejects_future_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "version = 99\n").unwrap();
        assert!(matches!(
            FileStorage::new(&path).load(),
            Err(PersistenceError::Decode(_))
        ));
    }
}
