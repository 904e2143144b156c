use crate::errors::AppError;
use crate::store::MemoryStore;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Reads the data file. `Ok(None)` when it does not exist yet; `Err` carries
/// a message describing why an existing file cannot be used.
async fn read_entries(path: &Path) -> Result<Option<BTreeMap<String, String>>, String> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(format!("failed to read data file: {err}")),
    };
    let raw = serde_json::from_slice::<BTreeMap<String, Value>>(&bytes)
        .map_err(|err| format!("failed to parse data file: {err}"))?;
    Ok(Some(
        raw.into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect(),
    ))
}

pub async fn load_store(path: &Path) -> MemoryStore {
    let entries = match read_entries(path).await {
        Ok(entries) => entries.unwrap_or_default(),
        Err(message) => {
            error!("{message}");
            BTreeMap::new()
        }
    };
    MemoryStore::with_entries(entries)
}

pub async fn persist_store(path: &Path, store: &MemoryStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(&store.snapshot()).map_err(|err| {
        error!("failed to serialize state: {err}");
        AppError::internal(err)
    })?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write data file {}: {err}", path.display());
        AppError::internal(err)
    })?;
    Ok(())
}

/// Remembers the last reload failure so a file that stays broken is reported
/// once rather than on every tick.
#[derive(Debug, Default)]
struct ReloadFailures {
    last: Option<String>,
}

impl ReloadFailures {
    /// True when `message` differs from the failure seen on the previous tick.
    fn is_new(&mut self, message: &str) -> bool {
        if self.last.as_deref() == Some(message) {
            return false;
        }
        self.last = Some(message.to_string());
        true
    }

    /// Forgets the last failure. True when there was one to forget.
    fn recovered(&mut self) -> bool {
        self.last.take().is_some()
    }
}

/// Polls the data file for edits made by other processes and swaps them in
/// wholesale. `io_lock` is the same lock writers hold across mutate+persist.
pub fn spawn_reload_task(
    path: PathBuf,
    store: Arc<MemoryStore>,
    io_lock: Arc<Mutex<()>>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut failures = ReloadFailures::default();
        loop {
            ticker.tick().await;
            let _guard = io_lock.lock().await;
            match read_entries(&path).await {
                Ok(entries) => {
                    if failures.recovered() {
                        info!("data file is readable again: {}", path.display());
                    }
                    if let Some(entries) = entries {
                        if store.replace_all(entries) {
                            info!("reloaded state changed on disk: {}", path.display());
                        }
                    }
                }
                Err(message) => {
                    if failures.is_new(&message) {
                        error!("{message}; keeping the state in memory");
                    }
                }
            }
        }
    })
}
