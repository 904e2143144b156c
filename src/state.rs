use crate::stats::LiveSnapshot;
use crate::store::{MemoryStore, StateStore};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<MemoryStore>,
    pub live: LiveSnapshot,
    /// Held across every mutate+persist and every reload from disk.
    pub io_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let live = LiveSnapshot::attach(Arc::clone(&store) as Arc<dyn StateStore>);
        Self {
            data_path,
            store,
            live,
            io_lock: Arc::new(Mutex::new(())),
        }
    }
}
