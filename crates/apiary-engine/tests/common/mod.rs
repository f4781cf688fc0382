use std::time::Duration;

use apiary_core::config::{CleanupConfig, LockConfig};
use apiary_engine::cell::CellService;
use apiary_store::store::memory::MemoryStore;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Builds a service backed by an in-memory store with its cleanup worker
/// running on the test runtime.
pub fn spawn_engine() -> CellService<MemoryStore> {
    let (service, worker) = CellService::new(
        MemoryStore::new(),
        LockConfig {
            retry_times: 5,
            retry_interval_ms: 5,
        },
        CleanupConfig {
            retry_max: 3,
            retry_interval_ms: 5,
        },
    );
    tokio::spawn(worker.run());
    service
}

/// Waits for the cleanup worker to report the given cell as fully removed.
pub async fn await_cleanup(rx: &mut broadcast::Receiver<Uuid>, cell_id: Uuid) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Ok(id) if id == cell_id => break,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => {
                    panic!("cleanup worker stopped before completing the cell")
                }
            }
        }
    })
    .await
    .expect("cleanup did not complete in time");
}
