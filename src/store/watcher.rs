use chrono::Local;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::WorkerStore;

pub const DAY_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Spawns a task that resets the stored today-advance total whenever the
/// local calendar day changes. Abort the handle to stop it.
pub fn spawn_day_watcher(store: WorkerStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;

            let today = Local::now().date_naive();
            match store.roll_over_today(today).await {
                Ok(true) => log::info!("New day {}, today's advance total reset", today),
                Ok(false) => {}
                Err(e) => log::error!("Failed to check today's advance total: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::TodayAdvance;
    use crate::store::{KeyValueStore, MemoryStore, TODAY_ADVANCE_KEY};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_watcher_resets_stale_total() {
        let kv = Arc::new(MemoryStore::new());
        let yesterday = Local::now().date_naive() - chrono::Duration::days(1);
        let stale = TodayAdvance {
            day: yesterday,
            total: 750.0,
        };
        kv.set(TODAY_ADVANCE_KEY, serde_json::to_string(&stale).unwrap())
            .await
            .unwrap();

        let store = WorkerStore::new(kv.clone());
        let handle = spawn_day_watcher(store.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        let raw = kv.get(TODAY_ADVANCE_KEY).await.unwrap().unwrap();
        let current: TodayAdvance = serde_json::from_str(&raw).unwrap();
        assert_eq!(current.day, Local::now().date_naive());
        assert_eq!(current.total, 0.0);
    }
}
