use chrono::{NaiveDate, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::records::{
    AuthSession, LocalAdvance, LocalAttendance, LocalSalary, LocalSubscription, LocalWorker,
    RosterEntry, WorkerMap,
};
use super::{
    AUTH_TOKEN_KEY, KeyValueStore, SUBSCRIPTION_KEY, StoreError, TODAY_ADVANCE_KEY, USER_KEY,
    WORKER_LIST_KEY, WORKERS_KEY,
};
use crate::database::models::{AttendanceStatus, UserInfo};
use crate::payroll::{TodayAdvance, accrual_amount, next_status, validate_advance};

/// Worker bookkeeping on top of a key-value store.
///
/// Every mutation is a full read-modify-write of one key. The write lock
/// serialises those cycles within a process; it does nothing for other
/// processes sharing the same store.
#[derive(Clone)]
pub struct WorkerStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl WorkerStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.kv.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.kv.set(key, serde_json::to_string(value)?).await
    }

    /// Loads the worker map for display. A missing, unreadable or corrupt
    /// blob loads as an empty map. Writers go through [`Self::read_workers`]
    /// instead so a bad blob is never saved over.
    pub async fn load_workers(&self) -> WorkerMap {
        match self.read_json::<WorkerMap>(WORKERS_KEY).await {
            Ok(Some(workers)) => workers,
            Ok(None) => WorkerMap::new(),
            Err(e) => {
                log::error!("Error loading workers: {}", e);
                WorkerMap::new()
            }
        }
    }

    pub async fn save_workers(&self, workers: &WorkerMap) -> Result<(), StoreError> {
        self.write_json(WORKERS_KEY, workers).await
    }

    /// Strict read: a blob that fails to load is an error, not an empty map.
    pub async fn read_workers(&self) -> Result<WorkerMap, StoreError> {
        Ok(self.read_json(WORKERS_KEY).await?.unwrap_or_default())
    }

    async fn modify_worker<F>(&self, worker_id: &str, apply: F) -> Result<LocalWorker, StoreError>
    where
        F: FnOnce(&mut LocalWorker),
    {
        let _guard = self.write_lock.lock().await;
        self.modify_worker_locked(worker_id, apply).await
    }

    /// Caller must hold `write_lock`.
    async fn modify_worker_locked<F>(
        &self,
        worker_id: &str,
        apply: F,
    ) -> Result<LocalWorker, StoreError>
    where
        F: FnOnce(&mut LocalWorker),
    {
        let mut workers = self.read_workers().await?;
        let worker = workers.entry(worker_id.to_string()).or_default();
        apply(worker);
        let updated = worker.clone();

        self.save_workers(&workers).await?;

        Ok(updated)
    }

    /// Marks `date` with `status`, replacing any existing mark for that day.
    pub async fn update_attendance(
        &self,
        worker_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<LocalWorker, StoreError> {
        self.modify_worker(worker_id, |worker| {
            worker.upsert_attendance(LocalAttendance {
                date,
                status,
                marked_at: Utc::now(),
            });
        })
        .await
    }

    pub async fn update_salary(
        &self,
        worker_id: &str,
        date: NaiveDate,
        amount: f64,
        status: AttendanceStatus,
    ) -> Result<LocalWorker, StoreError> {
        self.modify_worker(worker_id, |worker| {
            worker.upsert_salary(LocalSalary {
                date,
                amount,
                status,
            });
        })
        .await
    }

    pub async fn update_worker_hidden_status(
        &self,
        worker_id: &str,
        hidden: bool,
    ) -> Result<LocalWorker, StoreError> {
        self.modify_worker(worker_id, |worker| worker.hidden = hidden)
            .await
    }

    /// Applies a status pick to `date`. Picking the status already stored
    /// clears the day together with its salary accrual; anything else
    /// stores the mark and its accrual at `daily_rate`.
    pub async fn toggle_attendance(
        &self,
        worker_id: &str,
        date: NaiveDate,
        chosen: AttendanceStatus,
        daily_rate: f64,
    ) -> Result<LocalWorker, StoreError> {
        self.modify_worker(worker_id, |worker| {
            match next_status(worker.status_on(date), chosen) {
                Some(status) => {
                    worker.upsert_attendance(LocalAttendance {
                        date,
                        status,
                        marked_at: Utc::now(),
                    });
                    worker.upsert_salary(LocalSalary {
                        date,
                        amount: accrual_amount(daily_rate, status),
                        status,
                    });
                }
                None => worker.clear_day(date),
            }
        })
        .await
    }

    /// Appends an advance and, when it is dated `today`, adds it to the
    /// running today total.
    pub async fn record_advance(
        &self,
        worker_id: &str,
        date: NaiveDate,
        amount: f64,
        today: NaiveDate,
    ) -> Result<TodayAdvance, StoreError> {
        validate_advance(amount, None)?;

        let _guard = self.write_lock.lock().await;

        // Both records are read before either is written, so a bad today
        // record fails the call before the advance lands.
        let mut current = self.load_today_advance(today).await?;
        current.roll_over(today);
        if date == today {
            current.add(date, amount);
        }

        self.modify_worker_locked(worker_id, |worker| {
            worker.advances.push(LocalAdvance { date, amount });
        })
        .await?;
        self.write_json(TODAY_ADVANCE_KEY, &current).await?;

        Ok(current)
    }

    async fn load_today_advance(&self, today: NaiveDate) -> Result<TodayAdvance, StoreError> {
        Ok(self
            .read_json::<TodayAdvance>(TODAY_ADVANCE_KEY)
            .await?
            .unwrap_or_else(|| TodayAdvance::new(today)))
    }

    /// Today's advance total, reset first if the stored day is behind.
    pub async fn today_advance(&self, today: NaiveDate) -> Result<TodayAdvance, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut current = self.load_today_advance(today).await?;
        if current.roll_over(today) {
            self.write_json(TODAY_ADVANCE_KEY, &current).await?;
        }

        Ok(current)
    }

    /// Resets the today total when the calendar day has moved on.
    /// Returns true only on the call that performs the reset.
    pub async fn roll_over_today(&self, today: NaiveDate) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let Some(mut current) = self.read_json::<TodayAdvance>(TODAY_ADVANCE_KEY).await? else {
            self.write_json(TODAY_ADVANCE_KEY, &TodayAdvance::new(today))
                .await?;
            return Ok(false);
        };

        let rolled = current.roll_over(today);
        if rolled {
            self.write_json(TODAY_ADVANCE_KEY, &current).await?;
        }

        Ok(rolled)
    }

    pub async fn load_subscription(&self) -> LocalSubscription {
        match self.read_json(SUBSCRIPTION_KEY).await {
            Ok(Some(subscription)) => subscription,
            Ok(None) => LocalSubscription::default(),
            Err(e) => {
                log::warn!("Ignoring unreadable subscription record: {}", e);
                LocalSubscription::default()
            }
        }
    }

    pub async fn save_subscription(
        &self,
        subscription: &LocalSubscription,
    ) -> Result<(), StoreError> {
        self.write_json(SUBSCRIPTION_KEY, subscription).await
    }

    pub async fn load_worker_list(&self) -> Result<Vec<RosterEntry>, StoreError> {
        Ok(self
            .read_json(WORKER_LIST_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn add_to_worker_list(&self, entry: RosterEntry) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut roster = self.load_worker_list().await?;
        roster.retain(|existing| existing.id != entry.id);
        roster.push(entry);

        self.write_json(WORKER_LIST_KEY, &roster).await
    }

    /// Stores the token and the user under separate keys.
    pub async fn save_session(&self, session: &AuthSession) -> Result<(), StoreError> {
        self.kv.set(AUTH_TOKEN_KEY, session.token.clone()).await?;
        self.write_json(USER_KEY, &session.user).await
    }

    pub async fn load_session(&self) -> Result<Option<AuthSession>, StoreError> {
        let Some(token) = self.kv.get(AUTH_TOKEN_KEY).await? else {
            return Ok(None);
        };
        let Some(user) = self.read_json::<UserInfo>(USER_KEY).await? else {
            return Ok(None);
        };

        Ok(Some(AuthSession { token, user }))
    }

    pub async fn clear_session(&self) -> Result<(), StoreError> {
        self.kv.remove(AUTH_TOKEN_KEY).await?;
        self.kv.remove(USER_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Plan, SubscriptionStatus};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn store() -> WorkerStore {
        WorkerStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_missing_blob_loads_empty() {
        assert!(store().load_workers().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_blob_loads_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(WORKERS_KEY, "{not json".to_string()).await.unwrap();

        let store = WorkerStore::new(kv);
        assert!(store.load_workers().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_never_overwritten() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(WORKERS_KEY, "{not json".to_string()).await.unwrap();
        let store = WorkerStore::new(kv.clone());
        let day = d("2025-01-10");

        assert!(store
            .update_attendance("w3", day, AttendanceStatus::Present)
            .await
            .is_err());
        assert!(store.update_worker_hidden_status("w3", true).await.is_err());
        assert!(store.record_advance("w3", day, 100.0, day).await.is_err());

        assert_eq!(kv.get(WORKERS_KEY).await.unwrap().as_deref(), Some("{not json"));
        assert_eq!(store.today_advance(day).await.unwrap().total, 0.0);
    }

    #[tokio::test]
    async fn test_legacy_blob_with_epoch_millis_keeps_other_workers() {
        let kv = Arc::new(MemoryStore::new());
        let legacy = r#"{
            "w1": {"attendance": [{"date": "2025-01-01", "status": "present", "markedAt": 1735689600000}]},
            "w2": {"hidden": true, "advances": [{"date": "2025-01-01", "amount": 200}]}
        }"#;
        kv.set(WORKERS_KEY, legacy.to_string()).await.unwrap();
        let store = WorkerStore::new(kv);

        store
            .update_attendance("w3", d("2025-01-02"), AttendanceStatus::Half)
            .await
            .unwrap();

        let workers = store.read_workers().await.unwrap();
        assert_eq!(workers.len(), 3);
        assert_eq!(
            workers["w1"].attendance[0].marked_at.timestamp_millis(),
            1735689600000
        );
        assert!(workers["w2"].hidden);
        assert_eq!(workers["w2"].advances[0].amount, 200.0);
    }

    #[tokio::test]
    async fn test_advance_and_today_total_land_together() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(TODAY_ADVANCE_KEY, "garbage".to_string()).await.unwrap();
        let store = WorkerStore::new(kv);
        let today = d("2025-01-10");

        assert!(store.record_advance("w1", today, 100.0, today).await.is_err());
        assert!(store.read_workers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_attendance_replaces_same_day() {
        let store = store();
        store
            .update_attendance("w1", d("2025-01-10"), AttendanceStatus::Present)
            .await
            .unwrap();
        store
            .update_attendance("w1", d("2025-01-10"), AttendanceStatus::Half)
            .await
            .unwrap();
        store
            .update_attendance("w1", d("2025-01-11"), AttendanceStatus::Absent)
            .await
            .unwrap();

        let workers = store.load_workers().await;
        let worker = &workers["w1"];
        assert_eq!(worker.attendance.len(), 2);
        assert_eq!(worker.status_on(d("2025-01-10")), Some(AttendanceStatus::Half));
    }

    #[tokio::test]
    async fn test_toggle_same_status_clears_day_and_accrual() {
        let store = store();
        let day = d("2025-01-10");

        let worker = store
            .toggle_attendance("w1", day, AttendanceStatus::Half, 500.0)
            .await
            .unwrap();
        assert_eq!(worker.salary_on(day).map(|s| s.amount), Some(250.0));

        let worker = store
            .toggle_attendance("w1", day, AttendanceStatus::Half, 500.0)
            .await
            .unwrap();
        assert_eq!(worker.status_on(day), None);
        assert!(worker.salary_on(day).is_none());
    }

    #[tokio::test]
    async fn test_hidden_status_on_unknown_worker_creates_entry() {
        let store = store();
        let worker = store.update_worker_hidden_status("ghost", true).await.unwrap();

        assert!(worker.hidden);
        assert!(store.load_workers().await["ghost"].hidden);
    }

    #[tokio::test]
    async fn test_update_salary_upserts() {
        let store = store();
        let day = d("2025-01-10");
        store
            .update_salary("w1", day, 500.0, AttendanceStatus::Present)
            .await
            .unwrap();
        let worker = store
            .update_salary("w1", day, 0.0, AttendanceStatus::Absent)
            .await
            .unwrap();

        assert_eq!(worker.salary.len(), 1);
        assert_eq!(worker.salary[0].status, AttendanceStatus::Absent);
    }

    #[tokio::test]
    async fn test_today_advance_accumulates_then_resets_once() {
        let store = store();
        let today = d("2025-01-10");

        store.record_advance("w1", today, 300.0, today).await.unwrap();
        let total = store.record_advance("w2", today, 200.0, today).await.unwrap();
        assert_eq!(total.total, 500.0);

        // Back-dated advances are kept but not counted for today.
        let total = store
            .record_advance("w1", d("2025-01-09"), 50.0, today)
            .await
            .unwrap();
        assert_eq!(total.total, 500.0);

        let tomorrow = d("2025-01-11");
        assert!(store.roll_over_today(tomorrow).await.unwrap());
        assert!(!store.roll_over_today(tomorrow).await.unwrap());
        assert_eq!(store.today_advance(tomorrow).await.unwrap().total, 0.0);
    }

    #[tokio::test]
    async fn test_record_advance_rejects_non_positive() {
        let store = store();
        let today = d("2025-01-10");

        assert!(store.record_advance("w1", today, 0.0, today).await.is_err());
        assert!(store.load_workers().await.is_empty());
    }

    #[tokio::test]
    async fn test_subscription_defaults_to_basic() {
        let store = store();
        assert_eq!(
            store.load_subscription().await,
            LocalSubscription {
                plan: Plan::Basic,
                status: SubscriptionStatus::Active
            }
        );

        let pro = LocalSubscription {
            plan: Plan::Pro,
            status: SubscriptionStatus::Active,
        };
        store.save_subscription(&pro).await.unwrap();
        assert_eq!(store.load_subscription().await, pro);
    }

    #[tokio::test]
    async fn test_concurrent_updates_do_not_lose_writes() {
        let store = store();
        let start = d("2025-01-01");

        let mut handles = Vec::new();
        for offset in 0..20 {
            let store = store.clone();
            let day = start + chrono::Duration::days(offset);
            handles.push(tokio::spawn(async move {
                store
                    .update_attendance("w1", day, AttendanceStatus::Present)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.load_workers().await["w1"].attendance.len(), 20);
    }
}
