use chrono::{Local, NaiveDate, Utc};
use uuid::Uuid;

use super::{ApiClient, ClientError};
use crate::database::models::{
    Advance, AdvanceInput, AttendanceInput, AttendanceStatus, AttendanceToggleResult,
    AuthResponse, CreateWorkerInput, DEFAULT_DAILY_RATE, DEFAULT_SITE, LoginInput, Worker,
};
use crate::payroll::TodayAdvance;
use crate::store::{AuthSession, LocalWorker, RosterEntry, WorkerStore};

/// Where an operation ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Synced<R, L> {
    /// Accepted by the backend.
    Remote(R),
    /// Backend unreachable or failing; applied to the local store instead.
    Local(L),
}

impl<R, L> Synced<R, L> {
    pub fn is_remote(&self) -> bool {
        matches!(self, Synced::Remote(_))
    }
}

/// Backend first, local store when the backend is unreachable or answers
/// with a server error. Rejections (4xx) are returned to the caller and
/// never written locally.
#[derive(Clone)]
pub struct OfflineClient {
    api: ApiClient,
    store: WorkerStore,
}

impl OfflineClient {
    pub fn new(api: ApiClient, store: WorkerStore) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &WorkerStore {
        &self.store
    }

    /// Picks up a session saved by an earlier login.
    pub async fn restore_session(&self) -> Result<Option<AuthSession>, ClientError> {
        let session = self.store.load_session().await?;
        if let Some(session) = &session {
            self.api.set_token(Some(session.token.clone())).await;
        }
        Ok(session)
    }

    /// Logs in against the backend and keeps the session locally. There
    /// is no offline login.
    pub async fn login(&self, input: &LoginInput) -> Result<AuthResponse, ClientError> {
        let response = self.api.login(input).await?;

        self.store
            .save_session(&AuthSession {
                token: response.access_token.clone(),
                user: response.user.clone(),
            })
            .await?;

        Ok(response)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.api.set_token(None).await;
        self.store.clear_session().await?;
        Ok(())
    }

    pub async fn create_worker(
        &self,
        input: CreateWorkerInput,
    ) -> Result<Synced<Worker, RosterEntry>, ClientError> {
        match self.api.create_worker(&input).await {
            Ok(worker) => Ok(Synced::Remote(worker)),
            Err(e) if e.is_backend_unavailable() => {
                log::warn!("Backend create worker failed, saving locally: {}", e);

                let entry = RosterEntry {
                    id: Uuid::new_v4().to_string(),
                    name: input.name,
                    phone: input.phone,
                    role: input.role,
                    site_id: input.site_id.unwrap_or_else(|| DEFAULT_SITE.to_string()),
                    daily_rate: input.daily_rate.unwrap_or(DEFAULT_DAILY_RATE),
                    max_advance_limit: input.max_advance_limit,
                    created_at: Utc::now(),
                };
                self.store.add_to_worker_list(entry.clone()).await?;

                Ok(Synced::Local(entry))
            }
            Err(e) => Err(e),
        }
    }

    /// Toggle-style attendance pick for one day.
    pub async fn toggle_attendance(
        &self,
        worker_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        daily_rate: f64,
    ) -> Result<Synced<AttendanceToggleResult, LocalWorker>, ClientError> {
        let input = AttendanceInput {
            worker_id: worker_id.to_string(),
            date,
            status,
        };

        match self.api.toggle_attendance(&input).await {
            Ok(result) => Ok(Synced::Remote(result)),
            Err(e) if e.is_backend_unavailable() => {
                log::warn!("Backend attendance update failed, saving locally: {}", e);
                let worker = self
                    .store
                    .toggle_attendance(worker_id, date, status, daily_rate)
                    .await?;
                Ok(Synced::Local(worker))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn record_advance(
        &self,
        worker_id: &str,
        date: NaiveDate,
        amount: f64,
    ) -> Result<Synced<Advance, TodayAdvance>, ClientError> {
        let input = AdvanceInput {
            worker_id: worker_id.to_string(),
            amount,
            date,
        };

        match self.api.record_advance(&input).await {
            Ok(advance) => Ok(Synced::Remote(advance)),
            Err(e) if e.is_backend_unavailable() => {
                log::warn!("Backend advance failed, saving locally: {}", e);
                let today = Local::now().date_naive();
                let total = self
                    .store
                    .record_advance(worker_id, date, amount, today)
                    .await?;
                Ok(Synced::Local(total))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn set_hidden(
        &self,
        worker_id: &str,
        hidden: bool,
    ) -> Result<Synced<Worker, LocalWorker>, ClientError> {
        match self.api.set_hidden(worker_id, hidden).await {
            Ok(worker) => Ok(Synced::Remote(worker)),
            Err(e) if e.is_backend_unavailable() => {
                log::warn!("Backend hide worker failed, saving locally: {}", e);
                let worker = self
                    .store
                    .update_worker_hidden_status(worker_id, hidden)
                    .await?;
                Ok(Synced::Local(worker))
            }
            Err(e) => Err(e),
        }
    }
}
