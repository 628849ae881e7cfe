use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three recurring jobs the schedule knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobId {
    UpdatePrices,
    UpdateOpen,
    UpdateClose,
}

impl JobId {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobId::UpdatePrices => "update_prices",
            JobId::UpdateOpen => "update_open",
            JobId::UpdateClose => "update_close",
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted state of one job: when it last finished and whether a run is
/// in flight. Survives restarts, so a crash mid-run needs a manual reset.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::scheduler_jobs)]
#[diesel(primary_key(job_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct JobState {
    pub job_id: String,
    pub last_run_at: Option<NaiveDateTime>,
    pub is_running: bool,
}

/// How a triggered run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    /// Another run of the same job was already in flight.
    Skipped,
}
