use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::schema::scheduler_jobs;

use super::scheduler_model::{JobId, JobState};
use super::Result;

/// Repository for the job-state table backing the overlap guard.
#[derive(Default)]
pub struct SchedulerRepository;

impl SchedulerRepository {
    pub fn new() -> Self {
        Self
    }

    /// Makes sure a state row exists for the job. Idempotent.
    pub fn ensure_job(&self, conn: &mut SqliteConnection, job: JobId) -> Result<()> {
        diesel::insert_or_ignore_into(scheduler_jobs::table)
            .values(&JobState {
                job_id: job.as_str().to_string(),
                last_run_at: None,
                is_running: false,
            })
            .execute(conn)?;
        Ok(())
    }

    /// Atomically claims the job. Returns false when another run already
    /// holds it; the conditional UPDATE is the whole guard.
    pub fn try_acquire(&self, conn: &mut SqliteConnection, job: JobId) -> Result<bool> {
        let claimed = diesel::update(
            scheduler_jobs::table
                .find(job.as_str())
                .filter(scheduler_jobs::is_running.eq(false)),
        )
        .set(scheduler_jobs::is_running.eq(true))
        .execute(conn)?;

        Ok(claimed == 1)
    }

    /// Releases the job and stamps the completion time.
    pub fn release(&self, conn: &mut SqliteConnection, job: JobId) -> Result<()> {
        diesel::update(scheduler_jobs::table.find(job.as_str()))
            .set((
                scheduler_jobs::is_running.eq(false),
                scheduler_jobs::last_run_at.eq(Some(Utc::now().naive_utc())),
            ))
            .execute(conn)?;
        Ok(())
    }

    pub fn get(&self, conn: &mut SqliteConnection, job: JobId) -> Result<Option<JobState>> {
        Ok(scheduler_jobs::table
            .find(job.as_str())
            .first::<JobState>(conn)
            .optional()?)
    }
}
