use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for scheduled-job operations. Provider failures never
/// surface here; the refresh jobs degrade to stored values instead.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for SchedulerError {
    fn from(err: DieselError) -> Self {
        SchedulerError::DatabaseError(err.to_string())
    }
}

impl From<crate::holdings::HoldingError> for SchedulerError {
    fn from(err: crate::holdings::HoldingError) -> Self {
        SchedulerError::DatabaseError(err.to_string())
    }
}

impl From<crate::portfolios::PortfolioError> for SchedulerError {
    fn from(err: crate::portfolios::PortfolioError) -> Self {
        SchedulerError::DatabaseError(err.to_string())
    }
}
