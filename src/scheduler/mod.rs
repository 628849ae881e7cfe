pub(crate) mod scheduler_errors;
pub(crate) mod scheduler_model;
pub(crate) mod scheduler_repository;
pub(crate) mod scheduler_service;

pub use scheduler_errors::SchedulerError;
pub use scheduler_model::{JobId, JobOutcome, JobState};
pub use scheduler_repository::SchedulerRepository;
pub use scheduler_service::{JobScheduler, SchedulerService};

pub type Result<T> = std::result::Result<T, SchedulerError>;
