pub(crate) mod ranking_model;
pub(crate) mod ranking_service;

pub use ranking_model::{DailyPerformer, RankLabel, RankedPerformer};
pub use ranking_service::RankingService;
