pub(crate) mod users_errors;
pub(crate) mod users_model;
pub(crate) mod users_repository;
pub(crate) mod users_service;

pub use users_errors::UserError;
pub use users_model::{NewUser, User, UserDB};
pub use users_repository::UserRepository;
pub use users_service::UserService;

pub type Result<T> = std::result::Result<T, UserError>;
