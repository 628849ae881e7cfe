use log::debug;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};

use super::users_model::{NewUser, User};
use super::users_repository::UserRepository;
use super::users_errors::UserError;
use super::Result;

/// Service for managing users
pub struct UserService {
    pool: Arc<DbPool>,
    repository: UserRepository,
}

impl UserService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: UserRepository::new(),
        }
    }

    pub fn create_user(&self, new_user: NewUser) -> Result<User> {
        debug!("Registering user {}", new_user.username);
        let mut conn = get_connection(&self.pool)
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        self.repository.create(&mut conn, new_user)
    }

    pub fn get_user(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        self.repository.get_by_id(&mut conn, user_id)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        self.repository.get_by_email(&mut conn, email)
    }

    pub fn delete_user(&self, user_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        self.repository.delete(&mut conn, user_id)?;
        Ok(())
    }
}
