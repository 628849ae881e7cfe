use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::users_errors::UserError;

/// Domain model representing a registered player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Database model for users
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Input model for registering a new user. The password arrives already
/// hashed; credential handling lives in the web layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn validate(&self) -> super::Result<()> {
        if !self.email.contains('@') {
            return Err(UserError::InvalidData(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if self.username.trim().len() < 2 {
            return Err(UserError::InvalidData(
                "Username must be at least 2 characters".to_string(),
            ));
        }
        if self.password_hash.trim().is_empty() {
            return Err(UserError::InvalidData(
                "Password hash cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            email: db.email,
            username: db.username,
            password_hash: db.password_hash,
            created_at: DateTime::from_naive_utc_and_offset(db.created_at, Utc),
        }
    }
}

impl From<NewUser> for UserDB {
    fn from(domain: NewUser) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: domain.email,
            username: domain.username,
            password_hash: domain.password_hash,
            created_at: Utc::now().naive_utc(),
        }
    }
}
