use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::schema::users;
use crate::schema::users::dsl::*;

use super::users_errors::UserError;
use super::users_model::{NewUser, User, UserDB};
use super::Result;

/// Repository for user records
#[derive(Default)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, conn: &mut SqliteConnection, new_user: NewUser) -> Result<User> {
        new_user.validate()?;

        let email_taken = users
            .filter(email.eq(&new_user.email))
            .count()
            .get_result::<i64>(conn)?
            > 0;
        if email_taken {
            return Err(UserError::AlreadyExists(format!(
                "Email {} is already registered",
                new_user.email
            )));
        }

        let username_taken = users
            .filter(username.eq(&new_user.username))
            .count()
            .get_result::<i64>(conn)?
            > 0;
        if username_taken {
            return Err(UserError::AlreadyExists(format!(
                "Username {} is already taken",
                new_user.username
            )));
        }

        let user_db: UserDB = new_user.into();

        diesel::insert_into(users::table)
            .values(&user_db)
            .execute(conn)?;

        Ok(user_db.into())
    }

    pub fn get_by_id(&self, conn: &mut SqliteConnection, user_id: &str) -> Result<User> {
        users
            .find(user_id)
            .first::<UserDB>(conn)
            .map(User::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    UserError::NotFound(format!("User with id {} not found", user_id))
                }
                _ => UserError::DatabaseError(e.to_string()),
            })
    }

    pub fn get_by_email(&self, conn: &mut SqliteConnection, user_email: &str) -> Result<User> {
        users
            .filter(email.eq(user_email))
            .first::<UserDB>(conn)
            .map(User::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    UserError::NotFound(format!("No user registered under {}", user_email))
                }
                _ => UserError::DatabaseError(e.to_string()),
            })
    }

    /// Deletes a user; the portfolio and its children go with it through
    /// the cascading foreign keys.
    pub fn delete(&self, conn: &mut SqliteConnection, user_id: &str) -> Result<usize> {
        let affected = diesel::delete(users.find(user_id)).execute(conn)?;

        if affected == 0 {
            return Err(UserError::NotFound(format!(
                "User with id {} not found",
                user_id
            )));
        }

        Ok(affected)
    }
}
