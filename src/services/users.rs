//! User management service

use validator::Validate;

use crate::{
    clock::SharedClock,
    error::{AppError, AppResult},
    models::user::{User, UserInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    clock: SharedClock,
}

impl UsersService {
    pub fn new(repository: Repository, clock: SharedClock) -> Self {
        Self { repository, clock }
    }

    pub fn create_user(&self, input: UserInput) -> AppResult<User> {
        input.validate()?;
        let now = self.clock.now();

        let user = self.repository.users.create(User {
            id: 0,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            created_at: now,
            updated_at: now,
        })?;

        tracing::info!("User {} created", user.id);
        Ok(user)
    }

    pub fn get_user(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.repository.users.list()
    }

    pub fn search_users(&self, query: Option<&str>) -> Vec<User> {
        match query.map(str::trim) {
            Some(q) if !q.is_empty() => self.repository.users.search(q),
            _ => self.repository.users.list(),
        }
    }

    pub fn update_user(&self, id: i64, input: UserInput) -> AppResult<User> {
        input.validate()?;

        let existing = self.repository.users.get_by_id(id)?;
        let user = self.repository.users.update(
            id,
            User {
                id,
                name: input.name.trim().to_string(),
                email: input.email.trim().to_lowercase(),
                created_at: existing.created_at,
                updated_at: self.clock.now(),
            },
        )?;

        tracing::info!("User {} updated", id);
        Ok(user)
    }

    /// Delete a user who holds no active loan
    pub fn delete_user(&self, id: i64) -> AppResult<()> {
        let _circulation = self.repository.circulation();

        self.repository.users.get_by_id(id)?;
        if self.repository.loans.has_active_for_user(id) {
            return Err(AppError::Conflict(format!(
                "User {} has an active loan and cannot be deleted",
                id
            )));
        }
        self.repository.users.delete(id)?;

        tracing::info!("User {} deleted", id);
        Ok(())
    }
}
