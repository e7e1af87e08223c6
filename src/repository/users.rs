//! User store

use std::sync::Arc;

use super::MemoryTable;
use crate::{error::AppResult, models::user::User};

#[derive(Clone, Default)]
pub struct UsersRepository {
    table: Arc<MemoryTable<User>>,
}

impl UsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new user. Timestamps are stamped by the caller.
    pub fn create(&self, user: User) -> AppResult<User> {
        self.table.insert(user)
    }

    pub fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.table.get(id)
    }

    pub fn list(&self) -> Vec<User> {
        self.table.list()
    }

    pub fn search(&self, needle: &str) -> Vec<User> {
        self.table.filter(|user| user.matches(needle))
    }

    pub fn update(&self, id: i64, user: User) -> AppResult<User> {
        self.table.replace(id, user)
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.table.remove(id).map(|_| ())
    }

    pub fn count(&self) -> usize {
        self.table.len()
    }
}
