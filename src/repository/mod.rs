//! Repository layer: in-memory stores
//!
//! Each store exclusively owns its entity map and id counter behind a
//! reader/writer lock. Records go in and come out by value; nothing outside
//! a store holds a reference into its map.

pub mod books;
pub mod loans;
pub mod users;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::error::{AppError, AppResult};

/// A record owned by a store and identified by a store-assigned id
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in error messages
    const KIND: &'static str;

    fn set_id(&mut self, id: i64);
}

struct Rows<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

/// Map of records plus the next id to hand out
pub struct MemoryTable<T> {
    inner: RwLock<Rows<T>>,
}

impl<T: Entity> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryTable<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("{} with id {} not found", T::KIND, id))
    }

    /// Assign the next id to `record` and store it
    pub fn insert(&self, mut record: T) -> AppResult<T> {
        let mut table = self.inner.write();
        let id = table.next_id;
        table.next_id = id
            .checked_add(1)
            .ok_or_else(|| AppError::Internal(format!("{} id space exhausted", T::KIND)))?;
        record.set_id(id);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    pub fn get(&self, id: i64) -> AppResult<T> {
        self.inner
            .read()
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    /// All records in id order
    pub fn list(&self) -> Vec<T> {
        self.inner.read().rows.values().cloned().collect()
    }

    pub fn filter<F>(&self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.inner
            .read()
            .rows
            .values()
            .filter(|&row| predicate(row))
            .cloned()
            .collect()
    }

    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.inner.read().rows.values().any(predicate)
    }

    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the record stored under `id`; the stored id is kept.
    pub fn replace(&self, id: i64, mut record: T) -> AppResult<T> {
        let mut table = self.inner.write();
        let slot = table.rows.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        record.set_id(id);
        *slot = record.clone();
        Ok(record)
    }

    pub fn remove(&self, id: i64) -> AppResult<T> {
        self.inner
            .write()
            .rows
            .remove(&id)
            .ok_or_else(|| Self::not_found(id))
    }
}

/// All stores plus the lock serializing cross-store circulation sequences
#[derive(Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub loans: loans::LoansRepository,
    circulation: Arc<Mutex<()>>,
}

impl Repository {
    /// Create a repository with empty stores
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold this while performing a check-then-act sequence spanning stores
    /// (loan creation and return, book replacement, book/user deletion).
    pub fn circulation(&self) -> MutexGuard<'_, ()> {
        self.circulation.lock()
    }
}
