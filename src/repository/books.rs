//! Book store

use std::sync::Arc;

use super::MemoryTable;
use crate::{error::AppResult, models::book::Book};

#[derive(Clone, Default)]
pub struct BooksRepository {
    table: Arc<MemoryTable<Book>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new book; the id is assigned here
    pub fn create(&self, book: Book) -> AppResult<Book> {
        self.table.insert(book)
    }

    /// Get book by ID
    pub fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.table.get(id)
    }

    /// List all books
    pub fn list(&self) -> Vec<Book> {
        self.table.list()
    }

    /// Case-insensitive title/author search
    pub fn search(&self, needle: &str) -> Vec<Book> {
        self.table.filter(|book| book.matches(needle))
    }

    /// Replace the stored book, preserving its id
    pub fn update(&self, id: i64, book: Book) -> AppResult<Book> {
        self.table.replace(id, book)
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.table.remove(id).map(|_| ())
    }

    pub fn count(&self) -> usize {
        self.table.len()
    }

    /// Number of books with at least one copy on the shelf
    pub fn count_available(&self) -> usize {
        self.table.filter(|book| book.quantity > 0).len()
    }
}
