//! Catalog service: book management

use validator::Validate;

use crate::{
    clock::SharedClock,
    error::{AppError, AppResult},
    models::book::{Book, BookInput, BookType},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    clock: SharedClock,
    loan_durations: Vec<i64>,
}

impl CatalogService {
    pub fn new(repository: Repository, clock: SharedClock, loan_durations: Vec<i64>) -> Self {
        Self {
            repository,
            clock,
            loan_durations,
        }
    }

    /// Validate input and resolve the stored loan duration
    fn loan_duration(&self, input: &BookInput) -> AppResult<i64> {
        input.validate()?;

        match input.book_type {
            BookType::Reference => Ok(0),
            BookType::Loanable => match input.loan_duration_days {
                Some(days) if self.loan_durations.contains(&days) => Ok(days),
                _ => Err(AppError::Validation(format!(
                    "loan_duration_days: loanable books must be lent for one of {:?} days",
                    self.loan_durations
                ))),
            },
        }
    }

    pub fn create_book(&self, input: BookInput) -> AppResult<Book> {
        let loan_duration_days = self.loan_duration(&input)?;
        let now = self.clock.now();

        let book = self.repository.books.create(Book {
            id: 0,
            title: input.title.trim().to_string(),
            author: input.author.trim().to_string(),
            quantity: input.quantity,
            book_type: input.book_type,
            loan_duration_days,
            created_at: now,
            updated_at: now,
        })?;

        tracing::info!("Book {} created: {}", book.id, book.title);
        Ok(book)
    }

    pub fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id)
    }

    pub fn list_books(&self) -> Vec<Book> {
        self.repository.books.list()
    }

    /// Books whose title or author contains `query`; all books when blank
    pub fn search_books(&self, query: Option<&str>) -> Vec<Book> {
        match query.map(str::trim) {
            Some(q) if !q.is_empty() => self.repository.books.search(q),
            _ => self.repository.books.list(),
        }
    }

    /// Replace a book's fields, keeping its id and creation time
    pub fn update_book(&self, id: i64, input: BookInput) -> AppResult<Book> {
        let loan_duration_days = self.loan_duration(&input)?;

        // Stock is also written by the loan lifecycle
        let _circulation = self.repository.circulation();

        let existing = self.repository.books.get_by_id(id)?;
        let book = self.repository.books.update(
            id,
            Book {
                id,
                title: input.title.trim().to_string(),
                author: input.author.trim().to_string(),
                quantity: input.quantity,
                book_type: input.book_type,
                loan_duration_days,
                created_at: existing.created_at,
                updated_at: self.clock.now(),
            },
        )?;

        tracing::info!("Book {} updated", id);
        Ok(book)
    }

    /// Delete a book that has no active loan
    pub fn delete_book(&self, id: i64) -> AppResult<()> {
        let _circulation = self.repository.circulation();

        self.repository.books.get_by_id(id)?;
        if self.repository.loans.has_active_for_book(id) {
            return Err(AppError::Conflict(format!(
                "Book {} has active loans and cannot be deleted",
                id
            )));
        }
        self.repository.books.delete(id)?;

        tracing::info!("Book {} deleted", id);
        Ok(())
    }
}
