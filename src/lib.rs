//! Bibliotheca Library Circulation Server
//!
//! Books, users and loans kept in in-memory stores, exposed through a REST
//! JSON API. The loan lifecycle (borrow, return, overdue fines) lives in
//! [`services::loans`].

use std::sync::Arc;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use api::build_router;
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use clock::SharedClock;
use repository::Repository;
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Fresh, empty stores wired to `clock`
    pub fn new(config: AppConfig, clock: SharedClock) -> Self {
        let services = Services::new(Repository::new(), &config.loans, clock);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
