//! Business logic services

pub mod catalog;
pub mod loans;
pub mod stats;
pub mod users;

use crate::{clock::SharedClock, config::LoansConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository, loans_config: &LoansConfig, clock: SharedClock) -> Self {
        Self {
            catalog: catalog::CatalogService::new(
                repository.clone(),
                clock.clone(),
                loans_config.loan_durations.clone(),
            ),
            users: users::UsersService::new(repository.clone(), clock.clone()),
            loans: loans::LoansService::new(
                repository.clone(),
                clock.clone(),
                loans_config.daily_fine,
            ),
            stats: stats::StatsService::new(repository, clock, loans_config.daily_fine),
        }
    }
}
