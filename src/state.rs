use sqlx::PgPool;

use crate::auth::{PasswordService, TokenService};
use crate::database::{
    shelves::ShelfRepository, shelving_units::ShelvingUnitRepository, users::UserRepository,
};

/// Shared application state. Built once in `main` and injected into the
/// router as an `Extension`, so every handler's dependencies are explicit.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenService,
    pub passwords: PasswordService,
}

impl AppState {
    pub fn new(pool: PgPool, tokens: TokenService, passwords: PasswordService) -> Self {
        Self {
            pool,
            tokens,
            passwords,
        }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn shelving_units(&self) -> ShelvingUnitRepository {
        ShelvingUnitRepository::new(self.pool.clone())
    }

    pub fn shelves(&self) -> ShelfRepository {
        ShelfRepository::new(self.pool.clone())
    }
}
