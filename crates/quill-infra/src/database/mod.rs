//! Database connection management and repositories.

mod connections;
pub mod entity;
mod pg_base;
pub mod pg_repo;

pub use connections::{DatabaseConfig, connect};
pub use pg_repo::{
    PgAuthorRepository, PgCategoryRepository, PgPostRepository, PgSignupRepository,
    PgUserRepository,
};

#[cfg(test)]
mod tests;
