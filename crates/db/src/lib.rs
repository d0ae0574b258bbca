//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for users and coaches
//! - Repository implementations of the core persistence contracts
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{CoachRepository, UserRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
