//! `SeaORM` entity definitions.

pub mod coaches;
pub mod users;
