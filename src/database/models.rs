use serde::Serialize;
use sqlx::FromRow;

/// Account row as loaded for credential checks. Never serialized; the
/// password hash must not leave the storage layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShelvingUnit {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Shelf {
    pub id: i64,
    pub name: String,
    pub shelving_unit_id: i64,
}

/// Shelf joined with its parent unit's name, for the flat catalog listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShelfWithUnit {
    pub id: i64,
    pub name: String,
    pub shelving_unit_id: i64,
    pub shelving_unit_name: String,
}
