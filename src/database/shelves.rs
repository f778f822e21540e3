use sqlx::PgPool;

use super::{
    is_foreign_key_violation, is_unique_violation,
    models::{Shelf, ShelfWithUnit},
    shelving_units::ensure_owned_unit,
    DatabaseError,
};

/// Caller-scoped CRUD over shelves. Operations that reference a unit check
/// unit ownership first; the check runs in the same transaction as the
/// dependent insert.
pub struct ShelfRepository {
    pool: PgPool,
}

impl ShelfRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_id: i64,
        unit_id: i64,
        name: &str,
    ) -> Result<Shelf, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        if let Err(err) = ensure_owned_unit(&mut *tx, owner_id, unit_id).await {
            let _ = tx.rollback().await;
            return Err(err);
        }

        let insert = sqlx::query_as::<_, Shelf>(
            "INSERT INTO shelves (name, shelving_unit_id, owner_id) \
             VALUES ($1, $2, $3) RETURNING id, name, shelving_unit_id",
        )
        .bind(name)
        .bind(unit_id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await;

        let shelf = match insert {
            Ok(shelf) => shelf,
            Err(err) if is_unique_violation(&err) => {
                let _ = tx.rollback().await;
                return Err(DatabaseError::Conflict(format!(
                    "Prateleira com o nome '{name}' já existe nesta estante para este usuário."
                )));
            }
            Err(err) if is_foreign_key_violation(&err) => {
                // Unit deleted by a concurrent request after the ownership check
                let _ = tx.rollback().await;
                return Err(DatabaseError::NotFound(
                    "Estante não encontrada ou você não tem permissão para acessá-la.".to_string(),
                ));
            }
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err.into());
            }
        };

        tx.commit().await?;
        Ok(shelf)
    }

    pub async fn list_by_unit(
        &self,
        owner_id: i64,
        unit_id: i64,
    ) -> Result<Vec<Shelf>, DatabaseError> {
        ensure_owned_unit(&self.pool, owner_id, unit_id).await?;

        let shelves = sqlx::query_as::<_, Shelf>(
            "SELECT id, name, shelving_unit_id FROM shelves \
             WHERE shelving_unit_id = $1 AND owner_id = $2 ORDER BY id",
        )
        .bind(unit_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shelves)
    }

    /// Every shelf the caller owns, joined with the parent unit's name and
    /// ordered by unit name then shelf name, for dropdown-style consumption.
    pub async fn list_all(&self, owner_id: i64) -> Result<Vec<ShelfWithUnit>, DatabaseError> {
        let shelves = sqlx::query_as::<_, ShelfWithUnit>(
            "SELECT s.id, s.name, s.shelving_unit_id, u.name AS shelving_unit_name \
             FROM shelves s \
             JOIN shelving_units u ON s.shelving_unit_id = u.id \
             WHERE s.owner_id = $1 \
             ORDER BY u.name, s.name",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shelves)
    }

    pub async fn update(&self, owner_id: i64, id: i64, name: &str) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE shelves SET name = $1 WHERE id = $2 AND owner_id = $3")
            .bind(name)
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(err) if is_unique_violation(&err) => {
                let _ = tx.rollback().await;
                return Err(DatabaseError::Conflict(format!(
                    "Prateleira com o nome '{name}' já existe nesta estante para este usuário."
                )));
            }
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err.into());
            }
        };

        if result.rows_affected() == 0 {
            let _ = tx.rollback().await;
            return Err(DatabaseError::NotFound(
                "Prateleira não encontrada ou você não tem permissão para atualizá-la.".to_string(),
            ));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete(&self, owner_id: i64, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM shelves WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err.into());
            }
        };

        if result.rows_affected() == 0 {
            let _ = tx.rollback().await;
            return Err(DatabaseError::NotFound(
                "Prateleira não encontrada ou você não tem permissão para excluí-la.".to_string(),
            ));
        }

        tx.commit().await?;
        Ok(())
    }
}
