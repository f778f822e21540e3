use sqlx::PgPool;

use super::{is_unique_violation, models::ShelvingUnit, DatabaseError};

/// Caller-scoped CRUD over shelving units. Every statement combines the row
/// id with the owner id, so "does not exist" and "not owned by the caller"
/// are indistinguishable to clients.
pub struct ShelvingUnitRepository {
    pool: PgPool,
}

impl ShelvingUnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: i64, name: &str) -> Result<ShelvingUnit, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let insert = sqlx::query_as::<_, ShelvingUnit>(
            "INSERT INTO shelving_units (name, owner_id) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(name)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await;

        let unit = match insert {
            Ok(unit) => unit,
            Err(err) if is_unique_violation(&err) => {
                let _ = tx.rollback().await;
                return Err(DatabaseError::Conflict(format!(
                    "Estante com o nome '{name}' já existe para este usuário."
                )));
            }
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err.into());
            }
        };

        tx.commit().await?;
        Ok(unit)
    }

    pub async fn list(&self, owner_id: i64) -> Result<Vec<ShelvingUnit>, DatabaseError> {
        let units = sqlx::query_as::<_, ShelvingUnit>(
            "SELECT id, name FROM shelving_units WHERE owner_id = $1 ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }

    pub async fn update(&self, owner_id: i64, id: i64, name: &str) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result =
            sqlx::query("UPDATE shelving_units SET name = $1 WHERE id = $2 AND owner_id = $3")
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
                    "Estante com o nome '{name}' já existe para este usuário."
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
                "Estante não encontrada ou você não tem permissão para atualizá-la.".to_string(),
            ));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete(&self, owner_id: i64, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM shelving_units WHERE id = $1 AND owner_id = $2")
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
                "Estante não encontrada ou você não tem permissão para excluí-la.".to_string(),
            ));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Asserts the unit exists and belongs to the caller. Mandatory precondition
/// for every shelf operation that references a unit; without it a caller
/// could attach shelves to another user's unit by guessing its id.
pub async fn ensure_owned_unit<'e, E>(
    executor: E,
    owner_id: i64,
    unit_id: i64,
) -> Result<(), DatabaseError>
where
    E: sqlx::PgExecutor<'e>,
{
    let found =
        sqlx::query_scalar::<_, i64>("SELECT id FROM shelving_units WHERE id = $1 AND owner_id = $2")
            .bind(unit_id)
            .bind(owner_id)
            .fetch_optional(executor)
            .await?;

    if found.is_none() {
        return Err(DatabaseError::NotFound(
            "Estante não encontrada ou você não tem permissão para acessá-la.".to_string(),
        ));
    }

    Ok(())
}
