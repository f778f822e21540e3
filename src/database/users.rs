use sqlx::PgPool;

use super::{is_unique_violation, models::User, DatabaseError};

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account; the username is globally unique.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let insert = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await;

        let id = match insert {
            Ok(id) => id,
            Err(err) if is_unique_violation(&err) => {
                let _ = tx.rollback().await;
                return Err(DatabaseError::Conflict(format!(
                    "Nome de usuário '{username}' já está em uso."
                )));
            }
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err.into());
            }
        };

        tx.commit().await?;
        Ok(id)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
