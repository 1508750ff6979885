use async_trait::async_trait;
use domains::{DomainError, DomainResult, User, UserRepository};
use sqlx::postgres::PgPool;
use sqlx::Row;

use super::error::{internal, is_unique_violation};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert_user(&self, username: &str, password_hash: &str) -> DomainResult<()> {
        sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    DomainError::Conflict(format!("username {username} is already taken"))
                } else {
                    DomainError::internal("insert user", err)
                }
            })?;
        Ok(())
    }

    async fn find_user(&self, username: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query(
            "SELECT username, password_hash, created_time FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("find user"))?;

        row.map(|row| -> Result<User, sqlx::Error> {
            Ok(User {
                username: row.try_get("username")?,
                password_hash: row.try_get("password_hash")?,
                created_time: row.try_get("created_time")?,
            })
        })
        .transpose()
        .map_err(internal("decode user"))
    }
}
