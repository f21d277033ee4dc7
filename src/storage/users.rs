use chrono::Utc;

use super::schema::Database;
use super::types::{is_unique_violation, StoreError, User, UserInsert};

impl Database {
    // ========================================================================
    // User Operations
    // ========================================================================

    pub async fn create_user(&self, name: &str) -> Result<UserInsert, StoreError> {
        let now = Utc::now().timestamp();
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (created_at, name) VALUES (?, ?) RETURNING id, created_at, name",
        )
        .bind(now)
        .bind(name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(UserInsert::Created(user)),
            Err(e) if is_unique_violation(&e) => Ok(UserInsert::DuplicateName),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT id, created_at, name FROM users WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn list_user_names(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM users ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Delete every user. Their feeds, follows, and posts cascade away with
    /// them. Returns the number of users removed.
    pub async fn delete_all_users(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
