use crate::db::traits::DatabaseClient;
use crate::types::{AppError, Chirp, RefreshTokenRecord, Result, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row, Value};
use uuid::Uuid;

/// libsql-backed store for users, refresh tokens and chirps.
pub struct TursoClient {
    _db: Database,
    // `:memory:` databases live as long as their connection, so one
    // connection is held for the lifetime of the client and shared.
    conn: Connection,
}

impl TursoClient {
    /// Opens an ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::open(":memory:").await
    }

    /// Opens (or creates) a local SQLite database file.
    pub async fn new_local(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create database directory: {}", e))
                })?;
            }
        }
        Self::open(path).await
    }

    async fn open(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        tracing::info!(path = %path, "Database ready");
        Ok(client)
    }

    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                is_chirpy_red INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Refresh tokens table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS refresh_tokens (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                revoked_at INTEGER,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create refresh_tokens table: {}", e)))?;

        // Chirps table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS chirps (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create chirps table: {}", e)))?;

        Ok(())
    }

    async fn query_one<T>(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
        map: fn(&Row) -> Result<T>,
    ) -> Result<Option<T>> {
        let mut rows = self
            .connection()
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Query failed: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(map(&row)?)),
            None => Ok(None),
        }
    }
}

fn text(row: &Row, idx: i32) -> Result<String> {
    row.get::<String>(idx)
        .map_err(|e| AppError::Database(e.to_string()))
}

fn integer(row: &Row, idx: i32) -> Result<i64> {
    row.get::<i64>(idx)
        .map_err(|e| AppError::Database(e.to_string()))
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp: {}", secs)))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::Database(format!("Invalid id '{}': {}", raw, e)))
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: parse_id(&text(row, 0)?)?,
        email: text(row, 1)?,
        password_hash: text(row, 2)?,
        is_chirpy_red: integer(row, 3)? != 0,
        created_at: timestamp(integer(row, 4)?)?,
        updated_at: timestamp(integer(row, 5)?)?,
    })
}

fn refresh_token_from_row(row: &Row) -> Result<RefreshTokenRecord> {
    let revoked_at = match row
        .get_value(4)
        .map_err(|e| AppError::Database(e.to_string()))?
    {
        Value::Null => None,
        Value::Integer(secs) => Some(timestamp(secs)?),
        other => {
            return Err(AppError::Database(format!(
                "Unexpected revoked_at value: {:?}",
                other
            )))
        }
    };

    Ok(RefreshTokenRecord {
        token: text(row, 0)?,
        user_id: parse_id(&text(row, 1)?)?,
        created_at: timestamp(integer(row, 2)?)?,
        expires_at: timestamp(integer(row, 3)?)?,
        revoked_at,
    })
}

fn chirp_from_row(row: &Row) -> Result<Chirp> {
    Ok(Chirp {
        id: parse_id(&text(row, 0)?)?,
        user_id: parse_id(&text(row, 1)?)?,
        body: text(row, 2)?,
        created_at: timestamp(integer(row, 3)?)?,
        updated_at: timestamp(integer(row, 4)?)?,
    })
}

#[async_trait]
impl DatabaseClient for TursoClient {
    // User operations
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let id = Uuid::new_v4();
        let now = Utc::now().timestamp();

        self.connection()
            .execute(
                "INSERT INTO users (id, email, password_hash, is_chirpy_red, created_at, updated_at)
                 VALUES (?, ?, ?, 0, ?, ?)",
                (id.to_string(), email, password_hash, now, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_chirpy_red: false,
            created_at: timestamp(now)?,
            updated_at: timestamp(now)?,
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_one(
            "SELECT id, email, password_hash, is_chirpy_red, created_at, updated_at
             FROM users WHERE email = ?",
            [email],
            user_from_row,
        )
        .await
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.query_one(
            "SELECT id, email, password_hash, is_chirpy_red, created_at, updated_at
             FROM users WHERE id = ?",
            [id.to_string()],
            user_from_row,
        )
        .await
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>> {
        let updated = self
            .connection()
            .execute(
                "UPDATE users SET email = ?, password_hash = ?, updated_at = ? WHERE id = ?",
                (email, password_hash, Utc::now().timestamp(), id.to_string()),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update user: {}", e)))?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_user_by_id(id).await
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<bool> {
        let updated = self
            .connection()
            .execute(
                "UPDATE users SET is_chirpy_red = 1, updated_at = ? WHERE id = ?",
                (Utc::now().timestamp(), id.to_string()),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to upgrade user: {}", e)))?;

        Ok(updated > 0)
    }

    async fn delete_all_users(&self) -> Result<()> {
        let conn = self.connection();
        for table in ["refresh_tokens", "chirps", "users"] {
            conn.execute(&format!("DELETE FROM {}", table), ())
                .await
                .map_err(|e| AppError::Database(format!("Failed to clear {}: {}", table, e)))?;
        }
        Ok(())
    }

    // Refresh token operations
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<()> {
        self.connection()
            .execute(
                "INSERT INTO refresh_tokens (token, user_id, created_at, expires_at, revoked_at)
                 VALUES (?, ?, ?, ?, NULL)",
                (
                    record.token.as_str(),
                    record.user_id.to_string(),
                    record.created_at.timestamp(),
                    record.expires_at.timestamp(),
                ),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to store refresh token: {}", e)))?;

        Ok(())
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        self.query_one(
            "SELECT token, user_id, created_at, expires_at, revoked_at
             FROM refresh_tokens WHERE token = ?",
            [token],
            refresh_token_from_row,
        )
        .await
    }

    async fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>) -> Result<bool> {
        let revoked = self
            .connection()
            .execute(
                "UPDATE refresh_tokens SET revoked_at = ? WHERE token = ? AND revoked_at IS NULL",
                (at.timestamp(), token),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to revoke refresh token: {}", e)))?;

        Ok(revoked > 0)
    }

    // Chirp operations
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp> {
        let id = Uuid::new_v4();
        let now = Utc::now().timestamp();

        self.connection()
            .execute(
                "INSERT INTO chirps (id, user_id, body, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
                (id.to_string(), user_id.to_string(), body, now, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create chirp: {}", e)))?;

        Ok(Chirp {
            id,
            user_id,
            body: body.to_string(),
            created_at: timestamp(now)?,
            updated_at: timestamp(now)?,
        })
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>> {
        self.query_one(
            "SELECT id, user_id, body, created_at, updated_at FROM chirps WHERE id = ?",
            [id.to_string()],
            chirp_from_row,
        )
        .await
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>> {
        let mut rows = self
            .connection()
            .query(
                "SELECT id, user_id, body, created_at, updated_at
                 FROM chirps ORDER BY created_at ASC, rowid ASC",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to list chirps: {}", e)))?;

        let mut chirps = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            chirps.push(chirp_from_row(&row)?);
        }

        Ok(chirps)
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<()> {
        self.connection()
            .execute("DELETE FROM chirps WHERE id = ?", [id.to_string()])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete chirp: {}", e)))?;

        Ok(())
    }
}
