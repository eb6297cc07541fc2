//! `SQLite` mail storage repository.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use super::RecordStore;
use crate::{
    Attachment, AttachmentId, Directory, Error, Identity, Mail, MailId, Result, UserId,
};

/// Repository for users, mails, receivers and attachments.
pub struct MailRepository {
    pool: SqlitePool,
}

impl MailRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY NOT NULL,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL UNIQUE COLLATE NOCASE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS mails (
                id INTEGER PRIMARY KEY NOT NULL,
                owner_id INTEGER NOT NULL,
                sender TEXT NOT NULL,
                subject TEXT NOT NULL DEFAULT '',
                body TEXT,
                timestamp TEXT NOT NULL,
                priority INTEGER NOT NULL DEFAULT 1,
                folder TEXT NOT NULL DEFAULT 'inbox',
                is_read INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS mail_receivers (
                mail_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                email TEXT NOT NULL,
                PRIMARY KEY (mail_id, position)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS attachments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mail_id INTEGER NOT NULL,
                file_name TEXT NOT NULL,
                content_type TEXT NOT NULL DEFAULT '',
                indexed_content TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Indexes for user scoping
        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_mails_owner ON mails(owner_id)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_receivers_email
            ON mail_receivers(email COLLATE NOCASE)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert_user(&self, identity: &Identity) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, first_name, last_name, email)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email
            ",
        )
        .bind(identity.user_id.0)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.email.trim())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace a mail with its receivers and attachments.
    ///
    /// The mail keeps its own id. Receivers and attachments of an existing
    /// mail are replaced; attachments get fresh ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist or a query fails.
    pub async fn insert_mail(&self, mail: &Mail) -> Result<MailId> {
        let owner_exists = sqlx::query("SELECT 1 FROM users WHERE id = ?")
            .bind(mail.owner.0)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !owner_exists {
            return Err(Error::UserNotFound(mail.owner.to_string()));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO mails
                (id, owner_id, sender, subject, body, timestamp, priority, folder, is_read)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                owner_id = excluded.owner_id,
                sender = excluded.sender,
                subject = excluded.subject,
                body = excluded.body,
                timestamp = excluded.timestamp,
                priority = excluded.priority,
                folder = excluded.folder,
                is_read = excluded.is_read
            ",
        )
        .bind(mail.id.0)
        .bind(mail.owner.0)
        .bind(&mail.sender)
        .bind(&mail.subject)
        .bind(&mail.body)
        .bind(format_timestamp(mail.timestamp))
        .bind(mail.priority)
        .bind(&mail.folder)
        .bind(mail.is_read)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM mail_receivers WHERE mail_id = ?")
            .bind(mail.id.0)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM attachments WHERE mail_id = ?")
            .bind(mail.id.0)
            .execute(&mut *tx)
            .await?;

        for (position, email) in mail.receivers.iter().enumerate() {
            #[allow(clippy::cast_possible_wrap)]
            let position = position as i64;
            sqlx::query("INSERT INTO mail_receivers (mail_id, position, email) VALUES (?, ?, ?)")
                .bind(mail.id.0)
                .bind(position)
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }

        for attachment in &mail.attachments {
            sqlx::query(
                r"
                INSERT INTO attachments (mail_id, file_name, content_type, indexed_content)
                VALUES (?, ?, ?, ?)
                ",
            )
            .bind(mail.id.0)
            .bind(&attachment.file_name)
            .bind(&attachment.content_type)
            .bind(&attachment.indexed_content)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            "Stored mail {} with {} receivers and {} attachments",
            mail.id,
            mail.receivers.len(),
            mail.attachments.len()
        );
        Ok(mail.id)
    }

    /// Record the text extracted from an attachment. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_indexed_content(&self, id: AttachmentId, text: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE attachments SET indexed_content = ? WHERE id = ?")
            .bind(text)
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn user_email(&self, user: UserId) -> Result<String> {
        let row = sqlx::query("SELECT email FROM users WHERE id = ?")
            .bind(user.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| row.get::<String, _>("email"))
            .ok_or_else(|| Error::UserNotFound(user.to_string()))
    }

    async fn receivers(&self, mail_id: MailId) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT email FROM mail_receivers WHERE mail_id = ? ORDER BY position ASC",
        )
        .bind(mail_id.0)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(|row| row.get("email")).collect())
    }

    async fn attachments(&self, mail_id: MailId) -> Result<Vec<Attachment>> {
        let rows = sqlx::query(
            r"
            SELECT id, file_name, content_type, indexed_content
            FROM attachments
            WHERE mail_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(mail_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Attachment {
                id: Some(AttachmentId(row.get::<i64, _>("id"))),
                file_name: row.get("file_name"),
                content_type: row.get("content_type"),
                indexed_content: row.get::<Option<String>, _>("indexed_content"),
            })
            .collect())
    }
}

impl RecordStore for MailRepository {
    async fn find_by_user(&self, user: UserId) -> Result<Vec<Mail>> {
        let email = self.user_email(user).await?;

        let rows = sqlx::query(
            r"
            SELECT id, owner_id, sender, subject, body, timestamp, priority, folder, is_read
            FROM mails m
            WHERE m.owner_id = ?
               OR m.sender = ? COLLATE NOCASE
               OR EXISTS (
                    SELECT 1 FROM mail_receivers r
                    WHERE r.mail_id = m.id AND r.email = ? COLLATE NOCASE
               )
            ORDER BY m.timestamp DESC, m.id DESC
            ",
        )
        .bind(user.0)
        .bind(&email)
        .bind(&email)
        .fetch_all(&self.pool)
        .await?;

        let mut mails = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut mail = mail_from_row(row)?;
            mail.receivers = self.receivers(mail.id).await?;
            mail.attachments = self.attachments(mail.id).await?;
            mails.push(mail);
        }

        tracing::debug!("Loaded {} candidate mails for user {}", mails.len(), user);
        Ok(mails)
    }

    async fn directory(&self) -> Result<Directory> {
        let rows = sqlx::query("SELECT id, first_name, last_name, email FROM users")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Identity {
                user_id: UserId(row.get::<i64, _>("id")),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                email: row.get("email"),
            })
            .collect())
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn mail_from_row(row: &SqliteRow) -> Result<Mail> {
    let timestamp_str: String = row.get("timestamp");
    let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
        .map_err(|e| Error::Database(sqlx::Error::Decode(Box::new(e))))?
        .with_timezone(&Utc);

    Ok(Mail {
        id: MailId(row.get::<i64, _>("id")),
        owner: UserId(row.get::<i64, _>("owner_id")),
        sender: row.get("sender"),
        receivers: Vec::new(),
        subject: row.get("subject"),
        body: row.get::<Option<String>, _>("body"),
        timestamp,
        priority: row.get::<i32, _>("priority"),
        folder: row.get("folder"),
        is_read: row.get::<bool, _>("is_read"),
        attachments: Vec::new(),
    })
}
