//! SQLite storage for mailboxes and forwards
//!
//! The table layout is read directly by other tooling and must stay as is:
//!
//! - `mailboxes(name, domain, password)`, unique on `(name, domain)`
//! - `forwards(src_name, src_domain, dst_name, dst_domain)`, unique on all four
//!
//! Writes are `INSERT OR REPLACE` against those unique indexes. Every mutating
//! call runs in its own transaction.

use crate::error::{AdminError, Result};
use crate::utils::EmailAddress;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

use super::types::{ForwardRule, Mailbox};

/// Persistent mailbox and forward directory
#[derive(Clone)]
pub struct DirectoryStore {
    db: SqlitePool,
}

impl DirectoryStore {
    /// Open (creating if missing) the database at `database_url` and make sure
    /// the schema exists
    pub async fn open(database_url: &str) -> Result<Self> {
        debug!("Opening directory database {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { db };
        store.init_db().await?;
        Ok(store)
    }

    /// Create tables and unique indexes if they do not exist yet
    pub async fn init_db(&self) -> Result<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mailboxes (
                name TEXT,
                domain TEXT,
                password TEXT
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_mailboxes ON mailboxes (
                name,
                domain
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS forwards (
                src_name TEXT,
                src_domain TEXT,
                dst_name TEXT,
                dst_domain TEXT
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_forwards ON forwards (
                src_name,
                src_domain,
                dst_name,
                dst_domain
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Insert or replace a mailbox, returning the number of rows written
    pub async fn upsert_mailbox(&self, mailbox: &Mailbox) -> Result<u64> {
        info!("Storing mailbox {}@{}", mailbox.local_part, mailbox.domain);

        let mut tx = self.db.begin().await?;
        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO mailboxes (name, domain, password)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&mailbox.local_part)
        .bind(&mailbox.domain)
        .bind(&mailbox.password_digest)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    /// Delete a mailbox; fails with `NotFound` if it does not exist
    pub async fn delete_mailbox(&self, address: &EmailAddress) -> Result<()> {
        info!("Deleting mailbox {}", address);

        let mut tx = self.db.begin().await?;
        let result = sqlx::query("DELETE FROM mailboxes WHERE name = ? AND domain = ?")
            .bind(&address.local_part)
            .bind(&address.domain)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AdminError::NotFound(format!("mailbox {}", address)));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Insert or replace a forward, returning the number of rows written
    pub async fn upsert_forward(&self, rule: &ForwardRule) -> Result<u64> {
        info!("Storing forward {}", rule);

        let mut tx = self.db.begin().await?;
        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO forwards (src_name, src_domain, dst_name, dst_domain)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&rule.src_local_part)
        .bind(&rule.src_domain)
        .bind(&rule.dst_local_part)
        .bind(&rule.dst_domain)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    /// Delete a forward by its full key; fails with `NotFound` if absent
    pub async fn delete_forward(&self, rule: &ForwardRule) -> Result<()> {
        info!("Deleting forward {}", rule);

        let mut tx = self.db.begin().await?;
        let result = sqlx::query(
            r#"
            DELETE FROM forwards
            WHERE src_name = ? AND src_domain = ? AND dst_name = ? AND dst_domain = ?
            "#,
        )
        .bind(&rule.src_local_part)
        .bind(&rule.src_domain)
        .bind(&rule.dst_local_part)
        .bind(&rule.dst_domain)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AdminError::NotFound(format!("forward {}", rule)));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Look up a single mailbox
    pub async fn get_mailbox(&self, address: &EmailAddress) -> Result<Option<Mailbox>> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            r#"
            SELECT name, domain, password
            FROM mailboxes
            WHERE name = ? AND domain = ?
            "#,
        )
        .bind(&address.local_part)
        .bind(&address.domain)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(local_part, domain, password_digest)| Mailbox {
            local_part,
            domain,
            password_digest,
        }))
    }

    /// All mailboxes, ordered by domain then local part
    pub async fn list_mailboxes(&self) -> Result<Vec<Mailbox>> {
        let rows = sqlx::query_as::<_, (String, String, String)>(
            r#"
            SELECT name, domain, password
            FROM mailboxes
            ORDER BY domain, name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(local_part, domain, password_digest)| Mailbox {
                local_part,
                domain,
                password_digest,
            })
            .collect())
    }

    /// All forwards, ordered by destination then source
    pub async fn list_forwards(&self) -> Result<Vec<ForwardRule>> {
        let rows = sqlx::query_as::<_, (String, String, String, String)>(
            r#"
            SELECT src_name, src_domain, dst_name, dst_domain
            FROM forwards
            ORDER BY dst_domain, dst_name, src_domain, src_name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(src_local_part, src_domain, dst_local_part, dst_domain)| ForwardRule {
                    src_local_part,
                    src_domain,
                    dst_local_part,
                    dst_domain,
                },
            )
            .collect())
    }

    /// Distinct domains that own at least one mailbox
    pub async fn mailbox_domains(&self) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT domain FROM mailboxes GROUP BY domain ORDER BY domain",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|(domain,)| domain).collect())
    }

    /// Distinct source domains of forwards
    pub async fn forward_source_domains(&self) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT src_domain FROM forwards GROUP BY src_domain ORDER BY src_domain",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|(domain,)| domain).collect())
    }

    /// Distinct source addresses of forwards, grouped by domain then local part
    pub async fn forward_sources(&self) -> Result<Vec<EmailAddress>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT src_name, src_domain
            FROM forwards
            GROUP BY src_domain, src_name
            ORDER BY src_domain, src_name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(local_part, domain)| EmailAddress::from_parts(local_part, domain))
            .collect())
    }

    /// Destinations forwarded from `source`, in index order
    pub async fn forward_destinations(&self, source: &EmailAddress) -> Result<Vec<EmailAddress>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT dst_name, dst_domain
            FROM forwards
            WHERE src_name = ? AND src_domain = ?
            ORDER BY dst_name, dst_domain
            "#,
        )
        .bind(&source.local_part)
        .bind(&source.domain)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(local_part, domain)| EmailAddress::from_parts(local_part, domain))
            .collect())
    }

    /// One mailbox per domain (the lowest local part), ordered by domain
    pub async fn mailbox_per_domain(&self) -> Result<Vec<EmailAddress>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT MIN(name), domain
            FROM mailboxes
            GROUP BY domain
            ORDER BY domain
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(local_part, domain)| EmailAddress::from_parts(local_part, domain))
            .collect())
    }

    /// Health check - verify database connectivity
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        self.db.close().await;
    }
}
