//! Full-text search over the site's SQLite FTS4 index
//!
//! The index (`data` table: url, mtime, name, title, category, content) is
//! produced by the site generator; this side only ever opens it read-only.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, SqlxSqliteConnector,
    Statement,
};
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::errors::{Result, SiteGlueError};
use crate::utils::{rfc2822_from_unix, strip_tags};

const SEARCH_SQL: &str = "SELECT url, category, title, \
     snippet(data, '', '', '[...]', 5, 24) AS description, mtime \
     FROM data WHERE data MATCH ? ORDER BY category, mtime";

/// One row of the FTS query
#[derive(Debug, Clone, FromQueryResult)]
pub struct SearchRow {
    pub url: String,
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub mtime: Option<i64>,
}

/// Search hit in the shape the JSON and RSS outputs use
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

impl From<SearchRow> for SearchResult {
    fn from(row: SearchRow) -> Self {
        Self {
            id: row.url.clone(),
            title: row.title.unwrap_or_default(),
            url: row.url,
            description: row.description.unwrap_or_default(),
            pub_date: rfc2822_from_unix(row.mtime.unwrap_or_default()),
        }
    }
}

/// Clean a user supplied search term for display
pub fn clean_term(raw: &str) -> String {
    strip_tags(raw).trim().to_string()
}

/// FTS match expression for a cleaned term
///
/// `-` becomes `+` so the FTS parser does not read it as NOT.
pub fn match_expression(term: &str) -> String {
    term.replace('-', "+")
}

const DEFAULT_POOL_SIZE: u32 = 4;

/// 连接 SQLite 数据库
///
/// `read_only` connections never create the file.
pub async fn connect_sqlite(path: &Path, read_only: bool) -> Result<DatabaseConnection> {
    connect_sqlite_pool(path, read_only, DEFAULT_POOL_SIZE).await
}

pub async fn connect_sqlite_pool(
    path: &Path,
    read_only: bool,
    pool_size: u32,
) -> Result<DatabaseConnection> {
    let opt = SqliteConnectOptions::new()
        .filename(path)
        .read_only(read_only)
        .create_if_missing(!read_only)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(pool_size.max(1))
        .connect_with(opt)
        .await
        .map_err(|e| {
            SiteGlueError::database_connection(format!(
                "cannot open search database {}: {}",
                path.display(),
                e
            ))
        })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Lazily connected, read-only search index
pub struct SearchService {
    path: PathBuf,
    pool_size: u32,
    db: OnceCell<DatabaseConnection>,
}

impl SearchService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool_size: DEFAULT_POOL_SIZE,
            db: OnceCell::new(),
        }
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Wrap an already open connection
    pub fn with_connection(path: impl Into<PathBuf>, db: DatabaseConnection) -> Self {
        Self {
            path: path.into(),
            pool_size: DEFAULT_POOL_SIZE,
            db: OnceCell::new_with(Some(db)),
        }
    }

    async fn db(&self) -> Result<&DatabaseConnection> {
        self.db
            .get_or_try_init(|| async {
                let db = connect_sqlite_pool(&self.path, true, self.pool_size).await?;
                info!("Search database opened: {}", self.path.display());
                Ok::<_, SiteGlueError>(db)
            })
            .await
    }

    /// Run a cleaned `term` against the index
    ///
    /// An empty term short-circuits. A query the FTS parser rejects yields
    /// no results rather than an error.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchResult>> {
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let db = self.db().await?;
        let expression = match_expression(term);
        let stmt =
            Statement::from_sql_and_values(DbBackend::Sqlite, SEARCH_SQL, [expression.into()]);

        match SearchRow::find_by_statement(stmt).all(db).await {
            Ok(rows) => {
                debug!("results for '{}': {}", term, rows.len());
                Ok(rows.into_iter().map(SearchResult::from).collect())
            }
            Err(e) => {
                warn!("Search query '{}' failed: {}", term, e);
                Ok(Vec::new())
            }
        }
    }

    /// Connectivity check for the health endpoint
    pub async fn ping(&self) -> Result<()> {
        let db = self.db().await?;
        db.execute_unprepared("SELECT 1").await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
