//! PostgreSQL query source
//!
//! Wraps a caller-supplied `SELECT` as a derived table and composes ordering
//! and the offset/limit window around it with a `QueryBuilder`. Sort fields
//! are checked to be plain identifiers before being spliced into SQL; whether
//! the column exists is up to PostgreSQL.

use std::marker::PhantomData;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use tracing::debug;

use crate::query::sorting::{SortExpression, SortOrder};
use crate::query::source::{QuerySource, Window};

static SORT_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("static identifier pattern")
});

const SOURCE_ALIAS: &str = "folio_source";

#[derive(Error, Debug)]
pub enum PostgresSourceError {
    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Sort field `{0}` is not a valid column identifier")]
    InvalidSortField(String),
}

pub struct PostgresSource<T> {
    pool: PgPool,
    base_sql: String,
    sorting: Option<SortExpression>,
    tiebreak: Option<String>,
    window: Window,
    _row: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for PostgresSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSource")
            .field("base_sql", &self.base_sql)
            .field("sorting", &self.sorting)
            .field("tiebreak", &self.tiebreak)
            .field("window", &self.window)
            .finish()
    }
}

impl<T> Clone for PostgresSource<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            base_sql: self.base_sql.clone(),
            sorting: self.sorting.clone(),
            tiebreak: self.tiebreak.clone(),
            window: self.window,
            _row: PhantomData,
        }
    }
}

impl<T> PostgresSource<T> {
    /// `base_sql` must be a complete `SELECT` without trailing `ORDER BY`,
    /// `OFFSET` or `LIMIT`; it is used as a derived table.
    pub fn new(pool: PgPool, base_sql: impl Into<String>) -> Self {
        Self {
            pool,
            base_sql: base_sql.into(),
            sorting: None,
            tiebreak: None,
            window: Window::default(),
            _row: PhantomData,
        }
    }

    /// Column appended (ascending) after the requested ordering so rows
    /// tying on every sort term still page deterministically.
    pub fn with_tiebreak(mut self, column: impl Into<String>) -> Self {
        self.tiebreak = Some(column.into());
        self
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn push_source(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push("SELECT * FROM (");
        builder.push(self.base_sql.as_str());
        builder.push(") AS ");
        builder.push(SOURCE_ALIAS);
    }

    fn push_order_by(
        &self,
        builder: &mut QueryBuilder<'_, Postgres>,
    ) -> Result<(), PostgresSourceError> {
        let Some(sorting) = self.sorting.as_ref().filter(|s| !s.is_empty())
        else {
            return Ok(());
        };

        builder.push(" ORDER BY ");
        let mut separated = builder.separated(", ");
        for term in sorting.terms() {
            let column = checked_identifier(&term.field)?;
            separated.push(column);
            separated.push_unseparated(" ");
            separated.push_unseparated(term.order.as_sql());
        }

        if let Some(tiebreak) = self.tiebreak.as_deref()
            && !sorting
                .terms()
                .iter()
                .any(|term| term.field.eq_ignore_ascii_case(tiebreak))
        {
            let column = checked_identifier(tiebreak)?;
            separated.push(column);
            separated.push_unseparated(" ");
            separated.push_unseparated(SortOrder::Ascending.as_sql());
        }

        Ok(())
    }

    fn push_window(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if self.window.offset > 0 {
            builder.push(" OFFSET ");
            builder.push_bind(to_sql_count(self.window.offset));
        }
        if let Some(limit) = self.window.limit {
            builder.push(" LIMIT ");
            builder.push_bind(to_sql_count(limit));
        }
    }
}

fn checked_identifier(field: &str) -> Result<&str, PostgresSourceError> {
    if SORT_IDENTIFIER.is_match(field) {
        Ok(field)
    } else {
        Err(PostgresSourceError::InvalidSortField(field.to_string()))
    }
}

fn to_sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl<T> QuerySource for PostgresSource<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static,
{
    type Item = T;
    type Error = PostgresSourceError;

    async fn count(&self) -> Result<u64, Self::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM (");
        self.push_source(&mut builder);
        self.push_window(&mut builder);
        builder.push(") AS folio_count");

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;

        debug!("Counted {} rows for {}", count, self.base_sql);
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn order_by(mut self, sorting: &SortExpression) -> Self {
        self.sorting = Some(sorting.clone());
        self
    }

    fn skip(mut self, count: usize) -> Self {
        self.window = self.window.skip(count);
        self
    }

    fn take(mut self, count: usize) -> Self {
        self.window = self.window.take(count);
        self
    }

    async fn fetch(self) -> Result<Vec<T>, Self::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("");
        self.push_source(&mut builder);
        self.push_order_by(&mut builder)?;
        self.push_window(&mut builder);

        debug!("Fetching page: {}", builder.sql());

        let rows = builder
            .build_query_as::<T>()
            .fetch_all(self.pool())
            .await?;

        Ok(rows)
    }
}
