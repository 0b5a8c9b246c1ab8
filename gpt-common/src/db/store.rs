//! Backend store: parameterized SELECT/INSERT/UPDATE/DELETE against named tables
//!
//! The same statements run on PostgreSQL (remote) and SQLite (local
//! fallback). Tables are qualified as `<schema>.<table>`; SQLite's own schema
//! is called `main`, so the default schema works on both. Integer columns are
//! selected with `CAST(... AS BIGINT)` so both drivers hand back `i64`.

use crate::config::{DatabaseConfig, StoreLocation};
use crate::db::schema::{ColumnType, Row, TableDef, Value};
use crate::{Error, Result};
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, SqlitePool};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum Backend {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

/// Connection to the backing relational store
#[derive(Debug, Clone)]
pub struct Store {
    backend: Backend,
    schema: String,
}

impl Store {
    /// Wrap an already-open SQLite pool
    pub fn sqlite(pool: SqlitePool, schema: &str) -> Result<Self> {
        Self::new(Backend::Sqlite(pool), schema)
    }

    /// Wrap an already-open PostgreSQL pool
    pub fn postgres(pool: PgPool, schema: &str) -> Result<Self> {
        Self::new(Backend::Postgres(pool), schema)
    }

    fn new(backend: Backend, schema: &str) -> Result<Self> {
        if !is_valid_identifier(schema) {
            return Err(Error::Config(format!("Invalid schema name: {}", schema)));
        }
        Ok(Self {
            backend,
            schema: schema.to_string(),
        })
    }

    /// Open the store described by `config`
    ///
    /// The local fallback is created (file and tables) when missing.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        match &config.location {
            StoreLocation::Remote(remote) => {
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect_with(remote.connect_options())
                    .await?;
                info!("Connected to PostgreSQL at {}:{}", remote.host, remote.port);
                Self::postgres(pool, &config.schema)
            }
            StoreLocation::Local(path) => {
                let pool = crate::db::init::init_database(path).await?;
                Self::sqlite(pool, &config.schema)
            }
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn qualified(&self, table: &TableDef) -> String {
        format!("{}.{}", self.schema, table.name)
    }

    fn placeholder(&self, index: usize) -> String {
        match self.backend {
            Backend::Sqlite(_) => "?".to_string(),
            Backend::Postgres(_) => format!("${}", index),
        }
    }

    /// SELECT every row of `table`, ordered by id
    pub async fn read_table(&self, table: &TableDef) -> Result<Vec<Row>> {
        let select_list: Vec<String> = table
            .columns
            .iter()
            .map(|c| match c.ty {
                ColumnType::Integer => format!("CAST({0} AS BIGINT) AS {0}", c.name),
                _ => c.name.to_string(),
            })
            .collect();
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            select_list.join(", "),
            self.qualified(table)
        );

        let rows = match &self.backend {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(&sql).fetch_all(pool).await?;
                rows.iter()
                    .map(|r| decode_row(table, r))
                    .collect::<Result<Vec<_>>>()?
            }
            Backend::Postgres(pool) => {
                let rows = sqlx::query(&sql).fetch_all(pool).await?;
                rows.iter()
                    .map(|r| decode_row(table, r))
                    .collect::<Result<Vec<_>>>()?
            }
        };

        debug!("Read {} rows from {}", rows.len(), table.name);
        Ok(rows)
    }

    /// INSERT one row; any `id` in `row` is ignored
    pub async fn insert_row(&self, table: &TableDef, row: &Row) -> Result<u64> {
        let mut params = Vec::new();
        let mut columns = Vec::new();
        for column in table.data_columns() {
            if let Some(value) = row.get(column.name) {
                params.push((column.ty, value.clone()));
                columns.push(column.name);
            }
        }
        check_params(table, &params)?;

        let placeholders: Vec<String> = (1..=params.len()).map(|i| self.placeholder(i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.qualified(table),
            columns.join(", "),
            placeholders.join(", ")
        );
        self.execute(&sql, &params).await
    }

    /// INSERT one row keeping its id (used when copying tables)
    pub async fn insert_row_with_id(&self, table: &TableDef, row: &Row) -> Result<u64> {
        let mut params = Vec::new();
        let mut columns = Vec::new();
        for column in table.columns {
            params.push((column.ty, row.get(column.name).cloned().unwrap_or(Value::Null)));
            columns.push(column.name);
        }
        check_params(table, &params)?;

        let placeholders: Vec<String> = (1..=params.len()).map(|i| self.placeholder(i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.qualified(table),
            columns.join(", "),
            placeholders.join(", ")
        );
        self.execute(&sql, &params).await
    }

    /// UPDATE the row matching `id` with the columns present in `row`
    ///
    /// A nonexistent id affects zero rows and is not an error.
    pub async fn update_row(&self, table: &TableDef, id: i64, row: &Row) -> Result<u64> {
        let mut params = Vec::new();
        let mut assignments = Vec::new();
        for column in table.data_columns() {
            if let Some(value) = row.get(column.name) {
                params.push((column.ty, value.clone()));
                assignments.push(format!("{} = {}", column.name, self.placeholder(params.len())));
            }
        }
        if params.is_empty() {
            return Ok(0);
        }
        check_params(table, &params)?;
        params.push((ColumnType::Integer, Value::Int(id)));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = {}",
            self.qualified(table),
            assignments.join(", "),
            self.placeholder(params.len())
        );
        self.execute(&sql, &params).await
    }

    /// DELETE the row matching `id` (no cascade)
    pub async fn delete_row(&self, table: &TableDef, id: i64) -> Result<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE id = {}",
            self.qualified(table),
            self.placeholder(1)
        );
        self.execute(&sql, &[(ColumnType::Integer, Value::Int(id))]).await
    }

    /// DELETE every row of `table`
    pub async fn clear_table(&self, table: &TableDef) -> Result<u64> {
        let sql = format!("DELETE FROM {}", self.qualified(table));
        self.execute(&sql, &[]).await
    }

    async fn execute(&self, sql: &str, params: &[(ColumnType, Value)]) -> Result<u64> {
        let affected = match &self.backend {
            Backend::Sqlite(pool) => {
                let mut query = sqlx::query::<sqlx::Sqlite>(sql);
                for (ty, value) in params {
                    query = bind_value(query, *ty, value);
                }
                query.execute(pool).await?.rows_affected()
            }
            Backend::Postgres(pool) => {
                let mut query = sqlx::query::<sqlx::Postgres>(sql);
                for (ty, value) in params {
                    query = bind_value(query, *ty, value);
                }
                query.execute(pool).await?.rows_affected()
            }
        };
        debug!("{} ({} rows affected)", sql, affected);
        Ok(affected)
    }
}

/// Reject values that do not fit their column before touching the store
fn check_params(table: &TableDef, params: &[(ColumnType, Value)]) -> Result<()> {
    for (ty, value) in params {
        if !value.fits(*ty) {
            return Err(Error::InvalidInput(format!(
                "Value {:?} does not fit a {:?} column of {}",
                value, ty, table.name
            )));
        }
    }
    Ok(())
}

/// Only allow alphanumeric and underscore (prevents SQL injection)
fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() < 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Bind `value` with the SQL type of its column so NULLs stay typed
fn bind_value<'q, DB>(
    query: sqlx::query::Query<'q, DB, <DB as sqlx::Database>::Arguments<'q>>,
    ty: ColumnType,
    value: &Value,
) -> sqlx::query::Query<'q, DB, <DB as sqlx::Database>::Arguments<'q>>
where
    DB: sqlx::Database,
    Option<i64>: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
    Option<String>: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
    Option<bool>: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
    Option<NaiveDate>: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
{
    match (ty, value) {
        (ColumnType::Integer, Value::Int(v)) => query.bind(Some(*v)),
        (ColumnType::Integer, _) => query.bind(None::<i64>),
        (ColumnType::Text, Value::Text(v)) => query.bind(Some(v.clone())),
        (ColumnType::Text, _) => query.bind(None::<String>),
        (ColumnType::Boolean, Value::Bool(v)) => query.bind(Some(*v)),
        (ColumnType::Boolean, _) => query.bind(None::<bool>),
        (ColumnType::Date, Value::Date(v)) => query.bind(Some(*v)),
        (ColumnType::Date, _) => query.bind(None::<NaiveDate>),
    }
}

/// Decode one database row into a column map using the table's declared types
fn decode_row<'r, R>(table: &TableDef, row: &'r R) -> Result<Row>
where
    R: sqlx::Row,
    &'static str: sqlx::ColumnIndex<R>,
    i64: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    String: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    bool: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    NaiveDate: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    let mut out = Row::new();
    for column in table.columns {
        let value = match column.ty {
            ColumnType::Integer => row.try_get::<Option<i64>, _>(column.name)?.into(),
            ColumnType::Text => row.try_get::<Option<String>, _>(column.name)?.into(),
            ColumnType::Boolean => row
                .try_get::<Option<bool>, _>(column.name)?
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            ColumnType::Date => row.try_get::<Option<NaiveDate>, _>(column.name)?.into(),
        };
        out.insert(column.name.to_string(), value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("main"));
        assert!(is_valid_identifier("guitar_practice"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("main; DROP TABLE artist"));
        assert!(!is_valid_identifier("a.b"));
    }

    #[test]
    fn test_check_params_rejects_mismatched_types() {
        let ok = [(ColumnType::Integer, Value::Int(1)), (ColumnType::Text, Value::Null)];
        assert!(check_params(&crate::db::schema::ARTIST, &ok).is_ok());

        let bad = [(ColumnType::Date, Value::Text("2024-01-01".into()))];
        assert!(matches!(
            check_params(&crate::db::schema::ARTIST, &bad),
            Err(Error::InvalidInput(_))
        ));
    }
}
