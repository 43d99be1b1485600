//! MySQL storage gateway.
//!
//! Opens a fresh connection for every call and closes it before returning,
//! whatever the outcome. No pooling: each request owns its connection end
//! to end.

use std::fmt;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, ConnectOptions, Connection, MySql, Row as _, TypeInfo, ValueRef};
use tracing::{debug, warn};

use crate::{DbError, Param, Row, Statement, Storage};

/// Timestamp columns are rendered in the same shape `chrono`'s serde
/// implementation reads back.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Connection settings for the MySQL gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl GatewayConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// [`Storage`] backed by a MySQL server, one connection per call.
pub struct MySqlGateway {
    options: MySqlConnectOptions,
}

impl MySqlGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            options: config.connect_options(),
        }
    }

    /// Open a new connection; the caller closes it when done.
    pub async fn acquire(&self) -> Result<MySqlConnection, DbError> {
        let conn = self.options.connect().await?;
        Ok(conn)
    }
}

#[async_trait]
impl Storage for MySqlGateway {
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, DbError> {
        debug!(sql = statement.sql.trim(), params = statement.params.len(), "query");

        let mut conn = self.acquire().await?;
        let result = bind_params(sqlx::query(statement.sql), &statement.params)
            .fetch_all(&mut conn)
            .await;
        release(conn).await;

        result?.iter().map(decode_row).collect()
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, DbError> {
        debug!(sql = statement.sql.trim(), params = statement.params.len(), "execute");

        let mut conn = self.acquire().await?;
        let result = execute_and_commit(&mut conn, statement).await;
        release(conn).await;

        result
    }
}

/// Close the connection; a failed close is logged, never surfaced.
async fn release(conn: MySqlConnection) {
    if let Err(err) = conn.close().await {
        warn!(error = %err, "connection did not close cleanly");
    }
}

/// A failure before `commit` drops the transaction, which rolls it back.
async fn execute_and_commit(
    conn: &mut MySqlConnection,
    statement: &Statement,
) -> Result<u64, DbError> {
    let mut tx = conn.begin().await?;
    let done = bind_params(sqlx::query(statement.sql), &statement.params)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(done.rows_affected())
}

fn bind_params<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Param],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            Param::Text(s) => query.bind(s.as_str()),
            Param::Int(n) => query.bind(*n),
            Param::Null => query.bind(None::<String>),
        };
    }
    query
}

fn decode_row(row: &MySqlRow) -> Result<Row, DbError> {
    let mut out = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name()).map_err(
            |err| DbError::Decode {
                column: column.name().to_owned(),
                message: err.to_string(),
            },
        )?;
        out.insert(column.name().to_owned(), value);
    }
    Ok(out)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get::<i64, _>(index)?)
        }
        name if name.ends_with("UNSIGNED") => Value::from(row.try_get::<u64, _>(index)?),
        "FLOAT" => Value::from(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => Value::from(row.try_get::<f64, _>(index)?),
        "DATETIME" | "TIMESTAMP" => Value::String(
            row.try_get::<NaiveDateTime, _>(index)?
                .format(DATETIME_FORMAT)
                .to_string(),
        ),
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
        // Text, DECIMAL and everything else arrive as character data.
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}
