use async_trait::async_trait;
use serde::Serialize;
use sqlx::{
    Connection, FromRow,
    mysql::{MySqlConnectOptions, MySqlConnection},
};
use tracing::{debug, warn};

use crate::{config::DbInfo, error::SchemaLookupError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: String,
    pub nullable: bool,
    /// `PRI`, `UNI`, `MUL` or empty.
    #[serde(rename = "key")]
    pub key_role: String,
    #[serde(rename = "default")]
    pub default_value: Option<String>,
    pub extra: String,
}

/// Column and key metadata for one table, in physical column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDescriptor {
    pub table_name: String,
    pub columns: Vec<ColumnInfo>,
    pub primary_key: Option<String>,
    pub data_key: String,
}

impl SchemaDescriptor {
    pub fn new(
        table_name: impl Into<String>,
        columns: Vec<ColumnInfo>,
        primary_key: Option<String>,
    ) -> Self {
        let table_name = table_name.into();
        let data_key = data_key(&table_name);
        Self {
            table_name,
            columns,
            primary_key,
            data_key,
        }
    }

    /// A table that does not exist introspects to this.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub fn data_key(table_name: &str) -> String {
    table_name.to_lowercase().replace('_', "")
}

#[async_trait]
pub trait Catalog {
    async fn introspect(&self, table: &str) -> Result<SchemaDescriptor, SchemaLookupError>;
}

#[derive(Debug, FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    is_nullable: String,
    column_key: String,
    column_default: Option<String>,
    extra: String,
}

impl From<ColumnRow> for ColumnInfo {
    fn from(row: ColumnRow) -> Self {
        Self {
            name: row.column_name,
            sql_type: row.data_type,
            nullable: row.is_nullable == "YES",
            key_role: row.column_key,
            default_value: row.column_default,
            extra: row.extra,
        }
    }
}

// information_schema columns come back as binary strings on some servers.
const COLUMNS_QUERY: &str = "SELECT
    CAST(COLUMN_NAME AS CHAR) AS column_name,
    CAST(DATA_TYPE AS CHAR) AS data_type,
    CAST(IS_NULLABLE AS CHAR) AS is_nullable,
    CAST(COLUMN_KEY AS CHAR) AS column_key,
    CAST(COLUMN_DEFAULT AS CHAR) AS column_default,
    CAST(EXTRA AS CHAR) AS extra
FROM
    INFORMATION_SCHEMA.COLUMNS
WHERE
    TABLE_SCHEMA = ?
    AND TABLE_NAME = ?
ORDER BY
    ORDINAL_POSITION";

const PRIMARY_KEY_QUERY: &str = "SELECT
    CAST(COLUMN_NAME AS CHAR)
FROM
    INFORMATION_SCHEMA.KEY_COLUMN_USAGE
WHERE
    TABLE_SCHEMA = ?
    AND TABLE_NAME = ?
    AND CONSTRAINT_NAME = 'PRIMARY'
ORDER BY
    ORDINAL_POSITION";

/// Reads table metadata from a MySQL catalog, one connection per lookup.
pub struct MySqlCatalog {
    options: MySqlConnectOptions,
    database: String,
}

impl MySqlCatalog {
    pub fn new(db: &DbInfo) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.user)
            .password(&db.password)
            .database(&db.name);
        Self {
            options,
            database: db.name.clone(),
        }
    }

    async fn read_table(
        &self,
        conn: &mut MySqlConnection,
        table: &str,
    ) -> Result<SchemaDescriptor, sqlx::Error> {
        let columns: Vec<ColumnRow> = sqlx::query_as(COLUMNS_QUERY)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&mut *conn)
            .await?;
        let primary_key: Option<String> = sqlx::query_scalar(PRIMARY_KEY_QUERY)
            .bind(&self.database)
            .bind(table)
            .fetch_optional(&mut *conn)
            .await?;
        debug!(
            "{table}: {} columns, primary key {primary_key:?}",
            columns.len()
        );
        Ok(SchemaDescriptor::new(
            table,
            columns.into_iter().map(ColumnInfo::from).collect(),
            primary_key,
        ))
    }
}

#[async_trait]
impl Catalog for MySqlCatalog {
    async fn introspect(&self, table: &str) -> Result<SchemaDescriptor, SchemaLookupError> {
        let lookup_error = |source| SchemaLookupError {
            table: table.to_string(),
            source,
        };
        let mut conn = MySqlConnection::connect_with(&self.options)
            .await
            .map_err(lookup_error)?;
        let result = self.read_table(&mut conn, table).await;
        if let Err(err) = conn.close().await {
            warn!("Closing catalog connection failed: {err}");
        }
        result.map_err(lookup_error)
    }
}
