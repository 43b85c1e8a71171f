//! Live Confluence database on a MySQL server.

use crate::database::page_query;
use crate::error::SourceError;
use crate::source::{PageSource, drive};
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Params, Row, Value};
use pageidmap_domain::PageRecord;
use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_CHARSET: &str = "utf8mb4";

/// Server address in `host[:port]/database` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MysqlAddress {
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl MysqlAddress {
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
        }
    }

    /// Parses `host[:port]/database`. The port defaults to 3306.
    pub fn parse(s: &str) -> Result<Self, SourceError> {
        let invalid = |reason: &str| SourceError::InvalidAddress(format!("'{s}': {reason}"));

        let (host_port, database) = s
            .rsplit_once('/')
            .ok_or_else(|| invalid("expected host[:port]/database"))?;
        let (host, port) = match host_port.split_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>().map_err(|_| invalid("invalid port"))?,
            ),
            None => (host_port, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        if database.is_empty() {
            return Err(invalid("missing database name"));
        }
        Ok(Self::new(host, port, database))
    }
}

impl std::fmt::Display for MysqlAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

/// Address plus login.
pub struct MysqlOptions {
    pub address: MysqlAddress,
    pub user: String,
    pub password: SecretString,
    pub charset: String,
}

impl std::fmt::Debug for MysqlOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlOptions")
            .field("address", &self.address)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("charset", &self.charset)
            .finish()
    }
}

#[derive(Debug)]
pub struct MysqlSource {
    options: MysqlOptions,
    space_keys: Vec<String>,
}

impl MysqlSource {
    pub fn new(options: MysqlOptions, space_keys: Vec<String>) -> Self {
        Self {
            options,
            space_keys,
        }
    }

    fn connect(&self) -> Result<Conn, SourceError> {
        let MysqlOptions {
            address,
            user,
            password,
            charset,
        } = &self.options;
        // Interpolated into SET NAMES below.
        if charset.is_empty() || !charset.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(SourceError::Config(format!("Invalid charset: {charset}")));
        }

        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(address.host.as_str()))
            .tcp_port(address.port)
            .db_name(Some(address.database.as_str()))
            .user(Some(user.as_str()))
            .pass(Some(password.expose_secret()))
            .init(vec![format!("SET NAMES {charset}")]);
        Ok(Conn::new(opts)?)
    }
}

impl PageSource for MysqlSource {
    fn scan<T, F>(&mut self, consume: F) -> Result<T, SourceError>
    where
        F: FnOnce(&mut dyn Iterator<Item = PageRecord>) -> T,
    {
        if self.space_keys.is_empty() {
            return Err(SourceError::NoSpaceKeys);
        }
        tracing::info!(address = %self.options.address, "Connecting to database");
        let mut conn = self.connect()?;
        tracing::info!(spaces = %self.space_keys.join(", "), "Querying spaces");

        let params = Params::Positional(self.space_keys.iter().cloned().map(Value::from).collect());
        let rows = conn.exec_iter(page_query(self.space_keys.len()), params)?;
        drive(
            rows.map(|row| row.map_err(SourceError::from).and_then(row_to_record)),
            consume,
        )
    }
}

fn row_to_record(mut row: Row) -> Result<PageRecord, SourceError> {
    let page_id = match row.take::<Value, _>(0) {
        Some(Value::Int(id)) => id.to_string(),
        Some(Value::UInt(id)) => id.to_string(),
        Some(Value::Bytes(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        other => return Err(SourceError::InvalidRow(format!("CONTENTID is {other:?}"))),
    };
    let space_key = text_column(&mut row, 1, "SPACEKEY")?;
    let title = text_column(&mut row, 2, "TITLE")?;
    Ok(PageRecord::new(page_id, space_key, title))
}

fn text_column(row: &mut Row, index: usize, name: &str) -> Result<String, SourceError> {
    match row.take_opt::<String, _>(index) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(SourceError::InvalidRow(format!("{name}: {e}"))),
        None => Err(SourceError::InvalidRow(format!("{name} column missing"))),
    }
}
