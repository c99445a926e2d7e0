//! Record snapshot contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the full ordered record list exchanged with the aggregator.
//! - Restore it in the exact order it was saved.
//!
//! # Invariants
//! - `save_records` replaces the stored snapshot atomically.
//! - Stored order equals ingestion order; aggregation over a reloaded
//!   snapshot reproduces the original merge outcome.

use crate::db::DbError;
use crate::model::contact::{Community, ContactRecord, Platform, RecordValidationError};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for record persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for record snapshots.
pub trait RecordRepository {
    /// Replaces the stored snapshot with `records`, preserving their order.
    fn save_records(&self, records: &[ContactRecord]) -> RepoResult<()>;
    /// Loads the stored snapshot in saved order.
    fn load_records(&self) -> RepoResult<Vec<ContactRecord>>;
}

/// SQLite-backed record snapshot store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordStore<'_> {
    fn save_records(&self, records: &[ContactRecord]) -> RepoResult<()> {
        for record in records {
            record.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM records;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO records (seq, platform, names, phones, communities, personal)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            )?;
            for (seq, record) in records.iter().enumerate() {
                insert.execute(params![
                    seq as i64,
                    record.platform().name(),
                    encode_json(record.names())?,
                    encode_json(record.phones())?,
                    encode_json(record.communities())?,
                    record.personal() as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_records(&self) -> RepoResult<Vec<ContactRecord>> {
        let mut select = self.conn.prepare(
            "SELECT platform, names, phones, communities, personal
             FROM records
             ORDER BY seq ASC;",
        )?;
        let rows = select.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (platform, names, phones, communities, personal) = row?;
            records.push(decode_record(
                platform,
                &names,
                &phones,
                &communities,
                personal,
            )?);
        }
        Ok(records)
    }
}

fn encode_json<T: serde::Serialize>(value: &T) -> RepoResult<String> {
    serde_json::to_string(value)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode set column: {err}")))
}

fn decode_record(
    platform: String,
    names: &str,
    phones: &str,
    communities: &str,
    personal: i64,
) -> RepoResult<ContactRecord> {
    let names: BTreeSet<String> = decode_json("names", names)?;
    let phones: BTreeSet<String> = decode_json("phones", phones)?;
    let communities: BTreeSet<Community> = decode_json("communities", communities)?;

    let mut record = ContactRecord::new(Platform::new(platform));
    for name in names {
        record.add_name(name);
    }
    for phone in phones {
        record.add_phone(phone);
    }
    for community in communities {
        record.add_community(community);
    }
    record.set_personal(personal != 0);
    record
        .validate()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    Ok(record)
}

fn decode_json<T: serde::de::DeserializeOwned>(column: &str, raw: &str) -> RepoResult<T> {
    serde_json::from_str(raw)
        .map_err(|err| RepoError::InvalidData(format!("column `{column}`: {err}")))
}
