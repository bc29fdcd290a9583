use police_map_shared::models::{Station, StationId};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const STATIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("stations");
const SLUGS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("slugs");

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),
    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("invalid station record: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Whether an upsert created the station or replaced an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// `base`, then `base-<id>`, then `base-<id>-2`, `base-<id>-3`, ...
fn slug_candidate(base: &str, id: u64, attempt: u32) -> String {
    match attempt {
        0 => base.to_string(),
        1 => format!("{}-{}", base, id),
        n => format!("{}-{}-{}", base, id, n),
    }
}

pub struct Storage {
    db: Database,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Ensure tables exist
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(STATIONS_TABLE)?;
            write_txn.open_table(SLUGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Arc::new(Storage { db }))
    }

    /// Insert or replace a station by id. The stored slug is derived from
    /// the name; when another station already owns it, the id is appended,
    /// followed by a counter while that is taken too.
    /// Returns the outcome and the slug that was stored.
    pub fn upsert_station(&self, mut station: Station) -> Result<(Upsert, String), StorageError> {
        let id = station.id.0;
        let write_txn = self.db.begin_write()?;
        let outcome = {
            let mut stations = write_txn.open_table(STATIONS_TABLE)?;
            let mut slugs = write_txn.open_table(SLUGS_TABLE)?;

            let previous: Option<Station> = match stations.get(id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };

            let base = Station::slugify(&station.name);
            let mut attempt = 0;
            station.slug = loop {
                let candidate = slug_candidate(&base, id, attempt);
                match slugs.get(candidate.as_str())?.map(|v| v.value()) {
                    Some(other) if other != id => attempt += 1,
                    _ => break candidate,
                }
            };

            if let Some(previous) = &previous {
                let owner = slugs.get(previous.slug.as_str())?.map(|v| v.value());
                if previous.slug != station.slug && owner == Some(id) {
                    slugs.remove(previous.slug.as_str())?;
                }
            }

            let json = serde_json::to_vec(&station)?;
            stations.insert(id, json.as_slice())?;
            slugs.insert(station.slug.as_str(), id)?;

            if previous.is_some() {
                Upsert::Updated
            } else {
                Upsert::Inserted
            }
        };
        write_txn.commit()?;
        Ok((outcome, station.slug))
    }

    pub fn get_station(&self, id: StationId) -> Result<Option<Station>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATIONS_TABLE)?;

        match table.get(id.0)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_station_by_slug(&self, slug: &str) -> Result<Option<Station>, StorageError> {
        let id = {
            let read_txn = self.db.begin_read()?;
            let slugs = read_txn.open_table(SLUGS_TABLE)?;
            let id = slugs.get(slug)?.map(|v| v.value());
            id
        };
        match id {
            Some(id) => self.get_station(StationId(id)),
            None => Ok(None),
        }
    }

    /// Every station, ordered by id.
    pub fn all_stations(&self) -> Result<Vec<Station>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATIONS_TABLE)?;

        let mut stations = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            stations.push(serde_json::from_slice(value.value())?);
        }
        Ok(stations)
    }

    pub fn count_stations(&self) -> Result<u64, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATIONS_TABLE)?;
        Ok(table.len()?)
    }
}
