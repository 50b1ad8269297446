pub mod export;
pub mod storage;

use tracing::{debug, info};

use crate::config::{HistoryConfig, DEFAULT_STORAGE_KEY};
use crate::errors::Result;
use crate::types::{HistoryRecord, RecordId};

pub use export::{export_csv, parse_csv, CsvRow, CSV_HEADERS};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// persistence for calculation history
pub trait HistoryRepository {
    /// store a record ahead of all existing ones
    fn append(&mut self, record: HistoryRecord) -> Result<()>;

    /// records, newest first
    fn list(&self) -> Result<Vec<HistoryRecord>>;

    /// remove a record; `false` when no record has that id
    fn delete_by_id(&mut self, id: RecordId) -> Result<bool>;

    /// remove every record
    fn clear(&mut self) -> Result<()>;

    /// every record as csv text
    fn export_csv(&self) -> Result<String>;

    fn get(&self, id: RecordId) -> Result<Option<HistoryRecord>> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }
}

/// history list kept as one json blob under a fixed key
pub struct HistoryStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    date_format: String,
}

impl<S: KeyValueStorage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_STORAGE_KEY.to_string(),
            date_format: "%d/%m/%Y".to_string(),
        }
    }

    pub fn from_config(storage: S, config: &HistoryConfig) -> Self {
        Self::new(storage).with_key(&config.storage_key)
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// date pattern used for the csv date column
    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn load(&self) -> Result<Vec<HistoryRecord>> {
        match self.storage.get(&self.key)? {
            Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(&text)?),
            _ => Ok(Vec::new()),
        }
    }

    fn save(&mut self, records: &[HistoryRecord]) -> Result<()> {
        let text = serde_json::to_string(records)?;
        self.storage.set(&self.key, &text)
    }
}

impl<S: KeyValueStorage> HistoryRepository for HistoryStore<S> {
    fn append(&mut self, record: HistoryRecord) -> Result<()> {
        let mut records = self.load()?;
        let id = record.id;
        records.insert(0, record);
        self.save(&records)?;
        info!(%id, total = records.len(), "history record saved");
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistoryRecord>> {
        self.load()
    }

    fn delete_by_id(&mut self, id: RecordId) -> Result<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            debug!(%id, "no history record to delete");
            return Ok(false);
        }

        self.save(&records)?;
        info!(%id, remaining = records.len(), "history record deleted");
        Ok(true)
    }

    fn clear(&mut self) -> Result<()> {
        self.storage.remove(&self.key)?;
        info!("history cleared");
        Ok(())
    }

    fn export_csv(&self) -> Result<String> {
        export_csv(&self.load()?, &self.date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalculatorError;
    use crate::payments::calculate_loan;
    use crate::types::{LoanParameters, TermUnit};
    use chrono::{Duration, TimeZone, Utc};

    fn record(principal: f64, minutes: i64) -> HistoryRecord {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
        let params = LoanParameters::new(principal, 10.0, 24, TermUnit::Months);
        let result = calculate_loan(&params, at);
        HistoryRecord::new(at, params, result)
    }

    #[test]
    fn test_append_prepends() {
        let mut store = HistoryStore::new(MemoryStorage::new());
        let first = record(1_000.0, 0);
        let second = record(2_000.0, 1);

        store.append(first.clone()).unwrap();
        store.append(second.clone()).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = HistoryStore::new(MemoryStorage::new());
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.export_csv().unwrap().lines().count(), 1);
    }

    #[test]
    fn test_delete_by_id() {
        let mut store = HistoryStore::new(MemoryStorage::new());
        let keep = record(1_000.0, 0);
        let removed = record(2_000.0, 1);
        store.append(keep.clone()).unwrap();
        store.append(removed.clone()).unwrap();

        assert!(store.delete_by_id(removed.id).unwrap());
        assert!(!store.delete_by_id(removed.id).unwrap());
        assert_eq!(store.list().unwrap(), vec![keep.clone()]);
        assert_eq!(store.get(keep.id).unwrap(), Some(keep));
        assert_eq!(store.get(removed.id).unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let mut store = HistoryStore::new(MemoryStorage::new());
        store.append(record(1_000.0, 0)).unwrap();
        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_persists_under_configured_key() {
        let config = HistoryConfig {
            storage_key: "loans".to_string(),
            ..HistoryConfig::default()
        };
        let mut store = HistoryStore::from_config(MemoryStorage::new(), &config);
        store.append(record(1_000.0, 0)).unwrap();

        assert!(store.storage().get("loans").unwrap().is_some());
        assert!(store.storage().get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let saved = record(5_000.0, 0);
        {
            let mut store = HistoryStore::new(FileStorage::new(dir.path()).unwrap());
            store.append(saved.clone()).unwrap();
        }

        let store = HistoryStore::new(FileStorage::new(dir.path()).unwrap());
        assert_eq!(store.list().unwrap(), vec![saved]);
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let mut storage = MemoryStorage::new();
        storage.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let store = HistoryStore::new(storage);

        assert!(matches!(store.list(), Err(CalculatorError::Serialization(_))));
    }

    #[test]
    fn test_export_uses_date_format() {
        let mut store = HistoryStore::new(MemoryStorage::new()).with_date_format("%Y-%m-%d");
        store.append(record(1_000.0, 0)).unwrap();
        store.append(record(2_000.0, 1)).unwrap();

        let rows = parse_csv(&store.export_csv().unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-05-01");
        assert_eq!(rows[0].loan_amount.to_fixed(), "2000.00");
    }
}
