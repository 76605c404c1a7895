//! Key-value persistence for ledger state.
//!
//! Values are stored as JSON strings under fixed keys. Loading and saving go
//! through [load_or_default] and [save], which log failures and carry on: a
//! read failure yields the default and a write failure is dropped.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::Error;

/// The key for the list of transactions.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// The key for the managed list of people.
pub const PEOPLE_KEY: &str = "people";
/// The key for the managed list of projects.
pub const PROJECTS_KEY: &str = "projects";
/// The key for the managed list of receipt categories.
pub const RECEIPT_CATEGORIES_KEY: &str = "receiptCategories";
/// The key for the managed list of expense categories.
pub const EXPENSE_CATEGORIES_KEY: &str = "expenseCategories";
/// The key for the per-person balance thresholds.
pub const PERSON_THRESHOLDS_KEY: &str = "personThresholds";

/// A string-keyed store of string values.
pub trait KeyValueStore {
    /// Get the value stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// Load and deserialize the value under `key`.
///
/// Returns `default` if the key is missing or empty, the store fails, or the
/// stored JSON does not parse. Failures are logged, never returned.
pub fn load_or_default<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
    default: T,
) -> T {
    match store.get(key) {
        Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!("Error loading \"{key}\" from storage: {error}");
                default
            }
        },
        Ok(_) => default,
        Err(error) => {
            tracing::error!("Error loading \"{key}\" from storage: {error}");
            default
        }
    }
}

/// Load a JSON array under `key`, deserializing each element on its own.
///
/// Elements that do not parse are logged and skipped, so one bad record does
/// not lose the rest. Returns `default` under the same conditions as
/// [load_or_default].
pub fn load_list_or_default<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
    default: Vec<T>,
) -> Vec<T> {
    let Some(values) = load_or_default::<Option<Vec<Value>>>(store, key, None) else {
        return default;
    };

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(error) => {
                tracing::error!("Skipping item {index} of \"{key}\" in storage: {error}");
                None
            }
        })
        .collect()
}

/// Serialize `value` as JSON and store it under `key`.
///
/// Failures are logged and otherwise ignored.
pub fn save<T: Serialize + ?Sized>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(error) => {
            let error = Error::JSONSerializationError(error.to_string());
            tracing::error!("Error saving \"{key}\" to storage: {error}");
            return;
        }
    };

    match store.set(key, &raw) {
        Ok(()) => tracing::debug!("Saved {} bytes to \"{key}\"", raw.len()),
        Err(error) => tracing::error!("Error saving \"{key}\" to storage: {error}"),
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// A store that keeps everything in memory and forgets it on drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// A store backed by a table in a SQLite database.
#[derive(Debug)]
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Wrap `connection`, creating the key-value table if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the table cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_key_value_table(&connection)?;

        Ok(Self { connection })
    }

    /// The underlying database connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.connection
            .query_row(
                "SELECT value FROM key_value WHERE key = :key",
                &[(":key", &key)],
                |row| row.get(0),
            )
            .optional()
            .map_err(|error| error.into())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.connection.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;

        Ok(())
    }
}

/// Create the key-value table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        store::{
            KeyValueStore, MemoryStore, SqliteStore, TRANSACTIONS_KEY, load_list_or_default,
            load_or_default, save,
        },
    };

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, Error> {
            Err(Error::SqlError(rusqlite::Error::InvalidQuery))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), Error> {
            Err(Error::SqlError(rusqlite::Error::InvalidQuery))
        }
    }

    fn get_test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        SqliteStore::new(conn).unwrap()
    }

    #[test]
    fn load_missing_key_returns_default() {
        let store = MemoryStore::new();

        let people: Vec<String> = load_or_default(&store, "people", vec!["seed".to_owned()]);

        assert_eq!(people, vec!["seed"]);
    }

    #[test]
    fn load_empty_value_returns_default() {
        let mut store = MemoryStore::new();
        store.set("people", "").unwrap();

        let people: Vec<String> = load_or_default(&store, "people", Vec::new());

        assert!(people.is_empty());
    }

    #[test]
    fn load_corrupt_json_returns_default() {
        let mut store = MemoryStore::new();
        store.set(TRANSACTIONS_KEY, "{not json").unwrap();

        let values: Vec<u32> = load_or_default(&store, TRANSACTIONS_KEY, vec![7]);

        assert_eq!(values, vec![7]);
    }

    #[test]
    fn load_list_skips_bad_elements() {
        let mut store = MemoryStore::new();
        store.set(TRANSACTIONS_KEY, r#"[1, "two", 3, null]"#).unwrap();

        let values: Vec<u32> = load_list_or_default(&store, TRANSACTIONS_KEY, vec![7]);

        assert_eq!(values, vec![1, 3]);
    }

    #[test]
    fn load_list_of_non_array_returns_default() {
        let mut store = MemoryStore::new();
        store.set(TRANSACTIONS_KEY, r#"{"id": 1}"#).unwrap();

        let values: Vec<u32> = load_list_or_default(&store, TRANSACTIONS_KEY, vec![7]);

        assert_eq!(values, vec![7]);
    }

    #[test]
    fn load_from_failing_store_returns_default() {
        let values: Vec<u32> = load_or_default(&BrokenStore, TRANSACTIONS_KEY, vec![1, 2]);

        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn save_to_failing_store_does_not_panic() {
        save(&mut BrokenStore, TRANSACTIONS_KEY, &vec![1, 2, 3]);
    }

    #[test]
    fn save_then_load_memory() {
        let mut store = MemoryStore::new();

        save(&mut store, "projects", &["A", "B"]);

        assert_eq!(store.get("projects").unwrap().as_deref(), Some(r#"["A","B"]"#));
        let projects: Vec<String> = load_or_default(&store, "projects", Vec::new());
        assert_eq!(projects, vec!["A", "B"]);
    }

    #[test]
    fn sqlite_get_missing_key_is_none() {
        let store = get_test_store();

        assert_eq!(store.get("nope"), Ok(None));
    }

    #[test]
    fn sqlite_set_replaces_existing_value() {
        let mut store = get_test_store();

        store.set("people", r#"["Alice"]"#).unwrap();
        store.set("people", r#"["Alice","Bob"]"#).unwrap();

        assert_eq!(
            store.get("people"),
            Ok(Some(r#"["Alice","Bob"]"#.to_owned()))
        );
        let count: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM key_value", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn sqlite_store_can_be_reopened_on_existing_table() {
        let conn = Connection::open_in_memory().unwrap();
        super::create_key_value_table(&conn).unwrap();

        assert!(SqliteStore::new(conn).is_ok());
    }
}
