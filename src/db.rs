use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::AppError;

/// Name of the key-value slot holding the whole state snapshot.
pub const STATE_SLOT: &str = "fuel-flow-storage";

/// Where a state snapshot blob is loaded from and saved to. The store only
/// ever reads or writes the whole snapshot.
pub trait StateStorage {
  fn load(&self) -> Result<Option<String>, AppError>;
  fn save(&self, raw: &str) -> Result<(), AppError>;
}

pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  pub fn open(app_dir: &Path) -> Result<Self, AppError> {
    fs::create_dir_all(app_dir)?;
    let db_path = app_dir.join("casifuel.sqlite");
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(
      "CREATE TABLE IF NOT EXISTS state_slots (
         name TEXT PRIMARY KEY,
         payload TEXT NOT NULL,
         updated_at TEXT NOT NULL
       )",
    )?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }
}

impl StateStorage for SqliteStorage {
  fn load(&self) -> Result<Option<String>, AppError> {
    let conn = self.conn.lock()?;
    let payload = conn
      .query_row(
        "SELECT payload FROM state_slots WHERE name = ?1",
        params![STATE_SLOT],
        |row| row.get(0),
      )
      .optional()?;
    Ok(payload)
  }

  fn save(&self, raw: &str) -> Result<(), AppError> {
    let conn = self.conn.lock()?;
    conn.execute(
      "INSERT OR REPLACE INTO state_slots (name, payload, updated_at) VALUES (?1, ?2, ?3)",
      params![STATE_SLOT, raw, Utc::now().to_rfc3339()],
    )?;
    Ok(())
  }
}

/// In-memory backend for tests.
#[cfg(test)]
pub struct MemoryStorage {
  slot: Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryStorage {
  pub fn new() -> Self {
    Self {
      slot: Mutex::new(None),
    }
  }
}

#[cfg(test)]
impl StateStorage for MemoryStorage {
  fn load(&self) -> Result<Option<String>, AppError> {
    Ok(self.slot.lock()?.clone())
  }

  fn save(&self, raw: &str) -> Result<(), AppError> {
    *self.slot.lock()? = Some(raw.to_string());
    Ok(())
  }
}

pub fn resolve_app_dir() -> Result<PathBuf, AppError> {
  if let Some(portable) = resolve_portable_dir()? {
    return Ok(portable);
  }

  let base = dirs_next::data_local_dir()
    .ok_or_else(|| AppError::new("PATH", "Local data directory not found"))?;
  Ok(base.join("CasiFuel"))
}

fn resolve_portable_dir() -> Result<Option<PathBuf>, AppError> {
  let env_enabled = std::env::var("CASIFUEL_PORTABLE")
    .ok()
    .map(|value| {
      let value = value.to_ascii_lowercase();
      value == "1" || value == "true" || value == "yes"
    })
    .unwrap_or(false);

  let exe_dir = std::env::current_exe()
    .ok()
    .and_then(|path| path.parent().map(|parent| parent.to_path_buf()));

  if let Some(exe_dir) = exe_dir {
    let flag = exe_dir.join("portable.flag");
    let data_dir = exe_dir.join("data");
    if env_enabled || flag.exists() || data_dir.exists() {
      fs::create_dir_all(&data_dir)?;
      return Ok(Some(data_dir));
    }
  }

  Ok(None)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sqlite_slot_round_trip() {
    let dir = std::env::temp_dir().join(format!("casifuel-db-test-{}", crate::store::new_txn_id()));
    let storage = SqliteStorage::open(&dir).expect("open");
    assert!(storage.load().expect("load").is_none());

    storage.save("{\"transactions\":[]}").expect("save");
    assert_eq!(
      storage.load().expect("load").as_deref(),
      Some("{\"transactions\":[]}")
    );

    storage.save("{\"transactions\":[1]}").expect("overwrite");
    assert_eq!(
      storage.load().expect("load").as_deref(),
      Some("{\"transactions\":[1]}")
    );

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn memory_storage_round_trip() {
    let storage = MemoryStorage::new();
    assert!(storage.load().expect("load").is_none());
    storage.save("blob").expect("save");
    assert_eq!(storage.load().expect("load").as_deref(), Some("blob"));
  }
}
