//! File-backed PIN store
//!
//! Keeps an Argon2id PHC hash of the PIN in pin.json inside the data
//! directory. The PIN itself is never written. Writes go through a temp file
//! and an atomic rename, under an exclusive lock on pin.lock.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::result::{Error, Result};
use crate::ports::PinStore;

const PIN_FILE: &str = "pin.json";
const LOCK_FILE: &str = "pin.lock";

/// Default Argon2id parameters
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_MEMORY_COST: u32 = 65536; // 64 MiB
pub const DEFAULT_PARALLELISM: u32 = 4;

/// Argon2id cost parameters for new hashes
///
/// Existing hashes carry their own parameters and verify regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

/// Contents of pin.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinRecord {
    hash: String,
    algorithm: String,
    updated_at: DateTime<Utc>,
}

/// PIN store persisted in the data directory
#[derive(Debug, Clone)]
pub struct FilePinStore {
    data_dir: PathBuf,
    params: HashParams,
}

impl FilePinStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_params(data_dir, HashParams::default())
    }

    pub fn with_params(data_dir: impl Into<PathBuf>, params: HashParams) -> Self {
        Self {
            data_dir: data_dir.into(),
            params,
        }
    }

    fn pin_file(&self) -> PathBuf {
        self.data_dir.join(PIN_FILE)
    }

    /// When the PIN was last changed, if one is set
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read_record()?.map(|r| r.updated_at))
    }

    /// Forget the stored PIN
    pub fn clear(&self) -> Result<()> {
        let _lock = self.lock(true)?;
        match fs::remove_file(self.pin_file()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn lock(&self, exclusive: bool) -> Result<File> {
        fs::create_dir_all(&self.data_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(self.data_dir.join(LOCK_FILE))?;
        if exclusive {
            file.lock_exclusive()?;
        } else {
            file.lock_shared()?;
        }
        // Released when the handle is dropped
        Ok(file)
    }

    fn read_record(&self) -> Result<Option<PinRecord>> {
        let _lock = self.lock(false)?;
        let path = self.pin_file();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let record = serde_json::from_str(&content)
            .map_err(|e| Error::store(format!("Corrupt PIN record: {}", e)))?;
        Ok(Some(record))
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            None,
        )
        .map_err(|e| Error::store(format!("Invalid argon2 params: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn verify_blocking(&self, pin: &str) -> Result<bool> {
        let Some(record) = self.read_record()? else {
            return Ok(false);
        };
        let parsed = PasswordHash::new(&record.hash)
            .map_err(|e| Error::store(format!("Corrupt PIN hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(pin.as_bytes(), &parsed)
            .is_ok())
    }

    fn set_blocking(&self, pin: &str) -> Result<()> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(pin.as_bytes(), &salt)
            .map_err(|e| Error::store(format!("Failed to hash PIN: {}", e)))?
            .to_string();
        let record = PinRecord {
            hash,
            algorithm: "argon2id".to_string(),
            updated_at: Utc::now(),
        };

        let _lock = self.lock(true)?;
        let mut temp = tempfile::NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(serde_json::to_string_pretty(&record)?.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(self.pin_file())
            .map_err(|e| Error::store(format!("Failed to save PIN: {}", e)))?;
        Ok(())
    }
}

/// Run blocking store work off the async runtime
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::store(format!("PIN store task failed: {}", e)))?
}

#[async_trait]
impl PinStore for FilePinStore {
    async fn has(&self) -> Result<bool> {
        Ok(self.read_record()?.is_some())
    }

    async fn verify(&self, pin: &str) -> Result<bool> {
        let store = self.clone();
        let pin = Zeroizing::new(pin.to_string());
        run_blocking(move || store.verify_blocking(&pin)).await
    }

    async fn set(&self, pin: &str) -> Result<()> {
        let store = self.clone();
        let pin = Zeroizing::new(pin.to_string());
        run_blocking(move || store.set_blocking(&pin)).await
    }
}

/// True when a PIN file exists in `data_dir`
pub fn pin_exists(data_dir: &Path) -> bool {
    data_dir.join(PIN_FILE).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fast_params() -> HashParams {
        HashParams {
            time_cost: 1,
            memory_cost: 8,
            parallelism: 1,
        }
    }

    #[tokio::test]
    async fn test_set_and_verify() {
        let dir = tempdir().unwrap();
        let store = FilePinStore::with_params(dir.path(), fast_params());

        assert!(!store.has().await.unwrap());
        store.set("1234").await.unwrap();
        assert!(store.has().await.unwrap());
        assert!(store.verify("1234").await.unwrap());
        assert!(!store.verify("4321").await.unwrap());
    }

    #[tokio::test]
    async fn test_pin_is_not_stored_in_plain_text() {
        let dir = tempdir().unwrap();
        let store = FilePinStore::with_params(dir.path(), fast_params());
        store.set("918273").await.unwrap();

        let content = fs::read_to_string(dir.path().join(PIN_FILE)).unwrap();
        assert!(!content.contains("918273"));
        assert!(content.contains("$argon2id$"));
    }

    #[tokio::test]
    async fn test_verify_without_pin_is_false() {
        let dir = tempdir().unwrap();
        let store = FilePinStore::with_params(dir.path(), fast_params());
        assert!(!store.verify("1234").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempdir().unwrap();
        let store = FilePinStore::with_params(dir.path(), fast_params());
        store.set("1234").await.unwrap();
        assert!(pin_exists(dir.path()));

        store.clear().unwrap();
        assert!(!pin_exists(dir.path()));
        store.clear().unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_record_is_a_store_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PIN_FILE), "not json").unwrap();
        let store = FilePinStore::with_params(dir.path(), fast_params());
        assert!(matches!(store.verify("1234").await, Err(Error::Store(_))));
    }
}
