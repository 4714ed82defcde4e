//! Loan storage backends.
//!
//! Supports:
//! - [`InMemoryLoanStore`]: non-persistent, keeps the last snapshot per employee
//! - [`JsonFileLoanStore`]: whole-ledger JSON snapshot on disk

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::models::Loan;

/// Durable storage for the loan ledger.
///
/// The ledger calls [`LoanPersistence::persist`] after staging every
/// mutation; an `Err` makes the ledger discard the staged change.
pub trait LoanPersistence: Send + Sync {
    /// Whether this store survives a restart.
    fn is_persistent(&self) -> bool;

    /// Loads every stored loan, keyed by employee id.
    fn load(&self) -> Result<HashMap<String, Vec<Loan>>, PersistenceError>;

    /// Durably replaces the stored loans of one employee.
    fn persist(&self, employee_id: &str, loans: &[Loan]) -> Result<(), PersistenceError>;
}

fn lock_error<T>(_: std::sync::PoisonError<T>) -> PersistenceError {
    PersistenceError::Unavailable {
        message: "store lock poisoned".to_string(),
    }
}

/// In-memory loan store (non-persistent).
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    snapshots: Mutex<HashMap<String, Vec<Loan>>>,
}

impl InMemoryLoanStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last loans persisted for an employee.
    pub fn snapshot(&self, employee_id: &str) -> Option<Vec<Loan>> {
        self.snapshots
            .lock()
            .ok()
            .and_then(|snapshots| snapshots.get(employee_id).cloned())
    }
}

impl LoanPersistence for InMemoryLoanStore {
    fn is_persistent(&self) -> bool {
        false
    }

    fn load(&self) -> Result<HashMap<String, Vec<Loan>>, PersistenceError> {
        Ok(self.snapshots.lock().map_err(lock_error)?.clone())
    }

    fn persist(&self, employee_id: &str, loans: &[Loan]) -> Result<(), PersistenceError> {
        self.snapshots
            .lock()
            .map_err(lock_error)?
            .insert(employee_id.to_string(), loans.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LoanStoreSnapshot {
    loans: HashMap<String, Vec<Loan>>,
}

/// JSON file-based loan store.
///
/// Every write serializes the whole ledger to `<path>.tmp` and renames it
/// over `<path>`, so the file on disk is always a complete snapshot.
#[derive(Debug)]
pub struct JsonFileLoanStore {
    path: PathBuf,
    loans: Mutex<HashMap<String, Vec<Loan>>>,
}

impl JsonFileLoanStore {
    /// Opens the store at `path`, reading any existing snapshot.
    ///
    /// A missing file starts an empty ledger. An unreadable or corrupt file
    /// is an error rather than silently discarding recorded loans.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let path_text = path.display().to_string();

        let snapshot = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<LoanStoreSnapshot>(&bytes).map_err(|e| {
                PersistenceError::Serialization {
                    path: path_text.clone(),
                    message: e.to_string(),
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path_text, "No loan store on disk, starting empty");
                LoanStoreSnapshot::default()
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: path_text,
                    source,
                });
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        Ok(Self {
            path,
            loans: Mutex::new(snapshot.loans),
        })
    }

    /// The snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, snapshot: &LoanStoreSnapshot) -> Result<(), PersistenceError> {
        let path_text = self.path.display().to_string();
        let data =
            serde_json::to_vec_pretty(snapshot).map_err(|e| PersistenceError::Serialization {
                path: path_text.clone(),
                message: e.to_string(),
            })?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data).map_err(|source| PersistenceError::Io {
            path: tmp_path.display().to_string(),
            source,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|source| PersistenceError::Io {
            path: path_text,
            source,
        })
    }
}

impl LoanPersistence for JsonFileLoanStore {
    fn is_persistent(&self) -> bool {
        true
    }

    fn load(&self) -> Result<HashMap<String, Vec<Loan>>, PersistenceError> {
        Ok(self.loans.lock().map_err(lock_error)?.clone())
    }

    fn persist(&self, employee_id: &str, loans: &[Loan]) -> Result<(), PersistenceError> {
        let mut guard = self.loans.lock().map_err(lock_error)?;
        let mut staged = guard.clone();
        staged.insert(employee_id.to_string(), loans.to_vec());

        let snapshot = LoanStoreSnapshot { loans: staged };
        if let Err(err) = self.write_snapshot(&snapshot) {
            warn!(employee_id, error = %err, "Failed to write loan store");
            return Err(err);
        }
        *guard = snapshot.loans;
        Ok(())
    }
}
