use crate::util::{decode_json, encode_json, id_from_file_name, record_file_name};
use mk_core::error::MockError;
use mk_core::store::MockStore;
use mk_core::types::mock::sort_newest_first;
use mk_core::types::{MockId, MockRecord, MockRecordSummary};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// One JSON file per mock, named after its id, inside a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory if it does not exist yet.
    pub fn open<P: AsRef<Path>>(dir: P) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &MockId) -> PathBuf {
        self.dir.join(record_file_name(id))
    }

    fn temp_path(&self, id: &MockId) -> PathBuf {
        self.dir.join(format!("{}.tmp", record_file_name(id)))
    }
}

impl MockStore for FileStore {
    fn get(&self, id: &MockId) -> Result<MockRecord, MockError> {
        let bytes = match fs::read(self.record_path(id)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(MockError::NotFound { id: id.to_string() });
            }
            Err(err) => {
                error!(mock_id = %id, dir = %self.dir.display(), error = %err, "failed to read mock");
                return Err(MockError::CorruptData {
                    id: id.to_string(),
                    message: err.to_string(),
                });
            }
        };
        decode_json::<MockRecord>(&bytes).map_err(|err| {
            error!(mock_id = %id, error = %err, "failed to decode mock");
            MockError::CorruptData {
                id: id.to_string(),
                message: err.to_string(),
            }
        })
    }

    fn list(&self) -> Result<Vec<MockRecordSummary>, MockError> {
        let entries = fs::read_dir(&self.dir).map_err(|err| {
            error!(dir = %self.dir.display(), error = %err, "failed to read mock directory");
            MockError::List {
                message: err.to_string(),
            }
        })?;

        let mut summaries = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| MockError::List {
                message: err.to_string(),
            })?;
            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(id_from_file_name) else {
                debug!(file = ?file_name, "skipping non-mock file");
                continue;
            };
            let bytes = match fs::read(entry.path()) {
                Ok(bytes) => bytes,
                // removed between the directory scan and the read
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(MockError::List {
                        message: format!("{id}: {err}"),
                    });
                }
            };
            let summary = decode_json::<MockRecordSummary>(&bytes).map_err(|err| {
                error!(mock_id = %id, error = %err, "failed to decode mock summary");
                MockError::List {
                    message: format!("{id}: {err}"),
                }
            })?;
            if summary.id != id {
                return Err(MockError::List {
                    message: format!("{id}: stored id {} does not match file name", summary.id),
                });
            }
            summaries.push(summary);
        }

        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    fn put(&self, record: &MockRecord) -> Result<(), MockError> {
        let write_error = |message: String| MockError::Write {
            id: record.id.to_string(),
            message,
        };
        let bytes = encode_json(record).map_err(|err| write_error(err.to_string()))?;
        let temp = self.temp_path(&record.id);
        fs::write(&temp, bytes).map_err(|err| {
            error!(mock_id = %record.id, dir = %self.dir.display(), error = %err, "failed to write mock");
            write_error(err.to_string())
        })?;
        fs::rename(&temp, self.record_path(&record.id)).map_err(|err| {
            let _ = fs::remove_file(&temp);
            error!(mock_id = %record.id, dir = %self.dir.display(), error = %err, "failed to commit mock");
            write_error(err.to_string())
        })
    }

    fn delete(&self, id: &MockId) -> Result<bool, MockError> {
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(MockError::Delete {
                id: id.to_string(),
                message: err.to_string(),
            }),
        }
    }
}
