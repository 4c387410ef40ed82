use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use super::{BlobStorage, is_valid_storage_key};
use crate::errors::{Result, ShortboxError};

/// One `<key>.json` file per storage key inside a data directory
pub struct FileBlobStorage {
    dir: PathBuf,
}

impl FileBlobStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                error!("创建数据目录失败: {}", e);
                ShortboxError::file_operation(format!(
                    "Failed to create data directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            info!("Created data directory: {}", dir.display());
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_storage_key(key) {
            return Err(ShortboxError::file_operation(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl BlobStorage for FileBlobStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Storage key '{}' has no file yet", key);
                Ok(None)
            }
            Err(e) => Err(ShortboxError::file_operation(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // 先写临时文件再 rename，避免写到一半留下损坏的 blob
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| {
            ShortboxError::file_operation(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            ShortboxError::file_operation(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
