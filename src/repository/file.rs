//! JSON-document-backed repository.
//!
//! Every operation is a full read-modify-write cycle over one document,
//! serialized by a single store-wide mutex. Throughput is one operation at a
//! time; in exchange no two operations ever interleave their reads and
//! writes, so there are no lost updates and no torn documents.
//!
//! This backend does not enforce SKU uniqueness. Callers are expected to
//! check with [`ProductRepository::find_by_sku`] before saving a new product
//! (see [`crate::ProductService`]). If duplicates end up in the document
//! anyway, `find_by_sku` returns the one with the lowest id and which one
//! that is should not be relied on.

use super::document::{self, Snapshot};
use super::ProductRepository;
use crate::error::{InventoryError, Result};
use crate::product::Product;
use crate::types::ProductId;
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File repository configuration.
#[derive(Clone, Debug)]
pub struct FileRepositoryConfig {
    /// Path of the JSON document.
    pub path: PathBuf,

    /// Fsync the document after each write.
    pub sync_writes: bool,

    /// Hold an OS advisory lock on `<path>.lock` for the repository's
    /// lifetime, so a second repository on the same document is refused.
    ///
    /// With this off, nothing stops two repositories from opening the same
    /// document. Each would have its own store-wide lock and both write
    /// through the same `<path>.tmp`, so their updates can be lost or their
    /// renames fail. The caller must then guarantee a single repository per
    /// document.
    pub exclusive: bool,
}

impl Default for FileRepositoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./inventory.db.json"),
            sync_writes: true,
            exclusive: true,
        }
    }
}

impl FileRepositoryConfig {
    /// Default configuration for a document at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Repository storing all products in a single JSON document.
pub struct FileProductRepository {
    config: FileRepositoryConfig,

    /// Sidecar lock file, held while the repository lives.
    _lock_file: Option<File>,

    /// Store-wide lock. Every operation holds it for its whole cycle.
    lock: Mutex<()>,
}

impl FileProductRepository {
    /// Open a repository. The document itself is not created until the
    /// first write; a missing document reads as an empty inventory.
    pub fn open(config: FileRepositoryConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_file = if config.exclusive {
            Some(Self::acquire_lock(&config.path)?)
        } else {
            None
        };

        info!(path = %config.path.display(), exclusive = config.exclusive, "opened inventory document");

        Ok(Self {
            config,
            _lock_file: lock_file,
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_file = File::create(sidecar(path, "lock"))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| InventoryError::Locked)?;

        Ok(lock_file)
    }

    /// Read the whole document. Caller must hold `self.lock`.
    fn load(&self) -> Result<Snapshot> {
        let text = match fs::read_to_string(&self.config.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::new()),
            Err(e) => return Err(e.into()),
        };

        let snapshot = document::decode(&text)?;
        debug!(path = %self.config.path.display(), products = snapshot.len(), "loaded inventory");
        Ok(snapshot)
    }

    /// Replace the whole document. Caller must hold `self.lock`.
    ///
    /// Writes to a temp file and renames it over the document, so readers
    /// see either the old or the new document in full.
    fn write(&self, snapshot: &Snapshot) -> Result<()> {
        let text = document::encode(snapshot)?;
        let tmp_path = sidecar(&self.config.path, "tmp");

        replace_file(
            &tmp_path,
            &self.config.path,
            text.as_bytes(),
            self.config.sync_writes,
        )?;
        debug!(path = %self.config.path.display(), products = snapshot.len(), "wrote inventory");
        Ok(())
    }
}

impl ProductRepository for FileProductRepository {
    fn save(&self, product: &Product) -> Result<()> {
        let _lock = self.lock.lock();

        let mut snapshot = self.load()?;
        snapshot.insert(product.id(), product.clone());
        self.write(&snapshot)
    }

    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let _lock = self.lock.lock();

        Ok(self.load()?.remove(&id))
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        let _lock = self.lock.lock();

        Ok(self.load()?.into_values().find(|p| p.sku() == sku))
    }

    fn list_all(&self) -> Result<Vec<Product>> {
        let _lock = self.lock.lock();

        Ok(self.load()?.into_values().collect())
    }

    fn delete_by_id(&self, id: ProductId) -> Result<bool> {
        let _lock = self.lock.lock();

        let mut snapshot = self.load()?;
        if snapshot.remove(&id).is_none() {
            return Ok(false);
        }

        self.write(&snapshot)?;
        Ok(true)
    }
}

/// Write `contents` to `tmp_path`, then rename it over `path`. The temp file
/// is removed again if any step fails.
fn replace_file(tmp_path: &Path, path: &Path, contents: &[u8], sync: bool) -> io::Result<()> {
    let result = write_new(tmp_path, contents, sync).and_then(|()| fs::rename(tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(tmp_path);
    }
    result
}

fn write_new(path: &Path, contents: &[u8], sync: bool) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(contents)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

/// `inventory.db.json` -> `inventory.db.json.<ext>`
fn sidecar(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
