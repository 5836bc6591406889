use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{BlobError, BlobStore, validate_key};

/// Directory-backed blob store: one `<key>.json` file per key.
///
/// Batches are staged as `.tmp` files and renamed into place only once every
/// entry has been written. If installing fails part-way, the keys already
/// replaced are put back to their previous contents before the error is
/// returned. A process crash between two renames is not covered: the batch
/// can then be left half installed.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBlobStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlobError> {
        validate_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put_batch(&self, entries: Vec<(String, String)>) -> Result<(), BlobError> {
        for (key, _) in &entries {
            validate_key(key)?;
        }
        let _guard = self.write_lock.lock().map_err(|_| BlobError::Poisoned)?;

        let mut staged: Vec<Staged> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let target = self.path_for(&key);
            let tmp = target.with_extension("json.tmp");
            if let Err(e) = fs::write(&tmp, value) {
                discard(staged.iter().map(|s| &s.tmp));
                let _ = fs::remove_file(&tmp);
                return Err(e.into());
            }
            let previous = match fs::read(&target) {
                Ok(raw) => Some(raw),
                Err(e) if e.kind() == ErrorKind::NotFound => None,
                Err(e) => {
                    discard(staged.iter().map(|s| &s.tmp));
                    let _ = fs::remove_file(&tmp);
                    return Err(e.into());
                }
            };
            staged.push(Staged { tmp, target, previous });
        }

        for (installed, entry) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(&entry.tmp, &entry.target) {
                tracing::error!(
                    path = %entry.target.display(),
                    error = %e,
                    "blob batch install failed; rolling back"
                );
                for done in &staged[..installed] {
                    restore(done);
                }
                discard(staged[installed..].iter().map(|s| &s.tmp));
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().map_err(|_| BlobError::Poisoned)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// One batch entry written to its temp file, with the bytes it replaces.
struct Staged {
    tmp: PathBuf,
    target: PathBuf,
    previous: Option<Vec<u8>>,
}

fn discard<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

fn restore(entry: &Staged) {
    let outcome = match &entry.previous {
        Some(raw) => fs::write(&entry.tmp, raw).and_then(|()| fs::rename(&entry.tmp, &entry.target)),
        None => fs::remove_file(&entry.target),
    };
    if let Err(e) = outcome {
        tracing::error!(path = %entry.target.display(), error = %e, "blob rollback failed");
    }
}
