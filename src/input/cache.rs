use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;

use crate::input::InputError;
use crate::input::load_table;
use crate::model::dataset::PreparedDataset;
use crate::pipeline::stage1_prepare::prepare;

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path)
        .map_err(|e| InputError::DataLoad(format!("cannot open {}: {e}", path.display())))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn hash_file(path: &Path) -> Result<u64, InputError> {
    let mut file = File::open(path)
        .map_err(|e| InputError::DataLoad(format!("cannot open {}: {e}", path.display())))?;
    let mut buf = [0u8; 8192];
    let mut hasher = Fnv64::new();
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finish())
}

/// Identity of a source file: where it lives and what it contains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub len: u64,
    pub content_hash: u64,
}

impl SourceKey {
    pub fn identify(path: &Path) -> Result<Self, InputError> {
        let canonical = path.canonicalize().map_err(|e| {
            InputError::DataLoad(format!("cannot resolve {}: {e}", path.display()))
        })?;
        let len = std::fs::metadata(&canonical)?.len();
        let content_hash = hash_file(&canonical)?;
        Ok(Self {
            path: canonical,
            len,
            content_hash,
        })
    }
}

/// Prepared datasets memoized per source identity for the life of the process.
/// Nothing is ever evicted.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<PreparedDataset>>,
    hits: usize,
    misses: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_prepare(&mut self, path: &Path) -> Result<Arc<PreparedDataset>, InputError> {
        let key = SourceKey::identify(path)?;
        if let Some(dataset) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(path = %key.path.display(), "prepared dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        self.misses += 1;
        tracing::debug!(
            path = %key.path.display(),
            hash = format_args!("{:016x}", key.content_hash),
            "prepared dataset cache miss"
        );
        let raw = load_table(path)?;
        let dataset = Arc::new(prepare(&raw)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

struct Fnv64 {
    hash: u64,
}

impl Fnv64 {
    fn new() -> Self {
        Self {
            hash: 0xcbf29ce484222325,
        }
    }

    fn update(&mut self, data: &[u8]) {
        let mut h = self.hash;
        for &b in data {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.hash = h;
    }

    fn finish(&self) -> u64 {
        self.hash
    }
}
