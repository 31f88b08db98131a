use crate::error::{Error, Result};
use crate::run_block::BlockRecord;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Looks up the generators of previous blocks, referenced by height from a
/// block's generator ref list.
pub trait GeneratorArchive {
    /// Returns the serialized generator of the block at `height`. Fails if the
    /// block is not in the archive or doesn't have a generator.
    fn read_generator(&self, height: u32) -> Result<Vec<u8>>;
}

impl<T: GeneratorArchive + ?Sized> GeneratorArchive for &T {
    fn read_generator(&self, height: u32) -> Result<Vec<u8>> {
        (**self).read_generator(height)
    }
}

impl<S: BuildHasher> GeneratorArchive for HashMap<u32, Vec<u8>, S> {
    fn read_generator(&self, height: u32) -> Result<Vec<u8>> {
        self.get(&height).cloned().ok_or(Error::MissingBlock(height))
    }
}

/// A directory of full blocks, one JSON file per block, named by height:
/// `<height>.json`
#[derive(Debug, Clone)]
pub struct JsonBlockArchive {
    root: PathBuf,
}

impl JsonBlockArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn block_path(&self, height: u32) -> PathBuf {
        self.root.join(format!("{height}.json"))
    }

    pub fn read_block(&self, height: u32) -> Result<BlockRecord> {
        match BlockRecord::from_json_file(self.block_path(height)) {
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Err(Error::MissingBlock(height))
            }
            ret => ret,
        }
    }
}

impl GeneratorArchive for JsonBlockArchive {
    fn read_generator(&self, height: u32) -> Result<Vec<u8>> {
        self.read_block(height)?
            .transactions_generator
            .ok_or(Error::MissingGenerator(height))
    }
}
