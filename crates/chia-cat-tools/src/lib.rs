use chia_cat_scan::GeneratorArchive;
use chia_protocol::FullBlock;
use chia_traits::streamable::Streamable;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] chia_cat_scan::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to decompress block: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse FullBlock: {0}")]
    Streamable(#[from] chia_traits::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn parse_block(buffer: Vec<u8>) -> Result<FullBlock> {
    let buffer = zstd::stream::decode_all(&mut std::io::Cursor::<Vec<u8>>::new(buffer))?;
    Ok(FullBlock::from_bytes_unchecked(&buffer)?)
}

/// A full node's blockchain database (v2 schema). Blocks are stored zstd
/// compressed in the full_blocks table. Only blocks in the main chain are
/// considered.
pub struct BlockchainDb {
    connection: Connection,
}

impl BlockchainDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { connection })
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// the main chain block at `height`, if any
    pub fn read_block(&self, height: u32) -> Result<Option<FullBlock>> {
        let mut lookup = self
            .connection
            .prepare_cached("SELECT block FROM full_blocks WHERE height=? AND in_main_chain=1")?;
        let buffer = lookup
            .query_row([height], |row| row.get::<_, Vec<u8>>(0))
            .optional()?;
        buffer.map(parse_block).transpose()
    }

    /// Calls `callback` with every main chain block from `start_height` up to
    /// and including `max_height`, in height order. Stops at the first error.
    pub fn iterate_blocks(
        &self,
        start_height: u32,
        max_height: Option<u32>,
        mut callback: impl FnMut(u32, FullBlock) -> Result<()>,
    ) -> Result<()> {
        let mut statement = self.connection.prepare(
            "SELECT height, block \
            FROM full_blocks \
            WHERE in_main_chain=1 AND height >= ? \
            ORDER BY height",
        )?;

        let mut rows = statement.query([start_height])?;
        while let Some(row) = rows.next()? {
            let height = row.get::<_, u32>(0)?;
            if let Some(h) = max_height {
                if height > h {
                    break;
                }
            }
            let block = parse_block(row.get(1)?)?;
            callback(height, block)?;
        }
        Ok(())
    }
}

impl GeneratorArchive for BlockchainDb {
    fn read_generator(&self, height: u32) -> chia_cat_scan::Result<Vec<u8>> {
        let block = self
            .read_block(height)
            .map_err(|e| chia_cat_scan::Error::Archive(Box::new(e)))?
            .ok_or(chia_cat_scan::Error::MissingBlock(height))?;
        let generator = block
            .transactions_generator
            .ok_or(chia_cat_scan::Error::MissingGenerator(height))?;
        Ok(generator.as_ref().to_vec())
    }
}
