use crate::archive::{GeneratorArchive, JsonBlockArchive};
use crate::conditions::CatSpend;
use crate::decode_spend::decode_spend;
use crate::error::Result;
use crate::puzzles::CatMatcher;
use crate::run_generator::run_generator;
use chia_consensus::consensus_constants::ConsensusConstants;
use chia_protocol::FullBlock;
use clvmr::Allocator;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The parts of a block needed to find its CAT spends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockRecord {
    pub transactions_generator: Option<Vec<u8>>,
    pub transactions_generator_ref_list: Vec<u32>,
    /// the cost from the block's transactions info, or None if the block
    /// doesn't have one
    pub cost: Option<u64>,
}

// the JSON form of a full block, as dumped by the full node. Only the fields
// we use are parsed
#[derive(Deserialize)]
struct JsonFullBlock {
    block: JsonBlock,
}

#[derive(Deserialize)]
struct JsonBlock {
    #[serde(default)]
    transactions_generator: Option<String>,
    #[serde(default)]
    transactions_generator_ref_list: Vec<u32>,
    #[serde(default)]
    transactions_info: Option<JsonTransactionsInfo>,
}

#[derive(Deserialize)]
struct JsonTransactionsInfo {
    cost: u64,
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

impl BlockRecord {
    pub fn from_json(buf: &[u8]) -> Result<Self> {
        let JsonFullBlock { block } = serde_json::from_slice(buf)?;
        Ok(Self {
            transactions_generator: block
                .transactions_generator
                .as_deref()
                .map(decode_hex)
                .transpose()?,
            transactions_generator_ref_list: block.transactions_generator_ref_list,
            cost: block.transactions_info.map(|ti| ti.cost),
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read(path)?)
    }

    /// The generator and the cost it's declared with. None if the block has
    /// no transactions info or no (or an empty) generator, in which case it
    /// has no spends.
    pub fn generator_and_cost(&self) -> Option<(&[u8], u64)> {
        let cost = self.cost?;
        match self.transactions_generator.as_deref() {
            Some(generator) if !generator.is_empty() => Some((generator, cost)),
            _ => None,
        }
    }
}

impl From<&FullBlock> for BlockRecord {
    fn from(block: &FullBlock) -> Self {
        Self {
            transactions_generator: block
                .transactions_generator
                .as_ref()
                .map(|g| g.as_ref().to_vec()),
            transactions_generator_ref_list: block.transactions_generator_ref_list.clone(),
            cost: block.transactions_info.as_ref().map(|ti| ti.cost),
        }
    }
}

/// Looks up the generators referenced by `block`, in the order of its ref
/// list. Each entry is read once.
pub fn resolve_block_refs(
    block: &BlockRecord,
    archive: &impl GeneratorArchive,
) -> Result<Vec<Vec<u8>>> {
    block
        .transactions_generator_ref_list
        .iter()
        .map(|height| archive.read_generator(*height))
        .collect()
}

/// Runs the generator of `block` with its (already resolved) block references
/// and returns the CAT spends, in the order the generator output them.
///
/// The cost is capped by the lower of the block's declared cost and the
/// max block cost. Every puzzle is bounded by the same cap.
pub fn run_block_with_refs<GenBuf: AsRef<[u8]>>(
    block: &BlockRecord,
    block_refs: &[GenBuf],
    constants: &ConsensusConstants,
    matcher: &CatMatcher,
) -> Result<Vec<CatSpend>> {
    let Some((generator, cost)) = block.generator_and_cost() else {
        return Ok(vec![]);
    };
    let max_cost = constants.max_block_cost_clvm.min(cost);

    let mut a = Allocator::new();
    let spends = run_generator(&mut a, generator, block_refs, max_cost)?;

    let mut ret = Vec::new();
    for spend in &spends {
        if let Some(cat) = decode_spend(&mut a, spend, matcher, max_cost)? {
            ret.push(cat);
        }
    }
    debug!("{} CAT spends out of {} spends", ret.len(), spends.len());
    Ok(ret)
}

pub fn run_block_with_matcher(
    block: &BlockRecord,
    archive: &impl GeneratorArchive,
    constants: &ConsensusConstants,
    matcher: &CatMatcher,
) -> Result<Vec<CatSpend>> {
    // blocks without a generator don't need their references
    if block.generator_and_cost().is_none() {
        return Ok(vec![]);
    }
    let block_refs = resolve_block_refs(block, archive)?;
    run_block_with_refs(block, &block_refs, constants, matcher)
}

/// Returns all spends of CAT coins in `block`. Blocks referenced by the
/// block's generator are looked up in `archive`.
pub fn run_block(
    block: &BlockRecord,
    archive: &impl GeneratorArchive,
    constants: &ConsensusConstants,
) -> Result<Vec<CatSpend>> {
    run_block_with_matcher(block, archive, constants, &CatMatcher::default())
}

/// Runs the block in the JSON file at `path`. Referenced blocks are loaded
/// from the same directory.
pub fn run_json_block(
    path: impl AsRef<Path>,
    constants: &ConsensusConstants,
) -> Result<Vec<CatSpend>> {
    let path = path.as_ref();
    let block = BlockRecord::from_json_file(path)?;
    let archive = JsonBlockArchive::new(path.parent().unwrap_or(Path::new(".")));
    run_block(&block, &archive, constants)
}
