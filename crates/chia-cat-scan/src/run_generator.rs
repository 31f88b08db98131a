use crate::error::{Error, Result};
use chia_consensus::validation_error::first;
use chia_protocol::Bytes32;
use chia_puzzles::CHIALISP_DESERIALISATION;
use clvm_traits::{FromClvm, destructure_list, match_list};
use clvmr::allocator::{Allocator, NodePtr};
use clvmr::chia_dialect::{ChiaDialect, ClvmFlags};
use clvmr::cost::Cost;
use clvmr::reduction::Reduction;
use clvmr::run_program::run_program;
use clvmr::serde::{node_from_bytes, node_from_bytes_backrefs};
use log::debug;

/// One coin spend as output by a block generator:
/// (parent-coin-id puzzle-reveal amount solution)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpend {
    pub parent_coin_info: Bytes32,
    pub puzzle: NodePtr,
    pub amount: u64,
    pub solution: NodePtr,
}

/// Prepares the arguments passed to the generator. They are in the form:
/// (DESERIALIZER_MOD (block1 block2 block3 ...))
pub fn setup_generator_args<GenBuf: AsRef<[u8]>>(
    a: &mut Allocator,
    block_refs: &[GenBuf],
) -> Result<NodePtr> {
    let clvm_deserializer = node_from_bytes(a, &CHIALISP_DESERIALISATION)?;

    // iterate in reverse order since we're building a linked list from
    // the tail
    let mut blocks = a.nil();
    for g in block_refs.iter().rev() {
        let ref_gen = a.new_atom(g.as_ref())?;
        blocks = a.new_pair(ref_gen, blocks)?;
    }

    let args = a.new_pair(blocks, a.nil())?;
    Ok(a.new_pair(clvm_deserializer, args)?)
}

pub fn parse_spend(a: &Allocator, spend: NodePtr) -> Result<RawSpend> {
    let destructure_list!(parent_coin_info, puzzle, amount, solution) =
        <match_list!(Bytes32, NodePtr, u64, NodePtr)>::from_clvm(a, spend)
            .map_err(|_| spend_error(a, spend))?;

    Ok(RawSpend {
        parent_coin_info,
        puzzle,
        amount,
        solution,
    })
}

// picks the error for a spend that failed to parse
fn spend_error(a: &Allocator, spend: NodePtr) -> Error {
    let Ok(destructure_list!(parent, _, amount, _)) =
        <match_list!(NodePtr, NodePtr, NodePtr, NodePtr)>::from_clvm(a, spend)
    else {
        return Error::InvalidSpend;
    };
    if Bytes32::from_clvm(a, parent).is_err() {
        Error::InvalidParentId
    } else if u64::from_clvm(a, amount).is_err() {
        Error::InvalidCoinAmount
    } else {
        Error::InvalidSpend
    }
}

/// Runs the block generator `program` with the referenced generators passed
/// in as arguments, and returns the spends it outputs, in order.
///
/// The generator is expected to return a list whose first element is the
/// list of spends. The puzzles are not run here.
pub fn run_generator<GenBuf: AsRef<[u8]>>(
    a: &mut Allocator,
    program: &[u8],
    block_refs: &[GenBuf],
    max_cost: Cost,
) -> Result<Vec<RawSpend>> {
    let program = node_from_bytes_backrefs(a, program)?;
    let args = setup_generator_args(a, block_refs)?;

    let dialect = ChiaDialect::new(ClvmFlags::empty());
    let Reduction(cost, output) = run_program(a, &dialect, program, args, max_cost)?;
    debug!(
        "generator with {} block references ran at cost {cost}",
        block_refs.len()
    );

    let mut iter = first(a, output).map_err(|_| Error::InvalidGeneratorOutput)?;
    let mut spends = Vec::new();
    while let Some((spend, rest)) = a.next(iter) {
        iter = rest;
        spends.push(parse_spend(a, spend)?);
    }
    if a.atom_len(iter) != 0 {
        return Err(Error::InvalidGeneratorOutput);
    }
    Ok(spends)
}
