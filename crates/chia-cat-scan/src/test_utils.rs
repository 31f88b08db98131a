use crate::puzzles::CatMatcher;
use chia_protocol::Bytes32;
use chia_puzzle_types::cat::CatArgs;
use clvm_traits::ToClvm;
use clvm_utils::{CurriedProgram, tree_hash_atom};
use clvmr::Allocator;
use clvmr::allocator::NodePtr;
use clvmr::serde::node_to_bytes;

pub const TEST_ASSET_ID: [u8; 32] = [0xaa; 32];
pub const TEST_PARENT: [u8; 32] = [0x11; 32];
pub const TEST_PUZZLE_HASH: [u8; 32] = [0xbb; 32];
pub const MAX_COST: u64 = 11_000_000_000;

// the test mod is the environment path 15, i.e. (r (r (r 1))). Curried with
// (mod-hash asset-id inner-puzzle) it returns its solution, so the solution
// is the list of conditions the spend outputs
const PASS_THROUGH_MOD: u8 = 15;

/// returns a puzzle shaped like a CAT, along with a matcher that recognizes
/// it
pub fn test_cat_puzzle(a: &mut Allocator, asset_id: [u8; 32]) -> (NodePtr, CatMatcher) {
    let program = a.new_atom(&[PASS_THROUGH_MOD]).unwrap();
    let matcher = CatMatcher::new(tree_hash_atom(&[PASS_THROUGH_MOD]));
    let puzzle = CurriedProgram {
        program,
        args: CatArgs {
            mod_hash: matcher.mod_hash().into(),
            asset_id: Bytes32::new(asset_id),
            inner_puzzle: NodePtr::NIL,
        },
    }
    .to_clvm(a)
    .unwrap();
    (puzzle, matcher)
}

pub fn atom(a: &mut Allocator, buf: &[u8]) -> NodePtr {
    a.new_atom(buf).unwrap()
}

pub fn list(a: &mut Allocator, items: &[NodePtr]) -> NodePtr {
    let mut ret = NodePtr::NIL;
    for item in items.iter().rev() {
        ret = a.new_pair(*item, ret).unwrap();
    }
    ret
}

pub fn amount(a: &mut Allocator, amount: u64) -> NodePtr {
    amount.to_clvm(a).unwrap()
}

/// (51 puzzle-hash amount . memos), memos being (memo-list) if present
pub fn create_coin(
    a: &mut Allocator,
    puzzle_hash: &[u8],
    value: u64,
    memos: Option<NodePtr>,
) -> NodePtr {
    let op = atom(a, &[51]);
    let ph = atom(a, puzzle_hash);
    let value = amount(a, value);
    match memos {
        Some(memos) => list(a, &[op, ph, value, memos]),
        None => list(a, &[op, ph, value]),
    }
}

/// the memo list (<retirement puzzle hash> memo)
pub fn retirement_memos(a: &mut Allocator, memo: &[u8]) -> NodePtr {
    let hint = atom(a, &[0; 32]);
    let memo = atom(a, memo);
    list(a, &[hint, memo])
}

/// (parent-coin-id puzzle-reveal amount solution)
pub fn spend(
    a: &mut Allocator,
    parent: &[u8],
    puzzle: NodePtr,
    value: u64,
    solution: NodePtr,
) -> NodePtr {
    let parent = atom(a, parent);
    let value = amount(a, value);
    list(a, &[parent, puzzle, value, solution])
}

/// a serialized generator that ignores its arguments and returns
/// ((spend1 spend2 ...))
pub fn quoted_generator(a: &mut Allocator, spends: &[NodePtr]) -> Vec<u8> {
    let spends = list(a, spends);
    let output = list(a, &[spends]);
    let quote = atom(a, &[1]);
    let program = a.new_pair(quote, output).unwrap();
    node_to_bytes(a, program).unwrap()
}
