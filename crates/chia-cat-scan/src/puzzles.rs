use chia_puzzle_types::cat::CatArgs;
use chia_puzzles::CAT_PUZZLE_HASH;
use clvm_traits::FromClvm;
use clvm_utils::{CurriedProgram, TreeHash, tree_hash};
use clvmr::Allocator;
use clvmr::allocator::NodePtr;

/// Recognizes puzzles that are a curried CAT mod. The default matcher
/// recognizes the CAT v2 outer puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatMatcher {
    mod_hash: TreeHash,
}

impl Default for CatMatcher {
    fn default() -> Self {
        Self::new(TreeHash::new(CAT_PUZZLE_HASH))
    }
}

impl CatMatcher {
    pub fn new(mod_hash: TreeHash) -> Self {
        Self { mod_hash }
    }

    pub fn mod_hash(&self) -> TreeHash {
        self.mod_hash
    }

    /// Uncurries `puzzle` and returns its CAT arguments if the uncurried mod
    /// is the one this matcher is looking for. Puzzles that are not curried,
    /// have a different mod, or curry anything other than exactly
    /// (mod-hash asset-id inner-puzzle) don't match.
    pub fn match_puzzle(&self, a: &Allocator, puzzle: NodePtr) -> Option<CatArgs<NodePtr>> {
        let uncurried = CurriedProgram::<NodePtr, CatArgs<NodePtr>>::from_clvm(a, puzzle).ok()?;
        if tree_hash(a, uncurried.program) != self.mod_hash {
            return None;
        }
        Some(uncurried.args)
    }
}
