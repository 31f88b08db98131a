#![doc = include_str!("../README.md")]

pub mod archive;
pub mod conditions;
pub mod decode_spend;
pub mod error;
pub mod opcodes;
pub mod puzzles;
pub mod run_block;
pub mod run_generator;

#[cfg(test)]
mod test_utils;

pub use archive::{GeneratorArchive, JsonBlockArchive};
pub use conditions::{CatSpend, Condition, ConditionGroup, Npc};
pub use decode_spend::decode_spend;
pub use error::{Error, Result};
pub use opcodes::ConditionOpcode;
pub use puzzles::CatMatcher;
pub use run_block::{BlockRecord, run_block, run_block_with_refs, run_json_block};
pub use run_generator::{RawSpend, run_generator};
