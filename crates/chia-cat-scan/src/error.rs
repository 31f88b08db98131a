use crate::opcodes::ConditionOpcode;
use clvmr::allocator::{Allocator, Atom, NodePtr, SExp};
use clvmr::error::EvalErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("generator output is not a list of spends")]
    InvalidGeneratorOutput,

    #[error("invalid spend, expected (parent-coin-id puzzle-reveal amount solution)")]
    InvalidSpend,

    #[error("invalid parent coin id")]
    InvalidParentId,

    #[error("invalid coin amount")]
    InvalidCoinAmount,

    #[error("invalid condition")]
    InvalidCondition,

    #[error("invalid condition opcode {0}")]
    InvalidConditionOpcode(String),

    #[error("invalid argument for {0} condition")]
    InvalidConditionArg(ConditionOpcode),

    #[error("invalid memo in CREATE_COIN condition")]
    InvalidMemo,

    #[error("cost exceeded")]
    CostExceeded,

    #[error("clvm error {0:?}")]
    Eval(EvalErr),

    #[error("block {0} not found in archive")]
    MissingBlock(u32),

    #[error("block {0} has no transactions generator")]
    MissingGenerator(u32),

    #[error("archive error: {0}")]
    Archive(Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("hex error: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl From<EvalErr> for Error {
    fn from(v: EvalErr) -> Self {
        match v {
            EvalErr::CostExceeded => Error::CostExceeded,
            _ => Error::Eval(v),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// helpers for destructuring interpreter output. They return None on a shape
// mismatch and leave the choice of error to the caller

pub fn atom(a: &Allocator, n: NodePtr) -> Option<Atom<'_>> {
    match a.sexp(n) {
        SExp::Atom => Some(a.atom(n)),
        SExp::Pair(..) => None,
    }
}

/// returns the items of a nil-terminated list, or None if `n` is an atom
/// (including nil) or the list is terminated by anything other than nil
pub fn proper_list(a: &Allocator, n: NodePtr) -> Option<Vec<NodePtr>> {
    let mut items = Vec::new();
    let mut iter = n;
    while let Some((item, rest)) = a.next(iter) {
        items.push(item);
        iter = rest;
    }
    if items.is_empty() || a.atom_len(iter) != 0 {
        return None;
    }
    Some(items)
}
