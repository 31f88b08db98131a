use crate::conditions::{CatSpend, Condition, ConditionGroup, Npc};
use crate::error::{Error, Result, atom, proper_list};
use crate::opcodes::ConditionOpcode;
use crate::puzzles::CatMatcher;
use crate::run_generator::RawSpend;
use chia_protocol::{Bytes, Bytes32, Coin};
use clvm_utils::tree_hash;
use clvmr::allocator::{Allocator, NodePtr};
use clvmr::chia_dialect::{ChiaDialect, ClvmFlags};
use clvmr::cost::Cost;
use clvmr::reduction::Reduction;
use clvmr::run_program::run_program;
use indexmap::IndexMap;
use log::{debug, trace};

/// CREATE_COIN to this puzzle hash can't be spent. By convention its memo
/// field carries a note about the transfer.
pub const RETIREMENT_PUZZLE_HASH: [u8; 32] = [0; 32];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedConditions {
    pub conditions: Vec<ConditionGroup>,
    pub memo: String,
}

fn condition_arg(a: &Allocator, n: NodePtr, op: ConditionOpcode) -> Result<Bytes> {
    let buf = atom(a, n).ok_or(Error::InvalidConditionArg(op))?;
    Ok(Bytes::new(buf.as_ref().to_vec()))
}

fn into_parsed(
    groups: IndexMap<ConditionOpcode, Vec<Condition>>,
    memo: String,
) -> ParsedConditions {
    let conditions = groups
        .into_iter()
        .map(|(op, conditions)| {
            trace!("{op}: {} conditions", conditions.len());
            ConditionGroup::new(op, conditions)
        })
        .collect();
    ParsedConditions { conditions, memo }
}

/// Parses the output of a puzzle into conditions grouped by opcode, in the
/// order each opcode first appears.
///
/// Every condition is (opcode arg1 arg2 ...). Only the first two arguments
/// are recorded, except for CREATE_COIN with a memo list:
///
/// (51 puzzle-hash amount (hint memo ...))
///
/// which also records the hint. A CREATE_COIN whose hint is the retirement
/// puzzle hash carries the spend's memo, if it's valid UTF-8. The first such
/// condition ends parsing, the remaining conditions are not included.
pub fn parse_conditions(a: &Allocator, conditions: NodePtr) -> Result<ParsedConditions> {
    let mut groups = IndexMap::<ConditionOpcode, Vec<Condition>>::new();
    let mut memo = String::new();

    let mut iter = conditions;
    while let Some((c, rest)) = a.next(iter) {
        iter = rest;

        let items = proper_list(a, c).ok_or(Error::InvalidCondition)?;
        let op = atom(a, items[0]).ok_or(Error::InvalidCondition)?;
        let op = ConditionOpcode::from_atom(op.as_ref())
            .ok_or_else(|| Error::InvalidConditionOpcode(hex::encode(op.as_ref())))?;

        let mut args = Vec::with_capacity(3);
        for arg in items.iter().skip(1).take(2) {
            args.push(condition_arg(a, *arg, op)?);
        }

        // anything but a non-empty list in the memo position is ignored
        let memos = match op {
            ConditionOpcode::CreateCoin => items.get(3).and_then(|m| proper_list(a, *m)),
            _ => None,
        };

        let Some(memos) = memos else {
            groups.entry(op).or_default().push(Condition::new(op, args));
            continue;
        };

        let hint = atom(a, memos[0]).ok_or(Error::InvalidMemo)?;
        let retired = hint.as_ref() == RETIREMENT_PUZZLE_HASH.as_slice();
        args.push(Bytes::new(hint.as_ref().to_vec()));
        groups.entry(op).or_default().push(Condition::new(op, args));

        if !retired {
            continue;
        }

        if let Some(m) = memos.get(1) {
            let buf = atom(a, *m).ok_or(Error::InvalidMemo)?;
            match std::str::from_utf8(buf.as_ref()) {
                Ok(s) => memo = s.to_string(),
                Err(e) => debug!("ignoring memo that is not valid UTF-8: {e}"),
            }
        }

        // only one memo is kept per spend
        return Ok(into_parsed(groups, memo));
    }

    if a.atom_len(iter) != 0 {
        return Err(Error::InvalidCondition);
    }
    Ok(into_parsed(groups, memo))
}

/// Decodes a spend of a CAT. Returns None if the puzzle is not a CAT. The
/// puzzle is run with its solution to compute the conditions, bounded by
/// `max_cost`.
pub fn decode_spend(
    a: &mut Allocator,
    spend: &RawSpend,
    matcher: &CatMatcher,
    max_cost: Cost,
) -> Result<Option<CatSpend>> {
    let Some(cat_args) = matcher.match_puzzle(a, spend.puzzle) else {
        debug!(
            "skipping non-CAT spend of coin with parent {}",
            spend.parent_coin_info
        );
        return Ok(None);
    };

    let dialect = ChiaDialect::new(ClvmFlags::empty());
    let Reduction(_, conditions) =
        run_program(a, &dialect, spend.puzzle, spend.solution, max_cost)?;
    let parsed = parse_conditions(a, conditions)?;

    let puzzle_hash: Bytes32 = tree_hash(a, spend.puzzle).into();
    let coin = Coin::new(spend.parent_coin_info, puzzle_hash, spend.amount);

    Ok(Some(CatSpend {
        asset_id: hex::encode(cat_args.asset_id),
        memo: parsed.memo,
        npc: Npc {
            coin_name: coin.coin_id(),
            puzzle_hash,
            conditions: parsed.conditions,
        },
    }))
}
