use crate::opcodes::ConditionOpcode;
use chia_protocol::{Bytes, Bytes32};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A single condition output by a puzzle. The arguments are the raw atoms
/// from the puzzle output, no opcode specific decoding is performed on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub opcode: ConditionOpcode,
    pub args: Vec<Bytes>,
}

impl Condition {
    pub fn new(opcode: ConditionOpcode, args: Vec<Bytes>) -> Self {
        Self { opcode, args }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let args: Vec<String> = self.args.iter().map(hex::encode).collect();
        let mut s = serializer.serialize_struct("Condition", 2)?;
        s.serialize_field("condition_opcode", &self.opcode)?;
        s.serialize_field("arguments", &args)?;
        s.end()
    }
}

/// All conditions of one opcode, in the order the puzzle output them
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionGroup {
    opcode: ConditionOpcode,
    conditions: Vec<Condition>,
}

impl ConditionGroup {
    /// panics if any of the conditions has a different opcode than the group.
    /// That can only happen from a bug in the caller, not from puzzle output.
    pub fn new(opcode: ConditionOpcode, conditions: Vec<Condition>) -> Self {
        assert!(
            conditions.iter().all(|c| c.opcode == opcode),
            "condition group for {opcode} contains a condition with another opcode"
        );
        Self { opcode, conditions }
    }

    pub fn opcode(&self) -> ConditionOpcode {
        self.opcode
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl Serialize for ConditionGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ConditionGroup", 2)?;
        s.serialize_field("condition_type", &self.opcode)?;
        s.serialize_field("conditions", &self.conditions)?;
        s.end()
    }
}

/// "normalized puzzle coin", the conditions of a single coin spend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Npc {
    pub coin_name: Bytes32,
    pub puzzle_hash: Bytes32,
    pub conditions: Vec<ConditionGroup>,
}

impl Serialize for Npc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Npc", 3)?;
        s.serialize_field("coin_name", &hex::encode(self.coin_name))?;
        s.serialize_field("conditions", &self.conditions)?;
        s.serialize_field("puzzle_hash", &hex::encode(self.puzzle_hash))?;
        s.end()
    }
}

/// A spend of a CAT coin found in a block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CatSpend {
    /// hex encoded asset id (TAIL hash), without 0x prefix
    pub asset_id: String,
    /// the memo attached to a CREATE_COIN to the retirement puzzle hash, or
    /// empty
    pub memo: String,
    pub npc: Npc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use serde_json::json;

    #[test]
    #[should_panic(expected = "contains a condition with another opcode")]
    fn group_rejects_mixed_opcodes() {
        ConditionGroup::new(
            ConditionOpcode::CreateCoin,
            vec![Condition::new(ConditionOpcode::ReserveFee, vec![])],
        );
    }

    #[test]
    fn cat_spend_json() {
        let cat = CatSpend {
            asset_id: "aa".repeat(32),
            memo: "ref-1".to_string(),
            npc: Npc {
                coin_name: Bytes32::new([0x11; 32]),
                puzzle_hash: Bytes32::new([0x22; 32]),
                conditions: vec![
                    ConditionGroup::new(
                        ConditionOpcode::CreateCoin,
                        vec![Condition::new(
                            ConditionOpcode::CreateCoin,
                            vec![
                                Bytes::new(vec![0xbb; 32]),
                                Bytes::new(hex!("64").to_vec()),
                                Bytes::new(vec![0; 32]),
                            ],
                        )],
                    ),
                    ConditionGroup::new(
                        ConditionOpcode::AssertMyAmount,
                        vec![Condition::new(
                            ConditionOpcode::AssertMyAmount,
                            vec![Bytes::new(hex!("64").to_vec())],
                        )],
                    ),
                ],
            },
        };

        assert_eq!(
            serde_json::to_value(&cat).unwrap(),
            json!({
                "asset_id": "aa".repeat(32),
                "memo": "ref-1",
                "npc": {
                    "coin_name": "11".repeat(32),
                    "conditions": [
                        {
                            "condition_type": "CREATE_COIN",
                            "conditions": [{
                                "condition_opcode": "CREATE_COIN",
                                "arguments": ["bb".repeat(32), "64", "00".repeat(32)],
                            }],
                        },
                        {
                            "condition_type": "ASSERT_MY_AMOUNT",
                            "conditions": [{
                                "condition_opcode": "ASSERT_MY_AMOUNT",
                                "arguments": ["64"],
                            }],
                        },
                    ],
                    "puzzle_hash": "22".repeat(32),
                },
            })
        );
    }
}
