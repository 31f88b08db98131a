use serde::{Serialize, Serializer};
use std::fmt;

/// The closed set of condition opcodes a puzzle may emit. Every opcode is a
/// single byte atom. Anything else is rejected while parsing conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ConditionOpcode {
    // no-op condition
    Remark = 1,

    // AGG_SIG is ascii "1"
    AggSigParent = 43,
    AggSigPuzzle = 44,
    AggSigAmount = 45,
    AggSigPuzzleAmount = 46,
    AggSigParentAmount = 47,
    AggSigParentPuzzle = 48,
    AggSigUnsafe = 49,
    AggSigMe = 50,

    // the conditions below reserve coin amounts and have to be accounted for
    // in output totals
    CreateCoin = 51,
    ReserveFee = 52,

    // announcements, for inter-coin communication
    CreateCoinAnnouncement = 60,
    AssertCoinAnnouncement = 61,
    CreatePuzzleAnnouncement = 62,
    AssertPuzzleAnnouncement = 63,
    AssertConcurrentSpend = 64,
    AssertConcurrentPuzzle = 65,

    SendMessage = 66,
    ReceiveMessage = 67,

    // the conditions below let coins inquire about themselves
    AssertMyCoinId = 70,
    AssertMyParentId = 71,
    AssertMyPuzzlehash = 72,
    AssertMyAmount = 73,
    AssertMyBirthSeconds = 74,
    AssertMyBirthHeight = 75,
    AssertEphemeral = 76,

    // wall-clock time
    AssertSecondsRelative = 80,
    AssertSecondsAbsolute = 81,

    // block index
    AssertHeightRelative = 82,
    AssertHeightAbsolute = 83,

    AssertBeforeSecondsRelative = 84,
    AssertBeforeSecondsAbsolute = 85,
    AssertBeforeHeightRelative = 86,
    AssertBeforeHeightAbsolute = 87,

    Softfork = 90,
}

impl ConditionOpcode {
    /// Parses the opcode atom of a condition. Only single byte atoms are
    /// opcodes; leading zeros make it a different (unknown) value.
    pub fn from_atom(buf: &[u8]) -> Option<Self> {
        match buf {
            [b] => Self::try_from(*b).ok(),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Remark => "REMARK",
            Self::AggSigParent => "AGG_SIG_PARENT",
            Self::AggSigPuzzle => "AGG_SIG_PUZZLE",
            Self::AggSigAmount => "AGG_SIG_AMOUNT",
            Self::AggSigPuzzleAmount => "AGG_SIG_PUZZLE_AMOUNT",
            Self::AggSigParentAmount => "AGG_SIG_PARENT_AMOUNT",
            Self::AggSigParentPuzzle => "AGG_SIG_PARENT_PUZZLE",
            Self::AggSigUnsafe => "AGG_SIG_UNSAFE",
            Self::AggSigMe => "AGG_SIG_ME",
            Self::CreateCoin => "CREATE_COIN",
            Self::ReserveFee => "RESERVE_FEE",
            Self::CreateCoinAnnouncement => "CREATE_COIN_ANNOUNCEMENT",
            Self::AssertCoinAnnouncement => "ASSERT_COIN_ANNOUNCEMENT",
            Self::CreatePuzzleAnnouncement => "CREATE_PUZZLE_ANNOUNCEMENT",
            Self::AssertPuzzleAnnouncement => "ASSERT_PUZZLE_ANNOUNCEMENT",
            Self::AssertConcurrentSpend => "ASSERT_CONCURRENT_SPEND",
            Self::AssertConcurrentPuzzle => "ASSERT_CONCURRENT_PUZZLE",
            Self::SendMessage => "SEND_MESSAGE",
            Self::ReceiveMessage => "RECEIVE_MESSAGE",
            Self::AssertMyCoinId => "ASSERT_MY_COIN_ID",
            Self::AssertMyParentId => "ASSERT_MY_PARENT_ID",
            Self::AssertMyPuzzlehash => "ASSERT_MY_PUZZLEHASH",
            Self::AssertMyAmount => "ASSERT_MY_AMOUNT",
            Self::AssertMyBirthSeconds => "ASSERT_MY_BIRTH_SECONDS",
            Self::AssertMyBirthHeight => "ASSERT_MY_BIRTH_HEIGHT",
            Self::AssertEphemeral => "ASSERT_EPHEMERAL",
            Self::AssertSecondsRelative => "ASSERT_SECONDS_RELATIVE",
            Self::AssertSecondsAbsolute => "ASSERT_SECONDS_ABSOLUTE",
            Self::AssertHeightRelative => "ASSERT_HEIGHT_RELATIVE",
            Self::AssertHeightAbsolute => "ASSERT_HEIGHT_ABSOLUTE",
            Self::AssertBeforeSecondsRelative => "ASSERT_BEFORE_SECONDS_RELATIVE",
            Self::AssertBeforeSecondsAbsolute => "ASSERT_BEFORE_SECONDS_ABSOLUTE",
            Self::AssertBeforeHeightRelative => "ASSERT_BEFORE_HEIGHT_RELATIVE",
            Self::AssertBeforeHeightAbsolute => "ASSERT_BEFORE_HEIGHT_ABSOLUTE",
            Self::Softfork => "SOFTFORK",
        }
    }
}

impl TryFrom<u8> for ConditionOpcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Remark,
            43 => Self::AggSigParent,
            44 => Self::AggSigPuzzle,
            45 => Self::AggSigAmount,
            46 => Self::AggSigPuzzleAmount,
            47 => Self::AggSigParentAmount,
            48 => Self::AggSigParentPuzzle,
            49 => Self::AggSigUnsafe,
            50 => Self::AggSigMe,
            51 => Self::CreateCoin,
            52 => Self::ReserveFee,
            60 => Self::CreateCoinAnnouncement,
            61 => Self::AssertCoinAnnouncement,
            62 => Self::CreatePuzzleAnnouncement,
            63 => Self::AssertPuzzleAnnouncement,
            64 => Self::AssertConcurrentSpend,
            65 => Self::AssertConcurrentPuzzle,
            66 => Self::SendMessage,
            67 => Self::ReceiveMessage,
            70 => Self::AssertMyCoinId,
            71 => Self::AssertMyParentId,
            72 => Self::AssertMyPuzzlehash,
            73 => Self::AssertMyAmount,
            74 => Self::AssertMyBirthSeconds,
            75 => Self::AssertMyBirthHeight,
            76 => Self::AssertEphemeral,
            80 => Self::AssertSecondsRelative,
            81 => Self::AssertSecondsAbsolute,
            82 => Self::AssertHeightRelative,
            83 => Self::AssertHeightAbsolute,
            84 => Self::AssertBeforeSecondsRelative,
            85 => Self::AssertBeforeSecondsAbsolute,
            86 => Self::AssertBeforeHeightRelative,
            87 => Self::AssertBeforeHeightAbsolute,
            90 => Self::Softfork,
            _ => return Err(value),
        })
    }
}

impl From<ConditionOpcode> for u8 {
    fn from(op: ConditionOpcode) -> u8 {
        op as u8
    }
}

impl fmt::Display for ConditionOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ConditionOpcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    // leading zeros are not allowed, it makes it a different value
    #[case(&[51, 0], None)]
    #[case(&[0, 51], None)]
    #[case(&[0], None)]
    #[case(&[], None)]
    // unassigned values
    #[case(&[2], None)]
    #[case(&[42], None)]
    #[case(&[88], None)]
    #[case(&[0xff], None)]
    #[case(&[1], Some(ConditionOpcode::Remark))]
    #[case(&[43], Some(ConditionOpcode::AggSigParent))]
    #[case(&[49], Some(ConditionOpcode::AggSigUnsafe))]
    #[case(&[50], Some(ConditionOpcode::AggSigMe))]
    #[case(&[51], Some(ConditionOpcode::CreateCoin))]
    #[case(&[52], Some(ConditionOpcode::ReserveFee))]
    #[case(&[60], Some(ConditionOpcode::CreateCoinAnnouncement))]
    #[case(&[63], Some(ConditionOpcode::AssertPuzzleAnnouncement))]
    #[case(&[67], Some(ConditionOpcode::ReceiveMessage))]
    #[case(&[70], Some(ConditionOpcode::AssertMyCoinId))]
    #[case(&[72], Some(ConditionOpcode::AssertMyPuzzlehash))]
    #[case(&[76], Some(ConditionOpcode::AssertEphemeral))]
    #[case(&[87], Some(ConditionOpcode::AssertBeforeHeightAbsolute))]
    #[case(&[90], Some(ConditionOpcode::Softfork))]
    fn test_from_atom(#[case] buf: &[u8], #[case] expected: Option<ConditionOpcode>) {
        assert_eq!(ConditionOpcode::from_atom(buf), expected);
    }

    #[test]
    fn byte_values_roundtrip() {
        for b in 0..=u8::MAX {
            if let Ok(op) = ConditionOpcode::try_from(b) {
                assert_eq!(u8::from(op), b);
            }
        }
    }

    #[rstest]
    #[case(ConditionOpcode::CreateCoin, "CREATE_COIN")]
    #[case(ConditionOpcode::AssertMyPuzzlehash, "ASSERT_MY_PUZZLEHASH")]
    #[case(ConditionOpcode::AggSigMe, "AGG_SIG_ME")]
    fn test_name(#[case] op: ConditionOpcode, #[case] name: &str) {
        assert_eq!(op.name(), name);
        assert_eq!(op.to_string(), name);
        assert_eq!(
            serde_json::to_value(op).unwrap(),
            serde_json::Value::String(name.to_string())
        );
    }
}
