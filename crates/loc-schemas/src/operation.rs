use std::fmt;
use std::str::FromStr;

/// Every function the LOC contract exposes to the invocation layer.
///
/// Names match the ledger function names exactly; they are also the keys of
/// the `authorization` section of the policy config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    RequestLOC,
    IssueLOC,
    AcceptLOC,
    ShipGoods,
    VerifyDocuments,
    ReleasePayment,
    GetLOCStatus,
    GetLOCHistory,
    GetLOC,
    InitLedger,
}

impl Operation {
    /// State-changing operations in lifecycle order.
    pub const ALL_STATE_CHANGING: [Operation; 6] = [
        Operation::RequestLOC,
        Operation::IssueLOC,
        Operation::AcceptLOC,
        Operation::ShipGoods,
        Operation::VerifyDocuments,
        Operation::ReleasePayment,
    ];

    pub const ALL: [Operation; 10] = [
        Operation::RequestLOC,
        Operation::IssueLOC,
        Operation::AcceptLOC,
        Operation::ShipGoods,
        Operation::VerifyDocuments,
        Operation::ReleasePayment,
        Operation::GetLOCStatus,
        Operation::GetLOCHistory,
        Operation::GetLOC,
        Operation::InitLedger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::RequestLOC => "RequestLOC",
            Operation::IssueLOC => "IssueLOC",
            Operation::AcceptLOC => "AcceptLOC",
            Operation::ShipGoods => "ShipGoods",
            Operation::VerifyDocuments => "VerifyDocuments",
            Operation::ReleasePayment => "ReleasePayment",
            Operation::GetLOCStatus => "GetLOCStatus",
            Operation::GetLOCHistory => "GetLOCHistory",
            Operation::GetLOC => "GetLOC",
            Operation::InitLedger => "InitLedger",
        }
    }

    /// `true` for operations that write the record and therefore require
    /// authorization.
    pub fn is_state_changing(&self) -> bool {
        Self::ALL_STATE_CHANGING.contains(self)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|op| op.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown operation '{s}'"))
    }
}
