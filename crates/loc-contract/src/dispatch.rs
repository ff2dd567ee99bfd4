//! Function-name routing, as the hosting platform delivers invocations:
//! a function name plus positional string arguments, answered with bytes.
//!
//! | Function | Args | Response |
//! |---|---|---|
//! | `RequestLOC` | id, buyer, seller, issuingBank, advisingBank, amount, currency, expiryDate, goodsDescription | empty |
//! | `IssueLOC` … `ReleasePayment` | id | empty |
//! | `GetLOCStatus` | id | status name (UTF-8) |
//! | `GetLOCHistory` | id | JSON array of audit entries |
//! | `GetLOC` | id | encoded record |
//! | `InitLedger` | – | empty |

use loc_ledger::TransactionContext;
use loc_schemas::{encode_record, LocError, LocTerms, Operation};

use crate::LocContract;

const REQUEST_LOC_ARGS: usize = 9;

pub fn invoke<C: TransactionContext>(
    contract: &LocContract,
    ctx: &mut C,
    function: &str,
    args: &[&str],
) -> Result<Vec<u8>, LocError> {
    let op: Operation = function
        .parse()
        .map_err(|reason| LocError::InvalidArgument { reason })?;

    match op {
        Operation::InitLedger => {
            expect_arity(op, args, 0)?;
            contract.init_ledger(ctx)?;
            Ok(Vec::new())
        }
        Operation::RequestLOC => {
            expect_arity(op, args, REQUEST_LOC_ARGS)?;
            let terms = LocTerms {
                buyer: args[1].to_string(),
                seller: args[2].to_string(),
                issuing_bank: args[3].to_string(),
                advising_bank: args[4].to_string(),
                amount: args[5].to_string(),
                currency: args[6].to_string(),
                expiry_date: args[7].to_string(),
                goods_description: args[8].to_string(),
            };
            contract.request_loc(ctx, args[0], terms)?;
            Ok(Vec::new())
        }
        Operation::IssueLOC
        | Operation::AcceptLOC
        | Operation::ShipGoods
        | Operation::VerifyDocuments
        | Operation::ReleasePayment => {
            expect_arity(op, args, 1)?;
            contract.advance(ctx, op, args[0])?;
            Ok(Vec::new())
        }
        Operation::GetLOCStatus => {
            expect_arity(op, args, 1)?;
            let status = contract.get_loc_status(ctx, args[0])?;
            Ok(status.as_str().as_bytes().to_vec())
        }
        Operation::GetLOCHistory => {
            expect_arity(op, args, 1)?;
            let history = contract.get_loc_history(ctx, args[0])?;
            serde_json::to_vec(&history).map_err(|e| LocError::SerializationError {
                reason: format!("encode history: {e}"),
            })
        }
        Operation::GetLOC => {
            expect_arity(op, args, 1)?;
            encode_record(&contract.get_loc(ctx, args[0])?)
        }
    }
}

fn expect_arity(op: Operation, args: &[&str], n: usize) -> Result<(), LocError> {
    if args.len() == n {
        Ok(())
    } else {
        Err(LocError::InvalidArgument {
            reason: format!("{op} expects {n} argument(s), got {}", args.len()),
        })
    }
}
