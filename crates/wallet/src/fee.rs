//! Fee policy.
//!
//! | kind                      | fee                    |
//! |---------------------------|------------------------|
//! | CASH_OUT                  | amount × 1.85%, 2 dp   |
//! | SEND_MONEY, amount > 100  | flat 5                 |
//! | everything else           | 0                      |

use rust_decimal::Decimal;

use ucash_core::round_currency;

use crate::TransactionKind;

/// CASH_OUT fee rate (1.85%).
pub const CASH_OUT_FEE_RATE: Decimal = Decimal::from_parts(185, 0, 0, false, 4);

/// SEND_MONEY amounts strictly above this pay the flat fee.
pub const SEND_MONEY_FEE_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

pub const SEND_MONEY_FLAT_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Fee charged on top of `amount` for a posting of `kind`.
pub fn fee_for(kind: TransactionKind, amount: Decimal) -> Decimal {
    match kind {
        TransactionKind::CashOut => round_currency(amount * CASH_OUT_FEE_RATE),
        TransactionKind::SendMoney if amount > SEND_MONEY_FEE_THRESHOLD => SEND_MONEY_FLAT_FEE,
        _ => Decimal::ZERO,
    }
}
