//! Wallet-side chain scanning: balance and activity for one account.

use serde::{Deserialize, Serialize};

use crate::block::{Amount, Block};

/// One movement of funds seen from the account's side: the amount and the
/// other party (recipient for debits, sender for credits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub amount: Amount,
    pub counterparty: String,
}

/// Everything the wallet shows for an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountActivity {
    pub balance: f64,
    pub debits: Vec<ActivityEntry>,
    pub credits: Vec<ActivityEntry>,
}

/// Scan every transfer in every block, in chain-then-in-block order.
///
/// Balance is received minus sent. A self-transfer appears in both lists and
/// nets out to zero.
pub fn account_activity(chain: &[Block], user_id: &str) -> AccountActivity {
    let mut balance = 0.0;
    let mut debits = Vec::new();
    let mut credits = Vec::new();

    for block in chain {
        for transfer in &block.transactions {
            let amount = transfer.amount.as_f64().unwrap_or(0.0);
            if transfer.sender == user_id {
                balance -= amount;
                debits.push(ActivityEntry {
                    amount: transfer.amount.clone(),
                    counterparty: transfer.recipient.clone(),
                });
            }
            if transfer.recipient == user_id {
                balance += amount;
                credits.push(ActivityEntry {
                    amount: transfer.amount.clone(),
                    counterparty: transfer.sender.clone(),
                });
            }
        }
    }

    AccountActivity {
        balance,
        debits,
        credits,
    }
}
