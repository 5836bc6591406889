//! Context block handed to the model alongside the user's question.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// At most this many recent transactions are included in the prompt.
pub const MAX_CONTEXT_TRANSACTIONS: usize = 10;

/// One transaction as the advisor sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub kind: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

/// Input snapshot for one advice call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub query: String,
    pub balance: Decimal,
    /// Newest first; only the first [`MAX_CONTEXT_TRANSACTIONS`] are used.
    pub recent: Vec<TransactionLine>,
}

impl AdviceRequest {
    pub fn new(query: impl Into<String>, balance: Decimal, recent: Vec<TransactionLine>) -> Self {
        Self {
            query: query.into(),
            balance,
            recent,
        }
    }

    pub fn system_prompt(&self) -> String {
        let recent = self
            .recent
            .iter()
            .take(MAX_CONTEXT_TRANSACTIONS)
            .map(|t| {
                format!(
                    "- {} of ${} on {} ({})",
                    t.kind,
                    t.amount,
                    t.timestamp.format("%Y-%m-%d"),
                    t.status
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are UcaSh AI, a helpful and friendly financial assistant for the UcaSh wallet app.\n\
             \n\
             User Context:\n\
             - Current Balance: ${}\n\
             - Recent Transactions:\n\
             {}\n\
             \n\
             Your goal is to answer the user's question, provide spending insights, or help them draft notes for payments.\n\
             Keep answers concise (under 100 words), professional, yet conversational.\n\
             If the user asks to perform an action (like \"send money\"), guide them to use the dashboard buttons.",
            self.balance, recent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line(kind: &str, amount: i64) -> TransactionLine {
        TransactionLine {
            kind: kind.to_string(),
            amount: Decimal::from(amount),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            status: "SUCCESS".to_string(),
        }
    }

    #[test]
    fn prompt_lists_balance_and_formatted_lines() {
        let request = AdviceRequest::new(
            "How much did I spend?",
            Decimal::new(49815, 2),
            vec![line("CASH_OUT", 100), line("SEND_MONEY", 20)],
        );
        let prompt = request.system_prompt();

        assert!(prompt.contains("- Current Balance: $498.15"));
        assert!(prompt.contains("- CASH_OUT of $100 on 2026-03-14 (SUCCESS)"));
        assert!(prompt.contains("- SEND_MONEY of $20 on 2026-03-14 (SUCCESS)"));
        assert!(prompt.contains("under 100 words"));
    }

    #[test]
    fn prompt_keeps_only_the_ten_newest() {
        let recent = (1..=15).map(|i| line("BILL_PAYMENT", i)).collect();
        let prompt = AdviceRequest::new("q", Decimal::ZERO, recent).system_prompt();

        assert_eq!(prompt.matches("BILL_PAYMENT of").count(), MAX_CONTEXT_TRANSACTIONS);
        assert!(prompt.contains("BILL_PAYMENT of $10 "));
        assert!(!prompt.contains("BILL_PAYMENT of $11 "));
    }
}
