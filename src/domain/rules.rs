//! Rule-based flagging of suspicious transactions.

use crate::domain::error::AuditError;
use crate::domain::table::Table;

/// Conjunctive predicate: `amount_column > min_amount AND category_column == category`.
#[derive(Debug, Clone, PartialEq)]
pub struct SuspicionRule {
    pub amount_column: String,
    pub category_column: String,
    pub min_amount: f64,
    pub category: String,
}

impl Default for SuspicionRule {
    fn default() -> Self {
        Self {
            amount_column: "Amount".to_string(),
            category_column: "Category".to_string(),
            min_amount: 1000.0,
            category: "Set".to_string(),
        }
    }
}

/// Rows with `Amount > 1000` and `Category == "Set"`.
pub fn identify_suspicious(table: &Table) -> Result<Table, AuditError> {
    identify_suspicious_with(table, &SuspicionRule::default())
}

pub fn identify_suspicious_with(table: &Table, rule: &SuspicionRule) -> Result<Table, AuditError> {
    let amount = table.column_index(&rule.amount_column)?;
    let category = table.column_index(&rule.category_column)?;

    Ok(table.filter(|r| {
        r[amount].as_number().is_some_and(|a| a > rule.min_amount)
            && r[category].as_text() == Some(rule.category.as_str())
    }))
}
