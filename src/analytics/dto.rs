use serde::Serialize;
use sqlx::FromRow;

/// Raw income/expense sums for one user.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct SummaryRow {
    pub total_income: f64,
    pub total_expense: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

impl From<SummaryRow> for SummaryResponse {
    fn from(row: SummaryRow) -> Self {
        Self {
            total_income: row.total_income,
            total_expense: row.total_expense,
            balance: row.total_income - row.total_expense,
        }
    }
}

/// Sum of amounts per free-text category label. Income and expense rows
/// are summed together, matching the original breakdown contract.
#[derive(Debug, Serialize, FromRow)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Sum of amounts per calendar month (1-12), merged across years.
#[derive(Debug, Serialize, FromRow)]
pub struct MonthlyTotal {
    pub month: i32,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_is_income_minus_expense() {
        let summary = SummaryResponse::from(SummaryRow {
            total_income: 500.0,
            total_expense: 100.0,
        });
        assert_eq!(summary.balance, 400.0);
    }

    #[test]
    fn empty_ledger_sums_to_zero() {
        let summary = SummaryResponse::from(SummaryRow {
            total_income: 0.0,
            total_expense: 0.0,
        });
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expense, 0.0);
        assert_eq!(summary.balance, 0.0);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let json = serde_json::to_value(SummaryResponse::from(SummaryRow {
            total_income: 500.0,
            total_expense: 100.0,
        }))
        .unwrap();
        assert_eq!(json["totalIncome"], 500.0);
        assert_eq!(json["totalExpense"], 100.0);
        assert_eq!(json["balance"], 400.0);
    }

    #[test]
    fn breakdown_rows_serialize_flat() {
        let json = serde_json::to_value(CategoryTotal {
            category: "Food".into(),
            total: 100.0,
        })
        .unwrap();
        assert_eq!(json["category"], "Food");
        assert_eq!(json["total"], 100.0);

        let json = serde_json::to_value(MonthlyTotal {
            month: 4,
            total: 620.5,
        })
        .unwrap();
        assert_eq!(json["month"], 4);
        assert_eq!(json["total"], 620.5);
    }
}
