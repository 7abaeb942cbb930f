use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::expenses::dto::UpdateExpenseRequest;

/// Transaction direction. Serialized as the `type` field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "expense_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    Income,
    Expense,
}

/// Expense record in the database. Every row belongs to exactly one user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: ExpenseKind,
    pub category: String,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const EXPENSE_COLUMNS: &str =
    "id, user_id, amount, kind, category, note, date, created_at, updated_at";

impl Expense {
    /// Insert a new transaction; `date` defaults to now when omitted.
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        amount: f64,
        kind: ExpenseKind,
        category: &str,
        note: Option<&str>,
        date: Option<OffsetDateTime>,
    ) -> anyhow::Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "INSERT INTO expenses (user_id, amount, kind, category, note, date) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, now())) \
             RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(amount)
        .bind(kind)
        .bind(category)
        .bind(note)
        .bind(date)
        .fetch_one(db)
        .await?;
        Ok(expense)
    }

    pub async fn count_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM expenses WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(count)
    }

    /// One page of the user's transactions, newest date first. The id
    /// tie-break keeps page slices disjoint when dates collide.
    pub async fn list_page(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = $1 \
             ORDER BY date DESC, id LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Merge the supplied fields onto the row; absent fields are preserved.
    /// Returns None when no row with that id belongs to this user.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        fields: &UpdateExpenseRequest,
    ) -> anyhow::Result<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "UPDATE expenses SET \
                amount = COALESCE($3, amount), \
                kind = COALESCE($4, kind), \
                category = COALESCE($5, category), \
                note = COALESCE($6, note), \
                date = COALESCE($7, date), \
                updated_at = now() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(fields.amount)
        .bind(fields.kind)
        .bind(fields.category.as_deref())
        .bind(fields.note.as_deref())
        .bind(fields.date)
        .fetch_optional(db)
        .await?;
        Ok(expense)
    }

    /// Returns false when no row with that id belongs to this user.
    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every transaction owned by the user (account deletion).
    pub async fn delete_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM expenses WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_expense() -> Expense {
        Expense {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: 250.0,
            kind: ExpenseKind::Expense,
            category: "Food".into(),
            note: None,
            date: datetime!(2025-04-15 09:30 UTC),
            created_at: datetime!(2025-04-15 09:30 UTC),
            updated_at: datetime!(2025-04-15 09:30 UTC),
        }
    }

    #[test]
    fn expense_serializes_with_wire_field_names() {
        let json = serde_json::to_value(sample_expense()).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], 250.0);
        assert_eq!(json["date"], "2025-04-15T09:30:00Z");
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("kind").is_none());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn kind_round_trips_through_lowercase_json() {
        assert_eq!(
            serde_json::to_string(&ExpenseKind::Income).unwrap(),
            r#""income""#
        );
        assert_eq!(
            serde_json::from_str::<ExpenseKind>(r#""expense""#).unwrap(),
            ExpenseKind::Expense
        );
    }
}
