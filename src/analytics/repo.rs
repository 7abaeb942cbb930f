use sqlx::PgPool;
use uuid::Uuid;

use crate::analytics::dto::{CategoryTotal, MonthlyTotal, SummaryRow};

pub async fn summary_totals(db: &PgPool, user_id: Uuid) -> anyhow::Result<SummaryRow> {
    let row = sqlx::query_as::<_, SummaryRow>(
        "SELECT \
            COALESCE(SUM(amount) FILTER (WHERE kind = 'income'), 0) AS total_income, \
            COALESCE(SUM(amount) FILTER (WHERE kind = 'expense'), 0) AS total_expense \
         FROM expenses WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn category_totals(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<CategoryTotal>> {
    let rows = sqlx::query_as::<_, CategoryTotal>(
        "SELECT category, SUM(amount) AS total \
         FROM expenses WHERE user_id = $1 \
         GROUP BY category",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn monthly_totals(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<MonthlyTotal>> {
    let rows = sqlx::query_as::<_, MonthlyTotal>(
        "SELECT EXTRACT(MONTH FROM date)::INT AS month, SUM(amount) AS total \
         FROM expenses WHERE user_id = $1 \
         GROUP BY month ORDER BY month",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
