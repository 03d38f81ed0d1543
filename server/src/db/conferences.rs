//! Database operations for the conferences table.

use chrono::NaiveDate;
use sqlx::Row;
use summit_engine::{
    filter::{FilterClause, FilterValue, Operator, QueryPlan},
    Conference, Key,
};

use crate::error::{ApiError, Result};

/// A stored conference row from the database.
#[derive(Debug)]
pub struct ConferenceRow {
    pub id: i64,
    pub organizer_user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub topics: serde_json::Value,
    pub city: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub month: i32,
    pub max_attendees: i32,
    pub seats_available: i32,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ConferenceRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(ConferenceRow {
            id: row.try_get("id")?,
            organizer_user_id: row.try_get("organizer_user_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            topics: row.try_get("topics")?,
            city: row.try_get("city")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            month: row.try_get("month")?,
            max_attendees: row.try_get("max_attendees")?,
            seats_available: row.try_get("seats_available")?,
        })
    }
}

impl ConferenceRow {
    /// Convert database row to an engine Conference.
    pub fn to_conference(&self) -> Result<Conference> {
        let topics: Vec<String> = serde_json::from_value(self.topics.clone())
            .map_err(|e| ApiError::Internal(format!("corrupt topics: {e}")))?;

        Ok(Conference {
            key: Key::conference(&self.organizer_user_id, self.id),
            name: self.name.clone(),
            description: self.description.clone(),
            organizer_user_id: self.organizer_user_id.clone(),
            topics,
            city: self.city.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            month: self.month,
            max_attendees: self.max_attendees,
            seats_available: self.seats_available,
        })
    }
}

const SELECT_COLUMNS: &str = "id, organizer_user_id, name, description, topics, city, \
     start_date, end_date, month, max_attendees, seats_available";

/// Allocate a fresh conference id.
pub async fn allocate_id(executor: impl sqlx::PgExecutor<'_>) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as("SELECT nextval('conferences_id_seq')")
        .fetch_one(executor)
        .await?;
    Ok(id)
}

fn numeric_id(conference: &Conference) -> Result<i64> {
    conference
        .key
        .id
        .as_number()
        .ok_or_else(|| ApiError::Internal("conference key is not numeric".into()))
}

/// Insert a conference under a previously allocated id.
pub async fn insert(executor: impl sqlx::PgExecutor<'_>, conference: &Conference) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO conferences (
            id, organizer_user_id, name, description, topics, city,
            start_date, end_date, month, max_attendees, seats_available
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(numeric_id(conference)?)
    .bind(&conference.organizer_user_id)
    .bind(&conference.name)
    .bind(&conference.description)
    .bind(serde_json::json!(conference.topics))
    .bind(&conference.city)
    .bind(conference.start_date)
    .bind(conference.end_date)
    .bind(conference.month)
    .bind(conference.max_attendees)
    .bind(conference.seats_available)
    .execute(executor)
    .await?;
    Ok(())
}

/// Write back a conference's mutable fields.
pub async fn update(executor: impl sqlx::PgExecutor<'_>, conference: &Conference) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE conferences SET
            name = $2,
            description = $3,
            topics = $4,
            city = $5,
            start_date = $6,
            end_date = $7,
            month = $8,
            max_attendees = $9,
            seats_available = $10
        WHERE id = $1
        "#,
    )
    .bind(numeric_id(conference)?)
    .bind(&conference.name)
    .bind(&conference.description)
    .bind(serde_json::json!(conference.topics))
    .bind(&conference.city)
    .bind(conference.start_date)
    .bind(conference.end_date)
    .bind(conference.month)
    .bind(conference.max_attendees)
    .bind(conference.seats_available)
    .execute(executor)
    .await?;
    Ok(())
}

/// Write back only the seat counter.
pub async fn update_seats(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
    seats_available: i32,
) -> Result<()> {
    sqlx::query("UPDATE conferences SET seats_available = $2 WHERE id = $1")
        .bind(id)
        .bind(seats_available)
        .execute(executor)
        .await?;
    Ok(())
}

/// Get a conference by id.
pub async fn get(executor: impl sqlx::PgExecutor<'_>, id: i64) -> Result<Option<ConferenceRow>> {
    let row = sqlx::query_as::<_, ConferenceRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM conferences WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Get a conference by id, locking the row for the enclosing transaction.
pub async fn get_for_update(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<Option<ConferenceRow>> {
    let row = sqlx::query_as::<_, ConferenceRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM conferences WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Batch fetch by id, ordered by name.
pub async fn get_many(
    executor: impl sqlx::PgExecutor<'_>,
    ids: &[i64],
) -> Result<Vec<ConferenceRow>> {
    let rows = sqlx::query_as::<_, ConferenceRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM conferences WHERE id = ANY($1) ORDER BY name"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// Conferences organized by the given user (the ancestor query).
pub async fn by_organizer(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
) -> Result<Vec<ConferenceRow>> {
    let rows = sqlx::query_as::<_, ConferenceRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM conferences WHERE organizer_user_id = $1 ORDER BY name"
    ))
    .bind(user_id)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// Other conferences by the same organizer, optionally narrowed by one
/// compiled filter clause.
pub async fn by_organizer_excluding(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    exclude_id: i64,
    clause: Option<&FilterClause>,
) -> Result<Vec<ConferenceRow>> {
    let mut sql = format!(
        "SELECT {SELECT_COLUMNS} FROM conferences WHERE organizer_user_id = $1 AND id <> $2"
    );
    if let Some(clause) = clause {
        sql.push_str(" AND ");
        sql.push_str(&clause_sql(clause, 3)?);
    }
    sql.push_str(" ORDER BY name");

    let mut query = sqlx::query_as::<_, ConferenceRow>(&sql)
        .bind(user_id)
        .bind(exclude_id);
    if let Some(clause) = clause {
        query = bind_value(query, &clause.value);
    }
    Ok(query.fetch_all(executor).await?)
}

/// Execute a compiled query plan.
///
/// Column names in the plan come from the compiler's static whitelist, so
/// interpolating them here cannot inject caller input.
pub async fn execute_plan(
    executor: impl sqlx::PgExecutor<'_>,
    plan: &QueryPlan,
) -> Result<Vec<ConferenceRow>> {
    let mut sql = format!("SELECT {SELECT_COLUMNS} FROM conferences");
    for (i, clause) in plan.clauses.iter().enumerate() {
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        sql.push_str(&clause_sql(clause, i + 1)?);
    }
    if !plan.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&plan.order_by.join(", "));
    }

    let mut query = sqlx::query_as::<_, ConferenceRow>(&sql);
    for clause in &plan.clauses {
        query = bind_value(query, &clause.value);
    }
    Ok(query.fetch_all(executor).await?)
}

/// Names of open conferences with few seats left, for the announcement.
pub async fn almost_sold_out_names(
    executor: impl sqlx::PgExecutor<'_>,
    threshold: i32,
) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM conferences \
         WHERE seats_available > 0 AND seats_available <= $1 ORDER BY name",
    )
    .bind(threshold)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

type PgQueryAs<'q, T> =
    sqlx::query::QueryAs<'q, sqlx::Postgres, T, sqlx::postgres::PgArguments>;

fn bind_value<'q>(
    query: PgQueryAs<'q, ConferenceRow>,
    value: &FilterValue,
) -> PgQueryAs<'q, ConferenceRow> {
    match value {
        FilterValue::Number(n) => query.bind(*n),
        FilterValue::Text(s) => query.bind(s.clone()),
    }
}

fn clause_sql(clause: &FilterClause, placeholder: usize) -> Result<String> {
    // topics is a JSONB array; only membership tests translate.
    if clause.column == "topics" {
        return match clause.operator {
            Operator::Eq => Ok(format!("topics ? ${placeholder}")),
            Operator::Ne => Ok(format!("NOT topics ? ${placeholder}")),
            _ => Err(ApiError::BadRequest(
                "ordering comparisons are not supported on topics".into(),
            )),
        };
    }
    Ok(format!(
        "{} {} ${placeholder}",
        clause.column,
        sql_operator(clause.operator)
    ))
}

fn sql_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Ne => "<>",
        other => other.symbol(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(column: &'static str, operator: Operator, value: FilterValue) -> FilterClause {
        FilterClause {
            column,
            operator,
            value,
        }
    }

    #[test]
    fn clause_sql_for_plain_columns() {
        let c = clause("city", Operator::Eq, FilterValue::Text("London".into()));
        assert_eq!(clause_sql(&c, 1).unwrap(), "city = $1");

        let c = clause("month", Operator::Gt, FilterValue::Number(6));
        assert_eq!(clause_sql(&c, 2).unwrap(), "month > $2");

        let c = clause("max_attendees", Operator::Ne, FilterValue::Number(10));
        assert_eq!(clause_sql(&c, 1).unwrap(), "max_attendees <> $1");
    }

    #[test]
    fn topics_translates_to_membership() {
        let c = clause("topics", Operator::Eq, FilterValue::Text("Rust".into()));
        assert_eq!(clause_sql(&c, 1).unwrap(), "topics ? $1");

        let c = clause("topics", Operator::Ne, FilterValue::Text("Rust".into()));
        assert_eq!(clause_sql(&c, 1).unwrap(), "NOT topics ? $1");
    }

    #[test]
    fn topics_rejects_ordering_comparison() {
        let c = clause("topics", Operator::Gt, FilterValue::Text("Rust".into()));
        assert!(matches!(clause_sql(&c, 1), Err(ApiError::BadRequest(_))));
    }
}
