use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{FieldValue, OrderChanges, OrderRecord};

/// Columns the list endpoint may sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Supplier,
    OrderNumber,
    DateOrderPlaced,
}

impl SortField {
    fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Supplier => "supplier",
            SortField::OrderNumber => "order_number",
            SortField::DateOrderPlaced => "date_order_placed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Storage-level list filters. Derived-status filtering happens after fetch.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub search: Option<String>,
    pub supplier: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

/// Insert a new order from validated changes.
pub async fn insert_order(pool: &PgPool, changes: &OrderChanges) -> anyhow::Result<OrderRecord> {
    anyhow::ensure!(!changes.is_empty(), "cannot insert an order without fields");

    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO orders (");
    for (i, change) in changes.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(change.column);
    }
    qb.push(") VALUES (");
    for (i, change) in changes.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(&mut qb, &change.value);
    }
    qb.push(") RETURNING *");

    let order = qb.build_query_as::<OrderRecord>().fetch_one(pool).await?;

    Ok(order)
}

/// Apply changes to an existing order. Returns `None` if no row matched.
pub async fn update_order(
    pool: &PgPool,
    id: Uuid,
    changes: &OrderChanges,
) -> anyhow::Result<Option<OrderRecord>> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE orders SET ");
    for change in changes.iter() {
        qb.push(change.column).push(" = ");
        push_value(&mut qb, &change.value);
        qb.push(", ");
    }
    qb.push("updated_at = NOW() WHERE id = ")
        .push_bind(id)
        .push(" RETURNING *");

    let order = qb
        .build_query_as::<OrderRecord>()
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

pub async fn get_order(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<OrderRecord>> {
    let order = sqlx::query_as::<_, OrderRecord>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

/// List orders matching free-text search and supplier filters.
pub async fn list_orders(pool: &PgPool, query: &OrderQuery) -> anyhow::Result<Vec<OrderRecord>> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM orders WHERE TRUE");

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (supplier ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR order_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR webshop ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(supplier) = query.supplier.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND supplier ILIKE ")
            .push_bind(format!("%{}%", supplier.trim()));
    }

    // Both fragments come from closed enums, never from request text.
    qb.push(format!(
        " ORDER BY {} {}, id",
        query.sort_by.column(),
        query.sort_order.as_sql()
    ));

    let orders = qb.build_query_as::<OrderRecord>().fetch_all(pool).await?;

    Ok(orders)
}

/// Delete an order. Returns false if no row matched.
pub async fn delete_order(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Text(v) => qb.push_bind(v.clone()),
        FieldValue::Amount(v) => qb.push_bind(*v),
        FieldValue::Date(v) => qb.push_bind(*v),
        FieldValue::Flag(v) => qb.push_bind(*v),
    };
}
