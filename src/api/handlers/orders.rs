use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::order_repo::{self, OrderQuery, SortField, SortOrder};
use crate::errors::AppError;
use crate::form::{self, FormField};
use crate::models::input::double_option;
use crate::models::{FieldChange, Milestone, OrderChanges, OrderInput, OrderRecord};
use crate::status::{derive_status, Severity, StageFilter};
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct StatusView {
    pub label: String,
    pub severity: Severity,
}

/// An order as returned by the API: stored fields plus derived status.
#[derive(Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: OrderRecord,
    pub status: StatusView,
    pub latest_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_fields: Option<Vec<FormField>>,
}

impl OrderView {
    pub fn summary(order: OrderRecord) -> Self {
        let status = derive_status(&order);
        Self {
            order,
            status: StatusView {
                label: status.label,
                severity: status.severity,
            },
            latest_date: status.latest_date,
            visible_fields: None,
        }
    }

    pub fn detail(order: OrderRecord) -> Self {
        let visible = form::visible_fields(&order);
        Self {
            visible_fields: Some(visible),
            ..Self::summary(order)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub supplier: Option<String>,
    /// Derived stage slug, e.g. `ordered_unpaid` or `return_pending`.
    pub status: Option<String>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Default, Deserialize)]
pub struct MilestoneRequest {
    /// Absent: toggle. `null`: clear. A date: set to that date.
    #[serde(default, deserialize_with = "double_option")]
    pub date: Option<Option<NaiveDate>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/orders — list orders with derived status
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<OrderView>>>, AppError> {
    let stage = match params.status.as_deref().filter(|s| !s.is_empty()) {
        Some(slug) => Some(
            StageFilter::from_slug(slug)
                .ok_or_else(|| AppError::BadRequest(format!("unknown status filter '{slug}'")))?,
        ),
        None => None,
    };

    let query = OrderQuery {
        search: params.search,
        supplier: params.supplier,
        sort_by: params.sort_by,
        sort_order: params.sort_order,
    };
    let orders = order_repo::list_orders(&state.db, &query).await?;

    let views: Vec<OrderView> = orders
        .into_iter()
        .filter(|order| stage.map_or(true, |s| s.matches(order)))
        .map(OrderView::summary)
        .collect();

    Ok(Json(ApiResponse::ok(views)))
}

/// GET /api/orders/{id} — order detail with visible form fields
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    let order = order_repo::get_order(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".into()))?;

    Ok(Json(ApiResponse::ok(OrderView::detail(order))))
}

/// POST /api/orders — create an order from a raw client payload
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<OrderInput>,
) -> Result<(StatusCode, Json<ApiResponse<OrderView>>), AppError> {
    let changes = body
        .into_new_order(&state.config.locale)
        .map_err(AppError::Validation)?;

    let order = order_repo::insert_order(&state.db, &changes).await?;
    counter!("orders_created_total").increment(1);
    tracing::info!(order_id = %order.id, supplier = %order.supplier, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(OrderView::detail(order))),
    ))
}

/// PUT /api/orders/{id} — partial update; absent fields are left untouched
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<OrderInput>,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    let changes = body
        .into_changes(&state.config.locale)
        .map_err(AppError::Validation)?;
    if changes.is_empty() {
        return Err(AppError::BadRequest("no valid fields to update".into()));
    }

    let order = order_repo::update_order(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".into()))?;
    counter!("orders_updated_total").increment(1);
    tracing::info!(order_id = %id, fields = changes.len(), "Order updated");

    Ok(Json(ApiResponse::ok(OrderView::detail(order))))
}

/// POST /api/orders/{id}/milestones/{milestone} — set, clear or toggle one
/// milestone date
pub async fn set_milestone(
    State(state): State<AppState>,
    Path((id, milestone)): Path<(Uuid, Milestone)>,
    body: Bytes,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    let requested = parse_milestone_request(&body)?.date;

    let date = match requested {
        Some(explicit) => explicit,
        None => {
            let current = order_repo::get_order(&state.db, id)
                .await?
                .ok_or_else(|| AppError::NotFound("order not found".into()))?;
            form::toggle_milestone(current.milestone_date(milestone), Utc::now().date_naive())
        }
    };

    let changes = OrderChanges::single(FieldChange::milestone(milestone, date));
    let order = order_repo::update_order(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".into()))?;
    counter!("orders_updated_total").increment(1);
    tracing::info!(order_id = %id, %milestone, ?date, "Milestone updated");

    Ok(Json(ApiResponse::ok(OrderView::detail(order))))
}

/// An empty body means "toggle"; anything else must be a valid request.
fn parse_milestone_request(body: &[u8]) -> Result<MilestoneRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MilestoneRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid milestone request: {e}")))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !order_repo::delete_order(&state.db, id).await? {
        return Err(AppError::NotFound("order not found".into()));
    }
    counter!("orders_deleted_total").increment(1);
    tracing::info!(order_id = %id, "Order deleted");

    Ok(Json(ApiResponse::ok(())))
}
