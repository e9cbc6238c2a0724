use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use metrics::counter;
use serde::Serialize;

use crate::db::order_repo::{self, OrderQuery};
use crate::errors::AppError;
use crate::transfer::{self, TransferError};
use crate::AppState;

use super::ApiResponse;

#[derive(Debug, Serialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub errors: Vec<RowError>,
}

/// GET /api/orders/export/csv
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = order_repo::list_orders(&state.db, &OrderQuery::default()).await?;

    let mut buf = Vec::new();
    transfer::write_orders(&orders, &state.config.locale, &mut buf)
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(count = orders.len(), "Exported orders to CSV");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"orders.csv\""),
        ],
        buf,
    ))
}

/// POST /api/orders/import/csv — append every valid row as a new order.
///
/// Rows are independent: a bad row is reported and skipped, the rest are
/// still inserted.
pub async fn import_csv(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<ImportSummary>>, AppError> {
    let rows = transfer::read_orders(body.as_bytes(), &state.config.locale).map_err(|e| match e {
        TransferError::Empty | TransferError::Csv(_) => AppError::BadRequest(e.to_string()),
        TransferError::Io(_) => AppError::Internal(e.into()),
    })?;

    let mut summary = ImportSummary {
        imported: 0,
        errors: Vec::new(),
    };

    for row in rows {
        let outcome = match row.result {
            Ok(changes) => order_repo::insert_order(&state.db, &changes)
                .await
                .map(|_| ())
                .map_err(|e| {
                    tracing::error!(row = row.row, error = %e, "Failed to insert imported order");
                    "failed to store order".to_string()
                }),
            Err(message) => Err(message),
        };

        match outcome {
            Ok(()) => summary.imported += 1,
            Err(error) => summary.errors.push(RowError { row: row.row, error }),
        }
    }

    counter!("csv_rows_imported_total").increment(summary.imported as u64);
    counter!("csv_rows_failed_total").increment(summary.errors.len() as u64);
    tracing::info!(
        imported = summary.imported,
        failed = summary.errors.len(),
        "CSV import finished"
    );

    Ok(Json(ApiResponse::ok(summary)))
}
