use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::currency::LocaleFormat;
use crate::models::OrderRecord;
use crate::status::derive_status;

use super::TransferError;

/// One flat CSV line. Field order is the column order of the file.
#[derive(Serialize)]
struct ExportRow<'a> {
    id: String,
    supplier: &'a str,
    webshop: &'a str,
    order_number: &'a str,
    invoice_number: &'a str,
    description: &'a str,
    total_amount_excl_vat: String,
    total_vat: String,
    total_import_duties: String,
    total_clearance_costs: String,
    vat_clearance_costs: String,
    shipping_costs: String,
    is_return: bool,
    date_quote_requested: String,
    date_quote_received: String,
    date_order_placed: String,
    date_payment_completed: String,
    date_invoice_received: String,
    date_shipped: String,
    date_received: String,
    date_quality_control: String,
    date_booked_accounting: String,
    date_import_invoice_received: String,
    date_is_returned: String,
    date_credit_invoice_received: String,
    date_refunded: String,
    date_return_processed_admin: String,
    status: String,
    severity: &'static str,
    latest_date: String,
    created_at: String,
    updated_at: String,
}

fn iso(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

impl<'a> ExportRow<'a> {
    fn new(order: &'a OrderRecord, locale: &LocaleFormat) -> Self {
        let status = derive_status(order);
        Self {
            id: order.id.to_string(),
            supplier: &order.supplier,
            webshop: order.webshop.as_deref().unwrap_or_default(),
            order_number: order.order_number.as_deref().unwrap_or_default(),
            invoice_number: order.invoice_number.as_deref().unwrap_or_default(),
            description: order.description.as_deref().unwrap_or_default(),
            total_amount_excl_vat: locale.format(order.total_amount_excl_vat),
            total_vat: locale.format(order.total_vat),
            total_import_duties: locale.format(order.total_import_duties),
            total_clearance_costs: locale.format(order.total_clearance_costs),
            vat_clearance_costs: locale.format(order.vat_clearance_costs),
            shipping_costs: locale.format(order.shipping_costs),
            is_return: order.is_return,
            date_quote_requested: iso(order.date_quote_requested),
            date_quote_received: iso(order.date_quote_received),
            date_order_placed: iso(order.date_order_placed),
            date_payment_completed: iso(order.date_payment_completed),
            date_invoice_received: iso(order.date_invoice_received),
            date_shipped: iso(order.date_shipped),
            date_received: iso(order.date_received),
            date_quality_control: iso(order.date_quality_control),
            date_booked_accounting: iso(order.date_booked_accounting),
            date_import_invoice_received: iso(order.date_import_invoice_received),
            date_is_returned: iso(order.date_is_returned),
            date_credit_invoice_received: iso(order.date_credit_invoice_received),
            date_refunded: iso(order.date_refunded),
            date_return_processed_admin: iso(order.date_return_processed_admin),
            status: status.label,
            severity: status.severity.as_str(),
            latest_date: iso(status.latest_date),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

/// Write `orders` as CSV with a header row, appending derived status columns.
pub fn write_orders<W: Write>(
    orders: &[OrderRecord],
    locale: &LocaleFormat,
    out: W,
) -> Result<(), TransferError> {
    let mut writer = csv::Writer::from_writer(out);
    for order in orders {
        writer.serialize(ExportRow::new(order, locale))?;
    }
    writer.flush()?;
    Ok(())
}
