use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Milestone;

/// Database row for the orders table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct OrderRecord {
    pub id: Uuid,
    pub supplier: String,
    pub webshop: Option<String>,
    pub order_number: Option<String>,
    pub invoice_number: Option<String>,
    pub description: Option<String>,

    pub total_amount_excl_vat: Option<Decimal>,
    pub total_vat: Option<Decimal>,
    pub total_import_duties: Option<Decimal>,
    pub total_clearance_costs: Option<Decimal>,
    pub vat_clearance_costs: Option<Decimal>,
    pub shipping_costs: Option<Decimal>,

    pub is_return: bool,

    pub date_quote_requested: Option<NaiveDate>,
    pub date_quote_received: Option<NaiveDate>,
    pub date_order_placed: Option<NaiveDate>,
    pub date_payment_completed: Option<NaiveDate>,
    pub date_invoice_received: Option<NaiveDate>,
    pub date_shipped: Option<NaiveDate>,
    pub date_received: Option<NaiveDate>,
    pub date_quality_control: Option<NaiveDate>,
    pub date_booked_accounting: Option<NaiveDate>,
    pub date_import_invoice_received: Option<NaiveDate>,

    pub date_is_returned: Option<NaiveDate>,
    pub date_credit_invoice_received: Option<NaiveDate>,
    pub date_refunded: Option<NaiveDate>,
    pub date_return_processed_admin: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn milestone_date(&self, milestone: Milestone) -> Option<NaiveDate> {
        match milestone {
            Milestone::QuoteRequested => self.date_quote_requested,
            Milestone::QuoteReceived => self.date_quote_received,
            Milestone::OrderPlaced => self.date_order_placed,
            Milestone::PaymentCompleted => self.date_payment_completed,
            Milestone::InvoiceReceived => self.date_invoice_received,
            Milestone::Shipped => self.date_shipped,
            Milestone::Received => self.date_received,
            Milestone::QualityControl => self.date_quality_control,
            Milestone::BookedAccounting => self.date_booked_accounting,
            Milestone::ImportInvoiceReceived => self.date_import_invoice_received,
            Milestone::IsReturned => self.date_is_returned,
            Milestone::CreditInvoiceReceived => self.date_credit_invoice_received,
            Milestone::Refunded => self.date_refunded,
            Milestone::ReturnProcessedAdmin => self.date_return_processed_admin,
        }
    }

    /// True when the milestone has a date recorded.
    pub fn has(&self, milestone: Milestone) -> bool {
        self.milestone_date(milestone).is_some()
    }

    pub fn set_milestone(&mut self, milestone: Milestone, date: Option<NaiveDate>) {
        let slot = match milestone {
            Milestone::QuoteRequested => &mut self.date_quote_requested,
            Milestone::QuoteReceived => &mut self.date_quote_received,
            Milestone::OrderPlaced => &mut self.date_order_placed,
            Milestone::PaymentCompleted => &mut self.date_payment_completed,
            Milestone::InvoiceReceived => &mut self.date_invoice_received,
            Milestone::Shipped => &mut self.date_shipped,
            Milestone::Received => &mut self.date_received,
            Milestone::QualityControl => &mut self.date_quality_control,
            Milestone::BookedAccounting => &mut self.date_booked_accounting,
            Milestone::ImportInvoiceReceived => &mut self.date_import_invoice_received,
            Milestone::IsReturned => &mut self.date_is_returned,
            Milestone::CreditInvoiceReceived => &mut self.date_credit_invoice_received,
            Milestone::Refunded => &mut self.date_refunded,
            Milestone::ReturnProcessedAdmin => &mut self.date_return_processed_admin,
        };
        *slot = date;
    }

    /// Builder-style variant of [`set_milestone`](Self::set_milestone).
    pub fn with_milestone(mut self, milestone: Milestone, date: NaiveDate) -> Self {
        self.set_milestone(milestone, Some(date));
        self
    }
}
