use std::fmt;

use serde::{Deserialize, Serialize};

/// Which workflow a milestone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    Forward,
    Return,
}

/// A procurement or return event whose occurrence is recorded as a date.
///
/// There is no separate "done" flag: a milestone has happened exactly when
/// its date column is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    QuoteRequested,
    QuoteReceived,
    OrderPlaced,
    PaymentCompleted,
    InvoiceReceived,
    Shipped,
    Received,
    QualityControl,
    BookedAccounting,
    ImportInvoiceReceived,
    IsReturned,
    CreditInvoiceReceived,
    Refunded,
    ReturnProcessedAdmin,
}

impl Milestone {
    pub const FORWARD: [Milestone; 10] = [
        Milestone::QuoteRequested,
        Milestone::QuoteReceived,
        Milestone::OrderPlaced,
        Milestone::PaymentCompleted,
        Milestone::InvoiceReceived,
        Milestone::Shipped,
        Milestone::Received,
        Milestone::QualityControl,
        Milestone::BookedAccounting,
        Milestone::ImportInvoiceReceived,
    ];

    pub const RETURN: [Milestone; 4] = [
        Milestone::IsReturned,
        Milestone::CreditInvoiceReceived,
        Milestone::Refunded,
        Milestone::ReturnProcessedAdmin,
    ];

    pub fn all() -> impl Iterator<Item = Milestone> {
        Self::FORWARD.into_iter().chain(Self::RETURN)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Milestone::QuoteRequested => "quote_requested",
            Milestone::QuoteReceived => "quote_received",
            Milestone::OrderPlaced => "order_placed",
            Milestone::PaymentCompleted => "payment_completed",
            Milestone::InvoiceReceived => "invoice_received",
            Milestone::Shipped => "shipped",
            Milestone::Received => "received",
            Milestone::QualityControl => "quality_control",
            Milestone::BookedAccounting => "booked_accounting",
            Milestone::ImportInvoiceReceived => "import_invoice_received",
            Milestone::IsReturned => "is_returned",
            Milestone::CreditInvoiceReceived => "credit_invoice_received",
            Milestone::Refunded => "refunded",
            Milestone::ReturnProcessedAdmin => "return_processed_admin",
        }
    }

    /// Column in the `orders` table holding this milestone's date.
    pub fn column(&self) -> &'static str {
        match self {
            Milestone::QuoteRequested => "date_quote_requested",
            Milestone::QuoteReceived => "date_quote_received",
            Milestone::OrderPlaced => "date_order_placed",
            Milestone::PaymentCompleted => "date_payment_completed",
            Milestone::InvoiceReceived => "date_invoice_received",
            Milestone::Shipped => "date_shipped",
            Milestone::Received => "date_received",
            Milestone::QualityControl => "date_quality_control",
            Milestone::BookedAccounting => "date_booked_accounting",
            Milestone::ImportInvoiceReceived => "date_import_invoice_received",
            Milestone::IsReturned => "date_is_returned",
            Milestone::CreditInvoiceReceived => "date_credit_invoice_received",
            Milestone::Refunded => "date_refunded",
            Milestone::ReturnProcessedAdmin => "date_return_processed_admin",
        }
    }

    pub fn timeline(&self) -> Timeline {
        if Self::RETURN.contains(self) {
            Timeline::Return
        } else {
            Timeline::Forward
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::all().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
