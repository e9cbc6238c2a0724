use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Milestone, OrderRecord};

use super::Severity;

/// Position of an order in the forward procurement workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardStage {
    New,
    QuoteRequested,
    QuoteReceived,
    OrderedUnpaid,
    OrderedPaid,
    InvoiceReceived,
    Received,
    Shipped,
    FullyProcessed,
}

/// Ordered by precedence: the first milestone present decides the stage,
/// regardless of the calendar order of the dates.
pub(crate) const FORWARD_PRECEDENCE: [(Milestone, ForwardStage); 8] = [
    (Milestone::BookedAccounting, ForwardStage::FullyProcessed),
    (Milestone::Shipped, ForwardStage::Shipped),
    (Milestone::Received, ForwardStage::Received),
    (Milestone::InvoiceReceived, ForwardStage::InvoiceReceived),
    (Milestone::PaymentCompleted, ForwardStage::OrderedPaid),
    (Milestone::OrderPlaced, ForwardStage::OrderedUnpaid),
    (Milestone::QuoteReceived, ForwardStage::QuoteReceived),
    (Milestone::QuoteRequested, ForwardStage::QuoteRequested),
];

impl ForwardStage {
    pub const ALL: [ForwardStage; 9] = [
        ForwardStage::New,
        ForwardStage::QuoteRequested,
        ForwardStage::QuoteReceived,
        ForwardStage::OrderedUnpaid,
        ForwardStage::OrderedPaid,
        ForwardStage::InvoiceReceived,
        ForwardStage::Received,
        ForwardStage::Shipped,
        ForwardStage::FullyProcessed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardStage::New => "new",
            ForwardStage::QuoteRequested => "quote_requested",
            ForwardStage::QuoteReceived => "quote_received",
            ForwardStage::OrderedUnpaid => "ordered_unpaid",
            ForwardStage::OrderedPaid => "ordered_paid",
            ForwardStage::InvoiceReceived => "invoice_received",
            ForwardStage::Received => "received",
            ForwardStage::Shipped => "shipped",
            ForwardStage::FullyProcessed => "fully_processed",
        }
    }

    /// Label and severity for this stage. Two stages refine their output
    /// from sibling milestones of the same order.
    pub fn describe(&self, order: &OrderRecord) -> (String, Severity) {
        match self {
            ForwardStage::FullyProcessed => {
                let severity = if order.has(Milestone::Received) {
                    Severity::Green
                } else {
                    Severity::Orange
                };
                ("Fully processed".into(), severity)
            }
            ForwardStage::Shipped => {
                let label = if order.has(Milestone::InvoiceReceived) {
                    "Shipped to us and invoice received"
                } else {
                    "Shipped to us"
                };
                (label.into(), Severity::Orange)
            }
            ForwardStage::Received => ("Order received".into(), Severity::Orange),
            ForwardStage::InvoiceReceived => {
                ("Ordered, paid, and invoice received".into(), Severity::Orange)
            }
            ForwardStage::OrderedPaid => ("Ordered and paid".into(), Severity::Orange),
            ForwardStage::OrderedUnpaid => ("Ordered but not paid".into(), Severity::Red),
            ForwardStage::QuoteReceived => ("Quote received".into(), Severity::Green),
            ForwardStage::QuoteRequested => ("Quote requested".into(), Severity::Orange),
            ForwardStage::New => ("New order".into(), Severity::Gray),
        }
    }
}

impl fmt::Display for ForwardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a return order in the return sub-workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStage {
    /// Flagged as a return, no return milestone recorded yet.
    Pending,
    ReturnedToSupplier,
    CreditInvoiceReceived,
    Refunded,
    FullyProcessed,
}

/// Listed order breaks ties between return milestones sharing a date.
pub(crate) const RETURN_TIMELINE: [(Milestone, ReturnStage); 4] = [
    (Milestone::ReturnProcessedAdmin, ReturnStage::FullyProcessed),
    (Milestone::Refunded, ReturnStage::Refunded),
    (Milestone::CreditInvoiceReceived, ReturnStage::CreditInvoiceReceived),
    (Milestone::IsReturned, ReturnStage::ReturnedToSupplier),
];

impl ReturnStage {
    pub const ALL: [ReturnStage; 5] = [
        ReturnStage::Pending,
        ReturnStage::ReturnedToSupplier,
        ReturnStage::CreditInvoiceReceived,
        ReturnStage::Refunded,
        ReturnStage::FullyProcessed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStage::Pending => "return_pending",
            ReturnStage::ReturnedToSupplier => "returned_to_supplier",
            ReturnStage::CreditInvoiceReceived => "credit_invoice_received",
            ReturnStage::Refunded => "refunded",
            ReturnStage::FullyProcessed => "return_fully_processed",
        }
    }

    /// `None` for [`ReturnStage::Pending`], which decorates the forward
    /// label instead of replacing it.
    pub fn describe(&self) -> Option<(&'static str, Severity)> {
        match self {
            ReturnStage::Pending => None,
            ReturnStage::ReturnedToSupplier => Some(("Returned to supplier", Severity::Orange)),
            ReturnStage::CreditInvoiceReceived => {
                Some(("Credit invoice received", Severity::Orange))
            }
            ReturnStage::Refunded => Some(("Refund received", Severity::Orange)),
            ReturnStage::FullyProcessed => Some(("Return fully processed", Severity::Green)),
        }
    }
}

impl fmt::Display for ReturnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List filter on the derived workflow stage, e.g. `?status=ordered_unpaid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageFilter {
    Forward(ForwardStage),
    Return(ReturnStage),
}

impl StageFilter {
    pub fn from_slug(s: &str) -> Option<Self> {
        ForwardStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .map(StageFilter::Forward)
            .or_else(|| {
                ReturnStage::ALL
                    .into_iter()
                    .find(|stage| stage.as_str() == s)
                    .map(StageFilter::Return)
            })
    }

    pub fn matches(&self, order: &OrderRecord) -> bool {
        match self {
            StageFilter::Forward(stage) => super::forward_stage(order) == *stage,
            StageFilter::Return(stage) => super::return_stage(order) == Some(*stage),
        }
    }
}
