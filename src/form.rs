use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::models::{Milestone, OrderRecord, Timeline};

/// An input on the order edit form whose visibility depends on other inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Milestone(Milestone),
    ReturnFlag,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Milestone(m) => m.as_str(),
            FormField::ReturnFlag => "is_return",
        }
    }
}

impl Serialize for FormField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
enum Prerequisite {
    Always,
    Milestone(Milestone),
    ReturnFlag,
}

/// Form layout in display order, each field with the input that reveals it.
const LAYOUT: [(FormField, Prerequisite); 15] = [
    (FormField::Milestone(Milestone::QuoteRequested), Prerequisite::Always),
    (FormField::Milestone(Milestone::QuoteReceived), Prerequisite::Always),
    (FormField::Milestone(Milestone::OrderPlaced), Prerequisite::Always),
    (
        FormField::Milestone(Milestone::PaymentCompleted),
        Prerequisite::Milestone(Milestone::OrderPlaced),
    ),
    (
        FormField::Milestone(Milestone::InvoiceReceived),
        Prerequisite::Milestone(Milestone::PaymentCompleted),
    ),
    (
        FormField::Milestone(Milestone::Shipped),
        Prerequisite::Milestone(Milestone::PaymentCompleted),
    ),
    (
        FormField::Milestone(Milestone::Received),
        Prerequisite::Milestone(Milestone::Shipped),
    ),
    (
        FormField::Milestone(Milestone::ImportInvoiceReceived),
        Prerequisite::Milestone(Milestone::Shipped),
    ),
    (
        FormField::Milestone(Milestone::QualityControl),
        Prerequisite::Milestone(Milestone::Received),
    ),
    (
        FormField::Milestone(Milestone::BookedAccounting),
        Prerequisite::Milestone(Milestone::InvoiceReceived),
    ),
    (FormField::ReturnFlag, Prerequisite::Milestone(Milestone::OrderPlaced)),
    (FormField::Milestone(Milestone::IsReturned), Prerequisite::ReturnFlag),
    (
        FormField::Milestone(Milestone::CreditInvoiceReceived),
        Prerequisite::ReturnFlag,
    ),
    (FormField::Milestone(Milestone::Refunded), Prerequisite::ReturnFlag),
    (
        FormField::Milestone(Milestone::ReturnProcessedAdmin),
        Prerequisite::Milestone(Milestone::Refunded),
    ),
];

/// Fields the edit form should show for the current state of `order`.
///
/// Return-timeline fields additionally require the return flag, so clearing
/// the flag hides the whole return section.
pub fn visible_fields(order: &OrderRecord) -> Vec<FormField> {
    LAYOUT
        .iter()
        .filter(|(field, prerequisite)| {
            let revealed = match prerequisite {
                Prerequisite::Always => true,
                Prerequisite::Milestone(m) => order.has(*m),
                Prerequisite::ReturnFlag => order.is_return,
            };
            let in_return_section = matches!(
                field,
                FormField::Milestone(m) if m.timeline() == Timeline::Return
            );
            revealed && (!in_return_section || order.is_return)
        })
        .map(|(field, _)| *field)
        .collect()
}

/// Checkbox semantics for a milestone: checking stamps `today`, unchecking
/// clears the date.
pub fn toggle_milestone(current: Option<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
    match current {
        Some(_) => None,
        None => Some(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn names(order: &OrderRecord) -> Vec<&'static str> {
        visible_fields(order).iter().map(|f| f.as_str()).collect()
    }

    #[test]
    fn fresh_order_shows_only_entry_milestones() {
        assert_eq!(
            names(&OrderRecord::default()),
            vec!["quote_requested", "quote_received", "order_placed"]
        );
    }

    #[test]
    fn placing_order_reveals_payment_and_return_flag() {
        let o = OrderRecord::default().with_milestone(Milestone::OrderPlaced, d("2024-01-10"));
        assert_eq!(
            names(&o),
            vec![
                "quote_requested",
                "quote_received",
                "order_placed",
                "payment_completed",
                "is_return"
            ]
        );
    }

    #[test]
    fn payment_reveals_invoice_and_shipping() {
        let o = OrderRecord::default()
            .with_milestone(Milestone::OrderPlaced, d("2024-01-10"))
            .with_milestone(Milestone::PaymentCompleted, d("2024-01-11"));
        let visible = names(&o);
        assert!(visible.contains(&"invoice_received"));
        assert!(visible.contains(&"shipped"));
        assert!(!visible.contains(&"received"));
        assert!(!visible.contains(&"booked_accounting"));
    }

    #[test]
    fn downstream_fields_follow_their_prerequisite() {
        let o = OrderRecord::default()
            .with_milestone(Milestone::Shipped, d("2024-01-12"))
            .with_milestone(Milestone::Received, d("2024-01-13"))
            .with_milestone(Milestone::InvoiceReceived, d("2024-01-13"));
        let visible = names(&o);
        assert!(visible.contains(&"received"));
        assert!(visible.contains(&"import_invoice_received"));
        assert!(visible.contains(&"quality_control"));
        assert!(visible.contains(&"booked_accounting"));
        // Payment itself stays hidden until an order is placed.
        assert!(!visible.contains(&"payment_completed"));
    }

    #[test]
    fn return_section_requires_flag() {
        let mut o = OrderRecord::default()
            .with_milestone(Milestone::Refunded, d("2024-02-01"));
        assert!(!names(&o).contains(&"return_processed_admin"));
        assert!(!names(&o).contains(&"refunded"));

        o.is_return = true;
        let visible = names(&o);
        assert!(visible.contains(&"is_returned"));
        assert!(visible.contains(&"credit_invoice_received"));
        assert!(visible.contains(&"refunded"));
        assert!(visible.contains(&"return_processed_admin"));
    }

    #[test]
    fn unflagged_order_hides_every_return_milestone() {
        let o = Milestone::all().fold(OrderRecord::default(), |o, m| {
            o.with_milestone(m, d("2024-03-03"))
        });
        let hidden = visible_fields(&o).into_iter().all(|f| {
            !matches!(f, FormField::Milestone(m) if m.timeline() == Timeline::Return)
        });
        assert!(hidden);
    }

    #[test]
    fn toggle_sets_then_clears() {
        let today = d("2024-05-05");
        assert_eq!(toggle_milestone(None, today), Some(today));
        assert_eq!(toggle_milestone(Some(d("2024-01-01")), today), None);
    }

    #[test]
    fn serializes_as_field_name() {
        let json = serde_json::to_string(&vec![
            FormField::ReturnFlag,
            FormField::Milestone(Milestone::Shipped),
        ])
        .unwrap();
        assert_eq!(json, r#"["is_return","shipped"]"#);
    }
}
