use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::currency::LocaleFormat;

use super::Milestone;

// ---------------------------------------------------------------------------
// Raw client payload
// ---------------------------------------------------------------------------

/// A monetary amount as sent by a client: either a JSON number or a
/// locale-formatted string such as `"1.234,56"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

/// Raw create/update payload.
///
/// Every field distinguishes "absent" (`None`) from "explicitly cleared"
/// (`Some(None)`), so the same shape serves both a full create and a partial
/// update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderInput {
    #[serde(default, deserialize_with = "double_option")]
    pub supplier: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub webshop: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub order_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub invoice_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub total_amount_excl_vat: Option<Option<AmountInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub total_vat: Option<Option<AmountInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub total_import_duties: Option<Option<AmountInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub total_clearance_costs: Option<Option<AmountInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vat_clearance_costs: Option<Option<AmountInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub shipping_costs: Option<Option<AmountInput>>,

    #[serde(default, deserialize_with = "double_option")]
    pub is_return: Option<Option<bool>>,

    #[serde(default, deserialize_with = "double_option")]
    pub date_quote_requested: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_quote_received: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_order_placed: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_payment_completed: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_invoice_received: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_shipped: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_received: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_quality_control: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_booked_accounting: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_import_invoice_received: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_is_returned: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_credit_invoice_received: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_refunded: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_return_processed_admin: Option<Option<String>>,
}

/// Deserialize a field so that absent, `null` and a value stay distinguishable.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

// ---------------------------------------------------------------------------
// Normalized changes
// ---------------------------------------------------------------------------

/// A typed column value ready to be bound into SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Amount(Option<Decimal>),
    Date(Option<NaiveDate>),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub column: &'static str,
    pub value: FieldValue,
}

impl FieldChange {
    pub fn milestone(milestone: Milestone, date: Option<NaiveDate>) -> Self {
        Self {
            column: milestone.column(),
            value: FieldValue::Date(date),
        }
    }
}

/// Validated set of column assignments produced from an [`OrderInput`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges(Vec<FieldChange>);

impl OrderChanges {
    pub fn single(change: FieldChange) -> Self {
        Self(vec![change])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldChange> {
        self.0.iter()
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.0.iter().find(|c| c.column == column).map(|c| &c.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

impl OrderInput {
    /// Normalize a create payload. `supplier` must be present and non-blank.
    pub fn into_new_order(self, locale: &LocaleFormat) -> Result<OrderChanges, Vec<FieldError>> {
        let supplier_missing = !matches!(
            &self.supplier,
            Some(Some(s)) if !s.trim().is_empty()
        );
        match self.into_changes(locale) {
            Ok(changes) if !supplier_missing => Ok(changes),
            Ok(_) => Err(vec![supplier_required()]),
            Err(mut errors) => {
                if supplier_missing && !errors.iter().any(|e| e.field == "supplier") {
                    errors.insert(0, supplier_required());
                }
                Err(errors)
            }
        }
    }

    /// Normalize a partial update. Absent fields are left out; a supplied
    /// `supplier` must still be non-blank.
    pub fn into_changes(self, locale: &LocaleFormat) -> Result<OrderChanges, Vec<FieldError>> {
        let mut n = Normalizer {
            locale,
            changes: Vec::new(),
            errors: Vec::new(),
        };

        if let Some(supplier) = self.supplier {
            match clean_text(supplier) {
                Some(s) => n.push("supplier", FieldValue::Text(Some(s))),
                None => n.errors.push(supplier_required()),
            }
        }
        n.text("webshop", self.webshop);
        n.text("order_number", self.order_number);
        n.text("invoice_number", self.invoice_number);
        n.text("description", self.description);

        n.amount("total_amount_excl_vat", self.total_amount_excl_vat);
        n.amount("total_vat", self.total_vat);
        n.amount("total_import_duties", self.total_import_duties);
        n.amount("total_clearance_costs", self.total_clearance_costs);
        n.amount("vat_clearance_costs", self.vat_clearance_costs);
        n.amount("shipping_costs", self.shipping_costs);

        if let Some(flag) = self.is_return {
            n.push("is_return", FieldValue::Flag(flag.unwrap_or(false)));
        }

        n.date(Milestone::QuoteRequested, self.date_quote_requested);
        n.date(Milestone::QuoteReceived, self.date_quote_received);
        n.date(Milestone::OrderPlaced, self.date_order_placed);
        n.date(Milestone::PaymentCompleted, self.date_payment_completed);
        n.date(Milestone::InvoiceReceived, self.date_invoice_received);
        n.date(Milestone::Shipped, self.date_shipped);
        n.date(Milestone::Received, self.date_received);
        n.date(Milestone::QualityControl, self.date_quality_control);
        n.date(Milestone::BookedAccounting, self.date_booked_accounting);
        n.date(Milestone::ImportInvoiceReceived, self.date_import_invoice_received);
        n.date(Milestone::IsReturned, self.date_is_returned);
        n.date(Milestone::CreditInvoiceReceived, self.date_credit_invoice_received);
        n.date(Milestone::Refunded, self.date_refunded);
        n.date(Milestone::ReturnProcessedAdmin, self.date_return_processed_admin);

        if n.errors.is_empty() {
            Ok(OrderChanges(n.changes))
        } else {
            Err(n.errors)
        }
    }
}

/// Amount columns are `NUMERIC(12, 2)`: ten integer digits.
const AMOUNT_LIMIT: i64 = 10_000_000_000;

fn supplier_required() -> FieldError {
    FieldError::new("supplier", "supplier is required")
}

struct Normalizer<'a> {
    locale: &'a LocaleFormat,
    changes: Vec<FieldChange>,
    errors: Vec<FieldError>,
}

impl Normalizer<'_> {
    fn push(&mut self, column: &'static str, value: FieldValue) {
        self.changes.push(FieldChange { column, value });
    }

    fn text(&mut self, column: &'static str, raw: Option<Option<String>>) {
        if let Some(value) = raw {
            self.push(column, FieldValue::Text(clean_text(value)));
        }
    }

    fn amount(&mut self, column: &'static str, raw: Option<Option<AmountInput>>) {
        let Some(value) = raw else { return };
        match value.and_then(|v| parse_amount(&v, self.locale)) {
            Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
                self.errors
                    .push(FieldError::new(column, "amount must not be negative"));
            }
            Some(amount) if amount.normalize().scale() > 2 => {
                self.errors
                    .push(FieldError::new(column, "amount has more than 2 decimals"));
            }
            Some(amount) if amount >= Decimal::from(AMOUNT_LIMIT) => {
                self.errors
                    .push(FieldError::new(column, "amount exceeds 9999999999.99"));
            }
            parsed => self.push(column, FieldValue::Amount(parsed)),
        }
    }

    fn date(&mut self, milestone: Milestone, raw: Option<Option<String>>) {
        let column = milestone.column();
        let Some(value) = raw else { return };
        match value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => self.push(column, FieldValue::Date(None)),
            Some(s) => match parse_date(s) {
                Some(date) => self.push(column, FieldValue::Date(Some(date))),
                None => self.errors.push(FieldError::new(
                    column,
                    format!("'{s}' is not a valid date (expected YYYY-MM-DD)"),
                )),
            },
        }
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Unparseable text reads as "unset", matching [`LocaleFormat::parse`].
fn parse_amount(input: &AmountInput, locale: &LocaleFormat) -> Option<Decimal> {
    match input {
        AmountInput::Text(s) => {
            let parsed = locale.parse(s);
            if parsed.is_none() && !s.trim().is_empty() {
                tracing::debug!(input = %s, "Unparseable amount treated as unset");
            }
            parsed
        }
        AmountInput::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part kept).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
