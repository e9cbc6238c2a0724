use std::io::Read;

use serde::Deserialize;

use crate::currency::LocaleFormat;
use crate::models::{AmountInput, OrderChanges, OrderInput};

use super::TransferError;

/// Columns read from an import file. Unknown columns (including the derived
/// ones written by export) are ignored; missing columns read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvOrderRow {
    supplier: Option<String>,
    webshop: Option<String>,
    order_number: Option<String>,
    invoice_number: Option<String>,
    description: Option<String>,
    total_amount_excl_vat: Option<String>,
    total_vat: Option<String>,
    total_import_duties: Option<String>,
    total_clearance_costs: Option<String>,
    vat_clearance_costs: Option<String>,
    shipping_costs: Option<String>,
    is_return: Option<String>,
    date_quote_requested: Option<String>,
    date_quote_received: Option<String>,
    date_order_placed: Option<String>,
    date_payment_completed: Option<String>,
    date_invoice_received: Option<String>,
    date_shipped: Option<String>,
    date_received: Option<String>,
    date_quality_control: Option<String>,
    date_booked_accounting: Option<String>,
    date_import_invoice_received: Option<String>,
    date_is_returned: Option<String>,
    date_credit_invoice_received: Option<String>,
    date_refunded: Option<String>,
    date_return_processed_admin: Option<String>,
}

/// Outcome of parsing one data row. `row` is 1-based, header excluded.
#[derive(Debug)]
pub struct ImportRow {
    pub row: usize,
    pub result: Result<OrderChanges, String>,
}

impl CsvOrderRow {
    fn into_input(self) -> Result<OrderInput, String> {
        let is_return = match self.is_return.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(other) => return Err(format!("is_return: expected true or false, got {other:?}")),
        };

        let amount = |v: Option<String>| Some(v.map(AmountInput::Text));

        Ok(OrderInput {
            supplier: Some(self.supplier),
            webshop: Some(self.webshop),
            order_number: Some(self.order_number),
            invoice_number: Some(self.invoice_number),
            description: Some(self.description),
            total_amount_excl_vat: amount(self.total_amount_excl_vat),
            total_vat: amount(self.total_vat),
            total_import_duties: amount(self.total_import_duties),
            total_clearance_costs: amount(self.total_clearance_costs),
            vat_clearance_costs: amount(self.vat_clearance_costs),
            shipping_costs: amount(self.shipping_costs),
            is_return: Some(Some(is_return)),
            date_quote_requested: Some(self.date_quote_requested),
            date_quote_received: Some(self.date_quote_received),
            date_order_placed: Some(self.date_order_placed),
            date_payment_completed: Some(self.date_payment_completed),
            date_invoice_received: Some(self.date_invoice_received),
            date_shipped: Some(self.date_shipped),
            date_received: Some(self.date_received),
            date_quality_control: Some(self.date_quality_control),
            date_booked_accounting: Some(self.date_booked_accounting),
            date_import_invoice_received: Some(self.date_import_invoice_received),
            date_is_returned: Some(self.date_is_returned),
            date_credit_invoice_received: Some(self.date_credit_invoice_received),
            date_refunded: Some(self.date_refunded),
            date_return_processed_admin: Some(self.date_return_processed_admin),
        })
    }
}

/// Parse every data row independently. A malformed row yields an error entry
/// instead of aborting the file; only an unreadable header or a file with no
/// data rows fails as a whole.
pub fn read_orders<R: Read>(input: R, locale: &LocaleFormat) -> Result<Vec<ImportRow>, TransferError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    reader.headers()?;

    let rows: Vec<ImportRow> = reader
        .deserialize::<CsvOrderRow>()
        .enumerate()
        .map(|(i, parsed)| {
            let result = parsed
                .map_err(|e| e.to_string())
                .and_then(CsvOrderRow::into_input)
                .and_then(|input| {
                    input.into_new_order(locale).map_err(|errors| {
                        errors
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; ")
                    })
                });
            ImportRow { row: i + 1, result }
        })
        .collect();

    if rows.is_empty() {
        return Err(TransferError::Empty);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, OrderRecord};
    use crate::transfer::write_orders;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn parses_rows_independently() {
        let csv = "\
supplier,order_number,total_amount_excl_vat,is_return,date_order_placed
Acme,PO-1,\"1.234,56\",true,2024-01-10
,PO-2,10,false,
Globex,PO-3,,maybe,
Initech,PO-4,,,not-a-date
";
        let rows = read_orders(csv.as_bytes(), &LocaleFormat::default()).unwrap();
        assert_eq!(rows.len(), 4);

        let first = rows[0].result.as_ref().unwrap();
        assert_eq!(first.get("supplier"), Some(&FieldValue::Text(Some("Acme".into()))));
        assert_eq!(
            first.get("total_amount_excl_vat"),
            Some(&FieldValue::Amount(Some(Decimal::new(123456, 2))))
        );
        assert_eq!(first.get("is_return"), Some(&FieldValue::Flag(true)));
        assert_eq!(
            first.get("date_order_placed"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 10)))
        );

        assert_eq!(rows[1].row, 2);
        assert!(rows[1].result.as_ref().unwrap_err().contains("supplier"));
        assert!(rows[2].result.as_ref().unwrap_err().contains("is_return"));
        assert!(rows[3].result.as_ref().unwrap_err().contains("date_order_placed"));
    }

    #[test]
    fn header_only_is_empty() {
        let err = read_orders("supplier,webshop\n".as_bytes(), &LocaleFormat::default()).unwrap_err();
        assert!(matches!(err, TransferError::Empty));
    }

    #[test]
    fn export_then_import_preserves_fields() {
        let order = OrderRecord {
            supplier: "Acme".into(),
            webshop: Some("acme.example".into()),
            shipping_costs: Some(Decimal::new(995, 2)),
            total_vat: Some(Decimal::ZERO),
            is_return: true,
            date_refunded: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };

        let mut buf = Vec::new();
        let locale = LocaleFormat::default();
        write_orders(&[order], &locale, &mut buf).unwrap();

        let rows = read_orders(buf.as_slice(), &locale).unwrap();
        let changes = rows[0].result.as_ref().unwrap();
        assert_eq!(changes.get("webshop"), Some(&FieldValue::Text(Some("acme.example".into()))));
        assert_eq!(
            changes.get("shipping_costs"),
            Some(&FieldValue::Amount(Some(Decimal::new(995, 2))))
        );
        // Zero is exported blank and comes back unset.
        assert_eq!(changes.get("total_vat"), Some(&FieldValue::Amount(None)));
        assert_eq!(changes.get("is_return"), Some(&FieldValue::Flag(true)));
        assert_eq!(
            changes.get("date_refunded"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 2, 1)))
        );
    }
}
