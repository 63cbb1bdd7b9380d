//! Display report: the extracted cheques ordered by amount, with a total row.

use std::io::Write;

use ecc_core::{ChequeRecord, Result};
use rust_decimal::Decimal;

pub const REPORT_HEADER: [&str; 7] = [
    "#",
    "BFD Account",
    "Pay Bank",
    "Pay Account",
    "Cheque No.",
    "Cheque Amount",
    "Remarks",
];

/// `1234567.5` -> `1,234,567.50`
pub fn format_amount(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Write the report as CSV: records sorted ascending by amount (stable), numbered from 1.
pub fn write_report<W: Write>(records: &[ChequeRecord], writer: W) -> Result<()> {
    let mut sorted: Vec<&ChequeRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.cheque_amount());

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(REPORT_HEADER)?;

    let mut total = Decimal::ZERO;
    for (i, record) in sorted.iter().enumerate() {
        total += record.cheque_amount();
        // A missing pay account prints as a placeholder; a missing reason stays blank.
        let pay_account = if record.pay_account().is_empty() { "-" } else { record.pay_account() };
        wtr.write_record([
            (i + 1).to_string().as_str(),
            record.bfd_account(),
            record.pay_bank_name(),
            pay_account,
            record.cheque_number(),
            format_amount(record.cheque_amount()).as_str(),
            record.reason(),
        ])?;
    }
    wtr.write_record(["", "", "", "", "Total", format_amount(total).as_str(), ""])?;
    wtr.flush()?;
    Ok(())
}
