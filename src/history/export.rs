use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::render::format_date;
use crate::types::HistoryRecord;

pub const CSV_HEADERS: [&str; 6] = [
    "Date",
    "Loan Amount",
    "Interest Rate",
    "Term",
    "Prepayment",
    "Total Interest",
];

/// one exported history row
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub date: String,
    pub loan_amount: Money,
    pub interest_rate: Money,
    pub term: u32,
    pub prepayment: Money,
    pub total_interest: Money,
}

impl CsvRow {
    pub fn from_record(record: &HistoryRecord, date_format: &str) -> Self {
        let params = &record.parameters;
        // cents round half away from zero on the shortest decimal form of
        // each f64, so 1.005 exports as 1.01 rather than the binary-exact 1.00
        Self {
            date: format_date(record.recorded_at, date_format),
            loan_amount: Money::from_f64(params.principal),
            interest_rate: Money::from_f64(params.annual_rate_percent),
            term: params.term,
            prepayment: params
                .prepayment
                .map(|p| Money::from_f64(p.amount))
                .unwrap_or(Money::ZERO),
            total_interest: Money::from_f64(record.result.total_interest),
        }
    }

    fn to_fields(&self) -> [String; 6] {
        [
            self.date.clone(),
            self.loan_amount.to_fixed(),
            self.interest_rate.to_fixed(),
            self.term.to_string(),
            self.prepayment.to_fixed(),
            self.total_interest.to_fixed(),
        ]
    }

    fn from_fields(line: u64, fields: &StringRecord) -> Result<Self> {
        if fields.len() != CSV_HEADERS.len() {
            return Err(bad_row(line, format!("expected {} fields, found {}", CSV_HEADERS.len(), fields.len())));
        }

        let money = |i: usize| -> Result<Money> {
            fields[i]
                .parse::<Money>()
                .map_err(|e| bad_row(line, format!("{}: {e}", CSV_HEADERS[i])))
        };

        Ok(Self {
            date: fields[0].to_string(),
            loan_amount: money(1)?,
            interest_rate: money(2)?,
            term: fields[3]
                .trim()
                .parse()
                .map_err(|e| bad_row(line, format!("{}: {e}", CSV_HEADERS[3])))?,
            prepayment: money(4)?,
            total_interest: money(5)?,
        })
    }
}

/// header plus one row per record, newline-joined without a trailing newline
pub fn export_csv(records: &[HistoryRecord], date_format: &str) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(CsvRow::from_record(record, date_format).to_fields())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut text = String::from_utf8(bytes).map_err(|e| CalculatorError::Storage {
        message: format!("csv output is not utf-8: {e}"),
    })?;

    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// parse text produced by [`export_csv`]
pub fn parse_csv(text: &str) -> Result<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().ne(CSV_HEADERS.iter().copied()) {
        return Err(bad_row(1, "unexpected header row".to_string()));
    }

    let mut rows = Vec::new();
    for (i, fields) in reader.records().enumerate() {
        rows.push(CsvRow::from_fields(i as u64 + 2, &fields?)?);
    }
    Ok(rows)
}

fn bad_row(line: u64, message: String) -> CalculatorError {
    CalculatorError::Storage {
        message: format!("csv line {line}: {message}"),
    }
}
