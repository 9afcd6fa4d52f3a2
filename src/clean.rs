use crate::error::{Result, RowError};
use crate::types::{CleanRow, RawRow};
use crate::util::{month_label, parse_amount, parse_date, parse_units, DateOrder};
use clap::ValueEnum;
use serde::Serialize;
use tracing::{info, warn};

/// What to do with a row whose amount, units or date cannot be parsed.
///
/// The same policy covers all three columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowPolicy {
    /// Abort the run on the first malformed row.
    Strict,
    /// Exclude malformed rows from every summary and report them.
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    pub policy: RowPolicy,
    pub date_order: DateOrder,
}

/// A row excluded in lenient mode, with every field that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row_id: usize,
    pub reasons: Vec<String>,
    #[serde(skip)]
    pub errors: Vec<RowError>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// Policy and date order the rows were cleaned with.
    pub policy: RowPolicy,
    pub date_order: DateOrder,
    pub total_rows: usize,
    pub clean_rows: usize,
    pub skipped: Vec<SkippedRow>,
}

impl CleanReport {
    pub fn skipped_rows(&self) -> usize {
        self.skipped.len()
    }
}

/// Every field error of one row; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub first: RowError,
    pub rest: Vec<RowError>,
}

impl RowFailure {
    fn new(first: RowError, rest: impl IntoIterator<Item = Option<RowError>>) -> Self {
        Self {
            first,
            rest: rest.into_iter().flatten().collect(),
        }
    }

    pub fn into_errors(self) -> Vec<RowError> {
        let mut errors = Vec::with_capacity(1 + self.rest.len());
        errors.push(self.first);
        errors.extend(self.rest);
        errors
    }
}

/// Coerce one row, collecting every field error instead of stopping at
/// the first.
pub fn clean_row(raw: &RawRow, date_order: DateOrder) -> std::result::Result<CleanRow, RowFailure> {
    let sales = parse_amount(&raw.total_sales).ok_or_else(|| RowError::MalformedAmount {
        row_id: raw.row_id,
        raw: raw.total_sales.clone(),
    });
    let units = parse_units(&raw.units_sold).ok_or_else(|| RowError::MalformedUnits {
        row_id: raw.row_id,
        raw: raw.units_sold.clone(),
    });
    let date = parse_date(&raw.invoice_date, date_order).ok_or_else(|| RowError::MalformedDate {
        row_id: raw.row_id,
        raw: raw.invoice_date.clone(),
    });

    let (sales_amount, units_sold, invoice_date) = match (sales, units, date) {
        (Ok(s), Ok(u), Ok(d)) => (s, u, d),
        (Err(first), u, d) => return Err(RowFailure::new(first, [u.err(), d.err()])),
        (Ok(_), Err(first), d) => return Err(RowFailure::new(first, [d.err()])),
        (Ok(_), Ok(_), Err(first)) => return Err(RowFailure::new(first, [None::<RowError>])),
    };

    Ok(CleanRow {
        row_id: raw.row_id,
        retailer: raw.retailer.clone(),
        region: raw.region.clone(),
        state: raw.state.clone(),
        city: raw.city.clone(),
        invoice_date,
        sales_amount,
        units_sold,
        month_label: month_label(invoice_date),
    })
}

/// Build the clean row set from the raw rows.
///
/// Categorical fields are copied verbatim. Under [`RowPolicy::Strict`] the
/// first malformed row aborts the run; under [`RowPolicy::Lenient`] it is
/// left out and listed in the returned report.
pub fn clean(raw_rows: &[RawRow], opts: &CleanOptions) -> Result<(Vec<CleanRow>, CleanReport)> {
    let mut rows = Vec::with_capacity(raw_rows.len());
    let mut skipped = Vec::new();

    for raw in raw_rows {
        match clean_row(raw, opts.date_order) {
            Ok(row) => rows.push(row),
            Err(failure) if opts.policy == RowPolicy::Strict => return Err(failure.first.into()),
            Err(failure) => {
                let errors = failure.into_errors();
                for e in &errors {
                    warn!("Skipping {}", e);
                }
                skipped.push(SkippedRow {
                    row_id: raw.row_id,
                    reasons: errors.iter().map(ToString::to_string).collect(),
                    errors,
                });
            }
        }
    }

    let report = CleanReport {
        policy: opts.policy,
        date_order: opts.date_order,
        total_rows: raw_rows.len(),
        clean_rows: rows.len(),
        skipped,
    };
    info!(
        "Cleaned {} of {} rows ({} skipped)",
        report.clean_rows,
        report.total_rows,
        report.skipped_rows()
    );
    Ok((rows, report))
}
