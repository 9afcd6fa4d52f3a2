use crate::error::{PipelineError, Result};
use crate::types::RawRow;
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// The columns every source must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Retailer,
    Region,
    State,
    City,
    InvoiceDate,
    TotalSales,
    UnitsSold,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Retailer,
        Column::Region,
        Column::State,
        Column::City,
        Column::InvoiceDate,
        Column::TotalSales,
        Column::UnitsSold,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Retailer => "Retailer",
            Column::Region => "Region",
            Column::State => "State",
            Column::City => "City",
            Column::InvoiceDate => "InvoiceDate",
            Column::TotalSales => "TotalSales",
            Column::UnitsSold => "UnitsSold",
        }
    }
}

// Fallback names, used only for a column whose canonical name is absent.
// Keys are normalized with `normalize_header`.
static HEADER_ALIASES: Lazy<HashMap<&'static str, Column>> = Lazy::new(|| {
    HashMap::from([
        ("date", Column::InvoiceDate),
        ("sales", Column::TotalSales),
        ("units", Column::UnitsSold),
    ])
});

/// Lowercase and keep only alphanumerics, so `Invoice Date`,
/// `invoice_date` and `InvoiceDate` compare equal.
fn normalize_header(h: &str) -> String {
    h.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// WHATWG label, e.g. `latin1` or `utf-8`.
    pub encoding: String,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: "latin1".to_string(),
            delimiter: b',',
        }
    }
}

/// Read the whole source into memory and return its rows as text.
pub fn load(path: impl AsRef<Path>, opts: &LoadOptions) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| PipelineError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = load_bytes(&bytes, opts)?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Decode `bytes` with the configured encoding and parse them as CSV.
pub fn load_bytes(bytes: &[u8], opts: &LoadOptions) -> Result<Vec<RawRow>> {
    let encoding = Encoding::for_label(opts.encoding.trim().as_bytes())
        .ok_or_else(|| PipelineError::UnknownEncoding(opts.encoding.clone()))?;
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!("Input contained bytes invalid for {}; replaced with U+FFFD", used.name());
    }
    parse_text(&text, opts.delimiter)
}

fn parse_text(text: &str, delimiter: u8) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let index = resolve_columns(&headers)?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |col: Column| -> String {
            index
                .get(&col)
                .and_then(|&idx| record.get(idx))
                .unwrap_or_default()
                .to_string()
        };
        rows.push(RawRow {
            row_id: i + 1,
            retailer: field(Column::Retailer),
            region: field(Column::Region),
            state: field(Column::State),
            city: field(Column::City),
            invoice_date: field(Column::InvoiceDate),
            total_sales: field(Column::TotalSales),
            units_sold: field(Column::UnitsSold),
        });
    }
    Ok(rows)
}

/// Canonical names win over aliases wherever they appear; among equal
/// matches the leftmost header wins.
fn resolve_columns(headers: &StringRecord) -> Result<HashMap<Column, usize>> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut index: HashMap<Column, usize> = HashMap::new();
    for col in Column::ALL {
        let canonical = normalize_header(col.name());
        if let Some(idx) = normalized.iter().position(|h| *h == canonical) {
            index.insert(col, idx);
        }
    }
    for (idx, header) in normalized.iter().enumerate() {
        if let Some(&col) = HEADER_ALIASES.get(header.as_str()) {
            index.entry(col).or_insert(idx);
        }
    }
    debug!("Resolved header columns: {:?}", index);

    let missing: Vec<String> = Column::ALL
        .iter()
        .filter(|c| !index.contains_key(*c))
        .map(|c| c.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::SchemaError { missing });
    }
    Ok(index)
}
