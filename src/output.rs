use crate::error::Result;
use crate::types::{state_rows, StateSummary};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub const STATE_EXPORT_FILE_NAME: &str = "sales_by_state.csv";
pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// A downloadable file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: &'static str,
    pub media_type: &'static str,
    pub content: Vec<u8>,
}

/// Serialize rows as comma-separated text with a header row.
pub fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

/// `State,TotalSales,UnitsSold`, one row per state in key order.
///
/// An empty summary still produces the header row.
pub fn export_state_summary(summary: &StateSummary) -> Result<Export> {
    let rows = state_rows(summary);
    let content = if rows.is_empty() {
        b"State,TotalSales,UnitsSold\n".to_vec()
    } else {
        to_csv_bytes(&rows)?
    };
    Ok(Export {
        file_name: STATE_EXPORT_FILE_NAME,
        media_type: CSV_MEDIA_TYPE,
        content,
    })
}

pub fn write_export(dir: &Path, export: &Export) -> Result<()> {
    std::fs::write(dir.join(export.file_name), &export.content)?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Render up to `max_rows` rows as a markdown table.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    println!("{}", render_table(rows, max_rows));
    if rows.len() > max_rows {
        println!("({} more rows)", rows.len() - max_rows);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RetailerRow, StateTotals};
    use rust_decimal::Decimal;

    fn summary() -> StateSummary {
        let mut s = StateSummary::new();
        s.insert(
            "NY".into(),
            StateTotals { total_sales: Decimal::new(15000, 2), units_sold: 15 },
        );
        s.insert(
            "CA".into(),
            StateTotals { total_sales: Decimal::new(-250, 2), units_sold: 1200 },
        );
        s
    }

    #[test]
    fn state_export_is_exact() {
        let export = export_state_summary(&summary()).unwrap();
        assert_eq!(export.file_name, "sales_by_state.csv");
        assert_eq!(export.media_type, "text/csv");
        assert_eq!(
            String::from_utf8(export.content).unwrap(),
            "State,TotalSales,UnitsSold\nCA,-2.50,1200\nNY,150.00,15\n"
        );
    }

    #[test]
    fn empty_state_export_has_header_only() {
        let export = export_state_summary(&StateSummary::new()).unwrap();
        assert_eq!(export.content, b"State,TotalSales,UnitsSold\n".to_vec());
    }

    #[test]
    fn export_is_written_under_its_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let export = export_state_summary(&summary()).unwrap();
        write_export(dir.path(), &export).unwrap();
        let on_disk = std::fs::read(dir.path().join(STATE_EXPORT_FILE_NAME)).unwrap();
        assert_eq!(on_disk, export.content);
    }

    #[test]
    fn table_is_truncated_to_max_rows() {
        let rows: Vec<RetailerRow> = ["A", "B", "C"]
            .iter()
            .map(|r| RetailerRow { retailer: r.to_string(), total_sales: Decimal::ONE })
            .collect();
        let table = render_table(&rows, 2);
        assert!(table.contains("| A "));
        assert!(table.contains("| B "));
        assert!(!table.contains("| C "));
        assert_eq!(render_table::<RetailerRow>(&[], 2), "(no rows)");
    }
}
