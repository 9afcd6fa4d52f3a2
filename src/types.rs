use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

/// One transaction record as ingested; every field is still text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data-row index (header excluded).
    pub row_id: usize,
    pub retailer: String,
    pub region: String,
    pub state: String,
    pub city: String,
    pub invoice_date: String,
    pub total_sales: String,
    pub units_sold: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanRow {
    pub row_id: usize,
    pub retailer: String,
    pub region: String,
    pub state: String,
    pub city: String,
    pub invoice_date: NaiveDate,
    pub sales_amount: Decimal,
    pub units_sold: i64,
    /// "FullMonthName-FourDigitYear", e.g. `March-2023`.
    pub month_label: String,
}

pub type RetailerSummary = BTreeMap<String, Decimal>;

/// Months in chronological order.
pub type MonthSummary = Vec<MonthTotal>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTotal {
    pub month_label: String,
    pub total_sales: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateTotals {
    pub total_sales: Decimal,
    pub units_sold: i64,
}

pub type StateSummary = BTreeMap<String, StateTotals>;

/// Leaf totals keyed by `(region, city)`.
pub type RegionCitySummary = BTreeMap<(String, String), Decimal>;

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RetailerRow {
    #[serde(rename = "Retailer")]
    #[tabled(rename = "Retailer")]
    pub retailer: String,
    #[serde(rename = "TotalSales")]
    #[tabled(rename = "TotalSales")]
    pub total_sales: Decimal,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month_label: String,
    #[serde(rename = "TotalSales")]
    #[tabled(rename = "TotalSales")]
    pub total_sales: Decimal,
}

/// Column order here is the exported CSV column order.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct StateRow {
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "TotalSales")]
    #[tabled(rename = "TotalSales")]
    pub total_sales: Decimal,
    #[serde(rename = "UnitsSold")]
    #[tabled(rename = "UnitsSold")]
    pub units_sold: i64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RegionCityRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "TotalSales")]
    #[tabled(rename = "TotalSales")]
    pub total_sales: Decimal,
}

pub fn retailer_rows(summary: &RetailerSummary) -> Vec<RetailerRow> {
    summary
        .iter()
        .map(|(retailer, total)| RetailerRow {
            retailer: retailer.clone(),
            total_sales: *total,
        })
        .collect()
}

pub fn month_rows(summary: &MonthSummary) -> Vec<MonthRow> {
    summary
        .iter()
        .map(|m| MonthRow {
            month_label: m.month_label.clone(),
            total_sales: m.total_sales,
        })
        .collect()
}

pub fn state_rows(summary: &StateSummary) -> Vec<StateRow> {
    summary
        .iter()
        .map(|(state, totals)| StateRow {
            state: state.clone(),
            total_sales: totals.total_sales,
            units_sold: totals.units_sold,
        })
        .collect()
}

pub fn region_city_rows(summary: &RegionCitySummary) -> Vec<RegionCityRow> {
    summary
        .iter()
        .map(|((region, city), total)| RegionCityRow {
            region: region.clone(),
            city: city.clone(),
            total_sales: *total,
        })
        .collect()
}
