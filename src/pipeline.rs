use crate::chart::{build_charts, Charts};
use crate::clean::{clean, CleanOptions, CleanReport};
use crate::error::Result;
use crate::loader::{load, LoadOptions};
use crate::output::{export_state_summary, Export};
use crate::reports::{
    aggregate_by_month, aggregate_by_region_city, aggregate_by_retailer, aggregate_by_state,
    region_totals,
};
use crate::types::{
    month_rows, region_city_rows, retailer_rows, state_rows, CleanRow, MonthRow, MonthSummary,
    RawRow, RegionCityRow, RegionCitySummary, RetailerRow, RetailerSummary, StateRow,
    StateSummary,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Everything the presentation layer needs from one pipeline run.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub rows: Vec<CleanRow>,
    pub report: CleanReport,
    pub by_retailer: RetailerSummary,
    pub by_month: MonthSummary,
    pub by_state: StateSummary,
    pub by_region_city: RegionCitySummary,
    /// Region totals summed from `by_region_city`.
    pub by_region: BTreeMap<String, Decimal>,
}

/// Serialized hand-off for a front-end (`dashboard.json`).
#[derive(Debug, Serialize)]
pub struct DashboardPayload<'a> {
    pub report: &'a CleanReport,
    pub sales_by_retailer: Vec<RetailerRow>,
    pub sales_by_month: Vec<MonthRow>,
    pub sales_by_state: Vec<StateRow>,
    pub sales_by_region_city: Vec<RegionCityRow>,
    pub charts: Charts,
}

impl Dashboard {
    /// Run the four aggregators over an already-cleaned row set.
    pub fn from_clean(rows: Vec<CleanRow>, report: CleanReport) -> Result<Self> {
        let by_retailer = aggregate_by_retailer(&rows)?;
        let by_month = aggregate_by_month(&rows)?;
        let by_state = aggregate_by_state(&rows)?;
        let by_region_city = aggregate_by_region_city(&rows)?;
        let by_region = region_totals(&by_region_city)?;
        info!(
            "Aggregated {} retailers, {} months, {} states, {} region/city pairs",
            by_retailer.len(),
            by_month.len(),
            by_state.len(),
            by_region_city.len()
        );
        Ok(Self {
            rows,
            report,
            by_retailer,
            by_month,
            by_state,
            by_region_city,
            by_region,
        })
    }

    pub fn charts(&self) -> Charts {
        build_charts(
            &self.by_retailer,
            &self.by_month,
            &self.by_state,
            &self.by_region_city,
            &self.by_region,
        )
    }

    pub fn state_export(&self) -> Result<Export> {
        export_state_summary(&self.by_state)
    }

    pub fn payload(&self) -> DashboardPayload<'_> {
        DashboardPayload {
            report: &self.report,
            sales_by_retailer: retailer_rows(&self.by_retailer),
            sales_by_month: month_rows(&self.by_month),
            sales_by_state: state_rows(&self.by_state),
            sales_by_region_city: region_city_rows(&self.by_region_city),
            charts: self.charts(),
        }
    }
}

/// Clean then aggregate rows that are already in memory.
pub fn run_rows(raw: &[RawRow], opts: &CleanOptions) -> Result<Dashboard> {
    let (rows, report) = clean(raw, opts)?;
    Dashboard::from_clean(rows, report)
}

/// Load, clean and aggregate a source file.
pub fn run(path: &Path, load_opts: &LoadOptions, clean_opts: &CleanOptions) -> Result<Dashboard> {
    let raw = load(path, load_opts)?;
    run_rows(&raw, clean_opts)
}
