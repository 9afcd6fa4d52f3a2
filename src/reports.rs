use crate::error::{PipelineError, Result};
use crate::types::{
    CleanRow, MonthSummary, MonthTotal, RegionCitySummary, RetailerSummary, StateSummary,
};
use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

fn add_sales(total: &mut Decimal, amount: Decimal, key: &str) -> Result<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| PipelineError::Overflow {
            measure: "TotalSales",
            key: key.to_string(),
        })?;
    Ok(())
}

fn add_units(total: &mut i64, units: i64, key: &str) -> Result<()> {
    *total = total
        .checked_add(units)
        .ok_or_else(|| PipelineError::Overflow {
            measure: "UnitsSold",
            key: key.to_string(),
        })?;
    Ok(())
}

/// Total sales per retailer, keyed by the exact retailer text.
pub fn aggregate_by_retailer(data: &[CleanRow]) -> Result<RetailerSummary> {
    let mut map = RetailerSummary::new();
    for r in data {
        let e = map.entry(r.retailer.clone()).or_default();
        add_sales(e, r.sales_amount, &r.retailer)?;
    }
    Ok(map)
}

/// Total sales per month label, in chronological order.
pub fn aggregate_by_month(data: &[CleanRow]) -> Result<MonthSummary> {
    let mut map: BTreeMap<(i32, u32), MonthTotal> = BTreeMap::new();
    for r in data {
        let key = (r.invoice_date.year(), r.invoice_date.month());
        let e = map.entry(key).or_insert_with(|| MonthTotal {
            month_label: r.month_label.clone(),
            total_sales: Decimal::ZERO,
        });
        add_sales(&mut e.total_sales, r.sales_amount, &r.month_label)?;
    }
    Ok(map.into_values().collect())
}

/// Sales and units per state, both summed over the same rows.
pub fn aggregate_by_state(data: &[CleanRow]) -> Result<StateSummary> {
    let mut map = StateSummary::new();
    for r in data {
        let e = map.entry(r.state.clone()).or_default();
        add_sales(&mut e.total_sales, r.sales_amount, &r.state)?;
        add_units(&mut e.units_sold, r.units_sold, &r.state)?;
    }
    Ok(map)
}

/// Sales per `(region, city)` leaf.
pub fn aggregate_by_region_city(data: &[CleanRow]) -> Result<RegionCitySummary> {
    let mut map = RegionCitySummary::new();
    for r in data {
        let e = map.entry((r.region.clone(), r.city.clone())).or_default();
        *e = e.checked_add(r.sales_amount).ok_or_else(|| PipelineError::Overflow {
            measure: "TotalSales",
            key: format!("{} / {}", r.region, r.city),
        })?;
    }
    Ok(map)
}

/// Region totals derived only from their city leaves.
pub fn region_totals(summary: &RegionCitySummary) -> Result<BTreeMap<String, Decimal>> {
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for ((region, _), total) in summary {
        let e = map.entry(region.clone()).or_default();
        add_sales(e, *total, region)?;
    }
    Ok(map)
}
