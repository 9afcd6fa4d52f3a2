//! Chart-ready series for each dashboard visualization.
//!
//! Values are converted to `f64` here because that is what plotting
//! front-ends consume; summaries keep exact decimals.

use crate::types::{MonthSummary, RegionCitySummary, RetailerSummary, StateSummary};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Series,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub series: Series,
}

/// Bars on the primary axis, a line on the secondary axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboChart {
    pub title: String,
    pub bars: Series,
    pub line: Series,
    pub y_title: String,
    pub y2_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapNode {
    pub id: String,
    pub label: String,
    /// Empty for the top level.
    pub parent: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Treemap {
    pub title: String,
    pub nodes: Vec<TreemapNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub sales_by_retailer: BarChart,
    pub sales_by_month: LineChart,
    pub sales_and_units_by_state: ComboChart,
    pub sales_by_region_city: Treemap,
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

pub fn retailer_bar(summary: &RetailerSummary) -> BarChart {
    BarChart {
        title: "Total Sales by Retailer".into(),
        x_title: "Retailer".into(),
        y_title: "Total Sales (US$)".into(),
        series: Series {
            name: "TotalSales".into(),
            x: summary.keys().cloned().collect(),
            y: summary.values().copied().map(to_f64).collect(),
        },
    }
}

pub fn month_line(summary: &MonthSummary) -> LineChart {
    LineChart {
        title: "Total Sales by Month".into(),
        series: Series {
            name: "TotalSales".into(),
            x: summary.iter().map(|m| m.month_label.clone()).collect(),
            y: summary.iter().map(|m| to_f64(m.total_sales)).collect(),
        },
    }
}

pub fn state_combo(summary: &StateSummary) -> ComboChart {
    let states: Vec<String> = summary.keys().cloned().collect();
    ComboChart {
        title: "Total Sales and Units Sold by State".into(),
        bars: Series {
            name: "Total Sales".into(),
            x: states.clone(),
            y: summary.values().map(|t| to_f64(t.total_sales)).collect(),
        },
        line: Series {
            name: "Units Sold".into(),
            x: states,
            y: summary.values().map(|t| t.units_sold as f64).collect(),
        },
        y_title: "Total Sales".into(),
        y2_title: "Units Sold".into(),
    }
}

/// Escape backslashes and `/` so a node id holds exactly one unescaped `/`
/// for cities and none for regions.
fn node_id_part(name: &str) -> String {
    name.replace('\\', "\\\\").replace('/', "\\/")
}

/// Region nodes first, each followed by its cities. `regions` holds the
/// region totals derived from the same city leaves.
pub fn region_treemap(summary: &RegionCitySummary, regions: &BTreeMap<String, Decimal>) -> Treemap {
    let mut nodes = Vec::with_capacity(regions.len() + summary.len());
    for (region, total) in regions {
        let region_id = node_id_part(region);
        nodes.push(TreemapNode {
            id: region_id.clone(),
            label: region.clone(),
            parent: String::new(),
            value: to_f64(*total),
        });
        let children = summary
            .range((region.clone(), String::new())..)
            .take_while(|((r, _), _)| r == region);
        for ((_, city), value) in children {
            nodes.push(TreemapNode {
                id: format!("{}/{}", region_id, node_id_part(city)),
                label: city.clone(),
                parent: region_id.clone(),
                value: to_f64(*value),
            });
        }
    }
    Treemap {
        title: "Total Sales by Region and City".into(),
        nodes,
    }
}

pub fn build_charts(
    retailers: &RetailerSummary,
    months: &MonthSummary,
    states: &StateSummary,
    region_cities: &RegionCitySummary,
    regions: &BTreeMap<String, Decimal>,
) -> Charts {
    Charts {
        sales_by_retailer: retailer_bar(retailers),
        sales_by_month: month_line(months),
        sales_and_units_by_state: state_combo(states),
        sales_by_region_city: region_treemap(region_cities, regions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::region_totals;
    use crate::types::{MonthTotal, StateTotals};
    use std::collections::HashSet;

    #[test]
    fn treemap_regions_sum_their_cities() {
        let mut summary = RegionCitySummary::new();
        summary.insert(("East".into(), "NYC".into()), Decimal::new(15000, 2));
        summary.insert(("East".into(), "Albany".into()), Decimal::new(500, 2));
        summary.insert(("West".into(), "LA".into()), Decimal::new(100, 2));

        let map = region_treemap(&summary, &region_totals(&summary).unwrap());
        let ids: Vec<&str> = map.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["East", "East/Albany", "East/NYC", "West", "West/LA"]);

        let east = &map.nodes[0];
        let children: f64 = map
            .nodes
            .iter()
            .filter(|n| n.parent == "East")
            .map(|n| n.value)
            .sum();
        assert_eq!(east.value, 155.0);
        assert_eq!(children, 155.0);
    }

    #[test]
    fn treemap_ids_stay_unique_with_slashes_in_names() {
        let mut summary = RegionCitySummary::new();
        summary.insert(("A/B".into(), "C".into()), Decimal::ONE);
        summary.insert(("A".into(), "B/C".into()), Decimal::ONE);
        summary.insert(("A".into(), "B".into()), Decimal::ONE);

        let map = region_treemap(&summary, &region_totals(&summary).unwrap());
        let ids: HashSet<&str> = map.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), map.nodes.len());
        for node in map.nodes.iter().filter(|n| !n.parent.is_empty()) {
            assert!(ids.contains(node.parent.as_str()), "dangling parent {}", node.parent);
        }
        let nested = map.nodes.iter().find(|n| n.label == "C").unwrap();
        assert_eq!(nested.id, "A\\/B/C");
        assert_eq!(nested.parent, "A\\/B");
    }

    #[test]
    fn state_combo_puts_units_on_the_line() {
        let mut summary = StateSummary::new();
        summary.insert(
            "NY".into(),
            StateTotals { total_sales: Decimal::new(15000, 2), units_sold: 15 },
        );
        let chart = state_combo(&summary);
        assert_eq!(chart.bars.y, vec![150.0]);
        assert_eq!(chart.line.y, vec![15.0]);
        assert_eq!(chart.line.x, vec!["NY".to_string()]);
    }

    #[test]
    fn month_line_keeps_summary_order() {
        let months = vec![
            MonthTotal { month_label: "January-2023".into(), total_sales: Decimal::new(100, 0) },
            MonthTotal { month_label: "February-2023".into(), total_sales: Decimal::new(50, 0) },
        ];
        let chart = month_line(&months);
        assert_eq!(chart.series.x, vec!["January-2023", "February-2023"]);
        assert_eq!(chart.series.y, vec![100.0, 50.0]);
    }
}
