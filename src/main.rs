// Entry point: load the sales export once, print the four summary tables
// and write the state CSV plus a JSON payload for the dashboard front-end.
use clap::Parser;
use sales_dashboard::output::{self, preview_table};
use sales_dashboard::settings::Settings;
use sales_dashboard::types::{month_rows, region_city_rows, retailer_rows, state_rows};
use sales_dashboard::util::{format_amount, format_int};
use sales_dashboard::{run, Dashboard};
use rust_decimal::Decimal;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn print_summaries(dashboard: &Dashboard, max_rows: usize) {
    let total: Decimal = dashboard.rows.iter().map(|r| r.sales_amount).sum();
    println!(
        "Processing dataset... ({} rows loaded, {} used, total sales {})",
        format_int(dashboard.report.total_rows),
        format_int(dashboard.report.clean_rows),
        format_amount(total)
    );
    if dashboard.report.skipped_rows() > 0 {
        println!(
            "Note: {} rows excluded due to parse errors ({:?} mode, {:?} dates).",
            format_int(dashboard.report.skipped_rows()),
            dashboard.report.policy,
            dashboard.report.date_order
        );
        for skipped in dashboard.report.skipped.iter().take(max_rows) {
            println!("  - {}", skipped.reasons.join("; "));
        }
    }
    println!();

    preview_table("Sales by Retailer", &retailer_rows(&dashboard.by_retailer), max_rows);
    preview_table("Sales by Month", &month_rows(&dashboard.by_month), max_rows);
    preview_table(
        "Sales and Units Sold by State",
        &state_rows(&dashboard.by_state),
        max_rows,
    );
    preview_table(
        "Sales by Region and City",
        &region_city_rows(&dashboard.by_region_city),
        max_rows,
    );
}

fn write_outputs(dashboard: &Dashboard, settings: &Settings) -> sales_dashboard::Result<()> {
    std::fs::create_dir_all(&settings.out_dir)?;
    let export = dashboard.state_export()?;
    output::write_export(&settings.out_dir, &export)?;
    println!(
        "(State table exported to {} as {})",
        settings.out_dir.join(export.file_name).display(),
        export.media_type
    );
    let json_path = settings.out_dir.join("dashboard.json");
    output::write_json(&json_path, &dashboard.payload())?;
    println!("(Dashboard data written to {})", json_path.display());
    Ok(())
}

fn main() -> ExitCode {
    let settings = Settings::parse();
    setup_logging(&settings.log_level);
    tracing::info!("sales_dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let load_opts = match settings.load_options() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let dashboard = match run(&settings.input, &load_opts, &settings.clean_options()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to build dashboard: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_summaries(&dashboard, settings.preview_rows);

    if !settings.no_export {
        if let Err(e) = write_outputs(&dashboard, &settings) {
            eprintln!("Write error: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
