use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod analytics;
mod config;
mod dashboard;
mod error;
mod import;
mod models;
mod normalize;
mod report;
mod sample;

use config::AnalyticsConfig;
use dashboard::Dashboard;
use models::RecordKind;

#[derive(Parser)]
#[command(name = "kpi-insights")]
#[command(about = "Sales and recruitment KPI insights from monthly CSV data", long_about = None)]
struct Cli {
    /// TOML file overriding analytics thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show anomalies, trends and forecasts (bundled sample data by default)
    Analyze {
        #[arg(long)]
        sales_csv: Option<PathBuf>,
        #[arg(long)]
        recruitment_csv: Option<PathBuf>,
        /// Print insights as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate and convert a CSV file without analysing it
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, value_enum, default_value_t = RecordKind::Sales)]
        kind: RecordKind,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        sales_csv: Option<PathBuf>,
        #[arg(long)]
        recruitment_csv: Option<PathBuf>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = AnalyticsConfig::load(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Commands::Analyze {
            sales_csv,
            recruitment_csv,
            json,
        } => {
            let dashboard =
                load_dashboard(config, sales_csv.as_deref(), recruitment_csv.as_deref())?;
            let insights = dashboard.insights();

            if json {
                let value = serde_json::json!({
                    "kpis": dashboard.kpis(),
                    "insights": insights.to_json()?,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            println!(
                "Loaded {} sales months and {} recruitment months.",
                dashboard.sales().len(),
                dashboard.recruitment().len()
            );
            match &insights.anomalies {
                Ok(anomalies) if anomalies.any() => {
                    println!(
                        "Anomalies (potential impact {}):",
                        report::format_currency(anomalies.potential_impact)
                    );
                    for detail in [
                        &anomalies.sales_anomaly_details,
                        &anomalies.profit_anomaly_details,
                        &anomalies.productivity_anomaly_details,
                    ]
                    .into_iter()
                    .flatten()
                    {
                        println!("- {detail}");
                    }
                }
                Ok(_) => println!("No anomalies detected."),
                Err(err) => println!("Anomaly detection skipped: {err}."),
            }
            match &insights.trends {
                Ok(trends) => {
                    println!(
                        "Trends: sales {}, profit {}, productivity {} (risk {})",
                        trends.sales_trend,
                        trends.profit_trend,
                        trends.productivity_trend,
                        trends.risk_level
                    );
                    println!(
                        "Next month forecast: revenue {}, operating profit {}",
                        report::format_currency(trends.next_month_sales_forecast),
                        report::format_currency(trends.next_month_profit_forecast)
                    );
                    if trends.potential_loss > 0 {
                        println!(
                            "Potential loss: {}",
                            report::format_currency(trends.potential_loss)
                        );
                    }
                }
                Err(err) => println!("Trend analysis skipped: {err}."),
            }
        }
        Commands::Import { csv, kind } => {
            let dataset = import::import_path(&csv, kind)
                .with_context(|| format!("failed to import {}", csv.display()))?;
            for warning in dataset.warnings() {
                println!("warning: {warning}");
            }
            println!(
                "Converted {} rows from {} ({:?} layout).",
                dataset.len(),
                csv.display(),
                dataset.format()
            );
        }
        Commands::Report {
            sales_csv,
            recruitment_csv,
            out,
        } => {
            let dashboard =
                load_dashboard(config, sales_csv.as_deref(), recruitment_csv.as_deref())?;
            let report = report::build_report(
                chrono::Utc::now().date_naive(),
                &dashboard.kpis(),
                &dashboard.insights(),
            );
            write_report(&out, &report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn write_report(out: &Path, report: &str) -> anyhow::Result<()> {
    std::fs::write(out, report).with_context(|| format!("failed to write {}", out.display()))
}

fn load_dashboard(
    config: AnalyticsConfig,
    sales_csv: Option<&Path>,
    recruitment_csv: Option<&Path>,
) -> anyhow::Result<Dashboard> {
    let mut dashboard = Dashboard::with_sample_data(config);
    for (path, kind) in [
        (sales_csv, RecordKind::Sales),
        (recruitment_csv, RecordKind::Recruitment),
    ] {
        let Some(path) = path else { continue };
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let warnings = dashboard
            .import_csv(kind, file)
            .with_context(|| format!("failed to import {}", path.display()))?;
        for warning in warnings {
            println!("warning: {warning}");
        }
    }
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failure_names_the_output_path() {
        let out = Path::new("/nonexistent-dir/report.md");
        let err = write_report(out, "# Business KPI Report\n").unwrap_err();
        assert_eq!(err.to_string(), "failed to write /nonexistent-dir/report.md");
    }
}
