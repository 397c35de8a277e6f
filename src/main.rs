//! DG Value Proposition CLI
//!
//! Command-line interface for single scenario evaluation, sensitivity grids
//! and multi-region market studies

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use dg_value_prop::catalog::{CatalogParameter, Technology};
use dg_value_prop::config::{InputsConfig, StudyConfig};
use dg_value_prop::export::{self, GridReport};
use dg_value_prop::regional::load_regional_data;
use dg_value_prop::{
    CashFlowEngine, Metric, MarketSegment, RegionYearData, RegionalDataSet, RegionalDataSource, StudyLocation,
    StudyRunner, ValuationInputs,
};

#[derive(Parser, Debug)]
#[command(name = "dg-value-prop")]
#[command(about = "Value proposition and market potential of distributed generation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one scenario from the nominal inputs
    Evaluate {
        /// Study config (JSON); only its inputs are used
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Regional data CSV
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[arg(long, default_value = "US")]
        region: String,

        #[arg(long, default_value = "COM")]
        sector: String,

        #[arg(long, default_value_t = 2015)]
        year: i32,

        /// Electricity rate ($/kWh), overrides the regional data
        #[arg(long)]
        electricity_rate: Option<f64>,

        /// Natural gas rate ($/kWh, LHV), overrides the regional data
        #[arg(long)]
        gas_rate: Option<f64>,

        /// Write the cash-flow series to this CSV
        #[arg(long)]
        cash_flows: Option<PathBuf>,
    },

    /// Build a sensitivity grid for one region, sector and year
    Sensitivity {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long)]
        data: PathBuf,

        #[arg(long)]
        region: String,

        #[arg(long, default_value = "COM")]
        sector: String,

        #[arg(long, default_value_t = 2015)]
        year: i32,

        /// Metric to write, e.g. payback, npv, irr, lcoe, mmp
        #[arg(short, long, default_value = "payback")]
        metric: String,

        /// Write every metric as JSON instead of one metric as CSV
        #[arg(long)]
        json: bool,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run every region, year and sector of the config and aggregate
    Market {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long)]
        data: PathBuf,

        /// Write the whole portfolio as one JSON file instead of CSVs
        #[arg(long)]
        json: bool,

        #[arg(short, long, default_value = "market_output")]
        output_dir: PathBuf,
    },

    /// Print the EPA CHP technology catalog
    Catalog {
        /// Only this technology
        #[arg(short, long)]
        technology: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Command::Evaluate {
            config,
            data,
            region,
            sector,
            year,
            electricity_rate,
            gas_rate,
            cash_flows,
        } => {
            let inputs = match config {
                Some(path) => load_config(&path)?.base_inputs()?,
                None => InputsConfig::default().to_inputs()?,
            };
            let location = StudyLocation::new(&region, sector.parse()?, year);
            let mut rates = match data {
                Some(path) => load_data(&path)?.lookup(&location),
                None => RegionYearData::missing(),
            };
            if let Some(rate) = electricity_rate {
                rates.electricity_rate_per_kwh = rate;
            }
            if let Some(rate) = gas_rate {
                rates.natural_gas_rate_per_kwh = rate;
            }
            evaluate(&inputs.with_rates(&rates), &location, cash_flows.as_deref())?;
        }

        Command::Sensitivity {
            config,
            data,
            region,
            sector,
            year,
            metric,
            json,
            output,
        } => {
            let config = load_config(&config)?;
            let runner = StudyRunner::new(load_data(&data)?, config.base_inputs()?, config.sweep()?);
            let location = StudyLocation::new(&region, sector.parse()?, year);

            let grid = runner.run_sensitivity(&location)?;
            if json {
                export::export_json(&GridReport::from_grid(&grid), &output)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
            } else {
                let metric: Metric = metric.parse()?;
                export::export_metric_grid_csv(&grid.metric(metric), grid.sweep(), &output)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
            }
            log::info!("Wrote {} sensitivity grid to {}", location, output.display());
        }

        Command::Market {
            config,
            data,
            json,
            output_dir,
        } => {
            let config = load_config(&config)?;
            let runner = StudyRunner::new(load_data(&data)?, config.base_inputs()?, config.sweep()?);
            let study = runner.run_market(&config.regions, &config.years, &config.sectors()?, &config.aggregator()?)?;

            fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create {}", output_dir.display()))?;

            if json {
                let path = output_dir.join("portfolio.json");
                export::export_json(&study.portfolio, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            } else {
                for segment in study.portfolio.segments() {
                    write_segment(segment, &output_dir)?;
                }
            }

            for segment in study.portfolio.segments() {
                print_segment(segment);
            }
            log::info!("Market study written to {}", output_dir.display());
        }

        Command::Catalog { technology } => {
            let technologies = match technology {
                Some(name) => vec![name.parse::<Technology>()?],
                None => Technology::ALL.to_vec(),
            };
            for tech in technologies {
                print_catalog(tech);
            }
        }
    }

    log::info!("Done in {:?}", start.elapsed());
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<StudyConfig> {
    StudyConfig::from_json_file(path).with_context(|| format!("Failed to load config {}", path.display()))
}

fn load_data(path: &Path) -> anyhow::Result<RegionalDataSet> {
    let data = load_regional_data(path).with_context(|| format!("Failed to load regional data {}", path.display()))?;
    if data.is_empty() {
        bail!("No regional data in {}", path.display());
    }
    Ok(data)
}

fn evaluate(inputs: &ValuationInputs, location: &StudyLocation, cash_flows: Option<&Path>) -> anyhow::Result<()> {
    let outputs = inputs.outputs();

    println!("DG value proposition for {}", location);
    println!("  Electricity rate: {:.4} $/kWh", inputs.electricity_rate_per_kwh());
    println!("  Natural gas rate: {:.4} $/kWh", inputs.natural_gas_rate_per_kwh());
    println!();
    for metric in Metric::ALL {
        match outputs.value(metric) {
            Some(value) => println!("  {:<32} {:>12.4}", metric.label(), value),
            None => println!("  {:<32} {:>12}", metric.label(), "undefined"),
        }
    }

    if let Some(path) = cash_flows {
        let series = CashFlowEngine::cash_flows(inputs);
        export::export_cash_flows_csv(&series, path).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nCash flows written to {}", path.display());
    }
    Ok(())
}

fn write_segment(segment: &MarketSegment, output_dir: &Path) -> anyhow::Result<()> {
    for name in MarketSegment::GRID_NAMES {
        let Some(grid) = segment.grid(name) else {
            continue;
        };
        let path = output_dir.join(format!("{}_{}_{}.csv", segment.sector, segment.year, name));
        export::export_metric_grid_csv(grid, &segment.sweep, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn print_segment(segment: &MarketSegment) {
    println!(
        "{} {}: {} regions, total market {:.2} TWh",
        segment.sector,
        segment.year,
        segment.regions.len(),
        segment.total_market_twh
    );
    match segment.total_market_penetration.range() {
        Some((lo, hi)) => println!("  Total market penetration: {:.2}% to {:.2}%", lo * 100.0, hi * 100.0),
        None => println!("  Total market penetration: undefined"),
    }
    if let Some((lo, hi)) = segment.primary_energy_savings_quads.range() {
        println!("  Primary energy savings: {:.4} to {:.4} quads", lo, hi);
    }
}

fn print_catalog(tech: Technology) {
    println!("{}", tech);
    println!(
        "  {:>10} {:>12} {:>12} {:>14}",
        "kW", "Efficiency", "Price $/W", "O&M $/kWh"
    );
    let power = tech.series(CatalogParameter::PowerKw);
    let efficiency = tech.series(CatalogParameter::ElectricEfficiency);
    let price = tech.series(CatalogParameter::InstalledPricePerWatt);
    let maintenance = tech.series(CatalogParameter::MaintenanceCostPerKwh);
    for i in 0..tech.system_count() {
        println!(
            "  {:>10.0} {:>12.2} {:>12.3} {:>14.3}",
            power[i], efficiency[i], price[i], maintenance[i]
        );
    }
    println!();
}

