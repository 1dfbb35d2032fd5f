use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rebar_core::format::{format_currency, round_to};
use rebar_core::{
    EstimateReport, EstimateRequest, Estimator, PackingResult, StockPacker,
    DEFAULT_STOCK_BAR_LENGTH_M,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rebar")]
#[command(about = "Rebar & Concrete Estimator - weight, cost and stock bars with offcut waste", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a project from an input file
    Estimate {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cut a list of pieces from stock bars
    Pack {
        /// Piece lengths in meters, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        pieces: Vec<f64>,

        /// Stock bar length in meters
        #[arg(short, long, default_value_t = DEFAULT_STOCK_BAR_LENGTH_M)]
        stock_length: f64,

        /// Output file for the result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate { input, output } => {
            estimate_command(input, output)?;
        }
        Commands::Pack {
            pieces,
            stock_length,
            output,
        } => {
            pack_command(pieces, stock_length, output)?;
        }
    }

    Ok(())
}

fn load_request(input: &Path) -> Result<EstimateRequest> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let request: EstimateRequest = match input.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(request)
}

fn estimate_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let request = load_request(&input)?;

    println!(
        "  {} rebar rows",
        request.specs.len().to_string().bright_white().bold()
    );
    println!(
        "  {} m³ of concrete, {} m stock bars",
        request.concrete_volume_m3.to_string().bright_white().bold(),
        request.stock_bar_length_m.to_string().bright_white().bold()
    );
    println!();

    println!("{}", "🚀 Running estimate...".bright_blue());

    let estimator = Estimator::new(request)?;
    let report = estimator.estimate()?;

    println!();
    println!("{}", "✅ Estimate complete!".bright_green().bold());
    println!();

    print_report(&report);
    write_output(&report, output)
}

fn print_report(report: &EstimateReport) {
    println!("{}", "📊 Results:".bright_yellow().bold());
    for d in &report.diameters {
        println!(
            "    • {} mm: {} m, {} kg, {} bars, cost {}",
            d.diameter_mm.to_string().bright_white(),
            round_to(d.total_length_m, 2),
            round_to(d.total_weight_kg, 2),
            d.bars_required.to_string().bright_white().bold(),
            format_currency(d.total_cost)
        );
    }
    println!();

    if !report.diameters.is_empty() {
        println!("  Offcuts:");
        for d in &report.diameters {
            let wastes: Vec<String> = d
                .waste_list
                .iter()
                .map(|w| round_to(*w, 2).to_string())
                .collect();
            println!(
                "    • {} mm: {} m ({:.1}%)",
                d.diameter_mm.to_string().bright_white(),
                wastes.join(", "),
                d.waste_percentage
            );
        }
        println!();
    }

    let s = &report.summary;
    println!(
        "  Total rebar weight: {} kg",
        format!("{:.2}", s.total_rebar_weight_kg).bright_white().bold()
    );
    println!(
        "  Rebar cost: {}",
        format_currency(s.total_rebar_cost).bright_white()
    );
    println!(
        "  Concrete cost: {}",
        format_currency(s.concrete_cost).bright_white()
    );
    println!(
        "  💰 Total cost: {}",
        format_currency(s.total_cost).bright_green().bold()
    );
    println!();
}

fn pack_command(pieces: Vec<f64>, stock_length: f64, output: Option<PathBuf>) -> Result<()> {
    println!(
        "{} {} pieces into {} m bars",
        "🚀 Packing".bright_blue(),
        pieces.len().to_string().bright_white().bold(),
        stock_length
    );

    let packer = StockPacker::new(stock_length)?;
    let result = packer.pack(&pieces)?;

    println!();
    print_packing(&result);
    write_output(&result, output)
}

fn print_packing(result: &PackingResult) {
    println!(
        "  Bars required: {}",
        result.bar_count.to_string().bright_white().bold()
    );
    for (i, (bar, waste)) in result.bars.iter().zip(&result.waste_per_bar).enumerate() {
        let cuts: Vec<String> = bar.pieces.iter().map(|p| p.to_string()).collect();
        println!(
            "    • #{}: {} | waste {} m",
            i + 1,
            cuts.join(" + ").bright_cyan(),
            round_to(*waste, 2)
        );
    }
    println!(
        "  Total waste: {} m",
        round_to(result.total_waste(), 2).to_string().bright_white()
    );
    println!();
}

fn write_output<T: Serialize>(value: &T, output: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}
