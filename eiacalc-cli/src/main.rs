//! EiaCalc CLI - engineering values, EIA series and SMD codes from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use eiacalc::{
    format_value, is_standard_value, parse_engineering, tolerance_to_display_string,
    values_in_decade, CalculatorOptions, EiaCalcCore, EiaSeries, SmdReport, StandardValueReport,
};
use serde::Serialize;
use std::process;

#[derive(Parser)]
#[command(name = "eiacalc")]
#[command(about = "Engineering value, EIA series and SMD resistor code calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a value in engineering notation
    Format {
        /// Raw or prefixed value, e.g. 4700 or 4.7k
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,

        /// Unit suffix
        #[arg(short, long, default_value = "Ω")]
        unit: String,
    },

    /// Find the nearest standard value in an EIA series
    Nearest {
        #[arg(value_name = "VALUE")]
        value: String,

        /// E6, E12, E24, E48 or E96 (unknown names fall back to E96)
        #[arg(short, long, default_value = "E24")]
        series: String,

        /// Tolerance in percent, defaults to the series tolerance
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Unit suffix
        #[arg(short, long, default_value = "Ω")]
        unit: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Check whether a value is standard (exit code 1 when it is not)
    Check {
        #[arg(value_name = "VALUE")]
        value: String,

        /// E6, E12, E24, E48 or E96 (unknown names fall back to E96)
        #[arg(short, long, default_value = "E24")]
        series: String,

        /// Unit suffix
        #[arg(short, long, default_value = "Ω")]
        unit: String,
    },

    /// Decode an SMD resistor marking
    Smd {
        /// 3- or 4-character code, e.g. 472, 4R7, 01C, R100
        #[arg(value_name = "CODE")]
        code: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List the standard values of a series in one decade
    Series {
        /// E6, E12, E24, E48 or E96
        #[arg(value_name = "SERIES")]
        name: String,

        /// Decade exponent (0 lists 1.0 .. 9.x)
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        decade: i32,

        /// Unit suffix
        #[arg(short, long, default_value = "Ω")]
        unit: String,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Format { value, unit } => handle_format(&value, &unit),
        Commands::Nearest {
            value,
            series,
            tolerance,
            unit,
            format,
        } => handle_nearest(&value, &series, tolerance, unit, format),
        Commands::Check {
            value,
            series,
            unit,
        } => handle_check(&value, &series, &unit),
        Commands::Smd { code, format } => handle_smd(&code, format),
        Commands::Series {
            name,
            decade,
            unit,
        } => handle_series(&name, decade, &unit),
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_input(value: &str) -> Option<f64> {
    match parse_engineering(value) {
        Ok(raw) => Some(raw),
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    }
}

fn handle_format(value: &str, unit: &str) -> i32 {
    let Some(raw) = parse_input(value) else {
        return 1;
    };
    println!("{}", format_value(raw, unit));
    0
}

fn handle_nearest(
    value: &str,
    series: &str,
    tolerance: Option<f64>,
    unit: String,
    format: OutputFormat,
) -> i32 {
    let Some(raw) = parse_input(value) else {
        return 1;
    };
    let options = CalculatorOptions {
        series: EiaSeries::from_selector(series),
        unit,
        tolerance: tolerance.map(|percent| percent / 100.0),
    };

    match EiaCalcCore::lookup(raw, &options) {
        Ok(report) => {
            match format {
                OutputFormat::Human => output_nearest_human(&report, &options.unit),
                OutputFormat::Json => output_json(&report),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_nearest_human(report: &StandardValueReport, unit: &str) {
    println!("Input:     {}", report.input_display);
    println!("Series:    {} ({}%)", report.series, report.tolerance);
    println!("Nearest:   {}", report.nearest_display);
    println!("Error:     {:+.2}%", report.error_percent);
    println!(
        "Range:     {} .. {} (±{}%)",
        format_value(report.min_value, unit),
        format_value(report.max_value, unit),
        report.tolerance
    );
    println!(
        "Standard:  {}",
        if report.is_standard { "yes" } else { "no" }
    );
}

fn handle_check(value: &str, series: &str, unit: &str) -> i32 {
    let Some(raw) = parse_input(value) else {
        return 1;
    };
    let series = EiaSeries::from_selector(series);
    let display = format_value(raw, unit);

    if is_standard_value(raw, series) {
        println!("{} is a standard {} value", display, series);
        0
    } else {
        println!("{} is not a standard {} value", display, series);
        1
    }
}

fn handle_smd(code: &str, format: OutputFormat) -> i32 {
    match EiaCalcCore::decode(code, &CalculatorOptions::default()) {
        Ok(report) => {
            match format {
                OutputFormat::Human => output_smd_human(&report),
                OutputFormat::Json => output_json(&report),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_smd_human(report: &SmdReport) {
    println!("Code:      {}", report.code.trim());
    println!("Format:    {}", report.kind);
    println!("Value:     {}", report.display);
    println!("Tolerance: {}%", report.tolerance_percent);
    println!(
        "Series:    {} ({})",
        report.series,
        if report.is_standard {
            "standard"
        } else {
            "non-standard"
        }
    );
}

fn handle_series(name: &str, decade: i32, unit: &str) -> i32 {
    let series: EiaSeries = match name.parse() {
        Ok(series) => series,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!(
        "{} ({} values per decade, {}%):\n",
        series,
        series.values_per_decade(),
        tolerance_to_display_string(series.tolerance())
    );
    for value in values_in_decade(series, decade) {
        println!("  {}", format_value(value, unit));
    }
    0
}

fn output_json<T: Serialize>(report: &T) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
}
