//! Wetbulb CLI - Command-line interface for the wet-bulb engine
//!
//! Commands:
//! - estimate: Estimate wet-bulb temperature from temperature and humidity
//! - classify: Classify a wet-bulb temperature into a guideline band
//! - bands: Print the guideline band table
//! - report: Build a heat report from an Open-Meteo forecast response

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use wetbulb::encoder::ReportEncoder;
use wetbulb::guideline::BANDS;
use wetbulb::types::HeatReport;
use wetbulb::{estimate_wet_bulb, Guideline, HeatStressProcessor, NormalizerConfig, WETBULB_VERSION};

/// Wetbulb - On-device heat-stress engine
#[derive(Parser)]
#[command(name = "wetbulb")]
#[command(author = "Cyberdeck")]
#[command(version = WETBULB_VERSION)]
#[command(about = "Estimate wet-bulb temperature and heat-stress risk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate wet-bulb temperature from temperature and relative humidity
    Estimate {
        /// Air temperature (°C)
        #[arg(short, long, allow_hyphen_values = true)]
        temperature: f64,

        /// Relative humidity (%)
        #[arg(short = 'r', long, allow_hyphen_values = true)]
        humidity: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a wet-bulb temperature into a guideline band
    Classify {
        /// Wet-bulb temperature (°C)
        #[arg(long, allow_hyphen_values = true)]
        wet_bulb: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the guideline band table
    Bands {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a heat report from an Open-Meteo forecast response
    Report {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Query instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Normalizer configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Keep entries up to this many minutes before the query instant
        #[arg(long)]
        past_tolerance_minutes: Option<u32>,

        /// Maximum number of upcoming entries
        #[arg(long)]
        max_entries: Option<usize>,

        /// Fixed report instance ID
        #[arg(long)]
        instance_id: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Plain-text table
    Table,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), WetBulbCliError> {
    match cli.command {
        Commands::Estimate {
            temperature,
            humidity,
            json,
        } => cmd_estimate(temperature, humidity, json),

        Commands::Classify { wet_bulb, json } => cmd_classify(wet_bulb, json),

        Commands::Bands { json } => cmd_bands(json),

        Commands::Report {
            input,
            output,
            now,
            output_format,
            config,
            past_tolerance_minutes,
            max_entries,
            instance_id,
        } => {
            let config = load_config(config.as_deref(), past_tolerance_minutes, max_entries)?;
            cmd_report(
                &input,
                &output,
                now.as_deref(),
                output_format,
                config,
                instance_id,
            )
        }
    }
}

fn cmd_estimate(temperature: f64, humidity: f64, json: bool) -> Result<(), WetBulbCliError> {
    let wet_bulb = estimate_wet_bulb(temperature, humidity);

    if json {
        let value = serde_json::json!({
            "temperature_c": temperature,
            "humidity_pct": humidity,
            "wet_bulb_c": wet_bulb,
            "band": Guideline::classify(wet_bulb).ok(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{wet_bulb:.2}");
    }

    Ok(())
}

fn cmd_classify(wet_bulb: f64, json: bool) -> Result<(), WetBulbCliError> {
    let guideline = Guideline::classify(wet_bulb)?;

    if json {
        let info = wetbulb::types::BandInfo::from(guideline);
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!(
            "{} {} - {}",
            guideline.emoji(),
            guideline.title(),
            guideline.description()
        );
    }

    Ok(())
}

fn cmd_bands(json: bool) -> Result<(), WetBulbCliError> {
    if json {
        let bands: Vec<serde_json::Value> = BANDS
            .iter()
            .map(|band| {
                serde_json::json!({
                    "id": band.guideline,
                    "lower_c": finite_or_null(band.lower),
                    "upper_c": finite_or_null(band.upper),
                    "color": band.guideline.color_hex(),
                    "title": band.title,
                    "description": band.description,
                    "emoji": band.emoji,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&bands)?);
    } else {
        for band in BANDS.iter() {
            println!(
                "{:<8} [{:>6}, {:>6})  {}  {}",
                band.guideline.as_str(),
                band.lower,
                band.upper,
                band.guideline.color_hex(),
                band.title
            );
        }
    }

    Ok(())
}

fn finite_or_null(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn load_config(
    path: Option<&Path>,
    past_tolerance_minutes: Option<u32>,
    max_entries: Option<usize>,
) -> Result<NormalizerConfig, WetBulbCliError> {
    let mut config = match path {
        Some(path) => NormalizerConfig::from_json(&fs::read_to_string(path)?)?,
        None => NormalizerConfig::default(),
    };

    if let Some(minutes) = past_tolerance_minutes {
        config.past_tolerance_minutes = minutes;
    }
    if let Some(max) = max_entries {
        config.max_entries = max;
    }

    Ok(config)
}

fn cmd_report(
    input: &Path,
    output: &Path,
    now: Option<&str>,
    output_format: OutputFormat,
    config: NormalizerConfig,
    instance_id: Option<String>,
) -> Result<(), WetBulbCliError> {
    // Read input
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let query_instant = match now {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| WetBulbCliError::InvalidInstant(format!("{s}: {e}")))?,
        None => Utc::now(),
    };

    let mut processor = HeatStressProcessor::with_config(config)?;
    if let Some(id) = instance_id {
        processor = processor.with_encoder(ReportEncoder::with_instance_id(id));
    }

    let report = processor.report_open_meteo(&input_data, query_instant)?;
    let output_data = format_output(&report, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn format_output(report: &HeatReport, format: &OutputFormat) -> Result<String, WetBulbCliError> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(report)?)),
        OutputFormat::JsonPretty => Ok(format!("{}\n", serde_json::to_string_pretty(report)?)),
        OutputFormat::Table => {
            let mut out = String::new();
            out.push_str("time                  +h   temp   rh%  wet-bulb  band\n");
            for entry in std::iter::once(&report.current).chain(report.upcoming.iter()) {
                out.push_str(&format!(
                    "{:<20} {:>3} {:>6.1} {:>5.0} {:>9.2}  {} {}\n",
                    entry.timestamp_utc,
                    entry.hours_ahead,
                    entry.temperature_c,
                    entry.humidity_pct,
                    entry.wet_bulb_c,
                    entry.band.emoji,
                    entry.band.title
                ));
            }
            if !report.diagnostics.is_empty() {
                out.push_str(&format!("{} entries skipped\n", report.diagnostics.len()));
            }
            Ok(out)
        }
    }
}

// Error types

#[derive(Debug)]
enum WetBulbCliError {
    Io(io::Error),
    Compute(wetbulb::WetBulbError),
    Json(serde_json::Error),
    InvalidInstant(String),
}

impl From<io::Error> for WetBulbCliError {
    fn from(e: io::Error) -> Self {
        WetBulbCliError::Io(e)
    }
}

impl From<wetbulb::WetBulbError> for WetBulbCliError {
    fn from(e: wetbulb::WetBulbError) -> Self {
        WetBulbCliError::Compute(e)
    }
}

impl From<serde_json::Error> for WetBulbCliError {
    fn from(e: serde_json::Error) -> Self {
        WetBulbCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WetBulbCliError> for CliError {
    fn from(e: WetBulbCliError) -> Self {
        match e {
            WetBulbCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WetBulbCliError::Compute(e) => {
                let (code, hint) = match &e {
                    wetbulb::WetBulbError::NoCurrentConditions(_) => (
                        "NO_DATA",
                        "Request the forecast with current=temperature_2m,wind_speed_10m,relative_humidity_2m",
                    ),
                    wetbulb::WetBulbError::InvalidInput(_) => {
                        ("INVALID_INPUT", "Wet-bulb temperature must be a number")
                    }
                    wetbulb::WetBulbError::ConfigError(_) => {
                        ("CONFIG_ERROR", "Check the normalizer configuration")
                    }
                    wetbulb::WetBulbError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    _ => ("PARSE_ERROR", "Ensure input is an Open-Meteo forecast response"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            WetBulbCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            WetBulbCliError::InvalidInstant(msg) => CliError {
                code: "INVALID_INSTANT".to_string(),
                message: msg,
                hint: Some("Use RFC 3339, e.g. 2024-07-15T12:00:00Z".to_string()),
            },
        }
    }
}
