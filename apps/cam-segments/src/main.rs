//! cam-segments: match CAM telemetry to road geometry and write
//! per-(station, road) segments.
//!
//! ```text
//! cam-segments decode captures.json -o cams_filtered.json
//! cam-segments run --roads roads.geojson --cams cams_filtered.json -o segments.json
//! cam-segments synth --seed 7 --out-dir data/
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); `--log-json` switches
//! stderr logging to one JSON object per line.

mod commands;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cam_output::OutputFormat;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cam-segments")]
#[command(about = "Match CAM telemetry to roads and aggregate it into segments", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a raw CAM capture into filtered telemetry records
    Decode {
        /// Raw capture: a JSON array of `{timestamp, msg}` records
        #[arg(value_name = "RAW_JSON")]
        raw: PathBuf,

        /// Filtered JSON file to write
        #[arg(short, long, default_value = "cams_filtered.json")]
        output: PathBuf,
    },
    /// Match telemetry to roads and write the aggregated segments
    Run {
        /// Road network as a GeoJSON FeatureCollection of LineStrings
        #[arg(long, value_name = "GEOJSON")]
        roads: PathBuf,

        /// Telemetry files, concatenated in the order given
        #[arg(long = "cams", value_name = "FILE", required = true, num_args = 1..)]
        cams: Vec<PathBuf>,

        /// Telemetry files are raw CAM captures rather than filtered records
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Segment file to write
        #[arg(short, long, default_value = "segments.json")]
        output: PathBuf,

        /// Output backend
        #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,

        /// Pipeline configuration as JSON; flags below override it
        #[arg(long, value_name = "JSON")]
        config: Option<PathBuf>,

        /// Worker threads for the match phase (default: all cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Emit segments without a speed sample with `speed: null`
        /// instead of failing the run
        #[arg(long, default_value_t = false)]
        allow_missing_speed: bool,
    },
    /// Write a seeded synthetic road network and telemetry file
    Synth {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of simulated stations
        #[arg(long, default_value_t = 20)]
        stations: u32,

        /// Directory that receives `roads.geojson` and `cams_filtered.json`
        #[arg(short = 'd', long, default_value = "data")]
        out_dir: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
    Sqlite,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Sqlite => OutputFormat::Sqlite,
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Decode { raw, output } => commands::decode(&raw, &output),
        Commands::Run {
            roads,
            cams,
            raw,
            output,
            format,
            config,
            threads,
            allow_missing_speed,
        } => {
            let args = commands::RunArgs {
                roads,
                cams,
                raw,
                output,
                format: format.into(),
                config,
                threads,
                allow_missing_speed,
            };
            let report = commands::run(&args)?;
            println!(
                "{} roads | {} points ({} matched, {:.1}%) | {} segments → {}",
                report.roads_indexed,
                report.points_in,
                report.points_matched,
                report.match_rate() * 100.0,
                report.segments,
                args.output.display()
            );
            Ok(())
        }
        Commands::Synth { seed, stations, out_dir } => {
            let (roads, cams) = commands::synth(seed, stations, &out_dir)?;
            println!("Wrote {} and {}", roads.display(), cams.display());
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays free for the run summary.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true).with_writer(std::io::stderr)).init();
    }
}
