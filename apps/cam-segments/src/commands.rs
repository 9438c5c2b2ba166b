//! Subcommand bodies.  Each returns what `main` prints.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use cam_core::{MissingSpeedPolicy, PipelineConfig};
use cam_ingest::{
    FilteredWriter, SyntheticDataset, SyntheticParams, TelemetryFormat, convert_raw_to_filtered,
    read_telemetry_paths,
};
use cam_ingest::synthetic::MAX_STATIONS;
use cam_output::{OutputFormat, SegmentOutputObserver, open_writer};
use cam_pipeline::{PipelineBuilder, RunReport, TracingObserver};
use cam_spatial::load_geojson_path;

// ── decode ────────────────────────────────────────────────────────────────────

pub fn decode(raw: &Path, output: &Path) -> Result<()> {
    let file = File::open(raw).with_context(|| format!("opening {}", raw.display()))?;
    let mut writer = FilteredWriter::create(output)
        .with_context(|| format!("creating {}", output.display()))?;

    let report = match convert_raw_to_filtered(BufReader::new(file), &mut writer) {
        Ok(report) => report,
        Err(e) => {
            drop(writer);
            discard_output(output);
            return Err(e).with_context(|| format!("converting {}", raw.display()));
        }
    };

    println!(
        "{} records → {} written ({} usable, {} malformed)",
        report.records,
        writer.written(),
        report.decoded,
        report.malformed
    );
    Ok(())
}

// ── run ───────────────────────────────────────────────────────────────────────

pub struct RunArgs {
    pub roads:               PathBuf,
    pub cams:                Vec<PathBuf>,
    pub raw:                 bool,
    pub output:              PathBuf,
    pub format:              OutputFormat,
    pub config:              Option<PathBuf>,
    pub threads:             Option<usize>,
    pub allow_missing_speed: bool,
}

/// Read the optional config file and apply command-line overrides.
pub fn resolve_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<PipelineConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    if args.threads.is_some() {
        config.num_threads = args.threads;
    }
    if args.allow_missing_speed {
        config.missing_speed = MissingSpeedPolicy::EmitNull;
    }
    Ok(config)
}

/// Load inputs, run the pipeline, and write the segment file.
///
/// Inputs are read and the pipeline built before the output file is
/// created.  If the run or the write fails, the partially written output is
/// removed.
pub fn run(args: &RunArgs) -> Result<RunReport> {
    let config = resolve_config(args)?;

    let (store, load) = load_geojson_path(&args.roads)
        .with_context(|| format!("loading roads from {}", args.roads.display()))?;
    info!(
        loaded = load.loaded,
        skipped = load.skipped.len(),
        duplicate_ids = load.duplicate_ids,
        "roads loaded"
    );
    if load.loaded == 0 {
        warn!("no usable roads; every point will be unmatched");
    }

    let format = if args.raw { TelemetryFormat::Raw } else { TelemetryFormat::Filtered };
    let (points, decode) =
        read_telemetry_paths(&args.cams, format).context("reading telemetry")?;
    info!(files = args.cams.len(), points = points.len(), skipped = decode.skipped(), "telemetry loaded");

    let pipeline = PipelineBuilder::new(config).roads(store).build()?;

    let writer = open_writer(args.format, &args.output)
        .with_context(|| format!("creating {} output {}", args.format.name(), args.output.display()))?;
    let mut observer = (TracingObserver::new(), SegmentOutputObserver::new(writer));

    let outcome = pipeline.run(points, &mut observer);
    let write_error = observer.1.take_error();
    drop(observer);

    match (outcome, write_error) {
        (Ok(output), None) => Ok(output.report),
        (Err(e), _) => {
            discard_output(&args.output);
            Err(e).context("pipeline run failed")
        }
        (Ok(_), Some(e)) => {
            discard_output(&args.output);
            Err(e).with_context(|| format!("writing {}", args.output.display()))
        }
    }
}

fn discard_output(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "could not remove incomplete output");
    }
}

// ── synth ─────────────────────────────────────────────────────────────────────

pub fn synth(seed: u64, stations: u32, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    if !(1..=MAX_STATIONS).contains(&stations) {
        bail!("--stations must be between 1 and {MAX_STATIONS}");
    }
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let params = SyntheticParams { seed, stations, ..Default::default() };
    let dataset = SyntheticDataset::generate(&params);
    info!(
        seed,
        roads = dataset.road_count(),
        points = dataset.points.len(),
        "synthetic dataset generated"
    );
    Ok(dataset.write_to_dir(out_dir)?)
}
