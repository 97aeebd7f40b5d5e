//! Beeline CLI - run simulated missions and parameter sweeps.

use anyhow::{bail, Context, Result};
use beeline_core::{Command, StatusRecord};
use beeline_sim::{param_spec, run_mission, set_param, MissionConfig, MissionResult, PARAMS};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Public function that can be called from the main binary
pub fn run_cli_main(args: &[&str]) -> Result<()> {
    let args = Args::parse_from(args);
    main_inner(args)
}

#[derive(Parser, Debug)]
#[command(name = "beeline-cli")]
#[command(about = "Goal-seeking controller mission simulator")]
#[command(version)]
pub struct Args {
    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Output file format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Run a single mission instead of a sweep
    #[arg(long)]
    single: bool,

    /// Mission config JSON; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    // ── Goal / start ──────────────────────────────────────────
    #[arg(long, allow_negative_numbers = true)]
    goal_x: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    goal_z: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    start_x: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    start_z: Option<f64>,

    /// Initial true heading (deg)
    #[arg(long, allow_negative_numbers = true)]
    heading: Option<f64>,

    // ── Noise ─────────────────────────────────────────────────
    /// Position sensor noise σ
    #[arg(long)]
    noise: Option<f64>,

    /// Proportional slip σ on forward moves
    #[arg(long)]
    slip: Option<f64>,

    #[arg(long)]
    dropout: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Ticks during which the agent cannot move forward
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    blocked: Option<Vec<u64>>,

    #[arg(long)]
    max_ticks: Option<u64>,

    // ── Sweep options ──────────────────────────────────────────
    #[arg(long, default_value = "forward_cap")]
    sweep_param: String,

    #[arg(long, default_value_t = 5)]
    sweep_steps: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

pub fn main_inner(args: Args) -> Result<()> {
    println!("Beeline Goal-Seeking Simulator");
    println!("==============================\n");

    let cfg = build_mission_config(&args)?;
    if args.single {
        run_single(&args, &cfg)?;
    } else {
        run_sweep(&args, &cfg)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Single Run
// ---------------------------------------------------------------------------
fn run_single(args: &Args, cfg: &MissionConfig) -> Result<()> {
    println!("Running single mission...");

    let result = run_mission(cfg).context("mission failed")?;
    print_mission_stats(&result);

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {:?}", args.output_dir))?;
    match args.format {
        OutputFormat::Csv => {
            write_records_csv(&args.output_dir.join("mission.csv"), cfg, &result.records)?;
            write_trajectory_csv(&args.output_dir.join("trajectory.csv"), &result)?;
        }
        OutputFormat::Json => {
            let path = args.output_dir.join("mission.json");
            let body = serde_json::json!({
                "config": cfg.to_json(),
                "result": result,
            });
            std::fs::write(&path, serde_json::to_string_pretty(&body)?)
                .with_context(|| format!("writing {:?}", path))?;
            println!("Data written to {:?}", path);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Sweep Run
// ---------------------------------------------------------------------------
fn run_sweep(args: &Args, cfg: &MissionConfig) -> Result<()> {
    let name = args.sweep_param.as_str();
    let Some(spec) = param_spec(name) else {
        let known: Vec<&str> = PARAMS.iter().map(|(n, _)| *n).collect();
        bail!("unknown sweep parameter {name:?}; expected one of {known:?}");
    };
    println!("Sweeping {} ({}) over {} steps", name, spec.label, args.sweep_steps);

    let values = spec.sweep(args.sweep_steps);
    let mut rows = Vec::with_capacity(values.len());
    for (i, &val) in values.iter().enumerate() {
        let mut run_cfg = cfg.clone();
        set_param(&mut run_cfg, name, val)?;
        let res = run_mission(&run_cfg).with_context(|| format!("{name} = {val}"))?;

        println!(
            "Run {}/{} | {}: {:.3} -> {} after {} ticks, error {:.3}",
            i + 1,
            values.len(),
            name,
            val,
            res.outcome.label(),
            res.records.len(),
            res.final_error
        );
        rows.push((val, res));
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {:?}", args.output_dir))?;
    let path = args.output_dir.join("sweep_summary.csv");
    let mut wtr = csv::Writer::from_path(&path).with_context(|| format!("opening {:?}", path))?;
    wtr.write_record([
        name,
        "outcome",
        "ticks",
        "final_error",
        "path_length",
        "rejected_samples",
    ])?;
    for (val, res) in &rows {
        wtr.write_record([
            format!("{:.4}", val),
            res.outcome.label().to_string(),
            res.records.len().to_string(),
            format!("{:.4}", res.final_error),
            format!("{:.4}", res.path_length),
            res.rejected_samples.to_string(),
        ])?;
    }
    wtr.flush()?;

    println!("\nSweep complete. Summary at {:?}", path);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_mission_config(args: &Args) -> Result<MissionConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {:?}", path))?;
            MissionConfig::from_json(&text).with_context(|| format!("parsing config {:?}", path))?
        }
        None => MissionConfig::default(),
    };

    let overrides = [
        ("goal_x", args.goal_x),
        ("goal_z", args.goal_z),
        ("start_x", args.start_x),
        ("start_z", args.start_z),
        ("start_heading", args.heading),
        ("position_noise_std", args.noise),
        ("slip_std", args.slip),
        ("dropout_prob", args.dropout),
    ];
    for (name, value) in overrides {
        if let Some(v) = value {
            debug!(name, value = v, "flag override");
            set_param(&mut cfg, name, v)?;
        }
    }

    if let Some(seed) = args.seed {
        cfg.agent.seed = seed;
        cfg.sensor.seed = seed.wrapping_add(1);
    }
    if let Some(ticks) = args.max_ticks {
        cfg.max_ticks = ticks;
    }
    if let Some(window) = &args.blocked {
        if let [start, end] = window.as_slice() {
            cfg.agent.blocked_ticks = Some((*start, *end));
        }
    }

    Ok(cfg)
}

fn print_mission_stats(result: &MissionResult) {
    println!("\nMission Stats:");
    println!("  Outcome:     {}", result.outcome.label());
    println!("  Ticks:       {}", result.records.len());
    println!("  Rejected:    {}", result.rejected_samples);
    println!("  Path Length: {:.3}", result.path_length);
    println!("  Final Error: {:.4}", result.final_error);
    if let Some(last) = result.records.last() {
        println!("  Last:        {} ({})", describe(last.command), last.state.label());
    }
    println!("------------------------------");
}

fn opt(v: Option<f64>) -> String {
    v.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

fn write_records_csv(path: &Path, cfg: &MissionConfig, records: &[StatusRecord]) -> Result<()> {
    let dt = cfg.tick_period_ms as f64 / 1000.0;
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("opening {:?}", path))?;

    wtr.write_record([
        "tick",
        "time",
        "state",
        "x",
        "y",
        "z",
        "distance",
        "heading",
        "bearing",
        "angle_to_turn",
        "angle_threshold",
        "command",
        "value",
        "arrival",
    ])?;

    for r in records {
        let value = r.command.magnitude();
        wtr.write_record([
            r.tick.to_string(),
            format!("{:.3}", r.tick as f64 * dt),
            r.state.label().to_string(),
            format!("{:.4}", r.position.x),
            format!("{:.4}", r.position.y),
            format!("{:.4}", r.position.z),
            format!("{:.4}", r.distance),
            opt(r.heading),
            opt(r.bearing),
            opt(r.angle_to_turn),
            opt(r.angle_threshold),
            r.command.label().to_string(),
            opt(value),
            r.arrival.map(|a| a.label().to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    println!("Data written to {:?}", path);
    Ok(())
}

fn write_trajectory_csv(path: &Path, result: &MissionResult) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("opening {:?}", path))?;
    wtr.write_record(["tick", "time", "true_x", "true_z", "true_heading"])?;
    for p in &result.trajectory {
        wtr.write_record([
            p.tick.to_string(),
            format!("{:.3}", p.time_s),
            format!("{:.4}", p.x),
            format!("{:.4}", p.z),
            format!("{:.2}", p.heading),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Short form used in run banners, e.g. `turn_left 12.0`.
fn describe(command: Command) -> String {
    match command.magnitude() {
        Some(v) => format!("{} {:.1}", command.label(), v),
        None => command.label().to_string(),
    }
}
