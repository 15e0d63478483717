use bh_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, SchemeComparison, query,
    run_service,
};
use bh_core::units;
use bh_results::{BrakeTrace, RunConfig};
use bh_sim::{SchemeType, ThermalParameters};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bh-cli")]
#[command(about = "Brake pad heating during a stop and the cool-down after it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemeArg {
    /// Laasonen, one implicit solve per step
    Implicit,
    /// Two implicit half-step solves per step
    TwoPass,
}

impl From<SchemeArg> for SchemeType {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Implicit => SchemeType::Implicit,
            SchemeArg::TwoPass => SchemeType::TwoPass,
        }
    }
}

#[derive(clap::Args)]
struct RunArgs {
    /// Free cooling time after the stop, in seconds
    #[arg(long, default_value_t = 10.0)]
    cooling_time: f64,
    /// Sampling interval of the stored trace, in seconds
    #[arg(long, default_value_t = 0.1)]
    sample_interval: f64,
    /// YAML file overriding the default pad parameters
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one stop with the chosen scheme and write the trace
    Run {
        #[arg(long, value_enum, default_value_t = SchemeArg::Implicit)]
        scheme: SchemeArg,
        #[command(flatten)]
        args: RunArgs,
        /// Trace file (defaults to results_<scheme>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Run cache directory
        #[arg(long, default_value = ".brakeheat/runs")]
        store: PathBuf,
    },
    /// Run both schemes in parallel and report how they differ
    Compare {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Print a summary of a saved trace
    Show {
        /// Path to the trace JSON file
        trace_path: PathBuf,
        /// Also print the profile at the sample nearest this time (s)
        #[arg(long)]
        at: Option<f64>,
    },
    /// List cached runs
    Runs {
        /// Run cache directory
        #[arg(long, default_value = ".brakeheat/runs")]
        store: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scheme,
            args,
            output,
            no_cache,
            store,
        } => cmd_run(scheme.into(), &args, output, !no_cache, &store),
        Commands::Compare { args } => cmd_compare(&args),
        Commands::Show { trace_path, at } => cmd_show(&trace_path, at),
        Commands::Runs { store } => cmd_runs(&store),
    }
}

fn load_params(args: &RunArgs) -> AppResult<ThermalParameters> {
    let params = match &args.params {
        Some(path) => run_service::load_params(path)?,
        None => ThermalParameters::default(),
    };
    let grid = params.validate()?;
    println!(
        "Pad: {:.1} cm, N = {}, dt = {:.1} ms, r = {:.3}, Bi = {:.3}",
        units::to_cm(params.thickness()),
        grid.points(),
        units::to_ms(params.dt()),
        params.stability_ratio(),
        params.biot()
    );
    Ok(params)
}

fn cmd_run(
    scheme: SchemeType,
    args: &RunArgs,
    output: Option<PathBuf>,
    use_cache: bool,
    store: &Path,
) -> AppResult<()> {
    println!("Running {} brake simulation", scheme.method_label());
    let params = load_params(args)?;

    let request = RunRequest {
        params: &params,
        config: RunConfig {
            scheme,
            cooling_time_s: args.cooling_time,
            sample_interval_s: args.sample_interval,
        },
        store_dir: Some(store),
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event: RunProgressEvent| render_stage(&event)),
    )?;

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }
    println!("  Wall time: {:.3}s", response.elapsed_wall_s);

    let output = output.unwrap_or_else(|| PathBuf::from(format!("results_{}.json", scheme.name())));
    let written = run_service::write_trace(&output, &response.trace)?;
    println!("  Trace written to {}", written.display());

    print_trace_summary(&response.trace)
}

fn render_stage(event: &RunProgressEvent) {
    if event.simulation.is_some() {
        return;
    }
    if let Some(msg) = &event.message {
        println!("[{}] {} ({:.2}s)", event.stage.label(), msg, event.elapsed_wall_s);
    }
    if event.stage == RunStage::Completed {
        println!();
    }
}

fn cmd_compare(args: &RunArgs) -> AppResult<()> {
    let params = load_params(args)?;
    let cmp: SchemeComparison = bh_app::compare_schemes(
        &params,
        args.cooling_time,
        args.sample_interval,
        None,
        &RunOptions::default(),
    )?;

    println!(
        "{:<10} {:>10} {:>12} {:>10} {:>10} {:>12}",
        "method", "stop [s]", "distance [m]", "peak [°C]", "at [s]", "final [°C]"
    );
    for trace in [&cmp.implicit.trace, &cmp.two_pass.trace] {
        println!(
            "{:<10} {:>10.3} {:>12.2} {:>10.2} {:>10.2} {:>12.3}",
            trace.method,
            trace.stop_time,
            trace.braking_distance,
            trace.peak_temperature,
            trace.peak_time,
            trace.final_max_temperature()
        );
    }
    println!("\nMax field difference over the run: {:.4} K", cmp.max_field_diff);
    println!("Final field difference:            {:.4} K", cmp.final_field_diff);
    Ok(())
}

fn cmd_show(trace_path: &Path, at: Option<f64>) -> AppResult<()> {
    let trace = run_service::load_trace(trace_path)?;
    print_trace_summary(&trace)?;

    if let Some(t) = at {
        let (t_sample, profile) = query::profile_at(&trace, t)?;
        println!("\nProfile at t = {:.3} s:", t_sample);
        for (x, v) in trace.x_coords.iter().zip(profile) {
            println!("  x = {:>6.2} mm  T = {:>8.3} °C", x * 1000.0, v);
        }
    }
    Ok(())
}

fn print_trace_summary(trace: &BrakeTrace) -> AppResult<()> {
    let summary = query::get_trace_summary(trace)?;
    println!("Method: {}", summary.method);
    println!(
        "  Samples: {} ({} braking) over {:.2}-{:.2} s",
        summary.sample_count, summary.braking_samples, summary.time_range.0, summary.time_range.1
    );
    println!("  Grid points: {}", summary.point_count);
    println!("  Stop time: {:.3} s", summary.stop_time_s);
    println!("  Braking distance: {:.2} m", summary.braking_distance_m);
    println!(
        "  Peak temperature: {:.2} °C at {:.2} s",
        summary.peak_temp_c, summary.peak_time_s
    );
    println!("  Final max temperature: {:.3} °C", summary.final_max_temp_c);
    Ok(())
}

fn cmd_runs(store: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(store)?;

    if runs.is_empty() {
        println!("No cached runs in {}", store.display());
    } else {
        println!("Cached runs in {}:", store.display());
        for manifest in runs {
            println!(
                "  {}  {}  {:<8}  cooling={}s  interval={}s",
                &manifest.run_id[..12.min(manifest.run_id.len())],
                manifest.timestamp,
                manifest.method,
                manifest.config.cooling_time_s,
                manifest.config.sample_interval_s
            );
        }
    }
    Ok(())
}
