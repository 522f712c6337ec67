use anyhow::{Context, Result};
use clap::Parser;
use cubecam::overlay::{ImageDirectorySink, OverlayRenderer};
use cubecam::{
    CubecamConfig, DirectoryFrameSource, SessionOutcome, SessionRunner, SolveSession,
    SolverGateway,
};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(name = "cubecam")]
#[command(about = "Camera-guided Rubik's Cube scanner and move coach")]
#[command(version)]
#[command(long_about = "Scans the six faces of a Rubik's Cube from camera frames, \
asks a solver for a solution and coaches every move with arrows drawn over the frames, \
confirming each turn from the colors that come back into view.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "cubecam.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Override the frames directory
    #[arg(long, value_name = "DIR", help = "Directory of recorded frames to replay")]
    frames: Option<String>,

    /// Override the annotated output directory
    #[arg(short, long, value_name = "DIR", help = "Write annotated frames to this directory")]
    output: Option<String>,

    /// Session report destination
    #[arg(long, value_name = "FILE", help = "Write the JSON session report to this file")]
    report: Option<String>,

    /// Fixed solution instead of the configured solver
    #[arg(long, value_name = "MOVES", help = "Space separated move list, e.g. \"R U' F2\"")]
    moves: Option<String>,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting a session")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Also write logs to daily files in this directory
    #[arg(long, value_name = "DIR", help = "Directory for rolling log files")]
    log_dir: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    let log_guard = init_logging(&args)?;

    info!("Starting cubecam v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let mut config = match CubecamConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    apply_overrides(&mut config, &args);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("✗ Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let solver = SolverGateway::from_config(&config.solver).context("No solver available")?;
    let source = DirectoryFrameSource::new(&config.camera.frames_dir)
        .with_context(|| format!("Cannot read frames from {}", config.camera.frames_dir))?
        .with_fps(config.camera.fps);
    if source.remaining() == 0 {
        anyhow::bail!("No frames found in {}", config.camera.frames_dir);
    }

    let sink = match &config.overlay.output_dir {
        Some(dir) => {
            let renderer = OverlayRenderer::from_config(&config.overlay);
            Some(ImageDirectorySink::new(dir, renderer)?)
        }
        None => None,
    };

    let mut runner = SessionRunner::new(SolveSession::new(config), solver, Box::new(source))
        .with_signal_handling();
    if let Some(sink) = sink {
        runner = runner.with_sink(Box::new(sink));
    }

    let report = runner.run().await.map_err(|e| {
        error!("Session error: {}", e);
        e
    })?;

    if let Some(path) = &args.report {
        report.write_to(path)?;
    }

    let exit_code = match &report.outcome {
        SessionOutcome::Solved => {
            println!("✓ Cube solved in {} moves", report.moves_completed);
            0
        }
        SessionOutcome::Incomplete => {
            println!("Frames ended before the cube was solved");
            2
        }
        SessionOutcome::Interrupted => 130,
        SessionOutcome::Failed { reason } => {
            eprintln!("✗ Session failed: {}", reason);
            1
        }
    };

    info!("cubecam exited with code: {}", exit_code);
    // Flush buffered log lines before exiting
    drop(log_guard);
    std::process::exit(exit_code);
}

fn apply_overrides(config: &mut CubecamConfig, args: &Args) {
    if let Some(frames) = &args.frames {
        config.camera.frames_dir = frames.clone();
    }
    if let Some(output) = &args.output {
        config.overlay.output_dir = Some(output.clone());
    }
    if let Some(moves) = &args.moves {
        config.solver.moves = Some(moves.split_whitespace().map(String::from).collect());
    }
}

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cubecam={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    let (file_layer, guard) = match &args.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "cubecam.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# Cubecam Configuration File");
    println!("# This is the default configuration with all available options");
    println!();
    println!("{}", CubecamConfig::default().to_toml()?);
    Ok(())
}
