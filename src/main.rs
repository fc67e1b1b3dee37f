mod app;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Env};

use app::{App, AppConfig, Mode, OutputFormat};
use junktion::demo::DemoOptions;
use junktion::{PlannerConfig, Pose};

/// Junktion: smooth paths through a junction
///
/// Plans speed-quantized pose sequences between two poses, rounding every
/// heading change with a circular-arc corner. Poses are written as
/// "x,y,theta" with theta in radians; a "pi" suffix is accepted (0.5pi).
#[derive(Parser, Debug)]
#[command(name = "junktion")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Planner configuration file (JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the corner radius
    #[arg(long, value_name = "DISTANCE", global = true)]
    corner_radius: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan one path and print it
    Plan {
        #[arg(long, allow_hyphen_values = true)]
        start: Pose,

        #[arg(long, allow_hyphen_values = true)]
        end: Pose,

        /// Step size (maximum distance between consecutive poses)
        #[arg(short, long)]
        speed: Option<f64>,

        /// Only the corner and exit run, without the approach
        #[arg(long)]
        exit_only: bool,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Plan one path and emit one pose per tick
    Drive {
        #[arg(long, allow_hyphen_values = true)]
        start: Pose,

        #[arg(long, allow_hyphen_values = true)]
        end: Pose,

        #[arg(short, long)]
        speed: Option<f64>,

        /// Milliseconds between emitted poses
        #[arg(long, default_value_t = 33)]
        tick_ms: u64,
    },

    /// Watch a JSON-lines file for path requests
    Watch {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Plan randomly generated junction crossings
    Demo {
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many requests
        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Table,
}

fn load_planner_config(cli: &Cli) -> junktion::Result<PlannerConfig> {
    let mut config = match &cli.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };

    if let Some(radius) = cli.corner_radius {
        config = config.with_corner_radius(radius);
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let planner = match load_planner_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mode = match cli.command {
        Command::Plan {
            start,
            end,
            speed,
            exit_only,
            format,
        } => Mode::Plan {
            start,
            end,
            speed,
            exit_only,
            format: match format {
                Format::Json => OutputFormat::Json,
                Format::Table => OutputFormat::Table,
            },
        },
        Command::Drive {
            start,
            end,
            speed,
            tick_ms,
        } => Mode::Drive {
            start,
            end,
            speed,
            tick: Duration::from_millis(tick_ms),
        },
        Command::Watch { file } => Mode::Watch { file },
        Command::Demo { seed, count } => Mode::Demo(DemoOptions {
            seed,
            count,
            ..DemoOptions::default()
        }),
    };

    let mut app = App::new(AppConfig { planner, mode });

    if let Err(e) = app.run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
