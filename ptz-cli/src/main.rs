//! ptz - command-line control for pan/tilt network cameras
//!
//! Loads `config.toml` and `.env`, connects a backend and forwards one
//! command to the camera orchestrator.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use ptz_camera::config::default_config_path;
use ptz_camera::{
    CalibrationData, Camera, CameraApi, DayNightMode, SetupPaths, SimulatedCamera, setup,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "ptz")]
#[command(author = "PTZ Contributors")]
#[command(version = "2026.10.17")]
#[command(about = "Control a pan/tilt network camera", long_about = None)]
struct Cli {
    /// Camera settings file
    #[arg(
        long,
        global = true,
        env = "PTZ_CONFIG",
        value_name = "PATH",
        default_value_os_t = default_config_path()
    )]
    config: PathBuf,

    /// Environment file holding PASSWORD_CAMERA / PASSWORD_CLOUD
    #[arg(
        long,
        global = true,
        env = "PTZ_ENV_FILE",
        value_name = "PATH",
        default_value = ".env"
    )]
    env: PathBuf,

    /// Calibration artifact (defaults to a pinhole model at the stream resolution)
    #[arg(long, global = true, value_name = "PATH")]
    calibration: Option<PathBuf>,

    /// Camera backend
    #[arg(long, global = true, value_enum, default_value_t = Backend::Simulated)]
    backend: Backend,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// In-memory simulator
    Simulated,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the RTSP stream URL
    Url,

    /// Show device model and versions
    Info,

    /// Show the current video configuration
    Specs,

    /// Show supported video options
    Capabilities,

    /// Move the motor by PAN / TILT degrees (clamped to the travel range)
    Move {
        #[arg(allow_negative_numbers = true)]
        pan: f64,
        #[arg(allow_negative_numbers = true)]
        tilt: f64,
    },

    /// Get or set the day/night mode (day, night, auto)
    Daynight {
        mode: Option<String>,
    },

    /// Get or set vertical image flip
    Flip {
        flag: Option<bool>,
    },

    /// Run the motor calibration routine
    CalibrateMotor,

    /// Reboot the camera
    Reboot,

    /// Show the runtime configuration
    Config,

    /// Calibration artifact tools (no camera connection)
    Calibration {
        #[command(subcommand)]
        command: CalibrationCommands,
    },
}

#[derive(Subcommand)]
enum CalibrationCommands {
    /// Write an uncalibrated pinhole model
    Default {
        width: u32,
        height: u32,

        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Print an artifact as JSON
    Show {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ptz=info,ptz_camera=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Calibration { command } = &cli.command {
        return calibration_command(command);
    }

    let paths = SetupPaths {
        config: &cli.config,
        env: &cli.env,
        calibration: cli.calibration.as_deref(),
    };

    tracing::info!(backend = ?cli.backend, config = %cli.config.display(), "connecting");
    let mut camera = match cli.backend {
        Backend::Simulated => setup(paths, SimulatedCamera::connect)
            .with_context(|| format!("failed to set up camera from {}", cli.config.display()))?,
    };

    camera_command(&mut camera, &cli.command)
}

fn camera_command<A: CameraApi>(camera: &mut Camera<A>, command: &Commands) -> Result<()> {
    match command {
        Commands::Url => println!("{}", camera.get_url()),
        Commands::Info => print_json(&camera.get_info()?)?,
        Commands::Specs => print_json(&camera.get_video_specs()?)?,
        Commands::Capabilities => print_json(&camera.get_video_capabilities()?)?,
        Commands::Move { pan, tilt } => {
            camera.move_motor(*pan, *tilt)?;
            println!(
                "{} pan={:.1}° tilt={:.1}°",
                "moved".green().bold(),
                camera.pan(),
                camera.tilt()
            );
        }
        Commands::Daynight { mode: None } => println!("{}", camera.get_daynight_mode()?),
        Commands::Daynight { mode: Some(mode) } => {
            let mode = parse_mode(mode)?;
            camera.set_daynight_mode(mode)?;
            println!("{} daynight={}", "set".green().bold(), mode);
        }
        Commands::Flip { flag: None } => println!("{}", camera.is_image_flipped()?),
        Commands::Flip { flag: Some(flag) } => {
            camera.flip_image(*flag)?;
            println!("{} flip_image={}", "set".green().bold(), flag);
        }
        Commands::CalibrateMotor => {
            camera.calibrate_motor()?;
            println!("{}", "motor calibration started".green().bold());
        }
        Commands::Reboot => {
            camera.reboot()?;
            println!("{}", "reboot requested".green().bold());
        }
        Commands::Config => print_json(&camera.get_config())?,
        Commands::Calibration { command } => calibration_command(command)?,
    }
    Ok(())
}

fn calibration_command(command: &CalibrationCommands) -> Result<()> {
    match command {
        CalibrationCommands::Default {
            width,
            height,
            output,
        } => {
            write_default_calibration(*width, *height, output)?;
            println!("{} {}", "wrote".green().bold(), output.display());
        }
        CalibrationCommands::Show { path } => {
            let calib = CalibrationData::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            print_json(&calib.to_mapping())?;
        }
    }
    Ok(())
}

fn write_default_calibration(width: u32, height: u32, output: &Path) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("width and height must be > 0");
    }
    CalibrationData::default(width, height)
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))
}

fn parse_mode(mode: &str) -> Result<DayNightMode> {
    mode.parse::<DayNightMode>().map_err(anyhow::Error::msg)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
