use clap::{Parser, Subcommand};
use printcheck::imaging::RustCodec;
use printcheck::units::DEFAULT_PRINT_DPI;
use printcheck::validate::ValidationRequirements;
use printcheck::{batch, config, output, prepare, units, validate};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Shared flags for commands that validate uploads.
#[derive(clap::Args, Clone)]
struct RequirementArgs {
    /// Requirement profile (TOML); flags below override its values
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Ordered print width in cm (enables the physical-size check)
    #[arg(long)]
    width_cm: Option<f64>,

    /// Ordered print height in cm
    #[arg(long)]
    height_cm: Option<f64>,

    /// Minimum DPI before a quality warning is raised
    #[arg(long)]
    min_dpi: Option<f64>,

    /// Allowed physical-size deviation in cm
    #[arg(long)]
    tolerance_cm: Option<f64>,

    /// Emit the result as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "printcheck")]
#[command(about = "Print-quality validation for uploaded photos")]
#[command(long_about = "\
Print-quality validation for uploaded photos

Checks whether an image file can be printed at an ordered physical size,
derives the size it will actually print at, and re-encodes accepted uploads
with the print resolution embedded.

Hard failures (wrong format, oversize file, too few pixels) reject the file.
Quality findings (missing or low DPI, physical size outside tolerance) are
warnings: the file is accepted and the findings are on the record.

Requirements come from a TOML profile, from flags, or both - flags override
the profile. Run 'printcheck gen-profile' for a documented starting point.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a single image against print requirements
    Check {
        /// Image file to validate
        file: PathBuf,
        #[command(flatten)]
        requirements: RequirementArgs,
    },
    /// Re-encode an accepted image with the print resolution embedded
    Prepare {
        /// Image file to prepare
        file: PathBuf,
        /// Where to write the corrected file (default: alongside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Density to embed (default: profile target_dpi, or 300)
        #[arg(long)]
        dpi: Option<u32>,
        /// Requirement profile supplying target_dpi
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Emit the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the minimum pixel dimensions for a print size
    Pixels {
        /// Print width in cm
        width_cm: f64,
        /// Print height in cm
        height_cm: f64,
        /// Print resolution
        #[arg(long, default_value_t = DEFAULT_PRINT_DPI)]
        dpi: u32,
    },
    /// Validate every photo in a directory
    Batch {
        /// Directory to walk for jpg/jpeg/png files
        dir: PathBuf,
        #[command(flatten)]
        requirements: RequirementArgs,
    },
    /// Print a stock requirement profile with all options documented
    GenProfile,
}

/// Merge a profile (or the stock defaults) with flag overrides.
fn resolve_requirements(
    args: &RequirementArgs,
) -> Result<ValidationRequirements, Box<dyn std::error::Error>> {
    let profile = match &args.profile {
        Some(path) => config::load_profile(path)?,
        None => config::PrintProfile::default(),
    };
    let mut requirements = profile.requirements();

    if args.width_cm.is_some() {
        requirements.expected_width_cm = args.width_cm;
    }
    if args.height_cm.is_some() {
        requirements.expected_height_cm = args.height_cm;
    }
    if args.min_dpi.is_some() {
        requirements.min_dpi = args.min_dpi;
    }
    if args.tolerance_cm.is_some() {
        requirements.tolerance_cm = args.tolerance_cm;
    }
    Ok(requirements)
}

/// Default output path for `prepare`: `photo.jpg` becomes `photo-print.jpg`,
/// with the extension matching the stored format.
fn prepared_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "prepared".to_string());
    input.with_file_name(format!("{stem}-print.{extension}"))
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let codec = RustCodec::new();

    match cli.command {
        Command::Check { file, requirements } => {
            let resolved = resolve_requirements(&requirements)?;
            let bytes = std::fs::read(&file)?;
            let result = validate::validate_image(&codec, &bytes, &resolved);

            if requirements.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::print_validation(&file.display().to_string(), &result);
            }
            if !result.is_valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Prepare {
            file,
            output: output_path,
            dpi,
            profile,
            json,
        } => {
            let target_dpi = match (dpi, &profile) {
                (Some(dpi), _) => dpi,
                (None, Some(path)) => config::load_profile(path)?.target_dpi,
                (None, None) => DEFAULT_PRINT_DPI,
            };
            if target_dpi == 0 {
                return Err("dpi must be positive".into());
            }

            let bytes = std::fs::read(&file)?;
            let prepared = prepare::prepare_for_print(&codec, &bytes, target_dpi)?;

            let destination = output_path
                .unwrap_or_else(|| prepared_output_path(&file, prepared.extension()));
            std::fs::write(&destination, &prepared.buffer)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&prepared)?);
            } else {
                output::print_prepared(&file, &destination, &prepared);
            }
        }
        Command::Pixels {
            width_cm,
            height_cm,
            dpi,
        } => {
            if dpi == 0 {
                return Err("dpi must be positive".into());
            }
            if width_cm <= 0.0 || height_cm <= 0.0 {
                return Err("print dimensions must be positive".into());
            }
            let px = units::required_pixels(width_cm, height_cm, f64::from(dpi));
            output::print_required_pixels(width_cm, height_cm, dpi, px);
        }
        Command::Batch { dir, requirements } => {
            let resolved = resolve_requirements(&requirements)?;
            let report = batch::validate_dir(&codec, &dir, &resolved)?;

            if requirements.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_batch_report(&report);
            }
            if report.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenProfile => {
            print!("{}", config::stock_profile_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
