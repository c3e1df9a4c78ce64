//! framediff CLI - Visual change detection between two frames
//!
//! Compares two images and reports clustered regions of significant
//! change as machine-readable JSON on stdout. When changes are found,
//! an annotated copy of the second image with red outlines around each
//! detected region is written next to it (or to an explicit output
//! path).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use framediff_analysis::{CompareParams, compare};
use framediff_core::RasterImage;
use serde::Serialize;

/// Detect clustered visual changes between two frames
///
/// Compares IMAGE1 (reference) against IMAGE2 (candidate) and prints a
/// JSON report to stdout. A cluster hit count of 0 means the frames
/// match; any other value means visible change was detected and an
/// annotated difference image was written.
#[derive(Parser, Debug)]
#[command(name = "framediff")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Compare two frames:
        framediff reference.jpg candidate.jpg

    Ignore regions not marked in a mask image:
        framediff -m mask.png reference.jpg candidate.jpg

    Tolerate larger per-pixel differences:
        framediff -s 40 reference.jpg candidate.jpg

    Normalize when one frame is grayscale:
        framediff -g reference.jpg candidate.jpg

EXIT CODES:
    0 - Comparison completed (check cluster_hit_counter in the output)
    1 - Error (file not found, decode failure, size mismatch, etc.)")]
struct Cli {
    /// Reference image
    #[arg(value_name = "IMAGE1")]
    image1: PathBuf,

    /// Candidate image to compare against the reference
    #[arg(value_name = "IMAGE2")]
    image2: PathBuf,

    /// Where to write the annotated difference image
    ///
    /// Defaults to the candidate path with `_diff` inserted before the
    /// extension. Only written when at least one cluster hit is found.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Mask image; only pixels where the mask's first channel is 255
    /// participate in the comparison
    #[arg(short, long, value_name = "FILE")]
    mask: Option<PathBuf>,

    /// Per-pixel sensitivity threshold (0-255)
    ///
    /// A pixel counts as changed when the average absolute channel
    /// difference exceeds this value.
    #[arg(short, long, default_value = "20", value_name = "LEVEL")]
    sensitivity: u8,

    /// Side length of the cluster detection window, in pixels
    #[arg(short, long, default_value = "12", value_name = "PIXELS")]
    cluster_size: u32,

    /// Fraction of the window area that must be changed pixels for a
    /// cluster hit
    #[arg(short = 't', long, default_value = "0.5", value_name = "FACTOR")]
    threshold_factor: f32,

    /// Desaturate the color frame when exactly one input is grayscale
    #[arg(short, long)]
    grayscale_normalize: bool,

    /// Print the resolved configuration to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report {
    cluster_hit_counter: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    difference_image: Option<String>,
}

#[derive(Serialize)]
struct ErrorReport {
    error: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("image1:             {}", cli.image1.display());
        eprintln!("image2:             {}", cli.image2.display());
        if let Some(mask) = &cli.mask {
            eprintln!("mask:               {}", mask.display());
        }
        eprintln!("sensitivity:        {}", cli.sensitivity);
        eprintln!("cluster size:       {}", cli.cluster_size);
        eprintln!("threshold factor:   {}", cli.threshold_factor);
        eprintln!("grayscale norm:     {}", cli.grayscale_normalize);
    }

    match run(&cli) {
        Ok(report) => {
            println!("{}", serde_json::to_string(&report).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let report = ErrorReport { error: e };
            println!("{}", serde_json::to_string(&report).unwrap_or_default());
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<Report, String> {
    let reference = load_image(&cli.image1)?;
    let candidate = load_image(&cli.image2)?;
    let mask = cli.mask.as_deref().map(load_image).transpose()?;

    let params = CompareParams {
        sensitivity: cli.sensitivity,
        cluster_square_size: cli.cluster_size,
        cluster_threshold_factor: cli.threshold_factor,
        grayscale_normalize: cli.grayscale_normalize,
        ..CompareParams::default()
    };

    let result = compare(reference, candidate, mask.as_ref(), &params)
        .map_err(|e| format!("comparison failed: {e}"))?;

    let difference_image = match result.annotated {
        Some(annotated) => {
            let out_path = cli
                .output
                .clone()
                .unwrap_or_else(|| derive_output_path(&cli.image2));
            framediff_io::write_image(&annotated, &out_path)
                .map_err(|e| format!("failed to write '{}': {e}", out_path.display()))?;
            Some(out_path.display().to_string())
        }
        None => None,
    };

    Ok(Report {
        cluster_hit_counter: result.hit_count,
        difference_image,
    })
}

fn load_image(path: &Path) -> Result<RasterImage, String> {
    framediff_io::read_image(path).map_err(|e| format!("failed to load '{}': {e}", path.display()))
}

/// Default annotated-image path: the candidate's path with `_diff`
/// inserted before the extension.
fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("candidate");
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_diff.{ext}"),
        None => format!("{stem}_diff"),
    };
    input.with_file_name(name)
}
