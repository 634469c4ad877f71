//! Batch tool that fits square face boxes for landmark-annotated images.
//!
//! Usage:
//!   face-fit data/*.pts                          # Fit and report
//!   face-fit data/*.pts -o export/               # Also write crops + landmarks
//!   face-fit data/*.pts -o export/ --skip-degraded
//!   face-fit data/*.pts --detector seeta.bin     # Prefer detector boxes
//!   face-fit data/*.pts --json                   # JSON summary

use clap::Parser;
use face_fit::{
    extract_face, points_in_image, read_pts, CropLabel, ExportParams, FaceBoxFitter, FitOutcome,
    FitParams, ImageBounds,
};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "face-fit")]
#[command(author, version, about = "Fit square face boxes around facial landmarks", long_about = None)]
struct Args {
    /// Landmark files (.pts); the image is the sibling .jpg or .png
    #[arg(required = true)]
    pts: Vec<PathBuf>,

    /// Directory for face crops and normalized landmark JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not export crops for samples that fell back to the minimal box
    #[arg(long)]
    skip_degraded: bool,

    /// Side length of exported crops
    #[arg(long, default_value = "128")]
    target_size: u32,

    /// Margin applied to the landmark box when no detection is used
    #[arg(long, default_value = "1.2")]
    margin: f64,

    /// Ignore detections scoring below this
    #[arg(long, default_value = "0.5")]
    min_confidence: f64,

    /// Number of landmarks each file must contain
    #[arg(long, default_value = "68")]
    landmarks: usize,

    /// SeetaFace face detector model path
    #[arg(long)]
    detector: Option<PathBuf>,

    /// Minimum face size for detection
    #[arg(long, default_value = "20")]
    min_face_size: u32,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Per-run counters.
#[derive(Serialize, Default)]
struct Summary {
    total: usize,
    invalid: usize,
    degraded: usize,
    succeeded: usize,
    samples: Vec<SampleOutput>,
}

#[derive(Serialize)]
struct SampleOutput {
    pts: String,
    #[serde(flatten)]
    outcome: FitOutcome,
}

/// Export destination. Tracks the file names already written in this run
/// so samples with the same stem from different directories do not
/// overwrite each other.
struct OutputDir {
    dir: PathBuf,
    skip_degraded: bool,
    used_names: HashSet<String>,
}

impl OutputDir {
    fn new(dir: PathBuf, skip_degraded: bool) -> Self {
        Self {
            dir,
            skip_degraded,
            used_names: HashSet::new(),
        }
    }

    /// Claim an output name for `pts_path`: its stem, else the stem prefixed
    /// with the parent directory name, else the stem with a counter.
    fn claim_name(&mut self, pts_path: &Path) -> Result<String, Box<dyn std::error::Error>> {
        let stem = pts_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or("invalid file name")?;
        if self.used_names.insert(stem.to_string()) {
            return Ok(stem.to_string());
        }

        let parent = pts_path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str());
        let name = parent
            .map(|p| format!("{p}-{stem}"))
            .into_iter()
            .chain((2..).map(|n| format!("{stem}-{n}")))
            .find(|name| self.used_names.insert(name.clone()))
            .ok_or("no free output name")?;
        warn!(
            "output name {:?} already used, writing {} as {:?}",
            stem,
            pts_path.display(),
            name
        );
        Ok(name)
    }
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let fit_params = FitParams::default()
        .with_margin_ratio(args.margin)
        .with_min_confidence(args.min_confidence);
    fit_params.validate()?;
    let export_params = ExportParams {
        target_size: args.target_size,
        expected_landmarks: args.landmarks,
    };
    export_params.validate()?;

    let mut fitter = FaceBoxFitter::new().params(fit_params);
    if let Some(path) = &args.detector {
        fitter = attach_detector(fitter, path, args.min_face_size)?;
    }

    let mut output = match &args.output {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Some(OutputDir::new(dir.clone(), args.skip_degraded))
        }
        None => None,
    };

    let mut summary = Summary {
        total: args.pts.len(),
        ..Summary::default()
    };

    for pts_path in &args.pts {
        match process_sample(pts_path, &fitter, &export_params, output.as_mut()) {
            Ok(outcome) => {
                if outcome.is_degraded() {
                    summary.degraded += 1;
                } else {
                    summary.succeeded += 1;
                }
                summary.samples.push(SampleOutput {
                    pts: pts_path.display().to_string(),
                    outcome,
                });
            }
            Err(e) => {
                warn!("skipping {}: {}", pts_path.display(), e);
                summary.invalid += 1;
            }
        }
    }

    let output_str = if args.json {
        serde_json::to_string_pretty(&summary)?
    } else {
        format_human_readable(&summary)
    };
    println!("{}", output_str);

    Ok(())
}

#[cfg(feature = "rustface")]
fn attach_detector(
    fitter: FaceBoxFitter,
    path: &Path,
    min_face_size: u32,
) -> Result<FaceBoxFitter, Box<dyn std::error::Error>> {
    info!("loading face detector from {}", path.display());
    let detector = face_fit::RustfaceDetector::from_path(path)?.min_face_size(min_face_size);
    Ok(fitter.face_detector(Box::new(detector)))
}

#[cfg(not(feature = "rustface"))]
fn attach_detector(
    _fitter: FaceBoxFitter,
    _path: &Path,
    _min_face_size: u32,
) -> Result<FaceBoxFitter, Box<dyn std::error::Error>> {
    Err("this build has no face detector; enable the `rustface` feature".into())
}

fn process_sample(
    pts_path: &Path,
    fitter: &FaceBoxFitter,
    export_params: &ExportParams,
    output: Option<&mut OutputDir>,
) -> Result<FitOutcome, Box<dyn std::error::Error>> {
    let shape = read_pts(pts_path)?;
    shape.validate(export_params.expected_landmarks)?;

    let image_path = find_image(pts_path)
        .ok_or_else(|| format!("no .jpg or .png next to {}", pts_path.display()))?;
    let img = image::open(&image_path)?;
    let gray = img.to_luma8();
    let bounds = ImageBounds::new(gray.width(), gray.height());

    if !points_in_image(&shape.points, bounds) {
        return Err("landmarks fall outside the image".into());
    }

    let outcome = fitter.fit(gray.as_raw(), bounds.width, bounds.height, &shape)?;
    debug!(
        "{}: {:?} via {:?} ({:?})",
        pts_path.display(),
        outcome.face_box,
        outcome.stage,
        outcome.source
    );

    let Some(output) = output else {
        return Ok(outcome);
    };
    if output.skip_degraded && outcome.is_degraded() {
        info!("not exporting degraded sample {}", pts_path.display());
        return Ok(outcome);
    }

    let crop = extract_face(&img, &shape, outcome.face_box, export_params.target_size)?;
    let name = output.claim_name(pts_path)?;

    let image_url = output.dir.join(format!("{name}.jpg"));
    crop.image.to_rgb8().save(&image_url)?;

    let json_url = output.dir.join(format!("{name}.json"));
    let label = CropLabel::new(&crop, &outcome);
    std::fs::write(&json_url, serde_json::to_string(&label)?)?;

    info!("saved {} and {}", image_url.display(), json_url.display());

    Ok(outcome)
}

/// The image annotated by a `.pts` file shares its stem.
fn find_image(pts_path: &Path) -> Option<PathBuf> {
    ["jpg", "png"]
        .iter()
        .map(|ext| pts_path.with_extension(ext))
        .find(|p| p.exists())
}

fn format_human_readable(summary: &Summary) -> String {
    let mut s = String::new();

    for sample in &summary.samples {
        let b = sample.outcome.face_box;
        s.push_str(&format!(
            "{}: ({}, {}, {}, {}) {:?}{}\n",
            sample.pts,
            b.left,
            b.top,
            b.right,
            b.bottom,
            sample.outcome.stage,
            if sample.outcome.is_degraded() { " [degraded]" } else { "" }
        ));
    }

    s.push_str(&format!(
        "\nTotal files: {}, invalid: {}, degraded: {}, succeeded: {}\n",
        summary.total, summary.invalid, summary.degraded, summary.succeeded
    ));

    s
}
