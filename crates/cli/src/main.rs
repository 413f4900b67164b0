use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use facescan_core::classification::domain::classifier_state::ClassifierState;
use facescan_core::classification::domain::face_classifier::FaceClassifier;
use facescan_core::classification::domain::frame_sink::{FrameSink, NullFrameSink};
use facescan_core::classification::infrastructure::image_directory_sink::ImageDirectorySink;
use facescan_core::detection::domain::encoding_comparator::DistanceComparator;
use facescan_core::detection::domain::face_detector::FaceDetector;
use facescan_core::detection::domain::face_encoder::FaceEncoder;
use facescan_core::detection::infrastructure::arcface_encoder::ArcFaceEncoder;
use facescan_core::detection::infrastructure::model_resolver;
use facescan_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use facescan_core::pipeline::infrastructure::sequential_scan_executor::SequentialScanExecutor;
use facescan_core::pipeline::infrastructure::threaded_scan_executor::ThreadedScanExecutor;
use facescan_core::pipeline::load_reference_use_case::LoadReferenceUseCase;
use facescan_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facescan_core::pipeline::run_directory;
use facescan_core::pipeline::scan_executor::ScanExecutor;
use facescan_core::pipeline::scan_report::{ScanOutcome, ScanReport};
use facescan_core::pipeline::scan_video_use_case::ScanVideoUseCase;
use facescan_core::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, IMAGE_EXTENSIONS, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use facescan_core::shared::download::ProgressFn;
use facescan_core::shared::face_encoding::DistanceMetric;
use facescan_core::shared::scan_config::{ScanConfig, ScanMode};
use facescan_core::shared::scan_error::ScanError;
use facescan_core::video::domain::video_reader::VideoReader;
use facescan_core::video::domain::video_source_resolver::{is_remote, VideoSourceResolver};
use facescan_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use facescan_core::video::infrastructure::http_video_resolver::HttpVideoResolver;
use facescan_core::video::infrastructure::image_file_reader::ImageFileReader;
use facescan_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Find the distinct faces in a video, or the moments a known face appears.
#[derive(Parser)]
#[command(name = "facescan", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save one thumbnail per distinct face seen in the video.
    Unique {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Report timestamps where the reference face appears.
    Match {
        /// Image containing the face to look for (first face is used).
        #[arg(long)]
        reference: PathBuf,

        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Video file path or direct http(s) link to a video file.
    video: String,

    /// Classify every Nth frame [default: 20 for unique, 5 for match].
    #[arg(long)]
    skip_frames: Option<usize>,

    /// Maximum encoding distance for two faces to be the same person (0.0-1.0).
    #[arg(long)]
    tolerance: Option<f64>,

    /// Encoding distance: cosine or euclidean.
    #[arg(long, default_value = "cosine")]
    metric: String,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Parent directory of the per-run output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Decode on a separate thread while classifying.
    #[arg(long)]
    threaded: bool,

    /// Write every classified frame, with faces outlined, to this directory.
    #[arg(long)]
    annotated_dir: Option<PathBuf>,

    /// Write a JSON report of the scan to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (config, confidence) = build_config(cli.command)?;
    config.validate()?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(format!("Confidence must be between 0.0 and 1.0, got {confidence}").into());
    }
    if is_image(Path::new(&config.video_source)) {
        return Err(format!(
            "Expected a video, got an image: {}",
            config.video_source
        )
        .into());
    }

    let run_id = run_directory::current_run_id();
    let run_dir = if run_directory::needs_run_dir(config.mode, &config.video_source) {
        let dir = run_directory::create_run_dir(&config.output_root, &run_id)?;
        log::info!("Writing results to {}", dir.display());
        dir
    } else {
        run_directory::run_dir(&config.output_root, &run_id)
    };

    let resolver = HttpVideoResolver::new()
        .with_progress(Box::new(|| progress_printer("Downloading video")));
    let video_path = resolver.resolve(&config.video_source, &run_dir)?;
    if is_remote(&config.video_source) {
        eprintln!();
    }

    let mut detector = build_detector(confidence)?;
    let mut encoder = build_encoder()?;

    let state = match (&config.mode, &config.reference_image) {
        (ScanMode::Match, Some(reference)) => {
            let encoding = LoadReferenceUseCase::new(Box::new(ImageFileReader::new()))
                .execute(reference, detector.as_mut(), encoder.as_mut())?;
            log::info!("Loaded reference face from {}", reference.display());
            ClassifierState::matching(encoding)
        }
        _ => ClassifierState::dedup(),
    };

    let mut reader: Box<dyn VideoReader> = Box::new(FfmpegReader::new());
    let metadata = reader
        .open(&video_path)
        .map_err(|e| ScanError::VideoOpen {
            path: video_path.clone(),
            reason: e.to_string(),
        })?;

    let classifier = FaceClassifier::new(
        detector,
        encoder,
        Box::new(DistanceComparator::new(config.metric)),
        Box::new(ImageFileWriter::new()),
        config.tolerance,
        run_dir,
    );
    let sink: Box<dyn FrameSink> = match &config.annotated_dir {
        Some(dir) => Box::new(ImageDirectorySink::new(
            dir.clone(),
            Box::new(ImageFileWriter::new()),
        )),
        None => Box::new(NullFrameSink),
    };
    let executor: Box<dyn ScanExecutor> = if config.threaded {
        Box::new(ThreadedScanExecutor::new())
    } else {
        Box::new(SequentialScanExecutor::new())
    };

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))?;

    let total = metadata.total_frames;
    let progress: Box<dyn Fn(usize, usize) -> bool + Send> = Box::new(move |current, _| {
        if total > 0 {
            eprint!("\rScanning frame {current}/{total}");
        } else {
            eprint!("\rScanning frame {current}");
        }
        true
    });

    let mut use_case = ScanVideoUseCase::new(
        reader,
        classifier,
        sink,
        executor,
        Box::new(StdoutPipelineLogger::default()),
        config.skip_interval,
        Some(progress),
        Some(cancelled),
    );
    let report = use_case.execute(&metadata, state)?;
    eprintln!();
    if report.cancelled {
        eprintln!(
            "Scan interrupted after {} frames; results so far:",
            report.frames_read
        );
    }

    print_report(&report);
    if let Some(path) = &config.report_path {
        write_report(&report, path)?;
        log::info!("Report written to {}", path.display());
    }
    Ok(())
}

/// Turns parsed arguments into a scan configuration plus the detector
/// confidence.
fn build_config(command: Command) -> Result<(ScanConfig, f64), Box<dyn std::error::Error>> {
    let (mut config, scan) = match command {
        Command::Unique { scan } => (ScanConfig::dedup(scan.video.clone()), scan),
        Command::Match { reference, scan } => {
            (ScanConfig::matching(scan.video.clone(), reference), scan)
        }
    };

    if let Some(skip) = scan.skip_frames {
        config.skip_interval = skip;
    }
    if let Some(tolerance) = scan.tolerance {
        config.tolerance = tolerance;
    }
    config.metric = scan.metric.parse::<DistanceMetric>()?;
    if let Some(root) = scan.output_dir {
        config.output_root = root;
    }
    config.threaded = scan.threaded;
    config.annotated_dir = scan.annotated_dir;
    config.report_path = scan.report;

    Ok((config, scan.confidence))
}

fn build_detector(confidence: f64) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        None,
        Some(progress_printer("Downloading face detection model")),
    )?;
    eprintln!();
    Ok(Box::new(OnnxYoloDetector::new(&model_path, confidence)?))
}

fn build_encoder() -> Result<Box<dyn FaceEncoder>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {EMBEDDING_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        EMBEDDING_MODEL_NAME,
        EMBEDDING_MODEL_URL,
        None,
        Some(progress_printer("Downloading face encoding model")),
    )?;
    eprintln!();
    Ok(Box::new(ArcFaceEncoder::new(&model_path)?))
}

fn print_report(report: &ScanReport) {
    match report.outcome() {
        ScanOutcome::NoResults => println!("{}", report.empty_message()),
        ScanOutcome::Found(count) => {
            for record in &report.records {
                match (&report.mode, &record.thumbnail) {
                    (ScanMode::Dedup, Some(thumbnail)) => {
                        println!("New face at {} -> {}", record.timestamp, thumbnail.display())
                    }
                    (ScanMode::Dedup, None) => println!("New face at {}", record.timestamp),
                    (ScanMode::Match, _) => println!("Match found at {}", record.timestamp),
                }
            }
            let noun = match report.mode {
                ScanMode::Dedup => "unique face(s)",
                ScanMode::Match => "match(es)",
            };
            log::info!(
                "{count} {noun} in {} sampled of {} frames",
                report.frames_classified,
                report.frames_read
            );
        }
    }
}

fn write_report(report: &ScanReport, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Download progress on stderr, prefixed with `label`.
fn progress_printer(label: &'static str) -> ProgressFn {
    Box::new(move |downloaded, total| {
        if total > 0 {
            let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
            eprint!("\r{label}... {pct}%");
        } else {
            eprint!("\r{label}... {downloaded} bytes");
        }
    })
}
