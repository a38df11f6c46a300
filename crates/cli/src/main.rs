use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use liveness_core::analysis::infrastructure::stdio_frame_analyzer::StdioFrameAnalyzer;
use liveness_core::detection::domain::face_detector::FaceDetector;
use liveness_core::detection::infrastructure::model_resolver;
use liveness_core::detection::infrastructure::onnx_blazeface_detector::OnnxBlazefaceDetector;
use liveness_core::ingress::domain::sampled_frame::FrameBatch;
use liveness_core::ingress::infrastructure::bundle_source::{read_bundle_file, BundleSource};
use liveness_core::ingress::infrastructure::video_source::VideoSource;
use liveness_core::pipeline::pipeline_config::PipelineConfig;
use liveness_core::pipeline::verify_liveness_use_case::VerifyLivenessUseCase;
use liveness_core::shared::constants::BLAZEFACE_MODEL_NAME;
use liveness_core::shared::screen_color::ScreenColor;
use liveness_core::video::infrastructure::ffmpeg_reader::FfmpegReader;

/// Liveness verdicts for frame bundles and recorded videos.
#[derive(Parser)]
#[command(name = "liveness-verify")]
struct Cli {
    /// Pipeline config file (JSON). Defaults to the per-user config if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Average engine confidence a request must exceed to pass.
    #[arg(long)]
    threshold: Option<f64>,

    /// Smallest face box, in pixels per side, that counts as a face.
    #[arg(long)]
    min_face_size: Option<u32>,

    /// BlazeFace ONNX model file. Looked up in the model cache if omitted.
    #[arg(long)]
    detector_model: Option<PathBuf>,

    /// Where to download the detector model when it is not cached.
    #[arg(long)]
    detector_model_url: Option<String>,

    /// Analysis engine executable, spoken to over stdin/stdout.
    #[arg(long)]
    engine: PathBuf,

    /// Argument passed to the engine (repeatable).
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a JSON array of frame records.
    Bundle {
        /// Bundle file.
        file: PathBuf,
    },
    /// Verify a recorded video.
    Video {
        /// Video file.
        file: PathBuf,

        /// Wallet the recording belongs to.
        #[arg(long)]
        wallet: Option<String>,

        /// Screen colour shown during the recording (default RED).
        #[arg(long)]
        screen_color: Option<ScreenColor>,

        /// Thin the video to roughly this many frames per second.
        #[arg(long)]
        sample_fps: Option<f64>,
    },
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
    let config = build_config(&cli)?;

    let batch = load_batch(&cli.command, &config)?;
    let detector = build_detector(&cli, &config)?;

    let mut analyzer = StdioFrameAnalyzer::new(&cli.engine, &cli.engine_args);
    analyzer.start()?;

    let mut use_case = VerifyLivenessUseCase::new(detector, Box::new(analyzer), &config);
    let result = use_case.execute(batch);

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

fn build_config(cli: &Cli) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = PipelineConfig::load_or_default(cli.config.as_deref())?;
    if let Some(threshold) = cli.threshold {
        config.verdict_threshold = threshold;
    }
    if let Some(size) = cli.min_face_size {
        config.min_face_size = size;
    }
    if let Command::Video {
        sample_fps: Some(fps),
        ..
    } = cli.command
    {
        config.video_sample_fps = Some(fps);
    }
    config.validate()?;
    Ok(config)
}

fn load_batch(
    command: &Command,
    config: &PipelineConfig,
) -> Result<FrameBatch, Box<dyn std::error::Error>> {
    match command {
        Command::Bundle { file } => {
            let records = read_bundle_file(file)?;
            Ok(BundleSource::load(records))
        }
        Command::Video {
            file,
            wallet,
            screen_color,
            ..
        } => {
            let stream = open_video(file)?;
            let mut source = VideoSource::new(Box::new(FfmpegReader::new()))
                .with_sample_fps(config.video_sample_fps);
            Ok(source.load_stream(stream, wallet.as_deref(), screen_color.clone()))
        }
    }
}

fn open_video(path: &Path) -> Result<BufReader<File>, Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("Input file not found: {}", path.display()).into());
    }
    Ok(BufReader::new(File::open(path)?))
}

fn build_detector(
    cli: &Cli,
    config: &PipelineConfig,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {BLAZEFACE_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        BLAZEFACE_MODEL_NAME,
        cli.detector_model.as_deref(),
        cli.detector_model_url.as_deref(),
        Some(Box::new(download_progress)),
    )?;

    Ok(Box::new(OnnxBlazefaceDetector::new(
        &model_path,
        config.detector_confidence,
    )?))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
    if total > 0 && downloaded >= total {
        eprintln!();
    }
}
