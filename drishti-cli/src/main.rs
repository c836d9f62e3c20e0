// Drishti - perception-to-speech assistant
// Capture a frame, ask the detection service what it sees, speak the answer.

use clap::{Parser, Subcommand};
use drishti_core::PipelineEvent;
use drishti_detect::HttpDetectionClient;
use drishti_eye::{CameraManager, RecordingController, V4l2Device};
use drishti_pipeline::{DrishtiConfig, Orchestrator, PipelineError};
use drishti_spk::{EspeakEngine, SpeechSynthesizer};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drishti")]
#[command(about = "Drishti - embedded perception-to-speech assistant", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the perception-to-speech pipeline until interrupted
    Run {
        /// Override the detection endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Override the camera device index
        #[arg(long)]
        camera_index: Option<u32>,

        /// Disable session recording
        #[arg(long)]
        no_recording: bool,
    },

    /// Speak one phrase (audio device smoke check)
    Speak {
        /// Text to speak
        text: String,
    },

    /// Capture one frame (camera smoke check)
    Capture {
        /// Where to write the frame
        #[arg(long, short, default_value = "frame.jpg")]
        output: PathBuf,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<DrishtiConfig> {
    let config = match &cli.config {
        Some(path) => DrishtiConfig::load(path)?,
        None => DrishtiConfig::default(),
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Run {
            endpoint,
            camera_index,
            no_recording,
        } => {
            if let Some(endpoint) = endpoint {
                config.detection.endpoint = endpoint;
            }
            if let Some(index) = camera_index {
                config.camera.device_index = index;
            }
            if no_recording {
                config.recording.enabled = false;
            }
            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

            run_pipeline(config).await
        }

        Commands::Speak { text } => {
            let engine = Arc::new(EspeakEngine::new(Arc::new(config.speech))?);
            let synthesizer = SpeechSynthesizer::new(engine);
            synthesizer.speak(&text).await?;
            Ok(())
        }

        Commands::Capture { output } => {
            let camera_config = Arc::new(config.camera);
            let device = Arc::new(V4l2Device::new(camera_config.clone()));
            let camera = CameraManager::new(camera_config, device);
            camera.initialize().await?;
            let frame = camera.capture_frame().await?;
            tokio::fs::rename(&frame.path, &output).await?;
            camera.release().await;
            info!("Frame written to {}", output.display());
            Ok(())
        }
    }
}

async fn run_pipeline(config: DrishtiConfig) -> anyhow::Result<()> {
    info!("Starting Drishti pipeline...");

    let config = Arc::new(config);
    let camera_config = Arc::new(config.camera.clone());
    let device = Arc::new(V4l2Device::new(camera_config.clone()));
    let camera = Arc::new(CameraManager::new(camera_config, device));
    let recorder = Arc::new(RecordingController::new(
        Arc::new(config.recording.clone()),
        camera.clone(),
    ));

    let detector = Arc::new(HttpDetectionClient::new(Arc::new(config.detection.clone()))?);

    let engine = match EspeakEngine::new(Arc::new(config.speech.clone())) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            // Audio device failure at startup is unrecoverable
            error!("Speech engine initialization failed: {}", e);
            std::process::exit(1);
        }
    };
    let synthesizer = Arc::new(SpeechSynthesizer::new(engine));

    let orchestrator = Orchestrator::new(
        config,
        camera,
        recorder,
        detector,
        synthesizer,
        drishti_core::EventSink::default(),
    );

    // Best-effort observability: log pipeline events as they happen
    let mut events = orchestrator.events().subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                PipelineEvent::UtteranceSpoken { text } => info!("Spoke: {}", text),
                PipelineEvent::DetectionFailed { reason } => {
                    debug!("Detection failed: {}", reason)
                }
                other => debug!("Pipeline event: {:?}", other),
            }
        }
    });

    if let Err(e) = orchestrator.start().await {
        match e {
            PipelineError::DeviceInit(msg) => {
                error!("Device initialization failed: {}", msg);
                std::process::exit(1);
            }
            other => return Err(other.into()),
        }
    }

    info!("Pipeline running, press Ctrl+C to stop");
    signal::ctrl_c().await?;

    info!("Shutdown signal received");
    orchestrator.shutdown().await;
    Ok(())
}
