//! Gaze Pipeline - Main Entry Point
//!
//! Usage: `gaze-pipeline [config-file]`

use std::path::PathBuf;

use anyhow::{bail, Context};
use eye_crop::CropStore;
use gaze_pipeline::{
    init_logging, BlendShapeStrategy, GazeMode, GazeRun, GeometricStrategy, PipelineConfig,
    ReplaySource, RunOutput,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Gaze Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = PipelineConfig::load(config_path.as_deref()).context("loading configuration")?;

    let Some(input) = config.input.as_ref() else {
        bail!("no input replay file configured (set `input` or GAZE_INPUT)");
    };
    let replay = ReplaySource::from_path(input)
        .with_context(|| format!("reading replay file {}", input.display()))?;

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let RunOutput { summary, log } = match config.mode {
        GazeMode::BlendShape => {
            let (frames, detector) = replay.split(false);
            GazeRun::new(frames, BlendShapeStrategy::new(detector), config.fps)
                .execute()
                .await?
        }
        GazeMode::Geometric => {
            let (frames, detector) = replay.split(config.write_crops);
            let mut run = GazeRun::new(frames, GeometricStrategy::new(detector), config.fps);
            if config.write_crops {
                let store = CropStore::new(&config.output_dir, config.crop_padding);
                store.reset()?;
                run = run.with_crops(store);
            }
            run.execute().await?
        }
    };

    log.write_json(config.json_output())?;
    if config.mode == GazeMode::Geometric {
        log.write_csv(config.csv_output())?;
    }

    info!("Run summary: {}", serde_json::to_string(&summary)?);
    Ok(())
}
