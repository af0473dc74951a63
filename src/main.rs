use std::path::PathBuf;

use anyhow::Context;
use bottom_pole_fusion::image_pipeline::{
    CameraModel, CameraRole, FusionConfig, PoleRemovalPipeline, TiffCompression,
};
use bottom_pole_fusion::logger;

use tracing::{error, info};

const USAGE: &str =
    "usage: bottom_pole_fusion <images_dir> <pole_mask_dir> <output_dir> [prev_frame_dir|NONE]";

fn demo_rig() -> Vec<CameraModel> {
    vec![
        CameraModel::new("cam15", CameraRole::Bottom, 1100.0),
        CameraModel::new("cam16", CameraRole::BottomSecondary, 1100.0).with_flip180(true),
    ]
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        anyhow::bail!(USAGE);
    }
    let prev_frame_data_dir = args
        .get(3)
        .filter(|dir| dir.as_str() != "NONE")
        .map(PathBuf::from);

    info!("Starting bottom pole removal...");

    let config = FusionConfig::builder()
        .images_dir(&args[0])
        .pole_mask_dir(&args[1])
        .output_data_dir(Some(PathBuf::from(&args[2])))
        .prev_frame_data_dir(prev_frame_data_dir)
        .save_debug_images(true)
        .save_flow_for_next_frame(true)
        .compression(TiffCompression::Lzw)
        .rig(demo_rig())
        .build();
    let pipeline = PoleRemovalPipeline::new(config);

    info!("Flow algorithm: {}", pipeline.config().flow_alg_name);
    info!(
        "Temporal seeding: {}",
        if pipeline.config().prev_frame_data_dir.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );

    match pipeline.combine_bottom_images() {
        Ok((model, combined)) => info!(
            "Fusion successful: {} {}x{}",
            model.camera_id, combined.width, combined.height
        ),
        Err(e) => {
            error!("Fusion failed: {}", e);
            return Err(e).context("combining bottom images");
        }
    }

    Ok(())
}
