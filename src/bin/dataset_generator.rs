use clap::{Parser, Subcommand};
use lidar_camera_ttc::FusionConfig;
use lidar_camera_ttc::io::object_to_json;
use lidar_camera_ttc::synthetic::{SyntheticConfig, generate_sequence};
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic sequence of a vehicle closing in
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of frames to generate
        #[arg(short, long, default_value = "10")]
        num_frames: usize,

        /// Distance to the vehicle at the first frame
        #[arg(long, default_value = "8.0")]
        initial_distance: f64,

        /// Closing speed, positive when approaching
        #[arg(long, default_value = "5.0")]
        closing_speed: f64,

        /// Uniform range noise of the lidar returns
        #[arg(long, default_value = "0.0")]
        range_noise: f64,

        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            num_frames,
            initial_distance,
            closing_speed,
            range_noise,
            seed,
        } => {
            let config = SyntheticConfig {
                initial_distance,
                closing_speed,
                range_noise,
                seed,
                ..Default::default()
            };
            generate_dataset(&output, &config, num_frames)?;
        }
    }

    Ok(())
}

fn generate_dataset(
    output_dir: &str,
    config: &SyntheticConfig,
    num_frames: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output_dir)?;
    let frames = generate_sequence(config, num_frames)?;
    for (frame_idx, frame) in frames.iter().enumerate() {
        object_to_json(
            Path::new(output_dir).join(format!("{:06}.json", frame_idx)),
            frame,
        )?;
    }

    let fusion_config = FusionConfig {
        frame_rate: config.frame_rate,
        seed: Some(config.seed),
        calibration: config.calibration.clone(),
        ..Default::default()
    };
    object_to_json(Path::new(output_dir).join("config.json"), &fusion_config)?;

    println!("Generated {} frames in {}", num_frames, output_dir);
    for frame_idx in 1..num_frames {
        log::info!(
            "frame {}: ground truth TTC {:.3} s",
            frame_idx,
            config.ground_truth_ttc(frame_idx)
        );
    }
    Ok(())
}
