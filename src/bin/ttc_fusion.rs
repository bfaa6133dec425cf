use clap::Parser;
use lidar_camera_ttc::data_loader::load_frames;
use lidar_camera_ttc::io::{object_from_json, write_report, write_summary};
use lidar_camera_ttc::{FusionConfig, FusionPipeline};
use std::time::Instant;

#[derive(Parser)]
#[command(version, about, author)]
struct TtcCli {
    /// path to a folder of frame json files
    path: String,

    /// fusion config json, defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// output report path
    #[arg(short, long, default_value = "ttc_report.json")]
    output: String,

    /// optional plain text summary path
    #[arg(long)]
    summary: Option<String>,

    /// seed for the lidar outlier filter, overrides the config
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = TtcCli::parse();

    let mut config: FusionConfig = match &cli.config {
        Some(path) => object_from_json(path)?,
        None => FusionConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let pipeline = FusionPipeline::new(config)?;

    let now = Instant::now();
    let mut frames = load_frames(&cli.path)?;
    log::info!(
        "loaded {} frames in {:.3} sec",
        frames.len(),
        now.elapsed().as_secs_f64()
    );

    let now = Instant::now();
    let reports = pipeline.run_sequence(&mut frames)?;
    let duration_sec = now.elapsed().as_secs_f64();
    println!(
        "processed {} frame pairs in {:.6} sec",
        reports.len(),
        duration_sec
    );
    for r in &reports {
        for o in &r.objects {
            println!(
                "frame {:4} box {} -> {}: TTC lidar {:8.3} s, TTC camera {:8.3} s",
                r.frame_index, o.prev_box_id, o.curr_box_id, o.ttc_lidar, o.ttc_camera
            );
        }
    }

    write_report(&cli.output, pipeline.seed(), &reports)?;
    if let Some(summary) = &cli.summary {
        write_summary(summary, &reports)?;
    }
    Ok(())
}
