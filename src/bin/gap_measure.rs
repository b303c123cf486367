use clap::Parser;
use fiducial_gap::config::{GapConfig, MeasureMode};
use fiducial_gap::frame_source::FolderSource;
use fiducial_gap::io::{object_from_json, write_report};
use fiducial_gap::pipeline::{NoControl, run_session};
use std::error::Error;
use std::path::Path;
use std::time::Instant;

#[derive(Parser)]
#[command(version, about, author)]
struct FgrsCli {
    /// path to image folder
    path: String,

    /// measurement variant
    #[arg(value_enum, default_value = "contour")]
    mode: MeasureMode,

    /// session configuration JSON (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// scale factor override, micrometers per pixel
    #[arg(long)]
    scale: Option<f32>,

    /// directory for frames saved on the save command
    #[arg(long, default_value = "output_image")]
    save_dir: String,

    /// save the rerun recording to this .rrd file instead of spawning a viewer
    #[arg(long)]
    rerun_save: Option<String>,

    /// disable rerun logging
    #[arg(long)]
    no_rerun: bool,

    /// session report output path
    #[arg(long, default_value = "gap_report.txt")]
    report: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = FgrsCli::parse();

    let mut config = match &cli.config {
        Some(path) => object_from_json::<GapConfig>(path)?,
        None => GapConfig::default(),
    };
    config.mode = cli.mode;
    if let Some(scale) = cli.scale {
        config.scale_um_per_px = scale;
    }

    let recording = if cli.no_rerun {
        None
    } else {
        let builder = rerun::RecordingStreamBuilder::new("fiducial-gap");
        Some(match &cli.rerun_save {
            Some(path) => builder.save(path)?,
            None => builder.spawn()?,
        })
    };

    let mut source = FolderSource::new(&cli.path, config.prescale);
    let mut control = NoControl;
    let now = Instant::now();
    let summary = run_session(
        &config,
        &mut source,
        &mut control,
        Some(Path::new(&cli.save_dir)),
        recording.as_ref(),
    )?;
    let duration_sec = now.elapsed().as_secs_f64();
    println!("session took {:.6} sec", duration_sec);
    if summary.frames > 0 {
        println!("avg: {} sec", duration_sec / summary.frames as f64);
    }
    match &summary.final_measurement {
        Some(m) => println!(
            "X-Difference is {:.2} um / Y-Difference is {:.2} um",
            m.abs_x_um(),
            m.abs_y_um()
        ),
        None => println!("no qualifying measurement observed"),
    }
    write_report(&cli.report, &config, &summary)?;
    Ok(())
}
