use clap::{Parser, Subcommand};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::error::Error;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic fixture frames: two bright marks drifting
    /// across a dark field, separated by a fixed vertical gap
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of frames to generate
        #[arg(short, long, default_value = "20")]
        num_frames: usize,

        /// Image width
        #[arg(long, default_value = "640")]
        width: u32,

        /// Image height
        #[arg(long, default_value = "480")]
        height: u32,

        /// Vertical gap between the two marks, px (sized for the
        /// default acceptance band)
        #[arg(long, default_value = "210")]
        gap_px: u32,

        /// Horizontal offset between the two marks, px
        #[arg(long, default_value = "4")]
        x_offset_px: u32,

        /// Mark side length, px
        #[arg(long, default_value = "7")]
        mark_px: u32,

        /// Horizontal drift per frame, px
        #[arg(long, default_value = "2")]
        step_px: u32,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            num_frames,
            width,
            height,
            gap_px,
            x_offset_px,
            mark_px,
            step_px,
        } => {
            std::fs::create_dir_all(&output)?;
            let y0 = (height.saturating_sub(gap_px + mark_px)) / 2;
            for i in 0..num_frames {
                let mut frame = GrayImage::new(width, height);
                let span = width.saturating_sub(mark_px + x_offset_px + 120).max(1);
                let drift = (i as u32 * step_px) % span;
                let x0 = 60 + drift;
                for (x, y) in [(x0, y0), (x0 + x_offset_px, y0 + gap_px)] {
                    draw_filled_rect_mut(
                        &mut frame,
                        Rect::at(x as i32, y as i32).of_size(mark_px, mark_px),
                        Luma([255u8]),
                    );
                }
                let time_ns = i as i64 * 100000000;
                let path = Path::new(&output).join(format!("{}.png", time_ns));
                frame.save(&path)?;
            }
            println!("wrote {} frames to {}", num_frames, output);
        }
    }
    Ok(())
}
