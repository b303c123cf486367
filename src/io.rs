use std::io::Write;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use serde::{Serialize, de::DeserializeOwned};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::config::GapConfig;
use crate::error::Error;
use crate::pipeline::SessionSummary;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: &str, object: &T) -> Result<(), Error> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &str) -> Result<T, Error> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Timestamp-derived basename for a saved frame.
pub fn frame_basename() -> Result<String, Error> {
    let fmt = format_description!(
        "[year]-[month]-[day][hour]-[minute]-[second]-[subsecond digits:6]"
    );
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(&fmt)?)
}

/// Write the current overlay to `dir` under a timestamp-derived name.
/// Invoked only on the operator's save command.
pub fn save_frame(overlay: &RgbaImage, dir: &Path) -> Result<PathBuf, Error> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.jpg", frame_basename()?));
    // JPEG carries no alpha channel.
    let rgb = DynamicImage::ImageRgba8(overlay.clone()).to_rgb8();
    rgb.save(&path)?;
    Ok(path)
}

/// Writes a session report to a text file.
pub fn write_report(
    output_path: &str,
    cfg: &GapConfig,
    summary: &SessionSummary,
) -> Result<(), Error> {
    let mut s = String::new();
    s += format!("Measurement mode: {:?}\n", cfg.mode).as_str();
    s += format!("Scale factor: {:.3} um/px\n\n", cfg.scale_um_per_px).as_str();
    s += format!("frames processed:       {}\n", summary.frames).as_str();
    s += format!("frames with candidates: {}\n", summary.frames_with_candidates).as_str();
    s += format!("measurement updates:    {}\n", summary.measurement_updates).as_str();
    s += format!("frames saved:           {}\n\n", summary.saved_frames).as_str();
    match &summary.final_measurement {
        Some(m) => {
            s += format!("final X-Difference: {:.2} um\n", m.abs_x_um()).as_str();
            s += format!("final Y-Difference: {:.2} um\n", m.abs_y_um()).as_str();
        }
        None => {
            s += "no qualifying measurement observed\n";
        }
    }
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(s.as_bytes())?;
    Ok(())
}
