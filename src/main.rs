use fiducial_gap::config::GapConfig;
use fiducial_gap::frame_source::load_folder_candidates;
use fiducial_gap::visualization::log_candidate_frames;
use std::time::Instant;

fn main() {
    env_logger::init();
    let config = GapConfig::default();
    let frames_root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/frames".to_string());
    let now = Instant::now();
    let recording = rerun::RecordingStreamBuilder::new("fiducial-gap")
        .spawn()
        .unwrap();
    let detected_frames = load_folder_candidates(&frames_root, &config, Some(&recording));
    let duration_sec = now.elapsed().as_secs_f64();
    println!("detecting candidates took {:.6} sec", duration_sec);
    println!(
        "avg: {} sec",
        duration_sec / detected_frames.len() as f64
    );
    log_candidate_frames(&recording, "batch", &detected_frames);
}
