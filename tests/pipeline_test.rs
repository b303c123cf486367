use fiducial_gap::config::{GapConfig, MeasureMode};
use fiducial_gap::frame_source::{FrameSource, TimedFrame};
use fiducial_gap::pipeline::{
    ControlPoll, NoControl, SessionCommand, process_frame, run_session,
};
use fiducial_gap::types::{MeasureState, Measurement};
use image::GrayImage;

struct ScriptedSource {
    frames: Vec<TimedFrame>,
}

impl ScriptedSource {
    fn blank(count: usize, w: u32, h: u32) -> ScriptedSource {
        ScriptedSource {
            frames: (0..count)
                .map(|i| TimedFrame {
                    time_ns: i as i64 * 100000000,
                    gray: GrayImage::new(w, h),
                })
                .collect(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Option<TimedFrame> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }
}

struct ScriptedControl {
    commands: Vec<SessionCommand>,
    next: usize,
}

impl ControlPoll for ScriptedControl {
    fn poll(&mut self) -> SessionCommand {
        let cmd = self
            .commands
            .get(self.next)
            .copied()
            .unwrap_or(SessionCommand::None);
        self.next += 1;
        cmd
    }
}

#[test]
fn test_empty_frames_carry_measurement_forward() {
    for mode in [MeasureMode::Corner, MeasureMode::Contour] {
        let cfg = GapConfig {
            mode,
            ..Default::default()
        };
        let mut state = MeasureState::new();
        state.update(Measurement::new(220.0, 41.25));

        let mut seen = Vec::new();
        for i in 0..5 {
            let frame = GrayImage::new(64, 64);
            let out = process_frame(&cfg, &mut state, &frame, i);
            assert!(out.candidates.is_empty());
            seen.push(out.measurement);
        }
        // Identical across all five frames: no decay, no reset.
        for m in &seen {
            assert_eq!(*m, Some(Measurement::new(220.0, 41.25)));
        }
        assert_eq!(state.frames_since_update, 5);
    }
}

#[test]
fn test_fresh_state_has_no_readout() {
    let cfg = GapConfig::default();
    let mut state = MeasureState::new();
    let frame = GrayImage::new(48, 32);
    let out = process_frame(&cfg, &mut state, &frame, 0);
    assert!(out.measurement.is_none());
    assert!(out.readout.is_none());
    assert_eq!((out.overlay.width(), out.overlay.height()), (48, 32));
}

#[test]
fn test_readout_follows_carried_measurement() {
    let cfg = GapConfig::default();
    let mut state = MeasureState::new();
    state.update(Measurement::new(-220.0, 41.25));
    let out = process_frame(&cfg, &mut state, &GrayImage::new(64, 64), 0);
    let readout = out.readout.unwrap();
    assert_eq!(readout[0], "X-Difference is 220.00 um");
    assert_eq!(readout[1], "Y-Difference is 41.25 um");
}

#[test]
fn test_session_ends_on_source_exhaustion() {
    let cfg = GapConfig::default();
    let mut source = ScriptedSource::blank(3, 32, 32);
    let mut control = NoControl;
    let summary = run_session(&cfg, &mut source, &mut control, None, None).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.frames_with_candidates, 0);
    assert_eq!(summary.measurement_updates, 0);
    assert!(summary.final_measurement.is_none());
}

#[test]
fn test_session_quit_is_observed_before_next_frame() {
    let cfg = GapConfig::default();
    let mut source = ScriptedSource::blank(10, 32, 32);
    let mut control = ScriptedControl {
        commands: vec![
            SessionCommand::None,
            SessionCommand::None,
            SessionCommand::Quit,
        ],
        next: 0,
    };
    let summary = run_session(&cfg, &mut source, &mut control, None, None).unwrap();
    // The third iteration quits before consuming a frame.
    assert_eq!(summary.frames, 2);
}

#[test]
fn test_session_save_command_writes_frame() {
    let dir = std::env::temp_dir().join(format!("fgrs-save-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let cfg = GapConfig::default();
    let mut source = ScriptedSource::blank(4, 32, 32);
    let mut control = ScriptedControl {
        commands: vec![
            SessionCommand::None,
            SessionCommand::Save,
            SessionCommand::Quit,
        ],
        next: 0,
    };
    let summary = run_session(&cfg, &mut source, &mut control, Some(&dir), None).unwrap();
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.saved_frames, 1);
    let saved: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
    assert_eq!(saved.len(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}
