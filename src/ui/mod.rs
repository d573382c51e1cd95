//! UI/Progress presentation layer
//!
//! This module handles:
//! - Styled console lines (via display module)
//! - Pipeline stage progress using indicatif
//! - Silent progress for dry-run and verbose modes
//!
//! All progress reporting goes through the ProgressReporter trait, so the
//! pipeline does not care whether a bar is drawn.

pub mod display;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress reporter for the install pipeline
pub trait ProgressReporter {
    /// Mark the start of a named stage
    fn start_stage(&mut self, name: &str);

    /// Mark the current stage complete
    fn finish_stage(&mut self);

    /// Finish after the last stage
    fn finish(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter drawing a stage bar on stderr
///
/// The bar hides itself when stderr is not a terminal.
pub struct InteractiveProgressReporter {
    stage_pb: ProgressBar,
}

impl InteractiveProgressReporter {
    /// Create a new reporter for `total_stages` stages
    pub fn new(total_stages: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let stage_pb = ProgressBar::with_draw_target(Some(total_stages), ProgressDrawTarget::stderr());
        stage_pb.set_style(style);

        Self { stage_pb }
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start_stage(&mut self, name: &str) {
        self.stage_pb.set_message(name.to_string());
    }

    fn finish_stage(&mut self) {
        self.stage_pb.inc(1);
    }

    fn finish(&mut self) {
        self.stage_pb.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.stage_pb.abandon();
    }
}

/// Silent progress reporter (no-op)
///
/// Used for dry-run and verbose modes, where the printed action lines are
/// the progress report.
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start_stage(&mut self, _name: &str) {}

    fn finish_stage(&mut self) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}

/// Pick a reporter for the given output mode
pub fn reporter_for(quiet_progress: bool, total_stages: u64) -> Box<dyn ProgressReporter> {
    if quiet_progress {
        Box::new(SilentProgressReporter)
    } else {
        Box::new(InteractiveProgressReporter::new(total_stages))
    }
}
