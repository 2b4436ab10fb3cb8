//! Vortex shedding detection over a sequence of sample files
//!
//! The [ShedScanner] walks the sample files of the last simulated window in
//! time step order, transforms each file into the foil body frame and
//! aggregates the frontal region samples.
//! The first time step with a negative wall shear downstream of a still
//! positive leading edge wall shear is the shedding time step.

use crate::{
    files::{Files, FilesError, SamplePath},
    foil::{FoilDynamics, FoilGeometry},
    sample::{self, BodyFrame, SampleError, SurfaceSample},
    summary::{Aggregate, Summary},
};
use indicatif::ProgressBar;
use std::fmt;

mod event;
mod state;
pub use event::ShedEvent;
pub use state::{Phase, ScanState, Window};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to discover the sample files")]
    Files(#[from] FilesError),
    #[error("failed to transform a sample file")]
    Sample(#[from] SampleError),
    #[error("no foil motion for time step {0}")]
    MissingState(usize),
}
type Result<T> = std::result::Result<T, ScanError>;

/// Shedding scan of a CFD run
#[derive(Debug, Clone)]
pub struct ShedScanner {
    files: Files,
    cutoff: f64,
    persist_cutoff: f64,
    window_length: usize,
    detection_limit: usize,
    stop_after: usize,
    summary_steps: usize,
    progress: bool,
}
impl ShedScanner {
    pub fn new(files: Files) -> Self {
        Self {
            files,
            cutoff: 0.2,
            persist_cutoff: 1.0,
            window_length: 1000,
            detection_limit: 4,
            stop_after: 5,
            summary_steps: 11,
            progress: false,
        }
    }
    /// Sets the frontal region extent in chord fraction
    pub fn cutoff(self, cutoff: f64) -> Self {
        Self { cutoff, ..self }
    }
    /// Sets the frontal region extent in chord fraction of the processed files
    pub fn persist_cutoff(self, persist_cutoff: f64) -> Self {
        Self {
            persist_cutoff,
            ..self
        }
    }
    pub fn window_length(self, window_length: usize) -> Self {
        Self {
            window_length,
            ..self
        }
    }
    pub fn detection_limit(self, detection_limit: usize) -> Self {
        Self {
            detection_limit,
            ..self
        }
    }
    pub fn stop_after(self, stop_after: usize) -> Self {
        Self { stop_after, ..self }
    }
    /// Sets the number of last time steps in the summary
    pub fn summary_steps(self, summary_steps: usize) -> Self {
        Self {
            summary_steps,
            ..self
        }
    }
    /// Displays a progress bar
    pub fn progress(self) -> Self {
        Self {
            progress: true,
            ..self
        }
    }
    pub fn files(&self) -> &Files {
        &self.files
    }
    /// Scans the sample files for the leading edge vortex shedding
    pub fn scan<D, G>(&self, dynamics: &D, geometry: &G) -> Result<ScanOutcome>
    where
        D: FoilDynamics + ?Sized,
        G: FoilGeometry + ?Sized,
    {
        let sample_files = self.files.sample_files()?;
        let last = sample_files
            .last()
            .map(|s| s.time_step)
            .unwrap_or_default();
        let window = Window::ending_at(last, self.window_length);
        log::info!(
            "{}: scanning time steps ]{},{}]",
            self.files.project(),
            window.start(),
            window.end()
        );

        let chord = dynamics.chord();
        let persist_cutoff = self.cutoff.max(self.persist_cutoff);
        let x_max = self.cutoff * chord;
        let pb = if self.progress {
            ProgressBar::new(sample_files.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        let mut state = ScanState::new(self.detection_limit, self.stop_after);
        for SamplePath { time_step, path } in &sample_files {
            pb.inc(1);
            let time_step = *time_step;
            if !window.contains(time_step) {
                log::debug!("skipping time step {}: outside window", time_step);
                continue;
            }
            let foil = dynamics
                .state(time_step)
                .ok_or(ScanError::MissingState(time_step))?;
            if foil.is_level() {
                log::debug!("skipping time step {}: zero pitch", time_step);
                continue;
            }
            let frame = BodyFrame::new(chord, foil.theta, foil.h);
            if let Some(surface) = frame.surface() {
                log::debug!("time step {}: {} surface", time_step, surface);
            }
            let frontal: Vec<SurfaceSample> = sample::transform(path, &frame, persist_cutoff)?
                .samples()
                .filter(|s| s.x <= x_max)
                .collect();
            let armed = state.event().is_some();
            let phase = state.step(time_step, frontal, |samples| {
                ShedEvent::derive(time_step, samples, &foil, dynamics, geometry)
            });
            if let (false, Some(event)) = (armed, state.event()) {
                log::info!(
                    "vortex shed at time step {} (x/c = {:.4})",
                    event.time_step,
                    event.x_wallshear
                );
            }
            if phase == Phase::Done {
                break;
            }
        }
        pb.finish();

        let (aggregate, event, qualifying, phase) = state.finish();
        if event.is_none() {
            log::warn!("Vortex has not shed within the simulated time line.");
        }
        let summary = aggregate.summary(
            chord,
            self.summary_steps,
            event.as_ref(),
            format!("{}, k = {}", geometry.name(), dynamics.reduced_frequency()),
        );
        Ok(ScanOutcome {
            project: self.files.project().to_string(),
            shed_time_step: event.as_ref().map_or(0, |e| e.time_step),
            x_wallshear: event.as_ref().map_or(-1f64, |e| e.x_wallshear),
            event,
            aggregate,
            summary,
            qualifying,
            phase,
        })
    }
}

/// Result of a shedding scan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub project: String,
    /// shedding time step, 0 if the vortex has not shed
    pub shed_time_step: usize,
    /// shedding position in chord fraction, -1 if the vortex has not shed
    pub x_wallshear: f64,
    pub event: Option<ShedEvent>,
    pub aggregate: Aggregate,
    pub summary: Summary,
    /// number of qualifying time steps
    pub qualifying: usize,
    pub phase: Phase,
}
impl ScanOutcome {
    /// Returns the shedding time step and position
    pub fn pair(&self) -> (usize, f64) {
        (self.shed_time_step, self.x_wallshear)
    }
    pub fn has_shed(&self) -> bool {
        self.event.is_some()
    }
}
impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.project)?;
        match &self.event {
            Some(event) => write!(f, "{}", event),
            None => writeln!(f, "Vortex has not shed within the simulated time line."),
        }
    }
}
