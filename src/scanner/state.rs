use super::ShedEvent;
use crate::{sample::SurfaceSample, summary::Aggregate};

/// Time steps scanned for shedding
///
/// The window spans `length` time steps, starting at the last multiple of
/// `length` strictly before the last recorded time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: usize,
    length: usize,
}
impl Window {
    pub fn ending_at(last_time_step: usize, length: usize) -> Self {
        let length = length.max(1);
        Self {
            start: (last_time_step.saturating_sub(1) / length) * length,
            length,
        }
    }
    /// First time step before the window
    pub fn start(&self) -> usize {
        self.start
    }
    /// Last time step of the window
    pub fn end(&self) -> usize {
        self.start + self.length
    }
    pub fn contains(&self, time_step: usize) -> bool {
        time_step > self.start && time_step <= self.end()
    }
}

/// Scanner phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// no qualifying time step yet
    Scanning,
    /// shedding recorded, counting qualifying time steps
    Armed,
    Done,
}

/// State of a scan, threaded through the time steps
#[derive(Debug, Default)]
pub struct ScanState {
    aggregate: Aggregate,
    qualifying: usize,
    event: Option<ShedEvent>,
    detection_limit: usize,
    stop_after: usize,
    exhausted: bool,
}
impl ScanState {
    /// Creates a new scan state
    ///
    /// Time steps qualify while fewer than `detection_limit` have qualified,
    /// the scan is done once `stop_after` time steps have qualified.
    pub fn new(detection_limit: usize, stop_after: usize) -> Self {
        Self {
            detection_limit,
            stop_after,
            ..Default::default()
        }
    }
    pub fn phase(&self) -> Phase {
        if self.exhausted || self.qualifying >= self.stop_after {
            Phase::Done
        } else if self.qualifying == 0 {
            Phase::Scanning
        } else {
            Phase::Armed
        }
    }
    pub fn qualifying(&self) -> usize {
        self.qualifying
    }
    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }
    pub fn event(&self) -> Option<&ShedEvent> {
        self.event.as_ref()
    }
    /// Checks for separation at the leading edge
    ///
    /// The samples, sorted from the leading edge, qualify if the wall shear
    /// is negative somewhere while still positive at the leading edge.
    pub fn qualifies(&self, samples: &[SurfaceSample]) -> bool {
        let Some(first) = samples.first() else {
            return false;
        };
        let min_wall_shear = samples
            .iter()
            .map(|s| s.wall_shear)
            .fold(f64::INFINITY, f64::min);
        min_wall_shear < 0f64 && first.wall_shear > 0f64 && self.qualifying < self.detection_limit
    }
    /// Adds the frontal region samples of a time step to the scan
    ///
    /// `shed` derives the shedding event from the samples of the first
    /// qualifying time step.
    pub fn step<F>(&mut self, time_step: usize, samples: Vec<SurfaceSample>, shed: F) -> Phase
    where
        F: FnOnce(&[SurfaceSample]) -> Option<ShedEvent>,
    {
        if self.phase() == Phase::Done {
            return Phase::Done;
        }
        if self.qualifies(&samples) {
            if self.qualifying == 0 {
                self.event = shed(&samples);
            }
            self.qualifying += 1;
        }
        self.aggregate.extend(time_step, samples);
        self.phase()
    }
    /// Ends the scan, returning the aggregate and the shedding event
    pub fn finish(mut self) -> (Aggregate, Option<ShedEvent>, usize, Phase) {
        self.exhausted = true;
        let phase = self.phase();
        (self.aggregate, self.event, self.qualifying, phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(wall_shear: &[f64]) -> Vec<SurfaceSample> {
        wall_shear
            .iter()
            .enumerate()
            .map(|(i, &wall_shear)| SurfaceSample {
                x: i as f64 * 1e-3,
                y: 1e-3,
                wall_shear,
                pressure: None,
            })
            .collect()
    }

    #[test]
    fn window_boundaries() {
        let window = Window::ending_at(5000, 1000);
        assert_eq!(window.start(), 4000);
        assert_eq!(window.end(), 5000);
        assert!((4200..=5000).all(|step| window.contains(step)));
        assert!(!window.contains(4000));
        assert!(!window.contains(3999));
        assert!(!window.contains(5001));
        let window = Window::ending_at(5300, 1000);
        assert_eq!(window.start(), 5000);
        assert!(window.contains(5300));
        assert!(!window.contains(5000));
        assert_eq!(Window::ending_at(700, 1000).start(), 0);
    }

    #[test]
    fn qualifying_profiles() {
        let state = ScanState::new(4, 5);
        assert!(state.qualifies(&samples(&[0.5, -0.1, 0.2])));
        assert!(!state.qualifies(&samples(&[-0.5, -0.1, 0.2])));
        assert!(!state.qualifies(&samples(&[0.5, 0.1, 0.2])));
        assert!(!state.qualifies(&[]));
    }

    #[test]
    fn first_event_only() {
        let mut state = ScanState::new(4, 5);
        assert_eq!(state.phase(), Phase::Scanning);
        let phase = state.step(1, samples(&[0.5, 0.1]), |_| None);
        assert_eq!(phase, Phase::Scanning);
        let mut calls = 0;
        for step in 2..10 {
            state.step(step, samples(&[0.5, -0.1]), |_| {
                calls += 1;
                Some(ShedEvent {
                    time_step: step,
                    ..Default::default()
                })
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(state.event().map(|e| e.time_step), Some(2));
        // the detection limit caps the qualifying count
        assert_eq!(state.qualifying(), 4);
        assert_eq!(state.phase(), Phase::Armed);
        assert_eq!(state.aggregate().time_steps().len(), 9);
        let (_, event, qualifying, phase) = state.finish();
        assert!(event.is_some());
        assert_eq!(qualifying, 4);
        assert_eq!(phase, Phase::Done);
    }

    #[test]
    fn stops_after_limit() {
        let mut state = ScanState::new(5, 5);
        let phases: Vec<Phase> = (1..=6)
            .map(|step| state.step(step, samples(&[0.5, -0.1]), |_| None))
            .collect();
        assert_eq!(phases[3], Phase::Armed);
        assert_eq!(phases[4], Phase::Done);
        assert_eq!(phases[5], Phase::Done);
        assert_eq!(state.aggregate().time_steps(), vec![1, 2, 3, 4, 5]);
    }
}
