use super::{FoilDynamics, FoilError, FoilState, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, f64::consts::PI, fs::File, path::Path};

/// Sinusoidal heave and pitch motion
///
/// h(t) = h0 sin(wt) and theta(t) = theta0 sin(wt + phase),
/// with w = 2 pi k U / c and t = time step x dt
#[derive(Debug, Clone)]
pub struct PrescribedMotion {
    chord: f64,
    velocity_inf: f64,
    reduced_frequency: f64,
    pitch_amplitude: f64,
    heave_amplitude: f64,
    phase: f64,
    dt: f64,
    total_cycles: usize,
}
impl PrescribedMotion {
    pub fn new(chord: f64, velocity_inf: f64, reduced_frequency: f64) -> Self {
        Self {
            chord,
            velocity_inf,
            reduced_frequency,
            pitch_amplitude: 0f64,
            heave_amplitude: 0f64,
            phase: 0.5 * PI,
            dt: 1e-4,
            total_cycles: 1,
        }
    }
    /// Sets the pitch amplitude [rad]
    pub fn pitch_amplitude(self, pitch_amplitude: f64) -> Self {
        Self {
            pitch_amplitude,
            ..self
        }
    }
    pub fn heave_amplitude(self, heave_amplitude: f64) -> Self {
        Self {
            heave_amplitude,
            ..self
        }
    }
    /// Sets the pitch phase lead over the heave [rad]
    pub fn phase(self, phase: f64) -> Self {
        Self { phase, ..self }
    }
    /// Sets the simulation time step [s]
    pub fn dt(self, dt: f64) -> Self {
        Self { dt, ..self }
    }
    pub fn total_cycles(self, total_cycles: usize) -> Self {
        Self {
            total_cycles,
            ..self
        }
    }
    pub fn update_total_cycles(&mut self, total_cycles: usize) {
        self.total_cycles = total_cycles;
    }
    /// Motion frequency [Hz]
    pub fn frequency(&self) -> f64 {
        self.reduced_frequency * self.velocity_inf / self.chord
    }
    pub fn angular_frequency(&self) -> f64 {
        2. * PI * self.frequency()
    }
    pub fn steps_per_cycle(&self) -> usize {
        (1. / (self.frequency() * self.dt)).round() as usize
    }
    pub fn total_steps(&self) -> usize {
        self.steps_per_cycle() * self.total_cycles
    }
}
impl FoilDynamics for PrescribedMotion {
    fn chord(&self) -> f64 {
        self.chord
    }
    fn velocity_inf(&self) -> f64 {
        self.velocity_inf
    }
    fn reduced_frequency(&self) -> f64 {
        self.reduced_frequency
    }
    fn state(&self, time_step: usize) -> Option<FoilState> {
        let w = self.angular_frequency();
        let wt = w * time_step as f64 * self.dt;
        let (s_h, c_h) = wt.sin_cos();
        let (s_p, c_p) = (wt + self.phase).sin_cos();
        Some(FoilState {
            theta: self.pitch_amplitude * s_p,
            h: self.heave_amplitude * s_h,
            h_dot: self.heave_amplitude * w * c_h,
            theta_dot: self.pitch_amplitude * w * c_p,
        })
    }
}

#[derive(Deserialize, Debug)]
struct Record {
    time_step: usize,
    theta: f64,
    h: f64,
    h_dot: f64,
    theta_dot: f64,
}

/// Foil motion tabulated per time step
#[derive(Debug, Clone, Default)]
pub struct KinematicsTable {
    chord: f64,
    velocity_inf: f64,
    reduced_frequency: f64,
    states: BTreeMap<usize, FoilState>,
}
impl KinematicsTable {
    /// Loads the foil motion from a CSV file
    ///
    /// The file columns are `time_step,theta,h,h_dot,theta_dot`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let csv_file = File::open(path.as_ref())?;
        log::info!("Loading {:?}...", path.as_ref());
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_file);
        let mut this = Self::default();
        for result in rdr.deserialize() {
            let record: Record = result?;
            let state = FoilState {
                theta: record.theta,
                h: record.h,
                h_dot: record.h_dot,
                theta_dot: record.theta_dot,
            };
            if this.states.insert(record.time_step, state).is_some() {
                return Err(FoilError::DuplicateTimeStep(record.time_step));
            }
        }
        Ok(this)
    }
    pub fn with_chord(self, chord: f64) -> Self {
        Self { chord, ..self }
    }
    pub fn with_velocity_inf(self, velocity_inf: f64) -> Self {
        Self {
            velocity_inf,
            ..self
        }
    }
    pub fn with_reduced_frequency(self, reduced_frequency: f64) -> Self {
        Self {
            reduced_frequency,
            ..self
        }
    }
    pub fn len(&self) -> usize {
        self.states.len()
    }
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
impl FromIterator<(usize, FoilState)> for KinematicsTable {
    fn from_iter<T: IntoIterator<Item = (usize, FoilState)>>(iter: T) -> Self {
        Self {
            states: iter.into_iter().collect(),
            ..Default::default()
        }
    }
}
impl FoilDynamics for KinematicsTable {
    fn chord(&self) -> f64 {
        self.chord
    }
    fn velocity_inf(&self) -> f64 {
        self.velocity_inf
    }
    fn reduced_frequency(&self) -> f64 {
        self.reduced_frequency
    }
    fn state(&self, time_step: usize) -> Option<FoilState> {
        self.states.get(&time_step).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn prescribed_motion() {
        let motion = PrescribedMotion::new(0.1, 1., 0.1)
            .pitch_amplitude(0.5)
            .heave_amplitude(0.05)
            .dt(1e-3)
            .total_cycles(3);
        assert!((motion.frequency() - 1.).abs() < 1e-12);
        assert_eq!(motion.steps_per_cycle(), 1000);
        assert_eq!(motion.total_steps(), 3000);
        let start = motion.state(0).unwrap();
        assert!((start.theta - 0.5).abs() < 1e-12);
        assert!(start.h.abs() < 1e-12);
        assert!((start.h_dot - 0.05 * 2. * PI).abs() < 1e-12);
        assert!(start.theta_dot.abs() < 1e-12);
        let quarter = motion.state(250).unwrap();
        assert!(quarter.theta.abs() < 1e-9);
        assert!((quarter.h - 0.05).abs() < 1e-9);
    }

    #[test]
    fn tabulated_motion() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kinematics.csv");
        fs::write(
            &path,
            "time_step, theta, h, h_dot, theta_dot\n4001, 0.1, 0.02, -0.5, 1.5\n4002, 0.2, 0.01, -0.6, 1.4\n",
        )
        .unwrap();
        let table = KinematicsTable::from_path(&path)
            .unwrap()
            .with_chord(0.1)
            .with_velocity_inf(1.)
            .with_reduced_frequency(0.12);
        assert_eq!(table.len(), 2);
        assert_eq!(table.chord(), 0.1);
        let state = table.state(4002).unwrap();
        assert_eq!(state.theta, 0.2);
        assert_eq!(state.theta_dot, 1.4);
        assert!(table.state(4003).is_none());
    }

    #[test]
    fn duplicate_time_step() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kinematics.csv");
        fs::write(
            &path,
            "time_step,theta,h,h_dot,theta_dot\n1,0.1,0,0,0\n1,0.2,0,0,0\n",
        )
        .unwrap();
        assert!(matches!(
            KinematicsTable::from_path(&path),
            Err(FoilError::DuplicateTimeStep(1))
        ));
    }
}
