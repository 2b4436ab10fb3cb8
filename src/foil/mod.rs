//! Foil kinematics and geometry providers

mod motion;
mod profile;
pub use motion::{KinematicsTable, PrescribedMotion};
pub use profile::FoilProfile;

#[derive(Debug, thiserror::Error)]
pub enum FoilError {
    #[error("failed to open the foil data file")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize the CSV file")]
    Csv(#[from] csv::Error),
    #[error("a foil profile needs at least 2 points, found {0}")]
    Profile(usize),
    #[error("time step {0} is tabulated more than once")]
    DuplicateTimeStep(usize),
}
type Result<T> = std::result::Result<T, FoilError>;

/// Foil motion at a given time step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FoilState {
    /// pitch angle [rad]
    pub theta: f64,
    /// heave
    pub h: f64,
    /// heave rate
    pub h_dot: f64,
    /// pitch rate [rad/s]
    pub theta_dot: f64,
}
impl FoilState {
    /// Checks if the pitch angle rounds to zero at 3 decimals
    pub fn is_level(&self) -> bool {
        (self.theta * 1e3).round() == 0f64
    }
}

/// Foil kinematics provider
pub trait FoilDynamics {
    fn chord(&self) -> f64;
    /// Free stream velocity
    fn velocity_inf(&self) -> f64;
    fn reduced_frequency(&self) -> f64;
    /// Returns the foil motion at `time_step`
    fn state(&self, time_step: usize) -> Option<FoilState>;
}

/// Pitch axis radii
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalRadius {
    /// pitch axis to leading edge
    pub r1: f64,
    /// pitch axis to surface point
    pub r2: f64,
    /// angle of the radius wrt. the chord line [rad]
    pub theta_r2: f64,
}

/// Foil geometry provider
///
/// Positions are given in the body frame with the origin at the leading edge.
pub trait FoilGeometry {
    fn name(&self) -> &str;
    /// Angle of the surface tangent at the surface point nearest to (x,y) [rad]
    fn tangent_angle(&self, x: f64, y: f64) -> f64;
    fn local_radius(&self, x: f64, y: f64) -> LocalRadius;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_foil() {
        let state = |theta| FoilState {
            theta,
            ..Default::default()
        };
        assert!(state(0.).is_level());
        assert!(state(4e-4).is_level());
        assert!(state(-4e-4).is_level());
        assert!(!state(6e-4).is_level());
        assert!(!state(-0.2).is_level());
    }
}
