use nalgebra::{Rotation2, Vector2};
use std::fmt;
use strum_macros::EnumIter;

/// Foil surfaces
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Upper,
    Lower,
}
impl Surface {
    /// Surface a body frame point belongs to
    pub fn of_point(y_rotated: f64) -> Self {
        if y_rotated > 0f64 {
            Surface::Upper
        } else {
            Surface::Lower
        }
    }
    /// Surface selected by the pitch direction
    ///
    /// A level foil selects no surface.
    pub fn facing(theta: f64) -> Option<Self> {
        if theta > 0f64 {
            Some(Surface::Upper)
        } else if theta < 0f64 {
            Some(Surface::Lower)
        } else {
            None
        }
    }
}
impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Upper => write!(f, "upper"),
            Surface::Lower => write!(f, "lower"),
        }
    }
}

/// Foil body frame at a given time step
///
/// The body frame is rotated by the pitch angle, shifted by the heave
/// and has its x axis origin at the leading edge.
#[derive(Debug, Clone, Copy)]
pub struct BodyFrame {
    chord: f64,
    theta: f64,
    heave: f64,
    rotation: Rotation2<f64>,
}
impl BodyFrame {
    pub fn new(chord: f64, theta: f64, heave: f64) -> Self {
        Self {
            chord,
            theta,
            heave,
            rotation: Rotation2::new(theta),
        }
    }
    pub fn chord(&self) -> f64 {
        self.chord
    }
    /// Pitch angle [rad]
    pub fn theta(&self) -> f64 {
        self.theta
    }
    pub fn heave(&self) -> f64 {
        self.heave
    }
    /// Transforms a point into the body frame
    pub fn to_body(&self, x: f64, y: f64) -> (f64, f64) {
        let xy = self.rotation * Vector2::new(x, y - self.heave);
        (xy.x + 0.5 * self.chord, xy.y)
    }
    /// Projects the wall shear vector onto the body frame x axis
    pub fn wall_shear(&self, x_wall_shear: f64, y_wall_shear: f64) -> f64 {
        let (s, c) = self.theta.sin_cos();
        x_wall_shear * c - y_wall_shear * s
    }
    /// Surface facing the flow
    pub fn surface(&self) -> Option<Surface> {
        Surface::facing(self.theta)
    }
    /// Checks if a body frame point lies in the frontal region
    ///
    /// The frontal region is the part of the surface selected by the pitch
    /// direction that is within `cutoff` chord of the leading edge.
    pub fn is_frontal(&self, x_rotated: f64, y_rotated: f64, cutoff: f64) -> bool {
        self.surface() == Some(Surface::of_point(y_rotated)) && x_rotated < cutoff * self.chord
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use strum::IntoEnumIterator;

    #[test]
    fn level_frame() {
        let frame = BodyFrame::new(0.1, 0., 0.02);
        let (x, y) = frame.to_body(-0.05, 0.03);
        assert!((x - 0.).abs() < 1e-12);
        assert!((y - 0.01).abs() < 1e-12);
        assert_eq!(frame.wall_shear(2., 3.), 2.);
        assert_eq!(frame.surface(), None);
    }

    #[test]
    fn quarter_turn() {
        let frame = BodyFrame::new(1., FRAC_PI_2, 0.);
        let (x, y) = frame.to_body(0.2, 0.3);
        assert!((x - (0.5 - 0.3)).abs() < 1e-12);
        assert!((y - 0.2).abs() < 1e-12);
        assert!((frame.wall_shear(2., 3.) + 3.).abs() < 1e-12);
    }

    #[test]
    fn surface_selection() {
        for surface in Surface::iter() {
            let theta = match surface {
                Surface::Upper => 0.2,
                Surface::Lower => -0.2,
            };
            assert_eq!(Surface::facing(theta), Some(surface));
        }
        assert_eq!(Surface::of_point(0.), Surface::Lower);
        assert_eq!(Surface::Upper.to_string(), "upper");
        assert_eq!(Surface::Lower.to_string(), "lower");
        let frame = BodyFrame::new(1., 0.2, 0.);
        assert!(frame.is_frontal(0.1, 0.01, 0.2));
        assert!(!frame.is_frontal(0.1, -0.01, 0.2));
        assert!(!frame.is_frontal(0.2, 0.01, 0.2));
    }

    #[test]
    fn frontal_region_is_monotone_in_cutoff() {
        let frame = BodyFrame::new(1., -0.3, 0.);
        let points: Vec<(f64, f64)> = (0..50)
            .map(|i| (i as f64 * 0.02, if i % 3 == 0 { 0.01 } else { -0.01 }))
            .collect();
        for (x, y) in points {
            if frame.is_frontal(x, y, 0.2) {
                assert!(frame.is_frontal(x, y, 0.5));
            }
        }
    }
}
