use crate::{
    foil::{FoilDynamics, FoilGeometry, FoilState, LocalRadius},
    sample::SurfaceSample,
};
use std::fmt;

/// Leading edge vortex shedding
///
/// Derived from the frontal region samples of the first time step showing
/// flow reversal, at the sample of minimum wall shear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShedEvent {
    pub time_step: usize,
    /// shed position in the body frame
    pub x: f64,
    pub y: f64,
    /// shed position normalized by the chord
    pub x_wallshear: f64,
    pub min_wall_shear: f64,
    /// pressure coefficient at the shed position
    pub pressure: Option<f64>,
    /// pitch angle [rad]
    pub theta: f64,
    /// free stream angle induced by the heave rate [rad]
    pub theta_inf_hdot: f64,
    /// effective angle of attack [rad]
    pub effective_aoa: f64,
    /// surface tangent angle at the shed position [rad]
    pub theta_t: f64,
    /// pitch angle wrt. the surface tangent [rad]
    pub theta_txy: f64,
    pub radius: LocalRadius,
    pub theta_p_r2: f64,
    /// pitching velocity at the shed position: [magnitude, x, y]
    pub u_thetadot: [f64; 3],
    pub theta_inf_thetadot: f64,
    pub theta_inf_hdot_thetadot: f64,
    /// (x/c, pitch minus tangent angle) along the frontal region
    pub tangent_profile: Vec<(f64, f64)>,
    /// (x/c, pressure coefficient) along the frontal region
    pub pressure_profile: Option<Vec<(f64, f64)>>,
}
impl ShedEvent {
    /// Derives the shedding kinematics from the samples of a time step
    ///
    /// Returns `None` if there are no samples.
    pub fn derive<D, G>(
        time_step: usize,
        samples: &[SurfaceSample],
        state: &FoilState,
        dynamics: &D,
        geometry: &G,
    ) -> Option<Self>
    where
        D: FoilDynamics + ?Sized,
        G: FoilGeometry + ?Sized,
    {
        let shed = samples
            .iter()
            .min_by(|a, b| a.wall_shear.total_cmp(&b.wall_shear))?;
        let chord = dynamics.chord();
        let u_inf = dynamics.velocity_inf();
        let theta = state.theta;

        let theta_inf_hdot = (-state.h_dot / u_inf).atan();
        let theta_t = geometry.tangent_angle(shed.x, shed.y);
        let radius = geometry.local_radius(shed.x, shed.y);
        let theta_p_r2 = theta + radius.theta_r2;
        let u = radius.r2 * state.theta_dot;
        let (s, c) = theta_p_r2.sin_cos();
        let u_thetadot = [u, u * s, u * c];
        let theta_inf_thetadot = (-u_thetadot[2] / (u_inf - u_thetadot[1])).atan();
        let theta_inf_hdot_thetadot =
            (-(u_thetadot[2] + state.h_dot) / (u_inf - u_thetadot[1])).atan();

        let pressure_profile = shed.pressure.map(|_| {
            samples
                .iter()
                .filter_map(|s| s.pressure.map(|p| (s.x / chord, p)))
                .collect()
        });
        Some(Self {
            time_step,
            x: shed.x,
            y: shed.y,
            x_wallshear: shed.x / chord,
            min_wall_shear: shed.wall_shear,
            pressure: shed.pressure,
            theta,
            theta_inf_hdot,
            effective_aoa: theta - theta_inf_hdot,
            theta_t,
            theta_txy: theta - theta_t,
            radius,
            theta_p_r2,
            u_thetadot,
            theta_inf_thetadot,
            theta_inf_hdot_thetadot,
            tangent_profile: samples
                .iter()
                .map(|s| (s.x / chord, theta - geometry.tangent_angle(s.x, s.y)))
                .collect(),
            pressure_profile,
        })
    }
}
impl fmt::Display for ShedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Output Results:")?;
        writeln!(f, " - Vortex is shed at time step = {}", self.time_step)?;
        writeln!(f, " - Vortex Position = {:.6}", self.x_wallshear)?;
        writeln!(f, " - Minimum Wall Shear = {:.6}", self.min_wall_shear)?;
        writeln!(f, "Theta values:")?;
        writeln!(f, " - Pitching Angle = {:.6}", self.theta)?;
        writeln!(f, " - Effective Angle of Attack = {:.6}", self.effective_aoa)?;
        writeln!(f, " - Tangent Angle = {:.6}", self.theta_txy)?;
        writeln!(f, " - Inf+h_dot = {:.6}", self.theta_inf_hdot)?;
        writeln!(f, " - Inf+theta_dot = {:.6}", self.theta_inf_thetadot)?;
        writeln!(
            f,
            " - Inf+h_dot+theta_dot = {:.6}",
            self.theta_inf_hdot_thetadot
        )?;
        writeln!(f, "r values:")?;
        writeln!(f, " - r1 = {:.6}", self.radius.r1)?;
        writeln!(f, " - r2 = {:.6}", self.radius.r2)?;
        writeln!(f, " - theta_r2 = {:.6}", self.radius.theta_r2)?;
        writeln!(f, " - u_thetadot = {:.6?}", self.u_thetadot)?;
        if let Some(pressure) = self.pressure {
            writeln!(f, "Pressure values:")?;
            writeln!(f, " - pressure-coefficient = {:.6}", pressure)?;
        }
        Ok(())
    }
}
