//! Oscillating foil wall shear parser
//!
//! Post-processes the time-sequenced surface exports of an oscillating foil
//! CFD simulation and detects the onset of leading edge vortex shedding.
//!
//! Each sample file is rotated into the foil body frame ([sample::transform]),
//! restricted to the frontal region of the upstream facing surface and
//! aggregated over the last simulated window by the [ShedScanner].
//!
//! ```no_run
//! use parse_wallshear::{FoilProfile, Files, PrescribedMotion, ShedScanner};
//!
//! # fn main() -> Result<(), parse_wallshear::Error> {
//! let motion = PrescribedMotion::new(0.1, 1.0, 0.12)
//!     .pitch_amplitude(30f64.to_radians())
//!     .heave_amplitude(0.05);
//! let profile = FoilProfile::ellipse("ellipse12", 0.1, 0.012, 360);
//! let outcome = ShedScanner::new(Files::new("data")).scan(&motion, &profile)?;
//! println!("{:?}", outcome.pair());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod files;
pub mod foil;
pub mod sample;
pub mod scanner;
pub mod summary;

pub use error::Error;
pub use files::{Files, SamplePath};
pub use foil::{
    FoilDynamics, FoilGeometry, FoilProfile, FoilState, KinematicsTable, LocalRadius,
    PrescribedMotion,
};
pub use sample::{BodyFrame, ProcessedSamples, Samples, Surface, SurfaceSample};
pub use scanner::{Phase, ScanOutcome, ShedEvent, ShedScanner, Window};
pub use summary::{Aggregate, Summary};
