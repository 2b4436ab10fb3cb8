use parse_wallshear::{
    FoilDynamics, FoilProfile, Files, KinematicsTable, PrescribedMotion, ShedScanner,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "parse-wallshear",
    about = "Oscillating foil wall shear parser and vortex shedding detector"
)]
struct Opt {
    /// Path to the sample files directory
    #[structopt(parse(from_os_str))]
    path: PathBuf,
    /// Foil motion CSV table: time_step,theta,h,h_dot,theta_dot
    #[structopt(long, parse(from_os_str))]
    kinematics: Option<PathBuf>,
    /// Foil chord
    #[structopt(short, long, default_value = "0.1")]
    chord: f64,
    /// Free stream velocity
    #[structopt(short = "u", long, default_value = "1")]
    velocity: f64,
    /// Reduced frequency
    #[structopt(short = "k", long, default_value = "0.12")]
    reduced_frequency: f64,
    /// Pitch amplitude [deg]
    #[structopt(long, default_value = "30")]
    pitch_amplitude: f64,
    /// Heave amplitude
    #[structopt(long, default_value = "0.05")]
    heave_amplitude: f64,
    /// Pitch phase lead over the heave [deg]
    #[structopt(long, default_value = "90")]
    phase: f64,
    /// Simulation time step [s]
    #[structopt(long, default_value = "1e-4")]
    dt: f64,
    /// Foil profile CSV file: x,y
    #[structopt(long, parse(from_os_str))]
    profile: Option<PathBuf>,
    /// Elliptic foil thickness
    #[structopt(long, default_value = "0.012")]
    thickness: f64,
    /// Foil geometry name
    #[structopt(short, long, default_value = "ellipse")]
    geo_name: String,
    /// Frontal region extent [x/C]
    #[structopt(long, default_value = "0.2")]
    cutoff: f64,
    /// Directory of the organized outputs
    #[structopt(long, parse(from_os_str))]
    org_path: Option<PathBuf>,
    /// Project name
    #[structopt(long)]
    project: Option<String>,
    /// Save the frontal region aggregate to CSV file
    #[structopt(long)]
    csv: Option<String>,
    /// Plot the summary
    #[structopt(short, long)]
    plot: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let dynamics: Box<dyn FoilDynamics> = match &opt.kinematics {
        Some(path) => Box::new(
            KinematicsTable::from_path(path)?
                .with_chord(opt.chord)
                .with_velocity_inf(opt.velocity)
                .with_reduced_frequency(opt.reduced_frequency),
        ),
        None => Box::new(
            PrescribedMotion::new(opt.chord, opt.velocity, opt.reduced_frequency)
                .pitch_amplitude(opt.pitch_amplitude.to_radians())
                .heave_amplitude(opt.heave_amplitude)
                .phase(opt.phase.to_radians())
                .dt(opt.dt),
        ),
    };
    let geometry = match &opt.profile {
        Some(path) => {
            FoilProfile::from_path(&opt.geo_name, path, [0.5 * opt.chord, 0f64])?
        }
        None => FoilProfile::ellipse(&opt.geo_name, opt.chord, opt.thickness, 360),
    };

    let mut files = Files::new(&opt.path);
    if let Some(arg) = &opt.org_path {
        files = files.org_path(arg);
    }
    if let Some(arg) = opt.project {
        files = files.project_name(arg);
    }

    let scanner = ShedScanner::new(files).cutoff(opt.cutoff).progress();
    let outcome = scanner.scan(dynamics.as_ref(), &geometry)?;
    print!("{}", outcome);
    let (time_step, x_wallshear) = outcome.pair();
    println!("Shedding: time step = {}, x/C = {:.6}", time_step, x_wallshear);

    if let Some(filename) = opt.csv {
        outcome.aggregate.to_csv(&filename)?;
        println!("Frontal region aggregate saved to {}", filename);
    }

    if opt.plot {
        #[cfg(feature = "plot")]
        {
            let path = scanner.files().output_path(
                &opt.geo_name,
                opt.reduced_frequency,
                "wallshear.svg",
            );
            outcome.summary.plot(&path)?;
            println!("Summary plot saved to {:?}", path);
        }
        #[cfg(not(feature = "plot"))]
        log::warn!("plotting requires the `plot` feature");
    }

    Ok(())
}
