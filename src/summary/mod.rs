//! Rolling aggregate of the frontal region samples and its summary

use crate::{sample::SurfaceSample, scanner::ShedEvent};
use itertools::Itertools;
use std::path::Path;

#[cfg(feature = "plot")]
mod plot;

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("failed to write the aggregate CSV file")]
    Csv(#[from] csv::Error),
    #[error("failed to write the aggregate CSV file")]
    Io(#[from] std::io::Error),
    #[error("failed to draw the summary plot: {0}")]
    Plot(String),
}
type Result<T> = std::result::Result<T, SummaryError>;

/// A frontal region sample tagged with its time step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateRow {
    pub time_step: usize,
    pub sample: SurfaceSample,
}

/// Frontal region samples of the time steps scanned so far
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    rows: Vec<AggregateRow>,
}
impl Aggregate {
    /// Appends the samples of a time step
    pub fn extend<I>(&mut self, time_step: usize, samples: I)
    where
        I: IntoIterator<Item = SurfaceSample>,
    {
        self.rows.extend(
            samples
                .into_iter()
                .map(|sample| AggregateRow { time_step, sample }),
        );
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }
    /// Checks if the pressure coefficient was sampled
    pub fn has_pressure(&self) -> bool {
        self.rows.iter().any(|row| row.sample.pressure.is_some())
    }
    /// Distinct time steps in increasing order
    pub fn time_steps(&self) -> Vec<usize> {
        self.rows
            .iter()
            .map(|row| row.time_step)
            .sorted()
            .dedup()
            .collect()
    }
    /// Iterator over the samples of a time step
    pub fn step(&self, time_step: usize) -> impl Iterator<Item = &SurfaceSample> {
        self.rows
            .iter()
            .filter(move |row| row.time_step == time_step)
            .map(|row| &row.sample)
    }
    /// Returns the first sample with the smallest wall shear of a time step
    pub fn min_wall_shear(&self, time_step: usize) -> Option<&SurfaceSample> {
        self.step(time_step)
            .min_by(|a, b| a.wall_shear.total_cmp(&b.wall_shear))
    }
    /// Writes the aggregate to a CSV file
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record([
            "time-step",
            "x-rotated",
            "y-rotated",
            "calculated-wallshear",
            "pressure-coefficient",
        ])?;
        for AggregateRow { time_step, sample } in &self.rows {
            wtr.write_record(&[
                time_step.to_string(),
                sample.x.to_string(),
                sample.y.to_string(),
                sample.wall_shear.to_string(),
                sample.pressure.map(|p| p.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
    /// Summarizes the last `n_step` time steps
    ///
    /// Positions are normalized by the `chord`.
    pub fn summary(
        &self,
        chord: f64,
        n_step: usize,
        event: Option<&ShedEvent>,
        title: String,
    ) -> Summary {
        let time_steps = self.time_steps();
        let last_steps = &time_steps[time_steps.len().saturating_sub(n_step)..];
        let mut summary = Summary {
            title,
            ..Default::default()
        };
        for &time_step in last_steps {
            summary.profiles.push(Profile {
                time_step,
                points: self
                    .step(time_step)
                    .map(|s| (s.x / chord, s.wall_shear))
                    .collect(),
            });
            if let Some(min) = self.min_wall_shear(time_step) {
                let t = time_step as f64;
                summary.min_wall_shear.push((t, min.wall_shear));
                summary.min_position.push((t, min.x / chord));
                if let Some(p) = min.pressure {
                    summary
                        .min_pressure
                        .get_or_insert_with(Vec::new)
                        .push((t, p));
                }
            }
        }
        if let Some(event) = event {
            summary.tangent_profile = event.tangent_profile.clone();
            summary.shed_pressure = event.pressure_profile.clone();
        }
        summary
    }
}

/// Wall shear along the chord at a given time step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub time_step: usize,
    /// (x/c, wall shear)
    pub points: Vec<(f64, f64)>,
}

/// Data series of the summary plot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub title: String,
    pub profiles: Vec<Profile>,
    /// (time step, minimum wall shear)
    pub min_wall_shear: Vec<(f64, f64)>,
    /// (time step, x/c of the minimum wall shear)
    pub min_position: Vec<(f64, f64)>,
    /// (time step, pressure coefficient at the minimum wall shear)
    pub min_pressure: Option<Vec<(f64, f64)>>,
    /// (x/c, pitch minus tangent angle) at the shedding time step
    pub tangent_profile: Vec<(f64, f64)>,
    /// (x/c, pressure coefficient) at the shedding time step
    pub shed_pressure: Option<Vec<(f64, f64)>>,
}
impl Summary {
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample(x: f64, wall_shear: f64) -> SurfaceSample {
        SurfaceSample {
            x,
            y: 0.01,
            wall_shear,
            pressure: None,
        }
    }

    fn aggregate(n_step: usize) -> Aggregate {
        let mut aggregate = Aggregate::default();
        for step in 1..=n_step {
            let shift = step as f64 * 1e-3;
            aggregate.extend(
                4000 + step,
                [
                    sample(0.001, 1.),
                    sample(0.005, -shift),
                    sample(0.01, -shift),
                    sample(0.02, 0.5),
                ],
            );
        }
        aggregate
    }

    #[test]
    fn last_time_steps() {
        let aggregate = aggregate(15);
        assert_eq!(aggregate.len(), 60);
        assert_eq!(aggregate.time_steps().len(), 15);
        let summary = aggregate.summary(0.1, 11, None, "ellipse, k = 0.12".to_string());
        assert_eq!(summary.profiles.len(), 11);
        assert_eq!(summary.profiles[0].time_step, 4005);
        assert_eq!(summary.profiles[10].time_step, 4015);
        assert_eq!(summary.profiles[0].points.len(), 4);
        assert!((summary.profiles[0].points[1].0 - 0.05).abs() < 1e-12);
        assert_eq!(summary.min_wall_shear.len(), 11);
        assert!((summary.min_wall_shear[10].1 + 0.015).abs() < 1e-12);
        // first of the equal minima
        assert!((summary.min_position[10].1 - 0.05).abs() < 1e-12);
        assert!(summary.min_pressure.is_none());
        assert!(summary.tangent_profile.is_empty());
    }

    #[test]
    fn pressure_at_minimum() {
        let mut aggregate = Aggregate::default();
        aggregate.extend(
            7,
            [
                SurfaceSample {
                    pressure: Some(-1.2),
                    ..sample(0.001, 0.3)
                },
                SurfaceSample {
                    pressure: Some(-2.5),
                    ..sample(0.002, -0.1)
                },
            ],
        );
        let summary = aggregate.summary(1., 11, None, String::new());
        assert_eq!(summary.min_pressure, Some(vec![(7., -2.5)]));
    }

    #[test]
    fn export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aggregate.csv");
        aggregate(2).to_csv(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("time-step,x-rotated,y-rotated,calculated-wallshear,pressure-coefficient")
        );
        assert_eq!(lines.next(), Some("4001,0.001,0.01,1,"));
        assert_eq!(contents.lines().count(), 9);
    }
}
