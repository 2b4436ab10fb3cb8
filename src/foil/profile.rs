use super::{FoilError, FoilGeometry, LocalRadius, Result};
use nalgebra::{Point2, Vector2};
use serde::Deserialize;
use std::{
    f64::consts::{FRAC_PI_2, PI},
    fs::File,
    path::Path,
};

#[derive(Deserialize, Debug)]
struct Record {
    x: f64,
    y: f64,
}

/// Foil profile as a closed polyline of surface points
///
/// Points are in the body frame, the leading edge at the origin and the
/// chord along the x axis.
#[derive(Debug, Clone)]
pub struct FoilProfile {
    name: String,
    points: Vec<Point2<f64>>,
    pivot: Point2<f64>,
}
impl FoilProfile {
    pub fn new<S: Into<String>>(name: S, points: Vec<[f64; 2]>, pivot: [f64; 2]) -> Result<Self> {
        if points.len() < 2 {
            return Err(FoilError::Profile(points.len()));
        }
        Ok(Self {
            name: name.into(),
            points: points.into_iter().map(Point2::from).collect(),
            pivot: pivot.into(),
        })
    }
    /// Elliptic profile of `n` points pitching about mid-chord
    pub fn ellipse<S: Into<String>>(name: S, chord: f64, thickness: f64, n: usize) -> Self {
        let (a, b) = (0.5 * chord, 0.5 * thickness);
        let n = n.max(3);
        Self {
            name: name.into(),
            points: (0..n)
                .map(|i| {
                    let (s, c) = (2. * PI * i as f64 / n as f64).sin_cos();
                    Point2::new(a * (1. - c), b * s)
                })
                .collect(),
            pivot: Point2::new(a, 0.),
        }
    }
    /// Loads the profile from a CSV file with `x,y` columns
    pub fn from_path<S: Into<String>, P: AsRef<Path>>(
        name: S,
        path: P,
        pivot: [f64; 2],
    ) -> Result<Self> {
        let csv_file = File::open(path.as_ref())?;
        log::info!("Loading {:?}...", path.as_ref());
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_file);
        let mut points = vec![];
        for result in rdr.deserialize() {
            let Record { x, y } = result?;
            points.push([x, y]);
        }
        Self::new(name, points, pivot)
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn pivot(&self) -> [f64; 2] {
        [self.pivot.x, self.pivot.y]
    }
    /// Iterator over the profile segments, closing the polyline
    fn segments(&self) -> impl Iterator<Item = (&Point2<f64>, &Point2<f64>)> {
        self.points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
    }
    /// Returns the segment nearest to `p`
    fn nearest_segment(&self, p: &Point2<f64>) -> Option<Vector2<f64>> {
        self.segments()
            .map(|(a, b)| {
                let ab = b - a;
                let t = if ab.norm_squared() > 0. {
                    ((p - a).dot(&ab) / ab.norm_squared()).clamp(0., 1.)
                } else {
                    0.
                };
                ((a + ab * t - p).norm_squared(), ab)
            })
            .min_by(|(d1, _), (d2, _)| d1.total_cmp(d2))
            .map(|(_, ab)| ab)
    }
}
impl FoilGeometry for FoilProfile {
    fn name(&self) -> &str {
        &self.name
    }
    /// Tangent angle in ]-pi/2,pi/2], 0 along the chord line
    fn tangent_angle(&self, x: f64, y: f64) -> f64 {
        let Some(ab) = self.nearest_segment(&Point2::new(x, y)) else {
            return 0f64;
        };
        let angle = ab.y.atan2(ab.x);
        if angle > FRAC_PI_2 {
            angle - PI
        } else if angle <= -FRAC_PI_2 {
            angle + PI
        } else {
            angle
        }
    }
    /// Radius from the pivot, its angle measured from the chord line
    /// towards the leading edge
    fn local_radius(&self, x: f64, y: f64) -> LocalRadius {
        let r = Point2::new(x, y) - self.pivot;
        LocalRadius {
            r1: self.pivot.coords.norm(),
            r2: r.norm(),
            theta_r2: r.y.atan2(-r.x),
        }
    }
}
