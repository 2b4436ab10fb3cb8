//! Surface sample files
//!
//! A sample file is the wall shear export of one time step: a header line of
//! column names followed by comma or whitespace separated numeric rows.
//! Processing rotates the samples into the foil [BodyFrame], keeps the frontal
//! region of the surface facing the flow and appends the `x-rotated`,
//! `y-rotated` and `calculated-wallshear` columns.
//! The `x-rotated` column marks a processed file.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

mod frame;
mod schema;
pub use frame::{BodyFrame, Surface};
pub use schema::{Columns, DerivedColumns, Schema};

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("failed to read the sample file")]
    Io(#[from] std::io::Error),
    #[error("sample file {0:?} has no header")]
    Empty(PathBuf),
    #[error("malformed row #{line}: {token:?} is not a number")]
    MalformedRow { line: usize, token: String },
    #[error("malformed row #{line}: found {found} fields, expected {expected}")]
    FieldCount {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("malformed input schema: missing column {0:?}")]
    MissingColumn(String),
    #[error("failed to write the processed sample file")]
    Csv(#[from] csv::Error),
}
type Result<T> = std::result::Result<T, SampleError>;

/// Frontal region sample in the foil body frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// distance to the leading edge along the chord
    pub x: f64,
    pub y: f64,
    /// wall shear along the body frame x axis
    pub wall_shear: f64,
    pub pressure: Option<f64>,
}

fn parse_row(line: &str, number: usize, n_column: usize) -> Result<Vec<f64>> {
    let row = schema::fields(line)
        .map(|token| {
            token.parse::<f64>().map_err(|_| SampleError::MalformedRow {
                line: number,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    if row.len() != n_column {
        return Err(SampleError::FieldCount {
            line: number,
            found: row.len(),
            expected: n_column,
        });
    }
    Ok(row)
}

/// Sample file contents, tagged by processing state
#[derive(Debug, Clone)]
pub enum Samples {
    Raw(RawSamples),
    Processed(ProcessedSamples),
}
impl Samples {
    /// Reads a sample file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut lines = BufReader::new(File::open(path)?).lines();
        let schema = match lines.next() {
            Some(header) => Schema::parse(&header?),
            None => return Err(SampleError::Empty(path.to_path_buf())),
        };
        if schema.is_empty() {
            return Err(SampleError::Empty(path.to_path_buf()));
        }
        let mut rows = vec![];
        for (i, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(parse_row(&line, i + 2, schema.len())?);
        }
        if schema.is_processed() {
            Ok(Samples::Processed(ProcessedSamples::new(schema, rows)?))
        } else {
            Ok(Samples::Raw(RawSamples::new(schema, rows)?))
        }
    }
    pub fn is_processed(&self) -> bool {
        matches!(self, Samples::Processed(_))
    }
}

/// Samples of a file as exported by the CFD solver
#[derive(Debug, Clone)]
pub struct RawSamples {
    schema: Schema,
    columns: Columns,
    rows: Vec<Vec<f64>>,
}
impl RawSamples {
    pub fn new(schema: Schema, rows: Vec<Vec<f64>>) -> Result<Self> {
        let columns = schema.columns()?;
        Ok(Self {
            schema,
            columns,
            rows,
        })
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    /// Transforms the samples into the body `frame`
    ///
    /// Only the samples of the frontal region within `cutoff` chord are kept,
    /// sorted by increasing distance to the leading edge.
    /// Samples at the same distance keep their file order.
    pub fn process(&self, frame: &BodyFrame, cutoff: f64) -> ProcessedSamples {
        let Columns {
            x,
            y,
            x_wall_shear,
            y_wall_shear,
            ..
        } = self.columns;
        let mut rows: Vec<Vec<f64>> = self
            .rows
            .iter()
            .filter_map(|row| {
                let (x_rotated, y_rotated) = frame.to_body(row[x], row[y]);
                frame.is_frontal(x_rotated, y_rotated, cutoff).then(|| {
                    let mut processed = row.clone();
                    processed.extend([
                        x_rotated,
                        y_rotated,
                        frame.wall_shear(row[x_wall_shear], row[y_wall_shear]),
                    ]);
                    processed
                })
            })
            .collect();
        let n = self.schema.len();
        rows.sort_by(|a, b| a[n].total_cmp(&b[n]));
        ProcessedSamples {
            schema: self.schema.with_derived(),
            columns: DerivedColumns {
                x_rotated: n,
                y_rotated: n + 1,
                wall_shear: n + 2,
            },
            pressure: self.columns.pressure,
            rows,
        }
    }
}

/// Samples in the foil body frame
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSamples {
    schema: Schema,
    columns: DerivedColumns,
    pressure: Option<usize>,
    rows: Vec<Vec<f64>>,
}
impl ProcessedSamples {
    pub fn new(schema: Schema, rows: Vec<Vec<f64>>) -> Result<Self> {
        let columns = schema.derived_columns()?;
        Ok(Self {
            pressure: schema.column(schema::PRESSURE_COEFFICIENT),
            schema,
            columns,
            rows,
        })
    }
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn has_pressure(&self) -> bool {
        self.pressure.is_some()
    }
    /// Keeps the samples of the frontal region within `cutoff` chord
    pub fn frontal(self, frame: &BodyFrame, cutoff: f64) -> Self {
        let DerivedColumns {
            x_rotated,
            y_rotated,
            ..
        } = self.columns;
        Self {
            rows: self
                .rows
                .into_iter()
                .filter(|row| frame.is_frontal(row[x_rotated], row[y_rotated], cutoff))
                .collect(),
            ..self
        }
    }
    /// Iterator over the body frame samples
    pub fn samples(&self) -> impl Iterator<Item = SurfaceSample> + '_ {
        let DerivedColumns {
            x_rotated,
            y_rotated,
            wall_shear,
        } = self.columns;
        self.rows.iter().map(move |row| SurfaceSample {
            x: row[x_rotated],
            y: row[y_rotated],
            wall_shear: row[wall_shear],
            pressure: self.pressure.map(|i| row[i]),
        })
    }
    /// Writes the samples to a comma separated file
    ///
    /// The samples are written to a temporary file of the same directory
    /// that then replaces `path`, an existing file is left as it was if
    /// writing fails.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut wtr = csv::Writer::from_writer(tmp.as_file_mut());
            wtr.write_record(self.schema.names())?;
            for row in &self.rows {
                wtr.write_record(row.iter().map(|value| value.to_string()))?;
            }
            wtr.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Returns the frontal region samples of a sample file
///
/// A raw file is processed and overwritten with its processed samples,
/// a processed file is only filtered.
/// The result is the same either way.
pub fn transform<P: AsRef<Path>>(
    path: P,
    frame: &BodyFrame,
    cutoff: f64,
) -> Result<ProcessedSamples> {
    let path = path.as_ref();
    match Samples::from_path(path)? {
        Samples::Raw(raw) => {
            log::debug!("processing {:?}", path);
            let processed = raw.process(frame, cutoff);
            processed.to_csv(path)?;
            Ok(processed)
        }
        Samples::Processed(processed) => Ok(processed.frontal(frame, cutoff)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Write};
    use tempfile::TempDir;

    const HEADER: &str =
        "nodenumber,x-coordinate,y-coordinate,x-wall-shear,y-wall-shear,pressure-coefficient";

    fn write_raw(dir: &Path, name: &str, rows: &[[f64; 6]]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(
                file,
                "{}, {}, {}, {}, {}, {}",
                row[0], row[1], row[2], row[3], row[4], row[5]
            )
            .unwrap();
        }
        path
    }

    // an ellipse of chord 1 centered at the origin
    fn ellipse_rows(n: usize) -> Vec<[f64; 6]> {
        (0..n)
            .map(|i| {
                let phi = 2. * std::f64::consts::PI * i as f64 / n as f64;
                let (s, c) = phi.sin_cos();
                [i as f64, -0.5 * c, 0.06 * s, c - 0.3, s + 0.1, 0.5 * s]
            })
            .collect()
    }

    #[test]
    fn processing_marks_and_sorts() {
        let dir = TempDir::new().unwrap();
        let path = write_raw(dir.path(), "foil-wall-1001.txt", &ellipse_rows(200));
        let frame = BodyFrame::new(1., 0.2, 0.);
        let processed = transform(&path, &frame, 0.5).unwrap();
        assert!(!processed.is_empty());
        assert!(processed.has_pressure());
        let x: Vec<f64> = processed.samples().map(|s| s.x).collect();
        assert!(x.windows(2).all(|w| w[0] <= w[1]));
        assert!(processed
            .samples()
            .all(|s| s.y > 0. && s.x < 0.5 && s.pressure.is_some()));
        let header = fs::read_to_string(&path).unwrap();
        assert!(header.lines().next().unwrap().contains("x-rotated"));
        assert!(Samples::from_path(&path).unwrap().is_processed());
    }

    #[test]
    fn processing_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_raw(dir.path(), "foil-wall-1002.txt", &ellipse_rows(180));
        let frame = BodyFrame::new(1., -0.35, 0.01);
        let first = transform(&path, &frame, 0.3).unwrap();
        let second = transform(&path, &frame, 0.3).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.samples().zip(second.samples()) {
            assert!((a.x - b.x).abs() < 1e-12);
            assert!((a.y - b.y).abs() < 1e-12);
            assert!((a.wall_shear - b.wall_shear).abs() < 1e-12);
        }
    }

    #[test]
    fn stable_sort() {
        let rows = vec![
            [1., -0.2, 0.05, 1., 0., 0.],
            [2., -0.4, 0.05, 2., 0., 0.],
            [3., -0.2, 0.05, 3., 0., 0.],
            [4., -0.2, 0.05, 4., 0., 0.],
        ];
        let schema = Schema::parse(HEADER);
        let raw = RawSamples::new(schema, rows.iter().map(|r| r.to_vec()).collect()).unwrap();
        // a tiny pitch angle keeps the upper surface without moving the samples
        let frame = BodyFrame::new(1., 1e-12, 0.);
        let processed = raw.process(&frame, 1.);
        let nodes: Vec<f64> = processed.rows().iter().map(|row| row[0]).collect();
        assert_eq!(nodes, vec![2., 1., 3., 4.]);
    }

    #[test]
    fn empty_frontal_region() {
        let dir = TempDir::new().unwrap();
        let path = write_raw(dir.path(), "foil-wall-1003.txt", &ellipse_rows(60));
        let frame = BodyFrame::new(1., 0.2, 0.);
        let processed = transform(&path, &frame, 0.).unwrap();
        assert!(processed.is_empty());
        let processed = transform(&path, &frame, 0.).unwrap();
        assert_eq!(processed.samples().count(), 0);
    }

    #[test]
    fn failed_write_keeps_original() {
        let dir = TempDir::new().unwrap();
        let path = write_raw(dir.path(), "foil-wall-1006.txt", &ellipse_rows(20));
        let original = fs::read_to_string(&path).unwrap();
        let schema = Schema::parse(HEADER).with_derived();
        // a short row makes the CSV writer fail after the header
        let rows = vec![vec![1., 2., 3., 4., 5., 6., 7., 8., 9.], vec![1., 2.]];
        let samples = ProcessedSamples::new(schema, rows).unwrap();
        assert!(samples.to_csv(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        let frame = BodyFrame::new(1., 0.2, 0.);
        assert!(transform(&path, &frame, 0.5).is_ok());
    }

    #[test]
    fn malformed_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foil-wall-1004.txt");
        fs::write(&path, format!("{}\n1,0.1,0.2,abc,0.3,0.4\n", HEADER)).unwrap();
        match Samples::from_path(&path) {
            Err(SampleError::MalformedRow { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "abc");
            }
            other => panic!("expected a malformed row error, found {:?}", other),
        }
    }

    #[test]
    fn missing_wall_shear_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foil-wall-1005.txt");
        fs::write(&path, "nodenumber x-coordinate y-coordinate\n1 0.1 0.2\n").unwrap();
        assert!(matches!(
            Samples::from_path(&path),
            Err(SampleError::MissingColumn(_))
        ));
    }
}
