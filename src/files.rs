//! Sample files discovery
//!
//! The sample files of a CFD run are the files of the data directory with
//! `les` or `wall` in their names, the time step being the number after the
//! last hyphen, e.g. `foil-wall-12345.txt`.

use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    #[error("sample directory {0:?} not found")]
    NotFound(PathBuf),
    #[error("invalid sample files pattern")]
    Pattern(#[from] glob::PatternError),
    #[error("failed to list the sample files")]
    Glob(#[from] glob::GlobError),
    #[error("invalid sample file name regex")]
    Regex(#[from] regex::Error),
    #[error("no time step in sample file name {0:?}")]
    TimeStep(String),
    #[error("no sample files in {0:?}")]
    NoSampleFiles(PathBuf),
    #[error("failed to rename the sample file")]
    Io(#[from] std::io::Error),
    #[error("cannot rename {0:?}, {1:?} already exists")]
    Collision(PathBuf, PathBuf),
    #[error("sample file {0:?} is listed twice")]
    Duplicate(PathBuf),
}
type Result<T> = std::result::Result<T, FilesError>;

const EXTENSIONS: [&str; 3] = ["txt", "csv", "dat"];

/// A sample file and its time step
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SamplePath {
    pub time_step: usize,
    pub path: PathBuf,
}

/// Returns the time step encoded in a sample file name
pub fn time_step(file_name: &str) -> Option<usize> {
    let (_, tail) = file_name.rsplit_once('-')?;
    tail.split('.').next()?.parse().ok()
}

/// Appends the `.txt` extension to a file without a known extension
pub fn normalize_extension(path: PathBuf) -> Result<PathBuf> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if EXTENSIONS.contains(&ext) => Ok(path),
        _ => {
            let mut renamed = path.clone().into_os_string();
            renamed.push(".txt");
            let renamed = PathBuf::from(renamed);
            if renamed.exists() {
                return Err(FilesError::Collision(path, renamed));
            }
            log::debug!("renaming {:?} to {:?}", path, renamed);
            fs::rename(&path, &renamed)?;
            Ok(renamed)
        }
    }
}

/// Paths of a CFD run
#[derive(Debug, Clone)]
pub struct Files {
    data_path: PathBuf,
    org_path: Option<PathBuf>,
    project_name: String,
}
impl Files {
    /// Creates the paths from the sample files directory
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        let data_path = data_path.as_ref().to_path_buf();
        let project_name = data_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            data_path,
            org_path: None,
            project_name,
        }
    }
    /// Sets the directory where the outputs of several runs are organized
    pub fn org_path<P: AsRef<Path>>(self, org_path: P) -> Self {
        Self {
            org_path: Some(org_path.as_ref().to_path_buf()),
            ..self
        }
    }
    pub fn project_name<S: Into<String>>(self, project_name: S) -> Self {
        Self {
            project_name: project_name.into(),
            ..self
        }
    }
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
    pub fn project(&self) -> &str {
        &self.project_name
    }
    /// Lists the sample files sorted by time step
    pub fn sample_files(&self) -> Result<Vec<SamplePath>> {
        if !self.data_path.is_dir() {
            return Err(FilesError::NotFound(self.data_path.clone()));
        }
        let re_sample = Regex::new(r"les|wall")?;
        let escaped = glob::Pattern::escape(&self.data_path.to_string_lossy());
        let pattern = Path::new(&escaped).join("*");
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..Default::default()
        };
        let mut samples: Vec<SamplePath> = vec![];
        for entry in glob::glob_with(&pattern.to_string_lossy(), options)? {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            let file_name = match path.file_name().and_then(|name| name.to_str()) {
                Some(file_name) if re_sample.is_match(file_name) => file_name.to_string(),
                _ => continue,
            };
            let time_step =
                time_step(&file_name).ok_or_else(|| FilesError::TimeStep(file_name.clone()))?;
            samples.push(SamplePath {
                time_step,
                path: normalize_extension(path)?,
            });
        }
        if samples.is_empty() {
            return Err(FilesError::NoSampleFiles(self.data_path.clone()));
        }
        samples.sort();
        if let Some(pair) = samples.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(FilesError::Duplicate(pair[1].path.clone()));
        }
        log::info!(
            "{}: found {} sample files in {:?}",
            self.project_name,
            samples.len(),
            self.data_path
        );
        Ok(samples)
    }
    /// Returns the path of an output file
    ///
    /// Outputs go to the organized path, named after the foil geometry and the
    /// reduced frequency, or next to the data directory otherwise.
    pub fn output_path(&self, geo_name: &str, reduced_frequency: f64, name: &str) -> PathBuf {
        match &self.org_path {
            Some(org_path) => org_path.join(format!(
                "{}-{}-{}",
                geo_name,
                format!("{:.2}", reduced_frequency).replace('.', ""),
                name
            )),
            None => self
                .data_path
                .parent()
                .unwrap_or(&self.data_path)
                .join(format!("_mod-{}", name)),
        }
    }
}
