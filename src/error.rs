use crate::{
    files::FilesError, foil::FoilError, sample::SampleError, scanner::ScanError,
    summary::SummaryError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `sample` module")]
    Sample(#[from] SampleError),
    #[error("Error in the `files` module")]
    Files(#[from] FilesError),
    #[error("Error in the `foil` module")]
    Foil(#[from] FoilError),
    #[error("Error in the `scanner` module")]
    Scan(#[from] ScanError),
    #[error("Error in the `summary` module")]
    Summary(#[from] SummaryError),
}
