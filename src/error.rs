use thiserror::Error;

use crate::convert::ConvertError;
use crate::harness::HarnessError;
use crate::io::FormatError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Harness(#[from] HarnessError),
}
