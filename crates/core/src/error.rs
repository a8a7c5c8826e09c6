use thiserror::Error;

use crate::model::{CardError, ProgressError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
