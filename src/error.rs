use gogen_syntax::{ParseFailure, PrintError};
use thiserror::Error;

/// Failures of the render-and-reparse check in [`crate::round_trip`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("rendering failed: {0}")]
    Print(#[from] PrintError),
    #[error("rendered source does not parse: {0}")]
    Parse(#[from] ParseFailure),
    /// The printed text parsed, but not into a node of the built kind.
    #[error("rendered {0} could not be located in the reparsed source")]
    Shape(&'static str),
}
