use crate::pixelbuffer::Size;

/// Errors returned by the seam carver.
#[derive(thiserror::Error, Debug)]
pub enum SeamError {
    #[error("energy filter returned a {found} map for a {expected} image")]
    InvalidFilterOutput { expected: Size, found: Size },
    #[error("target size {0} has a zero dimension")]
    InvalidTargetSize(Size),
    #[error("buffer data holds {found} elements, shape needs {expected}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}
