use std::io;

/// All error types for the ribbon builder and its tooling.
#[derive(thiserror::Error, Debug)]
pub enum RibbonError {
    #[error("Invalid pose at index {index}: {reason}")]
    InvalidPose { index: usize, reason: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Input error: {0}")]
    Input(String),
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RibbonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_strings() {
        let e = RibbonError::InvalidPose {
            index: 3,
            reason: "non-finite matrix entry".into(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid pose at index 3: non-finite matrix entry"
        );

        let e = RibbonError::InvalidConfig("width is NaN".into());
        assert_eq!(e.to_string(), "Invalid configuration: width is NaN");

        let e = RibbonError::Input("bad file".into());
        assert_eq!(e.to_string(), "Input error: bad file");

        let e = RibbonError::Output("disk full".into());
        assert_eq!(e.to_string(), "Output error: disk full");
    }

    #[test]
    fn from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let e: RibbonError = io_err.into();
        assert!(matches!(e, RibbonError::Io(_)));
        assert!(e.to_string().contains("file missing"));
    }
}
