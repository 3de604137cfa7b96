use thiserror::Error;

/// Errors that can occur while building or exporting a mesh.
#[derive(Debug, Error)]
pub enum Error {
    /// The depth and color frames do not share a pixel grid.
    #[error(
        "frame dimensions differ: depth is {depth_width}x{depth_height}, color is {color_width}x{color_height}"
    )]
    DimensionMismatch {
        /// Width of the depth frame.
        depth_width: u32,
        /// Height of the depth frame.
        depth_height: u32,
        /// Width of the color frame.
        color_width: u32,
        /// Height of the color frame.
        color_height: u32,
    },

    /// A pixel buffer does not hold `width * height` elements.
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// More vertices than a `u32` triangle index can address.
    #[error("too many vertices for 32 bit indices: {0}")]
    TooManyVertices(usize),

    /// The frame source failed to deliver a capture.
    #[error("frame source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reading or writing a mesh file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A mesh file could not be decoded.
    #[error("malformed {format} data: {reason}")]
    Malformed {
        /// Name of the file format.
        format: &'static str,
        /// What was wrong.
        reason: String,
    },
}

impl Error {
    /// Creates a buffer size mismatch error.
    #[must_use]
    pub const fn buffer_mismatch(expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch { expected, actual }
    }

    pub(crate) fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }
}

/// Result type for mesh reconstruction and export.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DimensionMismatch {
            depth_width: 640,
            depth_height: 576,
            color_width: 1280,
            color_height: 720,
        };
        assert_eq!(
            format!("{err}"),
            "frame dimensions differ: depth is 640x576, color is 1280x720"
        );

        let err = Error::buffer_mismatch(12, 10);
        assert_eq!(format!("{err}"), "buffer size mismatch: expected 12, got 10");

        let err = Error::malformed("obj", "bad face");
        assert!(format!("{err}").contains("bad face"));
    }

    #[test]
    fn test_io_error_is_transparent() {
        let err = Error::from(std::io::Error::other("disk full"));
        assert_eq!(format!("{err}"), "disk full");
    }
}
