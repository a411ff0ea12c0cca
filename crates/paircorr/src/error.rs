// We define a separate Error type within the public crate that wraps the
// stringly errors returned by `paircorr_nostd_internal`. Keeping the kind
// private leaves us free to reorganize the variants later.

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The underlying internal error type
#[non_exhaustive]
#[derive(Clone, Debug)]
enum ErrorKind {
    /// An error that occurs when a problematic bin edge (or grid) is specified
    BinEdge(BinEdgeError),
    /// An error that occurs when a box side is non-positive or has the wrong
    /// number of components
    BoxSide(BoxSideError),
    /// An error that occurs when a frame index lies outside of the trajectory
    FrameIndex(FrameIndexError),
    /// An error that occurs when an integer lies outside of the acceptable
    /// range of values
    IntegerRange(IntegerRangeError),
    /// An error that occurs when a configuration value (other than a bin edge
    /// or an integer count) is unusable
    InvalidArgument(InvalidArgumentError),
    /// An error that occurs within `paircorr_nostd_internal`
    InternalLegacyAdHoc(InternalLegacyAdHocError),
    /// An error that occurs when arrays have incompatible shapes
    Shape(ShapeError),
}

// define constructor methods for Error
impl Error {
    /// produce an error indicating that a problematic bin edge (or grid) was
    /// specified.
    pub(crate) fn bin_edge(who: &str, what: &str) -> Self {
        Error {
            kind: ErrorKind::BinEdge(BinEdgeError {
                who: who.to_owned(),
                what: what.to_owned(),
            }),
        }
    }

    /// produce an error indicating that the box side of a frame is invalid
    pub(crate) fn box_side(frame: usize, side: &[f64], what: &'static str) -> Self {
        Error {
            kind: ErrorKind::BoxSide(BoxSideError {
                frame,
                side: side.to_vec(),
                what,
            }),
        }
    }

    /// produce an error indicating that a frame index is out of bounds
    pub(crate) fn frame_index(index: usize, n_frames: usize) -> Self {
        Error {
            kind: ErrorKind::FrameIndex(FrameIndexError { index, n_frames }),
        }
    }

    /// produce an error indicating that an integer lies outside the acceptable
    /// range of values
    pub(crate) fn integer_range(
        description: &'static str,
        actual: i64,
        min_val: i64,
        max_val: i64,
    ) -> Self {
        Error {
            kind: ErrorKind::IntegerRange(IntegerRangeError {
                description,
                actual,
                min_val,
                max_val,
            }),
        }
    }

    /// produce an error indicating that a configuration value is unusable
    pub(crate) fn invalid_argument(who: &'static str, what: &'static str) -> Self {
        Error {
            kind: ErrorKind::InvalidArgument(InvalidArgumentError { who, what }),
        }
    }

    /// wraps an internal error string
    pub(crate) fn internal_legacy_adhoc(message: &'static str) -> Self {
        Error {
            kind: ErrorKind::InternalLegacyAdHoc(InternalLegacyAdHocError(message)),
        }
    }

    /// produce an error indicating that arrays have incompatible shapes
    pub(crate) fn shape(what: String) -> Self {
        Error {
            kind: ErrorKind::Shape(ShapeError { what }),
        }
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for ErrorKind {}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::BinEdge(ref err) => err.fmt(f),
            ErrorKind::BoxSide(ref err) => err.fmt(f),
            ErrorKind::FrameIndex(ref err) => err.fmt(f),
            ErrorKind::IntegerRange(ref err) => err.fmt(f),
            ErrorKind::InvalidArgument(ref err) => err.fmt(f),
            ErrorKind::InternalLegacyAdHoc(ref msg) => msg.fmt(f),
            ErrorKind::Shape(ref err) => err.fmt(f),
        }
    }
}

/// An error that occurs when a problematic bin edge is specified
#[derive(Clone, Debug)]
struct BinEdgeError {
    who: String,
    what: String,
}

impl std::error::Error for BinEdgeError {}

impl core::fmt::Display for BinEdgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let who = self.who.as_str();
        let what = self.what.as_str();
        write!(f, "problem with {who}: {what}")
    }
}

/// An error that occurs when the box side of a frame is invalid
#[derive(Clone, Debug)]
struct BoxSideError {
    frame: usize,
    side: Vec<f64>,
    what: &'static str,
}

impl std::error::Error for BoxSideError {}

impl core::fmt::Display for BoxSideError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "the box side {:?} of frame {} is invalid: {}",
            self.side, self.frame, self.what
        )
    }
}

/// An error that occurs when a frame index is out of bounds
#[derive(Clone, Debug)]
struct FrameIndexError {
    index: usize,
    n_frames: usize,
}

impl std::error::Error for FrameIndexError {}

impl core::fmt::Display for FrameIndexError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "frame {} was requested from a trajectory with {} frames",
            self.index, self.n_frames
        )
    }
}

/// An error that occurs when an integer lies outside of the acceptable
/// range of values
#[derive(Clone, Debug)]
struct IntegerRangeError {
    description: &'static str,
    actual: i64,
    min_val: i64,
    max_val: i64,
}

impl std::error::Error for IntegerRangeError {}

impl core::fmt::Display for IntegerRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{} has a value of {}. The value should be no less than {} and \
             not exceed {}",
            self.description, self.actual, self.min_val, self.max_val
        )
    }
}

/// An error that occurs when a configuration value is unusable
#[derive(Clone, Debug)]
struct InvalidArgumentError {
    who: &'static str,
    what: &'static str,
}

impl std::error::Error for InvalidArgumentError {}

impl core::fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid {}: {}", self.who, self.what)
    }
}

/// Wraps the string errors from `paircorr_nostd_internal`
#[derive(Clone)]
struct InternalLegacyAdHocError(&'static str);

impl std::error::Error for InternalLegacyAdHocError {}

impl core::fmt::Display for InternalLegacyAdHocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::fmt::Debug for InternalLegacyAdHocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.0, f)
    }
}

/// An error that occurs when arrays have incompatible shapes
#[derive(Clone, Debug)]
struct ShapeError {
    what: String,
}

impl std::error::Error for ShapeError {}

impl core::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "incompatible array shapes: {}", self.what)
    }
}
