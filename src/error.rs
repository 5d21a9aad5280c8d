use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, NetErr>;

/// The network's error type.
#[derive(Debug)]
pub enum NetErr {
    /// An input vector's length doesn't match the network's input size.
    InputSizeMismatch { got: usize, expected: usize },
    /// A target vector's length doesn't match the network's output size.
    OutputSizeMismatch { got: usize, expected: usize },
    /// A sparse input addresses a slot past the bias unit.
    SparseIndexOutOfRange { index: usize, input_size: usize },
    /// The amount of samples and targets handed to a training call differ.
    SampleCountMismatch { inputs: usize, targets: usize },
    /// A training call received no samples.
    EmptyDataset,
    /// The weight initialization distribution couldn't be built.
    InvalidInit(String),
    /// The persistence sink or source failed.
    Io(io::Error),
    /// The snapshot couldn't be encoded or decoded.
    Serialization(serde_json::Error),
    /// The snapshot was written by an incompatible format version.
    UnsupportedVersion { found: u32, expected: u32 },
    /// The snapshot decoded fine but its layers and matrices don't fit together.
    CorruptSnapshot(String),
    /// The network holds a NaN or infinite value, which a snapshot can't represent.
    NonFiniteState(String),
}

impl Display for NetErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetErr::InputSizeMismatch { got, expected } => write!(
                f,
                "amount of input variables doesn't match, got {got} and expected {expected}"
            ),
            NetErr::OutputSizeMismatch { got, expected } => write!(
                f,
                "amount of output variables doesn't match, got {got} and expected {expected}"
            ),
            NetErr::SparseIndexOutOfRange { index, input_size } => write!(
                f,
                "sparse input index {index} is out of range for an input layer of size {input_size}"
            ),
            NetErr::SampleCountMismatch { inputs, targets } => write!(
                f,
                "there are {inputs} input samples but {targets} targets"
            ),
            NetErr::EmptyDataset => write!(f, "tried to train on an empty dataset"),
            NetErr::InvalidInit(msg) => write!(f, "invalid weight initialization: {msg}"),
            NetErr::Io(e) => write!(f, "io error: {e}"),
            NetErr::Serialization(e) => write!(f, "failed to (de)serialize network: {e}"),
            NetErr::UnsupportedVersion { found, expected } => write!(
                f,
                "snapshot version mismatch, found {found} and expected {expected}"
            ),
            NetErr::CorruptSnapshot(msg) => write!(f, "corrupt snapshot: {msg}"),
            NetErr::NonFiniteState(msg) => write!(f, "network state isn't finite: {msg}"),
        }
    }
}

impl Error for NetErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetErr::Io(e) => Some(e),
            NetErr::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for NetErr {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NetErr {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            return Self::Io(e.into());
        }

        Self::Serialization(e)
    }
}

impl From<rand_distr::uniform::Error> for NetErr {
    fn from(e: rand_distr::uniform::Error) -> Self {
        Self::InvalidInit(e.to_string())
    }
}
