use std::error::Error;
use std::fmt;
use std::io;

/// Common result type for mdtoc operations
pub type BoxResult<T> = Result<T, Box<dyn Error>>;

/// Error types for mdtoc operations
#[derive(Debug)]
pub enum TocError {
    /// IO error wrapper
    Io(io::Error),
    /// Configuration error
    Config(String),
    /// Marker pattern failed to compile
    Pattern(regex::Error),
    /// An option that no longer exists was set
    RemovedOption {
        name: &'static str,
        hint: &'static str,
    },
    /// Inline rule or render hook wiring error
    Rule(String),
}

impl fmt::Display for TocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TocError::Io(err) => write!(f, "IO error: {}", err),
            TocError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TocError::Pattern(err) => write!(f, "Invalid marker pattern: {}", err),
            TocError::RemovedOption { name, hint } => {
                write!(f, "Option `{}` was removed: {}", name, hint)
            }
            TocError::Rule(msg) => write!(f, "Rule error: {}", msg),
        }
    }
}

impl Error for TocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TocError::Io(err) => Some(err),
            TocError::Pattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TocError {
    fn from(err: io::Error) -> Self {
        TocError::Io(err)
    }
}

impl From<regex::Error> for TocError {
    fn from(err: regex::Error) -> Self {
        TocError::Pattern(err)
    }
}
