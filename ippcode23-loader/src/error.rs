use std::fmt;

use ippcode23::{BuildFault, Fault};

/// Everything that can go wrong turning XML source into a
/// [`ippcode23::RawInstruction`] stream, layered the same way the engine's
/// own `Fault`/`BuildFault` pair is: rich internal detail (with the
/// failing instruction's address, where one exists) at the point of
/// failure, collapsed to a process exit code by the caller.
#[derive(Debug)]
pub enum LoaderError {
    /// The source is not well-formed XML at all.
    Malformed(roxmltree::Error),
    /// The XML is well-formed but does not match the expected
    /// `<program>`/`<instruction>`/`<argN>` shape.
    Structure(String),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoaderError::Malformed(err) => write!(f, "XML is not well-formed: {}", err),
            LoaderError::Structure(msg) => write!(f, "unexpected XML structure: {}", msg),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<roxmltree::Error> for LoaderError {
    fn from(err: roxmltree::Error) -> LoaderError {
        LoaderError::Malformed(err)
    }
}

impl LoaderError {
    /// The process exit code this fault corresponds to, per the loader's
    /// part of the exit code taxonomy (`31` malformed XML, `32` structural).
    pub fn exit_code(&self) -> i32 {
        match self {
            LoaderError::Malformed(_) => 31,
            LoaderError::Structure(_) => 32,
        }
    }
}

/// What a command-line invocation failed at, before the loaded program ever
/// reaches the engine.
#[derive(Debug)]
pub enum CliError {
    /// A required argument was missing or unparsable.
    Usage(String),
    /// The source or input file could not be opened/read.
    Io(std::io::Error, std::path::PathBuf),
    Load(LoaderError),
    Build(BuildFault),
    Run(Fault),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Io(err, path) => write!(f, "could not read \"{}\": {}", path.display(), err),
            CliError::Load(err) => write!(f, "{}", err),
            CliError::Build(err) => write!(f, "{}", err),
            CliError::Run(err) => write!(f, "{}", err),
        }
    }
}

impl From<LoaderError> for CliError {
    fn from(err: LoaderError) -> CliError {
        CliError::Load(err)
    }
}

impl From<BuildFault> for CliError {
    fn from(err: BuildFault) -> CliError {
        CliError::Build(err)
    }
}

impl From<Fault> for CliError {
    fn from(err: Fault) -> CliError {
        CliError::Run(err)
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 10,
            CliError::Io(_, _) => 11,
            CliError::Load(err) => err.exit_code(),
            CliError::Build(err) => ippcode23::ExitCode::from(err).code(),
            CliError::Run(err) => ippcode23::ExitCode::from(err).code(),
        }
    }
}
