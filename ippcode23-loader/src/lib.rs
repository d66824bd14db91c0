//! Loads IPPcode23 XML source into the [`ippcode23`] engine.
//!
//! This crate owns the external contract: turning an XML document into the
//! [`ippcode23::RawInstruction`] stream the core crate's `Program::build`
//! consumes, and the command-line binary that wires a source file and an
//! input file to a running [`ippcode23::Engine`].

mod error;
mod xml;

pub use error::{CliError, LoaderError};
pub use xml::parse;
