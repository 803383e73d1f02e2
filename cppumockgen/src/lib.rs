#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]

//! # cppumockgen - CppUTest mock generator
//!
//! This library generates mock substitute functions for the functions and
//! methods declared in a C or C++ header, together with companion
//! "expectation" functions that register expected calls with CppUTest's
//! mocking support.
//!
//! Parsing the header is delegated to a [`FrontEnd`]; [`JsonFrontEnd`] reads
//! a declaration tree dumped by an external clang-based tool.

#[cfg(test)]
mod tests;

mod ast;
mod classifier;
mod config;
mod data_kind;
mod declarations;
mod diagnostics;
mod expectation;
mod frontend;
mod generator;
mod mock_body;
mod mockability;
mod template;

use std::path::PathBuf;

pub use ast::{
    Access, Builtin, CallableDeclaration, CallableKind, Parameter, PointerLevel, Qualifiers,
    Reference, TypeCategory, TypeDescriptor,
};
pub use classifier::{BufferSize, Classification, Classifier, Origin};
pub use config::{Config, ConfigError, ConfigErrorKind, ExprModifier, OverrideRule, Role, Selector};
pub use data_kind::DataKind;
pub use declarations::{AnalyzedDeclaration, DeclarationSet};
pub use diagnostics::{Color, Colorizer, Diagnostic, Severity};
pub use expectation::ExpectationMode;
pub use frontend::{
    Entity, FrontEnd, FunctionEntity, JsonFrontEnd, ParameterEntity, ParseRequest,
    TranslationUnit, collect_declarations,
};
pub use generator::{Destination, GeneratedFiles, MockGenerator, OutputPaths, Session};
pub use mockability::{Unmockable, evaluate as evaluate_mockability};

/// A possible error that can be encountered in our library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A malformed override option.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The front-end reported errors for the input.
    #[error("{} error(s) parsing '{}'", .errors.len(), .path.display())]
    Parse {
        /// The input file.
        path: PathBuf,
        /// Error and fatal diagnostics.
        errors: Vec<Diagnostic>,
        /// Warnings reported alongside the errors.
        warnings: Vec<Diagnostic>,
    },
    /// The input is missing or unreadable.
    #[error("{0}")]
    Input(String),
    /// The input parsed cleanly but declares nothing that can be mocked.
    #[error("The input file does not contain any mockable function.")]
    NothingToMock {
        /// The input file.
        path: PathBuf,
    },
    /// An output file could not be written.
    #[error("cannot write '{}': {source}", .path.display())]
    Output {
        /// The destination.
        path: PathBuf,
        /// The underlying failure.
        source: std::io::Error,
    },
    /// The front-end could not run.
    #[error("{0}")]
    FrontEnd(String),
    /// An output file template failed to render.
    #[error(transparent)]
    Template(#[from] askama::Error),
    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A type alias for `std::result::Result` that defaults to our error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
