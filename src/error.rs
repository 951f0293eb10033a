//! Error handling for the Stencil application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for Stencil operations.
///
/// Every fatal condition of a render ends up here. Pruning failures never do:
/// they are logged and the render carries on.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A filesystem operation failed on a specific path
    #[error("Failed to {action} '{path}': {source}.")]
    PathError {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    /// Errors raised by the template engine while parsing or rendering
    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents errors that occur while walking the template tree
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// The context file is unreadable or describes an unsupported shape
    #[error("Context error: {0}.")]
    ContextError(String),

    /// An interactive prompt failed or was aborted
    #[error("Input error: {0}.")]
    PromptError(String),

    /// A variable was looked up that the binding table does not hold
    #[error("Unbound variable '{0}'.")]
    UnboundVariable(String),

    /// A template path rendered into something that cannot be joined under
    /// the output directory
    #[error("Path '{source_path}' rendered to '{rendered}', which is not a valid relative path.")]
    InvalidRenderedPath {
        source_path: String,
        rendered: String,
    },

    /// The output directory exists and the user did not ask to overwrite it
    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
        match err.into_io_error() {
            Some(source) => Error::PathError { action: "walk", path, source },
            None => Error::TemplateError(format!("filesystem loop detected at '{path}'")),
        }
    }
}

impl Error {
    /// Wraps an I/O failure with the operation and the path it concerned.
    pub fn path<P: AsRef<std::path::Path>>(action: &'static str, path: P, source: io::Error) -> Self {
        Error::PathError { action, path: path.as_ref().display().to_string(), source }
    }
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error chain to stderr and exits with status code 1
pub fn default_error_handler(err: anyhow::Error) {
    eprintln!("Error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    std::process::exit(1);
}
