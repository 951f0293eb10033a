//! Stencil is a template processing system for project scaffolding.
//! It binds the variables a template declares to prompted or default values
//! and renders the template tree, names and contents alike, into a new
//! project directory.

/// Variable bindings resolved by prompting or from defaults
pub mod binding;

/// Command-line interface module for the Stencil application
pub mod cli;

/// Common constants: file and directory names, helper defaults
pub mod constants;

/// Context file loading and the variable schema model
/// Supports JSON and YAML formats (project.json, project.yml, project.yaml)
pub mod context;

/// Error types and handling for the Stencil application
pub mod error;

/// Filters and functions available inside templates
pub mod helpers;

/// Logger initialisation for the binary
pub mod logger;

/// Metadata recorded next to generated projects
pub mod metadata;

/// Walks and renders the template tree
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Removal of generated files that rendered blank
pub mod prune;

/// Template rendering engine
pub mod renderer;

/// Template handle tying context, bindings and processing together
pub mod template;
