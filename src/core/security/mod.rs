// Security module for path validation and access control
//
// Resolved input files are checked against the configured root directory
// before any conversion reads them.

pub mod path_validator;

pub use path_validator::{PathSecurityError, validate_path};
