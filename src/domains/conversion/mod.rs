//! File conversion domain.
//!
//! A request enters with a path or inline content, gets its own scratch
//! workspace, is turned into a concrete input file, routed to a collaborator,
//! and leaves as a uniform envelope.

pub mod collaborators;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod materializer;
pub mod request;
pub mod resolver;
pub mod service;
pub mod workspace;

pub use collaborators::{Collaborator, CollaboratorKind, Collaborators};
pub use dispatcher::{Dispatcher, FormatPair};
pub use envelope::{ConversionResult, Envelope};
pub use error::ConversionError;
pub use request::{ConversionInput, ConversionRequest};
pub use resolver::{CandidateFile, FileResolver};
pub use service::Converter;
pub use workspace::ScratchWorkspace;
