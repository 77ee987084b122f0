//! Error classification for failed units of work.

pub(crate) mod classification;
pub(crate) mod classifier;
pub(crate) mod kind;
pub(crate) mod source;

pub use classification::ErrorClassification;
pub use classifier::{classify, extract_message, extract_status, kind_for};
pub use kind::{ErrorKind, ParseErrorKindError};
pub use source::{DynError, ErrorSource};
