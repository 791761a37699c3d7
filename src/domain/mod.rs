//! Dotted-path editing of libvirt domain documents.

pub use error::{MergeError, ParseError, PathError, SerializeError};
pub use merger::{LogReporter, MergeOutput, MergeReporter, MergeSummary, Override, PathMerger};
pub use path::DottedPath;
pub use tree::{DomainTree, Element, Node};
pub use xml::SerializeOptions;

pub mod error;
pub mod merger;
pub mod path;
pub mod tree;
pub mod xml;
