use thiserror::Error;

/// Errors raised while reading a domain document into a tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("The domain document is empty")]
    Empty,
    #[error("The domain document is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("The domain document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("The domain document has no root element")]
    NoRoot,
    #[error("The domain document has more than one root element, found <{0}> after the root")]
    MultipleRoots(String),
    #[error("The domain document has text outside of the root element")]
    TextOutsideRoot,
    #[error("The element <{0}> is never closed")]
    UnclosedElement(String),
    #[error("Unexpected closing tag </{0}>")]
    UnexpectedEnd(String),
}

/// Errors raised while resolving a dotted path in a tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("The path is empty")]
    Empty,
    #[error("The segment '{segment}' of path '{path}' is not a valid element name")]
    InvalidSegment { path: String, segment: String },
    #[error("'{0}' addresses repeated elements and cannot be resolved to a single node")]
    RepeatedElement(String),
    #[error("'{0}' does not exist")]
    MissingAncestor(String),
    #[error("'{0}' holds a value and cannot contain child elements")]
    NotAContainer(String),
    #[error("'{0}' has child elements and cannot be assigned a value")]
    HasChildren(String),
}

/// Errors raised while rendering a tree back to XML.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("Could not write the domain document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("The element '{0}' contains a list directly inside a list")]
    NestedList(String),
    #[error("An element with an empty name cannot be written")]
    EmptyName,
    #[error("The rendered domain document is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Fatal errors of a whole merge.
///
/// Failures while assigning a single value are not part of this type, they are
/// reported and the override is skipped.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Failed to parse the domain document")]
    Parse(#[source] ParseError),
    #[error("Failed to create the parent elements of '{path}'")]
    Ensure {
        path: String,
        #[source]
        source: PathError,
    },
    #[error("Failed to serialize the updated domain document")]
    Serialize(#[source] SerializeError),
}
