use indexmap::IndexMap;
use log::{debug, warn};

use crate::domain::error::PathError;
use crate::domain::path::DottedPath;

/// A node of the domain document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element without attributes or child elements, holding its text.
    Scalar(String),
    /// An element with attributes and/or child elements.
    Container(Element),
    /// Repeated sibling elements sharing the same name.
    List(Vec<Node>),
}

/// Contents of a container element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
    pub children: IndexMap<String, Node>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child element, turning repeated names into a list.
    pub(crate) fn push_child(&mut self, name: String, node: Node) {
        match self.children.get_mut(&name) {
            None => {
                self.children.insert(name, node);
            }
            Some(Node::List(items)) => items.push(node),
            Some(existing) => {
                let first = std::mem::replace(existing, Node::List(Vec::new()));
                *existing = Node::List(vec![first, node]);
            }
        }
    }

    /// Build the node for an element, collapsing plain text elements to scalars.
    pub(crate) fn into_node(self) -> Node {
        if self.attributes.is_empty() && self.children.is_empty() {
            Node::Scalar(self.text.unwrap_or_default())
        } else {
            Node::Container(self)
        }
    }
}

impl Node {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Container(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }

    /// The text value of the node, if it is an element holding text.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Scalar(value) => Some(value),
            Node::Container(element) => element.text.as_deref(),
            Node::List(_) => None,
        }
    }

    /// Replace the text of the node. Attributes of a container are kept.
    fn assign(&mut self, value: &str) {
        match self {
            Node::Container(element) if !element.attributes.is_empty() => {
                element.text = Some(value.to_string()).filter(|v| !v.is_empty());
            }
            _ => *self = Node::Scalar(value.to_string()),
        }
    }

    /// Turn the node into a container, dropping a scalar value if there is one.
    /// Repeated elements have no single container and give `None`.
    fn make_container(&mut self, path: &str) -> Option<&mut Element> {
        if let Node::Scalar(value) = self {
            if !value.is_empty() {
                warn!("Replacing the value '{}' of '{}' with an element", value, path);
            }
            *self = Node::Container(Element::new());
        }
        match self {
            Node::Container(element) => Some(element),
            _ => None,
        }
    }
}

/// Collapse containers left without attributes or children along `segments`
/// back into scalars, the form they take when read from XML.
fn collapse_empty(node: &mut Node, segments: &[String]) {
    let Node::Container(element) = node else {
        return;
    };
    if let Some((first, rest)) = segments.split_first() {
        if let Some(child) = element.children.get_mut(first) {
            collapse_empty(child, rest);
        }
    }
    if element.attributes.is_empty() && element.children.is_empty() {
        let text = element.text.take();
        *node = Node::Scalar(text.unwrap_or_default());
    }
}

/// An in-memory libvirt domain document.
///
/// Paths are resolved relative to the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTree {
    pub root_name: String,
    pub root: Node,
}

impl DomainTree {
    pub fn new(root_name: impl Into<String>, root: Node) -> Self {
        Self {
            root_name: root_name.into(),
            root,
        }
    }

    /// Look up the node at a dotted path.
    ///
    /// # Arguments
    ///
    /// * `path`: The dotted path, relative to the root element
    ///
    /// returns: Option<&Node>
    pub fn get(&self, path: &str) -> Option<&Node> {
        path.split('.').try_fold(&self.root, |node, segment| match node {
            Node::Container(element) => element.children.get(segment),
            _ => None,
        })
    }

    /// Make sure every element above the one addressed by `path` exists and can
    /// hold child elements.
    ///
    /// Missing elements are created empty and scalar elements on the way are
    /// replaced with empty ones. The addressed element itself is not created.
    /// The walk stops without error at repeated elements, since they already
    /// exist and nothing has to be inserted; assigning below them then fails in
    /// [DomainTree::set_value].
    /// Calling this twice with the same path changes nothing the second time.
    ///
    /// # Arguments
    ///
    /// * `path`: The dotted path whose parents should exist
    ///
    /// returns: Result<(), PathError>
    pub fn ensure_path(&mut self, path: &DottedPath) -> Result<(), PathError> {
        for index in 0..path.parent_segments().len() {
            path.check_segment(index)?;
        }

        let Some(mut current) = self.root.make_container(&self.root_name) else {
            return Ok(());
        };
        for (index, segment) in path.parent_segments().iter().enumerate() {
            let prefix = path.prefix(index + 1);
            let child = current.children.entry(segment.clone()).or_insert_with(|| {
                debug!("Creating element '{}'", prefix);
                Node::Container(Element::new())
            });
            match child.make_container(&prefix) {
                Some(element) => current = element,
                None => {
                    debug!("'{}' is a repeated element, not creating anything below it", prefix);
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Turn elements on the way to `path` that ended up without attributes or
    /// children back into scalars.
    ///
    /// Used after a failed [DomainTree::set_value], so parents created for the
    /// override do not linger as empty containers.
    pub fn collapse_empty(&mut self, path: &DottedPath) {
        collapse_empty(&mut self.root, path.parent_segments());
    }

    /// Assign a scalar value to the element addressed by `path`.
    ///
    /// Every parent must already be a container, see [DomainTree::ensure_path].
    /// An element that only carries attributes keeps them and gets `value` as
    /// its text.
    ///
    /// # Arguments
    ///
    /// * `path`: The dotted path of the element to set
    /// * `value`: The new text value
    ///
    /// returns: Result<(), PathError>
    pub fn set_value(&mut self, path: &DottedPath, value: &str) -> Result<(), PathError> {
        let mut current = match &mut self.root {
            Node::Container(element) => element,
            _ => return Err(PathError::NotAContainer(self.root_name.clone())),
        };
        for (index, segment) in path.parent_segments().iter().enumerate() {
            let prefix = || path.prefix(index + 1);
            current = match current.children.get_mut(segment) {
                Some(Node::Container(element)) => element,
                Some(Node::Scalar(_)) => return Err(PathError::NotAContainer(prefix())),
                Some(Node::List(_)) => return Err(PathError::RepeatedElement(prefix())),
                None => return Err(PathError::MissingAncestor(prefix())),
            };
        }

        let leaf = path.check_segment(path.segments().len() - 1)?;
        match current.children.get_mut(leaf) {
            None => {
                current
                    .children
                    .insert(leaf.to_string(), Node::Scalar(value.to_string()));
            }
            Some(Node::Container(element)) if !element.children.is_empty() => {
                return Err(PathError::HasChildren(path.to_string()));
            }
            Some(Node::List(_)) => {
                return Err(PathError::RepeatedElement(path.to_string()));
            }
            Some(node) => node.assign(value),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn path(p: &str) -> DottedPath {
        DottedPath::parse(p).unwrap()
    }

    fn domain_with_devices() -> DomainTree {
        let mut root = Element::new();
        root.push_child("devices".to_string(), Node::Scalar(String::new()));
        DomainTree::new("domain", Node::Container(root))
    }

    #[test]
    fn test_push_child_builds_list() {
        let mut element = Element::new();
        element.push_child("disk".to_string(), Node::Scalar("a".to_string()));
        element.push_child("disk".to_string(), Node::Scalar("b".to_string()));
        element.push_child("disk".to_string(), Node::Scalar("c".to_string()));
        assert_eq!(
            element.children["disk"],
            Node::List(vec![
                Node::Scalar("a".to_string()),
                Node::Scalar("b".to_string()),
                Node::Scalar("c".to_string()),
            ])
        );
    }

    #[test]
    fn test_ensure_creates_parents_only() {
        let mut tree = domain_with_devices();
        tree.ensure_path(&path("devices.disk.driver")).unwrap();

        assert!(tree.get("devices").unwrap().is_container());
        assert!(tree.get("devices.disk").unwrap().is_container());
        assert!(tree.get("devices.disk.driver").is_none());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut tree = domain_with_devices();
        tree.ensure_path(&path("devices.disk.driver")).unwrap();
        let once = tree.clone();
        tree.ensure_path(&path("devices.disk.driver")).unwrap();
        assert_eq!(tree, once);
    }

    #[test]
    fn test_ensure_converts_scalar_root() {
        let mut tree = DomainTree::new("domain", Node::Scalar(String::new()));
        tree.ensure_path(&path("name")).unwrap();
        assert_eq!(tree.root, Node::Container(Element::new()));
    }

    fn domain_with_two_disks() -> DomainTree {
        let mut devices = Element::new();
        devices.push_child("disk".to_string(), Node::Scalar(String::new()));
        devices.push_child("disk".to_string(), Node::Scalar(String::new()));
        let mut root = Element::new();
        root.push_child("devices".to_string(), Node::Container(devices));
        DomainTree::new("domain", Node::Container(root))
    }

    #[test]
    fn test_ensure_stops_at_repeated_elements() {
        let mut tree = domain_with_two_disks();
        let original = tree.clone();

        tree.ensure_path(&path("devices.disk.driver.name")).unwrap();
        assert_eq!(tree, original);

        assert_eq!(
            tree.set_value(&path("devices.disk.driver.name"), "qemu"),
            Err(PathError::RepeatedElement("devices.disk".to_string()))
        );
    }

    #[test]
    fn test_ensure_checks_segments_before_changing_anything() {
        let mut tree = domain_with_devices();
        let original = tree.clone();
        assert!(matches!(
            tree.ensure_path(&path("cpu.9bad.model")),
            Err(PathError::InvalidSegment { .. })
        ));
        assert_eq!(tree, original);
    }

    #[test]
    fn test_collapse_empty_after_failed_set() {
        let mut tree = domain_with_devices();
        let failing = path("devices.disk.9bad");

        tree.ensure_path(&failing).unwrap();
        assert!(tree.set_value(&failing, "v").is_err());
        assert!(tree.get("devices.disk").unwrap().is_container());
        tree.collapse_empty(&failing);

        assert_eq!(tree.get("devices.disk"), Some(&Node::Scalar(String::new())));
        assert!(tree.get("devices").unwrap().is_container());
    }

    #[test]
    fn test_collapse_empty_keeps_attributes_and_children() {
        let mut tree = domain_with_devices();
        tree.ensure_path(&path("devices.disk.driver")).unwrap();
        tree.set_value(&path("devices.disk.driver"), "qemu").unwrap();
        let filled = tree.clone();

        tree.collapse_empty(&path("devices.disk.driver"));
        assert_eq!(tree, filled);
    }

    #[test]
    fn test_ensure_rejects_invalid_parent_segment() {
        let mut tree = domain_with_devices();
        assert!(matches!(
            tree.ensure_path(&path("devices..driver")),
            Err(PathError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn test_set_requires_parents() {
        let mut tree = domain_with_devices();
        assert_eq!(
            tree.set_value(&path("devices.disk.driver"), "qemu"),
            Err(PathError::NotAContainer("devices".to_string()))
        );
        assert_eq!(
            tree.set_value(&path("cpu.model"), "host"),
            Err(PathError::MissingAncestor("cpu".to_string()))
        );
    }

    #[test]
    fn test_set_replaces_scalar() {
        let mut tree = domain_with_devices();
        tree.set_value(&path("devices"), "none").unwrap();
        assert_eq!(tree.get("devices").unwrap().as_scalar(), Some("none"));
    }

    #[test]
    fn test_set_keeps_attributes() {
        let mut disk = Element::new();
        disk.attributes
            .insert("driver".to_string(), "virtio".to_string());
        let mut root = Element::new();
        root.push_child("disk".to_string(), Node::Container(disk));
        let mut tree = DomainTree::new("domain", Node::Container(root));

        tree.set_value(&path("disk"), "replaced").unwrap();

        let disk = tree.get("disk").unwrap().as_element().unwrap();
        assert_eq!(disk.attributes["driver"], "virtio");
        assert_eq!(disk.text.as_deref(), Some("replaced"));
    }

    #[test]
    fn test_set_refuses_to_drop_children() {
        let mut tree = domain_with_devices();
        tree.ensure_path(&path("devices.disk")).unwrap();
        tree.set_value(&path("devices.disk"), "x").unwrap();

        assert_eq!(
            tree.set_value(&path("devices"), "y"),
            Err(PathError::HasChildren("devices".to_string()))
        );
        assert_eq!(tree.get("devices.disk").unwrap().as_scalar(), Some("x"));
    }

    #[test]
    fn test_set_rejects_invalid_leaf() {
        let mut tree = domain_with_devices();
        assert!(matches!(
            tree.set_value(&path("devices."), "x"),
            Err(PathError::NotAContainer(_))
        ));
        assert!(matches!(
            tree.set_value(&path("9lives"), "x"),
            Err(PathError::InvalidSegment { .. })
        ));
    }
}
