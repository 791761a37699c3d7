use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::domain::error::{ParseError, SerializeError};
use crate::domain::tree::{DomainTree, Element, Node};

/// Options for rendering a domain tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    /// Indent nested elements by two spaces, one element per line.
    pub indent: bool,
}

/// Parse a domain XML document into a tree.
///
/// Comments, processing instructions, the XML declaration and the doctype are
/// not kept. The text of elements without child elements is kept as written,
/// whitespace included. Text between child elements is trimmed.
///
/// # Arguments
///
/// * `document`: The raw XML document
///
/// returns: Result<DomainTree, ParseError>
pub fn parse(document: &[u8]) -> Result<DomainTree, ParseError> {
    if document.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::Empty);
    }

    let mut reader = Reader::from_reader(document);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut open: Vec<(String, Element)> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                let (name, element) = open_element(&start)?;
                if open.is_empty() && root.is_some() {
                    return Err(ParseError::MultipleRoots(name));
                }
                open.push((name, element));
            }
            Event::Empty(start) => {
                let (name, element) = open_element(&start)?;
                close_element(&mut open, &mut root, name, element)?;
            }
            Event::End(end) => {
                let name = std::str::from_utf8(end.name().as_ref())?.to_string();
                match open.pop() {
                    Some((open_name, element)) if open_name == name => {
                        close_element(&mut open, &mut root, open_name, element)?;
                    }
                    _ => return Err(ParseError::UnexpectedEnd(name)),
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                append_text(&mut open, &text)?;
            }
            Event::CData(data) => {
                let data = data.into_inner();
                append_text(&mut open, std::str::from_utf8(&data)?)?;
            }
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }

    if let Some((name, _)) = open.pop() {
        return Err(ParseError::UnclosedElement(name));
    }
    let (root_name, root) = root.ok_or(ParseError::NoRoot)?;
    Ok(DomainTree::new(root_name, root))
}

fn open_element(start: &BytesStart) -> Result<(String, Element), ParseError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut element = Element::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.insert(key, value);
    }
    Ok((name, element))
}

fn close_element(
    open: &mut [(String, Element)],
    root: &mut Option<(String, Node)>,
    name: String,
    mut element: Element,
) -> Result<(), ParseError> {
    if !element.children.is_empty() {
        element.text = element
            .text
            .take()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
    }
    let node = element.into_node();
    match open.last_mut() {
        Some((_, parent)) => parent.push_child(name, node),
        None if root.is_some() => return Err(ParseError::MultipleRoots(name)),
        None => *root = Some((name, node)),
    }
    Ok(())
}

fn append_text(open: &mut [(String, Element)], text: &str) -> Result<(), ParseError> {
    let Some((_, element)) = open.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(ParseError::TextOutsideRoot);
    };
    match &mut element.text {
        Some(existing) => existing.push_str(text),
        None => element.text = Some(text.to_string()),
    }
    Ok(())
}

/// Render a domain tree as XML, without an XML declaration.
///
/// # Arguments
///
/// * `tree`: The tree to render
/// * `options`: Rendering options
///
/// returns: Result<Vec<u8>, SerializeError>
pub fn serialize(tree: &DomainTree, options: SerializeOptions) -> Result<Vec<u8>, SerializeError> {
    let mut writer = if options.indent {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };
    write_node(&mut writer, &tree.root_name, &tree.root, false)?;
    Ok(writer.into_inner())
}

fn write_node<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    node: &Node,
    in_list: bool,
) -> Result<(), SerializeError> {
    if name.is_empty() {
        return Err(SerializeError::EmptyName);
    }

    match node {
        Node::Scalar(value) if value.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Node::Scalar(value) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Node::Container(element) => {
            let start = BytesStart::new(name).with_attributes(
                element
                    .attributes
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
            if element.text.is_none() && element.children.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }
            writer.write_event(Event::Start(start))?;
            if let Some(text) = &element.text {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            for (child_name, child) in &element.children {
                write_node(writer, child_name, child, false)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Node::List(_) if in_list => return Err(SerializeError::NestedList(name.to_string())),
        Node::List(items) => {
            for item in items {
                write_node(writer, name, item, true)?;
            }
        }
    }
    Ok(())
}

impl DomainTree {
    /// Parse a domain XML document, see [parse].
    pub fn parse(document: &[u8]) -> Result<Self, ParseError> {
        parse(document)
    }

    /// Render the tree as XML, see [serialize].
    pub fn to_xml(&self, options: SerializeOptions) -> Result<Vec<u8>, SerializeError> {
        serialize(self, options)
    }

    /// Render the tree as an XML string.
    pub fn to_xml_string(&self, options: SerializeOptions) -> Result<String, SerializeError> {
        Ok(String::from_utf8(self.to_xml(options)?)?)
    }
}
