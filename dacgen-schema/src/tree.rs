//! Namespace-agnostic, read-only view of the schema document.

use quick_xml::{
    Reader,
    encoding::Decoder,
    events::{BytesStart, Event},
};

use crate::{
    element::ElementType,
    error::{Error, Result},
};

#[derive(Debug)]
struct NodeData {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<usize>,
}

/// The parsed schema document.
///
/// Every element and attribute name is stored by its local name only, so
/// path queries never deal with namespace prefixes. Namespace declarations
/// are dropped.
#[derive(Debug)]
pub struct SchemaTree {
    nodes: Vec<NodeData>,
}

impl SchemaTree {
    /// Parse a schema document.
    pub fn parse_str(xml: &str) -> Result<Self> {
        Self::parse_bytes(xml.as_bytes())
    }

    /// Parse a schema document from raw bytes.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut nodes: Vec<NodeData> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|source| Error::Xml {
                    position: reader.error_position() as u64,
                    source,
                })?;
            let decoder = reader.decoder();

            match event {
                Event::Start(start) => {
                    let index = push_node(&mut nodes, &stack, &start, decoder)?;
                    stack.push(index);
                }
                Event::Empty(start) => {
                    push_node(&mut nodes, &stack, &start, decoder)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(&open) = stack.last() {
            return Err(Error::Malformed(format!(
                "element '{}' is never closed",
                nodes[open].name
            )));
        }
        if nodes.is_empty() {
            return Err(Error::NoRoot);
        }

        Ok(Self { nodes })
    }

    /// The document element.
    pub fn root(&self) -> Element<'_> {
        Element {
            tree: self,
            index: 0,
        }
    }

    /// Evaluate a path against the document.
    ///
    /// An absolute path (`/DataSchemaModel/Model/Element`) names the root as
    /// its first step; a relative path is evaluated from the root element.
    pub fn select(&self, path: &str) -> Vec<Element<'_>> {
        match path.strip_prefix('/') {
            Some(absolute) => {
                let steps = split_steps(absolute);
                let Some((first, rest)) = steps.split_first() else {
                    return Vec::new();
                };
                let root = self.root();
                if !Step::parse(first).matches(root, 0) {
                    return Vec::new();
                }
                evaluate(vec![root], rest)
            }
            None => self.root().select(path),
        }
    }

    /// Top-level model objects with the given type discriminator, in
    /// declaration order.
    pub fn model_elements(&self, ty: ElementType) -> Vec<Element<'_>> {
        self.select(&format!(
            "/DataSchemaModel/Model/Element[@Type='{}']",
            ty.as_str()
        ))
    }
}

fn push_node(
    nodes: &mut Vec<NodeData>,
    stack: &[usize],
    start: &BytesStart<'_>,
    decoder: Decoder,
) -> Result<usize> {
    let parent = stack.last().copied();
    if parent.is_none() && !nodes.is_empty() {
        return Err(Error::Malformed("more than one root element".to_string()));
    }

    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Malformed(e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| Error::Malformed(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    let index = nodes.len();
    nodes.push(NodeData {
        name,
        attributes,
        children: Vec::new(),
    });
    if let Some(parent) = parent {
        nodes[parent].children.push(index);
    }
    Ok(index)
}

/// A borrowed element of a [`SchemaTree`].
#[derive(Clone, Copy)]
pub struct Element<'a> {
    tree: &'a SchemaTree,
    index: usize,
}

impl<'a> Element<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.index]
    }

    /// Local element name.
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.data()
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&index| Element { tree, index })
    }

    /// Evaluate a relative path such as
    /// `Relationship[@Name='Columns']/Entry/Element[@Type='SqlSimpleColumn']`.
    ///
    /// Supported steps are an element name (or `*`) with an optional
    /// `[@Attr='value']` or 1-based `[n]` predicate.
    pub fn select(&self, path: &str) -> Vec<Element<'a>> {
        evaluate(vec![*self], &split_steps(path))
    }

    pub fn select_first(&self, path: &str) -> Option<Element<'a>> {
        self.select(path).into_iter().next()
    }

    /// The `Type` discriminator of a model object.
    pub fn element_type(&self) -> Option<&'a str> {
        self.attr("Type")
    }

    /// The qualified `Name` of a model object, e.g. `[dbo].[Table1]`.
    pub fn object_name(&self) -> Option<&'a str> {
        self.attr("Name")
    }

    /// Value of a `<Property Name=".." Value=".."/>` child.
    pub fn property(&self, name: &str) -> Option<&'a str> {
        self.select_first(&format!("Property[@Name='{name}']"))
            .and_then(|property| property.attr("Value"))
    }

    /// Boolean property; `None` when absent or not a boolean literal.
    pub fn property_bool(&self, name: &str) -> Option<bool> {
        self.property(name).and_then(|value| {
            if value.eq_ignore_ascii_case("true") {
                Some(true)
            } else if value.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        })
    }

    /// Names referenced by a relationship, in entry order.
    pub fn references(&self, relationship: &str) -> Vec<&'a str> {
        self.select(&format!(
            "Relationship[@Name='{relationship}']/Entry/References"
        ))
        .into_iter()
        .filter_map(|reference| reference.attr("Name"))
        .collect()
    }

    /// First name referenced by a relationship.
    pub fn reference(&self, relationship: &str) -> Option<&'a str> {
        self.references(relationship).into_iter().next()
    }

    /// Elements of the given type nested under a relationship.
    pub fn related(&self, relationship: &str, ty: ElementType) -> Vec<Element<'a>> {
        self.select(&format!(
            "Relationship[@Name='{relationship}']/Entry/Element[@Type='{}']",
            ty.as_str()
        ))
    }

    /// The built-in type referenced through a type specifier, e.g. `[int]`.
    pub fn type_reference(&self, relationship: &str) -> Option<&'a str> {
        self.related(relationship, ElementType::TypeSpecifier)
            .into_iter()
            .find_map(|specifier| specifier.reference("Type"))
    }

    /// Columns referenced through indexed column specifications (primary
    /// keys and indexes), in key order.
    pub fn indexed_columns(&self) -> Vec<&'a str> {
        self.related("ColumnSpecifications", ElementType::IndexedColumnSpecification)
            .into_iter()
            .filter_map(|spec| spec.reference("Column"))
            .collect()
    }
}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name())
            .field("attributes", &self.data().attributes)
            .finish()
    }
}

#[derive(Debug)]
enum Predicate<'p> {
    Attr { name: &'p str, value: &'p str },
    Position(usize),
    Invalid,
}

#[derive(Debug)]
struct Step<'p> {
    name: &'p str,
    predicate: Option<Predicate<'p>>,
}

impl<'p> Step<'p> {
    fn parse(step: &'p str) -> Self {
        let Some((name, rest)) = step.split_once('[') else {
            return Self {
                name: step,
                predicate: None,
            };
        };
        let inner = rest.strip_suffix(']').unwrap_or(rest);
        Self {
            name,
            predicate: Some(Predicate::parse(inner)),
        }
    }

    /// `position` is the 0-based index among same-named siblings.
    fn matches(&self, element: Element<'_>, position: usize) -> bool {
        if self.name != "*" && element.name() != self.name {
            return false;
        }
        match &self.predicate {
            None => true,
            Some(Predicate::Attr { name, value }) => element.attr(name) == Some(*value),
            Some(Predicate::Position(n)) => position + 1 == *n,
            Some(Predicate::Invalid) => false,
        }
    }
}

impl<'p> Predicate<'p> {
    fn parse(inner: &'p str) -> Self {
        if let Some(attr) = inner.strip_prefix('@') {
            let Some((name, value)) = attr.split_once('=') else {
                return Self::Invalid;
            };
            let value = value.trim();
            let unquoted = value
                .strip_prefix('\'')
                .and_then(|v| v.strip_suffix('\''))
                .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')));
            return match unquoted {
                Some(value) => Self::Attr {
                    name: name.trim(),
                    value,
                },
                None => Self::Invalid,
            };
        }
        inner
            .trim()
            .parse()
            .map(Self::Position)
            .unwrap_or(Self::Invalid)
    }
}

/// Split a path on `/`, ignoring separators inside quoted predicate values.
fn split_steps(path: &str) -> Vec<&str> {
    let mut steps = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (i, c) in path.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, '/') => {
                steps.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    steps.push(&path[start..]);
    steps.retain(|step| !step.is_empty());
    steps
}

fn evaluate<'a>(mut current: Vec<Element<'a>>, steps: &[&str]) -> Vec<Element<'a>> {
    for raw in steps {
        let step = Step::parse(raw);
        let mut next = Vec::new();
        for element in current {
            let mut position = 0;
            for child in element.children() {
                if step.name != "*" && child.name() != step.name {
                    continue;
                }
                if step.matches(child, position) {
                    next.push(child);
                }
                position += 1;
            }
        }
        current = next;
    }
    current
}
