//! A small mustache-style template engine.
//!
//! Supported syntax:
//!
//! - `{{Path}}` prints a value looked up in the data, innermost scope first;
//!   `{{.}}` is the current item and `{{A.B}}` descends into objects
//! - `{{Path|Keyword|Keyword("arg")}}` pipes the value through keywords;
//!   a tag may start with a keyword call (`{{Join(", ")}}`) to apply it to
//!   an empty value
//! - `{{#Path}}..{{/Path}}` repeats for every list item, enters an object,
//!   or renders once for any other truthy value
//! - `{{^Path}}..{{/Path}}` renders when the value is missing or falsy
//! - `{{! comment }}`
//!
//! A line holding nothing but a section, closing or comment tag is removed
//! entirely, so block tags can sit on their own lines.

use serde_json::Value;

use super::{KeywordCall, KeywordRegistry, RenderError, RenderPass};

/// Renders template text against a data dictionary.
///
/// Callers create a fresh [`RenderPass`] for every render and drop it
/// afterwards.
pub trait TemplateRenderer: Send + Sync {
    fn render(
        &self,
        template: &str,
        data: &Value,
        pass: &mut RenderPass,
    ) -> Result<String, RenderError>;
}

#[derive(Debug)]
enum Node {
    Text(String),
    Tag(Tag),
    Section {
        path: String,
        inverted: bool,
        children: Vec<Node>,
    },
}

#[derive(Debug)]
struct Tag {
    /// Byte offset of the tag, unique within the template
    id: usize,
    path: Option<String>,
    pipes: Vec<Pipe>,
}

#[derive(Debug)]
struct Pipe {
    keyword: String,
    arg: Option<String>,
}

/// A parsed template.
#[derive(Debug)]
pub struct Template {
    nodes: Vec<Node>,
}

struct OpenSection {
    path: String,
    inverted: bool,
    children: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let source = strip_standalone(source);
        let mut stack: Vec<OpenSection> = Vec::new();
        let mut nodes = Vec::new();
        let mut rest = source.as_str();
        let mut offset = 0;

        loop {
            let Some(open) = rest.find("{{") else {
                push_text(target(&mut stack, &mut nodes), rest);
                break;
            };
            push_text(target(&mut stack, &mut nodes), &rest[..open]);

            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                return Err(RenderError::UnclosedTag {
                    offset: offset + open,
                });
            };
            let content = after[..close].trim();
            let invalid = || RenderError::InvalidTag {
                tag: content.to_string(),
            };

            match content.chars().next() {
                Some('!') => {}
                Some(c @ ('#' | '^')) => {
                    let path = content[1..].trim();
                    if path.is_empty() {
                        return Err(invalid());
                    }
                    stack.push(OpenSection {
                        path: path.to_string(),
                        inverted: c == '^',
                        children: Vec::new(),
                    });
                }
                Some('/') => {
                    let found = content[1..].trim();
                    let Some(section) = stack.pop() else {
                        return Err(RenderError::MismatchedSection {
                            expected: String::new(),
                            found: found.to_string(),
                        });
                    };
                    if section.path != found {
                        return Err(RenderError::MismatchedSection {
                            expected: section.path,
                            found: found.to_string(),
                        });
                    }
                    target(&mut stack, &mut nodes).push(Node::Section {
                        path: section.path,
                        inverted: section.inverted,
                        children: section.children,
                    });
                }
                Some(_) => {
                    let tag = parse_tag(content, offset + open).ok_or_else(invalid)?;
                    target(&mut stack, &mut nodes).push(Node::Tag(tag));
                }
                None => return Err(invalid()),
            }

            let consumed = open + 2 + close + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        if let Some(section) = stack.pop() {
            return Err(RenderError::UnclosedSection {
                section: section.path,
            });
        }
        Ok(Self { nodes })
    }
}

fn target<'s>(stack: &'s mut [OpenSection], nodes: &'s mut Vec<Node>) -> &'s mut Vec<Node> {
    match stack.last_mut() {
        Some(section) => &mut section.children,
        None => nodes,
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn strip_standalone(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim();
        if is_standalone(trimmed) {
            out.push_str(trimmed);
        } else {
            out.push_str(line);
        }
    }
    out
}

fn is_standalone(line: &str) -> bool {
    line.len() >= 5
        && line.starts_with("{{")
        && line.ends_with("}}")
        && matches!(line.as_bytes()[2], b'#' | b'^' | b'/' | b'!')
        && !line[2..line.len() - 2].contains("{{")
        && !line[2..line.len() - 2].contains("}}")
}

fn parse_tag(content: &str, id: usize) -> Option<Tag> {
    let mut segments = split_outside_quotes(content, '|').into_iter();
    let first = segments.next().map(str::trim).filter(|s| !s.is_empty())?;

    let mut pipes = Vec::new();
    let path = if first.contains('(') {
        pipes.push(parse_pipe(first)?);
        None
    } else {
        Some(first.to_string())
    };
    for segment in segments {
        pipes.push(parse_pipe(segment)?);
    }
    Some(Tag { id, path, pipes })
}

fn parse_pipe(segment: &str) -> Option<Pipe> {
    let segment = segment.trim();
    let (keyword, arg) = match segment.split_once('(') {
        None => (segment, None),
        Some((keyword, rest)) => {
            let inner = rest.strip_suffix(')')?.trim();
            (keyword.trim(), Some(unquote(inner)?.to_string()))
        }
    };
    let valid = !keyword.is_empty() && keyword.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then(|| Pipe {
        keyword: keyword.to_string(),
        arg,
    })
}

fn unquote(s: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|q| {
        s.strip_prefix(q)
            .and_then(|inner| inner.strip_suffix(q))
    })
}

fn split_outside_quotes(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, c) if c == separator => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Look a dotted path up in a scope stack, innermost scope first.
pub(crate) fn lookup<'d>(scope: &[&'d Value], path: &str) -> Option<&'d Value> {
    if path == "." {
        return scope.last().copied();
    }
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut value = scope.iter().rev().find_map(|&frame| frame.get(first))?;
    for part in parts {
        value = value.get(part)?;
    }
    Some(value)
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Object(_)) => true,
    }
}

/// The bundled renderer.
#[derive(Debug, Default)]
pub struct Templator {
    keywords: KeywordRegistry,
}

impl Templator {
    pub fn new(keywords: KeywordRegistry) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordRegistry {
        &self.keywords
    }

    fn render_nodes<'d>(
        &self,
        nodes: &[Node],
        scope: &mut Vec<&'d Value>,
        level: usize,
        pass: &mut RenderPass,
        out: &mut String,
    ) -> Result<(), RenderError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Tag(tag) => {
                    let value = self.evaluate(tag, scope, level, pass)?;
                    write_value(tag, &value, out)?;
                }
                Node::Section {
                    path,
                    inverted,
                    children,
                } => {
                    let value = lookup(scope, path);
                    if is_truthy(value) == *inverted {
                        continue;
                    }
                    pass.enter_block(level + 1);
                    match value {
                        Some(Value::Array(items)) if !inverted => {
                            for item in items {
                                scope.push(item);
                                let result =
                                    self.render_nodes(children, scope, level + 1, pass, out);
                                scope.pop();
                                result?;
                            }
                        }
                        Some(object @ Value::Object(_)) => {
                            scope.push(object);
                            let result = self.render_nodes(children, scope, level + 1, pass, out);
                            scope.pop();
                            result?;
                        }
                        _ => self.render_nodes(children, scope, level + 1, pass, out)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(
        &self,
        tag: &Tag,
        scope: &[&Value],
        level: usize,
        pass: &mut RenderPass,
    ) -> Result<Value, RenderError> {
        let mut value = match &tag.path {
            Some(path) => lookup(scope, path).cloned().unwrap_or(Value::Null),
            None => Value::String(String::new()),
        };
        for pipe in &tag.pipes {
            let keyword =
                self.keywords
                    .get(&pipe.keyword)
                    .ok_or_else(|| RenderError::UnknownKeyword {
                        keyword: pipe.keyword.clone(),
                    })?;
            let mut call = KeywordCall::new(pipe.arg.as_deref(), level, tag.id, pass, scope);
            value = keyword.apply(&mut call, value)?;
        }
        Ok(value)
    }
}

fn write_value(tag: &Tag, value: &Value, out: &mut String) -> Result<(), RenderError> {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Array(_) | Value::Object(_) => {
            return Err(RenderError::NotScalar {
                path: tag.path.clone().unwrap_or_default(),
            });
        }
    }
    Ok(())
}

impl TemplateRenderer for Templator {
    fn render(
        &self,
        template: &str,
        data: &Value,
        pass: &mut RenderPass,
    ) -> Result<String, RenderError> {
        let template = Template::parse(template)?;
        let mut out = String::with_capacity(template_size_hint(&template));
        let mut scope = vec![data];
        self.render_nodes(&template.nodes, &mut scope, 0, pass, &mut out)?;
        Ok(out)
    }
}

fn template_size_hint(template: &Template) -> usize {
    template
        .nodes
        .iter()
        .map(|node| match node {
            Node::Text(text) => text.len(),
            _ => 16,
        })
        .sum()
}
