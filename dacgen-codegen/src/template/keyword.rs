use indexmap::IndexMap;
use serde_json::Value;

use super::{RenderError, RenderPass, engine::lookup};

/// Context handed to a keyword invocation.
pub struct KeywordCall<'a, 'd> {
    /// Argument given in the tag, e.g. `Name` for `Type("Name")`
    pub arg: Option<&'a str>,
    /// Section nesting depth of the tag
    pub level: usize,
    /// Identifies the tag within its template
    pub instance: usize,
    pub pass: &'a mut RenderPass,
    scope: &'a [&'d Value],
}

impl<'a, 'd> KeywordCall<'a, 'd> {
    pub(crate) fn new(
        arg: Option<&'a str>,
        level: usize,
        instance: usize,
        pass: &'a mut RenderPass,
        scope: &'a [&'d Value],
    ) -> Self {
        Self {
            arg,
            level,
            instance,
            pass,
            scope,
        }
    }

    /// Look a name up in the enclosing data, innermost scope first.
    pub fn lookup(&self, path: &str) -> Option<&'d Value> {
        lookup(self.scope, path)
    }

    pub fn lookup_str(&self, path: &str) -> Option<&'d str> {
        self.lookup(path).and_then(Value::as_str)
    }

    pub fn lookup_bool(&self, path: &str) -> Option<bool> {
        self.lookup(path).and_then(Value::as_bool)
    }
}

/// A named transform applied through a tag pipe (`{{Name|Plural}}`).
pub trait Keyword: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, call: &mut KeywordCall<'_, '_>, value: Value) -> Result<Value, RenderError>;
}

/// Keywords available to a renderer, by name.
#[derive(Default)]
pub struct KeywordRegistry {
    keywords: IndexMap<&'static str, Box<dyn Keyword>>,
}

impl KeywordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a keyword, replacing any keyword of the same name.
    pub fn register(&mut self, keyword: impl Keyword + 'static) {
        self.keywords.insert(keyword.name(), Box::new(keyword));
    }

    pub fn with(mut self, keyword: impl Keyword + 'static) -> Self {
        self.register(keyword);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Keyword> {
        self.keywords.get(name).map(Box::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords.keys().copied()
    }
}

impl std::fmt::Debug for KeywordRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keywords.keys()).finish()
    }
}

/// Read the input of a text keyword.
pub(crate) fn text_input(keyword: &str, value: &Value) -> Result<String, RenderError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(RenderError::KeywordInput {
            keyword: keyword.to_string(),
            message: "expects a text value".to_string(),
        }),
    }
}
