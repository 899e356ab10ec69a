//! Tool registry: which token kinds the page offers and their assets.

use std::collections::BTreeMap;

/// A tool offered by the toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    /// Token kind created by this tool.
    pub kind: String,
    /// Asset reference (image URL) for tokens of this kind.
    pub src: String,
}

/// Read-only mapping from token kind to asset reference.
///
/// Supplied by the surrounding page. Creating a token of a kind that is not
/// registered is rejected.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with_tool(mut self, kind: impl Into<String>, src: impl Into<String>) -> Self {
        self.register(kind, src);
        self
    }

    /// Register (or replace) a tool. Empty kinds or sources are ignored.
    pub fn register(&mut self, kind: impl Into<String>, src: impl Into<String>) {
        let kind = kind.into();
        let src = src.into();
        if kind.is_empty() || src.is_empty() {
            log::debug!("Skipping tool with empty kind or source: {:?}", kind);
            return;
        }
        self.tools.insert(kind, src);
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.tools.contains_key(kind)
    }

    /// Asset reference for a kind.
    pub fn src(&self, kind: &str) -> Option<&str> {
        self.tools.get(kind).map(String::as_str)
    }

    /// Look up a full tool definition.
    pub fn tool(&self, kind: &str) -> Option<Tool> {
        self.tools.get(kind).map(|src| Tool {
            kind: kind.to_string(),
            src: src.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl<K: Into<String>, S: Into<String>> FromIterator<(K, S)> for ToolRegistry {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (kind, src) in iter {
            registry.register(kind, src);
        }
        registry
    }
}
