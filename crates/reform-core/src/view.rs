use std::fmt;
use std::fmt::Write as _;
use std::rc::Rc;

use crate::Modifier;

/// Opaque identity partitioning events and subtrees.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(Rc<str>);

impl ScopeId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Rc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScopeId {
    fn from(s: &str) -> Self {
        ScopeId::new(s)
    }
}

impl From<String> for ScopeId {
    fn from(s: String) -> Self {
        ScopeId::new(s)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marks a subtree as owned by one scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IsolationTag {
    pub scope: ScopeId,
}

impl IsolationTag {
    pub fn new(scope: ScopeId) -> Self {
        Self { scope }
    }

    /// Stable textual form; doubles as the subtree's default key.
    pub fn serialized(&self) -> String {
        format!("isolate:{}", self.scope)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewKind {
    Form,
    Box,
    Row,
    Column,
    Text { text: String },
    Button { text: String },
    TextField { value: String, hint: String },
    Checkbox { checked: bool, label: String },
}

impl ViewKind {
    fn tag(&self) -> &'static str {
        match self {
            ViewKind::Form => "form",
            ViewKind::Box => "box",
            ViewKind::Row => "row",
            ViewKind::Column => "column",
            ViewKind::Text { .. } => "text",
            ViewKind::Button { .. } => "button",
            ViewKind::TextField { .. } => "textfield",
            ViewKind::Checkbox { .. } => "checkbox",
        }
    }
}

/// A virtual subtree. Views are plain data; interaction reaches fields
/// through the host event source, addressed by scope.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub key: Option<String>,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            key: None,
            kind,
            modifier: Modifier::default(),
            children: vec![],
        }
    }
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn child(mut self, kid: View) -> Self {
        self.children.push(kid);
        self
    }

    pub fn is_isolated(&self) -> bool {
        self.modifier.is_isolated()
    }

    pub fn scope(&self) -> Option<&ScopeId> {
        self.modifier.isolation.first().map(|t| &t.scope)
    }

    /// Depth-first search, including `self`.
    pub fn find(&self, pred: &dyn Fn(&View) -> bool) -> Option<&View> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }

    pub fn find_scope(&self, scope: &str) -> Option<&View> {
        self.find(&|v| v.scope().is_some_and(|s| s.as_str() == scope))
    }

    /// Deterministic single-line rendering, for logs and snapshot tests.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        let tag = self.kind.tag();
        out.push('<');
        out.push_str(tag);
        if let Some(key) = &self.key {
            let _ = write!(out, " key=\"{}\"", escape(key));
        }
        if !self.modifier.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.modifier.classes.join(" ")));
        }
        if let Some(scope) = self.scope() {
            let _ = write!(out, " scope=\"{}\"", escape(scope.as_str()));
        }
        if self.modifier.disabled {
            out.push_str(" disabled");
        }
        match &self.kind {
            ViewKind::TextField { value, hint } => {
                let _ = write!(out, " value=\"{}\" hint=\"{}\"", escape(value), escape(hint));
            }
            ViewKind::Checkbox { checked: true, .. } => out.push_str(" checked"),
            _ => {}
        }
        out.push('>');
        match &self.kind {
            ViewKind::Text { text } | ViewKind::Button { text } => out.push_str(&escape(text)),
            ViewKind::Checkbox { label, .. } => out.push_str(&escape(label)),
            _ => {}
        }
        for c in &self.children {
            c.write_markup(out);
        }
        let _ = write!(out, "</{tag}>");
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}
