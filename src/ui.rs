//! Descriptor tree produced by generated forms, settings screens and views.
//!
//! Nodes carry localization keys rather than display strings; turning them
//! into widgets is the renderer's job.
use std::fmt;

use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::value::Value;

/// Text shown in place of secure values.
pub const REDACTED: &str = "********";

/// Dotted path from the root model to one member, e.g. `author.name`.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct FieldPath(SmallVec<[String; 4]>);

impl FieldPath {
    pub fn root() -> Self {
        FieldPath(SmallVec::new())
    }

    pub fn from_segments(segments: &[String]) -> Self {
        FieldPath(segments.iter().cloned().collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn prefixed(mut self, segment: &str) -> Self {
        self.0.insert(0, segment.to_owned());
        self
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath(
            path.split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldPath({self})")
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Toggle,
    TextField,
    SecureField,
    DatePicker,
    NumberField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingMode {
    TwoWay,
    ReadOnly,
}

/// One editable member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub key: String,
    pub path: FieldPath,
    pub widget: Widget,
    pub value: Value,
    /// Display text; formatted for numbers and dates, masked for secure fields.
    pub text: String,
    pub binding: BindingMode,
}

impl Control {
    pub fn new(
        key: impl Into<String>,
        path: impl Into<FieldPath>,
        widget: Widget,
        value: Value,
    ) -> Self {
        let text = if widget == Widget::SecureField {
            REDACTED.to_owned()
        } else {
            value.to_string()
        };
        Control {
            key: key.into(),
            path: path.into(),
            widget,
            value,
            text,
            binding: BindingMode::TwoWay,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.binding = if read_only {
            BindingMode::ReadOnly
        } else {
            BindingMode::TwoWay
        };
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.binding == BindingMode::ReadOnly
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Form {
        children: Vec<Node>,
    },
    Section {
        header: Option<String>,
        children: Vec<Node>,
    },
    /// Section of a read-only view.
    Group {
        title: Option<String>,
        children: Vec<Node>,
    },
    Stack {
        children: Vec<Node>,
    },
    Labeled {
        key: String,
        content: Box<Node>,
    },
    Control(Control),
    /// Read-only presentation of one member.
    Text {
        key: String,
        path: FieldPath,
        text: String,
    },
    Empty,
}

impl Node {
    pub fn section(header: Option<&str>, children: Vec<Node>) -> Node {
        Node::Section {
            header: header.map(str::to_owned),
            children,
        }
    }

    pub fn group(title: Option<&str>, children: Vec<Node>) -> Node {
        Node::Group {
            title: title.map(str::to_owned),
            children,
        }
    }

    pub fn labeled(key: impl Into<String>, content: Node) -> Node {
        Node::Labeled {
            key: key.into(),
            content: Box::new(content),
        }
    }

    pub fn text(key: impl Into<String>, path: impl Into<FieldPath>, text: impl Into<String>) -> Node {
        Node::Text {
            key: key.into(),
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Form { children }
            | Node::Section { children, .. }
            | Node::Group { children, .. }
            | Node::Stack { children } => children,
            Node::Labeled { content, .. } => std::slice::from_ref(&**content),
            Node::Control(_) | Node::Text { .. } | Node::Empty => &[],
        }
    }

    /// Prefixes every member path below this node with `segment`.
    pub fn scoped(mut self, segment: &str) -> Node {
        self.rewrite_paths(segment);
        self
    }

    fn rewrite_paths(&mut self, segment: &str) {
        match self {
            Node::Form { children }
            | Node::Section { children, .. }
            | Node::Group { children, .. }
            | Node::Stack { children } => {
                for child in children {
                    child.rewrite_paths(segment);
                }
            }
            Node::Labeled { content, .. } => content.rewrite_paths(segment),
            Node::Control(control) => {
                control.path = std::mem::take(&mut control.path).prefixed(segment);
            }
            Node::Text { path, .. } => *path = std::mem::take(path).prefixed(segment),
            Node::Empty => {}
        }
    }

    /// Depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    pub fn controls(&self) -> Vec<&Control> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if let Node::Control(control) = node {
                found.push(control);
            }
        });
        found
    }

    /// First control or text node whose path renders as `path`.
    pub fn find(&self, path: &str) -> Option<&Node> {
        let mut hit = None;
        self.walk(&mut |node| {
            if hit.is_some() {
                return;
            }
            let matches = match node {
                Node::Control(control) => control.path.to_string() == path,
                Node::Text { path: p, .. } => p.to_string() == path,
                _ => false,
            };
            if matches {
                hit = Some(node);
            }
        });
        hit
    }

    /// Display text of the control or text node at `path`.
    pub fn text_of(&self, path: &str) -> Option<&str> {
        match self.find(path)? {
            Node::Control(control) => Some(&control.text),
            Node::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_round_trips_through_text() {
        let path = FieldPath::from("author.name");
        assert_eq!(path.segments(), ["author".to_owned(), "name".to_owned()]);
        assert_eq!(path.to_string(), "author.name");
        assert!(FieldPath::from("").is_root());
    }

    #[test]
    fn scoped_prefixes_nested_paths() {
        let node = Node::Form {
            children: vec![Node::labeled(
                "AuthorForm.name.label",
                Node::Control(Control::new(
                    "AuthorForm.name",
                    "name",
                    Widget::TextField,
                    Value::Text("Ada".into()),
                )),
            )],
        }
        .scoped("author");
        assert_eq!(node.controls()[0].path.to_string(), "author.name");
        assert_eq!(node.text_of("author.name"), Some("Ada"));
    }

    #[test]
    fn secure_controls_are_masked() {
        let control = Control::new("k", "password", Widget::SecureField, Value::Text("hunter2".into()));
        assert_eq!(control.text, REDACTED);
        assert_eq!(control.value, Value::Text("hunter2".into()));
    }

    #[test]
    fn serializes_with_node_tag() {
        let json = serde_json::to_value(Node::text("ArticleView.title", "title", "Hello")).unwrap();
        assert_eq!(json["node"], "text");
        assert_eq!(json["path"], "title");
    }
}
