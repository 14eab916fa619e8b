pub mod format;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Where a child failure sits inside its parent's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Location {
    Index(usize),
    Key(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Key(key) => write!(f, ".{key}"),
        }
    }
}

/// A nested failure. Located children point into the parent's value
/// (a tuple slot, an object field); unlocated ones are underlying causes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Child {
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    annotation: Annotation,
}

impl Child {
    pub fn at(location: Location, annotation: Annotation) -> Self {
        Self {
            location: Some(location),
            annotation,
        }
    }

    pub fn cause(annotation: Annotation) -> Self {
        Self {
            location: None,
            annotation,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// Structured description of a decode failure: the offending value, an
/// optional message, and any nested failures.
///
/// Annotations are plain data. They are carried inside `Err` and only turn
/// into a raised [`crate::Error`] at `verify`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Child>,
}

/// Annotates `value` with `message`.
pub fn annotate(value: Value, message: impl Into<String>) -> Annotation {
    Annotation::new(value).with_message(message)
}

impl Annotation {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            message: None,
            children: Vec::new(),
        }
    }

    /// Re-describes `cause` with a higher-level `message`, keeping it as a child.
    pub fn wrap(cause: Annotation, message: impl Into<String>) -> Self {
        Self::new(cause.value.clone())
            .with_message(message)
            .with_child(Child::cause(cause))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_child(mut self, child: Child) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Child>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn child_at(&self, location: &Location) -> Option<&Annotation> {
        self.children
            .iter()
            .find(|child| child.location.as_ref() == Some(location))
            .map(Child::annotation)
    }

    /// Every message in the tree, depth-first, parents before children.
    pub fn messages(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_messages(&mut out);
        out
    }

    fn collect_messages<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(message) = self.message.as_deref() {
            out.push(message);
        }
        for child in &self.children {
            child.annotation.collect_messages(out);
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::format_inline(self))
    }
}

/// Captures a decoded value for an annotation payload.
///
/// Values `serde_json` refuses (maps with non-string keys, failing custom
/// impls) are recorded as a descriptive string.
pub(crate) fn snapshot<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| Value::String(format!("<unserializable value: {e}>")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::{Annotation, Child, Location, annotate, snapshot};

    #[test]
    fn annotate_keeps_value_and_message() {
        let ann = annotate(json!({"a": [1, 2]}), "Must be string");
        assert_eq!(ann.value(), &json!({"a": [1, 2]}));
        assert_eq!(ann.message(), Some("Must be string"));
        assert!(ann.children().is_empty());
    }

    #[test]
    fn wrap_preserves_the_original_cause() {
        let cause = annotate(json!(3), "Must be string");
        let wrapped = Annotation::wrap(cause.clone(), "Must be a name");
        assert_eq!(wrapped.message(), Some("Must be a name"));
        assert_eq!(wrapped.value(), &json!(3));
        assert_eq!(wrapped.children().len(), 1);
        assert_eq!(wrapped.children()[0].location(), None);
        assert_eq!(wrapped.children()[0].annotation(), &cause);
        assert_eq!(wrapped.messages(), vec!["Must be a name", "Must be string"]);
    }

    #[test]
    fn child_at_finds_located_children_only() {
        let ann = Annotation::new(json!(["x", 1]))
            .with_child(Child::at(Location::Index(1), annotate(json!(1), "bad")))
            .with_child(Child::cause(annotate(json!(0), "cause")));
        assert_eq!(
            ann.child_at(&Location::Index(1)).and_then(Annotation::message),
            Some("bad")
        );
        assert!(ann.child_at(&Location::Index(0)).is_none());
        assert!(ann.child_at(&Location::Key("x".into())).is_none());
    }

    #[test]
    fn serializes_without_empty_fields() {
        let ann = Annotation::new(json!([1]))
            .with_child(Child::at(Location::Index(0), annotate(json!(1), "nope")));
        assert_eq!(
            serde_json::to_value(&ann).ok(),
            Some(json!({
                "value": [1],
                "children": [{"location": 0, "annotation": {"value": 1, "message": "nope"}}]
            }))
        );
    }

    #[test]
    fn snapshot_never_fails() {
        let mut odd_keys = HashMap::new();
        odd_keys.insert((1, 2), "pair");
        let value = snapshot(&odd_keys);
        assert!(
            value
                .as_str()
                .is_some_and(|s| s.starts_with("<unserializable value"))
        );
        assert_eq!(snapshot(&vec![1, 2]), json!([1, 2]));
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::Index(2).to_string(), "[2]");
        assert_eq!(Location::Key("name".into()).to_string(), ".name");
    }
}
