use std::io;

use serde_json::Value;

use super::{Annotation, Location};
use crate::types::ValueKind;

pub const DEFAULT_MAX_WIDTH: usize = 80;
pub const DEFAULT_INDENT: usize = 2;

/// Layout knobs for [`format_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Longest rendering of a single value, in chars, before it is cut with `...`.
    pub max_width: usize,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            indent: DEFAULT_INDENT,
        }
    }
}

/// Renders an annotation as text, marking each failing value with a caret
/// line carrying its message:
///
/// ```text
/// [
///   "x",
///   "not-a-number",
///   ^^^^^^^^^^^^^^ Must be number
/// ]
/// ```
///
/// This is the default formatter used by `Decoder::verify`.
pub fn format_inline(annotation: &Annotation) -> String {
    format_with(annotation, FormatOptions::default())
}

pub fn format_with(annotation: &Annotation, options: FormatOptions) -> String {
    render(annotation, &options).into_lines().join("\n")
}

/// A rendered annotation: the value's lines, then the message and cause lines.
struct Block {
    body: Vec<String>,
    notes: Vec<String>,
}

impl Block {
    fn into_lines(self) -> Vec<String> {
        let mut lines = self.body;
        lines.extend(self.notes);
        lines
    }
}

fn render(annotation: &Annotation, options: &FormatOptions) -> Block {
    let mut placed = vec![false; annotation.children().len()];
    let located = match annotation.value() {
        Value::Array(items) => render_array(items, annotation, &mut placed, options),
        Value::Object(fields) => render_object(fields, annotation, &mut placed, options),
        _ => None,
    };
    let body = located.unwrap_or_else(|| vec![summarize(annotation.value(), options.max_width)]);

    let mut notes = Vec::new();
    if let Some(message) = annotation.message() {
        notes.push(format!("{} {message}", carets(&body)));
    }
    for (child, _) in annotation
        .children()
        .iter()
        .zip(&placed)
        .filter(|(_, placed)| !**placed)
    {
        let lines = render(child.annotation(), options).into_lines();
        notes.extend(lines.into_iter().map(|line| indent(&line, options.indent)));
    }

    Block { body, notes }
}

/// Renders an array one item per line, swapping in the child rendering for
/// every item that has a located child. Returns `None` when no child points
/// into the array, so the caller falls back to the one-line summary.
fn render_array(
    items: &[Value],
    annotation: &Annotation,
    placed: &mut [bool],
    options: &FormatOptions,
) -> Option<Vec<String>> {
    let slots: Vec<Option<usize>> = (0..items.len())
        .map(|index| find_child(annotation, &Location::Index(index)))
        .collect();
    if slots.iter().all(Option::is_none) {
        return None;
    }

    let mut lines = vec!["[".to_string()];
    for (item, slot) in items.iter().zip(slots) {
        match slot {
            Some(position) => {
                placed[position] = true;
                let child = annotation.children()[position].annotation();
                lines.extend(render_entry(None, child, options));
            }
            None => lines.push(format!(
                "{}{},",
                " ".repeat(options.indent),
                summarize(item, options.max_width)
            )),
        }
    }
    lines.push("]".to_string());
    Some(lines)
}

fn render_object(
    fields: &serde_json::Map<String, Value>,
    annotation: &Annotation,
    placed: &mut [bool],
    options: &FormatOptions,
) -> Option<Vec<String>> {
    let keyed: Vec<(usize, &str)> = annotation
        .children()
        .iter()
        .enumerate()
        .filter_map(|(position, child)| match child.location() {
            Some(Location::Key(key)) => Some((position, key.as_str())),
            _ => None,
        })
        .collect();
    if keyed.is_empty() {
        return None;
    }

    let mut lines = vec!["{".to_string()];
    for (key, value) in fields {
        match keyed.iter().find(|(_, k)| *k == key.as_str()) {
            Some(&(position, _)) => {
                placed[position] = true;
                let child = annotation.children()[position].annotation();
                lines.extend(render_entry(Some(key), child, options));
            }
            None => lines.push(format!(
                "{}{}: {},",
                " ".repeat(options.indent),
                quote(key, options.max_width),
                summarize(value, options.max_width)
            )),
        }
    }
    // Failures for fields the object does not have (e.g. a missing key).
    for &(position, key) in &keyed {
        if !placed[position] {
            placed[position] = true;
            let child = annotation.children()[position].annotation();
            lines.extend(render_entry(Some(key), child, options));
        }
    }
    lines.push("}".to_string());
    Some(lines)
}

/// One failing element inside a container: its body with a trailing comma,
/// the key prefix on the first line, followed by its notes.
fn render_entry(key: Option<&str>, child: &Annotation, options: &FormatOptions) -> Vec<String> {
    let Block { mut body, notes } = render(child, options);
    if let Some(last) = body.last_mut() {
        last.push(',');
    }
    if let (Some(key), Some(first)) = (key, body.first_mut()) {
        *first = format!("{}: {first}", quote(key, options.max_width));
    }
    body.into_iter()
        .chain(notes)
        .map(|line| indent(&line, options.indent))
        .collect()
}

fn find_child(annotation: &Annotation, location: &Location) -> Option<usize> {
    annotation
        .children()
        .iter()
        .position(|child| child.location() == Some(location))
}

fn carets(body: &[String]) -> String {
    match body {
        [line] => "^".repeat(line.chars().count().max(1)),
        _ => "^".to_string(),
    }
}

fn indent(line: &str, width: usize) -> String {
    format!("{}{line}", " ".repeat(width))
}

fn quote(key: &str, max_width: usize) -> String {
    summarize(&Value::String(key.to_string()), max_width)
}

/// Compact JSON for `value`, never longer than `max_width` chars.
///
/// Serialization stops as soon as the limit is passed, so huge inputs cost
/// no more than the part that is shown.
fn summarize(value: &Value, max_width: usize) -> String {
    let mut sink = Bounded::new(max_width.saturating_mul(4).saturating_add(4));
    let complete = serde_json::to_writer(&mut sink, value).is_ok();
    if sink.buf.is_empty() && !complete {
        return format!("<{}>", ValueKind::of(value));
    }
    let text = String::from_utf8_lossy(&sink.buf);
    if complete && text.chars().count() <= max_width {
        return text.into_owned();
    }
    if max_width < 3 {
        return ".".repeat(max_width);
    }
    let mut cut: String = text.chars().take(max_width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

struct Bounded {
    buf: Vec<u8>,
    limit: usize,
}

impl Bounded {
    fn new(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }
}

impl io::Write for Bounded {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let room = self.limit.saturating_sub(self.buf.len());
        if room == 0 {
            return Err(io::Error::other("summary limit reached"));
        }
        let taken = room.min(bytes.len());
        self.buf.extend_from_slice(&bytes[..taken]);
        Ok(taken)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
