//! Typed JSON decoding with aggregated validation.
//!
//! A document is first checked field by field against its schema so that
//! every violation is reported at once; only a clean document is handed to
//! serde for the final typed decode.

use crate::error::{Error, ParseError, Result, Violation};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A JSON document type with field-level checks.
pub trait Schema: DeserializeOwned {
    /// Human-readable document kind used in error messages.
    const KIND: &'static str;

    /// Accept `//` and `/* */` comments plus trailing commas.
    const ALLOW_COMMENTS: bool = false;

    fn check(fields: &mut FieldChecker<'_>);
}

/// Collects violations while walking a JSON document.
pub struct FieldChecker<'a> {
    root: &'a Value,
    violations: Vec<Violation>,
}

impl<'a> FieldChecker<'a> {
    fn new(root: &'a Value) -> Self {
        Self {
            root,
            violations: Vec::new(),
        }
    }

    fn lookup(&self, field: &str) -> Option<&'a Value> {
        field
            .split('.')
            .try_fold(self.root, |value, key| value.as_object()?.get(key))
    }

    fn violate(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(field, message));
    }

    fn present(&mut self, field: &str, required: bool) -> Option<&'a Value> {
        match self.lookup(field) {
            Some(Value::Null) | None if required => {
                self.violate(field, "missing required field");
                None
            }
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    pub fn string(&mut self, field: &str, required: bool) {
        if let Some(value) = self.present(field, required) {
            if !value.is_string() {
                self.violate(field, format!("expected a string, found {}", type_name(value)));
            }
        }
    }

    pub fn boolean(&mut self, field: &str, required: bool) {
        if let Some(value) = self.present(field, required) {
            if !value.is_boolean() {
                self.violate(field, format!("expected a boolean, found {}", type_name(value)));
            }
        }
    }

    pub fn object(&mut self, field: &str, required: bool) {
        if let Some(value) = self.present(field, required) {
            if !value.is_object() {
                self.violate(field, format!("expected an object, found {}", type_name(value)));
            }
        }
    }

    /// String restricted to `allowed`. Comparison ignores ASCII case when
    /// `ignore_case` is set.
    pub fn literal(&mut self, field: &str, required: bool, allowed: &[&str], ignore_case: bool) {
        let Some(value) = self.present(field, required) else {
            return;
        };

        let matches = value.as_str().is_some_and(|text| {
            allowed.iter().any(|candidate| {
                if ignore_case {
                    candidate.eq_ignore_ascii_case(text)
                } else {
                    *candidate == text
                }
            })
        });

        if !matches {
            let expected = allowed
                .iter()
                .map(|candidate| format!("\"{candidate}\""))
                .collect::<Vec<_>>()
                .join(", ");
            self.violate(field, format!("expected one of {expected}, found {value}"));
        }
    }

    pub fn string_list(&mut self, field: &str, required: bool) {
        let Some(value) = self.present(field, required) else {
            return;
        };

        match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        self.violate(
                            &format!("{field}[{index}]"),
                            format!("expected a string, found {}", type_name(item)),
                        );
                    }
                }
            }
            None => self.violate(field, format!("expected an array, found {}", type_name(value))),
        }
    }

    /// Either a single string or a list of strings.
    pub fn string_or_list(&mut self, field: &str, required: bool) {
        match self.present(field, required) {
            Some(Value::String(_)) | None => {}
            Some(Value::Array(_)) => self.string_list(field, required),
            Some(other) => self.violate(
                field,
                format!("expected a string or an array, found {}", type_name(other)),
            ),
        }
    }

    /// Object whose values must all be strings.
    pub fn string_map(&mut self, field: &str, required: bool) {
        let Some(value) = self.present(field, required) else {
            return;
        };

        match value.as_object() {
            Some(map) => {
                for (key, item) in map {
                    if !item.is_string() {
                        self.violate(
                            &format!("{field}.{key}"),
                            format!("expected a string, found {}", type_name(item)),
                        );
                    }
                }
            }
            None => self.violate(field, format!("expected an object, found {}", type_name(value))),
        }
    }

    /// Object whose values must all be lists of strings.
    pub fn string_list_map(&mut self, field: &str, required: bool) {
        let Some(value) = self.present(field, required) else {
            return;
        };

        match value.as_object() {
            Some(map) => {
                for key in map.keys() {
                    self.string_list(&format!("{field}.{key}"), true);
                }
            }
            None => self.violate(field, format!("expected an object, found {}", type_name(value))),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode `text` as a `T`, reporting every violated field at once.
pub fn decode<T: Schema>(text: &str, origin: &Path) -> std::result::Result<T, ParseError> {
    let fail = |violations: Vec<Violation>| ParseError {
        kind: T::KIND,
        origin: origin.to_path_buf(),
        violations,
    };

    let relaxed;
    let text = if T::ALLOW_COMMENTS {
        relaxed = strip_comments(text);
        relaxed.as_str()
    } else {
        text
    };

    let root: Value = serde_json::from_str(text)
        .map_err(|err| fail(vec![Violation::new("$", format!("malformed JSON: {err}"))]))?;

    if !root.is_object() {
        return Err(fail(vec![Violation::new(
            "$",
            format!("expected an object, found {}", type_name(&root)),
        )]));
    }

    let mut fields = FieldChecker::new(&root);
    T::check(&mut fields);
    if !fields.violations.is_empty() {
        return Err(fail(fields.violations));
    }

    // Decode from the text, not the parsed value, so custom deserializers
    // still see duplicate keys.
    serde_json::from_str(text).map_err(|err| fail(vec![Violation::new("$", err.to_string())]))
}

/// Blank out comments and drop trailing commas, leaving string contents and
/// line numbers intact.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut last = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if last == '*' && next == '/' {
                        break;
                    }
                    last = next;
                }
            }
            _ => out.push(c),
        }
    }

    drop_trailing_commas(&out)
}

fn drop_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut pending_comma: Option<usize> = None;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            ',' => {
                pending_comma = Some(out.len());
                out.push(c);
            }
            '}' | ']' => {
                if let Some(at) = pending_comma.take() {
                    out.replace_range(at..at + 1, " ");
                }
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                pending_comma = None;
                in_string = c == '"';
                out.push(c);
            }
        }
    }
    out
}

/// Read and decode the file at `path`.
pub fn load<T: Schema>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|err| Error::io("failed to read", path, err))?;
    decode(&text, path).map_err(Error::from)
}
