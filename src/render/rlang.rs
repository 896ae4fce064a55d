//! R source generation for the in-container render call.
//!
//! Pass-through options travel into the container as R code, embedded in a
//! double-quoted shell argument. Escaping happens in three stages:
//!
//! 1. [`r_literal`] turns one JSON value into an R literal.
//! 2. [`render_call`] assembles the call expression from those literals.
//! 3. [`shell_escape_double_quoted`] protects the whole script for the shell.

use std::fmt::Write;

use serde_json::{Number, Value};

use crate::config::Config;
use crate::error::{RenderError, Result};

use super::types::RenderOptions;

/// Argument injected from the document path.
pub const INPUT_ARG: &str = "input";

const RESERVED_WORDS: &[&str] = &[
    "if", "else", "repeat", "while", "function", "for", "next", "break", "in", "TRUE", "FALSE",
    "NULL", "Inf", "NaN", "NA", "NA_integer_", "NA_real_", "NA_character_", "NA_complex_",
];

/// Serialize a value into an R literal that parses back to an equivalent value.
///
/// Homogeneous scalar arrays become atomic vectors (`c(...)`), everything
/// else structured becomes a `list(...)`.
pub fn r_literal(value: &Value) -> std::result::Result<String, String> {
    let mut out = String::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> std::result::Result<(), String> {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(true) => out.push_str("TRUE"),
        Value::Bool(false) => out.push_str("FALSE"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s)?,
        Value::Array(items) if items.is_empty() => out.push_str("list()"),
        Value::Array(items) => {
            out.push_str(if is_atomic(items) { "c(" } else { "list(" });
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item)?;
            }
            out.push(')');
        }
        Value::Object(map) if map.is_empty() => {
            out.push_str("structure(list(), names = character(0))");
        }
        Value::Object(map) => {
            out.push_str("list(");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_name(out, key)?;
                out.push_str(" = ");
                write_value(out, item)?;
            }
            out.push(')');
        }
    }
    Ok(())
}

/// All elements are scalars of one R atomic type.
fn is_atomic(items: &[Value]) -> bool {
    let kind = |v: &Value| match v {
        Value::Bool(_) => Some(0),
        Value::Number(_) => Some(1),
        Value::String(_) => Some(2),
        _ => None,
    };
    let Some(first) = items.first().and_then(kind) else {
        return false;
    };
    items.iter().all(|v| kind(v) == Some(first))
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64().and_then(|i| i32::try_from(i).ok()) {
        // i32::MIN is NA_integer_ in R.
        if i != i32::MIN {
            let _ = write!(out, "{i}L");
            return;
        }
    }
    let f = n.as_f64().unwrap_or_default();
    // Debug formatting is the shortest round-trip form and always has a `.` or exponent.
    let _ = write!(out, "{f:?}");
}

fn write_string(out: &mut String, s: &str) -> std::result::Result<(), String> {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => return Err("strings cannot contain NUL".into()),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:04x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    Ok(())
}

fn write_name(out: &mut String, name: &str) -> std::result::Result<(), String> {
    if is_syntactic_name(name) {
        out.push_str(name);
        return Ok(());
    }
    if name.is_empty() {
        return Err("names cannot be empty".into());
    }
    if name.contains('\0') {
        return Err("names cannot contain NUL".into());
    }
    out.push('`');
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            c => out.push(c),
        }
    }
    out.push('`');
    Ok(())
}

/// Letters, digits, `.` and `_`; starts with a letter or a dot not followed by a digit.
fn is_syntactic_name(name: &str) -> bool {
    let mut chars = name.chars();
    let valid_start = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some('.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };
    valid_start
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        && !RESERVED_WORDS.contains(&name)
        && !is_dot_reserved(name)
}

/// `...`, `..1`, `..2` and friends.
fn is_dot_reserved(name: &str) -> bool {
    name == "..."
        || name
            .strip_prefix("..")
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Reject options that conflict with the managed `input` or the reserved list.
pub fn validate_options(options: &RenderOptions, cfg: &Config) -> Result<()> {
    if options.contains_key(INPUT_ARG) {
        return Err(RenderError::DuplicateInput);
    }
    if let Some(key) = options.keys().find(|k| cfg.is_reserved(k)) {
        return Err(RenderError::UnsupportedOption(key.clone()));
    }
    Ok(())
}

/// Build the R expression that renders `file_name` with the given options.
///
/// Without options this is a direct `render(input = "...")` call. With
/// options, `input` is appended and the map goes through `do.call`.
pub fn render_call(options: &RenderOptions, file_name: &str, cfg: &Config) -> Result<String> {
    validate_options(options, cfg)?;

    let input = r_literal(&Value::String(file_name.to_string())).map_err(|reason| {
        RenderError::UnsupportedValue {
            key: INPUT_ARG.into(),
            reason,
        }
    })?;
    let render_fn = &cfg.render_function;

    if options.is_empty() {
        return Ok(format!("{render_fn}({INPUT_ARG} = {input})"));
    }

    let mut args = Vec::with_capacity(options.len() + 1);
    for (key, value) in options {
        let mut arg = String::new();
        let literal = write_name(&mut arg, key)
            .and_then(|()| r_literal(value))
            .map_err(|reason| RenderError::UnsupportedValue {
                key: key.clone(),
                reason,
            })?;
        arg.push_str(" = ");
        arg.push_str(&literal);
        args.push(arg);
    }
    args.push(format!("{INPUT_ARG} = {input}"));

    Ok(format!("do.call({render_fn}, list({}))", args.join(", ")))
}

/// Escape a script for embedding between double quotes in a POSIX shell command.
pub fn shell_escape_double_quoted(script: &str) -> String {
    let mut out = String::with_capacity(script.len());
    for c in script.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
