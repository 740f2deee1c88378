//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! Each command has a `render_*` counterpart that returns the text it
//! prints, so output can be checked without a terminal.

use crate::config::AppConfig;
use crate::error::CliError;
use gripview_bindings::{MappedScopeBindings, replace_original_variable_name};
use gripview_core::{
    Grip, InspectionSnapshot, InspectorSession, Node, NodePath, ObjectGrip, PendingFetch,
    Preview, TreeRow, bucket_layout, make_numerical_buckets, needs_numerical_buckets,
    primitives::MAX_SNAPSHOT_SIZE,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a scopes file (1 MB).
const MAX_SCOPES_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), CliError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CliError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(CliError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input path.
///
/// Canonicalizes the path (resolving symlinks and `..`) and ensures it
/// names an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, CliError> {
    let canonical = path.canonicalize().map_err(|e| {
        CliError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(CliError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate and read a whole input file.
fn read_input_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, max_size)?;
    std::fs::read_to_string(&path)
        .map_err(|e| CliError::Io(format!("Cannot read '{}': {}", path.display(), e)))
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Rows and pending fetches of an expanded snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub rows: Vec<TreeRow>,
    pub pending: Vec<PendingFetch>,
}

/// Expand `snapshot` down to `depth` levels.
pub fn inspect_snapshot(
    config: &AppConfig,
    snapshot: &str,
    depth: usize,
) -> Result<InspectReport, CliError> {
    let snapshot = InspectionSnapshot::from_json(snapshot)?;
    tracing::debug!(
        roots = snapshot.roots.len(),
        loaded = snapshot.loaded_properties.len(),
        "snapshot parsed"
    );

    let mut session = InspectorSession::from_snapshot(snapshot, config.inspector_config());
    let pending = session.expand_to_depth(depth);
    let rows = session.visible_rows();

    Ok(InspectReport { rows, pending })
}

/// Text rendering of an [`InspectReport`].
#[must_use]
pub fn render_inspect(report: &InspectReport) -> String {
    let mut out = String::new();

    for row in &report.rows {
        let marker = match (row.expandable, row.expanded) {
            (true, true) => "▼ ",
            (true, false) => "▶ ",
            (false, _) => "  ",
        };
        let indent = "  ".repeat(row.depth);
        let _ = match &row.value {
            Some(value) => {
                writeln!(out, "{indent}{marker}{}: {}", row.name, summarize_grip(value))
            }
            None => writeln!(out, "{indent}{marker}{}", row.name),
        };
    }

    if report.pending.is_empty() {
        out.push_str("\nNo pending fetches.\n");
    } else {
        out.push_str("\nPending fetches:\n");
        for fetch in &report.pending {
            let _ = writeln!(out, "  {}: {}", fetch.path, describe_plan(fetch));
        }
    }

    out
}

fn describe_plan(fetch: &PendingFetch) -> String {
    let plan = &fetch.plan;
    [
        (plan.indexed_properties, "indexed properties"),
        (plan.non_indexed_properties, "non-indexed properties"),
        (plan.entries, "entries"),
        (plan.prototype, "prototype"),
        (plan.symbols, "symbols"),
    ]
    .into_iter()
    .filter_map(|(wanted, label)| wanted.then_some(label))
    .collect::<Vec<_>>()
    .join(", ")
}

/// One-line summary of a grip, as shown next to a row name.
#[must_use]
pub fn summarize_grip(grip: &Grip) -> String {
    match grip {
        Grip::Null => "null".to_string(),
        Grip::Bool(b) => b.to_string(),
        Grip::Number(n) => n.to_string(),
        Grip::String(s) => format!("{s:?}"),
        Grip::Object(object) => summarize_object(object),
    }
}

fn summarize_object(object: &ObjectGrip) -> String {
    if object.optimized_out {
        return "(optimized away)".to_string();
    }
    if object.missing_arguments {
        return "(unavailable)".to_string();
    }

    match object.grip_type.as_str() {
        "object" => {
            let class = object.class_name.as_deref().unwrap_or("Object");
            match object.preview.as_ref().and_then(preview_count) {
                Some(count) => format!("{class}({count})"),
                None => class.to_string(),
            }
        }
        "mapEntry" => {
            let part = |grip: Option<&Grip>| grip.map(summarize_grip).unwrap_or_default();
            let preview = object.preview.as_ref();
            format!(
                "{} → {}",
                part(preview.and_then(|p| p.key.as_ref())),
                part(preview.and_then(|p| p.value.as_ref()))
            )
        }
        other => other.to_string(),
    }
}

fn preview_count(preview: &Preview) -> Option<u64> {
    preview
        .length
        .or(preview.child_nodes_length)
        .or(preview.size)
}

/// Inspect a snapshot file.
pub fn cmd_inspect(
    config: &AppConfig,
    snapshot_path: &Path,
    depth: usize,
    json_mode: bool,
) -> Result<(), CliError> {
    let content = read_input_file(snapshot_path, MAX_SNAPSHOT_SIZE as u64)?;
    let report = inspect_snapshot(config, &content, depth)?;

    if json_mode {
        print_json(&report);
    } else {
        print!("{}", render_inspect(&report));
    }
    Ok(())
}

// =============================================================================
// BUCKETS COMMAND
// =============================================================================

/// Bucket names of an array of `length` items; empty when it is shown flat.
#[must_use]
pub fn bucket_names(length: u64) -> Vec<String> {
    let grip = ObjectGrip::new("object")
        .with_actor("cli")
        .with_class("Array")
        .with_preview(Preview {
            kind: Some("ArrayLike".to_string()),
            length: Some(length),
            ..Preview::default()
        });
    let root = Node::root("array", NodePath::new("array"), grip.into());

    if !needs_numerical_buckets(&root) {
        return Vec::new();
    }
    make_numerical_buckets(&root)
        .iter()
        .map(|bucket| bucket.name().to_string())
        .collect()
}

/// Text rendering of the bucket layout for `length`.
#[must_use]
pub fn render_buckets(length: u64) -> String {
    let names = bucket_names(length);
    if names.is_empty() {
        return format!("Length {length}: shown without buckets\n");
    }

    let layout = bucket_layout(length);
    let mut out = format!(
        "Length {length}: {} buckets of {}\n",
        layout.num_buckets, layout.bucket_size
    );
    for name in names {
        let _ = writeln!(out, "  {name}");
    }
    out
}

/// Show the bucket layout of an array length.
pub fn cmd_buckets(length: u64, json_mode: bool) -> Result<(), CliError> {
    if json_mode {
        let names = bucket_names(length);
        let layout = (!names.is_empty()).then(|| bucket_layout(length));
        print_json(&serde_json::json!({
            "length": length,
            "layout": layout,
            "buckets": names,
        }));
    } else {
        print!("{}", render_buckets(length));
    }
    Ok(())
}

// =============================================================================
// RENAME COMMAND
// =============================================================================

/// Parse a JSON array of scope bindings.
pub fn parse_scopes(content: &str) -> Result<Vec<MappedScopeBindings>, CliError> {
    serde_json::from_str(content)
        .map_err(|e| CliError::InvalidInput(format!("Invalid scopes file: {}", e)))
}

/// Rename `expression` against the scopes in `scopes_path`.
pub fn cmd_rename(expression: &str, scopes_path: &Path, json_mode: bool) -> Result<(), CliError> {
    let content = read_input_file(scopes_path, MAX_SCOPES_FILE_SIZE)?;
    let scopes = parse_scopes(&content)?;
    let renamed = replace_original_variable_name(expression, &scopes)?;

    if json_mode {
        print_json(&serde_json::json!({
            "expression": expression,
            "renamed": renamed,
        }));
    } else {
        println!("{renamed}");
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grip(value: serde_json::Value) -> Grip {
        serde_json::from_value(value).expect("grip")
    }

    #[test]
    fn primitives_are_summarized() {
        assert_eq!(summarize_grip(&grip(json!(null))), "null");
        assert_eq!(summarize_grip(&grip(json!(true))), "true");
        assert_eq!(summarize_grip(&grip(json!(42))), "42");
        assert_eq!(summarize_grip(&grip(json!("hi"))), "\"hi\"");
        assert_eq!(summarize_grip(&grip(json!({ "type": "undefined" }))), "undefined");
    }

    #[test]
    fn objects_show_class_and_count() {
        let array = grip(json!({
            "type": "object", "actor": "a", "class": "Array",
            "preview": { "kind": "ArrayLike", "length": 3 }
        }));
        assert_eq!(summarize_grip(&array), "Array(3)");

        let plain = grip(json!({ "type": "object", "actor": "o" }));
        assert_eq!(summarize_grip(&plain), "Object");

        let gone = grip(json!({ "type": "object", "optimizedOut": true }));
        assert_eq!(summarize_grip(&gone), "(optimized away)");
    }

    #[test]
    fn map_entries_show_key_and_value() {
        let entry = Grip::map_entry(Grip::from("a"), Grip::from(1.0));
        assert_eq!(summarize_grip(&entry), "\"a\" → 1");
    }

    #[test]
    fn small_arrays_are_not_bucketed() {
        assert!(bucket_names(100).is_empty());
        assert_eq!(render_buckets(5), "Length 5: shown without buckets\n");
    }

    #[test]
    fn large_arrays_list_their_buckets() {
        let names = bucket_names(250);
        assert_eq!(names, vec!["[0…99]", "[100…199]", "[200…249]"]);
        assert!(render_buckets(250).starts_with("Length 250: 3 buckets of 100\n"));
    }

    #[test]
    fn scopes_file_must_be_an_array() {
        assert!(parse_scopes(r#"[{ "bindings": { "a": "b" } }]"#).is_ok());
        assert!(matches!(
            parse_scopes(r#"{ "bindings": {} }"#),
            Err(CliError::InvalidInput(_))
        ));
    }
}
