//! Annotation snapshot loading.
//!
//! Accepts either a bare JSON array of annotations or the analysis response
//! envelope `{ "annotations": [...] }` that the editor receives from the API.
//! Annotations are passed through as-is: no validation, no dedup, unknown
//! types preserved for the core to drop.

use anyhow::{bail, Context, Result};
use memory_sidebar_core::Annotation;
use serde_json::Value;
use std::path::Path;

/// Parse a snapshot. Errors name the offending annotation by position and,
/// when it has one, by id.
pub fn parse_annotations(json: &str) -> Result<Vec<Annotation>> {
    let snapshot: Value =
        serde_json::from_str(json).with_context(|| "Failed to parse annotations JSON")?;

    let items = match snapshot {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("annotations") {
            Some(Value::Array(items)) => items,
            Some(_) => bail!("`annotations` must be an array"),
            None => bail!("Expected an array of annotations or an object with an `annotations` field"),
        },
        _ => bail!("Expected an array of annotations or an object with an `annotations` field"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let id = item.get("id").and_then(Value::as_str).map(str::to_string);
            serde_json::from_value::<Annotation>(item).with_context(|| match id {
                Some(id) => format!("Invalid annotation #{} (id '{}')", i, id),
                None => format!("Invalid annotation #{}", i),
            })
        })
        .collect()
}

pub fn load_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read annotations file: {}", path.display()))?;
    let annotations = parse_annotations(&content)
        .with_context(|| format!("Invalid annotations file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = annotations.len(), "loaded annotations");
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let anns = parse_annotations(r#"[{"id":"a","type":"hook","importance":0.5}]"#).unwrap();
        assert_eq!(anns.len(), 1);
    }

    #[test]
    fn parses_envelope() {
        let anns = parse_annotations(
            r#"{"chapterId":"c1","annotations":[{"id":"a","type":"scene","importance":0.5}]}"#,
        )
        .unwrap();
        assert_eq!(anns[0].kind.as_str(), "scene");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_annotations("{\"nope\": 1}").is_err());
        assert!(parse_annotations("not json").is_err());
    }

    #[test]
    fn misshapen_metadata_does_not_fail_snapshot() {
        let anns = parse_annotations(
            r#"[
                {"id":"a","type":"hook","importance":0.9,"metadata":{"strength":7}},
                {"id":"b","type":"hook","importance":0.5,"metadata":{"strength":"8"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(anns.len(), 2);
        assert_eq!(anns[0].metadata.strength, Some(7.0));
        assert_eq!(anns[1].metadata.strength, None);
    }

    #[test]
    fn bad_annotation_error_names_it() {
        let err = parse_annotations(
            r#"{"annotations":[
                {"id":"a","type":"hook","importance":0.9},
                {"id":"b","type":"hook","importance":"high"}
            ]}"#,
        )
        .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("#1"), "{}", msg);
        assert!(msg.contains("'b'"), "{}", msg);
        assert!(msg.contains("importance") || msg.contains("invalid type"), "{}", msg);
        assert!(!msg.contains("untagged"), "{}", msg);
    }

    #[test]
    fn envelope_annotations_must_be_array() {
        let err = parse_annotations(r#"{"annotations": 3}"#).unwrap_err();
        assert!(err.to_string().contains("must be an array"));
    }

    #[test]
    fn missing_file_errors_with_path() {
        let err = load_annotations(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.json"));
    }
}
