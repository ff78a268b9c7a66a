//! YAML codec for the instance list
//!
//! The document is a mapping of primary URL to instance block:
//!
//! ```yaml
//! https://searx.me:
//!   safe: true
//!   comments:
//!   - maintained by the searx team
//!   additional_urls:
//!     http://searxme2v3cqhlfw.onion: Hidden Service
//! https://searx.example.org: {}
//! ```
//!
//! Lines are never wrapped and multi-line strings become `|-` blocks.
//!
//! Each [`RecordKind`] has one explicit encode/decode pair. No YAML tags are
//! written or accepted. Decoding replays every entry through
//! [`InstanceList::insert`], so a decoded list always satisfies the store
//! invariants.

use crate::error::{ModelError, ModelResult};
use crate::instance::{AdditionalUrls, Instance};
use crate::list::InstanceList;
use serde_yaml::{Mapping, Value};
use std::fmt::{self, Display, Formatter};

const FIELD_SAFE: &str = "safe";
const FIELD_COMMENTS: &str = "comments";
const FIELD_ADDITIONAL_URLS: &str = "additional_urls";

/// Record kinds that make up a list document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Document root: URL → instance
    InstanceList,
    /// Instance block
    Instance,
    /// `additional_urls` block: URL → relation tag
    AdditionalUrlList,
}

impl RecordKind {
    /// Name used in diagnostics
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InstanceList => "InstanceList",
            Self::Instance => "Instance",
            Self::AdditionalUrlList => "AdditionalUrlList",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encode a list to YAML text
///
/// Same list, same bytes.
///
/// # Errors
/// [`ModelError::Serialize`] if the YAML emitter fails.
pub fn encode(list: &InstanceList) -> ModelResult<String> {
    let document = encode_instance_list(list);
    serde_yaml::to_string(&document).map_err(|e| ModelError::Serialize(e.to_string()))
}

/// Decode YAML text into a validated list
///
/// Blank and comment-only text decode to an empty list.
///
/// # Errors
/// - [`ModelError::MalformedDocument`] for syntax errors and unknown shapes
/// - [`ModelError::TypeMismatch`] for wrongly typed fields
/// - [`ModelError::Validation`] for duplicate or non-canonical URLs
pub fn decode(text: &str) -> ModelResult<InstanceList> {
    if is_blank_document(text) {
        return Ok(InstanceList::new());
    }
    let document: Value =
        serde_yaml::from_str(text).map_err(|e| ModelError::malformed(e.to_string()))?;
    decode_instance_list(&document)
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

// --- InstanceList ---

fn encode_instance_list(list: &InstanceList) -> Value {
    let mut root = Mapping::new();
    for (url, instance) in list.iter() {
        root.insert(Value::String(url.to_string()), encode_instance(instance));
    }
    Value::Mapping(root)
}

fn decode_instance_list(value: &Value) -> ModelResult<InstanceList> {
    let mut list = InstanceList::new();
    let root = match value {
        Value::Null => return Ok(list),
        Value::Mapping(root) => root,
        _ => {
            return Err(ModelError::malformed(format!(
                "{} must be a mapping of URL to instance",
                RecordKind::InstanceList
            )))
        }
    };

    for (key, block) in root {
        let url = string_key(key, RecordKind::InstanceList)?;
        let instance = decode_instance(url, block)?;
        list.insert(url, instance)?;
    }
    Ok(list)
}

// --- Instance ---

fn encode_instance(instance: &Instance) -> Value {
    let mut block = Mapping::new();
    if let Some(safe) = instance.safe {
        block.insert(FIELD_SAFE.into(), Value::Bool(safe));
    }
    if !instance.comments.is_empty() {
        let comments = instance
            .comments
            .iter()
            .map(|c| Value::String(c.clone()))
            .collect();
        block.insert(FIELD_COMMENTS.into(), Value::Sequence(comments));
    }
    if !instance.additional_urls.is_empty() {
        block.insert(
            FIELD_ADDITIONAL_URLS.into(),
            encode_additional_urls(&instance.additional_urls),
        );
    }
    Value::Mapping(block)
}

fn decode_instance(url: &str, value: &Value) -> ModelResult<Instance> {
    let block = match value {
        // `https://searx.me:` with nothing after it
        Value::Null => return Ok(Instance::new()),
        Value::Mapping(block) => block,
        _ => {
            return Err(ModelError::malformed(format!(
                "{} block of {url} must be a mapping",
                RecordKind::Instance
            )))
        }
    };

    let mut instance = Instance::new();
    for (key, field) in block {
        match string_key(key, RecordKind::Instance)? {
            FIELD_SAFE => instance.safe = decode_safe(field)?,
            FIELD_COMMENTS => instance.comments = decode_comments(field)?,
            FIELD_ADDITIONAL_URLS => instance.additional_urls = decode_additional_urls(field)?,
            other => {
                return Err(ModelError::malformed(format!(
                    "unknown field `{other}` in {} block of {url}",
                    RecordKind::Instance
                )))
            }
        }
    }
    Ok(instance)
}

fn decode_safe(value: &Value) -> ModelResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(safe) => Ok(Some(*safe)),
        _ => Err(ModelError::type_mismatch(
            RecordKind::Instance,
            FIELD_SAFE,
            "a boolean",
        )),
    }
}

fn decode_comments(value: &Value) -> ModelResult<Vec<String>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        _ => {
            return Err(ModelError::type_mismatch(
                RecordKind::Instance,
                FIELD_COMMENTS,
                "a list",
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(comment) => Ok(comment.clone()),
            _ => Err(ModelError::type_mismatch(
                RecordKind::Instance,
                format!("{FIELD_COMMENTS}[{i}]"),
                "a string",
            )),
        })
        .collect()
}

// --- AdditionalUrlList ---

fn encode_additional_urls(urls: &AdditionalUrls) -> Value {
    let block = urls
        .iter()
        .map(|(url, relation)| (Value::String(url.to_string()), Value::String(relation.to_string())))
        .collect();
    Value::Mapping(block)
}

fn decode_additional_urls(value: &Value) -> ModelResult<AdditionalUrls> {
    let block = match value {
        Value::Null => return Ok(AdditionalUrls::new()),
        Value::Mapping(block) => block,
        _ => {
            return Err(ModelError::type_mismatch(
                RecordKind::Instance,
                FIELD_ADDITIONAL_URLS,
                "a mapping",
            ))
        }
    };

    let mut urls = AdditionalUrls::new();
    for (key, relation) in block {
        let url = string_key(key, RecordKind::AdditionalUrlList)?;
        let Value::String(relation) = relation else {
            return Err(ModelError::type_mismatch(
                RecordKind::AdditionalUrlList,
                url,
                "a string",
            ));
        };
        urls.insert(url, relation.as_str());
    }
    Ok(urls)
}

fn string_key(key: &Value, record: RecordKind) -> ModelResult<&str> {
    match key {
        Value::String(key) => Ok(key),
        other => Err(ModelError::malformed(format!(
            "{record} keys must be strings, found {}",
            describe(other)
        ))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
https://searx.me:
  safe: true
  comments:
  - maintained by the searx team
  additional_urls:
    http://searxme2v3cqhlfw.onion: Hidden Service
https://searx.example.org: {}
";

    #[test]
    fn decode_sample() {
        let list = decode(SAMPLE).unwrap();
        assert_eq!(list.len(), 2);

        let searx = list.get("https://searx.me").unwrap();
        assert_eq!(searx.safe, Some(true));
        assert_eq!(searx.comments, vec!["maintained by the searx team".to_string()]);
        assert_eq!(
            searx.additional_urls.get("http://searxme2v3cqhlfw.onion"),
            Some("Hidden Service")
        );
        assert!(list.get("https://searx.example.org").unwrap().is_empty());
    }

    #[test]
    fn encode_omits_unset_fields() {
        let mut list = InstanceList::new();
        list.insert("https://searx.example.org", Instance::new()).unwrap();
        list.insert("https://b.example.org", Instance::new().with_safe(false))
            .unwrap();

        let text = encode(&list).unwrap();
        assert!(text.contains("https://searx.example.org: {}"));
        assert!(!text.contains("comments"));
        assert!(!text.contains("additional_urls"));
        assert!(text.contains("safe: false"));
    }

    #[test]
    fn encode_is_stable_and_round_trips() {
        let list = decode(SAMPLE).unwrap();
        let first = encode(&list).unwrap();
        let again = encode(&decode(&first).unwrap()).unwrap();
        assert_eq!(first, again);
        assert_eq!(decode(&first).unwrap(), list);
    }

    #[test]
    fn blank_and_comment_only_documents_are_empty() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("\n  \n").unwrap().is_empty());
        assert!(decode("# Delete https://searx.me\n#\n# From @someone\n")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn null_block_is_empty_instance() {
        let list = decode("https://searx.me:\n").unwrap();
        assert_eq!(list.get("https://searx.me"), Some(&Instance::new()));
    }

    #[test]
    fn syntax_error_is_malformed() {
        let err = decode("https://searx.me: {safe: true\n").unwrap_err();
        assert!(matches!(err, ModelError::MalformedDocument(_)));
    }

    #[test]
    fn root_must_be_mapping() {
        let err = decode("- https://searx.me\n").unwrap_err();
        assert!(matches!(err, ModelError::MalformedDocument(_)));
    }

    #[test]
    fn unknown_field_is_malformed() {
        let err = decode("https://searx.me:\n  speed: fast\n").unwrap_err();
        assert!(matches!(err, ModelError::MalformedDocument(_)));
        assert!(err.to_string().contains("unknown field `speed`"));
    }

    #[test]
    fn scalar_instance_block_is_malformed() {
        let err = decode("https://searx.me: 42\n").unwrap_err();
        assert!(matches!(err, ModelError::MalformedDocument(_)));
    }

    #[test]
    fn wrong_field_types_are_type_mismatch() {
        let err = decode("https://searx.me:\n  safe: yes please\n").unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));

        let err = decode("https://searx.me:\n  comments: a single string\n").unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));

        let err = decode("https://searx.me:\n  additional_urls:\n  - http://a.onion\n")
            .unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
    }

    #[test]
    fn invalid_urls_propagate_validation_errors() {
        let err = decode("http://searx.me: {}\n").unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let doc = "\
https://searx.me:
  additional_urls:
    http://abc.onion: Hidden Service
https://other.example.org:
  additional_urls:
    http://abc.onion: Hidden Service
";
        let err = decode(doc).unwrap_err();
        assert_eq!(err.to_string(), "http://abc.onion already declared");
    }

    #[test]
    fn tagged_values_are_rejected() {
        let err = decode("https://searx.me: !Instance {safe: true}\n").unwrap_err();
        assert!(matches!(err, ModelError::MalformedDocument(_)));
    }

    fn commented(comment: &str) -> InstanceList {
        let mut list = InstanceList::new();
        list.insert("https://searx.me", Instance::new().with_comment(comment))
            .unwrap();
        list
    }

    #[test]
    fn long_lines_are_never_wrapped() {
        let comment = "instance ".repeat(30).trim_end().to_string();
        assert!(comment.len() > 240);

        let list = commented(&comment);
        let text = encode(&list).unwrap();
        assert_eq!(text, format!("https://searx.me:\n  comments:\n  - {comment}\n"));
        assert_eq!(decode(&text).unwrap(), list);
    }

    #[test]
    fn multi_line_comment_is_a_literal_block() {
        let list = commented("first line\nsecond line");
        let text = encode(&list).unwrap();
        assert_eq!(
            text,
            "https://searx.me:\n  comments:\n  - |-\n    first line\n    second line\n"
        );
        assert_eq!(decode(&text).unwrap(), list);
    }

    #[test]
    fn yaml_1_1_booleans_stay_plain_strings() {
        let list = commented("yes");
        let text = encode(&list).unwrap();
        assert_eq!(text, "https://searx.me:\n  comments:\n  - yes\n");
        assert_eq!(decode(&text).unwrap(), list);
    }

    #[test]
    fn record_kind_names() {
        assert_eq!(RecordKind::AdditionalUrlList.to_string(), "AdditionalUrlList");
    }
}
