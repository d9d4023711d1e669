//! Documentation fragment parsing.
//!
//! A handler method documents itself with a fragment made of free text, a
//! delimiter line (`---`) and a YAML block describing the operation:
//!
//! ```text
//! Get a greeting endpoint.
//! ---
//! description: Get a greeting
//! responses:
//!     200:
//!         description: A greeting to the client
//! ```
//!
//! The parser is a trait so the aggregator can be given another convention.

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Line separating the free text from the structured block.
pub const DOC_DELIMITER: &str = "---";

/// Turns one documentation fragment into an operation object.
///
/// Returning `None` means the method contributes no operation.
pub trait DocParser: Send + Sync {
    fn parse(&self, fragment: &str) -> Option<Value>;
}

/// Default parser: YAML after a `---` line, summary taken from the free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDocParser;

impl DocParser for YamlDocParser {
    fn parse(&self, fragment: &str) -> Option<Value> {
        let Some((free_text, structured)) = split_fragment(fragment) else {
            debug!("Documentation fragment has no structured block");
            return None;
        };

        let yaml: serde_yaml::Value = match serde_yaml::from_str(&dedent(&structured)) {
            Ok(yaml) => yaml,
            Err(err) => {
                warn!(error = %err, "Unparseable documentation block skipped");
                return None;
            }
        };

        let Value::Object(mut operation) = yaml_to_json(yaml) else {
            warn!("Documentation block is not a mapping, skipped");
            return None;
        };

        if !operation.contains_key("summary") {
            if let Some(summary) = free_text.lines().map(str::trim).find(|l| !l.is_empty()) {
                operation.insert("summary".to_string(), Value::String(summary.to_string()));
            }
        }
        Some(Value::Object(operation))
    }
}

/// Split at the first delimiter line into `(free_text, structured)`.
fn split_fragment(fragment: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = fragment.lines().collect();
    let at = lines.iter().position(|l| l.trim() == DOC_DELIMITER)?;
    Some((lines[..at].join("\n"), lines[at + 1..].join("\n")))
}

/// Strip the indentation shared by all non-blank lines.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// YAML allows non-string mapping keys (`200:`); JSON objects do not.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect::<Map<String, Value>>(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;
    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
