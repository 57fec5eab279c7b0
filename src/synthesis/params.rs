//! Optional per-parameter hints supplied by the caller.
//!
//! Input is a JSON object keyed by parameter name, e.g.
//! `{"amount": {"min": 0, "max": 100}, "code": {"max_length": 8, "allow_null": true}}`.
//! Parsing never fails: anything malformed is dropped and described in a
//! warning so generation can continue with the no-bounds heuristics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Longest `max_length` hint honoured; larger values are dropped with a warning.
pub const MAX_STRING_LENGTH: u64 = 4096;

/// Hints for a single parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default)]
    pub allow_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl ParamSpec {
    pub fn bounded(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::default()
        }
    }

    /// Bounds usable for boundary-value analysis: both present, finite and `min < max`.
    pub fn usable_bounds(&self) -> Option<(f64, f64)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min.is_finite() && max.is_finite() && min < max => {
                Some((min, max))
            }
            _ => None,
        }
    }

    /// Positive maximum string length, if any, no longer than [`MAX_STRING_LENGTH`].
    pub fn positive_max_length(&self) -> Option<usize> {
        self.max_length
            .filter(|&len| len > 0 && len <= MAX_STRING_LENGTH)
            .and_then(|len| usize::try_from(len).ok())
    }
}

/// Outcome of reading caller-supplied hints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedParamSpecs {
    pub specs: IndexMap<String, ParamSpec>,
    /// Why some or all of the input was ignored
    pub warning: Option<String>,
}

impl ParsedParamSpecs {
    pub fn get(&self, parameter: &str) -> Option<&ParamSpec> {
        self.specs.get(parameter)
    }
}

/// Read parameter hints from optional JSON text.
pub fn parse_param_specs(raw: Option<&str>) -> ParsedParamSpecs {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return ParsedParamSpecs::default();
    };

    let object = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            return degraded(format!(
                "Parameter spec must be a JSON object keyed by parameter name, got {}",
                json_kind(&other)
            ));
        }
        Err(err) => return degraded(format!("Invalid parameter spec JSON: {err}")),
    };

    let mut problems = Vec::new();
    let specs = object
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::Object(fields) => Some((name.clone(), read_spec(&name, &fields, &mut problems))),
            other => {
                problems.push(format!(
                    "entry '{name}' must be an object, got {}",
                    json_kind(&other)
                ));
                None
            }
        })
        .collect();

    let warning = if problems.is_empty() {
        None
    } else {
        let message = format!("Ignored parts of the parameter spec: {}", problems.join("; "));
        warn!("{}", message);
        Some(message)
    };

    ParsedParamSpecs { specs, warning }
}

fn degraded(message: String) -> ParsedParamSpecs {
    warn!("{}; falling back to default heuristics", message);
    ParsedParamSpecs {
        specs: IndexMap::new(),
        warning: Some(message),
    }
}

fn read_spec(name: &str, fields: &Map<String, Value>, problems: &mut Vec<String>) -> ParamSpec {
    let mut spec = ParamSpec::default();

    for (field, value) in fields {
        match field.as_str() {
            "min" | "max" => match value.as_f64().filter(|v| v.is_finite()) {
                Some(number) if field == "min" => spec.min = Some(number),
                Some(number) => spec.max = Some(number),
                None => problems.push(format!("'{name}.{field}' is not a number")),
            },
            "allow_null" => match value.as_bool() {
                Some(flag) => spec.allow_null = flag,
                None => problems.push(format!("'{name}.allow_null' is not a boolean")),
            },
            "max_length" => match value.as_u64() {
                Some(len) if len <= MAX_STRING_LENGTH => spec.max_length = Some(len),
                Some(len) => problems.push(format!(
                    "'{name}.max_length' of {len} exceeds the limit of {MAX_STRING_LENGTH}"
                )),
                None => problems.push(format!(
                    "'{name}.max_length' is not a non-negative integer"
                )),
            },
            _ => {}
        }
    }

    spec
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_blank_input_is_silent() {
        assert_eq!(parse_param_specs(None), ParsedParamSpecs::default());
        assert_eq!(parse_param_specs(Some("   ")), ParsedParamSpecs::default());
    }

    #[test]
    fn reads_all_fields() {
        let parsed = parse_param_specs(Some(
            r#"{"amount":{"min":0,"max":100},"code":{"max_length":8,"allow_null":true}}"#,
        ));
        assert!(parsed.warning.is_none());
        assert_eq!(parsed.get("amount"), Some(&ParamSpec::bounded(0.0, 100.0)));

        let code = parsed.get("code").unwrap();
        assert!(code.allow_null);
        assert_eq!(code.positive_max_length(), Some(8));
        assert_eq!(code.usable_bounds(), None);
    }

    #[test]
    fn malformed_json_degrades_with_warning() {
        let parsed = parse_param_specs(Some("{amount: 0"));
        assert!(parsed.specs.is_empty());
        assert!(parsed.warning.unwrap().starts_with("Invalid parameter spec JSON"));
    }

    #[test]
    fn non_object_root_degrades_with_warning() {
        let parsed = parse_param_specs(Some("[1, 2]"));
        assert!(parsed.specs.is_empty());
        assert!(parsed.warning.unwrap().contains("got an array"));
    }

    #[test]
    fn bad_fields_are_dropped_individually() {
        let parsed = parse_param_specs(Some(
            r#"{"a":{"min":"zero","max":10},"b":5,"c":{"allow_null":"yes","max_length":-1}}"#,
        ));
        let a = parsed.get("a").unwrap();
        assert_eq!(a.min, None);
        assert_eq!(a.max, Some(10.0));
        assert!(parsed.get("b").is_none());
        assert_eq!(parsed.get("c"), Some(&ParamSpec::default()));

        let warning = parsed.warning.unwrap();
        assert!(warning.contains("'a.min' is not a number"));
        assert!(warning.contains("entry 'b' must be an object"));
        assert!(warning.contains("'c.allow_null'"));
        assert!(warning.contains("'c.max_length'"));
    }

    #[test]
    fn inverted_or_equal_bounds_are_not_usable() {
        assert_eq!(ParamSpec::bounded(10.0, 10.0).usable_bounds(), None);
        assert_eq!(ParamSpec::bounded(10.0, 1.0).usable_bounds(), None);
        assert_eq!(ParamSpec::bounded(-5.0, 5.0).usable_bounds(), Some((-5.0, 5.0)));
    }

    #[test]
    fn oversized_max_length_is_dropped_with_warning() {
        let parsed = parse_param_specs(Some(
            r#"{"code":{"max_length":18446744073709551615,"allow_null":true},"name":{"max_length":4096}}"#,
        ));
        let code = parsed.get("code").unwrap();
        assert_eq!(code.max_length, None);
        assert!(code.allow_null);
        assert_eq!(parsed.get("name").unwrap().positive_max_length(), Some(4096));
        assert!(parsed
            .warning
            .unwrap()
            .contains("'code.max_length' of 18446744073709551615 exceeds the limit of 4096"));

        let direct = ParamSpec {
            max_length: Some(MAX_STRING_LENGTH + 1),
            ..ParamSpec::default()
        };
        assert_eq!(direct.positive_max_length(), None);
    }

    #[test]
    fn zero_max_length_is_ignored() {
        let spec = ParamSpec {
            max_length: Some(0),
            ..ParamSpec::default()
        };
        assert_eq!(spec.positive_max_length(), None);
    }
}
