//! Validation of serialized theme payloads.
//!
//! Payloads are walked as untyped JSON so every problem can be reported
//! against the field that caused it, rather than stopping at the first
//! serde error.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::lch::{LchColor, MAX_CHROMA};
use crate::types::{ThemeCore, ThemeDefinition, Variant, DEFAULT_CATEGORY};

const REQUIRED_FIELDS: &[&str] = &["id", "name", "variant", "core"];
const KNOWN_FIELDS: &[&str] = &["id", "name", "variant", "category", "core", "popularity"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid JSON at line {line}, col {column}: {message}")]
    InvalidJson {
        message: String,
        line: usize,
        column: usize,
    },
    #[error("missing required field '{field}'")]
    MissingField { field: String },
    #[error("field '{field}' must be {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },
    #[error("field '{field}' must not be empty")]
    EmptyField { field: String },
    #[error("field '{field}' is {value}, expected {min}..={max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("field 'variant' is \"{value}\", expected \"light\" or \"dark\"")]
    InvalidVariant { value: String },
    #[error("variant '{variant}' does not match background lightness {background_lightness}")]
    VariantMismatch {
        variant: Variant,
        background_lightness: f64,
    },
    #[error("a theme with id '{id}' already exists")]
    DuplicateId { id: String },
}

impl ValidationError {
    /// The payload field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidJson { .. } => "payload",
            Self::MissingField { field }
            | Self::InvalidType { field, .. }
            | Self::EmptyField { field }
            | Self::OutOfRange { field, .. } => field,
            Self::InvalidVariant { .. } | Self::VariantMismatch { .. } => "variant",
            Self::DuplicateId { .. } => "id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    UnknownField(String),
    DefaultedCategory,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(field) => write!(f, "ignored unknown field '{}'", field),
            Self::DefaultedCategory => {
                write!(f, "no 'category' given, using \"{}\"", DEFAULT_CATEGORY)
            }
        }
    }
}

/// A payload that passed every structural and range check.
#[derive(Debug, Clone)]
pub struct ValidatedTheme {
    pub theme: ThemeDefinition,
    pub warnings: Vec<ValidationWarning>,
}

/// Parse and validate a transport payload.
///
/// Registry-level checks (id collisions) are not done here.
pub fn validate_payload(content: &str) -> Result<ValidatedTheme, Vec<ValidationError>> {
    let value: Value = serde_json::from_str(content).map_err(|e| {
        vec![ValidationError::InvalidJson {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }]
    })?;

    let Some(obj) = value.as_object() else {
        return Err(vec![ValidationError::InvalidType {
            field: "payload".to_string(),
            expected: "an object",
        }]);
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for &field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            errors.push(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
    }
    for key in obj.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            warnings.push(ValidationWarning::UnknownField(key.clone()));
        }
    }

    let id = string_field(obj, "id", &mut errors);
    let name = string_field(obj, "name", &mut errors);

    let variant = match obj.get("variant") {
        None => None,
        Some(Value::String(s)) => match s.parse::<Variant>() {
            Ok(v) => Some(v),
            Err(_) => {
                errors.push(ValidationError::InvalidVariant { value: s.clone() });
                None
            }
        },
        Some(_) => {
            errors.push(ValidationError::InvalidType {
                field: "variant".to_string(),
                expected: "a string",
            });
            None
        }
    };

    let category = match obj.get("category") {
        None | Some(Value::Null) => {
            warnings.push(ValidationWarning::DefaultedCategory);
            Some(DEFAULT_CATEGORY.to_string())
        }
        Some(_) => string_field(obj, "category", &mut errors),
    };

    let popularity = match obj.get("popularity") {
        None | Some(Value::Null) => Some(None),
        Some(v) => match v.as_f64() {
            Some(p) if (0.0..=100.0).contains(&p) && p.fract() == 0.0 => Some(Some(p as u8)),
            Some(p) => {
                errors.push(ValidationError::OutOfRange {
                    field: "popularity".to_string(),
                    value: p,
                    min: 0.0,
                    max: 100.0,
                });
                None
            }
            None => {
                errors.push(ValidationError::InvalidType {
                    field: "popularity".to_string(),
                    expected: "an integer",
                });
                None
            }
        },
    };

    let core = match obj.get("core") {
        None => None,
        Some(Value::Object(core)) => {
            let base = color_field(core, "core.base", "base", &mut errors);
            let accent = color_field(core, "core.accent", "accent", &mut errors);
            match (base, accent) {
                (Some(base), Some(accent)) => Some(ThemeCore::new(base, accent)),
                _ => None,
            }
        }
        Some(_) => {
            errors.push(ValidationError::InvalidType {
                field: "core".to_string(),
                expected: "an object",
            });
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    match (id, name, variant, category, core, popularity) {
        (Some(id), Some(name), Some(variant), Some(category), Some(core), Some(popularity)) => {
            let theme = ThemeDefinition::new(id, name, variant, category, core, popularity)?;
            Ok(ValidatedTheme { theme, warnings })
        }
        // every None above pushed an error
        _ => Err(errors),
    }
}

fn string_field(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    match obj.get(field)? {
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.push(ValidationError::InvalidType {
                field: field.to_string(),
                expected: "a string",
            });
            None
        }
    }
}

fn color_field(
    core: &Map<String, Value>,
    path: &str,
    key: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<LchColor> {
    let Some(value) = core.get(key) else {
        errors.push(ValidationError::MissingField {
            field: path.to_string(),
        });
        return None;
    };

    let triple = value
        .as_array()
        .filter(|a| a.len() == 3)
        .and_then(|a| {
            let l = a[0].as_f64()?;
            let c = a[1].as_f64()?;
            let h = a[2].as_f64()?;
            Some([l, c, h])
        });

    let Some([l, c, h]) = triple else {
        errors.push(ValidationError::InvalidType {
            field: path.to_string(),
            expected: "an [L, C, H] array of three numbers",
        });
        return None;
    };

    let before = errors.len();
    for (name, value, max) in [("L", l, 100.0), ("C", c, MAX_CHROMA), ("H", h, 360.0)] {
        if !(0.0..=max).contains(&value) {
            errors.push(ValidationError::OutOfRange {
                field: format!("{}.{}", path, name),
                value,
                min: 0.0,
                max,
            });
        }
    }

    (errors.len() == before).then(|| LchColor::new(l, c, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "id": "harbor-night",
        "name": "Harbor Night",
        "variant": "dark",
        "category": "calm",
        "core": { "base": [8, 4, 250], "accent": [64, 60, 255] },
        "popularity": 72
    }"#;

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field()).collect()
    }

    #[test]
    fn test_validate_valid_payload() {
        let result = validate_payload(VALID).unwrap();
        assert_eq!(result.theme.id(), "harbor-night");
        assert_eq!(result.theme.variant(), Variant::Dark);
        assert_eq!(result.theme.popularity(), Some(72));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_invalid_json() {
        let errors = validate_payload("{\"id\": ").unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidJson { line: 1, .. }));
    }

    #[test]
    fn test_validate_not_an_object() {
        let errors = validate_payload("[1, 2, 3]").unwrap_err();
        assert_eq!(fields(&errors), vec!["payload"]);
    }

    #[test]
    fn test_validate_missing_fields() {
        let errors = validate_payload(r#"{"name": "Only a name"}"#).unwrap_err();
        assert_eq!(fields(&errors), vec!["id", "variant", "core"]);
    }

    #[test]
    fn test_validate_missing_accent() {
        let payload = r#"{"id":"a","name":"A","variant":"dark","core":{"base":[8,4,250]}}"#;
        let errors = validate_payload(payload).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingField { field } if field == "core.accent")));
    }

    #[test]
    fn test_validate_lightness_out_of_range() {
        let payload = r#"{"id":"a","name":"A","variant":"light",
            "core":{"base":[150,4,250],"accent":[64,60,255]}}"#;
        let errors = validate_payload(payload).unwrap_err();
        assert_eq!(fields(&errors), vec!["core.base.L"]);
        assert!(errors[0].to_string().contains("150"));
    }

    #[test]
    fn test_validate_bad_variant() {
        let payload = r#"{"id":"a","name":"A","variant":"sepia",
            "core":{"base":[8,4,250],"accent":[64,60,255]}}"#;
        let errors = validate_payload(payload).unwrap_err();
        assert!(matches!(&errors[0], ValidationError::InvalidVariant { value } if value == "sepia"));
    }

    #[test]
    fn test_validate_variant_mismatch() {
        let payload = r#"{"id":"a","name":"A","variant":"light",
            "core":{"base":[8,4,250],"accent":[64,60,255]}}"#;
        let errors = validate_payload(payload).unwrap_err();
        assert!(matches!(errors[0], ValidationError::VariantMismatch { .. }));
    }

    #[test]
    fn test_validate_malformed_color() {
        let payload = r#"{"id":"a","name":"A","variant":"dark",
            "core":{"base":[8,4],"accent":"blue"}}"#;
        let errors = validate_payload(payload).unwrap_err();
        assert_eq!(fields(&errors), vec!["core.base", "core.accent"]);
    }

    #[test]
    fn test_validate_popularity_must_be_whole() {
        let payload = r#"{"id":"a","name":"A","variant":"dark","popularity":12.5,
            "core":{"base":[8,4,250],"accent":[64,60,255]}}"#;
        let errors = validate_payload(payload).unwrap_err();
        assert_eq!(fields(&errors), vec!["popularity"]);
    }

    #[test]
    fn test_validate_warnings() {
        let payload = r#"{"id":"a","name":"A","variant":"dark","author":"me",
            "core":{"base":[8,4,250],"accent":[64,60,255]}}"#;
        let result = validate_payload(payload).unwrap();
        assert_eq!(result.theme.category(), DEFAULT_CATEGORY);
        assert_eq!(
            result.warnings,
            vec![
                ValidationWarning::UnknownField("author".to_string()),
                ValidationWarning::DefaultedCategory,
            ]
        );
    }
}
