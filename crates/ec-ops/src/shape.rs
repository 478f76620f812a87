//! Response shaping for lookups whose raw upstream form is not useful to callers.

use crate::{Error, Result};
use ec_transport::Decoded;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One case type of an establishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseType {
    /// Upstream code, used in case number searches.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Court establishment within a complex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Establishment {
    /// NJDG establishment code.
    pub establishment_code: String,
    /// Complex the establishment belongs to.
    pub complex_code: String,
    /// Complex display name.
    pub court_name: String,
}

/// Take the top-level collection `field` out of a response.
pub fn take_field(body: Decoded, field: &'static str) -> Result<Value> {
    match body {
        Decoded::Structured(Value::Object(mut object))
            if object.get(field).is_some_and(|value| !value.is_null()) =>
        {
            Ok(object.remove(field).unwrap_or(Value::Null))
        }
        body => Err(Error::MissingData { field, body }),
    }
}

/// Parse `case_types[].case_type` strings of the form `code~name#code~name#...`.
///
/// Groups that do not split into exactly one code and one name are skipped.
pub fn case_types(case_types: &Value) -> Vec<CaseType> {
    case_types
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("case_type").and_then(Value::as_str))
        .flat_map(|packed| packed.split('#'))
        .filter_map(|group| {
            let mut parts = group.split('~');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(code), Some(name), None) => Some(CaseType {
                    code: code.to_owned(),
                    name: name.to_owned(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Establishments of complex `complex_code` from a `courtComplex` list.
pub fn establishments(court_complex: &Value, complex_code: &str) -> Vec<Establishment> {
    court_complex
        .as_array()
        .into_iter()
        .flatten()
        .filter(|court| {
            court
                .get("complex_code")
                .is_some_and(|code| text(code) == complex_code)
        })
        .map(|court| Establishment {
            establishment_code: court.get("njdg_est_code").map(text).unwrap_or_default(),
            complex_code: complex_code.to_owned(),
            court_name: court
                .get("court_complex_name")
                .map(text)
                .unwrap_or_default(),
        })
        .collect()
}

/// Codes arrive as strings or bare numbers depending on the deployment.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_types_parsing() {
        let raw = json!([
            {"case_type": "1~Civil Suit#2~Criminal Appeal"},
            {"case_type": "3~Bail#broken#4~A~B"},
            {"other": "ignored"}
        ]);
        assert_eq!(
            case_types(&raw),
            vec![
                CaseType {
                    code: "1".into(),
                    name: "Civil Suit".into(),
                },
                CaseType {
                    code: "2".into(),
                    name: "Criminal Appeal".into(),
                },
                CaseType {
                    code: "3".into(),
                    name: "Bail".into(),
                },
            ]
        );
        assert!(case_types(&json!("not a list")).is_empty());
    }

    #[test]
    fn test_establishments_filter_by_complex() {
        let complexes = json!([
            {"complex_code": "1040001", "njdg_est_code": "3", "court_complex_name": "Ernakulam"},
            {"complex_code": 1040002, "njdg_est_code": 5, "court_complex_name": "Aluva"},
            {"complex_code": "1040001", "njdg_est_code": "4,7", "court_complex_name": "Ernakulam"}
        ]);

        let found = establishments(&complexes, "1040001");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].establishment_code, "4,7");

        let numeric = establishments(&complexes, "1040002");
        assert_eq!(
            numeric,
            vec![Establishment {
                establishment_code: "5".into(),
                complex_code: "1040002".into(),
                court_name: "Aluva".into(),
            }]
        );
        assert!(establishments(&complexes, "9").is_empty());
    }

    #[test]
    fn test_take_field() {
        let body = Decoded::Structured(json!({"states": [1, 2], "token": "t"}));
        assert_eq!(take_field(body, "states").unwrap(), json!([1, 2]));

        let null = Decoded::Structured(json!({"states": null}));
        assert!(take_field(null, "states").is_err());

        let raw = Decoded::Raw("Invalid Request".into());
        match take_field(raw, "districts") {
            Err(Error::MissingData { field, body }) => {
                assert_eq!(field, "districts");
                assert_eq!(body.as_raw(), Some("Invalid Request"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
