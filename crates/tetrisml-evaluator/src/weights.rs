use std::{num::ParseFloatError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Weights of the linear board evaluation.
///
/// `score = height·aggregate_height + holes·holes + complete_lines·lines + bumpiness·bumpiness`
///
/// Serialized with camel-case keys:
///
/// ```json
/// { "height": -0.510066, "holes": -0.35663, "completeLines": 0.760666, "bumpiness": -0.184483 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiParameters {
    pub height: f64,
    pub holes: f64,
    pub complete_lines: f64,
    pub bumpiness: f64,
}

impl Default for AiParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl AiParameters {
    pub const DEFAULT: Self = Self {
        height: -0.510_066,
        holes: -0.356_63,
        complete_lines: 0.760_666,
        bumpiness: -0.184_483,
    };

    const FIELD_NAMES: [&'static str; 4] = ["height", "holes", "completeLines", "bumpiness"];

    #[must_use]
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.height,
            self.holes,
            self.complete_lines,
            self.bumpiness,
        ]
    }

    #[must_use]
    pub fn from_array([height, holes, complete_lines, bumpiness]: [f64; 4]) -> Self {
        Self {
            height,
            holes,
            complete_lines,
            bumpiness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseAiParametersError {
    #[display("expected 4 comma-separated weights (height,holes,lines,bumpiness), got {found}")]
    WrongFieldCount { found: usize },
    #[display("invalid {field} weight {value:?}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        source: ParseFloatError,
    },
    #[display("{field} weight must be finite, got {value}")]
    NotFinite {
        field: &'static str,
        value: String,
    },
}

/// Parses `height,holes,lines,bumpiness`, e.g. `-0.51,-0.36,0.76,-0.18`.
impl FromStr for AiParameters {
    type Err = ParseAiParametersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let Ok(fields) = <[&str; 4]>::try_from(fields.as_slice()) else {
            return Err(ParseAiParametersError::WrongFieldCount {
                found: fields.len(),
            });
        };

        let mut weights = [0.0; 4];
        for ((weight, value), field) in weights.iter_mut().zip(fields).zip(Self::FIELD_NAMES) {
            let parsed = value
                .parse::<f64>()
                .map_err(|source| ParseAiParametersError::InvalidNumber {
                    field,
                    value: value.to_owned(),
                    source,
                })?;
            if !parsed.is_finite() {
                return Err(ParseAiParametersError::NotFinite {
                    field,
                    value: value.to_owned(),
                });
            }
            *weight = parsed;
        }
        Ok(Self::from_array(weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let params = AiParameters::default();
        assert_eq!(params.height, -0.510_066);
        assert_eq!(params.holes, -0.356_63);
        assert_eq!(params.complete_lines, 0.760_666);
        assert_eq!(params.bumpiness, -0.184_483);
    }

    #[test]
    fn test_parse_weights() {
        let params: AiParameters = "-1, -2.5,3,0".parse().unwrap();
        assert_eq!(params.as_array(), [-1.0, -2.5, 3.0, 0.0]);
    }

    #[test]
    fn test_parse_wrong_field_count() {
        assert_eq!(
            "1,2,3".parse::<AiParameters>(),
            Err(ParseAiParametersError::WrongFieldCount { found: 3 })
        );
        assert_eq!(
            "1,2,3,4,5".parse::<AiParameters>(),
            Err(ParseAiParametersError::WrongFieldCount { found: 5 })
        );
    }

    #[test]
    fn test_parse_invalid_number() {
        let err = "1,x,3,4".parse::<AiParameters>().unwrap_err();
        assert!(matches!(
            err,
            ParseAiParametersError::InvalidNumber { field: "holes", ref value, .. } if value == "x"
        ));
        assert_eq!(err.to_string(), "invalid holes weight \"x\"");
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        let err = "1,2,NaN,4".parse::<AiParameters>().unwrap_err();
        assert!(matches!(
            err,
            ParseAiParametersError::NotFinite {
                field: "completeLines",
                ..
            }
        ));
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = serde_json::to_value(AiParameters::DEFAULT).unwrap();
        assert_eq!(json["completeLines"], 0.760_666);
        assert_eq!(json["height"], -0.510_066);

        let parsed: AiParameters = serde_json::from_str(
            r#"{"height": -1.0, "holes": -2.0, "completeLines": 3.0, "bumpiness": -4.0}"#,
        )
        .unwrap();
        assert_eq!(parsed.as_array(), [-1.0, -2.0, 3.0, -4.0]);
    }
}
