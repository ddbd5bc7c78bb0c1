//! Diagnosis model and response normalization.
//!
//! The prediction endpoint answers with loosely typed JSON. [`Diagnosis::from_json`]
//! applies one normalization policy so the rest of the workflow only sees
//! well-formed values:
//!
//! - `disease` (alias `prediction`) and `confidence` are required
//! - `confidence` must be a finite percentage in `[0, 100]`
//! - absent `severity` / `treatment` stay absent / empty, no placeholders
//! - a healthy verdict drops any severity and treatment the server sent

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, PredictionResult};

/// Disease severity reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
}

impl Severity {
    /// Case-insensitive parse. Unknown non-empty labels count as [`Severity::Low`].
    ///
    /// Returns `None` for blank input.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Some(match label.to_ascii_lowercase().as_str() {
            "high" => Severity::High,
            "moderate" => Severity::Moderate,
            "none" => Severity::None,
            _ => Severity::Low,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::None => write!(f, "NONE"),
            Severity::Low => write!(f, "LOW"),
            Severity::Moderate => write!(f, "MODERATE"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

/// Structured prediction for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub disease_label: String,
    /// Percentage in `[0, 100]`.
    pub confidence_percent: f64,
    pub severity: Option<Severity>,
    pub description: String,
    pub treatment_steps: Vec<String>,
    pub is_healthy: bool,
}

impl Diagnosis {
    /// Parse and normalize a response body.
    pub fn from_json(body: &str) -> PredictionResult<Self> {
        let payload: PredictionPayload = serde_json::from_str(body)?;
        Self::try_from(payload)
    }

    /// Confidence as a fraction in `[0, 1]`.
    pub fn confidence_fraction(&self) -> f64 {
        self.confidence_percent / 100.0
    }

    /// Severity worth showing: present, not `None`, and not healthy.
    pub fn reported_severity(&self) -> Option<Severity> {
        match self.severity {
            Some(Severity::None) | None => None,
            Some(_) if self.is_healthy => None,
            Some(severity) => Some(severity),
        }
    }
}

/// Wire format of the `/predict` response. Extra fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionPayload {
    #[serde(default)]
    pub disease: Option<String>,
    /// Older servers name the label `prediction`.
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub treatment: Option<Vec<String>>,
    #[serde(default)]
    pub is_healthy: Option<bool>,
}

impl TryFrom<PredictionPayload> for Diagnosis {
    type Error = PredictionError;

    fn try_from(payload: PredictionPayload) -> Result<Self, Self::Error> {
        let disease_label = payload
            .disease
            .or(payload.prediction)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| PredictionError::Malformed("missing field `disease`".into()))?;

        let confidence_percent = payload
            .confidence
            .ok_or_else(|| PredictionError::Malformed("missing field `confidence`".into()))?;
        if !confidence_percent.is_finite() || !(0.0..=100.0).contains(&confidence_percent) {
            return Err(PredictionError::Malformed(format!(
                "confidence {confidence_percent} outside [0, 100]"
            )));
        }

        let is_healthy = payload.is_healthy.unwrap_or(false);

        let (severity, treatment_steps) = if is_healthy {
            (None, Vec::new())
        } else {
            let severity = payload.severity.as_deref().and_then(Severity::parse);
            let steps = payload
                .treatment
                .unwrap_or_default()
                .into_iter()
                .map(|step| step.trim().to_string())
                .filter(|step| !step.is_empty())
                .collect();
            (severity, steps)
        };

        Ok(Diagnosis {
            disease_label,
            confidence_percent,
            severity,
            description: payload.description.unwrap_or_default(),
            treatment_steps,
            is_healthy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_response() {
        let json = r#"{
            "disease": "Blight",
            "confidence": 87,
            "severity": "high",
            "description": "Early blight on tomato.",
            "treatment": ["Step1", "Step2"],
            "is_healthy": false,
            "model_version": "v3"
        }"#;

        let diagnosis = Diagnosis::from_json(json).unwrap();
        assert_eq!(diagnosis.disease_label, "Blight");
        assert_eq!(diagnosis.confidence_percent, 87.0);
        assert_eq!(diagnosis.severity, Some(Severity::High));
        assert_eq!(diagnosis.treatment_steps, vec!["Step1", "Step2"]);
        assert!(!diagnosis.is_healthy);
        assert_eq!(diagnosis.reported_severity(), Some(Severity::High));
    }

    #[test]
    fn test_healthy_response() {
        let diagnosis =
            Diagnosis::from_json(r#"{"disease":"None","confidence":99,"is_healthy":true}"#).unwrap();
        assert!(diagnosis.is_healthy);
        assert!(diagnosis.treatment_steps.is_empty());
        assert_eq!(diagnosis.severity, None);
        assert_eq!(diagnosis.description, "");
    }

    #[test]
    fn test_healthy_drops_severity_and_treatment() {
        let json = r#"{"disease":"Healthy","confidence":95,"severity":"Low",
                       "treatment":["Water"],"is_healthy":true}"#;
        let diagnosis = Diagnosis::from_json(json).unwrap();
        assert_eq!(diagnosis.severity, None);
        assert!(diagnosis.treatment_steps.is_empty());
    }

    #[test]
    fn test_optional_fields_absent_or_null() {
        let diagnosis = Diagnosis::from_json(
            r#"{"disease":"Rust","confidence":42.5,"severity":null,"treatment":null}"#,
        )
        .unwrap();
        assert_eq!(diagnosis.severity, None);
        assert!(diagnosis.treatment_steps.is_empty());
        assert!(!diagnosis.is_healthy);
        assert_eq!(diagnosis.reported_severity(), None);
    }

    #[test]
    fn test_prediction_alias() {
        let diagnosis = Diagnosis::from_json(r#"{"prediction":"Leaf Mold","confidence":61}"#).unwrap();
        assert_eq!(diagnosis.disease_label, "Leaf Mold");
    }

    #[test]
    fn test_disease_and_prediction_together() {
        let diagnosis =
            Diagnosis::from_json(r#"{"disease":"Blight","prediction":"Late Blight","confidence":87}"#)
                .unwrap();
        assert_eq!(diagnosis.disease_label, "Blight");
        assert_eq!(diagnosis.confidence_percent, 87.0);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("Moderate"), Some(Severity::Moderate));
        assert_eq!(Severity::parse("none"), Some(Severity::None));
        assert_eq!(Severity::parse("mild"), Some(Severity::Low));
        assert_eq!(Severity::parse("  "), None);
        assert_eq!(Severity::High.to_string(), "HIGH");
    }

    #[test]
    fn test_malformed_bodies() {
        for body in [
            "not json",
            "[]",
            r#"{"error":"Prediction failed"}"#,
            r#"{"disease":"Blight"}"#,
            r#"{"disease":"","confidence":50}"#,
            r#"{"disease":"Blight","confidence":"high"}"#,
            r#"{"disease":"Blight","confidence":140}"#,
            r#"{"disease":"Blight","confidence":-1}"#,
            r#"{"disease":"Blight","confidence":50,"treatment":"spray"}"#,
        ] {
            let err = Diagnosis::from_json(body).unwrap_err();
            assert!(matches!(err, PredictionError::Malformed(_)), "{body} -> {err:?}");
        }
    }
}
