//! Urgency tiers and the terminal triage verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How soon the user should seek care. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    HomeCare,
    DoctorVisit,
    UrgentCare,
    Emergency,
}

impl Urgency {
    /// Guidance used when a provider does not say when to seek care.
    pub fn default_when_to_seek(&self) -> &'static str {
        match self {
            Urgency::Emergency => "IMMEDIATELY",
            Urgency::UrgentCare => "Within 24 hours",
            Urgency::DoctorVisit => "Within a few days",
            Urgency::HomeCare => "Monitor symptoms",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Emergency => "emergency",
            Urgency::UrgentCare => "urgent_care",
            Urgency::DoctorVisit => "doctor_visit",
            Urgency::HomeCare => "home_care",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw terminal output from a step provider, before it becomes a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub urgency: Urgency,
    pub condition: String,
    pub description: String,
    pub recommendation: String,
    pub provider_type: String,
    pub possible_causes: Vec<String>,
    pub when_to_seek: Option<String>,
    pub confidence: Option<f64>,
    pub recommended_specialties: Vec<String>,
}

/// The terminal triage result of a session.
///
/// # Invariants
///
/// - `when_to_seek` is never blank
/// - `confidence`, when present, lies in `[0, 1]`
/// - `recommended_specialties` holds no duplicates and keeps first-seen order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    urgency: Urgency,
    condition: String,
    description: String,
    recommendation: String,
    provider_type: String,
    possible_causes: Vec<String>,
    when_to_seek: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    recommended_specialties: Vec<String>,
    symptoms: String,
}

impl Verdict {
    /// Builds a verdict from a provider assessment and the flattened symptoms text.
    pub fn from_assessment(assessment: Assessment, symptoms: impl Into<String>) -> Self {
        let when_to_seek = assessment
            .when_to_seek
            .filter(|w| !w.trim().is_empty())
            .unwrap_or_else(|| assessment.urgency.default_when_to_seek().to_string());

        let confidence = assessment
            .confidence
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0));

        let mut recommended_specialties: Vec<String> = Vec::new();
        for specialty in assessment.recommended_specialties {
            if !recommended_specialties.contains(&specialty) {
                recommended_specialties.push(specialty);
            }
        }

        Self {
            urgency: assessment.urgency,
            condition: assessment.condition,
            description: assessment.description,
            recommendation: assessment.recommendation,
            provider_type: assessment.provider_type,
            possible_causes: assessment.possible_causes,
            when_to_seek,
            confidence,
            recommended_specialties,
            symptoms: symptoms.into(),
        }
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    pub fn possible_causes(&self) -> &[String] {
        &self.possible_causes
    }

    pub fn when_to_seek(&self) -> &str {
        &self.when_to_seek
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn recommended_specialties(&self) -> &[String] {
        &self.recommended_specialties
    }

    /// The flattened transcript the verdict was derived from.
    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }
}
