//! The ordered keyword rule table.
//!
//! Order is significant: rules are evaluated top to bottom and the first
//! match wins. Emergency keywords come first so nothing can outrank them.

use crate::domain::triage::{Assessment, Urgency};

/// Keyword predicate evaluated against lower-cased symptom text.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// At least one keyword is present.
    AnyOf(&'static [&'static str]),
    /// None of the keywords is present.
    NoneOf(&'static [&'static str]),
    /// Every nested trigger matches.
    All(&'static [Trigger]),
    /// At least one nested trigger matches.
    Either(&'static [Trigger]),
}

impl Trigger {
    /// Evaluates the trigger. `text` must already be lower-cased.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::AnyOf(keywords) => keywords.iter().any(|k| text.contains(k)),
            Trigger::NoneOf(keywords) => !keywords.iter().any(|k| text.contains(k)),
            Trigger::All(triggers) => triggers.iter().all(|t| t.matches(text)),
            Trigger::Either(triggers) => triggers.iter().any(|t| t.matches(text)),
        }
    }
}

/// A classifier rule: a trigger plus the literal verdict it produces.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub urgency: Urgency,
    pub provider_type: &'static str,
    pub condition: &'static str,
    pub description: &'static str,
    pub recommendation: &'static str,
    pub possible_causes: &'static [&'static str],
    pub confidence: f64,
    pub recommended_specialties: &'static [&'static str],
}

impl Rule {
    /// Materializes the rule's literal outputs.
    ///
    /// `when_to_seek` is left unset so the urgency default applies.
    pub fn assessment(&self) -> Assessment {
        Assessment {
            urgency: self.urgency,
            condition: self.condition.to_string(),
            description: self.description.to_string(),
            recommendation: self.recommendation.to_string(),
            provider_type: self.provider_type.to_string(),
            possible_causes: self.possible_causes.iter().map(|c| c.to_string()).collect(),
            when_to_seek: None,
            confidence: Some(self.confidence),
            recommended_specialties: self
                .recommended_specialties
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "emergency",
        trigger: Trigger::AnyOf(&[
            "chest pain",
            "difficulty breathing",
            "shortness of breath",
            "severe bleeding",
            "unconscious",
            "stroke",
            "heart attack",
        ]),
        urgency: Urgency::Emergency,
        provider_type: "Emergency Medicine",
        condition: "Potential Medical Emergency",
        description: "Your symptoms may indicate a serious condition that needs immediate medical attention.",
        recommendation: "Call emergency services or go to the nearest emergency room now.",
        possible_causes: &[
            "Cardiac event",
            "Respiratory distress",
            "Stroke",
            "Severe trauma",
        ],
        confidence: 0.95,
        recommended_specialties: &["Emergency Medicine", "Cardiology"],
    },
    Rule {
        name: "respiratory",
        trigger: Trigger::All(&[
            Trigger::AnyOf(&["cough", "fever"]),
            Trigger::AnyOf(&["days", "week"]),
        ]),
        urgency: Urgency::DoctorVisit,
        provider_type: "Internal Medicine",
        condition: "Respiratory Infection",
        description: "A cough or fever that has lasted for days may point to a respiratory infection that should be examined.",
        recommendation: "Schedule a visit with your primary care physician in the next few days.",
        possible_causes: &["Viral infection", "Bronchitis", "Influenza", "Pneumonia"],
        confidence: 0.75,
        recommended_specialties: &["Internal Medicine", "Pulmonology"],
    },
    Rule {
        name: "skin",
        trigger: Trigger::AnyOf(&["rash", "skin"]),
        urgency: Urgency::DoctorVisit,
        provider_type: "Dermatology",
        condition: "Skin Condition",
        description: "Rashes and other skin changes are best assessed by a skin specialist.",
        recommendation: "Book an appointment with a dermatologist.",
        possible_causes: &[
            "Allergic reaction",
            "Eczema",
            "Contact dermatitis",
            "Skin infection",
        ],
        confidence: 0.8,
        recommended_specialties: &["Dermatology"],
    },
    Rule {
        name: "cardiac",
        trigger: Trigger::AnyOf(&["chest", "heart", "palpitations"]),
        urgency: Urgency::UrgentCare,
        provider_type: "Cardiology",
        condition: "Possible Cardiac Concern",
        description: "Chest discomfort or an irregular heartbeat should be checked promptly.",
        recommendation: "Visit an urgent care clinic or contact a cardiologist within 24 hours.",
        possible_causes: &["Arrhythmia", "Hypertension", "Anxiety", "Muscle strain"],
        confidence: 0.8,
        recommended_specialties: &["Cardiology", "Internal Medicine"],
    },
    Rule {
        name: "mental_health",
        trigger: Trigger::AnyOf(&["anxiety", "depression", "sleeping", "stress"]),
        urgency: Urgency::DoctorVisit,
        provider_type: "Psychiatry",
        condition: "Mental Health Concern",
        description: "Ongoing anxiety, low mood, stress or sleep problems benefit from professional support.",
        recommendation: "Talk to a mental health professional. If you have thoughts of self-harm, seek help immediately.",
        possible_causes: &[
            "Chronic stress",
            "Anxiety disorder",
            "Depression",
            "Sleep disorder",
        ],
        confidence: 0.7,
        recommended_specialties: &["Psychiatry", "Psychology"],
    },
    Rule {
        name: "musculoskeletal",
        trigger: Trigger::AnyOf(&["back pain", "joint", "muscle"]),
        urgency: Urgency::DoctorVisit,
        provider_type: "Orthopedics",
        condition: "Musculoskeletal Issue",
        description: "Back, joint or muscle pain can come from strain, injury or inflammation.",
        recommendation: "See an orthopedic specialist; rest and gentle movement may help meanwhile.",
        possible_causes: &["Muscle strain", "Arthritis", "Injury", "Poor posture"],
        confidence: 0.75,
        recommended_specialties: &["Orthopedics", "Physical Therapy"],
    },
    Rule {
        name: "digestive",
        trigger: Trigger::AnyOf(&["stomach", "nausea", "abdominal", "digestive"]),
        urgency: Urgency::DoctorVisit,
        provider_type: "Gastroenterology",
        condition: "Digestive Issue",
        description: "Stomach pain, nausea and other digestive complaints have many possible causes worth examining.",
        recommendation: "Schedule a visit with a gastroenterologist and keep a food diary until then.",
        possible_causes: &[
            "Gastritis",
            "Food intolerance",
            "Gastrointestinal infection",
            "Irritable bowel syndrome",
        ],
        confidence: 0.7,
        recommended_specialties: &["Gastroenterology"],
    },
    Rule {
        name: "minor",
        trigger: Trigger::Either(&[
            Trigger::AnyOf(&["mild", "runny nose", "minor cold"]),
            Trigger::All(&[Trigger::AnyOf(&["headache"]), Trigger::NoneOf(&["severe"])]),
        ]),
        urgency: Urgency::HomeCare,
        provider_type: "Self-Care",
        condition: "Minor Condition",
        description: "Your symptoms look mild and can usually be managed at home.",
        recommendation: "Rest, stay hydrated and use over-the-counter remedies. See a doctor if symptoms get worse.",
        possible_causes: &["Common cold", "Tension headache", "Minor viral infection"],
        confidence: 0.85,
        recommended_specialties: &["Family Medicine"],
    },
];

/// Produced when no rule in [`RULES`] matches.
pub const FALLBACK: Rule = Rule {
    name: "fallback",
    trigger: Trigger::AnyOf(&[]),
    urgency: Urgency::DoctorVisit,
    provider_type: "Family Medicine",
    condition: "General Health Concern",
    description: "Your symptoms need a professional evaluation to determine the cause.",
    recommendation: "Schedule an appointment with your family doctor.",
    possible_causes: &["Various causes"],
    confidence: 0.65,
    recommended_specialties: &["Family Medicine", "Internal Medicine"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_of_matches_substrings() {
        assert!(Trigger::AnyOf(&["rash"]).matches("itchy rashes on arm"));
        assert!(!Trigger::AnyOf(&["rash"]).matches("itchy arm"));
    }

    #[test]
    fn empty_any_of_never_matches() {
        assert!(!Trigger::AnyOf(&[]).matches("anything"));
    }

    #[test]
    fn none_of_requires_absence() {
        assert!(Trigger::NoneOf(&["severe"]).matches("dull headache"));
        assert!(!Trigger::NoneOf(&["severe"]).matches("severe headache"));
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "emergency",
                "respiratory",
                "skin",
                "cardiac",
                "mental_health",
                "musculoskeletal",
                "digestive",
                "minor",
            ]
        );
    }

    #[test]
    fn confidences_are_in_range_with_emergency_highest() {
        for rule in RULES.iter().chain(std::iter::once(&FALLBACK)) {
            assert!((0.65..=0.95).contains(&rule.confidence), "{}", rule.name);
            assert!(rule.confidence <= RULES[0].confidence);
        }
    }

    #[test]
    fn assessment_copies_literals() {
        let assessment = RULES[2].assessment();
        assert_eq!(assessment.provider_type, "Dermatology");
        assert_eq!(assessment.confidence, Some(0.8));
        assert!(assessment.when_to_seek.is_none());
        assert_eq!(assessment.recommended_specialties, vec!["Dermatology"]);
    }
}
