//! The canonical persona schema.
//!
//! One definition shared by the aggregation stage (which embeds the JSON
//! schema in its synthesis prompt and validates the response against it) and
//! the rendering stage. Validation is strict: unknown fields are rejected and
//! required fields must be present. Non-conforming synthesis output is a
//! stage failure, never coerced.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::error::{PersonaError, Result};

/// A specific, evidence-based insight about the user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PersonaPoint {
    /// The insight itself, stated as one sentence.
    pub point: String,
    /// Quotes or summaries of source content that support the point,
    /// each including a citation.
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// Inferred demographic profile. Fields the synthesis cannot infer are
/// omitted or left as "Unknown".
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Demographics {
    /// Estimated age range (e.g., 25-30).
    #[serde(default)]
    pub age: Option<String>,
    /// Inferred gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Inferred country, state, or city.
    #[serde(default)]
    pub location: Option<String>,
    /// Inferred profession or field of study.
    #[serde(default)]
    pub occupation: Option<String>,
    /// Inferred educational level (e.g., College, PhD).
    #[serde(default)]
    pub education: Option<String>,
}

/// Inferred psychographic profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Psychographics {
    /// Estimated Myers-Briggs type (e.g., INTP).
    #[serde(default)]
    pub mbti_type: Option<String>,
    /// Primary archetype (e.g., Sage, Explorer, Rebel).
    #[serde(default)]
    pub archetype: Option<String>,
    /// Technology adoption tier (e.g., Innovator, Early Adopter, Laggard).
    #[serde(default)]
    pub tech_adoption_tier: Option<String>,
}

/// The final structured behavioral and demographic profile of one user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Persona {
    /// The user's username on the source platform.
    pub username: String,
    /// A 2-3 sentence narrative biography summarizing the user's core
    /// identity.
    pub summary_bio: String,
    pub demographics: Demographics,
    pub psychographics: Psychographics,
    /// Key interests, hobbies, and passions.
    pub interests_and_hobbies: Vec<PersonaPoint>,
    /// Core personality characteristics (e.g., Analytical, Empathetic).
    pub personality_traits: Vec<PersonaPoint>,
    /// How the user communicates (e.g., Formal, Sarcastic, Uses emojis).
    pub communication_style: Vec<PersonaPoint>,
    /// What the user holds as important (e.g., Honesty, Community).
    pub values_and_beliefs: Vec<PersonaPoint>,
    /// What drives the user's behavior and comments.
    pub goals_and_motivations: Vec<PersonaPoint>,
    /// Topics or situations that frustrate the user.
    pub pain_points_and_frustrations: Vec<PersonaPoint>,
}

impl Persona {
    /// The JSON schema the synthesis output must conform to, rendered as
    /// pretty-printed JSON for embedding in the aggregation prompt.
    pub fn schema_json() -> Result<String> {
        let schema = schema_for!(Persona);
        serde_json::to_string_pretty(&schema)
            .map_err(|e| PersonaError::Serialization(e.to_string()))
    }

    /// Strictly validate a synthesis response against the schema.
    ///
    /// Any missing required field, wrong type, or unknown field is a
    /// `SchemaValidation` error; no coercion is attempted.
    pub fn from_value(value: serde_json::Value) -> Result<Persona> {
        serde_json::from_value(value).map_err(|e| PersonaError::SchemaValidation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_persona_value() -> serde_json::Value {
        json!({
            "username": "tester",
            "summary_bio": "A methodical hobbyist.",
            "demographics": {"age": "25-30"},
            "psychographics": {"archetype": "Sage"},
            "interests_and_hobbies": [
                {"point": "Restores vintage synthesizers", "evidence": ["'Just restored...'"]}
            ],
            "personality_traits": [],
            "communication_style": [],
            "values_and_beliefs": [],
            "goals_and_motivations": [],
            "pain_points_and_frustrations": []
        })
    }

    #[test]
    fn test_valid_persona_parses() {
        let persona = Persona::from_value(minimal_persona_value()).unwrap();
        assert_eq!(persona.username, "tester");
        assert_eq!(persona.demographics.age.as_deref(), Some("25-30"));
        assert!(persona.demographics.gender.is_none());
        assert_eq!(persona.interests_and_hobbies.len(), 1);
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let mut value = minimal_persona_value();
        value.as_object_mut().unwrap().remove("summary_bio");
        let err = Persona::from_value(value).unwrap_err();
        assert!(matches!(err, PersonaError::SchemaValidation(_)));
    }

    #[test]
    fn test_missing_category_list_rejected() {
        let mut value = minimal_persona_value();
        value.as_object_mut().unwrap().remove("goals_and_motivations");
        assert!(Persona::from_value(value).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut value = minimal_persona_value();
        value
            .as_object_mut()
            .unwrap()
            .insert("zodiac_sign".to_string(), json!("Aries"));
        let err = Persona::from_value(value).unwrap_err();
        assert!(matches!(err, PersonaError::SchemaValidation(_)));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut value = minimal_persona_value();
        value
            .as_object_mut()
            .unwrap()
            .insert("interests_and_hobbies".to_string(), json!("guitars"));
        assert!(Persona::from_value(value).is_err());
    }

    #[test]
    fn test_point_without_evidence_defaults_empty() {
        let mut value = minimal_persona_value();
        value["personality_traits"] = json!([{"point": "Analytical"}]);
        let persona = Persona::from_value(value).unwrap();
        assert!(persona.personality_traits[0].evidence.is_empty());
    }

    #[test]
    fn test_schema_names_required_fields() {
        let schema = Persona::schema_json().unwrap();
        assert!(schema.contains("summary_bio"));
        assert!(schema.contains("pain_points_and_frustrations"));
        assert!(schema.contains("tech_adoption_tier"));
    }

    #[test]
    fn test_round_trip() {
        let persona = Persona::from_value(minimal_persona_value()).unwrap();
        let value = serde_json::to_value(&persona).unwrap();
        let again = Persona::from_value(value).unwrap();
        assert_eq!(again.username, persona.username);
    }
}
