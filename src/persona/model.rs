//! Persona ("friend AI") records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::personality::PersonalityType;

/// Trait weights (0.0-1.0) that shape how a persona talks.
///
/// Every field is optional; unknown weights are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaTraits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmth: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humor: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curiosity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patience: Option<f32>,
}

impl PersonaTraits {
    /// Named weights that are present, for prompt rendering.
    pub fn present(&self) -> Vec<(&'static str, f32)> {
        [
            ("warmth", self.warmth),
            ("logic", self.logic),
            ("energy", self.energy),
            ("humor", self.humor),
            ("curiosity", self.curiosity),
            ("patience", self.patience),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v.clamp(0.0, 1.0))))
        .collect()
    }
}

/// A character profile bound to exactly one personality type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: Uuid,
    #[serde(rename = "mbtiType")]
    pub personality_type: PersonalityType,
    pub name: String,
    pub description: String,
    pub emoji: String,
    /// Tone guidance fed into every persona prompt.
    pub conversation_style: String,
    #[serde(rename = "personalityTraits")]
    pub traits: PersonaTraits,
}

/// Compact persona reference embedded in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaBadge {
    pub name: String,
    pub emoji: String,
}

impl From<&Persona> for PersonaBadge {
    fn from(p: &Persona) -> Self {
        Self {
            name: p.name.clone(),
            emoji: p.emoji.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_skip_missing_fields() {
        let traits = PersonaTraits {
            warmth: Some(0.9),
            logic: None,
            humor: Some(1.4),
            ..Default::default()
        };
        let json = serde_json::to_value(&traits).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 2);
        assert_eq!(traits.present(), vec![("warmth", 0.9), ("humor", 1.0)]);
    }

    #[test]
    fn traits_ignore_unknown_keys_on_read() {
        let traits: PersonaTraits =
            serde_json::from_str(r#"{"warmth": 0.5, "sparkle": 0.9}"#).unwrap();
        assert_eq!(traits.warmth, Some(0.5));
        assert!(traits.energy.is_none());
    }

    #[test]
    fn persona_serializes_for_api() {
        let persona = Persona {
            id: Uuid::nil(),
            personality_type: "INFP".parse().unwrap(),
            name: "Mio".into(),
            description: "A gentle dreamer".into(),
            emoji: "🌙".into(),
            conversation_style: "Soft and reflective".into(),
            traits: PersonaTraits::default(),
        };
        let json = serde_json::to_value(&persona).unwrap();
        assert_eq!(json["mbtiType"], "INFP");
        assert_eq!(json["conversationStyle"], "Soft and reflective");
        assert!(json["personalityTraits"].is_object());
    }
}
