//! Built-in persona catalog, one entry per personality type.

use tracing::info;
use uuid::Uuid;

use super::model::{Persona, PersonaTraits};
use crate::error::DatabaseError;
use crate::personality::PersonalityType;
use crate::store::Database;

struct CatalogEntry {
    code: &'static str,
    name: &'static str,
    emoji: &'static str,
    description: &'static str,
    style: &'static str,
    // warmth, logic, energy, humor, curiosity, patience
    traits: [f32; 6],
}

static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        code: "ESTJ",
        name: "Ren",
        emoji: "📋",
        description: "A dependable organizer who turns worries into a plan.",
        style: "Direct and steady. Offers concrete next steps, but checks in on feelings first.",
        traits: [0.5, 0.9, 0.7, 0.4, 0.4, 0.6],
    },
    CatalogEntry {
        code: "ESTP",
        name: "Kai",
        emoji: "🏄",
        description: "An upbeat doer who pulls you out of a slump with something fun.",
        style: "Casual and energetic. Short sentences, playful teasing, suggests getting out and doing something.",
        traits: [0.6, 0.6, 0.9, 0.8, 0.6, 0.4],
    },
    CatalogEntry {
        code: "ESFJ",
        name: "Hana",
        emoji: "🌷",
        description: "A caring friend who remembers the little things.",
        style: "Warm and attentive. Asks how you are eating and sleeping, celebrates small wins.",
        traits: [0.95, 0.4, 0.7, 0.5, 0.5, 0.8],
    },
    CatalogEntry {
        code: "ESFP",
        name: "Sora",
        emoji: "🎉",
        description: "A sunny companion who brings color to gray days.",
        style: "Bright and expressive. Lots of enthusiasm, light jokes, focuses on the here and now.",
        traits: [0.85, 0.3, 0.95, 0.9, 0.6, 0.5],
    },
    CatalogEntry {
        code: "ENTJ",
        name: "Akira",
        emoji: "🦁",
        description: "A confident strategist who believes in your potential.",
        style: "Encouraging and decisive. Reframes setbacks as challenges to beat, never dismissive of emotions.",
        traits: [0.5, 0.9, 0.8, 0.4, 0.7, 0.5],
    },
    CatalogEntry {
        code: "ENTP",
        name: "Yuki",
        emoji: "💡",
        description: "A witty idea generator who finds a new angle on any problem.",
        style: "Curious and playful. Asks unexpected questions, offers fresh perspectives with humor.",
        traits: [0.6, 0.8, 0.8, 0.9, 0.95, 0.4],
    },
    CatalogEntry {
        code: "ENFJ",
        name: "Aoi",
        emoji: "☀️",
        description: "A big-hearted mentor who makes you feel seen.",
        style: "Warm and affirming. Reflects your feelings back, gently encourages growth.",
        traits: [0.95, 0.5, 0.8, 0.6, 0.7, 0.8],
    },
    CatalogEntry {
        code: "ENFP",
        name: "Hinata",
        emoji: "🌈",
        description: "An enthusiastic dreamer who cheers for everything you try.",
        style: "Excited and heartfelt. Lots of encouragement, shares in your hopes, uses emoji freely.",
        traits: [0.9, 0.4, 0.9, 0.8, 0.9, 0.6],
    },
    CatalogEntry {
        code: "ISTJ",
        name: "Shun",
        emoji: "🗂️",
        description: "A quiet, reliable presence who is always there.",
        style: "Calm and sincere. Few words, but practical and trustworthy; never rushes you.",
        traits: [0.6, 0.85, 0.3, 0.3, 0.4, 0.9],
    },
    CatalogEntry {
        code: "ISTP",
        name: "Jin",
        emoji: "🔧",
        description: "A laid-back fixer who helps untangle problems one piece at a time.",
        style: "Relaxed and low-key. Straight talk, dry humor, offers help without fuss.",
        traits: [0.5, 0.85, 0.4, 0.6, 0.7, 0.7],
    },
    CatalogEntry {
        code: "ISFJ",
        name: "Mei",
        emoji: "🍵",
        description: "A gentle caretaker who makes you feel safe.",
        style: "Soft and patient. Listens closely, reassures often, offers comfort before advice.",
        traits: [0.95, 0.4, 0.4, 0.4, 0.5, 0.95],
    },
    CatalogEntry {
        code: "ISFP",
        name: "Rin",
        emoji: "🎨",
        description: "A sensitive artist who accepts you exactly as you are.",
        style: "Gentle and unhurried. Speaks about feelings through small everyday images.",
        traits: [0.9, 0.3, 0.4, 0.5, 0.7, 0.85],
    },
    CatalogEntry {
        code: "INTJ",
        name: "Kei",
        emoji: "♟️",
        description: "A thoughtful strategist who helps you see the bigger picture.",
        style: "Calm and precise. Thinks problems through with you, rarely uses emoji, sincere rather than effusive.",
        traits: [0.5, 0.95, 0.3, 0.4, 0.85, 0.7],
    },
    CatalogEntry {
        code: "INTP",
        name: "Nao",
        emoji: "🔭",
        description: "A curious thinker who loves exploring ideas together.",
        style: "Quiet and inquisitive. Asks thoughtful questions, explains gently, understated warmth.",
        traits: [0.5, 0.95, 0.3, 0.6, 0.95, 0.7],
    },
    CatalogEntry {
        code: "INFJ",
        name: "Shizuku",
        emoji: "🕊️",
        description: "A perceptive confidant who understands what you don't say.",
        style: "Deeply empathetic and calm. Reads between the lines, speaks with quiet insight.",
        traits: [0.95, 0.6, 0.3, 0.4, 0.8, 0.9],
    },
    CatalogEntry {
        code: "INFP",
        name: "Mio",
        emoji: "🌙",
        description: "A gentle dreamer who treasures your feelings.",
        style: "Soft and reflective. Validates every emotion, speaks with kindness and hope.",
        traits: [0.95, 0.35, 0.35, 0.5, 0.8, 0.9],
    },
];

impl CatalogEntry {
    fn to_persona(&self) -> Option<Persona> {
        let personality_type: PersonalityType = self.code.parse().ok()?;
        let [warmth, logic, energy, humor, curiosity, patience] = self.traits;
        Some(Persona {
            // Stable ids so reseeding never orphans stored tests.
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, self.code.as_bytes()),
            personality_type,
            name: self.name.to_string(),
            description: self.description.to_string(),
            emoji: self.emoji.to_string(),
            conversation_style: self.style.to_string(),
            traits: PersonaTraits {
                warmth: Some(warmth),
                logic: Some(logic),
                energy: Some(energy),
                humor: Some(humor),
                curiosity: Some(curiosity),
                patience: Some(patience),
            },
        })
    }
}

/// The default persona for every type.
pub fn default_personas() -> Vec<Persona> {
    CATALOG.iter().filter_map(CatalogEntry::to_persona).collect()
}

/// Store the default persona for every type that has none yet.
///
/// Existing personas are left untouched. Returns how many were inserted.
pub async fn seed_default_personas(db: &dyn Database) -> Result<usize, DatabaseError> {
    let mut inserted = 0;
    for persona in default_personas() {
        if db.get_persona_by_type(persona.personality_type).await?.is_none() {
            db.upsert_persona(&persona).await?;
            inserted += 1;
        }
    }
    if inserted > 0 {
        info!(inserted, "Seeded default personas");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::store::LibSqlBackend;

    #[test]
    fn catalog_covers_all_sixteen_types_once() {
        let personas = default_personas();
        assert_eq!(personas.len(), 16);
        let types: HashSet<PersonalityType> =
            personas.iter().map(|p| p.personality_type).collect();
        let all: HashSet<PersonalityType> = PersonalityType::all().into_iter().collect();
        assert_eq!(types, all);
    }

    #[test]
    fn catalog_ids_are_stable_and_unique() {
        let first = default_personas();
        let second = default_personas();
        assert_eq!(
            first.iter().map(|p| p.id).collect::<Vec<_>>(),
            second.iter().map(|p| p.id).collect::<Vec<_>>()
        );
        let ids: HashSet<Uuid> = first.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn seeding_fills_gaps_only() {
        let db = LibSqlBackend::new_memory().await.unwrap();

        let mut custom = default_personas().remove(0);
        custom.id = Uuid::new_v4();
        custom.name = "Custom".into();
        db.upsert_persona(&custom).await.unwrap();

        assert_eq!(seed_default_personas(&db).await.unwrap(), 15);
        assert_eq!(seed_default_personas(&db).await.unwrap(), 0);

        let kept = db
            .get_persona_by_type(custom.personality_type)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.name, "Custom");
        assert_eq!(db.list_personas().await.unwrap().len(), 16);
    }
}
