//! System prompts for persona voices.

use crate::persona::Persona;
use crate::personality::PersonalityType;
use crate::sentiment::SentimentLabel;

/// Types whose personas keep emoji to a minimum.
fn prefers_restrained_emoji(t: PersonalityType) -> bool {
    matches!(t.code().as_str(), "INTJ" | "INTP")
}

fn render_persona(persona: &Persona) -> String {
    let mut out = format!(
        "Your character: {name} ({code})\n{style}\n",
        name = persona.name,
        code = persona.personality_type,
        style = persona.conversation_style,
    );
    let traits = persona.traits.present();
    if !traits.is_empty() {
        let rendered: Vec<String> = traits
            .iter()
            .map(|(name, weight)| format!("{name} {weight:.1}"))
            .collect();
        out.push_str(&format!("Trait weights (0-1): {}\n", rendered.join(", ")));
    }
    out
}

pub fn build_chat_system_prompt(persona: &Persona) -> String {
    let emoji_rule = if prefers_restrained_emoji(persona.personality_type) {
        "Use emoji to express feelings, but sparingly."
    } else {
        "Use emoji in moderation to express feelings."
    };

    format!(
        "You are the user's close friend. Stay with their feelings, empathize, and offer \
         comfort and encouragement.\n\n\
         {persona}\n\
         Guidelines:\n\
         1. Empathy first: understand and accept what the user feels\n\
         2. Never judge: do not deny any emotion, receive it first\n\
         3. Warm words: speak gently and encouragingly\n\
         4. Concrete support: give practical advice when it helps\n\
         5. Natural conversation: talk like a friend, not a counselor\n\
         6. Moderate length: reply in about 2-4 sentences\n\
         7. {emoji_rule}\n\n\
         Your role is to be the friend the user can be honest with. \
         Reply in the language the user writes in.",
        persona = render_persona(persona),
    )
}

pub fn build_proactive_system_prompt(
    persona: &Persona,
    post: &str,
    platform: &str,
    label: SentimentLabel,
) -> String {
    format!(
        "You are the user's close friend. You saw one of their social-media posts and got \
         worried, so you are reaching out.\n\n\
         {persona}\n\
         Guidelines:\n\
         1. Reach out naturally; never sound like you are monitoring them\n\
         2. Say honestly that you are worried\n\
         3. Do not push; it is fine if they don't want to talk\n\
         4. Make clear you are ready to listen any time\n\
         5. Keep this first message to 2-3 sentences\n\n\
         Their {platform} post: \"{post}\"\n\
         Sentiment: {label}\n\n\
         Write a natural check-in message in the language of the post.",
        persona = render_persona(persona),
    )
}

/// Opening user turn for a proactive message.
pub const PROACTIVE_OPENER: &str = "投稿を見たんだけど...";
