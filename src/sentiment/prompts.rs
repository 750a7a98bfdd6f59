//! Prompt text for the sentiment classifier.

pub fn build_sentiment_system_prompt() -> String {
    "You are an expert in emotional analysis. Read a social-media post and judge the \
     emotional state of the person who wrote it.\n\n\
     Respond with ONLY a JSON object:\n\
     {\"score\": <number from -1.0 to 1.0>, \"label\": \"positive\" | \"neutral\" | \"negative\" | \"concerning\", \
     \"triggerAlert\": true or false, \"reason\": \"why an alert is warranted (when triggerAlert is true)\", \
     \"emotions\": [\"detected emotions\"]}\n\n\
     Labels:\n\
     - \"concerning\": serious distress, hints of self-harm or suicide, deep loneliness, hopelessness\n\
     - \"negative\": feeling down, frustration, fatigue, mild stress\n\
     - \"neutral\": everyday updates, sharing facts\n\
     - \"positive\": joy, gratitude, accomplishment, looking forward to something\n\n\
     triggerAlert:\n\
     - always true for \"concerning\"\n\
     - true for \"negative\" only when there are signs of serious distress\n\
     - false otherwise\n\n\
     Look beyond surface wording: consider context and what is implied. \
     Posts are often written in Japanese."
        .to_string()
}

pub fn build_sentiment_user_prompt(text: &str, platform: &str) -> String {
    format!("Platform: {platform}\nPost: \"{text}\"\n\nAnalyze this post.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_lists_labels_and_fields() {
        let prompt = build_sentiment_system_prompt();
        for needle in ["positive", "neutral", "negative", "concerning", "triggerAlert", "emotions"] {
            assert!(prompt.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn user_prompt_includes_platform_and_post() {
        let prompt = build_sentiment_user_prompt("最近疲れた", "twitter");
        assert!(prompt.contains("Platform: twitter"));
        assert!(prompt.contains("最近疲れた"));
    }

    #[test]
    fn user_prompt_keeps_the_whole_post() {
        let post = format!("{}もう消えたい", "あ".repeat(5000));
        let prompt = build_sentiment_user_prompt(&post, "instagram");
        assert!(prompt.contains(&post));
        assert!(prompt.contains("もう消えたい"));
    }
}
