//! Sentence-sampling summarizer.

/// Pick between three and five representative sentences, evenly spaced.
pub fn summarize(text: &str) -> Vec<String> {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        return Vec::new();
    }

    let sentences = split_sentences(&clean);
    if sentences.is_empty() {
        return vec![clean];
    }

    let max_bullets = sentences.len().div_ceil(3).clamp(3, 5);
    let step = (sentences.len() / max_bullets).max(1);
    sentences
        .into_iter()
        .step_by(step)
        .take(max_bullets)
        .collect()
}

/// Split after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(clean: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = clean.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().is_some_and(|next| next.is_whitespace());
        if boundary {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }
    push_trimmed(&mut sentences, &current);
    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, sentence: &str) {
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_bullets() {
        assert!(summarize("  \n\t ").is_empty());
    }

    #[test]
    fn short_text_keeps_every_sentence() {
        let bullets = summarize("One. Two!  Three?");
        assert_eq!(bullets, vec!["One.", "Two!", "Three?"]);
    }

    #[test]
    fn text_without_terminators_is_one_bullet() {
        assert_eq!(summarize("just a thought"), vec!["just a thought"]);
    }

    #[test]
    fn long_text_samples_evenly() {
        let text = (1..=12)
            .map(|i| format!("Sentence {i}."))
            .collect::<Vec<_>>()
            .join(" ");
        // 12 sentences -> 4 bullets, step 3.
        assert_eq!(
            summarize(&text),
            vec!["Sentence 1.", "Sentence 4.", "Sentence 7.", "Sentence 10."]
        );
    }

    #[test]
    fn caps_at_five_bullets() {
        let text = (1..=30)
            .map(|i| format!("S{i}."))
            .collect::<Vec<_>>()
            .join(" ");
        let bullets = summarize(&text);
        assert_eq!(bullets.len(), 5);
        assert_eq!(bullets[0], "S1.");
        assert_eq!(bullets[1], "S7.");
    }

    #[test]
    fn decimals_do_not_split() {
        assert_eq!(summarize("Pi is 3.14 roughly."), vec!["Pi is 3.14 roughly."]);
    }
}
