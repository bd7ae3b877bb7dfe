//! Canned-reply focus helper.
//!
//! Replies are picked by the first keyword rule that matches; nothing here
//! touches session state.

use once_cell::sync::Lazy;
use regex::Regex;

struct Rule {
    pattern: Regex,
    reply: &'static str,
}

fn rule(pattern: &str, reply: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(&format!("(?i){pattern}")).expect("static chat pattern"),
        reply,
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(
            "break|rest",
            "Remember to log it after your tree grows. Until then, breathe and stay on track.",
        ),
        rule(
            "motivat|struggl",
            "Small wins count. Try committing to the next five minutes and momentum will follow.",
        ),
        rule(
            "plan|next",
            "Jot the idea in your notebook so it is safe, then return to the task at hand.",
        ),
        rule(
            "thanks|thank you",
            "Happy to help. I will be here if you need a focused nudge again.",
        ),
        rule(
            "time|timer",
            "Your timer keeps running here. Check the session status to see the remaining minutes.",
        ),
        rule(
            "music|spotify",
            "Keep playback in the background and skip the new tabs; the tree is still growing.",
        ),
        rule(
            "weather",
            "Update the ZIP code in the weather widget to see the latest conditions without leaving Blyx.",
        ),
    ]
});

const EMPTY_REPLY: &str = "Could you share a specific question? I will keep it brief.";
const FALLBACK_REPLY: &str =
    "Let us keep it crisp: what is the next action you can take toward finishing this focus block?";

pub fn reply(message: &str) -> &'static str {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return EMPTY_REPLY;
    }
    RULES
        .iter()
        .find(|rule| rule.pattern.is_match(trimmed))
        .map(|rule| rule.reply)
        .unwrap_or(FALLBACK_REPLY)
}
