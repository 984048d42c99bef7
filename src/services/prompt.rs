//! Role-prefixed single-string prompt shared by AI21, Cohere and Meta

use crate::messages::Message;

/// Render messages as `"\n<role>: <text>"` lines followed by an `"\nAI: "` cue.
///
/// Image messages keep their role prefix but contribute no text.
#[must_use]
pub fn generic_prompt(messages: &[Message]) -> String {
    let mut prompt = String::new();

    for message in messages {
        prompt.push('\n');
        prompt.push_str(message.role.as_str());
        prompt.push_str(": ");
        if message.is_text() {
            prompt.push_str(&message.content);
        }
    }

    if !messages.is_empty() {
        prompt.push_str("\nAI: ");
    }

    prompt
}
