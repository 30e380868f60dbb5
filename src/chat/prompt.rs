const FRAMING: &str =
    "You are a helpful car manual chatbot. Answer the car owner's question about their car.";
const GROUNDING_LABEL: &str =
    " Use the following grounding data as context. This came from the relevant vehicle owner's manual: ";

/// Fills the fixed car-manual template. The whole context is inlined, however long.
pub fn build_augmented_prompt(user_prompt: &str, grounding_context: &str) -> String {
    let mut prompt = String::with_capacity(
        FRAMING.len() + GROUNDING_LABEL.len() + user_prompt.len() + grounding_context.len() + 16,
    );
    prompt.push_str(FRAMING);
    prompt.push_str(" Human prompt: ");
    prompt.push_str(user_prompt);
    prompt.push_str(",\n");
    prompt.push_str(GROUNDING_LABEL);
    prompt.push_str(grounding_context);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_stable() {
        assert_eq!(
            build_augmented_prompt("How do I check tire pressure?", "Check monthly."),
            "You are a helpful car manual chatbot. Answer the car owner's question about their car. \
             Human prompt: How do I check tire pressure?,\n \
             Use the following grounding data as context. This came from the relevant vehicle \
             owner's manual: Check monthly."
        );
    }

    #[test]
    fn empty_context_leaves_grounding_section_empty() {
        let prompt = build_augmented_prompt("q", "");
        assert!(prompt.ends_with("owner's manual: "));
    }

    #[test]
    fn long_context_is_not_truncated() {
        let context = "x".repeat(200_000);
        let prompt = build_augmented_prompt("q", &context);
        assert!(prompt.ends_with(&context));
    }
}
