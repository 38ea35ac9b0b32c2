//! Translation prompt construction.
//!
//! The prompt is a fixed template: it instructs the model to return the
//! direct Korean translation and nothing else, so the response body can be
//! displayed verbatim without post-processing.

/// Build the English→Korean translation prompt for `source_text`.
pub fn translation_prompt(source_text: &str) -> String {
    format!(
        "Translate the following English text to Korean. Provide only the direct Korean \
         translation without any additional explanations, introductory phrases, or labels \
         like \"Korean:\".\n\nEnglish: \"{source_text}\""
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_quotes_the_source_text() {
        let prompt = translation_prompt("Hello, world");
        assert!(prompt.ends_with("English: \"Hello, world\""));
    }

    #[test]
    fn prompt_forbids_commentary() {
        let prompt = translation_prompt("anything");
        assert!(prompt.contains("only the direct Korean translation"));
        assert!(prompt.contains("without any additional explanations"));
    }
}
