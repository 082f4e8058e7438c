//! Prompt templates sent to the text-generation service

pub fn verse_text_prompt(reference: &str) -> String {
    format!("What is the text of the Bible verse {reference}?")
}

pub fn explanation_prompt(verse_text: &str) -> String {
    format!("Explain the following Bible verse in simple terms:\n\n{verse_text}")
}

/// Asks for a bare `True`/`False`; nothing downstream enforces that shape.
pub fn truth_prompt(verse_text: &str, user_explanation: &str) -> String {
    format!(
        "Based on the following Bible verse:\n\n{verse_text}\n\n\
         Is the following explanation true or false?\n\n\
         '{user_explanation}'\n\n\
         Respond with only 'True' or 'False'."
    )
}

pub fn plausibility_prompt(reference: &str) -> String {
    format!(
        "Is the following text a plausible Bible verse reference? '{reference}'. \
         Respond with only 'Yes' or 'No'."
    )
}
