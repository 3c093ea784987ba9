//! Fixed instructions for embed text polishing.

/// System turn: the model must answer with a bare JSON object.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that improves Discord embed text. \
You respond ONLY with valid JSON objects containing the improved text fields.";

/// Build the user turn from `(json_key, label, text)` triples, in display order.
pub fn build_user_prompt(fields: &[(&str, &str, &str)]) -> String {
    let listing = fields
        .iter()
        .map(|(_, label, text)| format!("{label}: \"{text}\""))
        .collect::<Vec<_>>()
        .join("\n");
    let keys = fields
        .iter()
        .map(|(key, ..)| *key)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a Discord message editor. Improve the following embed fields by fixing grammar, \
making them more professional and neat, while keeping the original meaning and tone. \
Return ONLY a JSON object with the improved text for each field that was provided.\n\n\
{listing}\n\n\
Return the response as a JSON object with exactly these keys: {keys}\n\n\
Keep the improvements concise and professional. Fix any spelling or grammar errors. \
Make the text clearer and more polished."
    )
}
