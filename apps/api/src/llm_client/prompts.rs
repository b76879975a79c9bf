// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Definition of the answer structure every sample answer and every piece of
/// feedback is measured against.
pub const STAR_METHOD: &str = "\
    Structure answers with the STAR method: \
    Situation (the context), Task (the responsibility or challenge), \
    Action (the specific steps the candidate took) and Result (the measurable outcome).";

/// Keyword guidance for generated content that is published on results pages.
pub const SEO_KEYWORD_INSTRUCTION: &str = "\
    Use the role's real skill and tool names naturally so the text is SEO-rich, \
    but never keyword-stuff or repeat the same phrase.";

/// Fills `{name}` slots in one left-to-right pass.
///
/// Substituted values are never rescanned, so user text that happens to contain
/// `{resume_text}` or `{answer}` stays literal. Unknown `{...}` sequences are kept.
pub fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            slots
                .iter()
                .find(|(slot, _)| *slot == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
