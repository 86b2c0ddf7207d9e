//! Output-framing cleanup
//!
//! Models frequently wrap structured output in markdown code fences even
//! when told not to. Callers strip framing before any JSON parse.

/// Strip surrounding ``` code-fence markers from model output
///
/// Removes an opening fence line (with or without a language tag) and a
/// closing fence line. Text without fences is returned trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    // Drop the opening marker line (```json or bare ```)
    lines.remove(0);
    if let Some(last) = lines.last()
        && last.trim() == "```"
    {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}
