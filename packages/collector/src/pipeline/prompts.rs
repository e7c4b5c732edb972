//! LLM prompts for the extraction pipeline.
//!
//! Prompt construction is pure: identical inputs always produce identical
//! text, and nothing here touches the network or storage.

use crate::types::record::Record;

/// Prompt for query-driven extraction.
pub const EXTRACT_PROMPT: &str = r#"You are a precise data extraction assistant.

User Query: "{query}"

Context Text (from webpage):
"{text}"

Instructions:
1. Find the data in the Context Text that answers the User Query.
2. Prefer data that appears LATER in the text; later content is more recent.
3. Output shape:
   - For list, table, or extraction requests (e.g. "extract names", "get all emails", "find contacts", "in table form"), return a JSON ARRAY of objects, one object per item.
   - For summary or explanation requests (e.g. "summarize", "what is the problem", "explain"), return a JSON ARRAY containing exactly ONE object.
     Merge every relevant section (problem, solution, context, extras) into a SINGLE STRING value inside that object, separating sections with newlines (\n).
     Do NOT split a summary across several objects.
4. Use consistent keys across objects, named after the data found.
5. Clean values (collapse extra whitespace).
6. Return at most {max_items} items.
7. Return ONLY the JSON array. No markdown code fences, no explanation.

Example Output (List):
[{"Feature": "Save"}, {"Feature": "Export"}]

Example Output (Summary):
[{"Problem Statement": "The problem is X.\n\nDesired Solution:\nThe solution should be Y."}]"#;

/// Prompt for auditing extracted records against the source.
pub const VERIFY_PROMPT: &str = r#"You are a strict data verification auditor.

User Query: "{query}"

Original Source Text:
"{text}"

Extracted Data (to verify):
{records}

Instructions:
1. Check that EACH item in the Extracted Data is actually supported by the Original Source Text.
2. REMOVE items that are hallucinated or not supported by the text.
3. CORRECT values that are slightly wrong (typos, truncated names, near-miss numbers).
4. KEEP items that are correct.
5. Make sure the data still answers the User Query.
6. Output shape:
   - If the input is a list, return the verified list.
   - If the input is a single object holding a long text block (a summary), verify the facts inside the text but KEEP IT AS ONE TEXT BLOCK in a single object. Do not split it into a list.
7. Never return more than {max_items} items.
8. Return ONLY the cleaned JSON array. No markdown code fences, no explanation.

Example Output (List):
[{"Feature": "Right-click save"}, {"Feature": "Auto-capture"}]

Example Output (Summary):
[{"Summary": "The verified problem is that users..."}]"#;

/// Prompt for pulling one structured object out of a single captured text.
pub const STRUCTURE_PROMPT: &str = r#"Analyze this text and extract the most important structured information. Return ONLY valid JSON.

Text: "{text}"

Instructions:
1. Identify the content type first.
2. For contacts or people: name, company, email, phone, location, title, website.
3. For articles or blog posts: title, author, main_topic, key_points (array), summary, source, date.
4. For meeting notes: date, attendees, topics, action_items, decisions.
5. For anything else: extract the most relevant fields.

Return format:
{"content_type": "contact|article|meeting|research|note|other", "field1": "value1", "field2": "value2"}

Rules:
- Include only fields that are present in the text.
- Omit missing fields entirely.
- Return ONLY the JSON object. No markdown code fences, no explanation.
- Be concise."#;

/// Format the extraction prompt, asking for at most `max_items` records.
pub fn format_extract_prompt(source_text: &str, query: &str, max_items: usize) -> String {
    let max_items = max_items.to_string();
    render(
        EXTRACT_PROMPT,
        &[("query", query), ("text", source_text), ("max_items", &max_items)],
    )
}

/// Format the verification prompt with the records to audit.
pub fn format_verify_prompt(
    source_text: &str,
    records: &[Record],
    query: &str,
    max_items: usize,
) -> String {
    let records_json =
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string());
    let max_items = max_items.to_string();
    render(
        VERIFY_PROMPT,
        &[
            ("query", query),
            ("text", source_text),
            ("records", &records_json),
            ("max_items", &max_items),
        ],
    )
}

/// Format the single-object structuring prompt.
pub fn format_structure_prompt(text: &str) -> String {
    render(STRUCTURE_PROMPT, &[("text", text)])
}

/// Substitute `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so braces inside page text or
/// queries come through verbatim.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match substituted {
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
