use std::collections::HashSet;

use ammonia::Builder;

/// Strips HTML markup from user-supplied plain text.
///
/// Surveys are plain text, so no tag is allowed; the text inside harmless
/// tags is kept while `<script>`/`<style>` bodies are dropped. Input without
/// a `<` cannot contain markup and is returned untouched.
///
/// The result is plain text again: the entities ammonia writes while
/// serializing are decoded, so `1 < 2 & true` survives unchanged.
pub fn strip_markup(input: &str) -> String {
    if !input.contains('<') {
        return input.to_string();
    }
    let cleaned = Builder::default()
        .tags(HashSet::new())
        .clean(input)
        .to_string();
    decode_entities(&cleaned)
}

/// Reverses the escaping applied by ammonia's serializer.
///
/// `&amp;` goes last so an escaped entity such as `&amp;lt;` decodes once.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
