//! Stripping of markup-unsafe characters from owner-authored text.
//!
//! Everything an owner types (name, tagline, project descriptions) is
//! untrusted and eventually lands in rendered markup — page title, header,
//! attribute values. Rather than entity-escaping (which is not idempotent:
//! `&` becomes `&amp;` becomes `&amp;amp;`), unsafe characters are removed
//! outright. Removal is idempotent and total, and ordinary prose passes
//! through unchanged.

/// Characters stripped from untrusted text before it reaches markup.
const STRIPPED: &[char] = &['<', '>', '"', '\'', '`'];

/// Strips markup-unsafe characters from `input`.
///
/// Removes `<`, `>`, `"`, `'`, backtick, and C0 control characters other
/// than `\n` and `\t`. The result is safe to interpolate into element text
/// and quoted attributes. Idempotent: `sanitize(sanitize(x)) == sanitize(x)`
/// for every input.
#[must_use]
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !STRIPPED.contains(c) && (!c.is_control() || *c == '\n' || *c == '\t'))
        .collect()
}
