use deunicode::deunicode;

/// Derives the URL identifier of a category from its name.
///
/// The name is transliterated to ASCII first (`"Crème Brûlée"` reads as
/// `"Creme Brulee"`). ASCII letters and digits are then kept (lowercased).
/// Whitespace, `-` and `_` act as separators and collapse into a single
/// hyphen. Anything else is dropped, so `"C++ & Rust"` becomes `"c-rust"`.
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_hyphen = true;
        }
    }

    slug
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
