/// Renders a raw label as a lowercase, hyphen-joined identifier.
///
/// Characters other than ASCII letters, digits, underscores, whitespace and
/// hyphens are dropped; runs of whitespace and hyphens collapse into a single
/// hyphen.
pub fn slugify(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let mut slug = String::with_capacity(cleaned.len());
    let mut pending_separator = false;

    for c in cleaned.trim().chars() {
        if c == '-' || c.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push(c);
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Advertisement"), "advertisement");
        assert_eq!(slugify("Front Page"), "front-page");
        assert_eq!(slugify("  Front   Page  "), "front-page");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Letter to the Editor!"), "letter-to-the-editor");
        assert_eq!(slugify("Q&A"), "qa");
        assert_eq!(slugify("Obituary|Article"), "obituaryarticle");
        assert_eq!(slugify("Stock Quote - Table"), "stock-quote-table");
    }

    #[test]
    fn test_slugify_keeps_underscores_and_digits() {
        assert_eq!(slugify("Section_2 Sports"), "section_2-sports");
    }

    #[test]
    fn test_slugify_drops_non_ascii_and_edge_hyphens() {
        assert_eq!(slugify("Café Review"), "caf-review");
        assert_eq!(slugify("--News--"), "news");
        assert_eq!(slugify("!!!"), "");
    }
}
