//! Free-text cleanup

/// HTML entities left behind by the upstream export, with their replacement
const REPLACEMENTS: [(&str, &str); 3] = [("&amp;", "&"), ("&lt;", "<"), ("&gt;", ">")];

/// Replace the HTML entities `&amp;`, `&lt;` and `&gt;` in `text`
///
/// Replacement passes repeat until the text stops changing, so doubly
/// escaped input (`&amp;lt;`) is fully decoded and the function is
/// idempotent. Every replacement shortens the text, which bounds the loop.
pub fn clean_string(text: &str) -> String {
    let mut current = text.to_string();
    while current.contains('&') {
        let next = REPLACEMENTS
            .iter()
            .fold(current.clone(), |acc, (from, to)| acc.replace(from, to));
        if next == current {
            break;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_ampersand() {
        assert_eq!(clean_string("A &amp; B"), "A & B");
    }

    #[test]
    fn test_replaces_angle_brackets() {
        assert_eq!(
            clean_string("&lt;i&gt;Pinus ponderosa&lt;/i&gt; Woodland"),
            "<i>Pinus ponderosa</i> Woodland"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(clean_string("Quercus alba Forest"), "Quercus alba Forest");
        assert_eq!(clean_string(""), "");
        assert_eq!(clean_string("AT&T"), "AT&T");
    }

    #[test]
    fn test_double_escaped_entities() {
        assert_eq!(clean_string("&amp;lt;em&amp;gt;"), "<em>");
        assert_eq!(clean_string("&amp;amp;"), "&");
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "A &amp; B",
            "&lt;b&gt;bold&lt;/b&gt;",
            "&amp;amp;lt;",
            "no entities",
            "dangling & ampersand; &gt",
        ] {
            let once = clean_string(input);
            assert_eq!(clean_string(&once), once, "input: {input}");
        }
    }
}
