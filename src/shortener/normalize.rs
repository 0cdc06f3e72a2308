/// Canonicalizes a raw destination URL into its stored form.
///
/// Input with an explicit scheme (`://`) or an existing protocol-relative
/// prefix (`//`) passes through untouched, so `http://x` and `https://x`
/// stay distinct. Bare host/path input is stored protocol-relative
/// (`example.com` becomes `//example.com`), which makes schemeless
/// submissions of the same destination dedupe against each other.
///
/// Empty input (after trimming) normalizes to the empty string; callers
/// must reject it before storage.
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if raw.contains("://") || raw.starts_with("//") {
        return raw.to_string();
    }

    format!("//{raw}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize_url("  example.com  "), "//example.com");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("   \t "), "");
    }

    #[test]
    fn explicit_scheme_passes_through() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com/a"), "https://example.com/a");
        assert_eq!(normalize_url("ftp://files.example.com"), "ftp://files.example.com");
    }

    #[test]
    fn protocol_relative_passes_through() {
        assert_eq!(normalize_url("//example.com/page"), "//example.com/page");
    }

    #[test]
    fn bare_host_becomes_protocol_relative() {
        assert_eq!(normalize_url("example.com/page"), "//example.com/page");
    }

    #[test]
    fn idempotent_for_all_shapes() {
        for raw in ["example.com", "//example.com", "https://example.com", " x.io/a "] {
            let once = normalize_url(raw);
            assert_eq!(normalize_url(&once), once);
        }
    }
}
