/// Path+query of an inbound request with the leading slash and any
/// `http://`/`https://` prefix removed.
pub fn clean_link(raw_path: &str, raw_query: &str) -> String {
    let mut joined = String::with_capacity(raw_path.len() + raw_query.len() + 1);
    joined.push_str(raw_path);
    if !raw_query.is_empty() {
        joined.push('?');
        joined.push_str(raw_query);
    }

    let without_slash = joined.strip_prefix('/').unwrap_or(&joined);
    strip_scheme(without_slash).to_string()
}

fn strip_scheme(link: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if let Some(prefix) = link.get(..scheme.len())
            && prefix.eq_ignore_ascii_case(scheme)
        {
            return &link[scheme.len()..];
        }
    }
    link
}

/// Links that must never be forwarded: nothing left after cleaning, or the
/// `.env` probe scanners send.
pub fn is_disallowed(cleaned: &str) -> bool {
    cleaned.is_empty() || cleaned == ".env"
}

/// Splits on the first `?` only; the query keeps any further `?` verbatim.
pub fn split_query(cleaned: &str) -> (&str, Option<&str>) {
    match cleaned.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (cleaned, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_slash_once() {
        assert_eq!(clean_link("/xyz", ""), "xyz");
        assert_eq!(clean_link("//xyz", ""), "/xyz");
        assert_eq!(clean_link("xyz", ""), "xyz");
    }

    #[test]
    fn joins_query_only_when_present() {
        assert_eq!(clean_link("/watch", "v=abc123"), "watch?v=abc123");
        assert_eq!(clean_link("/watch", ""), "watch");
    }

    #[test]
    fn strips_scheme_after_slash() {
        assert_eq!(
            clean_link("/https://www.youtube.com/watch", "v=1"),
            "www.youtube.com/watch?v=1"
        );
        assert_eq!(clean_link("/http://youtu.be/abc", ""), "youtu.be/abc");
        assert_eq!(clean_link("/HTTPS://youtu.be/abc", ""), "youtu.be/abc");
    }

    #[test]
    fn strips_only_one_scheme() {
        assert_eq!(clean_link("/https://https://x", ""), "https://x");
    }

    #[test]
    fn scheme_only_becomes_empty() {
        let cleaned = clean_link("/https://", "");
        assert!(cleaned.is_empty());
        assert!(is_disallowed(&cleaned));
    }

    #[test]
    fn env_probe_is_disallowed() {
        assert!(is_disallowed(&clean_link("/.env", "")));
        assert!(!is_disallowed(&clean_link("/.env.local", "")));
        assert!(!is_disallowed(&clean_link("/.env", "x=1")));
    }

    #[test]
    fn short_input_with_multibyte_chars_is_kept() {
        assert_eq!(clean_link("/ä", ""), "ä");
    }

    #[test]
    fn splits_on_first_question_mark() {
        assert_eq!(split_query("watch?v=a?b=c"), ("watch", Some("v=a?b=c")));
        assert_eq!(split_query("watch?"), ("watch", Some("")));
        assert_eq!(split_query("watch"), ("watch", None));
    }
}
