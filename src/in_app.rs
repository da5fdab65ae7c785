use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Embedded browsers that block or mangle `intent://` navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InAppBrowser {
    Facebook,
    Instagram,
    KakaoTalk,
    Line,
    WebView,
}

impl InAppBrowser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::KakaoTalk => "kakaotalk",
            Self::Line => "line",
            Self::WebView => "webview",
        }
    }
}

pub enum Matcher {
    Contains(&'static str),
    Pattern(&'static str),
}

/// Evaluated top to bottom; the first hit names the browser.
pub const MATCHERS: &[(InAppBrowser, Matcher)] = &[
    (InAppBrowser::Facebook, Matcher::Contains("FBAN")),
    (InAppBrowser::Facebook, Matcher::Contains("FBAV")),
    (InAppBrowser::Instagram, Matcher::Contains("Instagram")),
    (InAppBrowser::KakaoTalk, Matcher::Contains("KAKAOTALK")),
    (InAppBrowser::Line, Matcher::Contains("Line/")),
    (InAppBrowser::WebView, Matcher::Pattern(r"; wv\)")),
    // Android system WebView before the `wv` token existed.
    (
        InAppBrowser::WebView,
        Matcher::Pattern(r"Version/[\d.]+ Chrome/[\d.]+ Mobile Safari/"),
    ),
];

enum CompiledMatcher {
    Contains(&'static str),
    Pattern(Regex),
}

impl CompiledMatcher {
    fn is_match(&self, user_agent: &str) -> bool {
        match self {
            Self::Contains(needle) => user_agent.contains(needle),
            Self::Pattern(regex) => regex.is_match(user_agent),
        }
    }
}

static COMPILED: LazyLock<Vec<(InAppBrowser, CompiledMatcher)>> = LazyLock::new(|| {
    MATCHERS
        .iter()
        .filter_map(|(browser, matcher)| {
            let compiled = match matcher {
                Matcher::Contains(needle) => CompiledMatcher::Contains(*needle),
                Matcher::Pattern(pattern) => match Regex::new(pattern) {
                    Ok(regex) => CompiledMatcher::Pattern(regex),
                    Err(error) => {
                        warn!("Skipping invalid in-app browser pattern {pattern:?}: {error}");
                        return None;
                    }
                },
            };
            Some((*browser, compiled))
        })
        .collect()
});

pub fn detect(user_agent: &str) -> Option<InAppBrowser> {
    COMPILED
        .iter()
        .find(|(_, matcher)| matcher.is_match(user_agent))
        .map(|(browser, _)| *browser)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";

    #[test]
    fn every_pattern_compiles() {
        assert_eq!(COMPILED.len(), MATCHERS.len());
    }

    #[test]
    fn plain_chrome_is_not_in_app() {
        assert_eq!(detect(CHROME_ANDROID), None);
        assert_eq!(detect(""), None);
    }

    #[test]
    fn detects_social_apps() {
        let facebook = "Mozilla/5.0 (Linux; Android 14; SM-S918N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.6422.165 Mobile Safari/537.36 [FB_IAB/FB4A;FBAV/468.0.0.54.109;]";
        let instagram = "Mozilla/5.0 (Linux; Android 13; SM-G991N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.6367.82 Mobile Safari/537.36 Instagram 331.0.0.37.90 Android";
        let kakao = "Mozilla/5.0 (Linux; Android 14; SM-S911N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Mobile Safari/537.36 KAKAOTALK 10.7.5";
        let line = "Mozilla/5.0 (Linux; Android 12; Pixel 6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36 Line/14.2.0";

        assert_eq!(detect(facebook), Some(InAppBrowser::Facebook));
        assert_eq!(detect("FBAN/FB4A"), Some(InAppBrowser::Facebook));
        assert_eq!(detect(instagram), Some(InAppBrowser::Instagram));
        assert_eq!(detect(kakao), Some(InAppBrowser::KakaoTalk));
        assert_eq!(detect(line), Some(InAppBrowser::Line));
    }

    #[test]
    fn detects_webviews() {
        let modern = "Mozilla/5.0 (Linux; Android 10; K; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/126.0.0.0 Mobile Safari/537.36";
        let legacy = "Mozilla/5.0 (Linux; Android 4.4; Nexus 5 Build/KRT16M) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/30.0.0.0 Mobile Safari/537.36";
        assert_eq!(detect(modern), Some(InAppBrowser::WebView));
        assert_eq!(detect(legacy), Some(InAppBrowser::WebView));
    }

    #[test]
    fn earlier_matchers_win() {
        let both = "Mozilla/5.0 (Linux; Android 10; K; wv) Instagram 300.0";
        assert_eq!(detect(both), Some(InAppBrowser::Instagram));
    }

    #[test]
    fn substring_matchers_are_case_sensitive() {
        assert_eq!(detect("kakaotalk"), None);
        assert_eq!(detect("line/1.0"), None);
    }
}
