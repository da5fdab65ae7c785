use crate::request::RedirectRequest;

pub const IOS_VIEWER_HEADER: &str = "cloudfront-is-ios-viewer";
pub const ANDROID_VIEWER_HEADER: &str = "cloudfront-is-android-viewer";
pub const DESKTOP_VIEWER_HEADER: &str = "cloudfront-is-desktop-viewer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Ios,
    Android,
    Desktop,
    Unknown,
}

impl DeviceClass {
    /// Viewer headers in priority order. The first one set to `"true"` wins.
    const VIEWER_HEADERS: [(&'static str, DeviceClass); 3] = [
        (IOS_VIEWER_HEADER, DeviceClass::Ios),
        (ANDROID_VIEWER_HEADER, DeviceClass::Android),
        (DESKTOP_VIEWER_HEADER, DeviceClass::Desktop),
    ];

    pub fn from_headers(request: &RedirectRequest) -> Self {
        Self::VIEWER_HEADERS
            .iter()
            .find(|(header, _)| request.header(header) == Some("true"))
            .map(|(_, class)| *class)
            .unwrap_or(Self::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Desktop => "desktop",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(flags: [bool; 3]) -> DeviceClass {
        let mut request = RedirectRequest::new("/x", "");
        for (set, header) in flags.into_iter().zip([
            IOS_VIEWER_HEADER,
            ANDROID_VIEWER_HEADER,
            DESKTOP_VIEWER_HEADER,
        ]) {
            request.insert_header(header, if set { "true" } else { "false" });
        }
        DeviceClass::from_headers(&request)
    }

    #[test]
    fn priority_is_ios_then_android_then_desktop() {
        for ios in [false, true] {
            for android in [false, true] {
                for desktop in [false, true] {
                    let expected = if ios {
                        DeviceClass::Ios
                    } else if android {
                        DeviceClass::Android
                    } else if desktop {
                        DeviceClass::Desktop
                    } else {
                        DeviceClass::Unknown
                    };
                    assert_eq!(classify([ios, android, desktop]), expected);
                }
            }
        }
    }

    #[test]
    fn absent_headers_are_unknown() {
        let request = RedirectRequest::new("/x", "");
        assert_eq!(DeviceClass::from_headers(&request), DeviceClass::Unknown);
    }

    #[test]
    fn only_literal_true_counts() {
        let request = RedirectRequest::new("/x", "")
            .with_header(IOS_VIEWER_HEADER, "TRUE")
            .with_header(ANDROID_VIEWER_HEADER, "1")
            .with_header(DESKTOP_VIEWER_HEADER, "true");
        assert_eq!(DeviceClass::from_headers(&request), DeviceClass::Desktop);
    }

    #[test]
    fn header_names_match_case_insensitively() {
        let request = RedirectRequest::new("/x", "").with_header("CloudFront-Is-Android-Viewer", "true");
        assert_eq!(DeviceClass::from_headers(&request), DeviceClass::Android);
        assert_eq!(DeviceClass::Android.as_str(), "android");
    }
}
