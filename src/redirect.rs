use tracing::{debug, info};
use url::Url;

use crate::{
    device::DeviceClass,
    error::Result,
    in_app,
    interstitial::{self, InterstitialTargets},
    link::{clean_link, is_disallowed, split_query},
    request::{RedirectRequest, RedirectResponse},
};

pub const WEB_HOME: &str = "https://www.youtube.com/";
pub const APP_SCHEME: &str = "youtube://";
pub const ANDROID_PACKAGE: &str = "com.google.android.youtube";
pub const INTENT_WEB_HOST: &str = "www.youtube.com";
pub const FALLBACK_PARAM: &str = "S.browser_fallback_url";
pub const USER_AGENT_HEADER: &str = "user-agent";

const YOUTUBE_DOMAINS: [&str; 2] = ["youtube.com", "youtu.be"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    AppScheme(String),
    Intent(String),
    Web(String),
    Interstitial(InterstitialTargets),
}

impl RedirectTarget {
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::AppScheme(uri) | Self::Intent(uri) | Self::Web(uri) => Some(uri),
            Self::Interstitial(_) => None,
        }
    }
}

pub fn resolve(request: &RedirectRequest) -> Result<RedirectResponse> {
    debug!(
        "Received request path={:?} query={:?}",
        request.raw_path, request.raw_query_string
    );

    if request.is_root() {
        return Ok(RedirectResponse::redirect(WEB_HOME));
    }

    let cleaned = clean_link(&request.raw_path, &request.raw_query_string);
    if is_disallowed(&cleaned) {
        info!("Rejected link {:?}, sending to web home", cleaned);
        return Ok(RedirectResponse::redirect(WEB_HOME));
    }

    let device = DeviceClass::from_headers(request);
    info!("Device type: {}", device.as_str());

    match synthesize(&cleaned, device, request.header(USER_AGENT_HEADER)) {
        RedirectTarget::Interstitial(targets) => {
            info!("Serving interstitial page for {}", targets.web_url);
            Ok(RedirectResponse::html(interstitial::render(&targets)?))
        }
        target => {
            let location = target.location().unwrap_or(WEB_HOME);
            info!("Redirect location: {location}");
            Ok(RedirectResponse::redirect(location))
        }
    }
}

pub fn synthesize(cleaned: &str, device: DeviceClass, user_agent: Option<&str>) -> RedirectTarget {
    match device {
        DeviceClass::Ios => RedirectTarget::AppScheme(app_uri(cleaned)),
        DeviceClass::Android => {
            let web_target = android_web_target(cleaned);
            let intent_uri = intent_uri(&web_target);

            match user_agent.and_then(in_app::detect) {
                Some(browser) => {
                    debug!("In-app browser detected: {}", browser.as_str());
                    RedirectTarget::Interstitial(InterstitialTargets {
                        intent_uri,
                        app_uri: app_uri(cleaned),
                        web_url: format!("https://{web_target}"),
                    })
                }
                None => RedirectTarget::Intent(intent_uri),
            }
        }
        DeviceClass::Desktop | DeviceClass::Unknown => RedirectTarget::Web(desktop_url(cleaned)),
    }
}

fn app_uri(cleaned: &str) -> String {
    format!("{APP_SCHEME}{cleaned}")
}

/// Host segment of a cleaned link when it names a YouTube domain.
/// Only the first path segment counts, so a YouTube name later in the path or
/// in the query never makes a foreign host pass through.
fn youtube_host(path: &str) -> Option<&str> {
    let host = path.split('/').next().unwrap_or_default();
    let lower = host.to_ascii_lowercase();
    YOUTUBE_DOMAINS
        .iter()
        .any(|domain| lower == *domain || lower.ends_with(&format!(".{domain}")))
        .then_some(host)
}

fn is_short_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("youtu.be") || host.eq_ignore_ascii_case("www.youtu.be")
}

/// Web location (no scheme) the Android intent should open.
///
/// `youtu.be/<id>` becomes `watch?v=<id>`; the app does not resolve bare
/// short links through an intent.
fn android_web_target(cleaned: &str) -> String {
    let (path, query) = split_query(cleaned);

    let target = match youtube_host(path) {
        Some(host) if is_short_host(host) => {
            let id = path[host.len()..]
                .trim_start_matches('/')
                .split('/')
                .next()
                .unwrap_or_default();
            if id.is_empty() {
                format!("{INTENT_WEB_HOST}/")
            } else {
                let mut target = format!("{INTENT_WEB_HOST}/watch?v={id}");
                if let Some(query) = query.filter(|query| !query.is_empty()) {
                    target.push('&');
                    target.push_str(query);
                }
                target
            }
        }
        Some(_) => cleaned.to_string(),
        None => format!("{INTENT_WEB_HOST}/{cleaned}"),
    };
    // `#` would open a second fragment ahead of `#Intent;`.
    let target = target.replace('#', "%23");

    if is_valid_web_url(&format!("https://{target}")) {
        target
    } else {
        format!("{INTENT_WEB_HOST}/")
    }
}

fn intent_uri(web_target: &str) -> String {
    let fallback = format!("https://{web_target}");
    format!(
        "intent://{web_target}#Intent;scheme=https;package={ANDROID_PACKAGE};{FALLBACK_PARAM}={};end",
        urlencoding::encode(&fallback)
    )
}

/// Plain web URL. Links that do not name a YouTube host are treated as paths
/// under the web home, so the redirector never forwards to foreign hosts.
fn desktop_url(cleaned: &str) -> String {
    let (path, _) = split_query(cleaned);
    let candidate = if youtube_host(path).is_some() {
        format!("https://{cleaned}")
    } else {
        format!("{WEB_HOME}{cleaned}")
    };

    if is_valid_web_url(&candidate) {
        candidate
    } else {
        WEB_HOME.to_string()
    }
}

fn is_valid_web_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(parsed) => parsed.host_str().is_some(),
        Err(error) => {
            debug!("Discarding unparseable target {:?}: {error}", candidate);
            false
        }
    }
}
