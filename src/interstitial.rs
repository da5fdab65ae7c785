//! HTML page served to Android in-app browsers, where a direct `intent://`
//! redirect is unreliable.
//!
//! The page walks a fixed fallback ladder on timers: intent URI, then the
//! native app scheme, then the web URL in an external context, and finally the
//! web URL in place with a manual link revealed. Every timer always fires; a
//! page-level `appOpened` flag only gates the navigation each stage performs.
//! The flag is set on `visibilitychange` (hidden) and window `blur`, which is
//! a heuristic: a tab switch looks the same as the app taking over.

use maud::{DOCTYPE, PreEscaped, html};

use crate::error::Result;

pub const INTENT_DELAY_MS: u64 = 100;
pub const APP_SCHEME_DELAY_MS: u64 = 1_000;
pub const EXTERNAL_DELAY_MS: u64 = 2_000;
pub const FALLBACK_DELAY_MS: u64 = 3_000;

const STYLE: &str = r#"body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 48px 24px; text-align: center; color: #0f0f0f; }
#fallback { display: none; margin-top: 24px; }
#fallback a { display: inline-block; padding: 12px 20px; border-radius: 20px; background: #ff0000; color: #ffffff; text-decoration: none; }"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterstitialTargets {
    pub intent_uri: String,
    pub app_uri: String,
    pub web_url: String,
}

pub fn render(targets: &InterstitialTargets) -> Result<String> {
    let script = fallback_script(targets)?;

    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="robots" content="noindex";
                title { "Opening YouTube" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                p { "Opening YouTube..." }
                div id="fallback" {
                    a href=(targets.web_url) rel="noopener" { "Open in browser" }
                }
                script { (PreEscaped(script)) }
            }
        }
    };

    Ok(page.into_string())
}

fn fallback_script(targets: &InterstitialTargets) -> Result<String> {
    let intent_js = js_string(&targets.intent_uri)?;
    let app_js = js_string(&targets.app_uri)?;
    let web_js = js_string(&targets.web_url)?;

    Ok(format!(
        r#"
(function () {{
  var intentUri = {intent_js};
  var appUri = {app_js};
  var webUrl = {web_js};
  var appOpened = false;

  function markOpened() {{
    appOpened = true;
  }}
  document.addEventListener("visibilitychange", function () {{
    if (document.hidden) {{
      markOpened();
    }}
  }});
  window.addEventListener("blur", markOpened);

  history.pushState(null, "", location.href);
  window.addEventListener("popstate", function () {{
    history.pushState(null, "", location.href);
  }});

  setTimeout(function () {{
    location.href = intentUri;
  }}, {INTENT_DELAY_MS});
  setTimeout(function () {{
    if (!appOpened) {{
      location.href = appUri;
    }}
  }}, {APP_SCHEME_DELAY_MS});
  setTimeout(function () {{
    if (!appOpened) {{
      window.open(webUrl, "_blank");
    }}
  }}, {EXTERNAL_DELAY_MS});
  setTimeout(function () {{
    if (!appOpened) {{
      document.getElementById("fallback").style.display = "block";
      location.replace(webUrl);
    }}
  }}, {FALLBACK_DELAY_MS});
}})();
"#
    ))
}

/// JSON string literal that is also safe inside a `<script>` element.
fn js_string(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
