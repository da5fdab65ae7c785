use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

pub const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Normalized inbound request handed to the resolver by the HTTP host.
///
/// Header names are lower-cased on insert, so lookups are case-insensitive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRequest {
    #[serde(default)]
    pub raw_path: String,
    #[serde(default)]
    pub raw_query_string: String,
    #[serde(default, deserialize_with = "lowercase_headers")]
    headers: HashMap<String, String>,
}

impl RedirectRequest {
    pub fn new(raw_path: impl Into<String>, raw_query_string: impl Into<String>) -> Self {
        Self {
            raw_path: raw_path.into(),
            raw_query_string: raw_query_string.into(),
            headers: HashMap::new(),
        }
    }

    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.raw_path.is_empty() || self.raw_path == "/"
    }
}

fn lowercase_headers<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, String> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect())
}

/// Structured response consumed by the HTTP host.
///
/// Header names are lower-case static strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RedirectResponse {
    pub fn redirect(location: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("location", location.into());
        Self {
            status_code: 302,
            headers,
            body: None,
        }
        .no_cache()
    }

    pub fn html(body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type", HTML_CONTENT_TYPE.to_string());
        Self {
            status_code: 200,
            headers,
            body: Some(body),
        }
        .no_cache()
    }

    fn no_cache(mut self) -> Self {
        self.headers
            .insert("cache-control", CACHE_CONTROL_VALUE.to_string());
        self.headers.insert("pragma", "no-cache".to_string());
        self.headers.insert("expires", "0".to_string());
        self
    }
}

#[cfg(test)]
impl RedirectRequest {
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }
}

#[cfg(test)]
impl RedirectResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get("location").map(String::as_str)
    }
}
