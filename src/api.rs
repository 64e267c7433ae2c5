use crate::config::ClientConfig;
use crate::error::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Characters left unescaped in query keys and values.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'$')
    .remove(b',');

/// DBpedia's resource key encoding (see dbpedia.org/uri-encoding).
const DBPEDIA_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@')
    .remove(b'_')
    .remove(b'~');

/// Error codes the API uses for a page or id that does not exist.
const NOT_FOUND_CODES: &[&str] = &["nosuchpageid", "missingtitle", "missing", "nosuchrevid"];

pub fn escape_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ESCAPE).to_string()
}

/// Title as it appears in a wiki URL path: spaces become underscores and only
/// the characters that would break the path are escaped.
pub fn escape_title(title: &str) -> String {
    let mut escaped = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            ' ' => escaped.push('_'),
            '?' | '#' | '%' | '"' | '+' | '=' => {
                escaped.push_str(&format!("%{:02X}", c as u32));
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn dbpedia_key(title: &str) -> String {
    let mut underscored = String::with_capacity(title.len());
    for c in title.chars() {
        let c = if c == ' ' { '_' } else { c };
        if c == '_' && underscored.ends_with('_') {
            continue;
        }
        underscored.push(c);
    }
    utf8_percent_encode(&underscored, DBPEDIA_ESCAPE).to_string()
}

/// Canonical query string: keys sorted, every key and value escaped.
pub fn build_query(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", escape_query(key), escape_query(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Maps an API error envelope onto typed failures; passes other payloads through.
pub fn check_envelope(data: Value) -> Result<Value> {
    if data.is_null() {
        return Err(Error::UpstreamMalformed("Empty response".to_string()));
    }

    if let Some(error) = data.get("error") {
        let code = error
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let info = error
            .get("info")
            .and_then(Value::as_str)
            .unwrap_or(code)
            .to_string();

        if NOT_FOUND_CODES.contains(&code) {
            return Err(Error::NotFound(info));
        }
        return Err(Error::upstream(code, info));
    }

    Ok(data)
}

/// Blocking client for a MediaWiki `api.php` endpoint.
pub struct MediaWikiClient {
    http: Client,
    endpoint: String,
}

impl MediaWikiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn url_for(&self, action: &str, params: &[(&str, String)]) -> String {
        let mut all: BTreeMap<&str, String> = params
            .iter()
            .map(|(key, value)| (*key, value.clone()))
            .collect();
        all.insert("action", action.to_string());
        all.insert("format", "json".to_string());

        format!("{}?{}", self.endpoint, build_query(&all))
    }

    pub fn call(&self, action: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = self.url_for(action, params);
        debug!(url = %url, "MediaWiki API call");

        let response = self.http.get(&url).send()?.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("application/json") {
            return Err(Error::UpstreamMalformed(format!(
                "Response from MediaWiki API was not of type application/json (got '{}')",
                content_type
            )));
        }

        let body = response.text()?;
        let data: Value = serde_json::from_str(&body)?;
        check_envelope(data)
    }
}
