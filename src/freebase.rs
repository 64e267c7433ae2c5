use crate::api::escape_query;
use crate::config::{ClientConfig, FREEBASE_RDF_BASE};
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const STATUS_OK: &str = "/api/status/ok";

/// Key namespace holding English Wikipedia page ids.
const WIKIPEDIA_KEY_NAMESPACE: &str = "/wikipedia/en_id";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FreebaseTopic {
    pub id: Option<String>,
    pub name: Option<String>,
    pub mid: String,
    pub guid: Option<String>,
    #[serde(default)]
    pub key: Option<TopicKey>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopicKey {
    pub namespace: Option<String>,
    pub value: Option<String>,
}

impl FreebaseTopic {
    /// `/m/0abc` becomes `http://rdf.freebase.com/ns/m.0abc`.
    pub fn rdf_uri(&self) -> String {
        let path = self.mid.trim_start_matches('/').replace('/', ".");
        format!("{}{}", FREEBASE_RDF_BASE, path)
    }

    /// Wikipedia page id recorded against the topic, if any.
    pub fn page_id(&self) -> Option<u64> {
        self.key.as_ref()?.value.as_deref()?.parse().ok()
    }
}

/// Resolves a Wikipedia page id to a Freebase topic.
pub trait FreebaseLookup {
    fn lookup_page_id(&self, page_id: u64) -> Result<FreebaseTopic>;
}

/// Checks an MQL read envelope and returns its `result`.
pub fn check_mql_envelope(mut data: Value) -> Result<Value> {
    if let Some(error) = data.get("error") {
        let code = error
            .get("code")
            .map(|c| match c {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "unknown".to_string());
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Freebase query failed")
            .to_string();
        return Err(Error::upstream(code, message));
    }

    if let Some(code) = data.get("code").and_then(Value::as_str) {
        if code != STATUS_OK {
            return Err(Error::upstream(code, "Freebase query failed"));
        }
    }

    match data.get_mut("result").map(Value::take) {
        Some(result) if !result.is_null() => Ok(result),
        _ => Err(Error::NotFound("Freebase query returned no results".to_string())),
    }
}

pub struct FreebaseApi {
    http: Client,
    endpoint: String,
}

impl FreebaseApi {
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

    pub fn mqlread(&self, query: &Value) -> Result<Value> {
        let query = serde_json::to_string(query)?;
        debug!(query = %query, "Freebase MQL read");

        let url = format!("{}?query={}", self.endpoint, escape_query(&query));
        let response = self.http.get(&url).send()?.error_for_status()?;

        let body = response.text()?;
        let data: Value = serde_json::from_str(&body)?;
        check_mql_envelope(data)
    }

    /// Reverse lookup: the Wikipedia page id stored against a Freebase id.
    pub fn lookup_by_id(&self, id: &str) -> Result<FreebaseTopic> {
        let result = self.mqlread(&json!({
            "id": id,
            "key": {
                "namespace": WIKIPEDIA_KEY_NAMESPACE,
                "value": null,
                "limit": 1
            },
            "name": null,
            "mid": null,
            "guid": null,
            "limit": 1
        }))?;
        Ok(serde_json::from_value(result)?)
    }
}

impl FreebaseLookup for FreebaseApi {
    fn lookup_page_id(&self, page_id: u64) -> Result<FreebaseTopic> {
        let result = self.mqlread(&json!({
            "key": {
                "namespace": WIKIPEDIA_KEY_NAMESPACE,
                "value": page_id.to_string(),
                "limit": 0
            },
            "id": null,
            "name": null,
            "mid": null,
            "guid": null,
            "limit": 1
        }))?;
        Ok(serde_json::from_value(result)?)
    }
}
