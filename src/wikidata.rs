use crate::api::MediaWikiClient;
use crate::config::{ClientConfig, WIKIDATA_ENTITY_BASE};
use crate::error::{Error, Result};
use serde_json::{Map, Value};

const SITE: &str = "enwiki";

#[derive(Debug, Clone, PartialEq)]
pub struct WikidataItem {
    pub id: String,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl WikidataItem {
    pub fn uri(&self) -> String {
        format!("{}{}", WIKIDATA_ENTITY_BASE, self.id)
    }
}

/// Finds the Wikidata item linked to an English Wikipedia title.
pub trait WikidataLookup {
    fn find_by_title(&self, title: &str) -> Result<WikidataItem>;
}

fn entities(data: &mut Value) -> Result<Map<String, Value>> {
    match data.get_mut("entities").map(Value::take) {
        Some(Value::Object(entities)) => Ok(entities),
        _ => Err(Error::UpstreamMalformed("Empty response".to_string())),
    }
}

fn english(entity: &Value, field: &str) -> Option<String> {
    entity
        .get(field)?
        .get("en")?
        .get("value")?
        .as_str()
        .map(str::to_string)
}

pub fn item_from(mut data: Value) -> Result<WikidataItem> {
    let entities = entities(&mut data)?;
    let (key, entity) = match entities.into_iter().next() {
        Some((key, entity)) if key != "-1" && entity.get("missing").is_none() => (key, entity),
        _ => return Err(Error::NotFound("Failed to lookup title in Wikidata".to_string())),
    };

    let id = entity
        .get("title")
        .or_else(|| entity.get("id"))
        .and_then(Value::as_str)
        .unwrap_or(&key)
        .to_string();

    Ok(WikidataItem {
        id,
        label: english(&entity, "labels"),
        description: english(&entity, "descriptions"),
    })
}

pub fn sitelink_from(mut data: Value, id: &str) -> Result<String> {
    let entities = entities(&mut data)?;
    let entity = entities
        .get(id)
        .filter(|e| e.get("missing").is_none())
        .ok_or_else(|| Error::NotFound("Wikidata identifier does not exist".to_string()))?;

    entity
        .get("sitelinks")
        .and_then(|links| links.get(SITE))
        .and_then(|link| link.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::NotFound("Sitelink does not exist for Wikidata identifier".to_string())
        })
}

pub struct WikidataApi {
    client: MediaWikiClient,
}

impl WikidataApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: MediaWikiClient::new(config)?,
        })
    }

    /// English Wikipedia title linked from a Wikidata item.
    pub fn get_sitelink(&self, id: &str) -> Result<String> {
        let data = self.client.call(
            "wbgetentities",
            &[
                ("ids", id.to_string()),
                ("sites", SITE.to_string()),
                ("props", "sitelinks".to_string()),
                ("languages", "en".to_string()),
            ],
        )?;
        sitelink_from(data, id)
    }
}

impl WikidataLookup for WikidataApi {
    fn find_by_title(&self, title: &str) -> Result<WikidataItem> {
        let data = self.client.call(
            "wbgetentities",
            &[
                ("titles", title.to_string()),
                ("sites", SITE.to_string()),
                ("props", "info|aliases|labels|descriptions".to_string()),
                ("languages", "en".to_string()),
            ],
        )?;
        item_from(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_with_label_and_description() {
        let data = json!({"entities": {"Q33980": {
            "id": "Q33980",
            "title": "Q33980",
            "type": "item",
            "labels": {"en": {"language": "en", "value": "Ceres"}},
            "descriptions": {"en": {"language": "en", "value": "village in Fife, Scotland, UK"}}
        }}});
        let item = item_from(data).unwrap();
        assert_eq!(item.id, "Q33980");
        assert_eq!(item.label.as_deref(), Some("Ceres"));
        assert_eq!(
            item.description.as_deref(),
            Some("village in Fife, Scotland, UK")
        );
        assert_eq!(item.uri(), "http://www.wikidata.org/entity/Q33980");
    }

    #[test]
    fn item_without_english_fields() {
        let data = json!({"entities": {"Q1": {"id": "Q1", "labels": {}}}});
        let item = item_from(data).unwrap();
        assert_eq!(item.id, "Q1");
        assert!(item.label.is_none());
        assert!(item.description.is_none());
    }

    #[test]
    fn unknown_title_is_not_found() {
        let data = json!({"entities": {"-1": {"site": "enwiki", "title": "IMAC", "missing": ""}}});
        assert!(item_from(data).unwrap_err().is_not_found());
        assert!(item_from(json!({"entities": {}})).unwrap_err().is_not_found());
    }

    #[test]
    fn missing_entities_is_malformed() {
        assert!(matches!(
            item_from(json!({"success": 1})),
            Err(Error::UpstreamMalformed(_))
        ));
    }

    #[test]
    fn sitelink_title() {
        let data = json!({"entities": {"Q33980": {
            "id": "Q33980",
            "sitelinks": {"enwiki": {"site": "enwiki", "title": "Ceres, Fife"}}
        }}});
        assert_eq!(sitelink_from(data, "Q33980").unwrap(), "Ceres, Fife");
    }

    #[test]
    fn sitelink_absent_is_not_found() {
        let data = json!({"entities": {"Q33980": {"id": "Q33980", "sitelinks": {}}}});
        assert!(sitelink_from(data, "Q33980").unwrap_err().is_not_found());
        let data = json!({"entities": {"Q0": {"id": "Q0", "missing": ""}}});
        assert!(sitelink_from(data, "Q0").unwrap_err().is_not_found());
    }
}
