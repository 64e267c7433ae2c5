use crate::api::MediaWikiClient;
use crate::config::{ClientConfig, CATEGORY_MEMBER_LIMIT};
use crate::content::clean_html_text;
use crate::error::{Error, Result};
use crate::models::PageSelector;
use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Page record returned by `prop=info` queries.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub page_id: u64,
    pub ns: i64,
    pub title: String,
    pub display_title: Option<String>,
    pub touched: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub title: String,
    #[serde(default)]
    pub ns: i64,
    #[serde(default)]
    pub snippet: String,
    #[serde(rename = "titlesnippet", default)]
    pub title_snippet: String,
}

/// Rendered page body with its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub page_id: u64,
    pub title: String,
    pub display_title: Option<String>,
    pub html: String,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    pageid: Option<u64>,
    #[serde(default)]
    ns: i64,
    #[serde(default)]
    title: String,
    displaytitle: Option<String>,
    touched: Option<DateTime<Utc>>,
    missing: Option<IgnoredAny>,
    invalid: Option<IgnoredAny>,
}

impl RawPage {
    fn into_info(self) -> Result<PageInfo> {
        let page_id = match self.pageid {
            Some(id) if self.missing.is_none() && self.invalid.is_none() => id,
            _ => return Err(Error::NotFound(format!("Page '{}' does not exist", self.title))),
        };

        Ok(PageInfo {
            page_id,
            ns: self.ns,
            title: self.title,
            display_title: self.displaytitle.as_deref().map(clean_html_text),
            touched: self.touched,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawParse {
    pageid: u64,
    title: String,
    displaytitle: Option<String>,
    text: RawText,
}

#[derive(Debug, Deserialize)]
struct RawText {
    #[serde(rename = "*")]
    html: String,
}

/// Takes the value at `pointer` and decodes it, or `None` when absent.
fn take<T: DeserializeOwned>(data: &mut Value, pointer: &str) -> Result<Option<T>> {
    match data.pointer_mut(pointer).map(Value::take) {
        Some(value) if !value.is_null() => Ok(Some(serde_json::from_value(value)?)),
        _ => Ok(None),
    }
}

pub fn page_info_from(mut data: Value) -> Result<PageInfo> {
    let pages: BTreeMap<String, RawPage> = take(&mut data, "/query/pages")?.unwrap_or_default();
    match pages.into_values().next() {
        Some(page) => page.into_info(),
        None => Err(Error::UpstreamMalformed("Empty response".to_string())),
    }
}

/// Page records of a generator query, sorted by page id. Missing pages are skipped.
pub fn pages_from(mut data: Value) -> Result<Vec<PageInfo>> {
    let pages: BTreeMap<String, RawPage> = take(&mut data, "/query/pages")?.unwrap_or_default();
    let mut infos: Vec<PageInfo> = pages
        .into_values()
        .filter_map(|page| page.into_info().ok())
        .collect();
    infos.sort_by_key(|info| info.page_id);
    Ok(infos)
}

pub fn search_results_from(mut data: Value) -> Result<Vec<SearchResult>> {
    Ok(take(&mut data, "/query/search")?.unwrap_or_default())
}

pub fn parsed_page_from(mut data: Value) -> Result<ParsedPage> {
    let raw: RawParse = take(&mut data, "/parse")?
        .ok_or_else(|| Error::UpstreamMalformed("Response has no parse section".to_string()))?;

    Ok(ParsedPage {
        page_id: raw.pageid,
        title: raw.title,
        display_title: raw.displaytitle.as_deref().map(clean_html_text),
        html: raw.text.html,
    })
}

/// Typed operations on the Wikipedia API.
pub struct WikipediaApi {
    client: MediaWikiClient,
}

impl WikipediaApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: MediaWikiClient::new(config)?,
        })
    }

    pub fn page_info(&self, selector: &PageSelector) -> Result<PageInfo> {
        let (key, value) = match selector {
            PageSelector::Id(id) => ("pageids", id.to_string()),
            PageSelector::Title(title) => ("titles", title.clone()),
        };

        let data = self.client.call(
            "query",
            &[
                (key, value),
                ("prop", "info".to_string()),
                ("inprop", "displaytitle".to_string()),
                ("redirects", "1".to_string()),
            ],
        )?;
        page_info_from(data)
    }

    pub fn search(&self, term: &str, limit: u32) -> Result<Vec<SearchResult>> {
        let data = self.client.call(
            "query",
            &[
                ("list", "search".to_string()),
                ("srprop", "snippet|titlesnippet".to_string()),
                ("srsearch", term.to_string()),
                ("srlimit", limit.to_string()),
            ],
        )?;
        let results = search_results_from(data)?;
        debug!(term, results = results.len(), "Search complete");
        Ok(results)
    }

    /// Articles (ns 0) and subcategories (ns 14) of a category.
    pub fn category_members(&self, page_id: u64) -> Result<Vec<PageInfo>> {
        let data = self.client.call(
            "query",
            &[
                ("generator", "categorymembers".to_string()),
                ("gcmnamespace", "0|14".to_string()),
                ("gcmpageid", page_id.to_string()),
                ("gcmlimit", CATEGORY_MEMBER_LIMIT.to_string()),
                ("prop", "info".to_string()),
                ("inprop", "displaytitle".to_string()),
            ],
        )?;
        pages_from(data)
    }

    /// Categories the page belongs to.
    pub fn page_categories(&self, page_id: u64) -> Result<Vec<PageInfo>> {
        let data = self.client.call(
            "query",
            &[
                ("generator", "categories".to_string()),
                ("pageids", page_id.to_string()),
                ("gcllimit", CATEGORY_MEMBER_LIMIT.to_string()),
                ("prop", "info".to_string()),
                ("inprop", "displaytitle".to_string()),
            ],
        )?;
        pages_from(data)
    }

    pub fn parse(&self, page_id: u64) -> Result<ParsedPage> {
        let data = self.client.call(
            "parse",
            &[
                ("pageid", page_id.to_string()),
                ("prop", "text|displaytitle".to_string()),
            ],
        )?;
        parsed_page_from(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn page_info_decodes_first_page() {
        let data = json!({"query": {"pages": {"934787": {
            "pageid": 934787,
            "ns": 0,
            "title": "Ceres, Fife",
            "touched": "2012-05-01T12:00:00Z",
            "lastrevid": 497541346,
            "displaytitle": "Ceres, Fife"
        }}}});
        let info = page_info_from(data).unwrap();
        assert_eq!(info.page_id, 934787);
        assert_eq!(info.ns, 0);
        assert_eq!(info.title, "Ceres, Fife");
        assert_eq!(info.display_title.as_deref(), Some("Ceres, Fife"));
        assert_eq!(
            info.touched,
            Some(Utc.with_ymd_and_hms(2012, 5, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn page_info_cleans_display_title() {
        let data = json!({"query": {"pages": {"21721040": {
            "pageid": 21721040, "ns": 0, "title": "True Blood",
            "displaytitle": "<i>True Blood</i>"
        }}}});
        let info = page_info_from(data).unwrap();
        assert_eq!(info.display_title.as_deref(), Some("True Blood"));
    }

    #[test]
    fn page_info_missing_is_not_found() {
        let data = json!({"query": {"pages": {"-1": {"ns": 0, "title": "Zsdfsdf", "missing": ""}}}});
        assert!(page_info_from(data).unwrap_err().is_not_found());

        let data = json!({"query": {"pages": {"-1": {"title": "[[", "invalid": ""}}}});
        assert!(page_info_from(data).unwrap_err().is_not_found());
    }

    #[test]
    fn page_info_empty_is_malformed() {
        let err = page_info_from(json!({"batchcomplete": ""})).unwrap_err();
        assert!(matches!(err, Error::UpstreamMalformed(_)));
    }

    #[test]
    fn pages_sorted_by_id() {
        let data = json!({"query": {"pages": {
            "934787": {"pageid": 934787, "ns": 0, "title": "Ceres, Fife"},
            "1041471": {"pageid": 1041471, "ns": 14, "title": "Category:Villages in Fife"},
            "52780": {"pageid": 52780, "ns": 0, "title": "Anstruther"}
        }}});
        let ids: Vec<u64> = pages_from(data).unwrap().iter().map(|p| p.page_id).collect();
        assert_eq!(ids, vec![52780, 934787, 1041471]);
    }

    #[test]
    fn pages_absent_is_empty() {
        assert!(pages_from(json!({"batchcomplete": ""})).unwrap().is_empty());
    }

    #[test]
    fn search_results_in_api_order() {
        let data = json!({"query": {"search": [
            {"ns": 0, "title": "Rat", "snippet": "<span class=\"searchmatch\">Rats</span> are", "titlesnippet": "<span class=\"searchmatch\">Rat</span>"},
            {"ns": 0, "title": "Brown rat", "snippet": "", "titlesnippet": ""}
        ]}});
        let results = search_results_from(data).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rat");
        assert_eq!(results[1].title, "Brown rat");
        assert_eq!(results[0].title_snippet, "<span class=\"searchmatch\">Rat</span>");
    }

    #[test]
    fn parsed_page_takes_html_body() {
        let data = json!({"parse": {
            "title": "Ceres, Fife",
            "pageid": 934787,
            "displaytitle": "Ceres, Fife",
            "text": {"*": "<p>Ceres is a village.</p>"}
        }});
        let page = parsed_page_from(data).unwrap();
        assert_eq!(page.page_id, 934787);
        assert_eq!(page.html, "<p>Ceres is a village.</p>");
    }

    #[test]
    fn parsed_page_without_parse_is_malformed() {
        assert!(matches!(
            parsed_page_from(json!({})),
            Err(Error::UpstreamMalformed(_))
        ));
    }
}
