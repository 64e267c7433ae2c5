use crate::content;
use crate::error::{Error, Result};
use crate::freebase::{FreebaseLookup, FreebaseTopic};
use crate::models::{Coordinates, Enrichment, EnrichmentStatus, Kind, Page, PageSelector};
use crate::redirect::{PageRef, Resolution};
use crate::wikidata::{WikidataItem, WikidataLookup};
use crate::wikipedia::{PageInfo, WikipediaApi};
use tracing::{error, info};

/// An article (namespace 0) with its extracted content and enrichments.
#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    pub page: Page,
    pub coordinates: Option<Coordinates>,
    pub external_links: Vec<String>,
    pub images: Vec<String>,
    pub wikidata: Enrichment<WikidataItem>,
    pub freebase: Enrichment<FreebaseTopic>,
}

impl Thing {
    pub fn new(page_id: u64, title: impl Into<String>) -> Self {
        Self::from_page(Page::new(Kind::Thing, page_id, title))
    }

    /// Member stub built from a category listing, not loaded.
    pub fn from_info(info: &PageInfo) -> Self {
        Self::from_page(Page::from_info(Kind::Thing, info))
    }

    fn from_page(page: Page) -> Self {
        Self {
            page,
            coordinates: None,
            external_links: Vec::new(),
            images: Vec::new(),
            wikidata: Enrichment::default(),
            freebase: Enrichment::default(),
        }
    }

    /// Fetches and extracts an article. Enrichment is left to the caller.
    pub fn load(api: &WikipediaApi, page_id: u64) -> Result<Resolution<Thing>> {
        let info = match api.page_info(&PageSelector::Id(page_id)) {
            Ok(info) => info,
            Err(Error::NotFound(_)) => return Ok(Resolution::NotFound),
            Err(err) => return Err(err),
        };

        if info.page_id != page_id {
            return Ok(Resolution::Redirected(PageRef::from(&info)));
        }
        if info.ns != 0 {
            return Ok(Resolution::UnsupportedNamespace {
                page_id,
                namespace: info.ns,
            });
        }

        let parsed = match api.parse(page_id) {
            Ok(parsed) => parsed,
            Err(Error::NotFound(_)) => return Ok(Resolution::NotFound),
            Err(err) => return Err(err),
        };
        let extracted = content::extract(&parsed.html);

        if let Some(target) = extracted.redirect_target {
            let target = match api.page_info(&PageSelector::Title(target)) {
                Ok(target) => target,
                Err(Error::NotFound(_)) => return Ok(Resolution::NotFound),
                Err(err) => return Err(err),
            };
            info!(page_id, target = target.page_id, "Page is a redirect");
            return Ok(Resolution::Redirected(PageRef::from(&target)));
        }

        let mut thing = Thing::new(page_id, parsed.title);
        thing.page.apply(&info);
        if parsed.display_title.is_some() {
            thing.page.display_title = parsed.display_title;
        }
        if let Some(text) = extracted.abstract_text {
            thing.page.set_abstract(text);
        }
        if extracted.updated_at.is_some() {
            thing.page.updated_at = extracted.updated_at;
        }
        thing.coordinates = extracted.coordinates;
        thing.external_links = extracted.external_links;
        thing.images = extracted.images;

        info!(
            page_id,
            title = %thing.page.title,
            links = thing.external_links.len(),
            images = thing.images.len(),
            "Loaded thing"
        );
        Ok(Resolution::Resolved(thing))
    }

    /// Looks the title up in Wikidata once. Failures are logged and leave the fields absent.
    pub fn enrich_wikidata(&mut self, lookup: &dyn WikidataLookup) -> EnrichmentStatus {
        let title = self.page.title.clone();
        let (status, err) = self.wikidata.fill_with(|| lookup.find_by_title(&title));
        if let Some(err) = err {
            error!(page_id = self.page.page_id(), error = %err, "Error while reading from Wikidata");
        }
        status
    }

    /// Looks the page id up in Freebase once. Failures are logged and leave the fields absent.
    pub fn enrich_freebase(&mut self, lookup: &dyn FreebaseLookup) -> EnrichmentStatus {
        let page_id = self.page.page_id();
        let (status, err) = self.freebase.fill_with(|| lookup.lookup_page_id(page_id));
        if let Some(err) = err {
            error!(page_id, error = %err, "Error while reading from Freebase");
        }
        status
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    pub fn label(&self) -> &str {
        self.page.label()
    }

    pub fn wikidata_item(&self) -> Option<&WikidataItem> {
        self.wikidata.value()
    }

    pub fn freebase_topic(&self) -> Option<&FreebaseTopic> {
        self.freebase.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedWikidata {
        calls: Cell<u32>,
        result: fn() -> Result<WikidataItem>,
    }

    impl WikidataLookup for FixedWikidata {
        fn find_by_title(&self, _title: &str) -> Result<WikidataItem> {
            self.calls.set(self.calls.get() + 1);
            (self.result)()
        }
    }

    struct FailingFreebase;

    impl FreebaseLookup for FailingFreebase {
        fn lookup_page_id(&self, _page_id: u64) -> Result<FreebaseTopic> {
            Err(Error::Timeout("operation timed out".to_string()))
        }
    }

    fn ceres_item() -> Result<WikidataItem> {
        Ok(WikidataItem {
            id: "Q33980".to_string(),
            label: Some("Ceres".to_string()),
            description: Some("village in Fife, Scotland, UK".to_string()),
        })
    }

    #[test]
    fn wikidata_resolved_then_cached() {
        let lookup = FixedWikidata {
            calls: Cell::new(0),
            result: ceres_item,
        };
        let mut thing = Thing::new(934787, "Ceres, Fife");

        assert_eq!(thing.enrich_wikidata(&lookup), EnrichmentStatus::Resolved);
        assert_eq!(thing.enrich_wikidata(&lookup), EnrichmentStatus::Cached);
        assert_eq!(lookup.calls.get(), 1);
        assert_eq!(thing.wikidata_item().map(|i| i.id.as_str()), Some("Q33980"));
    }

    #[test]
    fn wikidata_not_found_is_absent() {
        let lookup = FixedWikidata {
            calls: Cell::new(0),
            result: || Err(Error::NotFound("Failed to lookup title in Wikidata".into())),
        };
        let mut thing = Thing::new(1, "IMAC");
        assert_eq!(thing.enrich_wikidata(&lookup), EnrichmentStatus::Absent);
        assert!(thing.wikidata_item().is_none());
    }

    #[test]
    fn freebase_failure_leaves_fields_absent() {
        let mut thing = Thing::new(934787, "Ceres, Fife");
        assert_eq!(thing.enrich_freebase(&FailingFreebase), EnrichmentStatus::Failed);
        assert!(thing.freebase_topic().is_none());
        assert_eq!(thing.enrich_freebase(&FailingFreebase), EnrichmentStatus::Cached);
    }

    #[test]
    fn coordinates_flag() {
        let mut thing = Thing::new(934787, "Ceres, Fife");
        assert!(!thing.has_coordinates());
        thing.coordinates = Some(Coordinates {
            lat: 56.29205,
            long: -2.971445,
        });
        assert!(thing.has_coordinates());
    }
}
