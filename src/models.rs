use crate::api::{dbpedia_key, escape_title};
use crate::category::Category;
use crate::config::{BASE_URI, DBPEDIA_RESOURCE_BASE, WIKIPEDIA_PAGE_BASE};
use crate::error::Result;
use crate::graph::Triple;
use crate::thing::Thing;
use crate::wikipedia::PageInfo;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How a caller names a page: by id, or by title when an id must be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelector {
    Id(u64),
    Title(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Thing,
    Category,
}

impl Kind {
    /// Path segment of the document URI.
    pub fn path(self) -> &'static str {
        match self {
            Kind::Thing => "things",
            Kind::Category => "categories",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Thing => "thing",
            Kind::Category => "category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

/// Fields shared by articles and categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    page_id: u64,
    kind: Kind,
    pub title: String,
    pub display_title: Option<String>,
    abstract_text: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    doc_uri: Option<String>,
}

impl Page {
    pub fn new(kind: Kind, page_id: u64, title: impl Into<String>) -> Self {
        Self {
            page_id,
            kind,
            title: title.into(),
            display_title: None,
            abstract_text: None,
            updated_at: None,
            doc_uri: None,
        }
    }

    /// Page stub built from a page record.
    pub fn from_info(kind: Kind, info: &PageInfo) -> Self {
        let mut page = Self::new(kind, info.page_id, info.title.clone());
        page.apply(info);
        page
    }

    pub fn page_id(&self) -> u64 {
        self.page_id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Copies title, display title and touched time. Identity is left alone.
    pub fn apply(&mut self, info: &PageInfo) {
        self.title = info.title.clone();
        if info.display_title.is_some() {
            self.display_title = info.display_title.clone();
        }
        if info.touched.is_some() {
            self.updated_at = info.touched;
        }
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    /// Sets the abstract unless one is already present. Returns whether it was set.
    pub fn set_abstract(&mut self, text: impl Into<String>) -> bool {
        if self.abstract_text.is_some() {
            return false;
        }
        self.abstract_text = Some(text.into());
        true
    }

    pub fn label(&self) -> &str {
        self.display_title.as_deref().unwrap_or(&self.title)
    }

    pub fn default_doc_uri(&self) -> String {
        format!("{}/{}/{}", BASE_URI, self.kind.path(), self.page_id)
    }

    pub fn doc_uri(&self) -> String {
        self.doc_uri
            .clone()
            .unwrap_or_else(|| self.default_doc_uri())
    }

    /// Points the document at the URI it is being served from.
    pub fn set_doc_uri(&mut self, uri: impl Into<String>) {
        self.doc_uri = Some(uri.into());
    }

    pub fn uri(&self) -> String {
        format!("{}#id", self.default_doc_uri())
    }

    pub fn wikipedia_uri(&self) -> String {
        format!("{}{}", WIKIPEDIA_PAGE_BASE, escape_title(&self.title))
    }

    pub fn dbpedia_uri(&self) -> String {
        format!("{}{}", DBPEDIA_RESOURCE_BASE, dbpedia_key(&self.title))
    }
}

/// Outcome of a single enrichment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    Resolved,
    Absent,
    Failed,
    Cached,
}

/// Write-once slot for data fetched from a companion knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment<T> {
    attempted: bool,
    value: Option<T>,
}

impl<T> Default for Enrichment<T> {
    fn default() -> Self {
        Self {
            attempted: false,
            value: None,
        }
    }
}

impl<T> Enrichment<T> {
    pub fn is_attempted(&self) -> bool {
        self.attempted
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Runs `lookup` the first time only. A later call reports `Cached` without running it.
    pub fn fill_with<F>(&mut self, lookup: F) -> (EnrichmentStatus, Option<crate::error::Error>)
    where
        F: FnOnce() -> Result<T>,
    {
        if self.attempted {
            return (EnrichmentStatus::Cached, None);
        }
        self.attempted = true;

        match lookup() {
            Ok(value) => {
                self.value = Some(value);
                (EnrichmentStatus::Resolved, None)
            }
            Err(err) if err.is_not_found() => (EnrichmentStatus::Absent, Some(err)),
            Err(err) => (EnrichmentStatus::Failed, Some(err)),
        }
    }
}

/// A loaded article or category.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Thing(Thing),
    Category(Category),
}

impl Entity {
    pub fn page(&self) -> &Page {
        match self {
            Entity::Thing(thing) => &thing.page,
            Entity::Category(category) => &category.page,
        }
    }

    pub fn page_mut(&mut self) -> &mut Page {
        match self {
            Entity::Thing(thing) => &mut thing.page,
            Entity::Category(category) => &mut category.page,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Entity::Thing(thing) => thing.label().to_string(),
            Entity::Category(category) => category.label(),
        }
    }

    pub fn set_doc_uri(&mut self, uri: impl Into<String>) {
        self.page_mut().set_doc_uri(uri);
    }

    pub fn to_triples(&self) -> Vec<Triple> {
        crate::graph::to_triples(self)
    }
}
