use std::time::Duration;

/// User agent sent with every upstream request
pub const USER_AGENT: &str = "DbpediaLite/1";

/// English Wikipedia API endpoint
pub const WIKIPEDIA_API: &str = "https://en.wikipedia.org/w/api.php";

/// Wikidata API endpoint
pub const WIKIDATA_API: &str = "https://www.wikidata.org/w/api.php";

/// Freebase MQL read endpoint
pub const FREEBASE_MQLREAD: &str = "https://www.googleapis.com/freebase/v1/mqlread";

/// Base URI for documents and entities minted by this crate
pub const BASE_URI: &str = "http://www.dbpedialite.org";

/// Prefix for Wikipedia article URIs
pub const WIKIPEDIA_PAGE_BASE: &str = "http://en.wikipedia.org/wiki/";

/// Prefix for DBpedia resource URIs
pub const DBPEDIA_RESOURCE_BASE: &str = "http://dbpedia.org/resource/";

/// Prefix for Wikidata entity URIs
pub const WIKIDATA_ENTITY_BASE: &str = "http://www.wikidata.org/entity/";

/// Prefix for Freebase topic URIs
pub const FREEBASE_RDF_BASE: &str = "http://rdf.freebase.com/ns/";

/// Connect and read timeout for wiki API calls, in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 5;

/// Connect and read timeout for Freebase calls, in seconds
pub const FREEBASE_TIMEOUT_SECS: u64 = 2;

/// Stop collecting paragraphs once the abstract buffer passes this many characters
pub const ABSTRACT_MAX_LENGTH: usize = 500;

/// Abstracts longer than this are truncated with an ellipsis
pub const ABSTRACT_TRUNCATE_LENGTH: usize = 700;

/// Images narrower or shorter than this (in pixels) are ignored
pub const IMAGE_MIN_SIZE: u32 = 100;

/// Scheme given to protocol-relative image URLs
pub const DEFAULT_SCHEME: &str = "https";

/// Maximum members requested from a category in one call
pub const CATEGORY_MEMBER_LIMIT: u32 = 500;

/// Default number of search results
pub const SEARCH_LIMIT: u32 = 20;

/// Output format suffix used by the CLI when none is given
pub const DEFAULT_FORMAT: &str = "ttl";

/// Progress update interval when looking up several pages
pub const PROGRESS_INTERVAL: u64 = 10;

/// Runtime settings for an upstream HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_agent: USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(timeout_secs),
            read_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn wikipedia() -> Self {
        Self::new(WIKIPEDIA_API, HTTP_TIMEOUT_SECS)
    }

    pub fn wikidata() -> Self {
        Self::new(WIKIDATA_API, HTTP_TIMEOUT_SECS)
    }

    pub fn freebase() -> Self {
        Self::new(FREEBASE_MQLREAD, FREEBASE_TIMEOUT_SECS)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.read_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::wikipedia()
    }
}
