//! dbpedialite: Wikipedia pages as linked data
//!
//! This crate turns a Wikipedia page id (or title) into a normalized entity
//! description and renders it as an ordered set of RDF triples:
//!
//! 1. **Fetch** -- Query the MediaWiki API for page info and the rendered HTML
//!    of the page, with deterministic query strings and typed failures
//! 2. **Extract** -- Scrape the abstract, coordinates, images, external links,
//!    last-modified time and redirect notices out of the HTML
//! 3. **Enrich** (optional) -- Link the entity to Wikidata and Freebase; each
//!    lookup runs at most once and failures are logged, never propagated
//! 4. **Assemble** -- Build document, entity, geo, link and membership
//!    statements in a fixed order and write them in the negotiated format
//!
//! # Outcomes
//!
//! Loading a page returns a [`redirect::Resolution`]: the entity itself, a
//! redirect target, not-found, or an unsupported namespace. Only upstream and
//! transport failures are errors ([`error::Error`]). Redirects are followed at
//! most once, so resolution never loops.
//!
//! # Key Modules
//!
//! - [`api`] -- MediaWiki API client, query and title escaping
//! - [`wikipedia`] -- Page info, search, category members, parse
//! - [`content`] -- HTML extraction (abstracts, coordinates, images, links)
//! - [`redirect`] -- Resolution outcomes and the namespace-dispatching resolver
//! - [`wikidata`] / [`freebase`] -- Companion knowledge base lookups
//! - [`models`] -- Shared page fields, derived URIs, write-once enrichment slots
//! - [`thing`] / [`category`] -- Article and category loaders
//! - [`graph`] / [`vocab`] -- Ordered triple assembly and vocabulary terms
//! - [`formats`] -- Format negotiation and writers (Turtle, N-Triples, RDF/XML, TriX, JSON-LD, RDF/JSON)
//! - [`stats`] -- Atomic lookup counters
//! - [`config`] -- Endpoints, timeouts and extraction limits
//!
//! # Example Usage
//!
//! ```bash
//! # Describe Ceres, Fife in Turtle, enriched from Wikidata and Freebase
//! dbpedialite thing 934787
//!
//! # A category with its members, as N-Triples
//! dbpedialite category 4309010 --format nt
//!
//! # Resolve a title, following a redirect if there is one
//! dbpedialite title "BSE" --follow-redirects --accept "application/rdf+xml"
//! ```

pub mod api;
pub mod category;
pub mod config;
pub mod content;
pub mod error;
pub mod formats;
pub mod freebase;
pub mod graph;
pub mod models;
pub mod redirect;
pub mod stats;
pub mod thing;
pub mod vocab;
pub mod wikidata;
pub mod wikipedia;

pub use error::{Error, Result};
