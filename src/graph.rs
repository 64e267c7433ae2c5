use crate::category::Category;
use crate::models::{Entity, Page};
use crate::thing::Thing;
use crate::vocab::{self, cc, dc, foaf, geo, owl, rdf, rdfs, schema, skos, wikibase, xsd};
use chrono::SecondsFormat;

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Iri(String),
    Literal {
        value: String,
        datatype: Option<&'static str>,
        language: Option<&'static str>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: &'static str) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    pub fn english(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: Some("en"),
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: String,
    pub predicate: &'static str,
    pub object: Term,
}

/// Accumulates triples in insertion order.
#[derive(Default)]
struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    fn add(&mut self, subject: &str, predicate: &'static str, object: Term) {
        self.triples.push(Triple {
            subject: subject.to_string(),
            predicate,
            object,
        });
    }

    fn document(&mut self, page: &Page, label: &str) {
        let doc = page.doc_uri();
        self.add(&doc, rdf::TYPE, Term::iri(foaf::DOCUMENT));
        self.add(
            &doc,
            dc::TITLE,
            Term::literal(format!("dbpedia lite {} - {}", page.kind().name(), label)),
        );
        if let Some(updated_at) = page.updated_at {
            self.add(
                &doc,
                dc::MODIFIED,
                Term::typed(
                    updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                    xsd::DATE_TIME,
                ),
            );
        }
        self.add(&doc, foaf::PRIMARY_TOPIC, Term::iri(page.uri()));
        self.add(&doc, cc::LICENSE, Term::iri(vocab::CC_BY_SA_30));
        self.add(&doc, cc::LICENSE, Term::iri(vocab::GNU_FDL_13));
    }

    fn thing(&mut self, thing: &Thing) {
        let page = &thing.page;
        let uri = page.uri();
        let wikipedia = page.wikipedia_uri();

        self.add(&uri, rdf::TYPE, Term::iri(owl::THING));
        self.add(&uri, rdfs::LABEL, Term::literal(thing.label()));
        if let Some(text) = page.abstract_text() {
            self.add(&uri, rdfs::COMMENT, Term::literal(text));
        }
        self.add(&uri, foaf::IS_PRIMARY_TOPIC_OF, Term::iri(&wikipedia));
        self.add(&uri, owl::SAME_AS, Term::iri(page.dbpedia_uri()));

        self.add(&wikipedia, rdf::TYPE, Term::iri(schema::ARTICLE));
        self.add(&wikipedia, schema::ABOUT, Term::iri(&uri));
        self.add(&wikipedia, schema::IN_LANGUAGE, Term::literal("en"));

        if let Some(item) = thing.wikidata_item() {
            let item_uri = item.uri();
            self.add(&uri, owl::SAME_AS, Term::iri(&item_uri));
            self.add(&item_uri, rdf::TYPE, Term::iri(wikibase::ITEM));
            if let Some(label) = &item.label {
                self.add(&item_uri, rdfs::LABEL, Term::english(label));
                self.add(&item_uri, schema::NAME, Term::english(label));
            }
            if let Some(description) = &item.description {
                self.add(&item_uri, schema::DESCRIPTION, Term::english(description));
            }
            self.add(&wikipedia, schema::ABOUT, Term::iri(&item_uri));
        }

        if let Some(topic) = thing.freebase_topic() {
            self.add(&uri, owl::SAME_AS, Term::iri(topic.rdf_uri()));
        }

        if let Some(coordinates) = thing.coordinates {
            self.add(&uri, geo::LAT, Term::typed(coordinates.lat.to_string(), xsd::DOUBLE));
            self.add(&uri, geo::LONG, Term::typed(coordinates.long.to_string(), xsd::DOUBLE));
        }

        for link in &thing.external_links {
            self.add(&uri, foaf::PAGE, Term::iri(link));
        }
        for image in &thing.images {
            self.add(&uri, foaf::DEPICTION, Term::iri(image));
        }
    }

    fn category(&mut self, category: &Category) {
        let page = &category.page;
        let uri = page.uri();
        let label = category.label();

        self.add(&uri, rdf::TYPE, Term::iri(skos::CONCEPT));
        self.add(&uri, rdfs::LABEL, Term::literal(&label));
        self.add(&uri, skos::PREF_LABEL, Term::literal(&label));
        self.add(&uri, foaf::IS_PRIMARY_TOPIC_OF, Term::iri(page.wikipedia_uri()));
        self.add(&uri, owl::SAME_AS, Term::iri(page.dbpedia_uri()));

        for member in &category.members {
            let member_uri = member.page.uri();
            self.add(&member_uri, rdf::TYPE, Term::iri(&uri));
            self.add(&member_uri, rdfs::LABEL, Term::literal(member.label()));
        }
        for subcategory in &category.subcategories {
            let sub_uri = subcategory.page.uri();
            self.add(&sub_uri, rdfs::SUB_CLASS_OF, Term::iri(&uri));
            self.add(&sub_uri, rdfs::LABEL, Term::literal(subcategory.label()));
        }
    }
}

/// Deterministic, ordered statements describing an entity and its document.
pub fn to_triples(entity: &Entity) -> Vec<Triple> {
    let mut graph = Graph::default();
    graph.document(entity.page(), &entity.label());
    match entity {
        Entity::Thing(thing) => graph.thing(thing),
        Entity::Category(category) => graph.category(category),
    }
    graph.triples
}
