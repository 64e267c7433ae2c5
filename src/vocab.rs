//! Namespaces and terms used in the output graph.

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const DC: &str = "http://purl.org/dc/terms/";
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const GEO: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";
pub const WIKIBASE: &str = "http://www.wikidata.org/ontology#";
pub const SCHEMA: &str = "http://schema.org/";
pub const CC: &str = "http://creativecommons.org/ns#";

/// Prefixes written by the Turtle and RDF/XML writers, in output order.
pub const PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("owl", OWL),
    ("xsd", XSD),
    ("foaf", FOAF),
    ("dc", DC),
    ("skos", SKOS),
    ("geo", GEO),
    ("wikibase", WIKIBASE),
    ("schema", SCHEMA),
    ("cc", CC),
];

pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod rdfs {
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
}

pub mod owl {
    pub const THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    pub const SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
}

pub mod xsd {
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
}

pub mod foaf {
    pub const DOCUMENT: &str = "http://xmlns.com/foaf/0.1/Document";
    pub const PRIMARY_TOPIC: &str = "http://xmlns.com/foaf/0.1/primaryTopic";
    pub const IS_PRIMARY_TOPIC_OF: &str = "http://xmlns.com/foaf/0.1/isPrimaryTopicOf";
    pub const PAGE: &str = "http://xmlns.com/foaf/0.1/page";
    pub const DEPICTION: &str = "http://xmlns.com/foaf/0.1/depiction";
}

pub mod dc {
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
}

pub mod skos {
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

pub mod geo {
    pub const LAT: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#lat";
    pub const LONG: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#long";
}

pub mod wikibase {
    pub const ITEM: &str = "http://www.wikidata.org/ontology#Item";
}

pub mod schema {
    pub const ARTICLE: &str = "http://schema.org/Article";
    pub const ABOUT: &str = "http://schema.org/about";
    pub const IN_LANGUAGE: &str = "http://schema.org/inLanguage";
    pub const NAME: &str = "http://schema.org/name";
    pub const DESCRIPTION: &str = "http://schema.org/description";
}

pub mod cc {
    pub const LICENSE: &str = "http://creativecommons.org/ns#license";
}

pub const CC_BY_SA_30: &str = "http://creativecommons.org/licenses/by-sa/3.0/";
pub const GNU_FDL_13: &str = "http://gnu.org/licenses/fdl-1.3.html";

/// Splits an IRI into a known prefix and local name, e.g. `foaf:page`.
pub fn compact(iri: &str) -> Option<(&'static str, &str)> {
    PREFIXES.iter().find_map(|(prefix, namespace)| {
        let local = iri.strip_prefix(namespace)?;
        let simple = !local.is_empty()
            && local
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        simple.then_some((*prefix, local))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_known_terms() {
        assert_eq!(compact(foaf::PAGE), Some(("foaf", "page")));
        assert_eq!(compact(rdf::TYPE), Some(("rdf", "type")));
        assert_eq!(compact(xsd::DATE_TIME), Some(("xsd", "dateTime")));
    }

    #[test]
    fn compact_rejects_unknown_or_awkward() {
        assert_eq!(compact("http://example.com/x"), None);
        assert_eq!(compact("http://xmlns.com/foaf/0.1/"), None);
        assert_eq!(compact("http://schema.org/a/b"), None);
    }

    #[test]
    fn terms_live_in_their_namespace() {
        for (term, namespace) in [
            (rdfs::LABEL, RDFS),
            (owl::SAME_AS, OWL),
            (skos::PREF_LABEL, SKOS),
            (geo::LONG, GEO),
            (wikibase::ITEM, WIKIBASE),
            (schema::ABOUT, SCHEMA),
            (cc::LICENSE, CC),
            (dc::MODIFIED, DC),
        ] {
            assert!(term.starts_with(namespace), "{}", term);
        }
    }
}
