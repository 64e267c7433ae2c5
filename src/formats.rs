use crate::error::{Error, Result};
use crate::graph::{Term, Triple};
use crate::models::{Coordinates, Entity, Kind};
use crate::vocab::{self, rdf, PREFIXES};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

const TRIX_NAMESPACE: &str = "http://www.w3.org/2004/03/trix/trix-1/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
    JsonLd,
    Turtle,
    NTriples,
    RdfXml,
    Trix,
}

/// Suffix, primary mime type and alternative mime types per format.
const FORMATS: &[(Format, &str, &str, &[&str])] = &[
    (Format::Html, "html", "text/html", &["application/xhtml+xml"]),
    (Format::Json, "json", "application/json", &["application/rdf+json"]),
    (Format::JsonLd, "jsonld", "application/ld+json", &[]),
    (Format::Turtle, "ttl", "text/turtle", &["application/x-turtle", "application/turtle"]),
    (Format::NTriples, "nt", "application/n-triples", &["text/plain"]),
    (Format::RdfXml, "rdf", "application/rdf+xml", &["application/xml", "text/xml"]),
    (Format::Trix, "trix", "application/trix", &[]),
];

impl Format {
    pub fn all() -> impl Iterator<Item = Format> {
        FORMATS.iter().map(|(format, ..)| *format)
    }

    fn entry(self) -> &'static (Format, &'static str, &'static str, &'static [&'static str]) {
        FORMATS
            .iter()
            .find(|(format, ..)| *format == self)
            .unwrap_or(&FORMATS[0])
    }

    pub fn suffix(self) -> &'static str {
        self.entry().1
    }

    pub fn mime_type(self) -> &'static str {
        self.entry().2
    }

    pub fn from_suffix(suffix: &str) -> Result<Format> {
        let suffix = suffix.trim_start_matches('.').to_ascii_lowercase();
        FORMATS
            .iter()
            .find(|(_, s, ..)| *s == suffix)
            .map(|(format, ..)| *format)
            .ok_or(Error::UnsupportedFormat(suffix))
    }

    pub fn from_mime(mime: &str) -> Option<Format> {
        let mime = mime.trim().to_ascii_lowercase();
        FORMATS
            .iter()
            .find(|(_, _, primary, alternatives)| *primary == mime || alternatives.contains(&mime.as_str()))
            .map(|(format, ..)| *format)
    }

    /// Picks a format from an Accept header, honouring q-values. No header or `*/*` means HTML.
    pub fn negotiate(accept: Option<&str>) -> Result<Format> {
        let accept = match accept.map(str::trim) {
            Some(accept) if !accept.is_empty() => accept,
            _ => return Ok(Format::Html),
        };

        let mut ranges: Vec<(&str, f32)> = accept
            .split(',')
            .filter_map(|range| {
                let mut parts = range.split(';').map(str::trim);
                let mime = parts.next().filter(|m| !m.is_empty())?;
                let q = parts
                    .find_map(|p| p.strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((mime, q))
            })
            .filter(|(_, q)| *q > 0.0)
            .collect();
        ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (mime, _) in ranges {
            if mime == "*/*" || mime == "text/*" {
                return Ok(Format::Html);
            }
            if let Some(format) = Format::from_mime(mime) {
                return Ok(format);
            }
        }
        Err(Error::UnsupportedFormat(accept.to_string()))
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Format::from_suffix(s)
    }
}

/// Writes the entity in the requested format.
pub fn serialize(entity: &Entity, format: Format) -> Result<String> {
    serialize_triples(entity, &entity.to_triples(), format)
}

/// Writes triples already assembled for `entity`.
pub fn serialize_triples(entity: &Entity, triples: &[Triple], format: Format) -> Result<String> {
    match format {
        Format::Html => to_json_string(&EntityView::from(entity)),
        Format::Json => to_json_string(&rdf_json(triples)),
        Format::JsonLd => to_json_string(&json_ld(triples)),
        Format::Turtle => Ok(turtle(triples)),
        Format::NTriples => Ok(ntriples(triples)),
        Format::RdfXml => rdf_xml(triples),
        Format::Trix => trix(triples, &entity.page().doc_uri()),
    }
}

fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Serialization(e.to_string()))
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn ntriples_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<{}>", iri),
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            let mut out = format!("\"{}\"", escape_literal(value));
            if let Some(language) = language {
                out.push('@');
                out.push_str(language);
            } else if let Some(datatype) = datatype {
                out.push_str(&format!("^^<{}>", datatype));
            }
            out
        }
    }
}

pub fn ntriples(triples: &[Triple]) -> String {
    let mut out = String::new();
    for triple in triples {
        out.push_str(&format!(
            "<{}> <{}> {} .\n",
            triple.subject,
            triple.predicate,
            ntriples_term(&triple.object)
        ));
    }
    out
}

/// Triples grouped by subject, subjects in first-seen order.
fn by_subject(triples: &[Triple]) -> Vec<(&str, Vec<&Triple>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Triple>)> = Vec::new();
    for triple in triples {
        let slot = *index.entry(triple.subject.as_str()).or_insert_with(|| {
            groups.push((triple.subject.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(triple);
    }
    groups
}

fn turtle_iri(iri: &str, used: &mut Vec<&'static str>) -> String {
    match vocab::compact(iri) {
        Some((prefix, local)) => {
            if !used.contains(&prefix) {
                used.push(prefix);
            }
            format!("{}:{}", prefix, local)
        }
        None => format!("<{}>", iri),
    }
}

pub fn turtle(triples: &[Triple]) -> String {
    let mut used: Vec<&'static str> = Vec::new();
    let mut body = String::new();

    for (subject, group) in by_subject(triples) {
        body.push_str(&format!("\n<{}>", subject));
        for (i, triple) in group.iter().enumerate() {
            let predicate = if triple.predicate == rdf::TYPE {
                "a".to_string()
            } else {
                turtle_iri(triple.predicate, &mut used)
            };
            let object = match &triple.object {
                Term::Iri(iri) => turtle_iri(iri, &mut used),
                Term::Literal {
                    value,
                    datatype: Some(datatype),
                    language: None,
                } => format!("\"{}\"^^{}", escape_literal(value), turtle_iri(datatype, &mut used)),
                literal => ntriples_term(literal),
            };
            let terminator = if i + 1 == group.len() { " ." } else { " ;" };
            body.push_str(&format!("\n    {} {}{}", predicate, object, terminator));
        }
        body.push('\n');
    }

    let mut out = String::new();
    for (prefix, namespace) in PREFIXES {
        if used.contains(prefix) {
            out.push_str(&format!("@prefix {}: <{}> .\n", prefix, namespace));
        }
    }
    out.push_str(&body);
    out
}

fn rdf_json_term(term: &Term) -> Value {
    match term {
        Term::Iri(iri) => json!({"type": "uri", "value": iri}),
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            let mut object = json!({"type": "literal", "value": value});
            if let Some(language) = language {
                object["lang"] = json!(language);
            } else if let Some(datatype) = datatype {
                object["datatype"] = json!(datatype);
            }
            object
        }
    }
}

/// RDF/JSON: subject → predicate → list of objects.
pub fn rdf_json(triples: &[Triple]) -> Value {
    let mut subjects = Map::new();
    for triple in triples {
        let predicates = subjects
            .entry(triple.subject.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(predicates) = predicates {
            let objects = predicates
                .entry(triple.predicate)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(objects) = objects {
                objects.push(rdf_json_term(&triple.object));
            }
        }
    }
    Value::Object(subjects)
}

/// Expanded JSON-LD: one node object per subject.
pub fn json_ld(triples: &[Triple]) -> Value {
    let nodes: Vec<Value> = by_subject(triples)
        .into_iter()
        .map(|(subject, group)| {
            let mut node = Map::new();
            node.insert("@id".to_string(), json!(subject));
            for triple in group {
                let (key, object) = match (&triple.object, triple.predicate == rdf::TYPE) {
                    (Term::Iri(iri), true) => ("@type".to_string(), json!(iri)),
                    (Term::Iri(iri), false) => (triple.predicate.to_string(), json!({"@id": iri})),
                    (
                        Term::Literal {
                            value,
                            datatype,
                            language,
                        },
                        _,
                    ) => {
                        let mut literal = json!({"@value": value});
                        if let Some(language) = language {
                            literal["@language"] = json!(language);
                        } else if let Some(datatype) = datatype {
                            literal["@type"] = json!(datatype);
                        }
                        (triple.predicate.to_string(), literal)
                    }
                };
                if let Value::Array(values) = node.entry(key).or_insert_with(|| Value::Array(Vec::new())) {
                    values.push(object);
                }
            }
            Value::Object(node)
        })
        .collect();
    Value::Array(nodes)
}

/// Qualified element name for a predicate, with a local namespace declaration when it has no known prefix.
fn xml_name(iri: &str) -> (String, Option<(String, String)>) {
    if let Some((prefix, local)) = vocab::compact(iri) {
        return (format!("{}:{}", prefix, local), None);
    }
    let split = iri.rfind(['#', '/']).map(|i| i + 1).unwrap_or(0);
    let (namespace, local) = iri.split_at(split);
    (
        format!("ns0:{}", local),
        Some(("xmlns:ns0".to_string(), namespace.to_string())),
    )
}

pub fn rdf_xml(triples: &[Triple]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("rdf:RDF");
    for (prefix, namespace) in PREFIXES {
        root.push_attribute((format!("xmlns:{}", prefix).as_str(), *namespace));
    }
    writer.write_event(Event::Start(root))?;

    for (subject, group) in by_subject(triples) {
        let mut description = BytesStart::new("rdf:Description");
        description.push_attribute(("rdf:about", subject));
        writer.write_event(Event::Start(description))?;

        for triple in group {
            let (name, namespace) = xml_name(triple.predicate);
            let mut element = BytesStart::new(name.as_str());
            if let Some((attr, value)) = &namespace {
                element.push_attribute((attr.as_str(), value.as_str()));
            }

            match &triple.object {
                Term::Iri(iri) => {
                    element.push_attribute(("rdf:resource", iri.as_str()));
                    writer.write_event(Event::Empty(element))?;
                }
                Term::Literal {
                    value,
                    datatype,
                    language,
                } => {
                    if let Some(language) = language {
                        element.push_attribute(("xml:lang", *language));
                    } else if let Some(datatype) = datatype {
                        element.push_attribute(("rdf:datatype", *datatype));
                    }
                    writer.write_event(Event::Start(element))?;
                    writer.write_event(Event::Text(BytesText::new(value)))?;
                    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
                }
            }
        }

        writer.write_event(Event::End(BytesEnd::new("rdf:Description")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn trix_term(writer: &mut Writer<Vec<u8>>, term: &Term) -> Result<()> {
    match term {
        Term::Iri(iri) => text_element(writer, BytesStart::new("uri"), iri),
        Term::Literal {
            value,
            datatype: Some(datatype),
            language: None,
        } => {
            let mut element = BytesStart::new("typedLiteral");
            element.push_attribute(("datatype", *datatype));
            text_element(writer, element, value)
        }
        Term::Literal {
            value, language, ..
        } => {
            let mut element = BytesStart::new("plainLiteral");
            if let Some(language) = language {
                element.push_attribute(("xml:lang", *language));
            }
            text_element(writer, element, value)
        }
    }
}

fn text_element(writer: &mut Writer<Vec<u8>>, start: BytesStart<'_>, text: &str) -> Result<()> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

/// TriX with a single graph named after the document.
pub fn trix(triples: &[Triple], graph_name: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("TriX");
    root.push_attribute(("xmlns", TRIX_NAMESPACE));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("graph")))?;
    text_element(&mut writer, BytesStart::new("uri"), graph_name)?;

    for triple in triples {
        writer.write_event(Event::Start(BytesStart::new("triple")))?;
        text_element(&mut writer, BytesStart::new("uri"), &triple.subject)?;
        text_element(&mut writer, BytesStart::new("uri"), triple.predicate)?;
        trix_term(&mut writer, &triple.object)?;
        writer.write_event(Event::End(BytesEnd::new("triple")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("TriX")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Summary of an entity for the HTML view.
#[derive(Debug, Serialize)]
pub struct EntityView {
    pub kind: Kind,
    pub page_id: u64,
    pub title: String,
    pub label: String,
    pub uri: String,
    pub doc_uri: String,
    pub wikipedia_uri: String,
    pub dbpedia_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_links: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikidata: Option<LinkView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freebase: Option<LinkView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<LinkView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<LinkView>,
}

#[derive(Debug, Serialize)]
pub struct LinkView {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        let page = entity.page();
        let mut view = EntityView {
            kind: page.kind(),
            page_id: page.page_id(),
            title: page.title.clone(),
            label: entity.label(),
            uri: page.uri(),
            doc_uri: page.doc_uri(),
            wikipedia_uri: page.wikipedia_uri(),
            dbpedia_uri: page.dbpedia_uri(),
            abstract_text: page.abstract_text().map(str::to_string),
            updated_at: page.updated_at.map(|t| t.to_rfc3339()),
            coordinates: None,
            external_links: Vec::new(),
            images: Vec::new(),
            wikidata: None,
            freebase: None,
            members: Vec::new(),
            subcategories: Vec::new(),
        };

        match entity {
            Entity::Thing(thing) => {
                view.coordinates = thing.coordinates;
                view.external_links = thing.external_links.clone();
                view.images = thing.images.clone();
                view.wikidata = thing.wikidata_item().map(|item| LinkView {
                    uri: item.uri(),
                    label: item.label.clone(),
                    description: item.description.clone(),
                });
                view.freebase = thing.freebase_topic().map(|topic| LinkView {
                    uri: topic.rdf_uri(),
                    label: topic.name.clone(),
                    description: None,
                });
            }
            Entity::Category(category) => {
                view.members = category
                    .members
                    .iter()
                    .map(|member| LinkView {
                        uri: member.page.uri(),
                        label: Some(member.label().to_string()),
                        description: None,
                    })
                    .collect();
                view.subcategories = category
                    .subcategories
                    .iter()
                    .map(|sub| LinkView {
                        uri: sub.page.uri(),
                        label: Some(sub.label()),
                        description: None,
                    })
                    .collect();
            }
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::thing::Thing;
    use crate::vocab::{foaf, rdfs, xsd};

    fn sample() -> Vec<Triple> {
        vec![
            Triple {
                subject: "http://www.dbpedialite.org/things/934787#id".to_string(),
                predicate: rdf::TYPE,
                object: Term::iri("http://www.w3.org/2002/07/owl#Thing"),
            },
            Triple {
                subject: "http://www.dbpedialite.org/things/934787#id".to_string(),
                predicate: rdfs::LABEL,
                object: Term::literal("Ceres, \"Fife\""),
            },
            Triple {
                subject: "http://en.wikipedia.org/wiki/Ceres,_Fife".to_string(),
                predicate: foaf::PAGE,
                object: Term::english("Ceres"),
            },
            Triple {
                subject: "http://www.dbpedialite.org/things/934787#id".to_string(),
                predicate: "http://www.w3.org/2003/01/geo/wgs84_pos#lat",
                object: Term::typed("56.29205", xsd::DOUBLE),
            },
        ]
    }

    #[test]
    fn suffix_lookup() {
        assert_eq!(Format::from_suffix("ttl").unwrap(), Format::Turtle);
        assert_eq!(Format::from_suffix(".nt").unwrap(), Format::NTriples);
        assert_eq!("rdf".parse::<Format>().unwrap(), Format::RdfXml);
        assert!(matches!(
            Format::from_suffix("pdf"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn every_format_round_trips_its_suffix() {
        for format in Format::all() {
            assert_eq!(Format::from_suffix(format.suffix()).unwrap(), format);
            assert_eq!(Format::from_mime(format.mime_type()), Some(format));
        }
    }

    #[test]
    fn negotiate_defaults_to_html() {
        assert_eq!(Format::negotiate(None).unwrap(), Format::Html);
        assert_eq!(Format::negotiate(Some("")).unwrap(), Format::Html);
        assert_eq!(Format::negotiate(Some("*/*")).unwrap(), Format::Html);
    }

    #[test]
    fn negotiate_honours_q_values() {
        assert_eq!(
            Format::negotiate(Some("text/html;q=0.5, text/turtle")).unwrap(),
            Format::Turtle
        );
        assert_eq!(
            Format::negotiate(Some("application/rdf+xml;q=0.9, application/ld+json;q=0.2")).unwrap(),
            Format::RdfXml
        );
        assert_eq!(
            Format::negotiate(Some("image/png, application/n-triples;q=0.1")).unwrap(),
            Format::NTriples
        );
    }

    #[test]
    fn negotiate_rejects_unknown() {
        assert!(matches!(
            Format::negotiate(Some("image/png")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(Format::negotiate(Some("text/turtle;q=0")).is_err());
    }

    #[test]
    fn ntriples_lines() {
        let out = ntriples(&sample());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "<http://www.dbpedialite.org/things/934787#id> <http://www.w3.org/2000/01/rdf-schema#label> \"Ceres, \\\"Fife\\\"\" ."
        );
        assert!(lines[2].ends_with("\"Ceres\"@en ."));
        assert!(lines[3].ends_with("\"56.29205\"^^<http://www.w3.org/2001/XMLSchema#double> ."));
    }

    #[test]
    fn turtle_groups_by_subject() {
        let out = turtle(&sample());
        assert!(out.starts_with("@prefix"));
        assert!(out.contains("@prefix owl: <http://www.w3.org/2002/07/owl#> ."));
        assert!(!out.contains("@prefix skos:"));
        assert_eq!(
            out.matches("<http://www.dbpedialite.org/things/934787#id>").count(),
            1
        );
        assert!(out.contains("    a owl:Thing ;"));
        assert!(out.contains("    geo:lat \"56.29205\"^^xsd:double ."));
        assert!(out.contains("    foaf:page \"Ceres\"@en ."));
    }

    #[test]
    fn rdf_json_shape() {
        let value = rdf_json(&sample());
        let subject = &value["http://www.dbpedialite.org/things/934787#id"];
        assert_eq!(
            subject[rdf::TYPE][0],
            json!({"type": "uri", "value": "http://www.w3.org/2002/07/owl#Thing"})
        );
        assert_eq!(
            value["http://en.wikipedia.org/wiki/Ceres,_Fife"][foaf::PAGE][0]["lang"],
            json!("en")
        );
    }

    #[test]
    fn json_ld_expanded() {
        let value = json_ld(&sample());
        let nodes = value.as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["@id"], json!("http://www.dbpedialite.org/things/934787#id"));
        assert_eq!(nodes[0]["@type"], json!(["http://www.w3.org/2002/07/owl#Thing"]));
        assert_eq!(
            nodes[0][rdfs::LABEL],
            json!([{"@value": "Ceres, \"Fife\""}])
        );
    }

    #[test]
    fn rdf_xml_document() {
        let out = rdf_xml(&sample()).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("<rdf:Description rdf:about=\"http://www.dbpedialite.org/things/934787#id\">"));
        assert!(out.contains("<rdf:type rdf:resource=\"http://www.w3.org/2002/07/owl#Thing\"/>"));
        assert!(out.contains("<foaf:page xml:lang=\"en\">Ceres</foaf:page>"));
        assert!(out.contains("Ceres, &quot;Fife&quot;"));
    }

    #[test]
    fn rdf_xml_unknown_predicate_gets_local_namespace() {
        let (name, namespace) = xml_name("http://example.com/vocab#thing");
        assert_eq!(name, "ns0:thing");
        assert_eq!(
            namespace,
            Some(("xmlns:ns0".to_string(), "http://example.com/vocab#".to_string()))
        );
    }

    #[test]
    fn trix_document() {
        let out = trix(&sample(), "http://www.dbpedialite.org/things/934787").unwrap();
        assert!(out.contains("<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\">"));
        assert!(out.contains("<uri>http://www.dbpedialite.org/things/934787</uri>"));
        assert!(out.contains("<plainLiteral xml:lang=\"en\">Ceres</plainLiteral>"));
        assert!(out.contains(
            "<typedLiteral datatype=\"http://www.w3.org/2001/XMLSchema#double\">56.29205</typedLiteral>"
        ));
        assert_eq!(out.matches("<triple>").count(), 4);
    }

    #[test]
    fn html_view_for_category() {
        let mut category = Category::new(4309010, "Category:Villages in Fife");
        category.members.push(Thing::new(934787, "Ceres, Fife"));
        let out = serialize(&Entity::Category(category), Format::Html).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["kind"], json!("category"));
        assert_eq!(value["label"], json!("Villages in Fife"));
        assert_eq!(value["members"][0]["label"], json!("Ceres, Fife"));
        assert!(value.get("subcategories").is_none());
    }

    #[test]
    fn serialize_every_format() {
        let entity = Entity::Thing(Thing::new(934787, "Ceres, Fife"));
        for format in Format::all() {
            let out = serialize(&entity, format).unwrap();
            assert!(!out.is_empty(), "{:?}", format);
        }
    }

    #[test]
    fn prebuilt_triples_match_serialize() {
        let entity = Entity::Thing(Thing::new(934787, "Ceres, Fife"));
        let triples = entity.to_triples();
        assert_eq!(
            serialize_triples(&entity, &triples, Format::NTriples).unwrap(),
            serialize(&entity, Format::NTriples).unwrap()
        );
        assert_eq!(
            serialize_triples(&entity, &triples[..1], Format::NTriples)
                .unwrap()
                .lines()
                .count(),
            1
        );
    }
}
