use crate::config::{
    ABSTRACT_MAX_LENGTH, ABSTRACT_TRUNCATE_LENGTH, DEFAULT_SCHEME, IMAGE_MIN_SIZE,
};
use crate::models::Coordinates;
use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

/// Placeholder left where a pronunciation guide was, so the enclosing brackets can be found later.
const IPA_MARKER: &str = "|IPAMARKER|";

/// Text a redirect page's first list item starts with.
const REDIRECT_MARKER: &str = "REDIRECT";

static COORDINATES_GEO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#coordinates span.geo").unwrap());

static GEO: Lazy<Selector> = Lazy::new(|| Selector::parse("span.geo").unwrap());

static IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.image img, .mw-file-description img").unwrap());

static EXTERNAL_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul > li > a.external").unwrap());

static LIST_ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());

static TITLED_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[title]").unwrap());

static REDIRECT_TEXT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".redirectText a[title]").unwrap());

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d\-.]+").unwrap());

static THUMB_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(\d+)px-(.+?)\.(\w+)$").unwrap());

static WIKIPEDIA_SELF_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w*):?//([\w-]+\.)*wikipedia\.org/").unwrap());

static PARSER_CACHE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Saved in parser cache with key (.+) and timestamp (\d+)").unwrap());

static EMPTY_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)").unwrap());

static MARKED_PRONUNCIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?\([^()]*?\|IPAMARKER\|[^()]*?\)").unwrap());

static MULTIPLE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

static TRAILING_PARTIAL_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]?\s*[\w'’-]*\z").unwrap());

/// Pronunciation phrases that carry no IPA markup. Tried in order; only the first rule that matches is applied.
static PRONUNCIATION_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r" ?\(IPA: ?[^)]*\)").unwrap(),
        Regex::new(r" ?\(pronounced:? ?\[[^\]]*\][^)]*\)").unwrap(),
        Regex::new(r"pronounced:? ?\[[^\]]*\]; ?").unwrap(),
    ]
});

/// Fields scraped from a page's rendered HTML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub abstract_text: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub images: Vec<String>,
    pub external_links: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub redirect_target: Option<String>,
}

/// Runs every extractor over a rendered page body. A redirect page yields only its target.
pub fn extract(body: &str) -> Extracted {
    let html = Html::parse_fragment(body);

    if let Some(target) = detect_redirect(&html) {
        return Extracted {
            redirect_target: Some(target),
            ..Default::default()
        };
    }

    let abstract_text = extract_abstract(&html);
    Extracted {
        abstract_text: (!abstract_text.is_empty()).then_some(abstract_text),
        coordinates: extract_coordinates(&html),
        images: extract_images(&html),
        external_links: extract_external_links(&html),
        updated_at: extract_updated_at(&html),
        redirect_target: None,
    }
}

/// Plain text of an HTML snippet such as a display title or search snippet.
pub fn clean_html_text(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Target title when the first list item of the body is a redirect notice.
pub fn detect_redirect(html: &Html) -> Option<String> {
    if let Some(link) = html.select(&REDIRECT_TEXT_LINK).next() {
        return link.value().attr("title").map(str::to_string);
    }

    let item = html.select(&LIST_ITEM).next()?;
    let text: String = item.text().collect();
    if !text.trim_start().starts_with(REDIRECT_MARKER) {
        return None;
    }

    item.select(&TITLED_LINK)
        .next()
        .and_then(|link| link.value().attr("title"))
        .map(str::to_string)
}

/// Lead paragraphs up to the table of contents, cleaned and length-bounded.
pub fn extract_abstract(html: &Html) -> String {
    let mut buffer = String::new();

    for node in top_level_blocks(html) {
        if node.value().name() == "p" {
            collect_text(node, &mut buffer);
            buffer.push('\n');
        }

        if is_toc(&node) || buffer.chars().count() > ABSTRACT_MAX_LENGTH {
            break;
        }
    }

    clean_abstract(&buffer)
}

/// Post-processing applied to the raw paragraph text.
pub fn clean_abstract(raw: &str) -> String {
    let text = raw.replace('\u{a0}', " ");
    let text = EMPTY_BRACKETS.replace_all(&text, "");
    let text = MARKED_PRONUNCIATION.replace_all(&text, "");
    let text = text.replace(IPA_MARKER, "");
    let text = strip_pronunciation(&text);
    let text = MULTIPLE_SPACES.replace_all(&text, " ");

    truncate_abstract(text.trim())
}

/// Applies the first matching pronunciation rule.
pub fn strip_pronunciation(text: &str) -> String {
    for rule in PRONUNCIATION_RULES.iter() {
        if rule.is_match(text) {
            return rule.replace_all(text, "").into_owned();
        }
    }
    text.to_string()
}

/// Cuts at a word boundary and appends an ellipsis when over the hard cap.
pub fn truncate_abstract(text: &str) -> String {
    if text.chars().count() <= ABSTRACT_TRUNCATE_LENGTH {
        return text.to_string();
    }

    let cut: String = text.chars().take(ABSTRACT_TRUNCATE_LENGTH - 3).collect();
    TRAILING_PARTIAL_WORD.replace(&cut, "...").into_owned()
}

pub fn extract_coordinates(html: &Html) -> Option<Coordinates> {
    let geo = html
        .select(&COORDINATES_GEO)
        .next()
        .or_else(|| html.select(&GEO).next())?;
    let text: String = geo.text().collect();

    let mut parts = NON_NUMERIC.split(&text).filter(|p| !p.is_empty());
    let lat = parts.next()?.parse::<f64>().ok()?;
    let long = parts.next()?.parse::<f64>().ok()?;
    Some(Coordinates { lat, long })
}

pub fn extract_images(html: &Html) -> Vec<String> {
    let mut images = Vec::new();

    for img in html.select(&IMAGE) {
        let element = img.value();
        if dimension(element.attr("width")) < IMAGE_MIN_SIZE
            || dimension(element.attr("height")) < IMAGE_MIN_SIZE
        {
            continue;
        }
        if let Some(src) = element.attr("src") {
            push_unique(&mut images, full_size_image_url(src));
        }
    }

    images
}

/// Rewrites a thumbnail URL to the original upload.
pub fn full_size_image_url(src: &str) -> String {
    let url = src.replacen("/thumb/", "/", 1);
    let url = THUMB_SUFFIX.replace(&url, "").into_owned();
    if url.starts_with("//") {
        format!("{}:{}", DEFAULT_SCHEME, url)
    } else {
        url
    }
}

pub fn extract_external_links(html: &Html) -> Vec<String> {
    let mut links = Vec::new();

    for anchor in html.select(&EXTERNAL_LINK) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if WIKIPEDIA_SELF_LINK.is_match(href) {
            continue;
        }
        push_unique(&mut links, href.to_string());
    }

    links
}

/// Render time from the trailing parser-cache comment.
pub fn extract_updated_at(html: &Html) -> Option<DateTime<Utc>> {
    html.root_element()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Comment(comment) => PARSER_CACHE_COMMENT
                .captures(comment)
                .and_then(|caps| NaiveDateTime::parse_from_str(&caps[2], "%Y%m%d%H%M%S").ok()),
            _ => None,
        })
        .last()
        .map(|timestamp| timestamp.and_utc())
}

/// Children of the parser output wrapper if present, else of the fragment root.
fn top_level_blocks(html: &Html) -> Vec<ElementRef<'_>> {
    let root = html.root_element();
    let elements: Vec<ElementRef<'_>> = root.children().filter_map(ElementRef::wrap).collect();

    if let [wrapper] = elements.as_slice() {
        if wrapper.value().name() == "div" && has_class(wrapper, "mw-parser-output") {
            return wrapper.children().filter_map(ElementRef::wrap).collect();
        }
    }
    elements
}

fn collect_text(element: ElementRef<'_>, buffer: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buffer.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_noise(&child) {
                    continue;
                }
                if is_pronunciation(&child) {
                    buffer.push_str(IPA_MARKER);
                    continue;
                }
                collect_text(child, buffer);
            }
            _ => {}
        }
    }
}

fn is_noise(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    match value.name() {
        "style" | "script" => return true,
        "sup" if has_class(element, "reference") => return true,
        "a" if element.text().collect::<String>() == "listen" => return true,
        _ => {}
    }
    has_class(element, "metadata") || has_class(element, "noprint") || value.id() == Some("coordinates")
}

/// An IPA element, or a span whose direct child is one.
fn is_pronunciation(element: &ElementRef<'_>) -> bool {
    if has_class(element, "IPA") {
        return true;
    }
    element.value().name() == "span"
        && element
            .children()
            .filter_map(ElementRef::wrap)
            .any(|child| has_class(&child, "IPA"))
}

fn is_toc(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    value.id() == Some("toc")
        || has_class(element, "toc")
        || (value.name() == "meta" && value.attr("property") == Some("mw:PageProp/toc"))
}

fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn dimension(value: Option<&str>) -> u32 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}
