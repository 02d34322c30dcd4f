use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

use crate::keywords::top_keywords;
use crate::score::{ScoreSignals, calculate_score};

pub const NO_TITLE_SENTINEL: &str = "No title found";

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("selector"));
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).expect("selector"));
static META_VIEWPORT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="viewport"]"#).expect("selector"));
static META_PROPERTY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property]").expect("selector"));
static LINK_CANONICAL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"link[rel="canonical"]"#).expect("selector"));
static LD_JSON: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).expect("selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("selector"));
static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").expect("selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("selector"));
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("selector"));

/// Flat set of SEO signals extracted from a single fetched page.
#[derive(Debug, Clone, Serialize)]
pub struct PageMetrics {
    pub url: String,
    pub title: String,
    pub meta_description: Option<String>,
    pub h1_count: u32,
    pub h2_count: u32,
    pub image_count: u32,
    pub missing_alt_count: u32,
    pub word_count: u32,
    pub internal_links_count: u32,
    pub external_links_count: u32,
    pub canonical_url: Option<String>,
    pub og_tags_present: bool,
    pub schema_present: bool,
    pub has_meta_viewport: bool,
    pub robots_txt_exists: bool,
    pub sitemap_exists: bool,
    pub top_keywords: Vec<String>,
    pub load_time: f64,
    pub seo_score: u8,
}

/// Extracts all page-level signals and the derived score from a parsed
/// document. Deterministic; malformed markup degrades to absent/zero
/// signals. The robots/sitemap flags are filled in by the caller from
/// existence probes, not from the document.
pub fn extract_metrics(document: &Html, base_url: &Url, load_time: f64) -> PageMetrics {
    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let meta_description = document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let h1_count = document.select(&H1).count() as u32;
    let h2_count = document.select(&H2).count() as u32;

    let mut image_count = 0u32;
    let mut missing_alt_count = 0u32;
    for img in document.select(&IMG) {
        image_count += 1;
        let alt = img.value().attr("alt").unwrap_or_default();
        if alt.trim().is_empty() {
            missing_alt_count += 1;
        }
    }

    let (internal_links_count, external_links_count) = count_links(document, base_url);

    let canonical_url = document
        .select(&LINK_CANONICAL)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(String::from);

    let og_tags_present = document.select(&META_PROPERTY).any(|el| {
        el.value()
            .attr("property")
            .is_some_and(|p| p.starts_with("og:"))
    });
    let schema_present = document.select(&LD_JSON).next().is_some();
    let has_meta_viewport = document.select(&META_VIEWPORT).next().is_some();

    let body_text = visible_body_text(document);
    let word_count = body_text.split_whitespace().count() as u32;
    let top_keywords = top_keywords(&body_text);

    let seo_score = calculate_score(&ScoreSignals {
        title: title.as_deref(),
        meta_description: meta_description.as_deref(),
        h1_count,
        h2_count,
        image_count,
        missing_alt_count,
        has_meta_viewport,
        has_canonical: canonical_url.is_some(),
    });

    PageMetrics {
        url: base_url.to_string(),
        title: title.unwrap_or_else(|| NO_TITLE_SENTINEL.to_string()),
        meta_description,
        h1_count,
        h2_count,
        image_count,
        missing_alt_count,
        word_count,
        internal_links_count,
        external_links_count,
        canonical_url,
        og_tags_present,
        schema_present,
        has_meta_viewport,
        robots_txt_exists: false,
        sitemap_exists: false,
        top_keywords,
        load_time,
        seo_score,
    }
}

/// Classifies every usable anchor as internal or external to the page's
/// host. Fragment-only, javascript:, mailto: and tel: links count as
/// neither.
fn count_links(document: &Html, base_url: &Url) -> (u32, u32) {
    let mut internal = 0u32;
    let mut external = 0u32;

    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let lower = href.to_ascii_lowercase();
        if lower.starts_with("javascript:")
            || lower.starts_with("mailto:")
            || lower.starts_with("tel:")
        {
            continue;
        }

        let Ok(resolved) = base_url.join(href) else {
            continue;
        };
        match resolved.host_str() {
            Some(host) if Some(host) == base_url.host_str() => internal += 1,
            Some(_) => external += 1,
            // No host after resolution means a relative-style target.
            None => internal += 1,
        }
    }

    (internal, external)
}

/// Text content of the body with script/style/noscript subtrees removed.
fn visible_body_text(document: &Html) -> String {
    let mut out = String::new();
    if let Some(body) = document.select(&BODY).next() {
        collect_text(body, &mut out);
    }
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            if matches!(el.value().name(), "script" | "style" | "noscript") {
                continue;
            }
            collect_text(el, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}
