// Article HTML model: what kind of page came back, and which links its body
// exposes to a player.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};

/// Banner text Wikipedia renders on its "no such article" page.
pub const MISSING_ARTICLE_NOTICE: &str = "Wikipedia does not have an article with this exact name.";

/// Hrefs longer than this are treated as noise rather than article links.
pub const DEFAULT_MAX_LINK_LENGTH: usize = 40;

const ARTICLE_PREFIX: &str = "/wiki/";

const ASSET_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".pdf", ".webm", ".ogg",
];

const NON_DOCUMENT_NAMESPACES: &[&str] = &["file:", "image:", "special:", "media:"];

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#bodyContent").expect("valid selector"));
static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static MBOX_TEXT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.mbox-text").expect("valid selector"));
static DISAMBIGUATION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#disambigbox, .dmbox-disambig, #disambig").expect("valid selector")
});
static REDIRECTED_FROM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".mw-redirectedfrom").expect("valid selector"));

/// What a fetched page turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStatus {
    Article,
    Missing,
    Disambiguation,
    Redirect,
    NoBody,
}

impl ArticleStatus {
    /// Only a real article counts as an existing node; everything else is a soft 404.
    pub fn exists(self) -> bool {
        matches!(self, ArticleStatus::Article)
    }
}

/// Classify a page from its HTML.
pub fn classify(html: &str) -> ArticleStatus {
    let document = Html::parse_document(html);

    let Some(body) = document.select(&BODY).next() else {
        return ArticleStatus::NoBody;
    };

    let missing = body.select(&MBOX_TEXT).any(|cell| {
        let text: String = cell.text().collect::<Vec<_>>().join(" ");
        text.contains(MISSING_ARTICLE_NOTICE)
    });
    if missing {
        return ArticleStatus::Missing;
    }

    if document.select(&DISAMBIGUATION).next().is_some() {
        return ArticleStatus::Disambiguation;
    }

    if document.select(&REDIRECTED_FROM).next().is_some() {
        return ArticleStatus::Redirect;
    }

    ArticleStatus::Article
}

/// An outgoing article link found in a page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    /// Raw href as written in the page, e.g. `/wiki/Persia#History`.
    pub href: String,
    /// Article name the link points at, e.g. `Persia`.
    pub name: String,
}

/// Rules deciding which body links are playable moves.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    pub max_link_length: usize,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            max_link_length: DEFAULT_MAX_LINK_LENGTH,
        }
    }
}

impl LinkFilter {
    /// Article name for an href, or `None` when the href is not a playable link.
    pub fn article_name(&self, href: &str) -> Option<String> {
        if href.len() > self.max_link_length {
            return None;
        }
        let rest = href.strip_prefix(ARTICLE_PREFIX)?;

        let lower = href.to_lowercase();
        if ASSET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return None;
        }

        let name = rest.split(['#', '?']).next().unwrap_or_default();
        if name.is_empty() || name.contains('/') {
            return None;
        }

        // Hrefs are percent-encoded; node names are not.
        let name = urlencoding::decode(name).ok()?;

        let lower_name = name.to_lowercase();
        if NON_DOCUMENT_NAMESPACES
            .iter()
            .any(|ns| lower_name.starts_with(ns))
        {
            return None;
        }

        Some(name.into_owned())
    }
}

/// Extract playable links from the body of an article.
///
/// Returns `None` when the page has no body content at all. Links keep
/// document order, are de-duplicated by case-insensitive name, and never
/// point back at `self_name`.
pub fn extract_article_links(
    html: &str,
    self_name: &str,
    filter: &LinkFilter,
) -> Option<Vec<ArticleLink>> {
    let document = Html::parse_document(html);
    let body = document.select(&BODY).next()?;

    let self_key = self_name.to_lowercase();
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in body.select(&ANCHORS) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        let Some(name) = filter.article_name(href) else {
            continue;
        };

        let key = name.to_lowercase();
        if key == self_key || !seen.insert(key) {
            continue;
        }

        links.push(ArticleLink {
            href: href.to_string(),
            name,
        });
    }

    Some(links)
}
