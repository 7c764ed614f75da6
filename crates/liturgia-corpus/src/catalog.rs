//! Hymn catalog file format
//!
//! Accepts both the English schema and the legacy Italian `canti.json`:
//!
//! ```json
//! { "hymns": [ { "id": "servo-per-amore", "title": "Servo per amore",
//!                "categories": ["offertory"], "seasons": [], "text": "..." } ] }
//!
//! { "canti": [ { "titolo": "Servo per amore", "tipologia": "offertorio, finale",
//!                "tempo": "qualsiasi", "testo": "<p>...</p>" } ] }
//! ```
//!
//! Tag fields may be a list or a comma-separated string. Moments that are
//! not one of the four hymn moments (e.g. "gloria") are ignored; an entry
//! left with no moment at all is skipped.
//!
//! The legacy file is more forgiving. An entry whose `tipologia` is null or
//! empty is skipped, and entries without an `id` whose titles slug to the
//! same id are merged into one hymn.

use std::collections::{BTreeSet, HashMap};

use liturgia_core::text::{normalize_lines, slugify};
use liturgia_core::{Category, Hymn, LiturgiaError, Result, Season};
use scraper::Html;
use serde::Deserialize;
use tracing::{debug, warn};

/// Season tags meaning "no restriction"
const ANY_SEASON_TAGS: &[&str] = &["qualsiasi", "any", "tutti", "sempre"];

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    hymns: Option<Vec<CatalogEntry>>,
    #[serde(default)]
    canti: Option<Vec<CatalogEntry>>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "titolo")]
    title: String,
    #[serde(alias = "tipologia", default)]
    categories: Option<TagList>,
    #[serde(alias = "tempo", default)]
    seasons: Option<TagList>,
    #[serde(alias = "testo", default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagList {
    List(Vec<String>),
    Joined(String),
}

impl TagList {
    fn tags(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            TagList::List(items) => items.iter().map(String::as_str).collect(),
            TagList::Joined(s) => s.split(',').collect(),
        };
        raw.into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Parse catalog JSON into hymn records, in file order.
pub fn parse_catalog(json: &str) -> Result<Vec<Hymn>> {
    let file: CatalogFile = serde_json::from_str(json)
        .map_err(|e| LiturgiaError::CorpusLoad(format!("malformed catalog: {}", e)))?;

    let (entries, legacy) = match (file.hymns, file.canti) {
        (Some(entries), _) => (entries, false),
        (None, Some(entries)) => (entries, true),
        (None, None) => {
            return Err(LiturgiaError::CorpusLoad(
                "catalog has neither a 'hymns' nor a 'canti' list".into(),
            ))
        }
    };

    let mut hymns: Vec<Hymn> = Vec::with_capacity(entries.len());
    let mut slugged: HashMap<String, usize> = HashMap::new();
    for (position, entry) in entries.into_iter().enumerate() {
        let explicit_id = entry.id.as_deref().is_some_and(|id| !id.trim().is_empty());
        let Some(hymn) = entry_to_hymn(position, entry, legacy)? else {
            continue;
        };

        if legacy && !explicit_id {
            if let Some(&idx) = slugged.get(&hymn.id) {
                debug!("Merging repeated entry '{}' into '{}'", hymn.title, hymns[idx].id);
                absorb(&mut hymns[idx], hymn);
                continue;
            }
            slugged.insert(hymn.id.clone(), hymns.len());
        }
        hymns.push(hymn);
    }
    Ok(hymns)
}

/// Fold a repeated legacy entry into the first one with the same slug.
///
/// Moments are unioned. Seasons are unioned too, except that an entry
/// without seasons (any season) lifts the restriction.
fn absorb(target: &mut Hymn, other: Hymn) {
    target.categories.extend(other.categories);
    if target.seasons.is_empty() || other.seasons.is_empty() {
        target.seasons.clear();
    } else {
        target.seasons.extend(other.seasons);
    }
    if target.text.is_empty() {
        target.text = other.text;
    }
}

fn entry_to_hymn(position: usize, entry: CatalogEntry, legacy: bool) -> Result<Option<Hymn>> {
    let title = entry.title.trim().to_string();
    if title.is_empty() {
        return Err(LiturgiaError::CorpusLoad(format!("entry #{} has an empty title", position)));
    }

    let category_tags = entry.categories.map(|c| c.tags()).unwrap_or_default();
    if category_tags.is_empty() {
        if legacy {
            warn!("Skipping hymn '{}': no tipologia", title);
            return Ok(None);
        }
        return Err(LiturgiaError::CorpusLoad(format!("hymn '{}' lists no moment", title)));
    }

    let mut categories = BTreeSet::new();
    for tag in &category_tags {
        match Category::from_tag(tag) {
            Some(c) => {
                categories.insert(c);
            }
            None => debug!("Hymn '{}': ignoring moment '{}'", title, tag),
        }
    }
    if categories.is_empty() {
        warn!("Skipping hymn '{}': none of {:?} is a hymn moment", title, category_tags);
        return Ok(None);
    }

    let mut seasons = BTreeSet::new();
    for tag in entry.seasons.map(|s| s.tags()).unwrap_or_default() {
        if ANY_SEASON_TAGS.contains(&tag.as_str()) {
            continue;
        }
        match Season::from_tag(&tag) {
            Some(s) => {
                seasons.insert(s);
            }
            None => warn!("Hymn '{}': unknown season '{}', treating as any season", title, tag),
        }
    }

    let id = match entry.id.map(|s| s.trim().to_string()) {
        Some(id) if !id.is_empty() => id,
        _ => slugify(&title),
    };

    Ok(Some(Hymn {
        id,
        title,
        categories,
        seasons,
        text: plain_text(entry.text.as_deref().unwrap_or_default()),
    }))
}

/// Strip markup from a hymn text, keeping line structure.
pub fn plain_text(raw: &str) -> String {
    if !raw.contains('<') {
        return normalize_lines(raw);
    }

    // Line breaks would otherwise glue the last word of a line to the next.
    let spaced = raw
        .replace("<br>", "\n<br>")
        .replace("<br/>", "\n<br/>")
        .replace("<br />", "\n<br />")
        .replace("</p>", "\n</p>");
    let fragment = Html::parse_fragment(&spaced);
    let text: String = fragment.root_element().text().collect();
    normalize_lines(&text)
}
