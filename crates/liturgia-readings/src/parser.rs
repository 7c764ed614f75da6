//! Parser for the readings page of the Italian bishops' conference

use chrono::NaiveDate;
use liturgia_core::{Antiphon, AntiphonKind, LiturgiaError, ReadingSet, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

const BLOCK_SELECTOR: &str = "div.cci-liturgia-giorno-dettagli-content";
const TITLE_SELECTOR: &str = "h2.cci-liturgia-giorno-section-title";
const CONTENT_SELECTOR: &str = "div.cci-liturgia-giorno-section-content";

/// Section of the page, identified by its heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    CommunionAntiphon,
    EntranceAntiphon,
    GospelAcclamation,
    FirstReading,
    Psalm,
    SecondReading,
    Gospel,
}

/// Heading prefixes, longest match first: "Antifona" must not catch the
/// communion antiphon.
const HEADINGS: [(&str, Section); 7] = [
    ("Antifona alla comunione", Section::CommunionAntiphon),
    ("Antifona", Section::EntranceAntiphon),
    ("Acclamazione al Vangelo", Section::GospelAcclamation),
    ("Prima Lettura", Section::FirstReading),
    ("Salmo Responsoriale", Section::Psalm),
    ("Seconda Lettura", Section::SecondReading),
    ("Vangelo", Section::Gospel),
];

impl Section {
    fn from_heading(heading: &str) -> Option<Self> {
        HEADINGS
            .iter()
            .find(|(prefix, _)| heading.starts_with(prefix))
            .map(|(_, section)| *section)
    }
}

#[derive(Default)]
struct Collected {
    entrance_antiphon: Option<String>,
    communion_antiphon: Option<String>,
    acclamation: Option<String>,
    first_reading: Option<String>,
    psalm: Option<String>,
    second_reading: Option<String>,
    gospel: Option<String>,
}

impl Collected {
    fn slot(&mut self, section: Section) -> &mut Option<String> {
        match section {
            Section::CommunionAntiphon => &mut self.communion_antiphon,
            Section::EntranceAntiphon => &mut self.entrance_antiphon,
            Section::GospelAcclamation => &mut self.acclamation,
            Section::FirstReading => &mut self.first_reading,
            Section::Psalm => &mut self.psalm,
            Section::SecondReading => &mut self.second_reading,
            Section::Gospel => &mut self.gospel,
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| LiturgiaError::Retrieval(format!("bad selector '{}': {}", css, e)))
}

/// Text nodes of an element, trimmed, one per line
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the readings and antiphons from a readings page.
///
/// Blocks without a heading or a body are skipped, as are headings that name
/// none of the known sections. When a section occurs twice the first one is
/// kept. The first reading, psalm and gospel are mandatory.
pub fn parse_readings(html: &str, date: NaiveDate) -> Result<ReadingSet> {
    let document = Html::parse_document(html);
    let blocks = selector(BLOCK_SELECTOR)?;
    let titles = selector(TITLE_SELECTOR)?;
    let contents = selector(CONTENT_SELECTOR)?;

    let mut collected = Collected::default();
    for block in document.select(&blocks) {
        let (Some(title), Some(content)) = (block.select(&titles).next(), block.select(&contents).next()) else {
            continue;
        };

        let heading = element_text(title).replace('\n', " ");
        let Some(section) = Section::from_heading(&heading) else {
            debug!("Ignoring section '{}'", heading);
            continue;
        };

        let text = element_text(content);
        let slot = collected.slot(section);
        if slot.is_some() {
            debug!("Section '{}' repeated, keeping the first", heading);
        } else if !text.is_empty() {
            *slot = Some(text);
        }
    }

    let mut missing = Vec::new();
    if collected.first_reading.is_none() {
        missing.push("Prima Lettura");
    }
    if collected.psalm.is_none() {
        missing.push("Salmo Responsoriale");
    }
    if collected.gospel.is_none() {
        missing.push("Vangelo");
    }
    if !missing.is_empty() {
        return Err(LiturgiaError::Retrieval(format!(
            "readings page for {} lacks: {}",
            date,
            missing.join(", ")
        )));
    }

    let mut antiphons = Vec::new();
    if let Some(text) = collected.entrance_antiphon {
        antiphons.push(Antiphon { kind: AntiphonKind::Entrance, text });
    }
    if let Some(text) = collected.communion_antiphon {
        antiphons.push(Antiphon { kind: AntiphonKind::Communion, text });
    }
    if antiphons.is_empty() {
        warn!("No antiphons found for {}", date);
    }

    Ok(ReadingSet {
        date,
        first_reading: collected.first_reading.unwrap_or_default(),
        psalm: collected.psalm.unwrap_or_default(),
        second_reading: collected.second_reading,
        gospel_acclamation: collected.acclamation,
        gospel: collected.gospel.unwrap_or_default(),
        antiphons,
    })
}
