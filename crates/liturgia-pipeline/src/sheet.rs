//! The mass sheet consumed by the parish web site

use liturgia_core::text::{slugify, to_roman};
use liturgia_core::{
    AntiphonKind, Category, LiturgicalDate, ReadingSet, Recommendation, Season,
};
use liturgia_match::MatchReport;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Confiteor, printed for the penitential act
pub const PENITENTIAL_ACT: &str = "Confesso a Dio onnipotente e a voi, fratelli e sorelle, che ho molto peccato in pensieri, parole, opere e omissioni, per mia colpa, mia colpa, mia grandissima colpa. E supplico la beata sempre Vergine Maria, gli angeli, i santi e voi, fratelli e sorelle, di pregare per me il Signore Dio nostro.";

/// Output artifact. Field names are fixed by the web consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassSheet {
    pub title: String,
    pub numero: u32,
    pub anno: String,
    pub colore: String,
    pub antifona_ingresso: String,
    pub canto_ingresso: String,
    pub atto_penitenziale: String,
    pub prima_lettura_testo: String,
    pub salmo_link: String,
    pub salmo_testo: String,
    pub seconda_lettura_testo: String,
    pub versetto_vangelo: String,
    pub vangelo: String,
    pub canto_offertorio: String,
    pub canto_comunione: String,
    pub antifona_alla_comunione: String,
    pub canto_finale: String,
    pub liturgical_date: LiturgicalDate,
    pub recommendations: Vec<Recommendation>,
}

/// Builds a [`MassSheet`] from the resolved date, readings and hymns
#[derive(Debug, Clone)]
pub struct SheetAssembler {
    colour: Option<String>,
    hymn_link_base: String,
    psalm_link_template: String,
}

impl SheetAssembler {
    pub fn new(config: &Config) -> Self {
        Self {
            colour: config.colour.clone(),
            hymn_link_base: config.hymn_link_base.clone(),
            psalm_link_template: config.psalm_link_template.clone(),
        }
    }

    pub fn assemble(&self, day: &LiturgicalDate, readings: &ReadingSet, report: &MatchReport) -> MassSheet {
        let hymn = |category: Category| {
            report
                .get(category)
                .map(|r| self.hymn_link(&r.title))
                .unwrap_or_default()
        };
        let antiphon = |kind: AntiphonKind| {
            readings
                .antiphon(kind)
                .map(|a| format_text(a, false))
                .unwrap_or_default()
        };

        MassSheet {
            title: title(day),
            numero: day.sunday_ordinal,
            anno: day.cycle.to_string(),
            colore: self
                .colour
                .clone()
                .unwrap_or_else(|| day.season.colour().to_string()),
            antifona_ingresso: antiphon(AntiphonKind::Entrance),
            canto_ingresso: hymn(Category::Entrance),
            atto_penitenziale: PENITENTIAL_ACT.to_string(),
            prima_lettura_testo: format_text(&readings.first_reading, true),
            salmo_link: self.psalm_link(day),
            salmo_testo: format_text(&readings.psalm, false),
            seconda_lettura_testo: readings
                .second_reading
                .as_deref()
                .map(|t| format_text(t, true))
                .unwrap_or_default(),
            versetto_vangelo: readings
                .gospel_acclamation
                .as_deref()
                .map(|t| format_text(t, false))
                .unwrap_or_default(),
            vangelo: format_text(&readings.gospel, true),
            canto_offertorio: hymn(Category::Offertory),
            canto_comunione: hymn(Category::Communion),
            antifona_alla_comunione: antiphon(AntiphonKind::Communion),
            canto_finale: hymn(Category::Closing),
            liturgical_date: *day,
            recommendations: report.recommendations.clone(),
        }
    }

    pub fn hymn_link(&self, title: &str) -> String {
        format!(
            "<a href='{}{}' target='_blank'>{}</a>",
            self.hymn_link_base,
            slugify(title),
            escape_html(title)
        )
    }

    pub fn psalm_link(&self, day: &LiturgicalDate) -> String {
        let letter = day.cycle.to_string();
        self.psalm_link_template
            .replace("{tempo}", day.season.tag())
            .replace("{anno_lower}", &letter.to_lowercase())
            .replace("{anno}", &letter)
            .replace("{numero}", &day.sunday_ordinal.to_string())
    }
}

/// Sheet heading, e.g. "XIV Domenica del Tempo Ordinario - Anno B"
pub fn title(day: &LiturgicalDate) -> String {
    let name = match day.celebration {
        Some(celebration) => celebration.display_name().to_string(),
        None if day.sunday_ordinal == 0 => day.season.display_name().to_string(),
        None => {
            let unit = if day.is_sunday() { "Domenica" } else { "Settimana" };
            format!("{} {} {}", to_roman(day.sunday_ordinal), unit, season_phrase(day.season))
        }
    };
    format!("{} - Anno {}", name, day.cycle)
}

fn season_phrase(season: Season) -> &'static str {
    match season {
        Season::Advent => "di Avvento",
        Season::Christmas => "dopo Natale",
        Season::OrdinaryTime => "del Tempo Ordinario",
        Season::Lent => "di Quaresima",
        Season::Triduum => "del Triduo Pasquale",
        Season::Easter => "di Pasqua",
    }
}

/// Plain text to the sheet's light HTML: line breaks become `<br>`, and
/// with `bold_first` the first line (the reference) is wrapped in `<strong>`.
pub fn format_text(raw: &str, bold_first: bool) -> String {
    let escaped = escape_html(raw.trim());
    let lines: Vec<&str> = escaped.lines().collect();

    match lines.split_first() {
        Some((first, rest)) if bold_first && !rest.is_empty() => {
            format!("<strong>{}</strong><br>{}", first, rest.join("<br>"))
        }
        _ => lines.join("<br>"),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
