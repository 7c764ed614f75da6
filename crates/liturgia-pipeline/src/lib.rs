//! Liturgia Pipeline - From a date to a mass sheet
//!
//! Runs the stages in order: resolve the liturgical date, fetch the readings,
//! match hymns, assemble the sheet and optionally write it to disk. The
//! embedding model and the hymn corpus are initialized on first use and then
//! reused by every later run of the same [`Pipeline`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use liturgia_core::{calendar, LiturgicalDate, Result};
use liturgia_corpus::{CorpusCache, HymnCorpus};
use liturgia_embeddings::{BertEmbedder, Embedder, HashEmbedder, ModelHolder};
use liturgia_match::{MatchOptions, MatchReport, Matcher};
use liturgia_readings::{HttpReadingsGateway, ReadingsGateway};
use tracing::info;

mod config;
mod sheet;
mod writer;

pub use config::{Config, DEFAULT_CONFIG_FILE, DEFAULT_HYMN_LINK_BASE, DEFAULT_PSALM_LINK_TEMPLATE};
pub use sheet::{format_text, title, MassSheet, SheetAssembler, PENITENTIAL_ACT};
pub use writer::{artifact_name, write_sheet};

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub liturgical_date: LiturgicalDate,
    pub report: MatchReport,
    pub sheet: MassSheet,
    /// Where the sheet was written, when saving is enabled
    pub saved_to: Option<PathBuf>,
}

pub struct Pipeline {
    config: Config,
    gateway: Box<dyn ReadingsGateway>,
    models: ModelHolder,
    corpora: CorpusCache,
    assembler: SheetAssembler,
}

impl Pipeline {
    /// Pipeline reading from the configured web source
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let gateway = HttpReadingsGateway::new(
            config.readings_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::with_gateway(config, Box::new(gateway)))
    }

    pub fn with_gateway(config: Config, gateway: Box<dyn ReadingsGateway>) -> Self {
        let assembler = SheetAssembler::new(&config);
        Self {
            config,
            gateway,
            models: ModelHolder::new(),
            corpora: CorpusCache::new(),
            assembler,
        }
    }

    /// Use `embedder` instead of the configured model
    pub fn with_embedder(self, embedder: Arc<dyn Embedder>) -> Self {
        self.models.set(embedder);
        self.corpora.reset();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The sentence model in `model_dir` if configured, else the hashing model
    pub fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        self.models.get_or_init(|| match &self.config.model_dir {
            Some(dir) => Ok(Arc::new(BertEmbedder::load(dir)?) as Arc<dyn Embedder>),
            None => Ok(Arc::new(HashEmbedder::new(self.config.embedding_dim)?) as Arc<dyn Embedder>),
        })
    }

    pub fn corpus(&self) -> Result<Arc<HymnCorpus>> {
        let embedder = self.embedder()?;
        self.corpora.get_or_load(&self.config.catalog_path, embedder)
    }

    /// Produce the sheet for `date`
    pub fn run(&self, date: NaiveDate) -> Result<PipelineOutput> {
        let start_total = Instant::now();

        let day = calendar::resolve(date);
        info!(
            "{}: {} (ordinal {}), year {}",
            date,
            day.season.display_name(),
            day.sunday_ordinal,
            day.cycle
        );

        let start_fetch = Instant::now();
        let readings = self.gateway.fetch(date)?;
        let fetch_duration = start_fetch.elapsed();

        let start_match = Instant::now();
        let corpus = self.corpus()?;
        let options = MatchOptions {
            season: self.config.season_filter.then_some(day.season),
        };
        let report = Matcher::new(options).run(&readings, &corpus)?;
        let match_duration = start_match.elapsed();

        let sheet = self.assembler.assemble(&day, &readings, &report);
        let saved_to = if self.config.save {
            Some(write_sheet(&sheet, date, &self.config.output_dir)?)
        } else {
            None
        };

        info!(
            "Built '{}': fetch={:?}, match={:?}, total={:?}",
            sheet.title,
            fetch_duration,
            match_duration,
            start_total.elapsed()
        );

        Ok(PipelineOutput {
            liturgical_date: day,
            report,
            sheet,
            saved_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liturgia_core::{Category, LiturgiaError};
    use liturgia_readings::FileReadingsGateway;

    const PAGE: &str = r#"
        <div class="cci-liturgia-giorno-dettagli-content">
          <h2 class="cci-liturgia-giorno-section-title">Prima Lettura</h2>
          <div class="cci-liturgia-giorno-section-content"><p>Dal libro dell'Esodo</p><p>Ecco, io sto per far piovere pane dal cielo</p></div>
        </div>
        <div class="cci-liturgia-giorno-dettagli-content">
          <h2 class="cci-liturgia-giorno-section-title">Salmo Responsoriale</h2>
          <div class="cci-liturgia-giorno-section-content"><p>Donò loro pane del cielo</p></div>
        </div>
        <div class="cci-liturgia-giorno-dettagli-content">
          <h2 class="cci-liturgia-giorno-section-title">Vangelo</h2>
          <div class="cci-liturgia-giorno-section-content"><p>Dal Vangelo secondo Giovanni</p><p>Io sono il pane della vita</p></div>
        </div>"#;

    const CATALOG: &str = r#"{"canti": [
        {"titolo": "Pane di vita nuova", "tipologia": "comunione", "testo": "Pane di vita nuova, vero cibo dato agli uomini"},
        {"titolo": "Servo per amore", "tipologia": "offertorio", "testo": "Una notte di sudore sulla barca in mezzo al mare"},
        {"titolo": "Popoli tutti", "tipologia": "ingresso, finale", "testo": "Mio Dio, Signore, nulla è pari a te"}
    ]}"#;

    fn setup(save: bool) -> (tempfile::TempDir, Pipeline) {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("letture.html");
        let catalog = dir.path().join("canti.json");
        std::fs::write(&page, PAGE).unwrap();
        std::fs::write(&catalog, CATALOG).unwrap();

        let config = Config {
            catalog_path: catalog,
            output_dir: dir.path().join("out"),
            save,
            embedding_dim: 128,
            ..Config::default()
        };
        let pipeline = Pipeline::with_gateway(config, Box::new(FileReadingsGateway::new(page)));
        (dir, pipeline)
    }

    #[test]
    fn test_run_writes_sheet() {
        let (dir, pipeline) = setup(true);
        let date = NaiveDate::from_ymd_opt(2024, 8, 4).unwrap();
        let output = pipeline.run(date).unwrap();

        let path = output.saved_to.unwrap();
        assert_eq!(path, dir.path().join("out").join("messa_20240804.json"));

        let written: MassSheet = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.vangelo, output.sheet.vangelo);
        assert_eq!(written.liturgical_date, output.liturgical_date);
        assert_eq!(written.title, "XVIII Domenica del Tempo Ordinario - Anno B");
        assert!(written.canto_comunione.contains("pane-di-vita-nuova"));
        assert!(written.canto_offertorio.contains("servo-per-amore"));
        assert!(written.canto_ingresso.contains("popoli-tutti"));
        assert!(output.report.unfilled.is_empty());
        assert!(output.report.get(Category::Closing).unwrap().duplicate);
    }

    #[test]
    fn test_no_save() {
        let (dir, pipeline) = setup(false);
        let output = pipeline.run(NaiveDate::from_ymd_opt(2024, 8, 4).unwrap()).unwrap();
        assert!(output.saved_to.is_none());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_model_and_corpus_initialized_once() {
        let (_dir, pipeline) = setup(false);
        let a = pipeline.corpus().unwrap();
        let b = pipeline.corpus().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&pipeline.embedder().unwrap(), a.embedder()));
    }

    #[test]
    fn test_missing_catalog_aborts() {
        let (_dir, pipeline) = setup(false);
        let pipeline = Pipeline::with_gateway(
            Config { catalog_path: "/nonexistent/canti.json".into(), ..pipeline.config().clone() },
            Box::new(FileReadingsGateway::new(pipeline.config().output_dir.join("none.html"))),
        );
        // readings are fetched first, so that failure surfaces
        assert!(matches!(
            pipeline.run(NaiveDate::from_ymd_opt(2024, 8, 4).unwrap()),
            Err(LiturgiaError::Retrieval(_))
        ));
        assert!(matches!(pipeline.corpus(), Err(LiturgiaError::CorpusLoad(_))));
    }

    #[test]
    fn test_incomplete_model_dir_fails_the_run() {
        let (dir, pipeline) = setup(false);
        let model_dir = dir.path().join("modello");
        std::fs::create_dir(&model_dir).unwrap();
        let pipeline = Pipeline::with_gateway(
            Config { model_dir: Some(model_dir), ..pipeline.config().clone() },
            Box::new(FileReadingsGateway::new(dir.path().join("letture.html"))),
        );

        assert!(matches!(
            pipeline.run(NaiveDate::from_ymd_opt(2024, 8, 4).unwrap()),
            Err(LiturgiaError::Embedding(_))
        ));
    }

    #[test]
    fn test_injected_embedder_replaces_loaded_corpus() {
        let (_dir, pipeline) = setup(false);
        assert_eq!(pipeline.corpus().unwrap().embedder().dim(), 128);

        let pipeline = pipeline.with_embedder(Arc::new(HashEmbedder::new(32).unwrap()));
        assert_eq!(pipeline.embedder().unwrap().dim(), 32);
        assert_eq!(pipeline.corpus().unwrap().embedder().dim(), 32);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config { timeout_secs: 0, ..Config::default() };
        assert!(matches!(Pipeline::new(config), Err(LiturgiaError::Config(_))));
    }
}
