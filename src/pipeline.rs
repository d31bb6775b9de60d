use crate::{
    batch::{Batch, BatchStore},
    cleanup::clean_intermediates,
    commands::CommandTemplates,
    config::Config,
    engine::{CompletedTask, OcrEngine, TaskParams},
    error::OcrError,
    extension::{parse_allow_list, validate_extension},
    lock::LockMarker,
    merge::merge_result,
    pool::{ExecutorPool, build_tasks},
    properties::{self, PropertySource},
    select::{ColorMode, select_pages},
    util::now_rfc3339,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Orchestrates one plugin's OCR phase over a batch.
pub struct OcrRunner<S: BatchStore, P: PropertySource, E: OcrEngine> {
    cfg: Config,
    templates: CommandTemplates,
    store: S,
    props: P,
    engine: E,
    pool: ExecutorPool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub batch_id: String,
    pub plugin: String,
    pub color: ColorMode,
    pub pages: usize,
    pub completed: Vec<CompletedTask>,
    pub pages_updated: usize,
    pub removed_intermediates: Vec<PathBuf>,
    pub started: String,
    pub finished: String,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The plugin switch is off for this batch; nothing was touched.
    Skipped,
    Completed(RunReport),
}

/// Per-run values read from the property source.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub valid_extensions: Vec<String>,
    pub language: String,
    pub version: String,
    pub color: ColorMode,
}

impl<S: BatchStore, P: PropertySource, E: OcrEngine> OcrRunner<S, P, E> {
    pub fn new(cfg: &Config, templates: CommandTemplates, store: S, props: P, engine: E) -> Self {
        Self {
            cfg: cfg.clone(),
            templates,
            store,
            props,
            engine,
            pool: ExecutorPool::new(cfg.global.max_parallel_tasks),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_enabled(&self, batch_id: &str, plugin: &str) -> bool {
        self.props
            .property(batch_id, plugin, properties::SWITCH)
            .is_some_and(|v| properties::is_on(&v))
    }

    pub fn settings(&self, batch_id: &str, plugin: &str) -> Result<RunSettings, OcrError> {
        let valid_extensions =
            parse_allow_list(&self.props.require(batch_id, plugin, properties::VALID_EXTENSIONS)?);
        if valid_extensions.is_empty() {
            return Err(OcrError::NoValidExtensionsConfigured);
        }
        let language = self.props.require(batch_id, plugin, properties::LANGUAGE)?;
        let version = self.props.require(batch_id, plugin, properties::VERSION)?;
        let color = ColorMode::from_switch(
            &self
                .props
                .property(batch_id, plugin, properties::COLOR_SWITCH)
                .unwrap_or_default(),
        );
        Ok(RunSettings {
            valid_extensions,
            language,
            version,
            color,
        })
    }

    /// Pages that would be dispatched, without touching the filesystem.
    pub fn preview(&self, batch_id: &str, plugin: &str) -> Result<Vec<String>, OcrError> {
        let settings = self.settings(batch_id, plugin)?;
        let batch = self.store.load(batch_id).map_err(OcrError::Store)?;
        admit_pages(&batch, &settings)
    }

    pub fn run(&self, batch_id: &str, plugin: &str) -> Result<RunOutcome, OcrError> {
        if !self.is_enabled(batch_id, plugin) {
            info!("skipping {plugin} for batch {batch_id}: switch is OFF");
            return Ok(RunOutcome::Skipped);
        }

        let started = Instant::now();
        let started_at = now_rfc3339();
        info!("started OCR of batch {batch_id} with {plugin}");

        let settings = self.settings(batch_id, plugin)?;
        if self.templates.is_empty() {
            return Err(OcrError::NoCommandsConfigured);
        }
        debug!(?settings, "run settings");

        let mut batch = self.store.load(batch_id).map_err(OcrError::Store)?;
        let pages = admit_pages(&batch, &settings)?;
        info!("{} pages admitted for OCR", pages.len());

        let work_dir = self.cfg.batch_folder(batch_id);
        let params = Arc::new(TaskParams {
            templates: self.templates.clone(),
            language: settings.language.clone(),
            version: settings.version.clone(),
            color: settings.color,
            work_dir: work_dir.clone(),
            hocr_extension: self.cfg.engine.hocr_extension.clone(),
        });

        let lock = LockMarker::acquire(&work_dir, &self.cfg.paths.lock_folder_name, batch_id, plugin)?;
        // A construction failure aborts before anything is dispatched.
        let (dispatched, ran) = match build_tasks(&pages, &params) {
            Ok(tasks) => (self.pool.run(&self.engine, &tasks), true),
            Err(err) => (Err(err), false),
        };
        let released = lock.release();

        let completed = match (dispatched, released) {
            (Ok(completed), Ok(())) => completed,
            (Ok(completed), Err(err)) => {
                error!("{err}");
                completed
            }
            (Err(err), released) => {
                if let Err(release_err) = released {
                    error!("{release_err}");
                }
                error!("OCR of batch {batch_id} failed: {err}");
                // The tree is still unmerged here; persist it as loaded.
                if ran {
                    if let Err(save_err) = self.store.save(&batch) {
                        error!("cannot save batch {batch_id} after failed OCR: {save_err:#}");
                    }
                }
                return Err(err);
            }
        };

        let mut pages_updated = 0;
        for task in &completed {
            pages_updated += merge_result(&mut batch, settings.color, &task.page, &task.hocr_file_name);
        }
        info!("merged {} results into {pages_updated} pages", completed.len());

        let removed_intermediates = if self.cfg.global.keep_intermediates {
            Vec::new()
        } else {
            clean_intermediates(&work_dir, &self.cfg.cleanup)
        };
        debug!("removed {} intermediate files", removed_intermediates.len());

        self.store.save(&batch).map_err(OcrError::Store)?;
        info!(
            "finished OCR of batch {batch_id} in {} ms",
            started.elapsed().as_millis()
        );

        Ok(RunOutcome::Completed(RunReport {
            batch_id: batch_id.to_string(),
            plugin: plugin.to_string(),
            color: settings.color,
            pages: pages.len(),
            completed,
            pages_updated,
            removed_intermediates,
            started: started_at,
            finished: now_rfc3339(),
            elapsed_ms: started.elapsed().as_millis(),
        }))
    }
}

/// Selects pages by color mode, then rejects the whole batch on the first
/// filename whose extension is not allowed.
pub fn admit_pages(batch: &Batch, settings: &RunSettings) -> Result<Vec<String>, OcrError> {
    let pages = select_pages(batch, settings.color)?;
    pages
        .into_iter()
        .map(|page| {
            let page = page.trim().to_string();
            validate_extension(&page, &settings.valid_extensions).map(|()| page)
        })
        .collect()
}
