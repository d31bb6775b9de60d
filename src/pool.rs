use crate::{
    engine::{CompletedTask, OcrEngine, OcrTask, TaskParams},
    error::OcrError,
};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Builds one task per page, stopping at the first page that cannot be
/// prepared.
pub fn build_tasks(pages: &[String], params: &Arc<TaskParams>) -> Result<Vec<OcrTask>, OcrError> {
    pages
        .iter()
        .map(|page| OcrTask::new(page, Arc::clone(params)))
        .collect()
}

/// Fixed-size worker pool with a wait-for-all barrier.
///
/// Every task runs to a terminal state before the results are inspected; a
/// failing task does not cancel its siblings. On failure the error of the
/// earliest failed task in submission order is returned.
#[derive(Debug, Clone, Copy)]
pub struct ExecutorPool {
    workers: usize,
}

impl ExecutorPool {
    pub fn new(max_workers: usize) -> Self {
        Self {
            workers: max_workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn run<E: OcrEngine + ?Sized>(
        &self,
        engine: &E,
        tasks: &[OcrTask],
    ) -> Result<Vec<CompletedTask>, OcrError> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.workers.min(tasks.len());
        info!("dispatching {} OCR tasks on {} workers", tasks.len(), workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("ocr-worker-{idx}"))
            .build()?;

        // Collecting into Vec<Result<..>> keeps rayon from short-circuiting.
        let results: Vec<Result<CompletedTask, OcrError>> = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| {
                    debug!("running {}", task.page);
                    engine
                        .recognize(task)
                        .map(|()| CompletedTask {
                            page: task.page.clone(),
                            hocr_file_name: task.hocr_file_name.clone(),
                        })
                        .map_err(|err| {
                            error!("OCR failed for {}: {err:#}", task.page);
                            OcrError::task_failed(&task.page, format!("{err:#}"))
                        })
                })
                .collect()
        });

        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            error!(
                "{failures} of {} OCR tasks failed; discarding results",
                tasks.len()
            );
        }

        let completed = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        info!("all {} OCR tasks finished", completed.len());
        Ok(completed)
    }
}
