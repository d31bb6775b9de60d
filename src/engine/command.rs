use super::{OcrEngine, OcrTask};
use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use regex::{Captures, Regex};
use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Runs the resolved command templates as one external process per page.
pub struct CommandEngine {
    timeout: Option<Duration>,
    keep_stderr: bool,
    placeholder: Regex,
}

impl CommandEngine {
    pub fn new(cfg: &Config) -> Result<Self> {
        let timeout = if cfg.engine.timeout_seconds > 0 {
            Some(Duration::from_secs(cfg.engine.timeout_seconds))
        } else {
            None
        };
        Ok(Self {
            timeout,
            keep_stderr: cfg.engine.keep_stderr,
            placeholder: Regex::new(r"\{([a-z_]+)\}").context("placeholder regex")?,
        })
    }

    /// Substitutes page values into one template token. Unknown
    /// placeholders are left as written.
    pub fn render(&self, token: &str, task: &OcrTask) -> String {
        self.placeholder
            .replace_all(token, |caps: &Captures| {
                match &caps[1] {
                    "source" => task.source.display().to_string(),
                    "target" => task.target.display().to_string(),
                    "target_base" => task.target_base.display().to_string(),
                    "language" => task.params.language.clone(),
                    "version" => task.params.version.clone(),
                    "color" => task.params.color.as_switch().to_string(),
                    "workdir" => task.params.work_dir.display().to_string(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    pub fn argv(&self, task: &OcrTask) -> Vec<String> {
        task.params
            .templates
            .tokens()
            .iter()
            .map(|t| self.render(t, task))
            .collect()
    }
}

impl OcrEngine for CommandEngine {
    fn recognize(&self, task: &OcrTask) -> Result<()> {
        let argv = self.argv(task);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("empty command template list"))?;
        debug!("ocr run {} {:?} timeout={:?}", program, args, self.timeout);

        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning OCR engine: {program}"))?;

        let output = if let Some(timeout) = self.timeout {
            wait_with_timeout(&mut child, timeout)?
        } else {
            child
                .wait_with_output()
                .with_context(|| "waiting for OCR engine")?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "OCR engine exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        if self.keep_stderr && !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("ocr stderr {}: {}", task.page, stderr.trim());
        }

        if !task.target.is_file() {
            return Err(anyhow!(
                "OCR engine produced no output at {}",
                task.target.display()
            ));
        }
        Ok(())
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    // Drain pipes while waiting so a chatty engine can't block on a full buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf).with_context(|| "read stdout")?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf).with_context(|| "read stderr")?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    let (status, timed_out) = loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            break (status, false);
        }
        if start.elapsed() > timeout {
            warn!("OCR engine timed out after {:?}", timeout);
            let _ = child.kill();
            let status = child.wait().with_context(|| "wait after kill")?;
            break (status, true);
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let stdout = stdout_thread
        .join()
        .map_err(|_| anyhow!("stdout reader thread panicked"))??;
    let stderr = stderr_thread
        .join()
        .map_err(|_| anyhow!("stderr reader thread panicked"))??;

    if timed_out {
        return Err(anyhow!(
            "OCR engine exceeded timeout ({:?}); stderr: {}",
            timeout,
            String::from_utf8_lossy(&stderr)
        ));
    }
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}
