use super::{OcrDiag, OcrEngine, OcrError};
use crate::config::Config;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Runs the tesseract CLI as `<cmd> stdin stdout [-l <lang>]`, piping the
/// image through stdin.
pub struct TesseractEngine {
    command: PathBuf,
    language: String,
    timeout: Option<Duration>,
}

impl TesseractEngine {
    pub fn new(cfg: &Config) -> Self {
        let timeout = if cfg.ocr.timeout_seconds > 0 {
            Some(Duration::from_secs(cfg.ocr.timeout_seconds))
        } else {
            None
        };
        Self {
            command: resolve_command(cfg),
            language: cfg.ocr.language.trim().to_string(),
            timeout,
        }
    }

    fn spawn(&self, args: &[&str]) -> Result<Child, OcrError> {
        Command::new(&self.command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OcrError::Unavailable {
                command: self.command.display().to_string(),
                source,
            })
    }
}

/// Resolution order: configured path if it exists on disk, then the first
/// existing search path, then the bare program name for PATH lookup. The
/// result is recomputed for every engine, so installing tesseract later is
/// picked up without a restart.
pub fn resolve_command(cfg: &Config) -> PathBuf {
    let configured = cfg.ocr.tesseract_cmd.trim();
    if !configured.is_empty() {
        let p = expand_tilde(configured);
        if p.exists() {
            return p;
        }
        debug!("configured tesseract_cmd does not exist: {}", p.display());
    }
    for candidate in &cfg.ocr.search_paths {
        let p = expand_tilde(candidate.trim());
        if p.exists() {
            return p;
        }
    }
    PathBuf::from(cfg.ocr.program.trim())
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

impl OcrEngine for TesseractEngine {
    fn doctor(&self) -> OcrDiag {
        let command = self.command.display().to_string();
        let output = self
            .spawn(&["--version"])
            .and_then(|child| child.wait_with_output().map_err(OcrError::from));
        match output {
            Ok(out) if out.status.success() => {
                // tesseract 3.x prints its banner on stderr, later versions on stdout.
                let banner = if out.stdout.is_empty() {
                    out.stderr
                } else {
                    out.stdout
                };
                let version = String::from_utf8_lossy(&banner)
                    .lines()
                    .next()
                    .map(|l| l.trim().to_string());
                OcrDiag {
                    command,
                    available: true,
                    version,
                    error: None,
                }
            }
            Ok(out) => OcrDiag {
                command,
                available: false,
                version: None,
                error: Some(format!("--version exited with {}", out.status)),
            },
            Err(err) => OcrDiag {
                command,
                available: false,
                version: None,
                error: Some(err.to_string()),
            },
        }
    }

    fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let mut args = vec!["stdin", "stdout"];
        if !self.language.is_empty() {
            args.push("-l");
            args.push(self.language.as_str());
        }
        debug!(
            "tesseract run {} bytes={} timeout={:?}",
            self.command.display(),
            image.len(),
            self.timeout
        );

        let mut child = self.spawn(&args)?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("no stdin"))?;
        // Fed from its own thread so the timeout also covers a child that never reads.
        let image = image.to_vec();
        let writer = std::thread::spawn(move || {
            // A child that dies early closes the pipe; its exit status says more.
            if let Err(err) = stdin.write_all(&image) {
                debug!("writing image to tesseract stdin: {err}");
            }
        });

        let output = match self.timeout {
            Some(limit) => wait_with_timeout(&mut child, limit),
            None => child.wait_with_output().map_err(OcrError::from),
        };
        if writer.join().is_err() {
            debug!("tesseract stdin writer panicked");
        }
        let output = output?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output, OcrError> {
    // Drain pipes while waiting so a chatty child can't block on a full buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            let stdout = join_reader(stdout_thread)?;
            let stderr = join_reader(stderr_thread)?;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("tesseract timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait()?;
            let _ = join_reader(stdout_thread);
            let _ = join_reader(stderr_thread);
            return Err(OcrError::TimedOut {
                seconds: timeout.as_secs(),
            });
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}

fn join_reader(
    handle: std::thread::JoinHandle<std::io::Result<Vec<u8>>>,
) -> std::io::Result<Vec<u8>> {
    handle
        .join()
        .map_err(|_| std::io::Error::other("pipe reader thread panicked"))?
}
