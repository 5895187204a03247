//! Chrome/Chromium command-line backend
//!
//! Each page is a scratch directory holding `page.html`. Printing runs the
//! browser once with `--print-to-pdf`; `--virtual-time-budget` lets images
//! and diagrams settle before capture, so the load-state checks report
//! ready immediately. The browser process itself is killed when it outlives
//! the budget plus a grace period.

use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::browser::{Browser, BrowserPage, PrintOptions};
use crate::error::{PdfError, Result};

/// Environment variable naming the browser executable
pub const BROWSER_ENV: &str = "AKSARA_BROWSER";

const CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
    "microsoft-edge",
    "msedge",
];

const MAC_CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

/// Time the browser process gets on top of the virtual time budget
const PROCESS_GRACE: Duration = Duration::from_secs(30);

const PROCESS_POLL: Duration = Duration::from_millis(50);

/// Headless Chrome driven through its command line
#[derive(Debug, Clone)]
pub struct ChromeCli {
    binary: PathBuf,
    budget: Duration,
    process_timeout: Option<Duration>,
}

impl ChromeCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            budget: Duration::from_secs(15),
            process_timeout: None,
        }
    }

    /// Virtual time the page gets before capture
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Wall-clock limit for one browser run (default: budget + 30s)
    pub fn with_process_timeout(mut self, timeout: Duration) -> Self {
        self.process_timeout = Some(timeout);
        self
    }

    fn deadline(&self) -> Duration {
        self.process_timeout.unwrap_or(self.budget + PROCESS_GRACE)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Find a browser: explicit path, then `AKSARA_BROWSER`, then `PATH`
    pub fn discover(configured: Option<&str>) -> Result<Self> {
        if let Some(path) = configured.filter(|p| !p.trim().is_empty()) {
            return Ok(Self::new(path));
        }
        if let Ok(path) = env::var(BROWSER_ENV) {
            if !path.trim().is_empty() {
                return Ok(Self::new(path));
            }
        }

        let found = env::var_os("PATH")
            .into_iter()
            .flat_map(|paths| env::split_paths(&paths).collect::<Vec<_>>())
            .flat_map(|dir| CANDIDATES.iter().map(move |name| dir.join(name)))
            .chain(MAC_CANDIDATES.iter().map(PathBuf::from))
            .find(|path| path.is_file());

        match found {
            Some(path) => {
                debug!(browser = %path.display(), "discovered browser");
                Ok(Self::new(path))
            }
            None => Err(PdfError::BrowserNotFound),
        }
    }
}

impl Browser for ChromeCli {
    fn launch(&self) -> Result<Box<dyn BrowserPage>> {
        let dir = tempfile::Builder::new()
            .prefix("aksara-pdf-")
            .tempdir()
            .map_err(|e| PdfError::launch(format!("cannot create profile directory: {e}")))?;
        Ok(Box::new(ChromePage {
            binary: self.binary.clone(),
            budget: self.budget,
            deadline: self.deadline(),
            dir: Some(dir),
            loaded: false,
        }))
    }
}

struct ChromePage {
    binary: PathBuf,
    budget: Duration,
    deadline: Duration,
    dir: Option<TempDir>,
    loaded: bool,
}

impl ChromePage {
    fn dir(&self) -> Result<&Path> {
        self.dir
            .as_ref()
            .map(TempDir::path)
            .ok_or_else(|| PdfError::content("page already closed"))
    }
}

impl BrowserPage for ChromePage {
    fn set_content(&mut self, html: &str) -> Result<()> {
        let path = self.dir()?.join("page.html");
        fs::write(&path, html)?;
        self.loaded = true;
        Ok(())
    }

    fn images_loaded(&mut self) -> Result<bool> {
        Ok(self.loaded)
    }

    fn diagrams_ready(&mut self) -> Result<bool> {
        Ok(self.loaded)
    }

    fn print_pdf(&mut self, options: &PrintOptions) -> Result<Vec<u8>> {
        if !self.loaded {
            return Err(PdfError::content("no content loaded"));
        }
        let dir = self.dir()?.to_path_buf();
        let page = dir.join("page.html");
        let output = dir.join("page.pdf");
        let log = dir.join("browser.log");

        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-first-run")
            .arg("--no-pdf-header-footer")
            .arg("--run-all-compositor-stages-before-draw")
            .arg(format!("--user-data-dir={}", dir.join("profile").display()))
            .arg(format!("--virtual-time-budget={}", self.budget.as_millis()))
            .arg(format!("--print-to-pdf={}", output.display()));
        if !options.print_background {
            command.arg("--disable-background-graphics");
        }
        command.arg(format!("file://{}", page.display()));
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(File::create(&log)?));

        info!(browser = %self.binary.display(), width = %options.width, height = %options.height, "printing pdf");
        let mut child = command
            .spawn()
            .map_err(|e| PdfError::launch(format!("{}: {e}", self.binary.display())))?;
        let Some(status) = wait_with_deadline(&mut child, self.deadline)? else {
            return Err(PdfError::print(format!(
                "browser did not finish within {} ms",
                self.deadline.as_millis()
            )));
        };
        if !status.success() {
            let stderr = fs::read_to_string(&log).unwrap_or_default();
            return Err(PdfError::print(format!(
                "browser exited with {}: {}",
                status,
                stderr.lines().last().unwrap_or_default()
            )));
        }

        let bytes = fs::read(&output)
            .map_err(|e| PdfError::print(format!("no output written: {e}")))?;
        if !bytes.starts_with(b"%PDF") {
            return Err(PdfError::print("output is not a PDF"));
        }
        Ok(bytes)
    }

    fn close(&mut self) -> Result<()> {
        self.loaded = false;
        match self.dir.take() {
            Some(dir) => dir.close().map_err(PdfError::from),
            None => Ok(()),
        }
    }
}

/// Wait for `child`, killing it once `timeout` has passed
///
/// `None` means the process was killed.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            debug!(elapsed = ?start.elapsed(), %status, "browser exited");
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            warn!(?timeout, pid = child.id(), "browser hung, killing it");
            // Already exited between the checks
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(PROCESS_POLL);
    }
}
