//! Headless browser collaborator
//!
//! A [`Browser`] launches pages; a [`BrowserPage`] loads HTML, reports load
//! state and captures a PDF. [`Session`] owns one open page and closes it
//! when dropped, so every exit path of a conversion releases the browser.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::Result;

/// Paper size handed to the capture call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// CSS length, e.g. `210mm` or `29.7cm`
    pub width: String,
    pub height: String,
    pub print_background: bool,
}

/// Something that can open a headless page
pub trait Browser {
    fn launch(&self) -> Result<Box<dyn BrowserPage>>;
}

impl<B: Browser + ?Sized> Browser for &B {
    fn launch(&self) -> Result<Box<dyn BrowserPage>> {
        (**self).launch()
    }
}

/// One open page in a headless browser
pub trait BrowserPage {
    /// Load a complete HTML document
    fn set_content(&mut self, html: &str) -> Result<()>;

    /// Whether every image has finished loading, successfully or not
    fn images_loaded(&mut self) -> Result<bool>;

    /// Whether the diagram renderer has finished drawing
    fn diagrams_ready(&mut self) -> Result<bool>;

    /// Capture the page as PDF bytes
    fn print_pdf(&mut self, options: &PrintOptions) -> Result<Vec<u8>>;

    /// Shut the page and its browser down
    fn close(&mut self) -> Result<()>;
}

/// An open page that is closed on drop
pub struct Session {
    page: Box<dyn BrowserPage>,
    open: bool,
}

impl Session {
    /// Launch a page from `browser`
    pub fn open(browser: &dyn Browser) -> Result<Self> {
        let page = browser.launch()?;
        debug!("browser session opened");
        Ok(Self { page, open: true })
    }

    pub fn page(&mut self) -> &mut dyn BrowserPage {
        self.page.as_mut()
    }

    /// Close explicitly, surfacing the close error
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.page.close()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.page.close() {
                warn!(error = %e, "failed to close browser session");
            }
        }
    }
}

/// Poll `check` until it returns `true` or `timeout` elapses
///
/// Returns whether the condition was met. Errors from `check` propagate.
pub fn wait_until(
    timeout: Duration,
    interval: Duration,
    mut check: impl FnMut() -> Result<bool>,
) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if check()? {
            return Ok(true);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        thread::sleep(interval.min(deadline - now));
    }
}
