//! PDF driver tests against a scripted browser
//!
//! The fake records every call so the tests can check ordering, the paper
//! size handed to the capture, and that the session is always closed.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use aksara_ast::{ConvertOptions, OutputFormat};
use aksara_core::diagnostics::codes;
use aksara_core::{parse_at, DocumentModel};
use aksara_pdf::{Browser, BrowserPage, PdfError, PdfOptions, PdfRenderer, PrintOptions, Result};
use chrono::{FixedOffset, TimeZone};

#[derive(Default, Clone)]
struct Script {
    images_ready_after: Option<u32>,
    diagrams_ready: bool,
    fail_launch: bool,
    fail_print: bool,
}

type Log = Rc<RefCell<Vec<String>>>;

struct FakeBrowser {
    script: Script,
    log: Log,
}

struct FakePage {
    script: Script,
    log: Log,
    polls: u32,
}

impl Browser for FakeBrowser {
    fn launch(&self) -> Result<Box<dyn BrowserPage>> {
        if self.script.fail_launch {
            return Err(PdfError::launch("no display"));
        }
        self.log.borrow_mut().push("launch".to_string());
        Ok(Box::new(FakePage {
            script: self.script.clone(),
            log: self.log.clone(),
            polls: 0,
        }))
    }
}

impl BrowserPage for FakePage {
    fn set_content(&mut self, html: &str) -> Result<()> {
        self.log.borrow_mut().push(format!("content:{}", html.len()));
        Ok(())
    }

    fn images_loaded(&mut self) -> Result<bool> {
        self.polls += 1;
        Ok(self
            .script
            .images_ready_after
            .is_some_and(|after| self.polls >= after))
    }

    fn diagrams_ready(&mut self) -> Result<bool> {
        self.log.borrow_mut().push("diagrams".to_string());
        Ok(self.script.diagrams_ready)
    }

    fn print_pdf(&mut self, options: &PrintOptions) -> Result<Vec<u8>> {
        self.log
            .borrow_mut()
            .push(format!("print:{}x{}", options.width, options.height));
        if self.script.fail_print {
            return Err(PdfError::print("renderer crashed"));
        }
        Ok(b"%PDF-1.7 fake".to_vec())
    }

    fn close(&mut self) -> Result<()> {
        self.log.borrow_mut().push("close".to_string());
        Ok(())
    }
}

fn renderer(script: Script) -> (PdfRenderer<FakeBrowser>, Log) {
    let log: Log = Rc::default();
    let browser = FakeBrowser {
        script,
        log: log.clone(),
    };
    let options = PdfOptions {
        image_timeout: Duration::from_millis(20),
        diagram_timeout: Duration::from_millis(20),
        poll_interval: Duration::from_millis(1),
    };
    (PdfRenderer::new(browser).with_options(options), log)
}

fn model(text: &str) -> DocumentModel {
    let now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 5, 5, 0, 0, 0)
        .unwrap();
    parse_at(text, &ConvertOptions::new(OutputFormat::Pdf), now)
}

const DOC: &str = "<!--\naksara:true\nsize: 210mmx297mm\n-->\n# Cover\n---\n## Body";

#[test]
fn test_happy_path_order() {
    let (pdf, log) = renderer(Script {
        images_ready_after: Some(1),
        ..Default::default()
    });
    let out = pdf.render(&model(DOC)).unwrap();

    assert!(out.bytes.starts_with(b"%PDF"));
    assert!(out.diagnostics.is_empty());

    let log = log.borrow();
    assert_eq!(log[0], "launch");
    assert!(log[1].starts_with("content:"));
    assert_eq!(log[2], "print:210mmx297mm");
    assert_eq!(log[3], "close");
    assert_eq!(log.len(), 4);
}

#[test]
fn test_image_timeout_degrades() {
    let (pdf, log) = renderer(Script::default());
    let out = pdf.render(&model(DOC)).unwrap();

    assert!(out.diagnostics.iter().any(|d| d.has_code(codes::IMAGE_TIMEOUT)));
    assert_eq!(log.borrow().last().map(String::as_str), Some("close"));
}

#[test]
fn test_diagrams_polled_only_when_present() {
    let (pdf, log) = renderer(Script {
        images_ready_after: Some(1),
        ..Default::default()
    });
    pdf.render(&model(DOC)).unwrap();
    assert!(!log.borrow().iter().any(|entry| entry == "diagrams"));

    let (pdf, log) = renderer(Script {
        images_ready_after: Some(1),
        diagrams_ready: false,
        ..Default::default()
    });
    let out = pdf
        .render(&model("<!--\naksara:true\n-->\n```mermaid\ngraph TD; a-->b\n```"))
        .unwrap();
    assert!(log.borrow().iter().any(|entry| entry == "diagrams"));
    assert!(out.diagnostics.iter().any(|d| d.has_code(codes::DIAGRAM_TIMEOUT)));
}

#[test]
fn test_ratio_geometry_printed_in_cm() {
    let (pdf, log) = renderer(Script {
        images_ready_after: Some(1),
        ..Default::default()
    });
    pdf.render(&model("<!--\naksara:true\nsize: 16:9\n-->\nSlide")).unwrap();
    assert!(log.borrow().contains(&"print:29.7cmx16.71cm".to_string()));
}

#[test]
fn test_print_failure_still_closes() {
    let (pdf, log) = renderer(Script {
        images_ready_after: Some(1),
        fail_print: true,
        ..Default::default()
    });
    let err = pdf.render(&model(DOC)).unwrap_err();

    assert_eq!(err.code(), "PDF004");
    assert_eq!(log.borrow().last().map(String::as_str), Some("close"));
}

#[test]
fn test_launch_failure_is_error() {
    let (pdf, log) = renderer(Script {
        fail_launch: true,
        ..Default::default()
    });
    let err = pdf.render(&model(DOC)).unwrap_err();
    assert_eq!(err.code(), "PDF002");
    assert!(log.borrow().is_empty());
}
