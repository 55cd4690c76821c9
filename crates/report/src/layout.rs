//! Page flow: the cursor and the one page-break policy every section uses

use crate::config::LayoutConfig;
use crate::header::HeaderBand;
use crate::{ReportError, Result};
use pdf_core::PdfDocument;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked whenever a page is created
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Canvas plus the vertical cursor of the page being filled
///
/// New pages always come with the frame and header band, and the cursor is
/// reset to the top of the content area.
pub struct PageFlow<'a> {
    canvas: PdfDocument,
    config: &'a LayoutConfig,
    header: HeaderBand<'a>,
    cancel: &'a CancellationToken,
    page: usize,
    cursor_y: f64,
}

impl<'a> PageFlow<'a> {
    /// Create the canvas and its first page
    pub fn begin(
        config: &'a LayoutConfig,
        header: HeaderBand<'a>,
        cancel: &'a CancellationToken,
    ) -> Result<Self> {
        let mut flow = Self {
            canvas: PdfDocument::with_page_size(config.page_width, config.page_height),
            config,
            header,
            cancel,
            page: 0,
            cursor_y: config.content_top,
        };
        flow.new_page()?;
        Ok(flow)
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    /// Current page number (1-indexed)
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    pub fn canvas(&self) -> &PdfDocument {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut PdfDocument {
        &mut self.canvas
    }

    /// Whether `needed` points fit between the cursor and the bottom margin
    pub fn fits(&self, needed: f64) -> bool {
        self.cursor_y + needed <= self.config.content_bottom()
    }

    /// Start a new page unless `needed` points fit on the current one
    ///
    /// # Returns
    /// `true` when a page break happened
    pub fn ensure_space(&mut self, needed: f64) -> Result<bool> {
        if self.fits(needed) {
            return Ok(false);
        }
        self.new_page()?;
        Ok(true)
    }

    /// Append a page with frame and header and move the cursor to its top
    pub fn new_page(&mut self) -> Result<usize> {
        if self.cancel.is_cancelled() {
            return Err(ReportError::Cancelled);
        }

        self.page = self.canvas.add_blank_page()?;
        self.header.draw(&mut self.canvas, self.page)?;
        self.cursor_y = self.config.content_top;

        if self.page > 1 {
            log::debug!("Page break: starting page {}", self.page);
        }
        Ok(self.page)
    }

    /// Move the cursor down
    pub fn advance(&mut self, dy: f64) {
        self.move_to(self.cursor_y + dy);
    }

    /// Place the cursor at an absolute y on the current page
    pub fn move_to(&mut self, y: f64) {
        self.cursor_y = y;
        debug_assert!(
            self.cursor_y <= self.config.page_height,
            "cursor {} below page height {}",
            self.cursor_y,
            self.config.page_height
        );
    }

    /// Hand the finished canvas over
    pub fn finish(self) -> PdfDocument {
        self.canvas
    }
}
