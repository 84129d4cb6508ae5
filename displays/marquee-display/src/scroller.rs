//! Character-step scrolling renderer

use marquee_core::message::{text_from, Text};
use marquee_core::traits::ScrollRenderer;

use crate::backend::DisplayBackend;

/// Scrolling renderer over a [`DisplayBackend`]
///
/// [`render_string`](ScrollRenderer::render_string) draws the text from
/// column 0 and arms a scroll. Each [`tick`](ScrollRenderer::tick) moves it
/// one column left; the scroll is done once the last character has left
/// the matrix.
///
/// Backend failures are counted rather than returned: the display task has
/// nowhere to send them and the next refresh redraws everything anyway.
pub struct Scroller<B> {
    backend: B,
    text: Text,
    /// Columns scrolled off the left edge
    offset: u16,
    /// Characters in `text`
    width: u16,
    errors: u32,
}

impl<B: DisplayBackend> Scroller<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            text: Text::new(),
            offset: 0,
            width: 0,
            errors: 0,
        }
    }

    /// Number of failed draw operations so far
    pub fn error_count(&self) -> u32 {
        self.errors
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Text currently loaded
    pub fn text(&self) -> &str {
        &self.text
    }

    fn draw(&mut self) {
        let col = -(self.offset as i16);
        let result = self
            .backend
            .clear()
            .and_then(|_| self.backend.draw_text(col, &self.text))
            .and_then(|_| self.backend.flush());
        if result.is_err() {
            self.errors = self.errors.saturating_add(1);
        }
    }
}

impl<B: DisplayBackend> ScrollRenderer for Scroller<B> {
    fn render_string(&mut self, text: &str) {
        self.text = text_from(text);
        self.width = self.text.chars().count() as u16;
        self.offset = 0;
        self.draw();
    }

    fn tick(&mut self) -> bool {
        if self.offset < self.width {
            self.offset += 1;
            self.draw();
        }
        self.offset >= self.width
    }
}
