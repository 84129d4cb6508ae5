//! Scroll renderer trait

/// Puts message text on the matrix and scrolls it
///
/// Implementations own the font and the display hardware. They cannot
/// report errors: the display task has nowhere to send them, so a failing
/// backend should record the failure and carry on.
pub trait ScrollRenderer {
    /// Render `text` statically from the left edge
    ///
    /// Also resets the scroll position: the next [`tick`](Self::tick)
    /// starts moving this text.
    fn render_string(&mut self, text: &str);

    /// Advance the scroll by one step
    ///
    /// Returns `true` once the text has scrolled completely out of view.
    fn tick(&mut self) -> bool;
}
