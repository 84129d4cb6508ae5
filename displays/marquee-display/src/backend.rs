//! Display backend trait
//!
//! A marquee is a single row of character-sized segments.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the matrix
    Communication,
    /// Matrix not configured yet
    NotInitialized,
    /// Command does not fit the link's frame
    BufferOverflow,
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for drawing to a matrix.
pub trait DisplayBackend {
    /// Blank the whole matrix
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text starting at a character column
    ///
    /// `col` may be negative: the leading characters are then off the left
    /// edge. Anything past the last column is clipped.
    fn draw_text(&mut self, col: i16, text: &str) -> Result<(), DisplayError>;

    /// Set LED intensity (0-15)
    fn set_intensity(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Push buffered content to the hardware
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Width in characters
    fn columns(&self) -> u8;

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}
