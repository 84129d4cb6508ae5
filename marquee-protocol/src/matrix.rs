//! Controller → matrix controller commands

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

pub const KIND_CLEAR: u8 = 0x10;
pub const KIND_TEXT: u8 = 0x11;
pub const KIND_INTENSITY: u8 = 0x12;
pub const KIND_CONFIGURE: u8 = 0x13;

/// Highest intensity level the matrix accepts
pub const MAX_INTENSITY: u8 = 15;

/// Longest text that fits in one frame after the column and length bytes
const MAX_TEXT_BYTES: usize = MAX_PAYLOAD_SIZE - 2;

/// Draw commands for the matrix controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixCommand<'a> {
    /// Blank every segment
    Clear,
    /// Draw text starting at a character column; text past the last
    /// segment is clipped by the matrix controller
    Text { col: i16, text: &'a str },
    /// Set LED intensity (0-15)
    Intensity(u8),
    /// Announce the number of chained segments
    Configure { segments: u8 },
}

impl<'a> MatrixCommand<'a> {
    /// Encode into a frame
    ///
    /// Text longer than a frame is truncated at a character boundary.
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            MatrixCommand::Clear => Ok(Frame::empty(KIND_CLEAR)),
            MatrixCommand::Text { col, text } => {
                let bytes = truncate(text, MAX_TEXT_BYTES).as_bytes();

                // Payload: [col lo][col hi][chars...]
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&col.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(bytes)
                    .map_err(|_| FrameError::PayloadTooLarge)?;

                Frame::new(KIND_TEXT, &payload)
            }
            MatrixCommand::Intensity(level) => {
                Frame::new(KIND_INTENSITY, &[(*level).min(MAX_INTENSITY)])
            }
            MatrixCommand::Configure { segments } => Frame::new(KIND_CONFIGURE, &[*segments]),
        }
    }

    /// Decode a frame received by the matrix controller
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.kind {
            KIND_CLEAR => Ok(MatrixCommand::Clear),
            KIND_TEXT => {
                let [lo, hi, text @ ..] = payload else {
                    return Err(FrameError::InvalidPayload);
                };
                let text = core::str::from_utf8(text).map_err(|_| FrameError::InvalidPayload)?;
                Ok(MatrixCommand::Text {
                    col: i16::from_le_bytes([*lo, *hi]),
                    text,
                })
            }
            KIND_INTENSITY => match payload {
                [level] if *level <= MAX_INTENSITY => Ok(MatrixCommand::Intensity(*level)),
                _ => Err(FrameError::InvalidPayload),
            },
            KIND_CONFIGURE => match payload {
                [segments] => Ok(MatrixCommand::Configure {
                    segments: *segments,
                }),
                _ => Err(FrameError::InvalidPayload),
            },
            _ => Err(FrameError::UnknownKind),
        }
    }
}

/// Longest prefix of `s` that fits in `max` bytes
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear() {
        let frame = MatrixCommand::Clear.to_frame().unwrap();
        assert_eq!(frame.kind, KIND_CLEAR);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_text_payload() {
        let frame = MatrixCommand::Text {
            col: -2,
            text: "Hello",
        }
        .to_frame()
        .unwrap();
        assert_eq!(frame.kind, KIND_TEXT);
        assert_eq!(&frame.payload[..2], &(-2i16).to_le_bytes());
        assert_eq!(&frame.payload[2..], b"Hello");

        assert_eq!(
            MatrixCommand::from_frame(&frame),
            Ok(MatrixCommand::Text {
                col: -2,
                text: "Hello"
            })
        );
    }

    #[test]
    fn test_long_text_truncated_on_char_boundary() {
        let mut long = heapless::String::<256>::new();
        for _ in 0..MAX_TEXT_BYTES - 1 {
            let _ = long.push('a');
        }
        let _ = long.push('°');

        let frame = MatrixCommand::Text { col: 0, text: &long }
            .to_frame()
            .unwrap();
        assert_eq!(frame.payload.len(), 2 + MAX_TEXT_BYTES - 1);
        assert!(MatrixCommand::from_frame(&frame).is_ok());
    }

    #[test]
    fn test_intensity_clamped() {
        let frame = MatrixCommand::Intensity(40).to_frame().unwrap();
        assert_eq!(frame.payload.as_slice(), &[MAX_INTENSITY]);
    }

    #[test]
    fn test_invalid_payloads() {
        let frame = Frame::new(KIND_TEXT, &[0]).unwrap();
        assert_eq!(
            MatrixCommand::from_frame(&frame),
            Err(FrameError::InvalidPayload)
        );

        let frame = Frame::new(KIND_TEXT, &[0, 0, 0xFF]).unwrap();
        assert_eq!(
            MatrixCommand::from_frame(&frame),
            Err(FrameError::InvalidPayload)
        );

        let frame = Frame::new(KIND_INTENSITY, &[16]).unwrap();
        assert_eq!(
            MatrixCommand::from_frame(&frame),
            Err(FrameError::InvalidPayload)
        );

        let frame = Frame::empty(0x7F);
        assert_eq!(
            MatrixCommand::from_frame(&frame),
            Err(FrameError::UnknownKind)
        );
    }

    #[test]
    fn test_configure() {
        let frame = MatrixCommand::Configure { segments: 8 }.to_frame().unwrap();
        assert_eq!(
            MatrixCommand::from_frame(&frame),
            Ok(MatrixCommand::Configure { segments: 8 })
        );
    }
}
