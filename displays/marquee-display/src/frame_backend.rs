//! Remote matrix over a serial link
//!
//! The matrix controller is a dumb terminal: every backend call becomes one
//! marquee-protocol frame.

use embedded_io::Write;
use marquee_protocol::{FrameError, MatrixCommand, MAX_FRAME_SIZE};

use crate::backend::{DisplayBackend, DisplayError};

/// Backend that sends [`MatrixCommand`] frames to a writer
pub struct FrameBackend<W> {
    writer: W,
    segments: u8,
    configured: bool,
}

impl<W: Write> FrameBackend<W> {
    /// Create a backend for a matrix with `segments` characters
    pub fn new(writer: W, segments: u8) -> Self {
        Self {
            writer,
            segments,
            configured: false,
        }
    }

    /// Announce the segment count and initial intensity
    pub fn configure(&mut self, brightness: u8) -> Result<(), DisplayError> {
        self.send(MatrixCommand::Configure {
            segments: self.segments,
        })?;
        self.set_intensity(brightness)?;
        self.clear()?;
        self.flush()?;
        self.configured = true;
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    fn send(&mut self, command: MatrixCommand<'_>) -> Result<(), DisplayError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = command
            .to_frame()
            .and_then(|frame| frame.encode(&mut buffer))
            .map_err(|e| match e {
                FrameError::PayloadTooLarge | FrameError::BufferTooSmall => {
                    DisplayError::BufferOverflow
                }
                _ => DisplayError::Communication,
            })?;

        self.writer
            .write_all(&buffer[..len])
            .map_err(|_| DisplayError::Communication)
    }
}

impl<W: Write> DisplayBackend for FrameBackend<W> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.send(MatrixCommand::Clear)
    }

    fn draw_text(&mut self, col: i16, text: &str) -> Result<(), DisplayError> {
        self.send(MatrixCommand::Text { col, text })
    }

    fn set_intensity(&mut self, level: u8) -> Result<(), DisplayError> {
        self.send(MatrixCommand::Intensity(level))
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.writer.flush().map_err(|_| DisplayError::Communication)
    }

    fn columns(&self) -> u8 {
        self.segments
    }

    fn is_ready(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_io::{ErrorKind, ErrorType};
    use heapless::Vec;
    use marquee_protocol::{Frame, FrameDecoder};

    /// Writer that captures bytes
    #[derive(Default)]
    struct CaptureWriter {
        bytes: Vec<u8, 512>,
        flushes: usize,
    }

    impl ErrorType for CaptureWriter {
        type Error = Infallible;
    }

    impl Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.bytes.capacity() - self.bytes.len());
            let _ = self.bytes.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    /// Writer whose link is down
    struct BrokenWriter;

    impl ErrorType for BrokenWriter {
        type Error = ErrorKind;
    }

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
            Err(ErrorKind::BrokenPipe)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::BrokenPipe)
        }
    }

    fn frames(bytes: &[u8]) -> Vec<Frame, 8> {
        let mut decoder = FrameDecoder::new();
        bytes
            .iter()
            .filter_map(|&b| decoder.push(b).ok().flatten())
            .collect()
    }

    #[test]
    fn test_configure_sequence() {
        let mut backend = FrameBackend::new(CaptureWriter::default(), 8);
        assert!(!backend.is_ready());

        backend.configure(4).unwrap();
        assert!(backend.is_ready());
        assert_eq!(backend.columns(), 8);
        assert_eq!(backend.writer().flushes, 1);

        let sent = frames(&backend.writer().bytes);
        let commands: Vec<MatrixCommand<'_>, 8> = sent
            .iter()
            .map(|f| MatrixCommand::from_frame(f).unwrap())
            .collect();
        assert_eq!(
            commands.as_slice(),
            &[
                MatrixCommand::Configure { segments: 8 },
                MatrixCommand::Intensity(4),
                MatrixCommand::Clear,
            ]
        );
    }

    #[test]
    fn test_draw_text_frame() {
        let mut backend = FrameBackend::new(CaptureWriter::default(), 8);
        backend.draw_text(-3, "Connected").unwrap();

        let sent = frames(&backend.writer().bytes);
        assert_eq!(sent.len(), 1);
        assert_eq!(
            MatrixCommand::from_frame(&sent[0]),
            Ok(MatrixCommand::Text {
                col: -3,
                text: "Connected"
            })
        );
    }

    #[test]
    fn test_link_failure_maps_to_communication() {
        let mut backend = FrameBackend::new(BrokenWriter, 8);
        assert_eq!(backend.clear(), Err(DisplayError::Communication));
        assert_eq!(backend.flush(), Err(DisplayError::Communication));
        assert_eq!(backend.configure(4), Err(DisplayError::Communication));
        assert!(!backend.is_ready());
    }
}
