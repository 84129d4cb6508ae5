//! Frame encoding and decoding
//!
//! Frame format:
//! - START (1 byte): 0x7E synchronization byte
//! - LENGTH (1 byte): payload length (0-120)
//! - KIND (1 byte): message kind
//! - PAYLOAD (0-120 bytes): kind-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, KIND, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x7E;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 120;

/// Maximum complete frame size (START + LENGTH + KIND + PAYLOAD + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = 1 + 1 + 1 + MAX_PAYLOAD_SIZE + 1;

/// Frame encoding and decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// LENGTH byte out of range
    InvalidLength,
    /// Payload does not match its kind
    InvalidPayload,
    /// Kind byte not known to the receiver
    UnknownKind,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A decoded or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: u8,
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame with the given kind and payload
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload: buf })
    }

    /// Create a frame with no payload
    pub fn empty(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    fn checksum(length: u8, kind: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ kind, |acc, b| acc ^ b)
    }

    /// Encoded size of this frame
    pub fn encoded_len(&self) -> usize {
        4 + self.payload.len()
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let end = 3 + self.payload.len();
        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.kind;
        buffer[3..end].copy_from_slice(&self.payload);
        buffer[end] = Self::checksum(length, self.kind, &self.payload);

        Ok(len)
    }

    /// Encode into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Hunting for START
    Sync,
    Length,
    Kind,
    Payload,
    Checksum,
}

/// Byte-at-a-time frame decoder
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    length: u8,
    kind: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub const fn new() -> Self {
        Self {
            state: DecodeState::Sync,
            length: 0,
            kind: 0,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame and hunt for START again
    pub fn reset(&mut self) {
        self.state = DecodeState::Sync;
        self.length = 0;
        self.kind = 0;
        self.payload.clear();
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(frame))` when a valid frame completes, `Ok(None)`
    /// when more bytes are needed. After an error the decoder is back in
    /// sync-hunting mode and the next frame decodes normally.
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            DecodeState::Sync => {
                // Anything before START is line noise
                if byte == FRAME_START {
                    self.state = DecodeState::Length;
                }
            }
            DecodeState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidLength);
                }
                self.length = byte;
                self.state = DecodeState::Kind;
            }
            DecodeState::Kind => {
                self.kind = byte;
                self.payload.clear();
                self.state = if self.length == 0 {
                    DecodeState::Checksum
                } else {
                    DecodeState::Payload
                };
            }
            DecodeState::Payload => {
                // Capacity is bounded by the LENGTH check above
                let _ = self.payload.push(byte);
                if self.payload.len() == self.length as usize {
                    self.state = DecodeState::Checksum;
                }
            }
            DecodeState::Checksum => {
                let expected = Frame::checksum(self.length, self.kind, &self.payload);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }
                let frame = Frame {
                    kind: self.kind,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Feed bytes until the first complete frame
    ///
    /// Returns the frame and the number of bytes consumed. Bytes after the
    /// frame are left for the next call.
    pub fn push_slice(&mut self, bytes: &[u8]) -> (Result<Option<Frame>, FrameError>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.push(byte) {
                Ok(None) => {}
                other => return (other, i + 1),
            }
        }
        (Ok(None), bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Vec<Result<Frame, FrameError>, 8> {
        let mut decoder = FrameDecoder::new();
        let mut out = Vec::new();
        for &b in bytes {
            match decoder.push(b) {
                Ok(Some(frame)) => {
                    let _ = out.push(Ok(frame));
                }
                Ok(None) => {}
                Err(e) => {
                    let _ = out.push(Err(e));
                }
            }
        }
        out
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = Frame::empty(0x10);
        let mut buffer = [0u8; 8];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(&buffer[..4], &[FRAME_START, 0, 0x10, 0x10]);
    }

    #[test]
    fn test_encode_checksum() {
        let frame = Frame::new(0x11, &[0x01, 0x02, 0x04]).unwrap();
        let bytes = frame.encode_to_vec().unwrap();
        // 3 ^ 0x11 ^ 1 ^ 2 ^ 4
        assert_eq!(bytes.as_slice(), &[FRAME_START, 3, 0x11, 1, 2, 4, 0x15]);
    }

    #[test]
    fn test_decode_encoded() {
        let original = Frame::new(0x41, &[1, 2, 3, 4]).unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let frames = decode_all(&encoded);
        assert_eq!(frames.as_slice(), &[Ok(original)]);
    }

    #[test]
    fn test_resync_after_garbage() {
        let encoded = Frame::empty(0x40).encode_to_vec().unwrap();
        let mut data = Vec::<u8, 16>::new();
        data.extend_from_slice(&[0x00, 0xFF, 0x12]).unwrap();
        data.extend_from_slice(&encoded).unwrap();

        let frames = decode_all(&data);
        assert_eq!(frames.as_slice(), &[Ok(Frame::empty(0x40))]);
    }

    #[test]
    fn test_bad_checksum_then_recovery() {
        let mut bad = Frame::new(0x11, &[9, 9]).unwrap().encode_to_vec().unwrap();
        let last = bad.len() - 1;
        bad[last] ^= 0xFF;
        let good = Frame::empty(0x10).encode_to_vec().unwrap();

        let mut data = Vec::<u8, 16>::new();
        data.extend_from_slice(&bad).unwrap();
        data.extend_from_slice(&good).unwrap();

        let frames = decode_all(&data);
        assert_eq!(
            frames.as_slice(),
            &[Err(FrameError::InvalidChecksum), Ok(Frame::empty(0x10))]
        );
    }

    #[test]
    fn test_length_out_of_range() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.push(FRAME_START), Ok(None));
        assert_eq!(
            decoder.push(MAX_PAYLOAD_SIZE as u8 + 1),
            Err(FrameError::InvalidLength)
        );
    }

    #[test]
    fn test_push_slice_leaves_remainder() {
        let mut data = Vec::<u8, 16>::new();
        data.extend_from_slice(&Frame::empty(0x10).encode_to_vec().unwrap())
            .unwrap();
        data.extend_from_slice(&Frame::empty(0x12).encode_to_vec().unwrap())
            .unwrap();

        let mut decoder = FrameDecoder::new();
        let (result, used) = decoder.push_slice(&data);
        assert_eq!(result, Ok(Some(Frame::empty(0x10))));
        assert_eq!(used, 4);

        let (result, used) = decoder.push_slice(&data[4..]);
        assert_eq!(result, Ok(Some(Frame::empty(0x12))));
        assert_eq!(used, 4);
    }

    #[test]
    fn test_payload_too_large() {
        let large = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(Frame::new(0x11, &large), Err(FrameError::PayloadTooLarge));
    }
}
