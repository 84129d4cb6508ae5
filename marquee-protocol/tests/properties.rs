//! Decoder resynchronisation properties

use marquee_protocol::{Frame, FrameDecoder, FrameError, FRAME_START, MAX_PAYLOAD_SIZE};
use proptest::prelude::*;

fn feed(decoder: &mut FrameDecoder, bytes: &[u8]) -> Vec<Result<Frame, FrameError>> {
    bytes
        .iter()
        .filter_map(|&b| decoder.push(b).transpose())
        .collect()
}

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Line noise before a frame never hides it
    #[test]
    fn frame_found_after_noise(
        noise in prop::collection::vec(any::<u8>().prop_filter("not START", |b| *b != FRAME_START), 0..64),
        kind in any::<u8>(),
        payload in payload(),
    ) {
        let frame = Frame::new(kind, &payload).unwrap();
        let mut bytes = noise;
        bytes.extend_from_slice(&frame.encode_to_vec().unwrap());

        let mut decoder = FrameDecoder::new();
        prop_assert_eq!(feed(&mut decoder, &bytes), vec![Ok(frame)]);
    }

    /// A corrupted checksum costs exactly one frame
    #[test]
    fn bad_checksum_then_recovery(
        kind in any::<u8>(),
        first in payload(),
        second in payload(),
        flip in 1u8..=255,
    ) {
        let bad = Frame::new(kind, &first).unwrap();
        let good = Frame::new(kind, &second).unwrap();

        let mut bytes = bad.encode_to_vec().unwrap().to_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= flip;
        bytes.extend_from_slice(&good.encode_to_vec().unwrap());

        let mut decoder = FrameDecoder::new();
        prop_assert_eq!(
            feed(&mut decoder, &bytes),
            vec![Err(FrameError::InvalidChecksum), Ok(good)]
        );
    }
}
