//! Property tests over arbitrary command streams and buffers.

mod common;

use bwrep_parser::format::MIN_REPLAY_SIZE;
use bwrep_parser::{decode_header, ErrorKind, Reliability, Replay};
use common::ReplayBuilder;
use proptest::prelude::*;

/// Streams biased towards frame markers and known opcodes.
fn arb_stream() -> impl Strategy<Value = Vec<u8>> {
    let byte = prop_oneof![
        4 => Just(0x00u8),
        2 => prop::sample::select(vec![0x0Cu8, 0x14, 0x1A, 0x1F, 0x60, 0x63]),
        1 => Just(0x01u8),
        2 => any::<u8>(),
    ];
    prop::collection::vec(byte, 0..1500)
}

proptest! {
    #[test]
    fn decoded_stream_respects_invariants(stream in arb_stream()) {
        let data = ReplayBuilder::remastered().stream(&stream).padding(0).build();
        let replay = Replay::decode(&data).unwrap();

        // Frames never go backwards
        prop_assert!(replay.actions.is_frame_monotonic());

        // Only active slots issue actions
        for action in &replay.actions {
            prop_assert!(action.player_id == 0 || action.player_id == 1);
        }

        for metrics in replay.metrics.values() {
            prop_assert!(metrics.eapm <= metrics.apm);
            prop_assert!(metrics.effective_actions <= metrics.actions);
        }

        for order in replay.build_orders.values() {
            prop_assert!(order.windows(2).all(|pair| pair[0].frame <= pair[1].frame));
        }

        if replay.reliability() == Reliability::Unrecoverable {
            prop_assert!(replay.actions.is_empty());
        }
    }

    #[test]
    fn decoding_is_deterministic(stream in arb_stream()) {
        let data = ReplayBuilder::remastered().stream(&stream).build();
        let first = Replay::decode(&data).unwrap().report_with_actions();
        let second = Replay::decode(&data).unwrap().report_with_actions();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_buffers_never_panic(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let _ = Replay::decode(&data);
    }

    #[test]
    fn short_buffers_never_yield_a_header(data in prop::collection::vec(any::<u8>(), 0..MIN_REPLAY_SIZE)) {
        let err = decode_header(&data).unwrap_err();
        prop_assert!(matches!(err.kind(), ErrorKind::CorruptionError | ErrorKind::FormatError));
    }

    #[test]
    fn arbitrary_headers_never_panic(
        version in 0u32..300,
        tail in prop::collection::vec(any::<u8>(), 0..1200),
    ) {
        let mut data = b"seRS".to_vec();
        data.extend_from_slice(&version.to_le_bytes());
        data.extend_from_slice(&tail);
        if let Err(err) = Replay::decode(&data) {
            prop_assert!(!err.to_string().is_empty());
        }
    }
}
