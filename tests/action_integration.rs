//! Integration tests for command stream location, decoding and classification.
//!
//! These tests drive the action layer directly: a stream is located inside a
//! synthetic replay, then decoded with `CommandDecoder` and checked action by
//! action.

mod common;

use bwrep_parser::actions::{
    locate_command_stream, ActionCategory, CommandDecoder, DecodeLimits, DecoderState,
    OpcodeTable, TerminationReason, CLASSIC_TABLE, REMASTERED_TABLE,
};
use bwrep_parser::config::{DecoderConfig, LocatorConfig};
use bwrep_parser::format::ReplayFormat;
use common::{build, frames, stops, train, ReplayBuilder, STREAM_OFFSET};

fn limits() -> DecodeLimits {
    DecodeLimits::default()
}

#[test]
fn test_locate_then_decode() {
    let mut stream = stops(0, 5);
    stream.extend(train(1, 37));
    stream.extend(frames(3));
    stream.extend(build(1, 142, 40, 60));
    stream.extend(stops(1, 5));
    let data = ReplayBuilder::remastered().stream(&stream).build();

    let table = OpcodeTable::for_format(ReplayFormat::Remastered);
    let location = locate_command_stream(&data, table, &LocatorConfig::default()).unwrap();
    assert_eq!(location.offset, STREAM_OFFSET);
    assert!(!location.fallback);
    assert!(location.confidence > 0.5);

    let (actions, stats) =
        CommandDecoder::new(&data, location.offset, table, &[0, 1], limits()).decode_all();
    assert_eq!(actions.len(), 12);
    assert_eq!(stats.recognized_opcodes, 12);
    assert_eq!(stats.unknown_bytes, 0);
    assert_eq!(stats.termination, Some(TerminationReason::EndOfBuffer));

    let larva = &actions.as_slice()[5];
    assert_eq!(larva.player_id, 1);
    assert_eq!(larva.frame, 5);
    assert_eq!(larva.category, ActionCategory::Train);
    assert_eq!(larva.unit_name.as_deref(), Some("Zergling"));
    assert!(larva.flags.is_train_action);

    let pool = &actions.as_slice()[6];
    assert_eq!(pool.frame, 8);
    assert_eq!(pool.unit_name.as_deref(), Some("Spawning Pool"));
    assert_eq!((pool.x, pool.y), (Some(40), Some(60)));
    assert!(pool.flags.is_build_action);
}

#[test]
fn test_candidate_order_is_respected() {
    // A stream at 641 is only found once 641 is scored before the default
    let mut data = ReplayBuilder::remastered().padding(0).build();
    data.resize(641, 0xEE);
    data.extend(stops(0, 20));
    data.resize(data.len() + 100, 0xEE);

    let config = LocatorConfig {
        candidate_offsets: vec![641, 633],
        ..LocatorConfig::default()
    };
    let location = locate_command_stream(&data, &REMASTERED_TABLE, &config).unwrap();
    assert_eq!(location.offset, 641);
    assert_eq!(location.candidates_tried, 1);
}

#[test]
fn test_remastered_extensions_are_format_specific() {
    let stream = [0x60, 0x00, 0x10, 0x00, 0x20, 0x00, 0x00];

    let (remastered, _) =
        CommandDecoder::new(&stream, 0, &REMASTERED_TABLE, &[0], limits()).decode_all();
    assert_eq!(remastered.len(), 1);
    assert_eq!(remastered.as_slice()[0].action_name, "Right Click");
    assert_eq!(remastered.as_slice()[0].x, Some(16));

    let (classic, stats) =
        CommandDecoder::new(&stream, 0, &CLASSIC_TABLE, &[0], limits()).decode_all();
    assert!(classic.is_empty());
    assert!(stats.unknown_bytes > 0);
}

#[test]
fn test_selection_is_not_effective() {
    let stream = [
        0x09, 0x00, 0x01, 0x00, // select
        0x63, 0x00, 0x02, 0x00, // select (remastered)
        0x1A, 0x00, 0x00, 0x00, // stop
    ];
    let (actions, _) =
        CommandDecoder::new(&stream, 0, &REMASTERED_TABLE, &[0], limits()).decode_all();

    let effective: Vec<bool> = actions.iter().map(|a| a.flags.is_effective()).collect();
    assert_eq!(effective, vec![false, false, true]);
    assert!(actions.as_slice()[0].flags.is_selection_only);
    assert!(actions.as_slice()[1].flags.is_selection_only);
}

#[test]
fn test_decoder_is_an_iterator() {
    let stream = stops(0, 3);
    let mut decoder = CommandDecoder::new(&stream, 0, &REMASTERED_TABLE, &[0], limits());

    let first = decoder.next().unwrap();
    assert_eq!(first.frame, 0);
    assert_eq!(decoder.by_ref().count(), 2);
    assert_eq!(decoder.state(), DecoderState::Done(TerminationReason::EndOfBuffer));
    assert_eq!(decoder.frame(), 3);
    assert!(decoder.next().is_none());
}

#[test]
fn test_frame_limit_from_config() {
    let stream = stops(0, 10);
    let limits = DecodeLimits::from_config(&DecoderConfig::default(), 4);
    let (actions, stats) =
        CommandDecoder::new(&stream, 0, &REMASTERED_TABLE, &[0], limits).decode_all();

    assert_eq!(actions.len(), 4);
    assert_eq!(actions.last_frame(), Some(3));
    assert_eq!(stats.final_frame, 4);
    assert_eq!(stats.termination, Some(TerminationReason::FrameLimit));
}

#[test]
fn test_start_past_end() {
    let stream = stops(0, 3);
    let (actions, stats) =
        CommandDecoder::new(&stream, 500, &REMASTERED_TABLE, &[0], limits()).decode_all();
    assert!(actions.is_empty());
    assert_eq!(stats.bytes_consumed, 0);
    assert_eq!(stats.termination, Some(TerminationReason::EndOfBuffer));
}
