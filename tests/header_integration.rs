//! Integration tests for header and player slot decoding.

mod common;

use bwrep_parser::format::{MIN_REPLAY_SIZE, REMASTERED_LAYOUT};
use bwrep_parser::{decode_header, detect_format, ErrorKind, ParserError, Race, ReplayFormat};
use common::ReplayBuilder;

#[test]
fn test_remastered_header_fields() {
    let data = ReplayBuilder::remastered().build();
    let (header, players) = decode_header(&data).unwrap();

    assert_eq!(&header.signature, b"seRS");
    assert_eq!(header.engine_version, 74);
    assert_eq!(header.format, ReplayFormat::Remastered);
    assert!(header.is_remastered());
    assert_eq!(header.frame_count, 1440);
    assert_eq!(header.duration(), "01:00");
    assert_eq!(header.map_name, "Fighting Spirit");
    assert_eq!(header.game_creator, "Host");
    assert_eq!(header.map_width, 128);
    assert_eq!(header.map_height, 128);
    assert_eq!(header.save_time, 1_700_000_000);

    assert_eq!(players.len(), 2);
    assert_eq!(players[0].id, 0);
    assert_eq!(players[0].name, "Alice");
    assert_eq!(players[0].race, Race::Terran);
    assert_eq!(players[1].id, 1);
    assert_eq!(players[1].name, "Bob");
    assert_eq!(players[1].race, Race::Zerg);
    assert_eq!(players[1].team, 1);
    assert!(players.iter().all(|player| player.is_human()));
}

#[test]
fn test_classic_header_fields() {
    let data = ReplayBuilder::classic().frame_count(2880).build();
    let (header, players) = decode_header(&data).unwrap();

    assert_eq!(header.format, ReplayFormat::Classic);
    assert_eq!(header.frame_count, 2880);
    assert_eq!(header.duration(), "02:00");
    assert_eq!(header.map_name, "Fighting Spirit");
    assert_eq!(header.game_creator, "Host");
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Alice");
}

#[test]
fn test_format_boundary() {
    let data = ReplayBuilder::remastered().engine_version(73).build();
    assert_eq!(detect_format(&data).unwrap(), ReplayFormat::Classic);

    let data = ReplayBuilder::remastered().engine_version(74).build();
    assert_eq!(detect_format(&data).unwrap(), ReplayFormat::Remastered);
}

#[test]
fn test_short_buffer_is_rejected() {
    let data = ReplayBuilder::remastered().build();
    let err = decode_header(&data[..MIN_REPLAY_SIZE - 1]).unwrap_err();
    assert!(matches!(err, ParserError::TooShort { .. }));
    assert_eq!(err.kind(), ErrorKind::CorruptionError);
}

#[test]
fn test_unsupported_engine_versions() {
    for version in [0, 256, 1_000_000] {
        let data = ReplayBuilder::remastered().engine_version(version).build();
        let err = decode_header(&data).unwrap_err();
        assert!(
            matches!(err, ParserError::UnsupportedEngineVersion { version: v } if v == version),
            "version {version}: {err}"
        );
        assert_eq!(err.kind(), ErrorKind::FormatError);
        assert!(!err.is_recoverable());
    }
}

#[test]
fn test_blank_signature_is_rejected() {
    let mut data = ReplayBuilder::remastered().build();
    data[0..4].copy_from_slice(&[0xFF; 4]);
    let err = decode_header(&data).unwrap_err();
    assert!(matches!(err, ParserError::InvalidSignature { .. }));

    let report = err.report();
    assert_eq!(report.kind, ErrorKind::FormatError);
    assert!(!report.recoverable);
    assert!(!report.remediation.is_empty());
}

#[test]
fn test_unknown_signature_is_accepted() {
    let mut data = ReplayBuilder::remastered().build();
    data[0..4].copy_from_slice(b"Rerp");
    let (header, _) = decode_header(&data).unwrap();
    assert_eq!(header.signature_string(), "Rerp");
}

#[test]
fn test_unprintable_map_name() {
    let data = ReplayBuilder::remastered()
        .map_name(&[0x01, 0x02, 0x03, 0x04])
        .build();
    let err = decode_header(&data).unwrap_err();
    assert!(matches!(err, ParserError::EncodingError { field: "map name", .. }));
    assert_eq!(err.kind(), ErrorKind::EncodingError);
}

#[test]
fn test_unprintable_player_name() {
    let mut data = ReplayBuilder::remastered().build();
    let slot = REMASTERED_LAYOUT.slot_offset(0);
    data[slot..slot + 5].copy_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05]);

    let err = decode_header(&data).unwrap_err();
    assert!(matches!(err, ParserError::EncodingError { field: "player name", .. }));
    assert_eq!(err.kind(), ErrorKind::EncodingError);
}

#[test]
fn test_latin1_map_name_is_decoded() {
    // Latin-1 e-acute
    let data = ReplayBuilder::remastered().map_name(b"Caf\xE9 Map").build();
    let (header, _) = decode_header(&data).unwrap();
    assert_eq!(header.map_name, "Caf\u{e9} Map");
}

#[test]
fn test_header_only_buffer() {
    // The slot table runs past the stream offset; a buffer that ends before
    // the last slot still decodes
    let data = ReplayBuilder::remastered().padding(0).build();
    let (_, players) = decode_header(&data).unwrap();
    assert_eq!(players.len(), 2);
}
