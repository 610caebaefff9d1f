//! End-to-end pipeline tests: synthetic 282-byte broadcast frames are built
//! and encrypted the way a meter would, then fed through `MeterDecoder`.

use dlms_push_rs::constants::{
    OBIS_ACTIVE_ENERGY_EXPORT, OBIS_ACTIVE_ENERGY_IMPORT, OBIS_ACTIVE_POWER_EXPORT,
    OBIS_ACTIVE_POWER_IMPORT, OBIS_CURRENT_L1, OBIS_CURRENT_L2, OBIS_CURRENT_L3,
    OBIS_POWER_FACTOR, OBIS_VOLTAGE_L1, OBIS_VOLTAGE_L2, OBIS_VOLTAGE_L3,
};
use dlms_push_rs::{AesKey, MeterCipher, MeterDecoder, MeterError, ObisCode, SecurityMode};

const SYSTEM_TITLE: [u8; 8] = [0x4B, 0x46, 0x4D, 0x67, 0x50, 0x00, 0x00, 0x9C];
const KEY_HEX: &str = "0EAF2F77101465606630CE80E1234567";

/// A register encoded the way push meters lay them out: OBIS code, u32
/// mantissa, scaler-unit structure with i8 exponent and enum unit.
fn push_register(buf: &mut Vec<u8>, obis: ObisCode, mantissa: u32, exponent: i8, unit: u8) {
    buf.extend_from_slice(&obis.0);
    buf.push(0x06);
    buf.extend_from_slice(&mantissa.to_be_bytes());
    buf.extend_from_slice(&[0x02, 0x02]);
    buf.push(0x0F);
    buf.push(exponent as u8);
    buf.push(0x16);
    buf.push(unit);
}

/// Full plaintext payload: 6-byte notification header, date-time at offset
/// 6, then the register list, zero-padded to the fixed 254 bytes.
fn build_payload(skip: Option<ObisCode>) -> Vec<u8> {
    let mut payload = vec![0x0F, 0x80, 0x23, 0xE1, 0x0C, 0x07];
    // 2026-08-25 Tuesday 10:30:15.00, UTC+60, DST
    payload.extend_from_slice(&[
        0x07, 0xEA, 0x08, 0x19, 0x02, 0x0A, 0x1E, 0x0F, 0x00, 0x00, 0x3C, 0x01,
    ]);

    let registers: &[(ObisCode, u32, i8, u8)] = &[
        (OBIS_ACTIVE_ENERGY_IMPORT, 1_234_567, 0, 30),
        (OBIS_ACTIVE_ENERGY_EXPORT, 7_654, 0, 30),
        (OBIS_ACTIVE_POWER_IMPORT, 500, 0, 27),
        (OBIS_ACTIVE_POWER_EXPORT, 120, 0, 27),
        (OBIS_VOLTAGE_L1, 2_301, -1, 35),
        (OBIS_VOLTAGE_L2, 2_298, -1, 35),
        (OBIS_VOLTAGE_L3, 2_305, -1, 35),
        (OBIS_CURRENT_L1, 150, -2, 33),
        (OBIS_CURRENT_L2, 98, -2, 33),
        (OBIS_CURRENT_L3, 201, -2, 33),
        (OBIS_POWER_FACTOR, 995, -3, 255),
    ];
    for (obis, mantissa, exponent, unit) in registers {
        if Some(*obis) == skip {
            continue;
        }
        push_register(&mut payload, *obis, *mantissa, *exponent, *unit);
    }

    assert!(payload.len() <= 254, "payload overflows the broadcast size");
    payload.resize(254, 0x00);
    payload
}

/// Wraps an encrypted payload into a 282-byte broadcast frame.
fn build_frame(frame_counter: u32, ciphertext: &[u8]) -> Vec<u8> {
    assert_eq!(ciphertext.len(), 254);
    let mut frame = vec![0x68, 0x01, 0x01, 0x68];
    frame.extend_from_slice(&[0x53, 0xFF, 0x00, 0x01, 0x67, 0xDB, 0x08]);
    frame.extend_from_slice(&SYSTEM_TITLE);
    frame.extend_from_slice(&[0x81, 0xF8, 0x20]);
    frame.extend_from_slice(&frame_counter.to_be_bytes());
    frame.extend_from_slice(ciphertext);
    frame.push(frame.iter().skip(4).fold(0u8, |acc, b| acc.wrapping_add(*b)));
    frame.push(0x16);
    frame
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value present");
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

fn encrypt_frame(frame_counter: u32, payload: &[u8]) -> Vec<u8> {
    let cipher = MeterCipher::new(
        AesKey::from_hex(KEY_HEX).unwrap(),
        SecurityMode::EncryptOnly,
    );
    let ciphertext = cipher
        .encrypt(&SYSTEM_TITLE, frame_counter, payload)
        .unwrap();
    build_frame(frame_counter, &ciphertext)
}

#[test]
fn test_full_reading_decodes() {
    let mut decoder = MeterDecoder::new(AesKey::from_hex(KEY_HEX).unwrap());
    let frame = encrypt_frame(0x10, &build_payload(None));

    let decoded = decoder.decode_frame(&frame).unwrap();
    assert_eq!(decoded.frame_counter, 0x10);
    assert_eq!(decoded.lost_frames, 0);

    let reading = &decoded.reading;
    assert_eq!(reading.value("active_energy_import"), Some(1_234_567.0));
    assert_eq!(reading.value("active_energy_export"), Some(7_654.0));
    assert_eq!(reading.value("active_power_import"), Some(500.0));
    assert_eq!(reading.value("active_power_export"), Some(120.0));
    assert_close(reading.value("voltage_l1"), 230.1);
    assert_close(reading.value("current_l1"), 1.5);
    assert_close(reading.value("power_factor"), 0.995);
    assert_eq!(reading.net_active_power, Some(380.0));

    let units: Vec<&str> = ["active_energy_import", "active_power_import", "voltage_l1", "current_l1"]
        .iter()
        .map(|name| reading.registers[*name].as_ref().unwrap().unit)
        .collect();
    assert_eq!(units, ["Wh", "W", "V", "A"]);
    assert_eq!(reading.registers["power_factor"].as_ref().unwrap().unit, "");

    let ts = reading.timestamp.expect("timestamp present");
    assert_eq!((ts.year, ts.month, ts.day), (2026, 8, 25));
    assert_eq!((ts.hour, ts.minute, ts.second), (10, 30, 15));
    assert_eq!(ts.utc_offset_minutes, 60);
    assert!(ts.is_dst);
}

#[test]
fn test_missing_register_downgrades_one_field() {
    let mut decoder = MeterDecoder::new(AesKey::from_hex(KEY_HEX).unwrap());
    let frame = encrypt_frame(0x10, &build_payload(Some(OBIS_VOLTAGE_L2)));

    let reading = decoder.decode_frame(&frame).unwrap().reading;
    assert_eq!(reading.registers["voltage_l2"], None);
    assert_close(reading.value("voltage_l1"), 230.1);
    assert_close(reading.value("voltage_l3"), 230.5);
    assert_eq!(reading.net_active_power, Some(380.0));
}

#[test]
fn test_sequence_loss_across_frames() {
    let mut decoder = MeterDecoder::new(AesKey::from_hex(KEY_HEX).unwrap());
    let payload = build_payload(None);

    let first = decoder.decode_frame(&encrypt_frame(10, &payload)).unwrap();
    assert_eq!(first.lost_frames, 0);

    let second = decoder.decode_frame(&encrypt_frame(13, &payload)).unwrap();
    assert_eq!(second.lost_frames, 2);

    let third = decoder.decode_frame(&encrypt_frame(14, &payload)).unwrap();
    assert_eq!(third.lost_frames, 0);
}

#[test]
fn test_wrong_key_yields_garbage_not_panic() {
    let mut decoder =
        MeterDecoder::new(AesKey::from_hex("00000000000000000000000000000000").unwrap());
    let frame = encrypt_frame(0x10, &build_payload(None));

    // Encrypt-only profile cannot detect the wrong key; the reading just
    // comes back empty because no OBIS code survives the keystream.
    let reading = decoder.decode_frame(&frame).unwrap().reading;
    assert!(reading.registers.values().all(|r| r.is_none()));
    assert_eq!(reading.net_active_power, None);
}

#[test]
fn test_rejected_frame_then_valid_frame() {
    let mut decoder = MeterDecoder::new(AesKey::from_hex(KEY_HEX).unwrap());

    let mut bad = encrypt_frame(9, &build_payload(None));
    bad[0] = 0x00;
    assert_eq!(
        decoder.decode_frame(&bad).unwrap_err(),
        MeterError::FrameFormat("bad start")
    );

    let good = encrypt_frame(10, &build_payload(None));
    assert!(decoder.decode_frame(&good).is_ok());
}
