use m100_common::settings::IMAGE_MAGIC;

use super::*;

#[test]
fn encode_layout() {
    let bytes = encode(&Settings::default());
    assert_eq!(bytes.len(), Settings::default().image_len() * 2);
    assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]), IMAGE_MAGIC);
    assert_eq!(decode(&bytes).unwrap(), Settings::default());
}

#[test]
fn decode_errors() {
    let mut bytes = encode(&Settings::default());
    assert!(decode(&bytes[..5]).is_err());

    bytes[8] ^= 0x10;
    let err = decode(&bytes).unwrap_err();
    assert!(format!("{err}").contains("Checksum"), "{err}");

    assert!(format!("{}", decode(&[0xff; 16]).unwrap_err()).contains("Blank"));
}

#[test]
fn assignments() {
    let mut settings = Settings::default();
    assign(&mut settings, "qukeys_overlap=65").unwrap();
    assign(&mut settings, " LED_EFFECT = 3 ").unwrap();
    assert_eq!(settings.qukeys_overlap(), 65);
    assert_eq!(settings.led_effect(), 3);

    assert!(assign(&mut settings, "qukeys_overlap=101").is_err());
    assert!(assign(&mut settings, "qukeys_overlap").is_err());
    assert!(assign(&mut settings, "nope=1").is_err());
    assert!(assign(&mut settings, "led_effect=x").is_err());
    assert_eq!(settings.led_effect(), 3);
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.bin");

    assert_eq!(read_or_default(&path).unwrap(), Settings::default());
    assert!(read_file(&path).is_err());

    let mut settings = Settings::default();
    assign(&mut settings, "idle_led_timeout=0").unwrap();
    write_file(&path, &settings).unwrap();
    assert_eq!(read_or_default(&path).unwrap(), settings);
    assert_eq!(
        describe(&settings),
        [
            "qukeys_overlap = 80",
            "idle_led_timeout = 0",
            "led_brightness = 160",
            "led_effect = 0",
        ]
    );
}
