// SPDX-License-Identifier: MPL-2.0

//! Integration tests for context preferences

use camera_preview::ContextPreferences;

#[test]
fn test_preferences_default() {
    let preferences = ContextPreferences::default();

    assert_eq!(preferences.red_bits, 8);
    assert_eq!(preferences.green_bits, 8);
    assert_eq!(preferences.blue_bits, 8);
    assert_eq!(
        preferences.alpha_bits, 0,
        "Opaque configs should be preferred by default"
    );
    assert_eq!(preferences.depth_bits, 16);
    assert_eq!(preferences.stencil_bits, 0);
}

#[test]
fn test_preferences_serde_round_trip() {
    let preferences = ContextPreferences {
        red_bits: 5,
        green_bits: 6,
        blue_bits: 5,
        alpha_bits: 0,
        depth_bits: 24,
        stencil_bits: 8,
    };

    let json = serde_json::to_string(&preferences).unwrap();
    let restored: ContextPreferences = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, preferences);
}

#[test]
fn test_preferences_deserialize_from_plain_fields() {
    let json = r#"{
        "red_bits": 8,
        "green_bits": 8,
        "blue_bits": 8,
        "alpha_bits": 8,
        "depth_bits": 0,
        "stencil_bits": 0
    }"#;

    let preferences: ContextPreferences = serde_json::from_str(json).unwrap();
    assert_eq!(preferences.alpha_bits, 8);
    assert_eq!(preferences.depth_bits, 0);
}
