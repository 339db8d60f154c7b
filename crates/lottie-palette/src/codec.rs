//! # Color Codec
//!
//! Conversion between the normalized `0..1` RGB floats stored in documents and
//! the `#rrggbb` strings used by color pickers and group keys.
//!
//! Hex output is always lowercase, so two sites with the same color always
//! produce the same group key.

use crate::errors::ColorError;
use glam::DVec3;

/// Scales a normalized channel to a byte.
///
/// No explicit clamp: the float-to-int cast saturates, so values below 0 map
/// to 0 and values above 1 map to 255.
fn channel_to_byte(v: f64) -> u8 {
    (v * 255.0).round() as u8
}

pub fn hex_from_rgb8(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

pub fn hex_from_normalized(rgb: DVec3) -> String {
    hex_from_rgb8([
        channel_to_byte(rgb.x),
        channel_to_byte(rgb.y),
        channel_to_byte(rgb.z),
    ])
}

/// Reads the leading three numbers of a raw color array (`[r, g, b, a?]`).
pub fn normalized_from_slice(values: &[serde_json::Value]) -> Option<DVec3> {
    match values {
        [r, g, b, ..] => Some(DVec3::new(r.as_f64()?, g.as_f64()?, b.as_f64()?)),
        _ => None,
    }
}

/// Parses `#rrggbb` or `#rgb` (case-insensitive) into bytes.
pub fn rgb_from_hex(hex: &str) -> Result<[u8; 3], ColorError> {
    let invalid = || ColorError::InvalidFormat(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };

    let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
    Ok([(value >> 16) as u8, (value >> 8) as u8, value as u8])
}

pub fn normalized_from_hex(hex: &str) -> Result<DVec3, ColorError> {
    let [r, g, b] = rgb_from_hex(hex)?;
    Ok(DVec3::new(r as f64, g as f64, b as f64) / 255.0)
}

/// Encodes a channel or stop position for writing into a document.
///
/// Whole numbers are stored as JSON integers (`1`, not `1.0`), so writing a
/// color back unchanged leaves the document equal to what was read.
pub fn json_number(v: f64) -> serde_json::Value {
    if v.fract() == 0.0 && v.abs() <= i64::MAX as f64 {
        serde_json::Value::from(v as i64)
    } else {
        serde_json::Value::from(v)
    }
}

/// Canonical form of a user-supplied hex string (`#ABC` -> `#aabbcc`).
pub fn normalize_hex(hex: &str) -> Result<String, ColorError> {
    rgb_from_hex(hex).map(hex_from_rgb8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hex_from_normalized() {
        assert_eq!(hex_from_normalized(DVec3::new(1.0, 0.0, 0.0)), "#ff0000");
        assert_eq!(hex_from_normalized(DVec3::new(0.5, 0.5, 0.5)), "#808080");
        assert_eq!(hex_from_normalized(DVec3::new(0.2, 0.4, 0.6)), "#336699");
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(hex_from_normalized(DVec3::new(-0.5, 1.5, 2.0)), "#00ffff");
    }

    #[test]
    fn test_rgb_from_hex_forms() {
        assert_eq!(rgb_from_hex("#FF8000").unwrap(), [255, 128, 0]);
        assert_eq!(rgb_from_hex("#ff8000").unwrap(), [255, 128, 0]);
        assert_eq!(rgb_from_hex("#F80").unwrap(), [255, 136, 0]);
    }

    #[test]
    fn test_rgb_from_hex_rejects_garbage() {
        for bad in ["", "#", "ff0000", "#ff00", "#ff00000", "#gg0000", "#+f0000", "#ff 000"] {
            assert_eq!(
                rgb_from_hex(bad),
                Err(ColorError::InvalidFormat(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_every_byte_survives_round_trip() {
        for v in 0..=255u8 {
            let hex = hex_from_rgb8([v, 255 - v, v / 2]);
            let normalized = normalized_from_hex(&hex).unwrap();
            assert_eq!(hex_from_normalized(normalized), hex);
        }
    }

    #[test]
    fn test_normalized_from_slice() {
        let values = json!([0.0, 0.5, 1.0, 1.0]);
        let rgb = normalized_from_slice(values.as_array().unwrap()).unwrap();
        assert_eq!(rgb, DVec3::new(0.0, 0.5, 1.0));

        let short = json!([0.0, 0.5]);
        assert!(normalized_from_slice(short.as_array().unwrap()).is_none());

        let mixed = json!([0.0, "x", 1.0]);
        assert!(normalized_from_slice(mixed.as_array().unwrap()).is_none());
    }

    #[test]
    fn test_json_number_keeps_whole_values_integral() {
        assert_eq!(json_number(1.0), json!(1));
        assert_eq!(json_number(0.0), json!(0));
        assert_eq!(json_number(-0.0), json!(0));
        assert_eq!(json_number(0.5), json!(0.5));
        assert_eq!(json_number(170.0 / 255.0), json!(170.0 / 255.0));
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("#ABC").unwrap(), "#aabbcc");
        assert_eq!(normalize_hex("#00FF7f").unwrap(), "#00ff7f");
    }
}
