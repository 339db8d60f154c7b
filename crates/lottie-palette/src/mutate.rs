//! # Mutation Engine
//!
//! Writes colors back into the exact slot a [`ColorSite`] was read from.
//!
//! Writes keep the site's encoding: an animated keyframe stays a keyframe, a
//! flat array stays flat. A site whose slot no longer has the expected shape is
//! skipped rather than failing, so one odd instance never blocks recoloring
//! the rest of a group.

use crate::codec::{json_number, normalize_hex, normalized_from_hex};
use crate::errors::ColorError;
use crate::extract::{ColorGroup, ColorSite};
use glam::DVec3;
use serde_json::Value;
use tracing::debug;

pub enum ColorTarget<'a> {
    Site(&'a ColorSite),
    Group(&'a mut ColorGroup),
}

/// Applies `hex` to a site or to every member of a group.
///
/// Returns the number of sites actually written. For a group, the cached
/// `hex` label is updated immediately; the rest of the palette is stale until
/// the caller re-extracts.
pub fn apply_color(document: &mut Value, target: ColorTarget<'_>, hex: &str) -> Result<usize, ColorError> {
    let rgb = normalized_from_hex(hex)?;
    let written = match target {
        ColorTarget::Site(site) => usize::from(write_site(document, site, rgb)),
        ColorTarget::Group(group) => {
            let written = group
                .instances
                .iter()
                .filter(|site| write_site(document, site, rgb))
                .count();
            group.hex = normalize_hex(hex)?;
            written
        }
    };
    Ok(written)
}

/// Writes one normalized color into the slot the site addresses.
///
/// Solid sites get `[r, g, b, 1]` (alpha is reset to opaque). Gradient sites
/// get `r, g, b` at `offset + 1 ..= offset + 3`; the stop position is kept.
pub fn write_site(document: &mut Value, site: &ColorSite, rgb: DVec3) -> bool {
    let values = site
        .location
        .resolve_mut(document)
        .and_then(|holder| site.encoding.array_in_mut(holder));

    let written = match (values, &site.stop) {
        (Some(values), None) if values.len() >= 3 => {
            *values = solid_values(rgb);
            true
        }
        (Some(values), Some(stop)) => write_stop(values, stop.offset, rgb),
        _ => false,
    };

    if !written {
        debug!(location = %site.location, "skipped color write: slot no longer matches");
    }
    written
}

fn solid_values(rgb: DVec3) -> Vec<Value> {
    vec![json_number(rgb.x), json_number(rgb.y), json_number(rgb.z), 1.into()]
}

fn write_stop(values: &mut [Value], offset: usize, rgb: DVec3) -> bool {
    match values.get_mut(offset + 1..=offset + 3) {
        Some([r, g, b]) => {
            *r = json_number(rgb.x);
            *g = json_number(rgb.y);
            *b = json_number(rgb.z);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Palette;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "layers": [{
                "shapes": [
                    { "ty": "fl", "c": { "a": 0, "k": [1, 0, 0, 0.5] } },
                    { "ty": "st", "c": { "a": 1, "k": [
                        { "t": 0, "s": [1, 0, 0, 1] },
                        { "t": 30, "s": [0, 1, 0, 1] }
                    ] } },
                    { "ty": "fl", "c": { "k": { "a": 0, "k": [1, 0, 0, 1] } } },
                    { "ty": "gf", "g": { "p": 2, "k": { "a": 0, "k": [0, 1, 0, 0, 1, 0, 1, 0, 0, 1, 1, 0.3] } } }
                ]
            }]
        })
    }

    #[test]
    fn test_group_write_keeps_each_encoding() {
        let mut document = doc();
        let mut palette = Palette::extract(&document);
        let group = palette.group_mut("#ff0000").unwrap();
        assert_eq!(group.usage_count(), 4);

        let written = apply_color(&mut document, ColorTarget::Group(group), "#0000FF").unwrap();
        assert_eq!(written, 4);
        assert_eq!(palette.group_at(0).unwrap().hex, "#0000ff");

        let shapes = &document["layers"][0]["shapes"];
        // Flat: alpha forced to 1.
        assert_eq!(shapes[0]["c"]["k"], json!([0, 0, 1, 1]));
        // Animated: still a keyframe list, only the matching keyframe changed.
        assert_eq!(shapes[1]["c"]["a"], json!(1));
        assert_eq!(shapes[1]["c"]["k"][0]["s"], json!([0, 0, 1, 1]));
        assert_eq!(shapes[1]["c"]["k"][0]["t"], json!(0));
        assert_eq!(shapes[1]["c"]["k"][1]["s"], json!([0, 1, 0, 1]));
        // Nested.
        assert_eq!(shapes[2]["c"]["k"]["k"], json!([0, 0, 1, 1]));
        // Gradient: position kept, second stop and alpha tail untouched.
        assert_eq!(
            shapes[3]["g"]["k"]["k"],
            json!([0, 0, 0, 1, 1, 0, 1, 0, 0, 1, 1, 0.3])
        );
    }

    #[test]
    fn test_single_site_write() {
        let mut document = doc();
        let palette = Palette::extract(&document);
        let site = &palette.sites()[2];
        assert_eq!(site.hex, "#00ff00");
        let written = apply_color(&mut document, ColorTarget::Site(site), "#fff").unwrap();
        assert_eq!(written, 1);
        assert_eq!(
            document["layers"][0]["shapes"][1]["c"]["k"][1]["s"],
            json!([1, 1, 1, 1])
        );
    }

    #[test]
    fn test_same_color_write_leaves_document_equal() {
        let mut document = doc();
        let before = document.clone();
        let mut palette = Palette::extract(&document);
        let group = palette.group_mut("#00ff00").unwrap();
        let written = apply_color(&mut document, ColorTarget::Group(group), "#00FF00").unwrap();
        assert_eq!(written, 2);
        assert_eq!(document, before);
    }

    #[test]
    fn test_invalid_hex_leaves_document_untouched() {
        let mut document = doc();
        let before = document.clone();
        let mut palette = Palette::extract(&document);
        let group = palette.group_mut("#ff0000").unwrap();
        let err = apply_color(&mut document, ColorTarget::Group(group), "red").unwrap_err();
        assert_eq!(err, ColorError::InvalidFormat("red".into()));
        assert_eq!(document, before);
        assert_eq!(palette.group("#ff0000").unwrap().hex, "#ff0000");
    }

    #[test]
    fn test_stale_sites_are_skipped() {
        let mut document = doc();
        let mut palette = Palette::extract(&document);
        // Change the shape under two of the red sites.
        document["layers"][0]["shapes"][0]["c"]["k"] = json!(42);
        document["layers"][0]["shapes"][3]["g"]["k"]["k"] = json!([0, 1]);

        let group = palette.group_mut("#ff0000").unwrap();
        let written = apply_color(&mut document, ColorTarget::Group(group), "#00ff00").unwrap();
        assert_eq!(written, 2);
        assert_eq!(document["layers"][0]["shapes"][0]["c"]["k"], json!(42));
        assert_eq!(document["layers"][0]["shapes"][3]["g"]["k"]["k"], json!([0, 1]));
    }

    #[test]
    fn test_mutation_is_isolated_to_group() {
        let mut document = doc();
        let mut palette = Palette::extract(&document);
        let others: Vec<_> = palette
            .sites()
            .iter()
            .filter(|s| s.hex != "#00ff00")
            .map(|s| (s.location.clone(), s.stop_index(), s.hex.clone()))
            .collect();

        let group = palette.group_mut("#00ff00").unwrap();
        apply_color(&mut document, ColorTarget::Group(group), "#123456").unwrap();

        let after = Palette::extract(&document);
        for (location, stop, hex) in others {
            let site = after
                .sites()
                .iter()
                .find(|s| s.location == location && s.stop_index() == stop)
                .unwrap();
            assert_eq!(site.hex, hex);
        }
        assert_eq!(after.group("#123456").unwrap().usage_count(), 2);
    }
}
