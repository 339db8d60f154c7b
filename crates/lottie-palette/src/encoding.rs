//! Classification of the on-disk shapes a color array can take.
//!
//! A color-bearing property is classified once, into one [`Encoding`], and
//! every later read or write dispatches on that variant instead of probing the
//! JSON again. The probe order is fixed because the shapes overlap: "has a
//! `k` field" alone does not tell them apart.

use crate::path::Segment;
use lottie_data::model::{KEYFRAME_START_KEY, VALUE_KEY};
use serde_json::Value;

/// Where the raw color array lives relative to the object a site points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// `{ k: [ { s: [...] }, ... ] }`: the site points at a keyframe and the
    /// array is its start value.
    AnimatedKeyframe,
    /// `{ k: [...] }`: the site points at the property itself.
    StaticFlat,
    /// `{ k: { k: [...] } }`: the site points at the inner value object.
    StaticNested,
}

impl Encoding {
    /// Field of the addressed object that holds the color array.
    pub fn value_field(self) -> &'static str {
        match self {
            Encoding::AnimatedKeyframe => KEYFRAME_START_KEY,
            Encoding::StaticFlat | Encoding::StaticNested => VALUE_KEY,
        }
    }

    /// The color array inside `holder`, the object a site points at.
    pub fn array_in(self, holder: &Value) -> Option<&Vec<Value>> {
        holder.get(self.value_field())?.as_array()
    }

    pub fn array_in_mut(self, holder: &mut Value) -> Option<&mut Vec<Value>> {
        holder.get_mut(self.value_field())?.as_array_mut()
    }
}

/// One color array found beneath a property.
#[derive(Debug, Clone)]
pub struct Slot<'a> {
    pub encoding: Encoding,
    /// Path from the property to the object holding the array.
    pub holder: Vec<Segment>,
    pub values: &'a [Value],
}

fn is_color_array(values: &[Value], min_len: usize) -> bool {
    values.len() >= min_len && values[..min_len].iter().all(Value::is_number)
}

fn is_keyframe_list(values: &[Value]) -> bool {
    values.first().is_some_and(Value::is_object)
}

fn keyframe_slots<'a>(
    keyframes: &'a [Value],
    prefix: &[Segment],
    min_len: usize,
) -> Vec<Slot<'a>> {
    keyframes
        .iter()
        .enumerate()
        .filter_map(|(i, keyframe)| {
            let values = keyframe.get(KEYFRAME_START_KEY)?.as_array()?;
            if !is_color_array(values, min_len) {
                return None;
            }
            let mut holder = prefix.to_vec();
            holder.push(Segment::Index(i));
            Some(Slot {
                encoding: Encoding::AnimatedKeyframe,
                holder,
                values,
            })
        })
        .collect()
}

/// Classifies `property` and returns every color array it holds.
///
/// Probe order:
/// 1. `k` is a keyframe list, or `k.k` is a keyframe list (animated gradients
///    nest one level deeper). One slot per keyframe with a usable start value.
/// 2. `k` is a numeric array.
/// 3. `k.k` is a numeric array.
///
/// `min_len` is the number of leading numbers a usable array must have (3 for
/// solid colors, 4 for gradient stops). Returns an empty list when nothing
/// matches.
pub fn classify(property: &Value, min_len: usize) -> Vec<Slot<'_>> {
    let value_key = || Segment::Key(VALUE_KEY.to_string());
    let Some(k) = property.get(VALUE_KEY) else {
        return Vec::new();
    };

    if let Some(items) = k.as_array() {
        if is_keyframe_list(items) {
            return keyframe_slots(items, &[value_key()], min_len);
        }
        if is_color_array(items, min_len) {
            return vec![Slot {
                encoding: Encoding::StaticFlat,
                holder: Vec::new(),
                values: items,
            }];
        }
        return Vec::new();
    }

    if let Some(items) = k.get(VALUE_KEY).and_then(Value::as_array) {
        if is_keyframe_list(items) {
            return keyframe_slots(items, &[value_key(), value_key()], min_len);
        }
        if is_color_array(items, min_len) {
            return vec![Slot {
                encoding: Encoding::StaticNested,
                holder: vec![value_key()],
                values: items,
            }];
        }
    }

    Vec::new()
}
