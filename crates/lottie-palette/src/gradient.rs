//! # Gradient Edit Session
//!
//! A working copy of one gradient's color stops.
//!
//! The session is opened from a color group, edited entirely in memory, and
//! either committed back into the document or dropped. Nothing is written
//! until [`GradientSession::commit`].
//!
//! The stop count `p` is shared by every keyframe of an animated gradient, so
//! adding or removing a stop in one keyframe applies the same insert/remove to
//! its siblings. Each sibling keeps its own values for the stops it already had.

use crate::codec::{hex_from_normalized, json_number, normalized_from_hex};
use crate::encoding::Encoding;
use crate::errors::EditorError;
use crate::extract::{color_stop_count, declared_stop_count, ColorGroup, STOP_STRIDE};
use crate::path::{NodePath, Segment};
use glam::DVec3;
use lottie_data::model::{STOP_COUNT_KEY, VALUE_KEY};
use serde_json::Value;
use tracing::debug;

/// Fewest stops a gradient can render with.
pub const MIN_STOPS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Taken as stored. Not required to lie in `0..=1`.
    pub position: f64,
    pub color: DVec3,
    /// Index among the stops the session was opened with; `None` once added.
    source: Option<usize>,
}

impl GradientStop {
    pub fn hex(&self) -> String {
        hex_from_normalized(self.color)
    }
}

#[derive(Debug, Clone)]
pub struct GradientSession {
    group_hex: String,
    holder: NodePath,
    encoding: Encoding,
    container: NodePath,
    /// Color-stop values as found at open time.
    original: Vec<GradientStop>,
    /// Raw values after the color stops (alpha stops), written back unchanged.
    tail: Vec<Value>,
    stops: Vec<GradientStop>,
}

impl GradientSession {
    /// Opens a session on the first gradient site of `group`.
    pub fn open(document: &Value, group: &ColorGroup) -> Result<Self, EditorError> {
        let (site, stop) = group
            .instances
            .iter()
            .find_map(|site| site.stop.as_ref().map(|stop| (site, stop)))
            .ok_or(EditorError::NoGradientSite)?;

        let values = site
            .location
            .resolve(document)
            .and_then(|holder| site.encoding.array_in(holder))
            .ok_or(EditorError::UnsupportedGradient)?;
        let declared = stop
            .container
            .resolve(document)
            .and_then(declared_stop_count);
        let count = color_stop_count(declared, values.len());

        let original =
            decode_stops(&values[..count * STOP_STRIDE]).ok_or(EditorError::UnsupportedGradient)?;
        if original.is_empty() {
            return Err(EditorError::UnsupportedGradient);
        }

        let mut session = Self {
            group_hex: group.hex.clone(),
            holder: site.location.clone(),
            encoding: site.encoding,
            container: stop.container.clone(),
            tail: values[count * STOP_STRIDE..].to_vec(),
            stops: Vec::new(),
            original,
        };
        session.reset_to_original();
        debug!(location = %session.holder, stops = session.stops.len(), "opened gradient session");
        Ok(session)
    }

    /// Key of the group the session was opened from.
    pub fn group_hex(&self) -> &str {
        &self.group_hex
    }

    /// Stops sorted by position.
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Inserts a stop halfway between the first and last stop, colored like
    /// the middle stop. Returns its index.
    pub fn add_stop(&mut self) -> usize {
        let position = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) if self.stops.len() >= 2 => {
                (first.position + last.position) / 2.0
            }
            _ => 0.5,
        };
        let color = self
            .stops
            .get(self.stops.len() / 2)
            .map_or(DVec3::ONE, |stop| stop.color);

        self.stops.push(GradientStop {
            position,
            color,
            source: None,
        });
        self.sort();
        self.stops
            .iter()
            .rposition(|stop| stop.position == position && stop.color == color)
            .unwrap_or(self.stops.len() - 1)
    }

    pub fn remove_stop(&mut self, index: usize) -> Result<GradientStop, EditorError> {
        if self.stops.len() <= MIN_STOPS {
            return Err(EditorError::StopFloor {
                remaining: self.stops.len(),
            });
        }
        self.check_index(index)?;
        Ok(self.stops.remove(index))
    }

    /// Moves a stop, clamping to `0..=1`, and re-sorts.
    pub fn move_stop(&mut self, index: usize, position: f64) -> Result<(), EditorError> {
        self.check_index(index)?;
        if !position.is_finite() {
            return Err(EditorError::invalid_input(format!(
                "stop position must be a number, got {position}"
            )));
        }
        self.stops[index].position = position.clamp(0.0, 1.0);
        self.sort();
        Ok(())
    }

    pub fn set_stop_color(&mut self, index: usize, hex: &str) -> Result<(), EditorError> {
        self.check_index(index)?;
        self.stops[index].color = normalized_from_hex(hex)?;
        Ok(())
    }

    /// Mirrors every position (`p -> 1 - p`).
    pub fn reverse(&mut self) {
        for stop in &mut self.stops {
            stop.position = 1.0 - stop.position;
        }
        self.sort();
    }

    pub fn reset_to_original(&mut self) {
        self.stops = self.original.clone();
        self.sort();
    }

    /// The flat array the document will hold after commit.
    pub fn to_raw(&self) -> Vec<Value> {
        encode_stops(&self.stops, &self.tail)
    }

    /// Writes the stops back into the slot the session was opened on.
    ///
    /// Falls back to a fresh `k` array on the same object when the slot is no
    /// longer an array. When stops were added or removed, the container's stop
    /// count is updated and sibling keyframes are resized to match; a sibling
    /// that cannot be decoded fails the commit before anything is written.
    /// Returns the hex of the first stop, which callers use as the group's new
    /// label.
    pub fn commit(self, document: &mut Value) -> Result<String, EditorError> {
        let resized = self.stops.len() != self.original.len();
        let siblings = if resized && self.encoding == Encoding::AnimatedKeyframe {
            self.resize_siblings(document)?
        } else {
            Vec::new()
        };

        let raw = self.to_raw();
        let holder = self
            .holder
            .resolve_mut(document)
            .ok_or_else(|| EditorError::StaleSite(self.holder.to_string()))?;

        match self.encoding.array_in_mut(holder) {
            Some(values) => *values = raw,
            None => {
                let Value::Object(map) = holder else {
                    return Err(EditorError::StaleSite(self.holder.to_string()));
                };
                map.insert(VALUE_KEY.to_string(), Value::Array(raw));
            }
        }

        for (location, values) in siblings {
            if let Some(slot) = location
                .resolve_mut(document)
                .and_then(|keyframe| self.encoding.array_in_mut(keyframe))
            {
                *slot = values;
            }
        }

        if resized {
            if let Some(Value::Object(container)) = self.container.resolve_mut(document) {
                container.insert(STOP_COUNT_KEY.to_string(), self.stops.len().into());
            }
        }

        debug!(location = %self.holder, stops = self.stops.len(), "committed gradient session");
        Ok(self
            .stops
            .first()
            .map_or_else(|| "#000000".to_string(), GradientStop::hex))
    }

    /// New start values for every other keyframe of the animated gradient.
    fn resize_siblings(&self, document: &Value) -> Result<Vec<(NodePath, Vec<Value>)>, EditorError> {
        let Some((list, Segment::Index(own))) = self.holder.split_last() else {
            return Ok(Vec::new());
        };
        let keyframes = list
            .resolve(document)
            .and_then(Value::as_array)
            .ok_or(EditorError::UnsupportedGradient)?;
        let declared = self
            .container
            .resolve(document)
            .and_then(declared_stop_count);

        let mut rewrites = Vec::new();
        for (index, keyframe) in keyframes.iter().enumerate() {
            if index == *own {
                continue;
            }
            // Hold keyframes may carry no start value.
            let Some(values) = self.encoding.array_in(keyframe) else {
                continue;
            };
            let count = color_stop_count(declared, values.len());
            let existing = decode_stops(&values[..count * STOP_STRIDE])
                .ok_or(EditorError::UnsupportedGradient)?;

            let mut stops: Vec<_> = self
                .stops
                .iter()
                .map(|stop| {
                    stop.source
                        .and_then(|source| existing.get(source))
                        .copied()
                        .unwrap_or(*stop)
                })
                .collect();
            sort_stops(&mut stops);
            rewrites.push((
                list.child(index),
                encode_stops(&stops, &values[count * STOP_STRIDE..]),
            ));
        }
        debug!(keyframes = rewrites.len(), "resized sibling gradient keyframes");
        Ok(rewrites)
    }

    fn check_index(&self, index: usize) -> Result<(), EditorError> {
        if index < self.stops.len() {
            Ok(())
        } else {
            Err(EditorError::StopOutOfRange {
                index,
                len: self.stops.len(),
            })
        }
    }

    fn sort(&mut self) {
        sort_stops(&mut self.stops);
    }
}

fn sort_stops(stops: &mut [GradientStop]) {
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
}

/// Decodes `[p, r, g, b]` groups, tagging each stop with its index.
fn decode_stops(values: &[Value]) -> Option<Vec<GradientStop>> {
    values
        .chunks_exact(STOP_STRIDE)
        .enumerate()
        .map(|(index, chunk)| match chunk {
            [p, r, g, b] => Some(GradientStop {
                position: p.as_f64()?,
                color: DVec3::new(r.as_f64()?, g.as_f64()?, b.as_f64()?),
                source: Some(index),
            }),
            _ => None,
        })
        .collect()
}

fn encode_stops(stops: &[GradientStop], tail: &[Value]) -> Vec<Value> {
    stops
        .iter()
        .flat_map(|stop| {
            [
                json_number(stop.position),
                json_number(stop.color.x),
                json_number(stop.color.y),
                json_number(stop.color.z),
            ]
        })
        .chain(tail.iter().cloned())
        .collect()
}
