//! # Color-Site Extractor
//!
//! Walks a document once, depth first, and records every color it can edit.
//!
//! ## Key Types
//! - `ColorSite`: one color occurrence and the path needed to write it back.
//! - `ColorGroup`: all sites sharing one hex value, in first-seen order.
//! - `Palette`: the flat site list plus the insertion-ordered group index.
//!
//! A `Palette` is a snapshot view. Any write to the document invalidates it,
//! and callers re-run [`Palette::extract`] to see the new colors.

use crate::codec::{hex_from_normalized, normalized_from_slice};
use crate::encoding::{classify, Encoding};
use crate::path::{NodePath, Segment};
use indexmap::IndexMap;
use lottie_data::model::{
    PaintType, COLOR_KEY, COLOR_KEYS, GRADIENT_KEY, LEGACY_STROKE_COLOR_KEY, STOP_COUNT_KEY,
};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Values per gradient color stop: position, r, g, b.
pub const STOP_STRIDE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Fill,
    Stroke,
    GradientFill,
    GradientStroke,
    Gradient,
    Solid,
}

impl ShapeKind {
    fn solid(paint: Option<PaintType>) -> Self {
        match paint {
            Some(PaintType::Fill) => ShapeKind::Fill,
            Some(PaintType::Stroke) => ShapeKind::Stroke,
            _ => ShapeKind::Solid,
        }
    }

    fn gradient(paint: Option<PaintType>) -> Self {
        match paint {
            Some(PaintType::GradientFill) => ShapeKind::GradientFill,
            Some(PaintType::GradientStroke) => ShapeKind::GradientStroke,
            _ => ShapeKind::Gradient,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Fill => "Fill",
            ShapeKind::Stroke => "Stroke",
            ShapeKind::GradientFill => "Gradient Fill",
            ShapeKind::GradientStroke => "Gradient Stroke",
            ShapeKind::Gradient => "Gradient",
            ShapeKind::Solid => "Solid",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKind {
    Solid,
    Gradient,
}

/// Position of one gradient color stop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopRef {
    /// The gradient container (`g`), which owns the stop count.
    pub container: NodePath,
    /// Offset of the stop's position value in the flat array. Multiple of 4.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorSite {
    /// The object holding the color array: a keyframe, the property, or its
    /// nested value object, depending on `encoding`.
    pub location: NodePath,
    pub encoding: Encoding,
    pub shape_kind: ShapeKind,
    /// Cached at extraction time. Stale after any write.
    pub hex: String,
    /// Set for gradient stops only.
    pub stop: Option<StopRef>,
}

impl ColorSite {
    pub fn color_kind(&self) -> ColorKind {
        if self.stop.is_some() {
            ColorKind::Gradient
        } else {
            ColorKind::Solid
        }
    }

    pub fn stop_index(&self) -> Option<usize> {
        self.stop.as_ref().map(|s| s.offset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    pub hex: String,
    pub instances: Vec<ColorSite>,
}

impl ColorGroup {
    pub fn usage_count(&self) -> usize {
        self.instances.len()
    }

    pub fn is_gradient_group(&self) -> bool {
        self.instances
            .iter()
            .any(|site| site.color_kind() == ColorKind::Gradient)
    }
}

/// Card filter offered next to the color list.
///
/// Matching is on the shape-kind label, so `Fill` also matches gradient fills
/// and `Gradient` matches every gradient kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorFilter {
    #[default]
    All,
    Fill,
    Stroke,
    Gradient,
}

impl ColorFilter {
    pub fn matches(self, kind: ShapeKind) -> bool {
        let word = match self {
            ColorFilter::All => return true,
            ColorFilter::Fill => "Fill",
            ColorFilter::Stroke => "Stroke",
            ColorFilter::Gradient => "Gradient",
        };
        kind.label().contains(word)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Palette {
    sites: Vec<ColorSite>,
    groups: IndexMap<String, ColorGroup>,
}

impl Palette {
    /// Builds the site list and group index in a single traversal.
    pub fn extract(document: &Value) -> Self {
        let mut palette = Palette::default();
        let mut path = Vec::new();
        palette.walk(document, &mut path);
        debug!(
            sites = palette.sites.len(),
            groups = palette.groups.len(),
            "extracted colors"
        );
        palette
    }

    pub fn sites(&self) -> &[ColorSite] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> Option<&ColorSite> {
        self.sites.get(index)
    }

    /// Groups in first-seen order.
    pub fn groups(&self) -> impl Iterator<Item = &ColorGroup> {
        self.groups.values()
    }

    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut ColorGroup> {
        self.groups.values_mut()
    }

    pub fn group(&self, hex: &str) -> Option<&ColorGroup> {
        self.groups.get(hex)
    }

    pub fn group_mut(&mut self, hex: &str) -> Option<&mut ColorGroup> {
        self.groups.get_mut(hex)
    }

    pub fn group_at(&self, index: usize) -> Option<&ColorGroup> {
        self.groups.get_index(index).map(|(_, group)| group)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn filtered_sites(&self, filter: ColorFilter) -> impl Iterator<Item = &ColorSite> {
        self.sites
            .iter()
            .filter(move |site| filter.matches(site.shape_kind))
    }

    pub fn filtered_groups(&self, filter: ColorFilter) -> impl Iterator<Item = &ColorGroup> {
        self.groups.values().filter(move |group| {
            group
                .instances
                .iter()
                .any(|site| filter.matches(site.shape_kind))
        })
    }

    fn push(&mut self, site: ColorSite) {
        self.groups
            .entry(site.hex.clone())
            .or_insert_with(|| ColorGroup {
                hex: site.hex.clone(),
                instances: Vec::new(),
            })
            .instances
            .push(site.clone());
        self.sites.push(site);
    }

    fn walk(&mut self, node: &Value, path: &mut Vec<Segment>) {
        match node {
            Value::Object(map) => {
                let paint = PaintType::of_node(node);

                if let Some(prop) = map.get(COLOR_KEY) {
                    self.solid(prop, path, COLOR_KEY, ShapeKind::solid(paint));
                }
                if let Some(prop) = map.get(LEGACY_STROKE_COLOR_KEY) {
                    self.solid(prop, path, LEGACY_STROKE_COLOR_KEY, ShapeKind::Stroke);
                }
                if let Some(gradient) = map.get(GRADIENT_KEY) {
                    self.gradient(gradient, path, ShapeKind::gradient(paint));
                }

                for (key, child) in map {
                    if COLOR_KEYS.contains(&key.as_str()) || !is_container(child) {
                        continue;
                    }
                    path.push(Segment::Key(key.clone()));
                    self.walk(child, path);
                    path.pop();
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    if !is_container(child) {
                        continue;
                    }
                    path.push(Segment::Index(i));
                    self.walk(child, path);
                    path.pop();
                }
            }
            _ => {}
        }
    }

    fn solid(&mut self, prop: &Value, path: &[Segment], key: &str, kind: ShapeKind) {
        let base = NodePath::from(path.to_vec()).child(key);
        for slot in classify(prop, 3) {
            let Some(rgb) = normalized_from_slice(slot.values) else {
                continue;
            };
            self.push(ColorSite {
                location: base.join(&slot.holder),
                encoding: slot.encoding,
                shape_kind: kind,
                hex: hex_from_normalized(rgb),
                stop: None,
            });
        }
    }

    fn gradient(&mut self, gradient: &Value, path: &[Segment], kind: ShapeKind) {
        let container = NodePath::from(path.to_vec()).child(GRADIENT_KEY);
        let declared = declared_stop_count(gradient);
        for slot in classify(gradient, STOP_STRIDE) {
            let location = container.join(&slot.holder);
            for offset in stop_offsets(declared, slot.values.len()) {
                let Some(rgb) = normalized_from_slice(&slot.values[offset + 1..]) else {
                    continue;
                };
                self.push(ColorSite {
                    location: location.clone(),
                    encoding: slot.encoding,
                    shape_kind: kind,
                    hex: hex_from_normalized(rgb),
                    stop: Some(StopRef {
                        container: container.clone(),
                        offset,
                    }),
                });
            }
        }
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// The gradient's declared color-stop count. Zero or missing means "derive it".
pub(crate) fn declared_stop_count(gradient: &Value) -> Option<usize> {
    gradient
        .get(STOP_COUNT_KEY)
        .and_then(Value::as_f64)
        .filter(|p| *p >= 1.0)
        .map(|p| p as usize)
}

/// Number of color stops in a flat array of `len` values.
///
/// Values past `count * 4` (alpha stops) are not color stops. A declared
/// count larger than the array can hold is capped.
pub(crate) fn color_stop_count(declared: Option<usize>, len: usize) -> usize {
    let available = len / STOP_STRIDE;
    declared.map_or(available, |p| p.min(available))
}

fn stop_offsets(declared: Option<usize>, len: usize) -> impl Iterator<Item = usize> {
    (0..color_stop_count(declared, len)).map(|stop| stop * STOP_STRIDE)
}
