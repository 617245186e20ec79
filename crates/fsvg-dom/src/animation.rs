//! Animation tracks
//!
//! Time-varying overrides for one `(attribute, tier)` pair of an element.
//! Animation elements (`set`, `animate`) produce a [`TrackBinding`] when
//! they are appended; the binding is stored on the parent, which is the
//! element they animate.

use std::collections::HashMap;
use std::fmt;

use crate::NodeId;
use crate::attribute::AttributeTier;
use crate::error::{DomError, DomResult};

/// A time-varying attribute value
pub trait AnimationTrack: fmt::Debug {
    /// Value at `time` (seconds), animating from `base`.
    ///
    /// Returns `None` while the animation is not active, leaving `base`
    /// in effect.
    fn value_at(&self, base: &str, time: f64) -> DomResult<Option<String>>;
}

/// What an animation-bearing element contributes to its parent
#[derive(Debug)]
pub struct TrackBinding {
    pub attribute: String,
    pub tier: AttributeTier,
    pub track: Box<dyn AnimationTrack>,
}

/// Layers targeting a single `(attribute, tier)` key, in document order
#[derive(Debug, Default)]
pub struct Track {
    layers: Vec<(NodeId, Box<dyn AnimationTrack>)>,
}

impl Track {
    /// Fold all layers over `base`. Later layers see earlier results.
    pub fn evaluate(&self, base: &str, time: f64) -> DomResult<String> {
        let mut value = base.to_string();
        for (_, layer) in &self.layers {
            if let Some(next) = layer.value_at(&value, time)? {
                value = next;
            }
        }
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Per-element track registry
#[derive(Debug, Default)]
pub struct TrackManager {
    tracks: HashMap<AttributeTier, HashMap<String, Track>>,
}

impl TrackManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer contributed by animation element `source`.
    ///
    /// The binding tier must already be concrete (not `Auto`).
    pub fn add(&mut self, source: NodeId, binding: TrackBinding) {
        self.tracks
            .entry(binding.tier)
            .or_default()
            .entry(binding.attribute)
            .or_default()
            .layers
            .push((source, binding.track));
    }

    /// Drop every layer contributed by `source`
    pub fn remove_source(&mut self, source: NodeId) {
        for by_name in self.tracks.values_mut() {
            for track in by_name.values_mut() {
                track.layers.retain(|(id, _)| *id != source);
            }
            by_name.retain(|_, track| !track.is_empty());
        }
        self.tracks.retain(|_, by_name| !by_name.is_empty());
    }

    pub fn get(&self, attribute: &str, tier: AttributeTier) -> Option<&Track> {
        self.tracks.get(&tier)?.get(attribute)
    }

    /// Number of animated `(attribute, tier)` keys
    pub fn len(&self) -> usize {
        self.tracks.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Parse a clock value: `"2"`, `"1.5s"`, `"500ms"`
pub fn parse_clock_value(text: &str) -> DomResult<f64> {
    let text = text.trim();
    let (number, scale) = if let Some(ms) = text.strip_suffix("ms") {
        (ms, 0.001)
    } else if let Some(s) = text.strip_suffix('s') {
        (s, 1.0)
    } else {
        (text, 1.0)
    };
    number
        .trim()
        .parse::<f64>()
        .map(|v| v * scale)
        .map_err(|_| DomError::Animation(format!("invalid clock value {:?}", text)))
}

/// Tier named by an `attributeType` attribute
pub fn parse_attribute_type(text: Option<&str>) -> DomResult<AttributeTier> {
    match text.map(str::trim) {
        None | Some("") | Some("auto") => Ok(AttributeTier::Auto),
        Some("CSS") => Ok(AttributeTier::Style),
        Some("XML") => Ok(AttributeTier::Markup),
        Some(other) => Err(DomError::Animation(format!("invalid attributeType {:?}", other))),
    }
}

/// Linear interpolation
pub fn lerp(t0: f64, t1: f64, alpha: f64) -> f64 {
    (1.0 - alpha) * t0 + alpha * t1
}

/// Discrete value applied over an interval (`<set>`)
#[derive(Debug, Clone, PartialEq)]
pub struct SetTrack {
    pub to: String,
    pub begin: f64,
    /// `None` for an indefinite duration
    pub duration: Option<f64>,
}

impl AnimationTrack for SetTrack {
    fn value_at(&self, _base: &str, time: f64) -> DomResult<Option<String>> {
        let started = time >= self.begin;
        let ended = self.duration.is_some_and(|dur| time >= self.begin + dur);
        Ok((started && !ended).then(|| self.to.clone()))
    }
}

/// Interpolated value over an interval (`<animate>`)
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedTrack {
    /// `None` animates from the base value
    pub from: Option<String>,
    pub to: String,
    pub begin: f64,
    pub duration: f64,
    /// Keep the final value once the interval has ended
    pub freeze: bool,
}

impl InterpolatedTrack {
    fn interpolate(from: &str, to: &str, alpha: f64) -> String {
        match (from.trim().parse::<f64>(), to.trim().parse::<f64>()) {
            (Ok(a), Ok(b)) => format!("{}", lerp(a, b, alpha)),
            _ if alpha < 0.5 => from.to_string(),
            _ => to.to_string(),
        }
    }
}

impl AnimationTrack for InterpolatedTrack {
    fn value_at(&self, base: &str, time: f64) -> DomResult<Option<String>> {
        if time < self.begin {
            return Ok(None);
        }
        let end = self.begin + self.duration;
        if time >= end {
            return Ok(self.freeze.then(|| self.to.clone()));
        }

        let from = self.from.as_deref().unwrap_or(base);
        let alpha = (time - self.begin) / self.duration;
        Ok(Some(Self::interpolate(from, &self.to, alpha)))
    }
}
