use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Point;
use crate::foundation::error::{DrosteError, DrosteResult};

/// Which recursive copy ends up on top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Layering {
    /// The scaled-down copies are drawn over the larger ones.
    #[default]
    OnFront,
    /// The scaled-down copies are drawn behind the larger ones.
    OnBack,
}

impl Layering {
    /// Map an iteration depth in `[min, max]` to the depth actually rendered.
    ///
    /// `OnBack` mirrors the range, so the iteration order is reversed while the set of
    /// rendered depths stays the same.
    #[inline]
    pub fn effective_depth(self, depth: i32, min: i32, max: i32) -> i32 {
        match self {
            Self::OnFront => depth,
            // exact whenever depth lies in [min, max]
            Self::OnBack => max.wrapping_add(min).wrapping_sub(depth),
        }
    }
}

/// Droste effect parameters, resolved once per render.
///
/// Points are in canonical space. Every field is optional in JSON and falls back to
/// [`EffectParameters::default`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EffectParameters {
    /// Draw order of the recursive copies.
    pub layering: Layering,
    /// Number of spiral arms; 0 gives concentric copies, the sign picks the direction.
    pub spin: i32,
    /// Outer radius of one copy.
    pub radius: f64,
    /// Inner / outer radius, strictly between 0 and 1.
    pub ratio: f64,
    /// Where the vanishing point sits in the source.
    pub center: Point,
    /// Where the vanishing point is placed in the output.
    pub position: Point,
    /// 1.0 zooms into the next copy.
    pub zoom: f64,
    /// Fraction of a full turn.
    pub rotation: f64,
    /// Combined zoom and rotation that loops every 1.0.
    pub evolution: f64,
    /// First rendered depth (inclusive).
    pub min_depth: i32,
    /// Last rendered depth (inclusive).
    pub max_depth: i32,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            layering: Layering::OnFront,
            spin: 1,
            radius: 500.0,
            ratio: 0.5,
            center: Point::ZERO,
            position: Point::ZERO,
            zoom: 0.0,
            rotation: 0.0,
            evolution: 0.0,
            min_depth: -2,
            max_depth: 2,
        }
    }
}

impl EffectParameters {
    /// Check the invariants the spiral mapping relies on.
    pub fn validate(&self) -> DrosteResult<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(DrosteError::validation(format!(
                "radius must be finite and > 0, got {}",
                self.radius
            )));
        }
        if !(self.ratio.is_finite() && self.ratio > 0.0 && self.ratio < 1.0) {
            return Err(DrosteError::validation(format!(
                "ratio must be in (0, 1), got {}",
                self.ratio
            )));
        }
        if self.min_depth > self.max_depth {
            return Err(DrosteError::validation(format!(
                "min depth {} is greater than max depth {}",
                self.min_depth, self.max_depth
            )));
        }
        let finite = [
            ("center.x", self.center.x),
            ("center.y", self.center.y),
            ("position.x", self.position.x),
            ("position.y", self.position.y),
            ("zoom", self.zoom),
            ("rotation", self.rotation),
            ("evolution", self.evolution),
        ];
        if let Some((name, v)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DrosteError::validation(format!(
                "{name} must be finite, got {v}"
            )));
        }
        Ok(())
    }

    /// Depths visited by the compositor, in iteration order.
    pub fn depths(&self) -> RangeInclusive<i32> {
        self.min_depth..=self.max_depth
    }

    /// Parse parameters from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> DrosteResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DrosteError::serde(format!("parse droste parameters JSON: {e}")))
    }

    /// Parse parameters from a JSON string.
    pub fn from_json_str(s: &str) -> DrosteResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| DrosteError::serde(format!("parse droste parameters JSON: {e}")))
    }

    /// Parse parameters from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DrosteResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open parameters JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON rendering, the same shape [`EffectParameters::from_json_str`] reads.
    pub fn to_json_pretty(&self) -> DrosteResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DrosteError::serde(format!("serialize droste parameters: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/params.rs"]
mod tests;
