// SPDX-License-Identifier: GPL-3.0-only

//! Capture resolution selection
//!
//! Selects one resolution out of the candidate list a sensor advertises,
//! in two passes: a shape pass narrows the list down to the candidates
//! whose aspect ratio best fits the request, then a resolution pass picks
//! a single winner among them. Both passes minimize a score; the shape
//! pass keeps everything within a small tolerance band of the best score
//! so that equal aspect ratios computed through float division are not
//! split apart by rounding.

use crate::errors::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Tolerance band applied to shape scores in the first pass
pub const SHAPE_EPSILON: f32 = 1e-6;

/// A capture resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width-to-height aspect ratio
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// First-pass criterion: which aspect shape to prefer
///
/// Scores are minimized. All candidates scoring within [`SHAPE_EPSILON`]
/// of the best survive into the second pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeCriterion {
    /// Prefer the largest sensor area (least cropping)
    Uncropped,
    /// Prefer the widest aspect ratio
    Widest,
    /// Prefer the narrowest (tallest) aspect ratio
    Narrowest,
    /// Prefer the aspect ratio closest to 1:1
    Squarest,
    /// Prefer the aspect ratio closest to the given width/height ratio
    RatioClosestTo(f32),
}

impl ShapeCriterion {
    fn score(&self, candidate: Resolution) -> f32 {
        let aspect = candidate.aspect_ratio();
        match self {
            ShapeCriterion::Uncropped => 1.0 / (candidate.width as f32 * candidate.height as f32),
            ShapeCriterion::Widest => 1.0 / aspect,
            ShapeCriterion::Narrowest => aspect,
            ShapeCriterion::Squarest => (1.0 - aspect).abs(),
            ShapeCriterion::RatioClosestTo(target) => (aspect - target).abs(),
        }
    }
}

/// Second-pass criterion: which resolution to pick among same-shape candidates
///
/// Scores are minimized; on a tie the first-encountered candidate wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionCriterion {
    /// Prefer the most pixels
    Highest,
    /// Prefer the fewest pixels
    Lowest,
    /// Prefer the width closest to the given value
    WidthClosestTo(f32),
    /// Prefer the height closest to the given value
    HeightClosestTo(f32),
}

impl ResolutionCriterion {
    fn score(&self, candidate: Resolution) -> f32 {
        let w = candidate.width as f32;
        let h = candidate.height as f32;
        match self {
            ResolutionCriterion::Highest => 1.0 / (w * h),
            ResolutionCriterion::Lowest => w * h,
            ResolutionCriterion::WidthClosestTo(target) => (w - target).abs(),
            ResolutionCriterion::HeightClosestTo(target) => (h - target).abs(),
        }
    }
}

/// Select one resolution from `candidates` by shape, then by resolution
///
/// Candidate order matters only for tie-breaking: when several survivors
/// score equally in the second pass, the first one in the input wins.
/// Candidates with a zero dimension are rejected rather than scored.
pub fn select_resolution(
    candidates: &[Resolution],
    shape: ShapeCriterion,
    resolution: ResolutionCriterion,
) -> Result<Resolution, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates);
    }
    if let Some(bad) = candidates
        .iter()
        .find(|r| r.width == 0 || r.height == 0)
    {
        return Err(SelectionError::InvalidCandidate {
            width: bad.width,
            height: bad.height,
        });
    }

    // Shape pass: minimize, then keep everything within the tolerance band.
    let scores: Vec<f32> = candidates.iter().map(|r| shape.score(*r)).collect();
    let mut best_shape = f32::INFINITY;
    for &score in &scores {
        if score < best_shape {
            best_shape = score;
        }
    }

    let survivors: Vec<Resolution> = candidates
        .iter()
        .zip(&scores)
        .filter(|&(_, &score)| score - best_shape < SHAPE_EPSILON)
        .map(|(r, _)| *r)
        .collect();

    // The best-scoring candidate always survives its own band.
    debug_assert!(!survivors.is_empty(), "shape pass kept no candidates");
    let Some(first) = survivors.first().copied() else {
        return Err(SelectionError::NoCandidates);
    };

    // Resolution pass: strict minimum, first-encountered wins on ties.
    let mut chosen = first;
    let mut best_score = resolution.score(chosen);
    for &candidate in &survivors[1..] {
        let score = resolution.score(candidate);
        if score < best_score {
            best_score = score;
            chosen = candidate;
        }
    }

    debug!(
        candidates = candidates.len(),
        same_shape = survivors.len(),
        selected = %chosen,
        "Selected capture resolution"
    );
    Ok(chosen)
}

/// Select the resolution that best matches an output surface
///
/// Fixes the shape criterion to the surface's aspect ratio and the
/// resolution criterion to its width.
pub fn select_closest(
    candidates: &[Resolution],
    surface_width: u32,
    surface_height: u32,
) -> Result<Resolution, SelectionError> {
    if surface_width == 0 || surface_height == 0 {
        return Err(SelectionError::InvalidSurfaceDimensions {
            width: surface_width,
            height: surface_height,
        });
    }
    let ratio = surface_width as f32 / surface_height as f32;
    select_resolution(
        candidates,
        ShapeCriterion::RatioClosestTo(ratio),
        ResolutionCriterion::WidthClosestTo(surface_width as f32),
    )
}
