// SPDX-License-Identifier: MPL-2.0

//! Integration tests for capture resolution selection

use camera_preview::{
    select_closest, select_resolution, Resolution, ResolutionCriterion, SelectionError,
    ShapeCriterion,
};

fn resolutions(list: &[(u32, u32)]) -> Vec<Resolution> {
    list.iter().map(|&(w, h)| Resolution::new(w, h)).collect()
}

#[test]
fn test_squarest_then_highest_picks_the_larger_four_by_three() {
    let candidates = resolutions(&[(1920, 1080), (1280, 960), (640, 480)]);
    let chosen = select_resolution(
        &candidates,
        ShapeCriterion::Squarest,
        ResolutionCriterion::Highest,
    )
    .unwrap();
    assert_eq!(chosen, Resolution::new(1280, 960));
}

#[test]
fn test_ratio_and_width_targets_compose() {
    let candidates = resolutions(&[(800, 600), (1000, 1000), (640, 640)]);
    let chosen = select_resolution(
        &candidates,
        ShapeCriterion::RatioClosestTo(1.0),
        ResolutionCriterion::WidthClosestTo(800.0),
    )
    .unwrap();
    assert_eq!(chosen, Resolution::new(640, 640));
}

#[test]
fn test_selection_is_deterministic() {
    let candidates = resolutions(&[(1920, 1080), (1280, 720), (720, 480), (640, 480)]);
    let first = select_closest(&candidates, 1080, 720).unwrap();
    for _ in 0..16 {
        assert_eq!(select_closest(&candidates, 1080, 720).unwrap(), first);
    }
}

#[test]
fn test_surface_fit_prefers_matching_aspect() {
    // A 16:9 surface keeps the 16:9 candidates even when a 4:3 one is
    // closer in width.
    let candidates = resolutions(&[(1024, 768), (1280, 720), (1920, 1080)]);
    let chosen = select_closest(&candidates, 1000, 562).unwrap();
    assert_eq!(chosen, Resolution::new(1280, 720));
}

#[test]
fn test_empty_candidate_list() {
    assert_eq!(
        select_resolution(&[], ShapeCriterion::Widest, ResolutionCriterion::Highest),
        Err(SelectionError::NoCandidates)
    );
}

#[test]
fn test_zero_sized_candidate_is_rejected() {
    let candidates = resolutions(&[(1920, 1080), (0, 480)]);
    assert_eq!(
        select_resolution(
            &candidates,
            ShapeCriterion::Widest,
            ResolutionCriterion::Highest
        ),
        Err(SelectionError::InvalidCandidate { width: 0, height: 480 })
    );
}

#[test]
fn test_zero_sized_surface_is_rejected() {
    let candidates = resolutions(&[(1920, 1080)]);
    assert_eq!(
        select_closest(&candidates, 0, 720),
        Err(SelectionError::InvalidSurfaceDimensions { width: 0, height: 720 })
    );
}

#[test]
fn test_resolution_serde_round_trip() {
    let resolution = Resolution::new(1920, 1080);
    let json = serde_json::to_string(&resolution).unwrap();
    assert!(json.contains("\"width\":1920"));
    let restored: Resolution = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, resolution);
}
