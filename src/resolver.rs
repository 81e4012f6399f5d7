//! Picks the visualization profile for a newly connected controller.

use log::debug;

use crate::gamepad::RawControllerState;
use crate::profile::VisualizationProfile;

/// Exact match across all known families first, then the first structural
/// match in declaration order, then the fallback. Pure; run at connect time.
pub fn resolve(raw: &RawControllerState) -> VisualizationProfile {
    let known = VisualizationProfile::KNOWN;

    if let Some(p) = known.into_iter().find(|p| p.is_supported(raw)) {
        debug!("controller {} ({:?}): exact match {}", raw.index, raw.id, p.name());
        return p;
    }

    let structural: Vec<_> = known.into_iter().filter(|p| p.can_be_supported(raw)).collect();
    if structural.len() > 1 {
        let names: Vec<_> = structural.iter().map(|p| p.name()).collect();
        debug!("controller {}: ambiguous structural match {names:?}, taking the first", raw.index);
    }
    match structural.first() {
        Some(&p) => {
            debug!("controller {} ({:?}): structural match {}", raw.index, raw.id, p.name());
            p
        }
        None => {
            debug!(
                "controller {} ({:?}): {} buttons / {} axes, no family fits",
                raw.index,
                raw.id,
                raw.buttons.len(),
                raw.axes.len()
            );
            VisualizationProfile::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_id_wins_over_declaration_order() {
        // Enough inputs for both families; the id names the second one.
        let raw = RawControllerState::idle(1, "045e-028e-Microsoft X-Box 360 pad", 17, 8);
        assert_eq!(resolve(&raw), VisualizationProfile::XboxFirefox);
    }

    #[test]
    fn structural_match_by_counts() {
        assert_eq!(resolve(&RawControllerState::idle(0, "clone pad", 17, 4)), VisualizationProfile::XboxChromium);
        assert_eq!(resolve(&RawControllerState::idle(0, "clone pad", 11, 8)), VisualizationProfile::XboxFirefox);
    }

    #[test]
    fn overlapping_structures_take_first_declared() {
        assert_eq!(resolve(&RawControllerState::idle(0, "big pad", 20, 10)), VisualizationProfile::XboxChromium);
    }

    #[test]
    fn too_few_inputs_fall_back() {
        assert_eq!(resolve(&RawControllerState::idle(0, "wheel", 10, 3)), VisualizationProfile::Unknown);
        assert_eq!(resolve(&RawControllerState::idle(0, "", 0, 0)), VisualizationProfile::Unknown);
    }

    #[test]
    fn never_unknown_when_a_family_fits() {
        for buttons in 0..24 {
            for axes in 0..12 {
                let raw = RawControllerState::idle(0, "x", buttons, axes);
                let fits = VisualizationProfile::KNOWN.iter().any(|p| p.can_be_supported(&raw));
                assert_eq!(resolve(&raw) != VisualizationProfile::Unknown, fits, "{buttons}/{axes}");
            }
        }
    }
}
