//! The capability engine: a pure fold over entitlement sources.
//!
//! Grants and vetoes accumulate separately across all sources and combine
//! with set difference at the end. A product's `excludes` therefore acts
//! globally: one coach kit strips academy access the member would otherwise
//! get from any other source. That cross-source veto is the business rule
//! behind "coach kits are academy-free".

use crate::capability::{AcademyTier, Capability};
use crate::catalog::Catalog;
use crate::limits::TeamLimitInfo;
use crate::source::EntitlementSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// CapabilityResult
// ---------------------------------------------------------------------------

/// Derived, never stored: recomputed from sources on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityResult {
    pub capabilities: BTreeSet<Capability>,
    pub products: BTreeSet<String>,
    pub academy_tier: AcademyTier,
    pub sources: Vec<EntitlementSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_limits: Option<TeamLimitInfo>,
    /// Product ids that resolved to nothing in the catalog. They contribute
    /// no capabilities but are surfaced rather than dropped silently.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CapabilityResult {
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

// ---------------------------------------------------------------------------
// compute
// ---------------------------------------------------------------------------

/// Union every source's effective grants, union every source's excludes,
/// subtract, then read the academy tier off what survived.
pub fn compute(catalog: &Catalog, sources: Vec<EntitlementSource>) -> CapabilityResult {
    let mut grants: BTreeSet<Capability> = BTreeSet::new();
    let mut vetoes: BTreeSet<Capability> = BTreeSet::new();
    let mut products: BTreeSet<String> = BTreeSet::new();
    let mut warnings: Vec<String> = Vec::new();

    for src in &sources {
        let Some(product) = catalog.get(&src.product) else {
            if !warnings.contains(&src.product) {
                tracing::warn!(product = %src.product, kind = %src.kind, "unknown product in entitlement source");
                warnings.push(src.product.clone());
            }
            continue;
        };
        products.insert(product.id.clone());
        grants.extend(product.effective_capabilities());
        vetoes.extend(product.excludes().iter().copied());
    }

    let capabilities: BTreeSet<Capability> = grants.difference(&vetoes).copied().collect();
    let academy_tier = academy_tier_of(&capabilities);

    CapabilityResult {
        capabilities,
        products,
        academy_tier,
        sources,
        team_limits: None,
        warnings,
    }
}

/// Highest academy marker surviving the veto step, in priority order.
fn academy_tier_of(capabilities: &BTreeSet<Capability>) -> AcademyTier {
    if capabilities.contains(&Capability::FullAcademy) {
        AcademyTier::Full
    } else if capabilities.contains(&Capability::BasicAcademy) {
        AcademyTier::Basic
    } else if capabilities.contains(&Capability::LimitedDrills) {
        AcademyTier::Limited
    } else {
        AcademyTier::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EntitlementSource as Src;

    fn catalog() -> Catalog {
        Catalog::builtin()
    }

    #[test]
    fn empty_sources_yield_nothing() {
        let result = compute(&catalog(), vec![]);
        assert!(result.capabilities.is_empty());
        assert!(result.products.is_empty());
        assert_eq!(result.academy_tier, AcademyTier::None);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn single_full_academy_source() {
        let result = compute(&catalog(), vec![Src::direct("skills_academy_monthly")]);
        assert_eq!(result.academy_tier, AcademyTier::Full);
        assert!(result.has(Capability::FullAcademy));
        assert!(result.has(Capability::Drills));
        assert!(result.has(Capability::Workouts));
        // Academy implication
        assert!(result.has(Capability::BasicAcademy));
    }

    #[test]
    fn single_basic_academy_source() {
        let result = compute(&catalog(), vec![Src::direct("skills_academy_basic")]);
        assert_eq!(result.academy_tier, AcademyTier::Basic);
        assert!(!result.has(Capability::FullAcademy));
    }

    #[test]
    fn coach_kit_alone() {
        let result = compute(&catalog(), vec![Src::direct("coach_essentials_kit")]);
        assert_eq!(result.academy_tier, AcademyTier::None);
        assert!(result.has(Capability::PracticePlanner));
        assert!(result.has(Capability::Resources));
    }

    // The key regression: a coach kit's excludes strip academy access even
    // when another source grants it.
    #[test]
    fn exclusion_wins_across_sources() {
        let result = compute(
            &catalog(),
            vec![
                Src::direct("skills_academy_monthly"),
                Src::direct("coach_essentials_kit"),
            ],
        );
        assert_eq!(result.academy_tier, AcademyTier::None);
        assert!(!result.has(Capability::FullAcademy));
        assert!(!result.has(Capability::BasicAcademy));
        // Non-vetoed grants from both sources survive
        assert!(result.has(Capability::Drills));
        assert!(result.has(Capability::Workouts));
        assert!(result.has(Capability::PracticePlanner));
        assert_eq!(result.products.len(), 2);
    }

    #[test]
    fn source_order_does_not_matter() {
        let forward = compute(
            &catalog(),
            vec![
                Src::direct("skills_academy_monthly"),
                Src::direct("coach_confidence_kit"),
                Src::team("team_hq_structure", "varsity", "Varsity"),
            ],
        );
        let backward = compute(
            &catalog(),
            vec![
                Src::team("team_hq_structure", "varsity", "Varsity"),
                Src::direct("coach_confidence_kit"),
                Src::direct("skills_academy_monthly"),
            ],
        );
        assert_eq!(forward.capabilities, backward.capabilities);
        assert_eq!(forward.products, backward.products);
        assert_eq!(forward.academy_tier, backward.academy_tier);
    }

    #[test]
    fn identical_input_identical_output() {
        let sources = vec![
            Src::direct("skills_academy_basic"),
            Src::club("club_os_growth", "riverside", "Riverside"),
        ];
        let a = compute(&catalog(), sources.clone());
        let b = compute(&catalog(), sources);
        assert_eq!(a, b);
    }

    #[test]
    fn union_across_sources() {
        let result = compute(
            &catalog(),
            vec![
                Src::direct("skills_academy_basic"),
                Src::team("team_hq_structure", "varsity", "Varsity"),
            ],
        );
        // From the academy product
        assert!(result.has(Capability::BasicAcademy));
        assert!(result.has(Capability::LimitedDrills));
        // From the team product
        assert!(result.has(Capability::TeamManagement));
        assert!(result.has(Capability::Roster));
        assert_eq!(result.academy_tier, AcademyTier::Basic);
    }

    #[test]
    fn unknown_products_are_reported_not_fatal() {
        let result = compute(
            &catalog(),
            vec![
                Src::direct("discontinued_bundle"),
                Src::direct("skills_academy_basic"),
                Src::direct("discontinued_bundle"),
            ],
        );
        assert_eq!(result.warnings, vec!["discontinued_bundle"]);
        assert_eq!(result.academy_tier, AcademyTier::Basic);
        assert!(!result.products.contains("discontinued_bundle"));
    }

    #[test]
    fn duplicate_products_counted_once() {
        let result = compute(
            &catalog(),
            vec![
                Src::direct("skills_academy_monthly"),
                Src::parent("skills_academy_monthly", "pat", "Pat"),
            ],
        );
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.sources.len(), 2);
    }
}
