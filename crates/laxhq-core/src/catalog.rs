use crate::capability::Capability;
use crate::error::{LaxError, Result};
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// ---------------------------------------------------------------------------
// ProductKind
// ---------------------------------------------------------------------------

/// Category-specific product fields. Individual products may veto
/// capabilities and be shared parent-to-child; team products bundle a coach
/// kit and an academy product for the first `player_limit` players; club
/// products cascade a team tier to every team in the club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductKind {
    Individual {
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        excludes: BTreeSet<Capability>,
        #[serde(default)]
        shareable: bool,
    },
    Team {
        coach_product: String,
        player_product: String,
        player_limit: u32,
    },
    Club {
        team_tier: String,
    },
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: ProductKind,
    pub capabilities: BTreeSet<Capability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Capabilities this product veto-lists for the holder. Empty for team
    /// and club products.
    pub fn excludes(&self) -> &BTreeSet<Capability> {
        static EMPTY: BTreeSet<Capability> = BTreeSet::new();
        match &self.kind {
            ProductKind::Individual { excludes, .. } => excludes,
            _ => &EMPTY,
        }
    }

    pub fn is_shareable(&self) -> bool {
        matches!(self.kind, ProductKind::Individual { shareable: true, .. })
    }

    /// Effective capability set: declared capabilities plus the academy
    /// implication (full_academy covers basic_academy), minus the product's
    /// own excludes.
    pub fn effective_capabilities(&self) -> BTreeSet<Capability> {
        let mut caps = self.capabilities.clone();
        if caps.contains(&Capability::FullAcademy) {
            caps.insert(Capability::BasicAcademy);
        }
        for ex in self.excludes() {
            caps.remove(ex);
        }
        caps
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The product catalog. Loaded once at startup; either the built-in set or
/// an override from `.laxhq/catalog.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.products.contains_key(id)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Coach kit bundled with a team product, if `id` is a team product.
    pub fn coach_product_of(&self, id: &str) -> Option<&str> {
        match &self.get(id)?.kind {
            ProductKind::Team { coach_product, .. } => Some(coach_product),
            _ => None,
        }
    }

    /// Academy product the first N players of a team inherit, if `id` is a
    /// team product.
    pub fn player_product_of(&self, id: &str) -> Option<&str> {
        match &self.get(id)?.kind {
            ProductKind::Team { player_product, .. } => Some(player_product),
            _ => None,
        }
    }

    /// Team tier cascaded by a club product, if `id` is a club product.
    pub fn team_tier_of(&self, id: &str) -> Option<&str> {
        match &self.get(id)?.kind {
            ProductKind::Club { team_tier } => Some(team_tier),
            _ => None,
        }
    }

    /// Check that every cross-reference resolves: team products must name
    /// existing individual products, club tiers must name existing team
    /// products.
    pub fn validate(&self) -> Result<()> {
        for product in self.products.values() {
            match &product.kind {
                ProductKind::Team {
                    coach_product,
                    player_product,
                    player_limit,
                } => {
                    for (label, target) in
                        [("coach_product", coach_product), ("player_product", player_product)]
                    {
                        match self.get(target) {
                            Some(p) if matches!(p.kind, ProductKind::Individual { .. }) => {}
                            Some(_) => {
                                return Err(LaxError::InvalidCatalog(format!(
                                    "{}: {label} '{target}' is not an individual product",
                                    product.id
                                )))
                            }
                            None => {
                                return Err(LaxError::InvalidCatalog(format!(
                                    "{}: {label} '{target}' does not exist",
                                    product.id
                                )))
                            }
                        }
                    }
                    if *player_limit == 0 {
                        return Err(LaxError::InvalidCatalog(format!(
                            "{}: player_limit must be positive",
                            product.id
                        )));
                    }
                }
                ProductKind::Club { team_tier } => match self.get(team_tier) {
                    Some(p) if matches!(p.kind, ProductKind::Team { .. }) => {}
                    Some(_) => {
                        return Err(LaxError::InvalidCatalog(format!(
                            "{}: team_tier '{team_tier}' is not a team product",
                            product.id
                        )))
                    }
                    None => {
                        return Err(LaxError::InvalidCatalog(format!(
                            "{}: team_tier '{team_tier}' does not exist",
                            product.id
                        )))
                    }
                },
                ProductKind::Individual { .. } => {}
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Load the catalog for a project root: `.laxhq/catalog.yaml` when
    /// present, the built-in catalog otherwise. The loaded catalog is
    /// validated either way.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::catalog_file(root);
        let catalog = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&data)?
        } else {
            Self::builtin()
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::catalog_file(root), data.as_bytes())
    }

    // ---------------------------------------------------------------------------
    // Built-in products
    // ---------------------------------------------------------------------------

    pub fn builtin() -> Self {
        use Capability::*;

        fn individual(
            id: &str,
            name: &str,
            caps: &[Capability],
            excludes: &[Capability],
            shareable: bool,
            description: &str,
        ) -> Product {
            Product {
                id: id.to_string(),
                name: name.to_string(),
                kind: ProductKind::Individual {
                    excludes: excludes.iter().copied().collect(),
                    shareable,
                },
                capabilities: caps.iter().copied().collect(),
                description: Some(description.to_string()),
            }
        }

        fn team(
            id: &str,
            name: &str,
            caps: &[Capability],
            coach: &str,
            player: &str,
            description: &str,
        ) -> Product {
            Product {
                id: id.to_string(),
                name: name.to_string(),
                kind: ProductKind::Team {
                    coach_product: coach.to_string(),
                    player_product: player.to_string(),
                    player_limit: crate::limits::TEAM_PLAYER_LIMIT,
                },
                capabilities: caps.iter().copied().collect(),
                description: Some(description.to_string()),
            }
        }

        fn club(id: &str, name: &str, caps: &[Capability], tier: &str, description: &str) -> Product {
            Product {
                id: id.to_string(),
                name: name.to_string(),
                kind: ProductKind::Club {
                    team_tier: tier.to_string(),
                },
                capabilities: caps.iter().copied().collect(),
                description: Some(description.to_string()),
            }
        }

        Self::new(vec![
            // Individual
            individual(
                "create_account",
                "Free Account",
                &[PlatformAccess],
                &[],
                false,
                "Basic platform access with limited features",
            ),
            individual(
                "skills_academy_monthly",
                "Skills Academy Monthly",
                &[FullAcademy, Drills, Workouts],
                &[],
                true,
                "Full Skills Academy access with all drills and workouts",
            ),
            individual(
                "skills_academy_annual",
                "Skills Academy Annual",
                &[FullAcademy, Drills, Workouts],
                &[],
                true,
                "Full Skills Academy access with all drills and workouts (annual)",
            ),
            individual(
                "skills_academy_basic",
                "Skills Academy Basic",
                &[BasicAcademy, LimitedDrills],
                &[],
                true,
                "Basic Skills Academy access with limited content",
            ),
            // Coach kits carry no academy access and veto it outright
            individual(
                "coach_essentials_kit",
                "Coach Essentials Kit",
                &[PracticePlanner, Resources],
                &[FullAcademy, BasicAcademy],
                false,
                "Practice planning tools and coaching resources",
            ),
            individual(
                "coach_confidence_kit",
                "Coach Confidence Kit",
                &[PracticePlanner, CustomContent, Training],
                &[FullAcademy, BasicAcademy],
                false,
                "Advanced coaching tools with custom content and training",
            ),
            // Team
            team(
                "team_hq_structure",
                "Team HQ Structure",
                &[TeamManagement, Roster],
                "coach_essentials_kit",
                "skills_academy_basic",
                "Coach Essentials + 25 Basic Academy memberships",
            ),
            team(
                "team_hq_leadership",
                "Team HQ Leadership",
                &[TeamManagement, Playbook, Roster],
                "coach_confidence_kit",
                "skills_academy_basic",
                "Coach Confidence + Playbook + 25 Basic Academy memberships",
            ),
            team(
                "team_hq_activated",
                "Team HQ Activated",
                &[TeamManagement, Playbook, Roster, Analytics],
                "coach_confidence_kit",
                "skills_academy_monthly",
                "Coach Confidence + Playbook + Analytics + 25 Full Academy memberships",
            ),
            // Club
            club(
                "club_os_foundation",
                "Club OS Foundation",
                &[TeamManagement],
                "team_hq_structure",
                "All teams get Structure tier benefits",
            ),
            club(
                "club_os_growth",
                "Club OS Growth",
                &[TeamManagement, Playbook],
                "team_hq_leadership",
                "All teams get Leadership tier benefits",
            ),
            club(
                "club_os_command",
                "Club OS Command",
                &[TeamManagement, Playbook, Analytics],
                "team_hq_activated",
                "All teams get Activated tier benefits",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 12);
        catalog.validate().unwrap();
    }

    #[test]
    fn full_academy_implies_basic() {
        let catalog = Catalog::builtin();
        let monthly = catalog.get("skills_academy_monthly").unwrap();
        let caps = monthly.effective_capabilities();
        assert!(caps.contains(&Capability::FullAcademy));
        assert!(caps.contains(&Capability::BasicAcademy));
    }

    #[test]
    fn coach_kit_effective_set_has_no_academy() {
        let catalog = Catalog::builtin();
        let kit = catalog.get("coach_essentials_kit").unwrap();
        let caps = kit.effective_capabilities();
        assert!(caps.contains(&Capability::PracticePlanner));
        assert!(!caps.contains(&Capability::FullAcademy));
        assert!(!caps.contains(&Capability::BasicAcademy));
        assert_eq!(
            kit.excludes().iter().copied().collect::<Vec<_>>(),
            vec![Capability::FullAcademy, Capability::BasicAcademy]
        );
    }

    #[test]
    fn team_and_club_lookups() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.coach_product_of("team_hq_structure"),
            Some("coach_essentials_kit")
        );
        assert_eq!(
            catalog.player_product_of("team_hq_activated"),
            Some("skills_academy_monthly")
        );
        assert_eq!(
            catalog.team_tier_of("club_os_growth"),
            Some("team_hq_leadership")
        );
        // Wrong category returns None
        assert_eq!(catalog.coach_product_of("club_os_growth"), None);
        assert_eq!(catalog.team_tier_of("team_hq_structure"), None);
    }

    #[test]
    fn shareable_products() {
        let catalog = Catalog::builtin();
        assert!(catalog.get("skills_academy_monthly").unwrap().is_shareable());
        assert!(catalog.get("skills_academy_basic").unwrap().is_shareable());
        assert!(!catalog.get("coach_essentials_kit").unwrap().is_shareable());
        assert!(!catalog.get("create_account").unwrap().is_shareable());
    }

    #[test]
    fn validate_rejects_dangling_team_reference() {
        let mut products: Vec<Product> = Catalog::builtin().products().cloned().collect();
        for p in &mut products {
            if let ProductKind::Team { coach_product, .. } = &mut p.kind {
                *coach_product = "missing_kit".to_string();
                break;
            }
        }
        let err = Catalog::new(products).validate().unwrap_err();
        assert!(err.to_string().contains("missing_kit"));
    }

    #[test]
    fn validate_rejects_club_tier_pointing_at_individual() {
        let mut products: Vec<Product> = Catalog::builtin().products().cloned().collect();
        for p in &mut products {
            if let ProductKind::Club { team_tier } = &mut p.kind {
                *team_tier = "create_account".to_string();
                break;
            }
        }
        let err = Catalog::new(products).validate().unwrap_err();
        assert!(err.to_string().contains("not a team product"));
    }

    #[test]
    fn load_prefers_catalog_file_override() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::new(vec![Product {
            id: "solo_pass".to_string(),
            name: "Solo Pass".to_string(),
            kind: ProductKind::Individual {
                excludes: BTreeSet::new(),
                shareable: false,
            },
            capabilities: [Capability::PlatformAccess].into_iter().collect(),
            description: None,
        }]);
        catalog.save(dir.path()).unwrap();

        let loaded = Catalog::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains("solo_pass"));
    }

    #[test]
    fn load_falls_back_to_builtin() {
        let dir = TempDir::new().unwrap();
        let loaded = Catalog::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 12);
    }

    #[test]
    fn product_yaml_roundtrip() {
        let catalog = Catalog::builtin();
        let team = catalog.get("team_hq_structure").unwrap();
        let yaml = serde_yaml::to_string(team).unwrap();
        assert!(yaml.contains("type: team"));
        assert!(yaml.contains("coach_product: coach_essentials_kit"));
        let parsed: Product = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(&parsed, team);
    }
}
