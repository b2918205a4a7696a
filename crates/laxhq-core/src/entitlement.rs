use crate::error::{LaxError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Holder
// ---------------------------------------------------------------------------

/// Who holds an entitlement: a member directly, a team, or a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Holder {
    Member(String),
    Team(String),
    Club(String),
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::Member(id) => write!(f, "member:{id}"),
            Holder::Team(id) => write!(f, "team:{id}"),
            Holder::Club(id) => write!(f, "club:{id}"),
        }
    }
}

impl std::str::FromStr for Holder {
    type Err = LaxError;

    /// Parse `member:jane`, `team:varsity`, or `club:riverside`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some(("member", id)) => Ok(Holder::Member(id.to_string())),
            Some(("team", id)) => Ok(Holder::Team(id.to_string())),
            Some(("club", id)) => Ok(Holder::Club(id.to_string())),
            _ => Err(LaxError::InvalidId(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Inactive,
    Expired,
    Cancelled,
}

// ---------------------------------------------------------------------------
// Entitlement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: String,
    pub holder: Holder,
    pub product: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entitlement {
    /// Active means status `active` and not past the expiry timestamp.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == Status::Active && self.expires_at.map_or(true, |exp| exp > now)
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// The entitlement ledger, persisted as a single YAML document at
/// `.laxhq/entitlements.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub entitlements: Vec<Entitlement>,
}

impl Ledger {
    pub fn load(root: &Path) -> Result<Self> {
        let file = paths::entitlements_file(root);
        if !file.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&file)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::entitlements_file(root), data.as_bytes())
    }

    /// Record a new active entitlement and return it. Product ids are
    /// catalog-checked by callers (the CLI and server do so at the edge).
    pub fn grant(
        &mut self,
        holder: Holder,
        product: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> &Entitlement {
        let ent = Entitlement {
            id: uuid::Uuid::new_v4().to_string(),
            holder,
            product: product.into(),
            status: Status::Active,
            created_at: Utc::now(),
            expires_at,
        };
        tracing::info!(id = %ent.id, holder = %ent.holder, product = %ent.product, "granted entitlement");
        self.entitlements.push(ent);
        self.entitlements.last().unwrap()
    }

    /// Cancel an entitlement by id.
    pub fn revoke(&mut self, id: &str) -> Result<&Entitlement> {
        let ent = self
            .entitlements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| LaxError::EntitlementNotFound(id.to_string()))?;
        ent.status = Status::Cancelled;
        tracing::info!(id = %ent.id, holder = %ent.holder, "revoked entitlement");
        Ok(ent)
    }

    pub fn for_holder<'a>(&'a self, holder: &'a Holder) -> impl Iterator<Item = &'a Entitlement> {
        self.entitlements.iter().filter(move |e| &e.holder == holder)
    }

    /// Active entitlements for a holder, evaluated at `now`.
    pub fn active_for_holder<'a>(
        &'a self,
        holder: &'a Holder,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a Entitlement> {
        self.for_holder(holder).filter(move |e| e.is_active(now))
    }

    /// First active product held, if any. Teams and clubs are expected to
    /// hold at most one product at a time; the oldest active grant wins.
    pub fn active_product<'a>(
        &'a self,
        holder: &'a Holder,
        now: DateTime<Utc>,
    ) -> Option<&'a str> {
        self.active_for_holder(holder, now)
            .min_by_key(|e| e.created_at)
            .map(|e| e.product.as_str())
    }

    pub fn active_count(&self, now: DateTime<Utc>) -> usize {
        self.entitlements.iter().filter(|e| e.is_active(now)).count()
    }
}
