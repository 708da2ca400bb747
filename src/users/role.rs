//! Roles and the scouting views each one may open.
//!
//! Roles are persisted as their display label (`"Semi Admin"`, ...), so the
//! label is also the wire format used in JSON responses.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "Admin")]
    Admin,
    #[serde(rename = "Semi Admin")]
    SemiAdmin,
    #[serde(rename = "Normal Scouter")]
    NormalScouter,
    #[serde(rename = "Super Scouter")]
    SuperScouter,
    #[serde(rename = "Pit Scouter")]
    PitScouter,
}

/// Views of the scouting tool gated by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewTeamData,
    ViewAllData,
    MatchMessages,
    PitScouting,
    SuperScoutingAnswers,
    SuperScoutingAdmin,
    StrategyCalculator,
    CanvasDrawing,
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewTeamData,
    Capability::ViewAllData,
    Capability::MatchMessages,
    Capability::PitScouting,
    Capability::SuperScoutingAnswers,
    Capability::SuperScoutingAdmin,
    Capability::StrategyCalculator,
    Capability::CanvasDrawing,
];

const SEMI_ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewTeamData,
    Capability::ViewAllData,
    Capability::MatchMessages,
    Capability::PitScouting,
    Capability::SuperScoutingAnswers,
    Capability::StrategyCalculator,
    Capability::CanvasDrawing,
];

const NORMAL_SCOUTER_CAPABILITIES: &[Capability] =
    &[Capability::ViewTeamData, Capability::MatchMessages];

const SUPER_SCOUTER_CAPABILITIES: &[Capability] =
    &[Capability::ViewTeamData, Capability::SuperScoutingAnswers];

const PIT_SCOUTER_CAPABILITIES: &[Capability] =
    &[Capability::ViewTeamData, Capability::PitScouting];

impl Role {
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::SemiAdmin,
        Self::NormalScouter,
        Self::SuperScouter,
        Self::PitScouter,
    ];

    /// Label stored in the `users.role` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::SemiAdmin => "Semi Admin",
            Self::NormalScouter => "Normal Scouter",
            Self::SuperScouter => "Super Scouter",
            Self::PitScouter => "Pit Scouter",
        }
    }

    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Admin => ADMIN_CAPABILITIES,
            Self::SemiAdmin => SEMI_ADMIN_CAPABILITIES,
            Self::NormalScouter => NORMAL_SCOUTER_CAPABILITIES,
            Self::SuperScouter => SUPER_SCOUTER_CAPABILITIES,
            Self::PitScouter => PIT_SCOUTER_CAPABILITIES,
        }
    }

    #[must_use]
    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| anyhow!("unknown role: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_parse_back() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().ok(), Some(role));
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("Coach".parse::<Role>().is_err());
        // Labels are matched exactly.
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn admin_holds_every_capability() {
        assert_eq!(Role::Admin.capabilities().len(), 8);
        assert!(Role::Admin.can(Capability::SuperScoutingAdmin));
    }

    #[test]
    fn semi_admin_cannot_administer_super_scouting() {
        assert!(!Role::SemiAdmin.can(Capability::SuperScoutingAdmin));
        assert!(Role::SemiAdmin.can(Capability::StrategyCalculator));
    }

    #[test]
    fn scouters_are_limited_to_their_views() {
        assert!(Role::NormalScouter.can(Capability::MatchMessages));
        assert!(!Role::NormalScouter.can(Capability::PitScouting));
        assert!(Role::SuperScouter.can(Capability::SuperScoutingAnswers));
        assert!(!Role::SuperScouter.can(Capability::ViewAllData));
        assert!(Role::PitScouter.can(Capability::PitScouting));
        assert!(!Role::PitScouter.can(Capability::MatchMessages));
        for role in Role::ALL {
            assert!(role.can(Capability::ViewTeamData), "{role} lost team data");
        }
    }

    #[test]
    fn role_serializes_as_label() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::to_string(&Role::PitScouter)?,
            "\"Pit Scouter\""
        );
        assert_eq!(
            serde_json::to_string(&Capability::SuperScoutingAnswers)?,
            "\"super_scouting_answers\""
        );
        Ok(())
    }
}
