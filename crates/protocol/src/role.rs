//! User roles, as supplied by the role resolver.

use serde::{Deserialize, Serialize};

/// The role of the user viewing the dashboard.
///
/// Role identifiers come from the authentication layer. Unrecognized
/// identifiers map to [`Role::Other`], which gets the generic layout.
///
/// # Examples
///
/// ```
/// use divedash_protocol::Role;
///
/// assert_eq!(Role::from_identifier("buzo"), Role::Diver);
/// assert_eq!(Role::from_identifier("auditor"), Role::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A diver (`buzo`).
    #[serde(rename = "buzo")]
    Diver,
    /// A dive supervisor.
    Supervisor,
    /// An administrator of a salmon farming company.
    AdminSalmonera,
    /// An administrator of a diving service company.
    AdminServicio,
    /// A platform superuser.
    Superuser,
    /// Any other or missing role.
    #[default]
    Other,
}

impl Role {
    /// Maps a role identifier to a role. Never fails.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier.trim() {
            "buzo" => Self::Diver,
            "supervisor" => Self::Supervisor,
            "admin_salmonera" => Self::AdminSalmonera,
            "admin_servicio" => Self::AdminServicio,
            "superuser" => Self::Superuser,
            _ => Self::Other,
        }
    }

    /// Returns the identifier used by the role resolver.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Diver => "buzo",
            Self::Supervisor => "supervisor",
            Self::AdminSalmonera => "admin_salmonera",
            Self::AdminServicio => "admin_servicio",
            Self::Superuser => "superuser",
            Self::Other => "other",
        }
    }

    /// Returns a human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Diver => "Diver",
            Self::Supervisor => "Supervisor",
            Self::AdminSalmonera => "Farm admin",
            Self::AdminServicio => "Service admin",
            Self::Superuser => "Superuser",
            Self::Other => "User",
        }
    }

    /// Returns `true` for the administrative roles.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(
            self,
            Self::AdminSalmonera | Self::AdminServicio | Self::Superuser
        )
    }
}
