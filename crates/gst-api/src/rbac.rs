//! Authorization policy as data
//!
//! A single declarative mapping of role to capability set. Every
//! enforcement point consults this table; permission literals are not
//! repeated anywhere else.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accountant,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    VerifyGst,
    ViewOwnGst,
    ViewAnyGst,
    ViewStats,
}

/// The one place role capabilities are defined.
pub fn capabilities(role: Role) -> &'static [Capability] {
    match role {
        Role::Admin => &[
            Capability::VerifyGst,
            Capability::ViewOwnGst,
            Capability::ViewAnyGst,
            Capability::ViewStats,
        ],
        Role::Accountant => &[Capability::VerifyGst, Capability::ViewOwnGst],
        Role::Viewer => &[Capability::ViewOwnGst],
    }
}

impl Role {
    pub fn allows(self, capability: Capability) -> bool {
        capabilities(self).contains(&capability)
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "accountant" => Some(Role::Accountant),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Accountant => "accountant",
            Role::Viewer => "viewer",
        }
    }
}
