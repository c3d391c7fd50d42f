//! Resolved third-party accounts.
//!
//! The engine does not authenticate anyone: an external identity provider
//! resolves a caller token to this shape. Capability flags gate operations
//! at the registry facade; the admin-partition ownership rule uses only the
//! resolved identity string.

use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;

/// A named contact for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

/// Coarse capability flags granted to an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    /// May create and modify registry records.
    #[serde(default)]
    pub registry: bool,
    /// May contribute statistics.
    #[serde(default)]
    pub statistics: bool,
    /// May write admin partitions.
    #[serde(default)]
    pub admin: bool,
}

/// A resolved third-party account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque account identifier.
    pub id: String,

    /// Human-readable third-party name. This is also the account's admin
    /// partition key on records.
    pub name: String,

    /// Contact points for the third party.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact: Vec<Contact>,

    /// Capability flags.
    #[serde(default)]
    pub access: Access,

    /// API authentication token. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,
}

impl Account {
    /// Create an account with the given identity and no capabilities.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact: Vec::new(),
            access: Access::default(),
            auth_token: None,
        }
    }

    /// Grant registry write access.
    pub fn with_registry_access(mut self) -> Self {
        self.access.registry = true;
        self
    }

    /// Grant statistics write access.
    pub fn with_statistics_access(mut self) -> Self {
        self.access.statistics = true;
        self
    }

    /// Grant admin write access.
    pub fn with_admin_access(mut self) -> Self {
        self.access.admin = true;
        self
    }

    /// The identity string used as this account's admin partition key.
    pub fn identity(&self) -> &str {
        &self.name
    }

    /// Whether a presented token matches the account's stored token. A
    /// missing stored token never matches.
    pub fn check_auth_token(&self, token: &str) -> bool {
        self.auth_token.as_deref() == Some(token)
    }

    /// Add a contact point.
    pub fn add_contact(&mut self, name: impl Into<String>, email: impl Into<String>) {
        self.contact.push(Contact {
            name: name.into(),
            email: email.into(),
        });
    }

    /// Whether this account is a configured super user.
    pub fn is_super(&self, config: &RegistryConfig) -> bool {
        config.super_users.iter().any(|id| id == &self.id)
    }
}
