//! Organization and app-registration reference data
//!
//! Read-only in this service; lifecycle is owned by an external control
//! plane. The in-memory [`StaticOrgDirectory`] stands behind the
//! [`OrgDirectory`] trait so a real control-plane client can replace it
//! without touching callers.

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};

/// A role granted within an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgRole {
    pub role: String,
    pub role_id: String,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// A node in an organization's custom group tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomGroup {
    pub group_id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<CustomGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub org_id: String,
    pub name: String,
    pub subdomain: String,
    pub status: String,
    /// Ordered; position is meaningful to clients
    #[serde(default)]
    pub roles: Vec<OrgRole>,
    #[serde(default)]
    pub custom_groups: Vec<CustomGroup>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRegistration {
    pub app_id: String,
    pub name: String,
    pub frontend_url: String,
    pub backend_url: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Lookup of organization and app metadata
pub trait OrgDirectory: Send + Sync {
    fn org_by_tenant(&self, tenant_id: &str) -> Option<Organization>;
    fn org_by_subdomain(&self, subdomain: &str) -> Option<Organization>;
    fn app_by_id(&self, app_id: &str) -> Option<AppRegistration>;
    fn app_by_name(&self, name: &str) -> Option<AppRegistration>;
}

/// Seed format for the static directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySeed {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub apps: Vec<AppRegistration>,
}

/// In-memory directory seeded at startup
#[derive(Debug, Clone, Default)]
pub struct StaticOrgDirectory {
    organizations: Vec<Organization>,
    apps: Vec<AppRegistration>,
}

impl StaticOrgDirectory {
    pub fn new(seed: DirectorySeed) -> Self {
        Self {
            organizations: seed.organizations,
            apps: seed.apps,
        }
    }

    /// Load a JSON seed file
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| AppError::Configuration {
            message: format!("directory seed {path}: {e}"),
        })?;
        let seed: DirectorySeed =
            serde_json::from_str(&raw).map_err(|e| AppError::Configuration {
                message: format!("directory seed {path}: {e}"),
            })?;
        Ok(Self::new(seed))
    }
}

impl OrgDirectory for StaticOrgDirectory {
    fn org_by_tenant(&self, tenant_id: &str) -> Option<Organization> {
        self.organizations
            .iter()
            .find(|o| o.tenant_id.as_deref() == Some(tenant_id))
            .cloned()
    }

    fn org_by_subdomain(&self, subdomain: &str) -> Option<Organization> {
        self.organizations
            .iter()
            .find(|o| o.subdomain == subdomain)
            .cloned()
    }

    fn app_by_id(&self, app_id: &str) -> Option<AppRegistration> {
        self.apps.iter().find(|a| a.app_id == app_id).cloned()
    }

    fn app_by_name(&self, name: &str) -> Option<AppRegistration> {
        self.apps.iter().find(|a| a.name == name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> StaticOrgDirectory {
        StaticOrgDirectory::new(DirectorySeed {
            organizations: vec![Organization {
                org_id: "o1".into(),
                name: "Acme".into(),
                subdomain: "acme".into(),
                status: "active".into(),
                roles: vec![OrgRole {
                    role: "admin".into(),
                    role_id: "r1".into(),
                    group_id: None,
                }],
                custom_groups: vec![CustomGroup {
                    group_id: "g1".into(),
                    name: "eng".into(),
                    children: vec![CustomGroup {
                        group_id: "g2".into(),
                        name: "backend".into(),
                        children: vec![],
                    }],
                }],
                tenant_id: Some("acme-t1".into()),
            }],
            apps: vec![AppRegistration {
                app_id: "a1".into(),
                name: "boards".into(),
                frontend_url: "https://boards.example.com".into(),
                backend_url: "https://api.boards.example.com".into(),
                metadata: serde_json::json!({ "tier": "beta" }),
            }],
        })
    }

    #[test]
    fn test_lookups() {
        let dir = seeded();
        assert_eq!(dir.org_by_tenant("acme-t1").unwrap().org_id, "o1");
        assert_eq!(dir.org_by_subdomain("acme").unwrap().name, "Acme");
        assert_eq!(dir.app_by_id("a1").unwrap().name, "boards");
        assert_eq!(dir.app_by_name("boards").unwrap().app_id, "a1");
        assert!(dir.org_by_tenant("other").is_none());
        assert!(dir.app_by_name("missing").is_none());
    }

    #[test]
    fn test_seed_deserializes_camel_case() {
        let seed: DirectorySeed = serde_json::from_str(
            r#"{
                "organizations": [{
                    "orgId": "o2", "name": "Globex", "subdomain": "globex",
                    "status": "active", "tenantId": "globex-t1"
                }],
                "apps": [{
                    "appId": "a2", "name": "wiki",
                    "frontendUrl": "https://w", "backendUrl": "https://api.w"
                }]
            }"#,
        )
        .unwrap();
        let dir = StaticOrgDirectory::new(seed);
        assert!(dir.org_by_tenant("globex-t1").is_some());
        assert_eq!(dir.app_by_name("wiki").unwrap().metadata, serde_json::Value::Null);
    }
}
