//! Folders, organizations and org path resolution
//!
//! Folder lookups go through the v2alpha1 folder API over plain HTTP;
//! organizations use the resource manager v1 client.

use super::policy::{GET_FOLDER, GET_FOLDERS, GET_ORGANIZATION, GET_ORGANIZATIONS, RESOLVE_ORG_PATH};
use super::CloudAdmin;
use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Kind of node in the resource hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Organization,
}

impl FromStr for NodeKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "folder" => Ok(NodeKind::Folder),
            "organization" => Ok(NodeKind::Organization),
            other => Err(AdminError::InvalidParent(format!("unknown parent type '{}'", other))),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Folder => "folder",
            NodeKind::Organization => "organization",
        })
    }
}

/// A `{type, id}` reference to a folder or organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: String,
}

impl ParentRef {
    pub fn folder(id: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Folder,
            id: id.into(),
        }
    }

    pub fn organization(id: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Organization,
            id: id.into(),
        }
    }

    /// Parse a `"<type>s/<id>"` path such as `folders/123`
    ///
    /// Segments after the id are ignored.
    pub fn from_path(path: &str) -> Result<Self> {
        let mut segments = path.split('/');
        let plural = segments.next().unwrap_or_default();
        let id = segments
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AdminError::InvalidParent(format!("no id in '{}'", path)))?;
        let singular = plural
            .strip_suffix('s')
            .ok_or_else(|| AdminError::InvalidParent(format!("bad type segment in '{}'", path)))?;

        Ok(Self {
            kind: singular.parse()?,
            id: id.to_string(),
        })
    }

    /// The `parent` of a v1 project payload, if it has one
    pub fn of_project(project: &Value) -> Result<Option<Self>> {
        match project.get("parent") {
            Some(parent) => Ok(Some(serde_json::from_value(parent.clone()).map_err(|e| {
                AdminError::InvalidParent(format!("project parent {}: {}", parent, e))
            })?)),
            None => Ok(None),
        }
    }

    /// Resource name form, e.g. `folders/123`
    pub fn resource_name(&self) -> String {
        format!("{}s/{}", self.kind, self.id)
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource_name())
    }
}

impl CloudAdmin {
    /// Get a folder by numeric id
    pub async fn get_folder(&self, folder_id: &str) -> Result<Value> {
        self.run(&GET_FOLDER, async {
            let path = format!("folders/{}", urlencoding::encode(folder_id));
            self.session.folders.get_json(&path).await
        })
        .await
    }

    /// Folders directly under `parent` (e.g. `organizations/123`)
    ///
    /// Single page; no continuation.
    pub async fn get_folders(&self, parent: &str) -> Result<Vec<Value>> {
        self.run(&GET_FOLDERS, async {
            let path = format!("folders?parent={}", urlencoding::encode(parent));
            let mut response = self.session.folders.get_json(&path).await?;
            Ok::<_, AdminError>(take_array(&mut response, "folders"))
        })
        .await
    }

    /// Get an organization by resource name (`organizations/<id>`)
    pub async fn get_organization(&self, name: &str) -> Result<Value> {
        self.run(&GET_ORGANIZATION, self.session.crm.get(name)).await
    }

    /// Organizations visible to the caller (single search page)
    pub async fn get_organizations(&self) -> Result<Vec<Value>> {
        self.run(&GET_ORGANIZATIONS, async {
            let mut response = self
                .session
                .crm
                .post("organizations:search", &json!({}))
                .await?;
            Ok::<_, AdminError>(take_array(&mut response, "organizations"))
        })
        .await
    }

    /// Resolve the display path from the root organization down to `start`
    ///
    /// Produces e.g. `Acme > Engineering > Platform`. Walking stops at the
    /// first organization even if its payload carries a `parent`.
    pub async fn resolve_org_path(&self, start: &ParentRef) -> Result<String> {
        self.run(&RESOLVE_ORG_PATH, async {
            let mut names: Vec<String> = Vec::new();
            let mut current = Some(start.clone());

            while let Some(node) = current.take() {
                let payload = match node.kind {
                    NodeKind::Folder => self.get_folder(&node.id).await?,
                    NodeKind::Organization => {
                        self.get_organization(&node.resource_name()).await?
                    },
                };

                let name = payload
                    .get("displayName")
                    .and_then(|v| v.as_str())
                    .ok_or(AdminError::MissingField("displayName"))?;
                names.insert(0, name.to_string());

                if node.kind == NodeKind::Organization {
                    break;
                }

                current = payload
                    .get("parent")
                    .and_then(|v| v.as_str())
                    .map(ParentRef::from_path)
                    .transpose()?;
            }

            tracing::debug!("Resolved {} to {} level(s)", start, names.len());
            Ok::<_, AdminError>(names.join(" > "))
        })
        .await
    }
}

/// Move the array under `key` out of a response, empty if absent
pub(crate) fn take_array(response: &mut Value, key: &str) -> Vec<Value> {
    match response.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(ParentRef::from_path("folders/123").unwrap(), ParentRef::folder("123"));
        assert_eq!(
            ParentRef::from_path("organizations/456").unwrap(),
            ParentRef::organization("456")
        );
        assert_eq!(
            ParentRef::from_path("folders/789/extra").unwrap(),
            ParentRef::folder("789")
        );
    }

    #[test]
    fn test_from_path_rejects_garbage() {
        assert!(matches!(
            ParentRef::from_path("projects/1"),
            Err(AdminError::InvalidParent(_))
        ));
        assert!(ParentRef::from_path("folders").is_err());
        assert!(ParentRef::from_path("folders/").is_err());
        assert!(ParentRef::from_path("").is_err());
    }

    #[test]
    fn test_of_project() {
        let project = json!({"projectId": "p", "parent": {"type": "folder", "id": "42"}});
        assert_eq!(
            ParentRef::of_project(&project).unwrap(),
            Some(ParentRef::folder("42"))
        );
        assert_eq!(ParentRef::of_project(&json!({"projectId": "p"})).unwrap(), None);

        let odd = json!({"parent": {"type": "billingAccount", "id": "1"}});
        assert!(ParentRef::of_project(&odd).is_err());
    }

    #[test]
    fn test_resource_name_round_trips_kind() {
        let org = ParentRef::organization("9");
        assert_eq!(org.resource_name(), "organizations/9");
        assert_eq!(ParentRef::from_path(&org.resource_name()).unwrap(), org);
    }

    #[test]
    fn test_take_array() {
        let mut response = json!({"folders": [{"name": "folders/1"}]});
        assert_eq!(take_array(&mut response, "folders").len(), 1);
        assert!(take_array(&mut json!({}), "folders").is_empty());
    }
}
