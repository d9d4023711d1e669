//! Serializable specification document (Swagger 2.0 layout).

use crate::registry::ApiInfo;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const SWAGGER_VERSION: &str = "2.0";

/// Operations of one path, keyed by lowercase HTTP method.
pub type PathItem = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDocument {
    pub swagger: String,
    pub info: InfoObject,
    pub paths: BTreeMap<String, PathItem>,
    pub definitions: BTreeMap<String, Value>,
}

impl SpecDocument {
    #[must_use]
    pub fn new(info: InfoObject) -> Self {
        Self {
            swagger: SWAGGER_VERSION.to_string(),
            info,
            paths: BTreeMap::new(),
            definitions: BTreeMap::new(),
        }
    }

    /// Operation registered for `path` and `method` (lowercase), if any.
    #[must_use]
    pub fn operation(&self, path: &str, method: &str) -> Option<&Value> {
        self.paths.get(path)?.get(method)
    }

    pub fn to_json_value(&self) -> anyhow::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoObject {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseObject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&ApiInfo> for InfoObject {
    fn from(info: &ApiInfo) -> Self {
        let contact = (info.contact.is_some()
            || info.contact_url.is_some()
            || info.contact_email.is_some())
        .then(|| ContactObject {
            name: info.contact.clone(),
            url: info.contact_url.clone(),
            email: info.contact_email.clone(),
        });
        let license = info.license.as_ref().map(|name| LicenseObject {
            name: name.clone(),
            url: info.license_url.clone(),
        });

        Self {
            title: info.title.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
            terms_of_service: info.terms_url.clone(),
            contact,
            license,
        }
    }
}
