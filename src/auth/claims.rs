//! Identity carried by a validated token.

use serde::{Deserialize, Serialize};

/// Grants access to `apis` of `services`. `*` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub services: Vec<String>,
    pub apis: Vec<String>,
}

impl Rule {
    pub fn new<S: Into<String>>(
        services: impl IntoIterator<Item = S>,
        apis: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            services: services.into_iter().map(Into::into).collect(),
            apis: apis.into_iter().map(Into::into).collect(),
        }
    }

    /// Rule matching every service and api.
    pub fn allow_all() -> Self {
        Self::new(["*"], ["*"])
    }
}

/// Token payload. Produced once per call and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claims {
    pub name: String,
    pub email: String,
    pub role: String,
    pub rules: Vec<Rule>,
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}
