//! Alert wire types and filters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    #[default]
    None,
    Volume,
    Node,
    Cluster,
    Drive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Notify,
    Warning,
    Alarm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub id: i64,
    pub alert_type: i64,
    pub resource: ResourceType,
    pub resource_id: String,
    pub severity: Severity,
    pub message: String,
    pub timestamp_secs: u64,
    pub cleared: bool,
}

/// One filter term; a query matches alerts satisfying every term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertsFilter {
    ResourceType(ResourceType),
    AlertType(i64),
    ResourceId(String),
    MinSeverity(Severity),
    TimeSpan { start_secs: u64, end_secs: u64 },
}

impl AlertsFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        match self {
            Self::ResourceType(kind) => alert.resource == *kind,
            Self::AlertType(kind) => alert.alert_type == *kind,
            Self::ResourceId(id) => alert.resource_id == *id,
            Self::MinSeverity(severity) => alert.severity >= *severity,
            Self::TimeSpan {
                start_secs,
                end_secs,
            } => (*start_secs..=*end_secs).contains(&alert.timestamp_secs),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkAlertsEnumerateRequest {
    pub filters: Vec<AlertsFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkAlertsEnumerateResponse {
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkAlertsDeleteRequest {
    pub filters: Vec<AlertsFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkAlertsDeleteResponse {}
