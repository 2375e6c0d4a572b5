//! Schema-typed event records, one struct per log type.
//!
//! Field names follow the destination table schemas (PascalCase on the
//! wire). Optional fields serialize as absent rather than empty strings.
//! Every record carries `TimeGenerated` as an ISO-8601 UTC timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Linux/Unix syslog record.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SyslogEvent {
    pub time_generated: DateTime<Utc>,
    pub computer: String,
    #[serde(rename = "HostIP")]
    pub host_ip: String,
    pub facility: String,
    pub severity_level: String,
    pub process_name: String,
    pub syslog_message: String,
}

/// Windows Security event record.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityEvent {
    pub time_generated: DateTime<Utc>,
    pub computer: String,
    #[serde(rename = "EventID")]
    pub event_id: u32,
    pub activity: String,
    pub account: String,
    pub account_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logon_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workstation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<String>,
}

/// Entra ID sign-in record.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SigninLog {
    pub time_generated: DateTime<Utc>,
    pub user_principal_name: String,
    pub user_display_name: String,
    pub app_display_name: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    pub location: String,
    pub result_type: String,
    pub result_description: String,
    pub client_app_used: String,
    pub conditional_access_status: String,
    pub risk_level_during_sign_in: String,
    pub risk_level_aggregated: String,
}

/// CommonSecurityLog (CEF) record from network security devices.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct CommonSecurityLogEvent {
    pub time_generated: DateTime<Utc>,
    pub device_vendor: String,
    pub device_product: String,
    pub device_version: String,
    #[serde(rename = "DeviceEventClassID")]
    pub device_event_class_id: String,
    pub activity: String,
    pub log_severity: String,
    #[serde(rename = "SourceIP")]
    pub source_ip: String,
    #[serde(rename = "DestinationIP")]
    pub destination_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(rename = "RequestURL", skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,
}

/// One record per PIN guess handled by the demo front door.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct AttemptRecord {
    pub time_generated: DateTime<Utc>,
    pub nickname: String,
    pub pincode: String,
    pub attempt_result: String,
    #[serde(rename = "SourceIP")]
    pub source_ip: String,
    pub user_agent: String,
}
