//! Windows SecurityEvent generator.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generators::{EventGenerator, Params, pools, seeded_rng};
use crate::schema::SecurityEvent;
use crate::timeline::{self, TimeWindow};

struct EventDef {
    id: u32,
    activity: &'static str,
    logon_types: &'static [u8],
    status: Option<&'static str>,
    sub_status: Option<&'static str>,
}

const LOGON_TYPES: &[u8] = &[2, 3, 7, 10, 11];

const EVENT_DEFINITIONS: &[EventDef] = &[
    EventDef {
        id: 4624,
        activity: "4624 - An account was successfully logged on.",
        logon_types: LOGON_TYPES,
        status: Some("0x0"),
        sub_status: Some("0x0"),
    },
    EventDef {
        id: 4625,
        activity: "4625 - An account failed to log on.",
        logon_types: LOGON_TYPES,
        status: Some("0xC000006D"),
        sub_status: Some("0xC000006A"),
    },
    EventDef {
        id: 4648,
        activity: "4648 - A logon was attempted using explicit credentials.",
        logon_types: &[],
        status: Some("0x0"),
        sub_status: Some("0x0"),
    },
    EventDef {
        id: 4672,
        activity: "4672 - Special privileges assigned to new logon.",
        logon_types: &[],
        status: None,
        sub_status: None,
    },
    EventDef {
        id: 4688,
        activity: "4688 - A new process has been created.",
        logon_types: &[],
        status: None,
        sub_status: None,
    },
    EventDef {
        id: 4720,
        activity: "4720 - A user account was created.",
        logon_types: &[],
        status: None,
        sub_status: None,
    },
    EventDef {
        id: 4726,
        activity: "4726 - A user account was deleted.",
        logon_types: &[],
        status: None,
        sub_status: None,
    },
];

const DEFAULT_EVENT_IDS: &[u32] = &[4624, 4625, 4672, 4688];

const DEFAULT_HOSTS: &[&str] = &[
    "DC01.contoso.com",
    "DC02.contoso.com",
    "WEB-SVR01.contoso.com",
    "FILE-SVR01.contoso.com",
    "SQL-SVR01.contoso.com",
];

const DEFAULT_ACCOUNTS: &[&str] = &[
    "admin",
    "svc_backup",
    "svc_sql",
    "john.doe",
    "jane.smith",
    "helpdesk",
    "SYSTEM",
];

const DEFAULT_WORKSTATIONS: &[&str] = &[
    "WORKSTATION01",
    "WORKSTATION02",
    "LAPTOP-JDOE",
    "LAPTOP-JSMITH",
    "KIOSK-LOBBY",
];

/// Unknown event ids fall back to the interactive-logon definition rather
/// than failing mid-run.
fn event_def(id: u32) -> &'static EventDef {
    EVENT_DEFINITIONS
        .iter()
        .find(|def| def.id == id)
        .unwrap_or(&EVENT_DEFINITIONS[0])
}

/// Generates Windows Security events.
///
/// Parameters: `target_host`, `target_account`, `source_ip`, `event_ids`.
/// Explicit values win over pool selection.
pub struct SecurityEventGenerator {
    rng: StdRng,
    target_host: Option<String>,
    target_account: Option<String>,
    source_ip: Option<String>,
    event_ids: Vec<u32>,
}

impl SecurityEventGenerator {
    pub fn new(params: Params, seed: Option<u64>) -> Self {
        Self {
            rng: seeded_rng(seed),
            target_host: params.get_str("target_host"),
            target_account: params.get_str("target_account"),
            source_ip: params.get_str("source_ip"),
            event_ids: params
                .get_u32_list("event_ids")
                .filter(|ids| !ids.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_IDS.to_vec()),
        }
    }
}

impl EventGenerator for SecurityEventGenerator {
    fn log_type(&self) -> &'static str {
        "security_event"
    }

    fn generate(&mut self, count: usize, window: &TimeWindow) -> Result<Vec<Value>> {
        let timestamps = timeline::distribute(&mut self.rng, count, window);
        let mut events = Vec::with_capacity(count);

        for ts in timestamps {
            let event_id = *self.event_ids.choose(&mut self.rng).unwrap_or(&4624);
            let def = event_def(event_id);

            let computer = self
                .target_host
                .clone()
                .unwrap_or_else(|| DEFAULT_HOSTS.choose(&mut self.rng).unwrap().to_string());
            let account = self
                .target_account
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCOUNTS.choose(&mut self.rng).unwrap().to_string());
            let ip = self
                .source_ip
                .clone()
                .unwrap_or_else(|| pools::public_ip(&mut self.rng));
            let workstation = DEFAULT_WORKSTATIONS.choose(&mut self.rng).unwrap();

            let event = SecurityEvent {
                time_generated: ts,
                computer,
                event_id: def.id,
                activity: def.activity.to_string(),
                account,
                account_type: "User".to_string(),
                logon_type: def.logon_types.choose(&mut self.rng).copied(),
                ip_address: Some(ip),
                workstation_name: Some(workstation.to_string()),
                status: def.status.map(String::from),
                sub_status: def.sub_status.map(String::from),
            };
            events.push(serde_json::to_value(event).map_err(|e| Error::Generation(e.to_string()))?);
        }

        debug!(count = events.len(), "generated SecurityEvent records");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 1, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn params(json: serde_json::Value) -> Params {
        Params::new(json.as_object().unwrap().clone())
    }

    #[test]
    fn overrides_beat_pools() {
        let p = params(serde_json::json!({
            "target_host": "DC99.contoso.com",
            "target_account": "victim",
            "source_ip": "203.0.113.99",
            "event_ids": [4625],
        }));
        let mut generator = SecurityEventGenerator::new(p, Some(1));
        let batch = generator.generate(30, &window()).unwrap();
        for record in batch {
            assert_eq!(record["Computer"], "DC99.contoso.com");
            assert_eq!(record["Account"], "victim");
            assert_eq!(record["IpAddress"], "203.0.113.99");
            assert_eq!(record["EventID"], 4625);
            assert_eq!(record["Status"], "0xC000006D");
            assert_eq!(record["SubStatus"], "0xC000006A");
        }
    }

    #[test]
    fn default_catalog_only_emits_known_ids() {
        let mut generator = SecurityEventGenerator::new(Params::default(), Some(2));
        let batch = generator.generate(100, &window()).unwrap();
        for record in batch {
            let id = record["EventID"].as_u64().unwrap() as u32;
            assert!(DEFAULT_EVENT_IDS.contains(&id));
        }
    }

    #[test]
    fn logon_type_absent_for_non_logon_events() {
        let p = params(serde_json::json!({ "event_ids": [4672] }));
        let mut generator = SecurityEventGenerator::new(p, Some(3));
        let batch = generator.generate(10, &window()).unwrap();
        for record in batch {
            assert!(record.get("LogonType").is_none());
            assert!(record.get("Status").is_none());
        }
    }

    #[test]
    fn unknown_event_id_falls_back_to_4624_definition() {
        let def = event_def(9999);
        assert_eq!(def.id, 4624);
    }
}
