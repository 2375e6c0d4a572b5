//! CommonSecurityLog (CEF) generator.
//!
//! Synthesizes events from network security devices. Source and
//! destination addresses are shaped by event class: high-severity classes
//! lean on known threat-actor addresses hitting internal targets, normal
//! traffic stays internal-to-mixed.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generators::{EventGenerator, Params, pools, seeded_rng};
use crate::schema::CommonSecurityLogEvent;
use crate::timeline::{self, TimeWindow};

struct Vendor {
    name: &'static str,
    products: &'static [&'static str],
    version: &'static str,
}

const VENDORS: &[Vendor] = &[
    Vendor {
        name: "Palo Alto Networks",
        products: &["PAN-OS", "Prisma Access"],
        version: "10.2.0",
    },
    Vendor {
        name: "Fortinet",
        products: &["FortiGate"],
        version: "7.4.1",
    },
    Vendor {
        name: "Cisco",
        products: &["ASA", "Firepower"],
        version: "9.18",
    },
    Vendor {
        name: "Check Point",
        products: &["NGFW"],
        version: "R81.20",
    },
    Vendor {
        name: "Zscaler",
        products: &["ZIA"],
        version: "6.0",
    },
];

struct EventClass {
    name: &'static str,
    class_id: &'static str,
    activity: &'static str,
    severity: &'static str,
    protocols: &'static [&'static str],
    dest_ports: &'static [u16],
}

const EVENT_CLASSES: &[EventClass] = &[
    EventClass {
        name: "firewall_allow",
        class_id: "traffic:allow",
        activity: "Firewall session allowed",
        severity: "1",
        protocols: &["TCP", "UDP"],
        dest_ports: &[80, 443, 8080, 22, 3389, 25, 53, 636],
    },
    EventClass {
        name: "firewall_deny",
        class_id: "traffic:deny",
        activity: "Firewall session denied",
        severity: "5",
        protocols: &["TCP", "UDP"],
        dest_ports: &[22, 3389, 445, 135, 139, 1433, 3306, 5432],
    },
    EventClass {
        name: "ids_alert",
        class_id: "intrusion:detected",
        activity: "Intrusion attempt detected",
        severity: "8",
        protocols: &["TCP", "UDP"],
        dest_ports: &[80, 443, 8080, 22, 445],
    },
    EventClass {
        name: "malware_detected",
        class_id: "malware:detected",
        activity: "Malware communication blocked",
        severity: "9",
        protocols: &["TCP"],
        dest_ports: &[443, 80, 8443],
    },
    EventClass {
        name: "web_access",
        class_id: "web:access",
        activity: "Web access logged",
        severity: "1",
        protocols: &["TCP"],
        dest_ports: &[80, 443, 8080],
    },
    EventClass {
        name: "vpn_connection",
        class_id: "vpn:connection",
        activity: "VPN session established",
        severity: "1",
        protocols: &["UDP", "TCP"],
        dest_ports: &[443, 500, 4500, 1194],
    },
    EventClass {
        name: "threat_intelligence",
        class_id: "threat:match",
        activity: "Threat intelligence IOC match",
        severity: "10",
        protocols: &["TCP", "UDP"],
        dest_ports: &[443, 80, 53],
    },
];

const SAMPLE_URLS: &[&str] = &[
    "https://login.microsoftonline.com/auth",
    "https://www.contoso.com/api/v1/users",
    "http://malicious-site.example/payload.exe",
    "https://github.com/downloads/release.zip",
    "http://suspicious-domain.net/beacon",
    "https://office365.com/owa",
    "https://drive.google.com/file/download",
];

const THREAT_ACTOR_IPS: &[&str] = &[
    "198.51.100.10",
    "198.51.100.11",
    "198.51.100.12",
    "203.0.113.50",
    "203.0.113.51",
    "203.0.113.52",
];

fn is_threat_class(name: &str) -> bool {
    matches!(name, "ids_alert" | "malware_detected" | "threat_intelligence")
}

/// Generates CommonSecurityLog records.
///
/// Parameters: `vendor`, `event_type`, `source_ip`, `dest_ip`,
/// `threat_actor_ip` (bool, force threat-actor source pool).
pub struct CommonSecurityLogGenerator {
    rng: StdRng,
    vendor: Option<String>,
    event_type: Option<String>,
    source_ip: Option<String>,
    dest_ip: Option<String>,
    threat_actor_ip: bool,
}

impl CommonSecurityLogGenerator {
    pub fn new(params: Params, seed: Option<u64>) -> Self {
        Self {
            rng: seeded_rng(seed),
            vendor: params.get_str("vendor"),
            event_type: params.get_str("event_type"),
            source_ip: params.get_str("source_ip"),
            dest_ip: params.get_str("dest_ip"),
            threat_actor_ip: params.get_bool("threat_actor_ip"),
        }
    }

    fn pick_vendor(&mut self) -> &'static Vendor {
        if let Some(name) = &self.vendor
            && let Some(vendor) = VENDORS.iter().find(|v| v.name == name)
        {
            return vendor;
        }
        VENDORS.choose(&mut self.rng).unwrap()
    }

    fn pick_class(&mut self) -> &'static EventClass {
        if let Some(name) = &self.event_type
            && let Some(class) = EVENT_CLASSES.iter().find(|c| c.name == name)
        {
            return class;
        }
        EVENT_CLASSES.choose(&mut self.rng).unwrap()
    }

    fn source_for(&mut self, class: &EventClass) -> String {
        if let Some(ip) = &self.source_ip {
            return ip.clone();
        }
        if self.threat_actor_ip || is_threat_class(class.name) {
            if self.rng.random_bool(0.7) {
                THREAT_ACTOR_IPS.choose(&mut self.rng).unwrap().to_string()
            } else {
                pools::public_ip(&mut self.rng)
            }
        } else if class.name == "firewall_deny" {
            if self.rng.random_bool(0.5) {
                pools::public_ip(&mut self.rng)
            } else {
                pools::internal_ip(&mut self.rng)
            }
        } else {
            pools::internal_ip(&mut self.rng)
        }
    }

    fn destination_for(&mut self, class: &EventClass) -> String {
        if let Some(ip) = &self.dest_ip {
            return ip.clone();
        }
        if is_threat_class(class.name) {
            pools::internal_ip(&mut self.rng)
        } else if self.rng.random_bool(0.6) {
            pools::public_ip(&mut self.rng)
        } else {
            pools::internal_ip(&mut self.rng)
        }
    }
}

impl EventGenerator for CommonSecurityLogGenerator {
    fn log_type(&self) -> &'static str {
        "common_security_log"
    }

    fn generate(&mut self, count: usize, window: &TimeWindow) -> Result<Vec<Value>> {
        let timestamps = timeline::distribute(&mut self.rng, count, window);
        let mut events = Vec::with_capacity(count);

        for ts in timestamps {
            let vendor = self.pick_vendor();
            let class = self.pick_class();
            let source_ip = self.source_for(class);
            let destination_ip = self.destination_for(class);
            let request_url = if matches!(class.name, "web_access" | "malware_detected") {
                Some(SAMPLE_URLS.choose(&mut self.rng).unwrap().to_string())
            } else {
                None
            };

            let event = CommonSecurityLogEvent {
                time_generated: ts,
                device_vendor: vendor.name.to_string(),
                device_product: vendor.products.choose(&mut self.rng).unwrap().to_string(),
                device_version: vendor.version.to_string(),
                device_event_class_id: class.class_id.to_string(),
                activity: class.activity.to_string(),
                log_severity: class.severity.to_string(),
                source_ip,
                destination_ip,
                source_port: Some(pools::ephemeral_port(&mut self.rng)),
                destination_port: class.dest_ports.choose(&mut self.rng).copied(),
                protocol: class.protocols.choose(&mut self.rng).map(|p| p.to_string()),
                request_url,
            };
            events.push(serde_json::to_value(event).map_err(|e| Error::Generation(e.to_string()))?);
        }

        debug!(count = events.len(), "generated CommonSecurityLog records");
        Ok(events)
    }
}
