//! Linux/Unix syslog generator.
//!
//! Messages come from a template catalog keyed by event category. A
//! template names its facility, severity and process; placeholders are
//! filled from value pools at generation time. The `attacker_ip`
//! parameter flows into the `{ip}` and `{src_ip}` placeholders so an
//! attack scenario produces a correlatable source address.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generators::{EventGenerator, Params, pools, seeded_rng};
use crate::schema::SyslogEvent;
use crate::timeline::{self, TimeWindow};

struct Template {
    facility: &'static str,
    severity: &'static str,
    process: &'static str,
    message: &'static str,
}

const CATEGORIES: &[(&str, &[Template])] = &[
    (
        "ssh_success",
        &[
            Template {
                facility: "auth",
                severity: "info",
                process: "sshd",
                message: "Accepted publickey for {user} from {ip} port {port} ssh2: RSA SHA256:{hash}",
            },
            Template {
                facility: "auth",
                severity: "info",
                process: "sshd",
                message: "Accepted password for {user} from {ip} port {port} ssh2",
            },
        ],
    ),
    (
        "ssh_failure",
        &[
            Template {
                facility: "auth",
                severity: "warning",
                process: "sshd",
                message: "Failed password for {user} from {ip} port {port} ssh2",
            },
            Template {
                facility: "auth",
                severity: "warning",
                process: "sshd",
                message: "Failed publickey for {user} from {ip} port {port} ssh2",
            },
            Template {
                facility: "auth",
                severity: "err",
                process: "sshd",
                message: "Invalid user {user} from {ip} port {port}",
            },
            Template {
                facility: "auth",
                severity: "warning",
                process: "sshd",
                message: "Connection closed by authenticating user {user} {ip} port {port} [preauth]",
            },
        ],
    ),
    (
        "ssh_brute_force",
        &[
            Template {
                facility: "auth",
                severity: "crit",
                process: "sshd",
                message: "message repeated {count} times: [ Failed password for {user} from {ip} port {port} ssh2]",
            },
            Template {
                facility: "auth",
                severity: "err",
                process: "sshd",
                message: "Disconnecting invalid user {user} {ip} port {port}: Too many authentication failures",
            },
        ],
    ),
    (
        "sudo_success",
        &[Template {
            facility: "authpriv",
            severity: "info",
            process: "sudo",
            message: "{user} : TTY=pts/{tty} ; PWD={pwd} ; USER=root ; COMMAND={cmd}",
        }],
    ),
    (
        "sudo_failure",
        &[
            Template {
                facility: "authpriv",
                severity: "alert",
                process: "sudo",
                message: "{user} : user NOT in sudoers ; TTY=pts/{tty} ; PWD={pwd} ; USER=root ; COMMAND={cmd}",
            },
            Template {
                facility: "authpriv",
                severity: "err",
                process: "sudo",
                message: "{user} : 3 incorrect password attempts ; TTY=pts/{tty} ; PWD={pwd} ; USER=root ; COMMAND={cmd}",
            },
        ],
    ),
    (
        "cron_job",
        &[Template {
            facility: "cron",
            severity: "info",
            process: "CRON",
            message: "({user}) CMD ({cmd})",
        }],
    ),
    (
        "kernel_security",
        &[
            Template {
                facility: "kern",
                severity: "warning",
                process: "kernel",
                message: "SELinux: denied {{ {action} }} for pid={pid} comm=\"{comm}\" path=\"{path}\"",
            },
            Template {
                facility: "kern",
                severity: "err",
                process: "kernel",
                message: "Out of memory: Killed process {pid} ({comm})",
            },
        ],
    ),
    (
        "service_start",
        &[
            Template {
                facility: "daemon",
                severity: "info",
                process: "systemd",
                message: "Started {service}.",
            },
            Template {
                facility: "daemon",
                severity: "info",
                process: "systemd",
                message: "Starting {service}...",
            },
        ],
    ),
    (
        "service_stop",
        &[
            Template {
                facility: "daemon",
                severity: "info",
                process: "systemd",
                message: "Stopped {service}.",
            },
            Template {
                facility: "daemon",
                severity: "info",
                process: "systemd",
                message: "Stopping {service}...",
            },
        ],
    ),
    (
        "service_failure",
        &[
            Template {
                facility: "daemon",
                severity: "err",
                process: "systemd",
                message: "{service} failed to start.",
            },
            Template {
                facility: "daemon",
                severity: "crit",
                process: "systemd",
                message: "{service}.service: Main process exited, code=exited, status={status}",
            },
        ],
    ),
    (
        "firewall_block",
        &[Template {
            facility: "kern",
            severity: "warning",
            process: "kernel",
            message: "iptables denied: IN={iface} OUT= SRC={src_ip} DST={dst_ip} PROTO={proto} DPT={port}",
        }],
    ),
    (
        "disk_error",
        &[
            Template {
                facility: "kern",
                severity: "err",
                process: "kernel",
                message: "EXT4-fs error (device {device}): {error_msg}",
            },
            Template {
                facility: "kern",
                severity: "crit",
                process: "kernel",
                message: "Buffer I/O error on device {device}, logical block {block}",
            },
        ],
    ),
    (
        "web_access",
        &[Template {
            facility: "local0",
            severity: "info",
            process: "nginx",
            message: "{ip} - {user} [{timestamp}] \"{method} {path} HTTP/1.1\" {status} {bytes}",
        }],
    ),
    (
        "db_connection",
        &[
            Template {
                facility: "local1",
                severity: "info",
                process: "postgres",
                message: "connection received: host={ip} port={port}",
            },
            Template {
                facility: "local1",
                severity: "warning",
                process: "postgres",
                message: "connection attempt from {ip} failed: authentication failed for user \"{user}\"",
            },
        ],
    ),
];

const HOSTS: &[(&str, &str)] = &[
    ("web-server-01.contoso.local", "10.1.1.10"),
    ("web-server-02.contoso.local", "10.1.1.11"),
    ("db-primary.contoso.local", "10.1.2.10"),
    ("db-replica.contoso.local", "10.1.2.11"),
    ("app-server-01.contoso.local", "10.1.3.10"),
    ("app-server-02.contoso.local", "10.1.3.11"),
    ("mail-server.contoso.local", "10.1.4.10"),
    ("dns-server.contoso.local", "10.1.5.10"),
    ("proxy-server.contoso.local", "10.1.6.10"),
    ("jump-server.contoso.local", "10.1.7.10"),
    ("k8s-master.contoso.local", "10.1.8.10"),
    ("k8s-worker-01.contoso.local", "10.1.8.11"),
];

const LINUX_USERS: &[&str] = &[
    "root", "admin", "ubuntu", "centos", "ec2-user", "deploy", "www-data", "nginx", "postgres",
    "mysql", "redis", "ansible", "jenkins",
];

const SUDO_COMMANDS: &[&str] = &[
    "/usr/bin/systemctl restart nginx",
    "/usr/bin/apt-get update",
    "/usr/bin/yum install -y httpd",
    "/bin/cat /etc/shadow",
    "/bin/chmod 777 /var/www/html",
    "/usr/sbin/useradd newuser",
    "/usr/bin/docker exec -it container bash",
    "/bin/rm -rf /tmp/*",
    "/usr/bin/vi /etc/passwd",
];

const SERVICES: &[&str] = &[
    "nginx.service",
    "apache2.service",
    "mysql.service",
    "postgresql.service",
    "docker.service",
    "redis.service",
    "sshd.service",
    "crond.service",
    "firewalld.service",
    "kubelet.service",
];

const DEFAULT_ATTACKER_IP: &str = "203.0.113.50";

fn templates_for(category: &str) -> &'static [Template] {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .or_else(|| CATEGORIES.iter().find(|(name, _)| *name == "service_start"))
        .map(|(_, templates)| *templates)
        .unwrap_or(&[])
}

/// Generates Linux/Unix syslog records.
///
/// Parameters: `event_type` (template category), `target_host`,
/// `attacker_ip`.
pub struct SyslogGenerator {
    rng: StdRng,
    event_type: Option<String>,
    target_host: Option<String>,
    attacker_ip: String,
}

impl SyslogGenerator {
    pub fn new(params: Params, seed: Option<u64>) -> Self {
        Self {
            rng: seeded_rng(seed),
            event_type: params.get_str("event_type"),
            target_host: params.get_str("target_host"),
            attacker_ip: params
                .get_str("attacker_ip")
                .unwrap_or_else(|| DEFAULT_ATTACKER_IP.to_string()),
        }
    }

    fn fill(&mut self, template: &str, record_ts: &chrono::DateTime<chrono::Utc>) -> String {
        let mut message = template.to_string();
        // Substitution runs in a fixed order so seeded output is stable.
        let fills: Vec<(&str, String)> = vec![
            ("{user}", LINUX_USERS.choose(&mut self.rng).unwrap().to_string()),
            ("{ip}", self.attacker_ip.clone()),
            ("{port}", self.rng.random_range(1024..=65535u32).to_string()),
            ("{hash}", pools::hex_token(&mut self.rng, 43)),
            ("{tty}", self.rng.random_range(0..=9u8).to_string()),
            (
                "{pwd}",
                ["/home/admin", "/root", "/var/www", "/tmp"]
                    .choose(&mut self.rng)
                    .unwrap()
                    .to_string(),
            ),
            ("{cmd}", SUDO_COMMANDS.choose(&mut self.rng).unwrap().to_string()),
            ("{service}", SERVICES.choose(&mut self.rng).unwrap().to_string()),
            (
                "{status}",
                [1u8, 2, 127, 137, 143].choose(&mut self.rng).unwrap().to_string(),
            ),
            ("{pid}", self.rng.random_range(1000..=65535u32).to_string()),
            (
                "{comm}",
                ["nginx", "python", "java", "node", "httpd"]
                    .choose(&mut self.rng)
                    .unwrap()
                    .to_string(),
            ),
            (
                "{path}",
                ["/etc/passwd", "/var/log/syslog", "/tmp/malware"]
                    .choose(&mut self.rng)
                    .unwrap()
                    .to_string(),
            ),
            (
                "{action}",
                ["read", "write", "execute", "open"]
                    .choose(&mut self.rng)
                    .unwrap()
                    .to_string(),
            ),
            ("{count}", self.rng.random_range(5..=100u32).to_string()),
            (
                "{iface}",
                ["eth0", "ens192", "ens33"].choose(&mut self.rng).unwrap().to_string(),
            ),
            ("{src_ip}", self.attacker_ip.clone()),
            ("{dst_ip}", pools::private_ip(&mut self.rng)),
            (
                "{proto}",
                ["TCP", "UDP"].choose(&mut self.rng).unwrap().to_string(),
            ),
            (
                "{device}",
                ["sda1", "sdb1", "nvme0n1p1"].choose(&mut self.rng).unwrap().to_string(),
            ),
            (
                "{error_msg}",
                ["ext4_read_block_bitmap", "unable to read inode", "checksum error"]
                    .choose(&mut self.rng)
                    .unwrap()
                    .to_string(),
            ),
            ("{block}", self.rng.random_range(100_000..=999_999u32).to_string()),
            (
                "{method}",
                ["GET", "POST", "PUT", "DELETE"].choose(&mut self.rng).unwrap().to_string(),
            ),
            // The record's own timestamp, so seeded runs stay byte-identical.
            (
                "{timestamp}",
                record_ts.format("%d/%b/%Y:%H:%M:%S +0000").to_string(),
            ),
            ("{bytes}", self.rng.random_range(100..=50_000u32).to_string()),
        ];
        for (placeholder, value) in fills {
            message = message.replace(placeholder, &value);
        }
        message
    }
}

impl EventGenerator for SyslogGenerator {
    fn log_type(&self) -> &'static str {
        "syslog"
    }

    fn generate(&mut self, count: usize, window: &TimeWindow) -> Result<Vec<Value>> {
        let timestamps = timeline::distribute(&mut self.rng, count, window);
        let mut events = Vec::with_capacity(count);

        for ts in timestamps {
            let (hostname, host_ip) = match &self.target_host {
                Some(host) => (host.clone(), pools::private_ip(&mut self.rng)),
                None => {
                    let (hostname, ip) = HOSTS.choose(&mut self.rng).unwrap();
                    (hostname.to_string(), ip.to_string())
                }
            };
            let templates = match &self.event_type {
                Some(category) => templates_for(category),
                None => {
                    let (_, templates) = CATEGORIES.choose(&mut self.rng).unwrap();
                    *templates
                }
            };
            let template = templates
                .choose(&mut self.rng)
                .ok_or_else(|| Error::Generation("empty template catalog".into()))?;
            let message = self.fill(template.message, &ts);

            let event = SyslogEvent {
                time_generated: ts,
                computer: hostname,
                host_ip,
                facility: template.facility.to_string(),
                severity_level: template.severity.to_string(),
                process_name: template.process.to_string(),
                syslog_message: message,
            };
            events.push(serde_json::to_value(event).map_err(|e| Error::Generation(e.to_string()))?);
        }

        debug!(count = events.len(), "generated Syslog records");
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
    fn brute_force_scenario_carries_attacker_ip() {
        let p = params(serde_json::json!({
            "event_type": "ssh_brute_force",
            "attacker_ip": "198.51.100.77",
        }));
        let mut generator = SyslogGenerator::new(p, Some(31));
        let batch = generator.generate(50, &window()).unwrap();
        for record in &batch {
            assert_eq!(record["Facility"], "auth");
            assert_eq!(record["ProcessName"], "sshd");
            let message = record["SyslogMessage"].as_str().unwrap();
            assert!(message.contains("198.51.100.77"), "{message}");
            assert!(!message.contains('{'), "unfilled placeholder: {message}");
        }
    }

    #[test]
    fn unknown_category_falls_back_to_service_start() {
        let p = params(serde_json::json!({ "event_type": "no_such_category" }));
        let mut generator = SyslogGenerator::new(p, Some(32));
        let batch = generator.generate(20, &window()).unwrap();
        for record in &batch {
            assert_eq!(record["ProcessName"], "systemd");
            assert_eq!(record["Facility"], "daemon");
        }
    }

    #[test]
    fn target_host_overrides_pool() {
        let p = params(serde_json::json!({ "target_host": "bastion.contoso.local" }));
        let mut generator = SyslogGenerator::new(p, Some(33));
        let batch = generator.generate(20, &window()).unwrap();
        for record in &batch {
            assert_eq!(record["Computer"], "bastion.contoso.local");
            assert!(record["HostIP"].as_str().unwrap().starts_with("10."));
        }
    }

    #[test]
    fn web_access_timestamp_matches_record_time() {
        let p = params(serde_json::json!({ "event_type": "web_access" }));
        let mut generator = SyslogGenerator::new(p, Some(34));
        let batch = generator.generate(10, &window()).unwrap();
        for record in &batch {
            let ts = chrono::DateTime::parse_from_rfc3339(
                record["TimeGenerated"].as_str().unwrap(),
            )
            .unwrap();
            let clf = ts.format("%d/%b/%Y:%H:%M:%S +0000").to_string();
            let message = record["SyslogMessage"].as_str().unwrap();
            assert!(message.contains(&clf), "{message} missing {clf}");
        }
    }

    #[test]
    fn kernel_security_keeps_literal_braces() {
        let p = params(serde_json::json!({ "event_type": "kernel_security" }));
        let mut generator = SyslogGenerator::new(p, Some(35));
        let batch = generator.generate(100, &window()).unwrap();
        let selinux = batch
            .iter()
            .map(|r| r["SyslogMessage"].as_str().unwrap())
            .find(|m| m.starts_with("SELinux"));
        let message = selinux.expect("seed should produce at least one SELinux line");
        assert!(message.contains("{{ "));
        assert!(message.contains(" }}"));
    }
}
