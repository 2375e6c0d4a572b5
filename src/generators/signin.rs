//! Entra ID sign-in generator.
//!
//! Baseline traffic follows a weighted result-code distribution; attack
//! modes (`brute_force`, `credential_stuffing`, `impossible_travel`)
//! reshape it toward the corresponding failure pattern. Risk levels and
//! conditional access status are derived from the chosen location and
//! result, never drawn independently.

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generators::{EventGenerator, Params, pools, seeded_rng};
use crate::schema::SigninLog;
use crate::timeline::{self, TimeWindow};

const USERS: &[(&str, &str)] = &[
    ("john.doe@contoso.com", "John Doe"),
    ("jane.smith@contoso.com", "Jane Smith"),
    ("admin@contoso.com", "Admin Account"),
    ("svc-backup@contoso.com", "Backup Service"),
    ("ceo@contoso.com", "Chief Executive Officer"),
    ("helpdesk@contoso.com", "Help Desk"),
    ("developer@contoso.com", "Developer Account"),
    ("guest_user@external.com", "Guest User"),
    ("contractor@partner.com", "External Contractor"),
    ("test.user@contoso.com", "Test User"),
];

const APPS: &[&str] = &[
    "Azure Portal",
    "Microsoft 365",
    "Microsoft Teams",
    "SharePoint Online",
    "Outlook Web App",
    "Power BI",
    "Azure CLI",
    "Visual Studio Code",
    "GitHub Enterprise",
    "Salesforce",
    "ServiceNow",
    "Workday",
];

const CLIENT_APPS: &[&str] = &[
    "Browser",
    "Mobile Apps and Desktop clients",
    "Exchange ActiveSync",
    "Other clients",
    "IMAP4",
    "POP3",
    "MAPI Over HTTP",
];

#[derive(Clone, Copy, PartialEq)]
enum LocationRisk {
    Low,
    Medium,
    High,
}

struct Location {
    city: &'static str,
    country: &'static str,
    risk: LocationRisk,
}

const LOCATIONS: &[Location] = &[
    Location { city: "Seattle", country: "US", risk: LocationRisk::Low },
    Location { city: "New York", country: "US", risk: LocationRisk::Low },
    Location { city: "San Francisco", country: "US", risk: LocationRisk::Low },
    Location { city: "London", country: "GB", risk: LocationRisk::Low },
    Location { city: "Berlin", country: "DE", risk: LocationRisk::Low },
    Location { city: "Toronto", country: "CA", risk: LocationRisk::Low },
    Location { city: "Sydney", country: "AU", risk: LocationRisk::Low },
    Location { city: "Tokyo", country: "JP", risk: LocationRisk::Low },
    Location { city: "Bangalore", country: "IN", risk: LocationRisk::Medium },
    Location { city: "São Paulo", country: "BR", risk: LocationRisk::Medium },
    Location { city: "Moscow", country: "RU", risk: LocationRisk::High },
    Location { city: "Beijing", country: "CN", risk: LocationRisk::High },
    Location { city: "Tehran", country: "IR", risk: LocationRisk::High },
    Location { city: "Pyongyang", country: "KP", risk: LocationRisk::High },
];

struct SigninResult {
    code: &'static str,
    description: &'static str,
}

const SUCCESS: SigninResult = SigninResult { code: "0", description: "Success" };
const INVALID_PASSWORD: SigninResult = SigninResult {
    code: "50126",
    description: "Invalid username or password",
};
const ACCOUNT_LOCKED: SigninResult = SigninResult {
    code: "50053",
    description: "Account is locked",
};
const MFA_REQUIRED: SigninResult = SigninResult {
    code: "50074",
    description: "Strong authentication is required",
};
const EXPIRED_PASSWORD: SigninResult = SigninResult {
    code: "50055",
    description: "Password is expired",
};
const BLOCKED_BY_CA: SigninResult = SigninResult {
    code: "53003",
    description: "Access blocked by Conditional Access",
};
const USER_NOT_FOUND: SigninResult = SigninResult {
    code: "50034",
    description: "User account not found",
};

const BASELINE_RESULTS: &[(SigninResult, u32)] = &[
    (SUCCESS, 70),
    (INVALID_PASSWORD, 15),
    (ACCOUNT_LOCKED, 3),
    (MFA_REQUIRED, 5),
    (EXPIRED_PASSWORD, 2),
    (BLOCKED_BY_CA, 3),
    (USER_NOT_FOUND, 2),
];

const BRUTE_FORCE_RESULTS: &[(SigninResult, u32)] = &[
    (INVALID_PASSWORD, 85),
    (ACCOUNT_LOCKED, 10),
    (SUCCESS, 5),
];

const CREDENTIAL_STUFFING_RESULTS: &[(SigninResult, u32)] = &[
    (INVALID_PASSWORD, 70),
    (USER_NOT_FOUND, 25),
    (SUCCESS, 5),
];

#[derive(Clone, Copy, PartialEq)]
enum AttackMode {
    None,
    BruteForce,
    CredentialStuffing,
    ImpossibleTravel,
}

/// Generates Entra ID sign-in records.
///
/// Parameters: `target_user`, `target_app`, `attack_type`,
/// `risky_locations`.
pub struct SigninLogGenerator {
    rng: StdRng,
    target_user: Option<String>,
    target_app: Option<String>,
    attack_mode: AttackMode,
    risky_locations: bool,
}

impl SigninLogGenerator {
    pub fn new(params: Params, seed: Option<u64>) -> Self {
        let attack_mode = match params.get_str("attack_type").as_deref() {
            Some("brute_force") => AttackMode::BruteForce,
            Some("credential_stuffing") => AttackMode::CredentialStuffing,
            Some("impossible_travel") => AttackMode::ImpossibleTravel,
            _ => AttackMode::None,
        };
        Self {
            rng: seeded_rng(seed),
            target_user: params.get_str("target_user"),
            target_app: params.get_str("target_app"),
            attack_mode,
            risky_locations: params.get_bool("risky_locations"),
        }
    }

    fn pick_result(&mut self) -> &'static SigninResult {
        let table = match self.attack_mode {
            AttackMode::BruteForce => BRUTE_FORCE_RESULTS,
            AttackMode::CredentialStuffing => CREDENTIAL_STUFFING_RESULTS,
            AttackMode::ImpossibleTravel => return &SUCCESS,
            AttackMode::None => BASELINE_RESULTS,
        };
        let weights = WeightedIndex::new(table.iter().map(|(_, w)| *w)).unwrap();
        &table[weights.sample(&mut self.rng)].0
    }

    fn pick_location(&mut self) -> &'static Location {
        if self.risky_locations {
            let risky: Vec<&'static Location> = LOCATIONS
                .iter()
                .filter(|l| l.risk != LocationRisk::Low)
                .collect();
            risky.choose(&mut self.rng).copied().unwrap()
        } else {
            LOCATIONS.choose(&mut self.rng).unwrap()
        }
    }

    fn risk_levels(&mut self, location: &Location, result: &SigninResult) -> (&'static str, &'static str) {
        let attack_shaped = matches!(
            self.attack_mode,
            AttackMode::BruteForce | AttackMode::CredentialStuffing
        );
        if location.risk == LocationRisk::High || attack_shaped {
            let pool = ["medium", "high"];
            (
                *pool.choose(&mut self.rng).unwrap(),
                *pool.choose(&mut self.rng).unwrap(),
            )
        } else if result.code != "0" {
            (
                *["none", "low", "medium"].choose(&mut self.rng).unwrap(),
                *["none", "low"].choose(&mut self.rng).unwrap(),
            )
        } else {
            ("none", "none")
        }
    }

    fn conditional_access(&mut self, result: &SigninResult) -> &'static str {
        match result.code {
            "53003" => "failure",
            "0" => *["success", "notApplied"].choose(&mut self.rng).unwrap(),
            _ => "notApplied",
        }
    }
}

/// Display name from a UPN the way directory sync would render it: local
/// part, dots to spaces, each word title-cased.
fn display_name_for(upn: &str) -> String {
    let local = upn.split('@').next().unwrap_or(upn);
    local
        .split('.')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl EventGenerator for SigninLogGenerator {
    fn log_type(&self) -> &'static str {
        "signin_logs"
    }

    fn generate(&mut self, count: usize, window: &TimeWindow) -> Result<Vec<Value>> {
        let timestamps = timeline::distribute(&mut self.rng, count, window);
        let mut events = Vec::with_capacity(count);

        for ts in timestamps {
            let (upn, display) = match &self.target_user {
                Some(upn) => (upn.clone(), display_name_for(upn)),
                None => {
                    let (upn, display) = USERS.choose(&mut self.rng).unwrap();
                    (upn.to_string(), display.to_string())
                }
            };
            let location = self.pick_location();
            let result = self.pick_result();
            let ip = if location.risk == LocationRisk::High {
                pools::threat_ip(&mut self.rng)
            } else {
                pools::public_ip(&mut self.rng)
            };
            let (risk_during, risk_aggregated) = self.risk_levels(location, result);
            let ca_status = self.conditional_access(result);

            let event = SigninLog {
                time_generated: ts,
                user_principal_name: upn,
                user_display_name: display,
                app_display_name: self
                    .target_app
                    .clone()
                    .unwrap_or_else(|| APPS.choose(&mut self.rng).unwrap().to_string()),
                ip_address: ip,
                location: format!("{}, {}", location.city, location.country),
                result_type: result.code.to_string(),
                result_description: result.description.to_string(),
                client_app_used: CLIENT_APPS.choose(&mut self.rng).unwrap().to_string(),
                conditional_access_status: ca_status.to_string(),
                risk_level_during_sign_in: risk_during.to_string(),
                risk_level_aggregated: risk_aggregated.to_string(),
            };
            events.push(serde_json::to_value(event).map_err(|e| Error::Generation(e.to_string()))?);
        }

        debug!(count = events.len(), "generated SigninLogs records");
        Ok(events)
    }
}
