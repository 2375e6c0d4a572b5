//! Full-run tests: config through engine to a memory sink.

use logsynth::outputs::MemorySink;
use logsynth::{AppConfig, engine};

fn load(yaml: &str) -> AppConfig {
    serde_yaml::from_str(yaml).expect("test config should parse")
}

const ATTACK_CONFIG: &str = r#"
generation:
  count: 100
  time_range:
    start: "2026-02-01T00:00:00Z"
    end: "2026-02-01T06:00:00Z"
  seed: 1234
scenarios:
  - name: ssh_brute_force_wave
    log_type: syslog
    count: 150
    parameters:
      event_type: ssh_brute_force
      target_host: jump-server.contoso.local
      attacker_ip: "203.0.113.66"
  - name: password_spray
    log_type: signin_logs
    count: 400
    parameters:
      attack_type: brute_force
      target_user: admin@contoso.com
  - name: perimeter_noise
    log_type: common_security_log
    parameters:
      event_type: firewall_deny
"#;

#[tokio::test]
async fn attack_campaign_lands_on_expected_streams() {
    let config = load(ATTACK_CONFIG);
    let mut sink = MemorySink::default();
    let summary = engine::run(&config, &mut sink).await.unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(summary.total_events, 150 + 400 + 100);
    assert_eq!(sink.batches.len(), 3);
    assert!(sink.closed);

    let (stream, syslog_batch) = &sink.batches[0];
    assert_eq!(stream, "Custom-SyslogDemo_CL");
    assert_eq!(syslog_batch.len(), 150);
    for record in syslog_batch {
        assert_eq!(record["Computer"], "jump-server.contoso.local");
        let message = record["SyslogMessage"].as_str().unwrap();
        assert!(message.contains("203.0.113.66"), "{message}");
    }

    let (stream, signin_batch) = &sink.batches[1];
    assert_eq!(stream, "Custom-SigninLogDemo_CL");
    for record in signin_batch {
        assert_eq!(record["UserPrincipalName"], "admin@contoso.com");
    }

    let (stream, cef_batch) = &sink.batches[2];
    assert_eq!(stream, "Custom-CommonSecurityLogDemo_CL");
    assert_eq!(cef_batch.len(), 100);
    for record in cef_batch {
        assert_eq!(record["DeviceEventClassID"], "traffic:deny");
    }
}

#[tokio::test]
async fn brute_force_signins_are_mostly_failures_with_rare_success() {
    let config = load(ATTACK_CONFIG);
    let mut sink = MemorySink::default();
    engine::run(&config, &mut sink).await.unwrap();

    let (_, signin_batch) = &sink.batches[1];
    let failures = signin_batch
        .iter()
        .filter(|r| r["ResultType"] != "0")
        .count();
    let successes = signin_batch.len() - failures;
    assert!(
        failures as f64 / signin_batch.len() as f64 > 0.7,
        "expected a failure-dominated distribution, got {failures}/{}",
        signin_batch.len()
    );
    assert!(successes > 0, "a 5% success weight should show up in 400 draws");
}

#[tokio::test]
async fn seeded_runs_are_byte_identical() {
    let mut first = MemorySink::default();
    let mut second = MemorySink::default();
    engine::run(&load(ATTACK_CONFIG), &mut first).await.unwrap();
    engine::run(&load(ATTACK_CONFIG), &mut second).await.unwrap();

    let render = |sink: &MemorySink| serde_json::to_string(&sink.batches).unwrap();
    assert_eq!(render(&first), render(&second));
}

#[tokio::test]
async fn timestamps_stay_inside_the_window_and_sorted() {
    let config = load(ATTACK_CONFIG);
    let window = config.window().unwrap();
    let mut sink = MemorySink::default();
    engine::run(&config, &mut sink).await.unwrap();

    for (_, batch) in &sink.batches {
        let mut previous = None;
        for record in batch {
            let ts = chrono::DateTime::parse_from_rfc3339(
                record["TimeGenerated"].as_str().unwrap(),
            )
            .unwrap()
            .with_timezone(&chrono::Utc);
            assert!(window.contains(ts));
            if let Some(prev) = previous {
                assert!(prev <= ts);
            }
            previous = Some(ts);
        }
    }
}

#[tokio::test]
async fn unknown_log_type_aborts_before_any_delivery() {
    let config = load(
        r#"
generation:
  count: 10
  time_range:
    start: "2026-02-01T00:00:00Z"
    end: "2026-02-01T01:00:00Z"
scenarios:
  - name: fine
    log_type: syslog
  - name: broken
    log_type: windows_xml
"#,
    );
    let mut sink = MemorySink::default();
    let err = engine::run(&config, &mut sink).await.unwrap_err();
    assert!(matches!(err, logsynth::Error::Configuration(_)));
    assert!(sink.batches.is_empty());
    assert!(!sink.closed);
}
