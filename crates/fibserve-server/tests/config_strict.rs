#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use fibserve_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8000"
  metrics_port: 8001 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "invalid_config");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8000");
    assert_eq!(cfg.server.metrics_listen, "0.0.0.0:8001");
    assert_eq!(cfg.log.filter, "info");
}

#[test]
fn ok_full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:9000"
  metrics_listen: "127.0.0.1:9001"
log:
  filter: "fibserve_server=debug,info"
  file: "app.log"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 9000);
    assert_eq!(cfg.server.metrics_addr().unwrap().port(), 9001);
    assert_eq!(cfg.log.file.as_deref(), Some("app.log"));
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(err.to_string().contains("version"), "{err}");
}

#[test]
fn rejects_bad_addresses() {
    let bad = r#"
version: 1
server:
  listen: "localhost"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("server.listen"), "{err}");

    let same = r#"
version: 1
server:
  listen: "0.0.0.0:8000"
  metrics_listen: "0.0.0.0:8000"
"#;
    let err = config::load_from_str(same).expect_err("must fail");
    assert!(err.to_string().contains("must differ"), "{err}");
}

#[test]
fn rejects_empty_log_filter() {
    let bad = r#"
version: 1
log:
  filter: "  "
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "invalid_config");
}

#[test]
fn shipped_config_logs_to_stdout_and_app_log() {
    let path = format!("{}/../../fibserve.yaml", env!("CARGO_MANIFEST_DIR"));
    let cfg = config::load_from_file(&path).expect("shipped config must load");
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 8000);
    assert_eq!(cfg.server.metrics_addr().unwrap().port(), 8001);
    assert_eq!(cfg.log.file.as_deref(), Some("app.log"));
}
