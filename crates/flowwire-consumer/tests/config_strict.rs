#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use flowwire_consumer::config;
use flowwire_core::MessageKind;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
consumer:
  max_frame_bytez: 1024 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.consumer.allowed_kinds, MessageKind::ALL.to_vec());
    assert_eq!(cfg.consumer.max_frame_bytes, 16 * 1024 * 1024);
    assert!(!cfg.consumer.reject_unknown_flows);
    assert!(cfg.consumer.evict_completed);
}

#[test]
fn kinds_use_snake_case_names() {
    let ok = r#"
version: 1
consumer:
  allowed_kinds: [request, response_body, change_intercept_uri]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(
        cfg.consumer.allowed_kinds,
        vec![
            MessageKind::Request,
            MessageKind::ResponseBody,
            MessageKind::ChangeInterceptUri
        ]
    );

    let bad = "version: 1\nconsumer:\n  allowed_kinds: [websocket]\n";
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn wrong_version_is_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn limits_are_validated() {
    for bad in [
        "version: 1\nconsumer:\n  max_frame_bytes: 38\n",
        "version: 1\nconsumer:\n  max_frame_bytes: 1073741824\n",
        "version: 1\nconsumer:\n  allowed_kinds: []\n",
    ] {
        let err = config::load_from_str(bad).expect_err("must fail");
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "config={bad}");
    }
}
