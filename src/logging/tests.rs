// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogFormat, LogLevel};

#[test]
fn test_log_level_range() {
    assert_eq!(LogLevel::new(4).unwrap(), LogLevel::DEBUG);
    assert!(LogLevel::new(6).is_ok());
    insta::assert_snapshot!(
        LogLevel::new(7).unwrap_err(),
        @"invalid value for 'log_level' in section '[global]': log level must be 0-6, got 7"
    );
}

#[test]
fn test_log_level_filters() {
    let filters: Vec<_> = (0..=6)
        .map(|level| LogLevel::new(level).unwrap().filter_directives())
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        "off",
        "error",
        "warn",
        "warn,mercator_rs=info,mercator=info",
        "warn,mercator_rs=debug,mercator=debug",
        "info,mercator_rs=trace,mercator=trace",
        "trace",
    ]
    "#);
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level, LogLevel::INFO);
    assert_eq!(config.file_level, LogLevel::TRACE);
    assert_eq!(config.file_format, LogFormat::Text);
    assert!(config.log_file.is_none());
}

#[test]
fn test_log_level_deserialize_rejects_out_of_range() {
    let parsed: Result<LogLevel, _> = serde_json::from_str("9");
    assert!(parsed.is_err());
    let parsed: LogLevel = serde_json::from_str("2").expect("valid level");
    assert_eq!(parsed, LogLevel::WARN);
}
