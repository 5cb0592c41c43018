//! Tests for configuration validation

use std::collections::HashMap;
use std::io::Write;

use resource_constraint::config::{BackupConfig, ConstraintConfig, SchedulerConfig, StoreBackendConfig};
use resource_constraint::util::{Strategy, UnitType};

fn constraint(capacity: u32) -> ConstraintConfig {
    ConstraintConfig {
        account_id: "acc".to_string(),
        capacity,
        strategy: Strategy::Fifo,
        unit_type: UnitType::Infra,
    }
}

fn config_with(constraint: ConstraintConfig) -> SchedulerConfig {
    let mut constraints = HashMap::new();
    constraints.insert("deploy-slots".to_string(), constraint);
    SchedulerConfig {
        constraints,
        store: StoreBackendConfig::InMemory,
        audit_buffer: 100,
        backup: BackupConfig::default(),
    }
}

#[test]
fn test_constraint_config_validation() {
    assert!(constraint(2).validate().is_ok());
    assert!(constraint(0).validate().is_err());

    let mut no_account = constraint(1);
    no_account.account_id = String::new();
    assert!(no_account.validate().is_err());
}

#[test]
fn test_scheduler_config_validation() {
    assert!(config_with(constraint(1)).validate().is_ok());
    let err = config_with(constraint(0)).validate().unwrap_err();
    assert!(err.contains("deploy-slots"));
}

#[test]
fn test_scheduler_config_empty_constraints() {
    let mut config = config_with(constraint(1));
    config.constraints.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_backup_interval_required_when_enabled() {
    let mut config = config_with(constraint(1));
    config.backup = BackupConfig {
        enabled: true,
        interval_secs: 0,
    };
    assert!(config.validate().is_err());
    config.backup.enabled = false;
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "constraints": {
            "deploy-slots": {
                "account_id": "acc",
                "capacity": 2,
                "strategy": "FIFO",
                "unit_type": "CUSTOM"
            }
        },
        "store": "postgres",
        "backup": { "enabled": true, "interval_secs": 30 }
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.store, StoreBackendConfig::Postgres);
    assert_eq!(config.audit_buffer, 1024);
    assert_eq!(config.backup.interval_secs, 30);
    assert_eq!(config.constraints["deploy-slots"].unit_type, UnitType::Custom);
}

#[test]
fn test_scheduler_config_defaults() {
    let json = r#"{ "constraints": { "slots": { "account_id": "acc", "capacity": 1 } } }"#;
    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.store, StoreBackendConfig::InMemory);
    assert!(config.backup.enabled);
    assert_eq!(config.constraints["slots"].strategy, Strategy::Fifo);
}

#[test]
fn test_scheduler_config_rejects_bad_json() {
    let err = SchedulerConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_scheduler_config_from_path() {
    let path = std::env::temp_dir().join(format!("rc-config-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, r#"{{ "constraints": {{ "slots": {{ "account_id": "acc", "capacity": 3 }} }} }}"#).unwrap();
    drop(file);

    let config = SchedulerConfig::from_path(&path).unwrap();
    assert_eq!(config.constraints["slots"].capacity, 3);
    std::fs::remove_file(&path).unwrap();

    let err = SchedulerConfig::from_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("reading scheduler config"));
}

#[test]
fn test_malformed_dotenv_is_reported() {
    let path = std::env::temp_dir().join(format!("rc-malformed-{}.env", std::process::id()));
    std::fs::write(&path, "RC_TEST_BROKEN=\"never closed\n").unwrap();

    let err = SchedulerConfig::from_env_file(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    let message = format!("{err:#}");
    assert!(message.contains("parsing dotenv file"), "{message}");
    assert!(!message.contains("RESOURCE_CONSTRAINT_CONFIG"), "{message}");
}
