use klinika_payroll::Config;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;

const CONFIG_KEYS: [&str; 6] = [
    "DATABASE_URL",
    "JWT_SECRET",
    "JWT_EXPIRATION_DAYS",
    "HOST",
    "PORT",
    "ENVIRONMENT",
];

fn snapshot_env() -> Vec<(&'static str, Option<String>)> {
    CONFIG_KEYS
        .iter()
        .map(|key| (*key, env::var(key).ok()))
        .collect()
}

fn restore_env(snapshot: Vec<(&'static str, Option<String>)>) {
    for (key, value) in snapshot {
        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }
    }
}

#[test]
#[serial]
fn config_defaults_when_env_is_empty() {
    let snapshot = snapshot_env();
    for key in CONFIG_KEYS {
        unsafe {
            env::remove_var(key);
        }
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.database_url, "sqlite:klinika.db");
    assert_eq!(config.jwt_expiration_days, 30);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.environment, "development");
    assert!(config.is_development());
    assert!(!config.is_production());
    assert_eq!(config.server_address(), "127.0.0.1:8080");

    restore_env(snapshot);
}

#[test]
#[serial]
fn config_reads_custom_values() {
    let snapshot = snapshot_env();
    unsafe {
        env::set_var("DATABASE_URL", "sqlite:/tmp/klinika-test.db");
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("JWT_EXPIRATION_DAYS", "7");
        env::set_var("HOST", "0.0.0.0");
        env::set_var("PORT", "9090");
        env::set_var("ENVIRONMENT", "production");
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.database_url, "sqlite:/tmp/klinika-test.db");
    assert_eq!(config.jwt_secret, "test-secret");
    assert_eq!(config.jwt_expiration_days, 7);
    assert_eq!(config.server_address(), "0.0.0.0:9090");
    assert!(config.is_production());

    restore_env(snapshot);
}

#[test]
#[serial]
fn garbled_numeric_values_fall_back_to_defaults() {
    let snapshot = snapshot_env();
    unsafe {
        env::set_var("PORT", "not-a-port");
        env::set_var("JWT_EXPIRATION_DAYS", "soon");
    }

    let config = Config::from_env_only().unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.jwt_expiration_days, 30);

    restore_env(snapshot);
}
