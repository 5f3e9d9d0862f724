use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::PathBuf;
use version_launcher::config::{Config, ServerSpec, validate_config};
use version_launcher::error::{Error, Result};

fn spec(version: &str, host: &str, port: u16, config: &str) -> ServerSpec {
    ServerSpec {
        version: version.to_string(),
        host: host.to_string(),
        port,
        config: PathBuf::from(config),
    }
}

#[test]
fn test_parse_config() -> Result<()> {
    let config_str = r#"{
        "servers": [
            {
                "version": "dev-develop",
                "host": "localhost",
                "port": 81,
                "config": "configs/config.php"
            },
            {
                "version": "0.3.2",
                "host": "localhost",
                "port": 82,
                "config": "configs/someSpecialConfig.php"
            }
        ]
    }"#;

    let config = Config::parse_from_str(config_str)?;

    assert_eq!(config.servers.len(), 2);
    assert_eq!(config.servers[0], spec("dev-develop", "localhost", 81, "configs/config.php"));
    assert_eq!(
        config.servers[1],
        spec("0.3.2", "localhost", 82, "configs/someSpecialConfig.php")
    );

    Ok(())
}

#[test]
fn test_shape_errors_are_config_parse_errors() {
    let documents = [
        r#"{}"#,
        r#"{"servers": {}}"#,
        r#"{"servers": [{"version": "1.0", "host": "localhost", "port": 81}]}"#,
        r#"{"servers": [{"version": "1.0", "host": "localhost", "port": "81", "config": "c"}]}"#,
        r#"{"servers": [{"version": "1.0", "host": "localhost", "port": 70000, "config": "c"}]}"#,
        r#"{"servers": [], "extra": true}"#,
        r#"not json"#,
    ];

    for document in documents {
        assert!(
            matches!(Config::parse_from_str(document), Err(Error::ConfigParse(_))),
            "accepted {}",
            document
        );
    }
}

#[test]
fn test_missing_config_document() {
    let dir = TempDir::new().unwrap();
    let err = Config::from_file(dir.path().join("servers.json")).unwrap_err();

    assert!(matches!(err, Error::ConfigParse(msg) if msg.contains("does not exist")));
}

#[test]
fn test_validate_resolves_config_paths() -> Result<()> {
    let dir = TempDir::new().unwrap();
    dir.child("configs/config.php").write_str("<?php return [];").unwrap();

    let mut config = Config {
        servers: vec![
            spec("1.0", "localhost", 9001, "configs/config.php"),
            spec("2.0", "localhost", 9002, "configs/../configs/config.php"),
        ],
    };

    validate_config(&mut config, dir.path())?;

    let expected = std::fs::canonicalize(dir.child("configs/config.php").path()).unwrap();
    assert!(config.servers.iter().all(|s| s.config == expected));
    assert!(config.servers[0].config.is_absolute());

    Ok(())
}

#[test]
fn test_validate_rejects_missing_config_file() {
    let dir = TempDir::new().unwrap();
    dir.child("present.php").touch().unwrap();

    let mut config = Config {
        servers: vec![
            spec("1.0", "localhost", 9001, "present.php"),
            spec("2.0", "localhost", 9002, "absent.php"),
        ],
    };

    let err = validate_config(&mut config, dir.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigValidation(msg) if msg.contains("absent.php")));
}

#[test]
fn test_validate_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    dir.child("c.php").touch().unwrap();

    let invalid = [
        vec![],
        vec![spec("", "localhost", 9001, "c.php")],
        vec![spec("1.0", " ", 9001, "c.php")],
        vec![spec("1.0", "localhost", 0, "c.php")],
        vec![
            spec("1.0", "localhost", 9001, "c.php"),
            spec("2.0", "LOCALHOST", 9001, "c.php"),
        ],
    ];

    for servers in invalid {
        let mut config = Config { servers };
        assert!(
            matches!(validate_config(&mut config, dir.path()), Err(Error::ConfigInvalid(_))),
            "accepted {:?}",
            config
        );
    }
}

#[test]
fn test_same_port_on_different_hosts_is_allowed() -> Result<()> {
    let dir = TempDir::new().unwrap();
    dir.child("c.php").touch().unwrap();

    let mut config = Config {
        servers: vec![
            spec("1.0", "127.0.0.1", 9001, "c.php"),
            spec("2.0", "127.0.0.2", 9001, "c.php"),
        ],
    };

    validate_config(&mut config, dir.path())
}

#[test]
fn test_versions_must_be_plain_directory_names() {
    let dir = TempDir::new().unwrap();
    dir.child("c.php").touch().unwrap();
    let outside = dir.path().join("outside");

    for version in [outside.to_str().unwrap(), "..", "../outside", "1.0/../..", "a/b", "."] {
        let mut config = Config {
            servers: vec![spec(version, "localhost", 9001, "c.php")],
        };
        assert!(
            matches!(validate_config(&mut config, dir.path()), Err(Error::ConfigInvalid(_))),
            "accepted version {:?}",
            version
        );
    }
}

#[test]
fn test_repeated_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    dir.child("c.php").touch().unwrap();
    dir.child("other.php").touch().unwrap();

    let mut config = Config {
        servers: vec![
            spec("1.0", "localhost", 9001, "c.php"),
            spec("1.0", "localhost", 9002, "other.php"),
        ],
    };

    let err = validate_config(&mut config, dir.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigInvalid(msg) if msg.contains("1.0")));
}
