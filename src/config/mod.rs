//! Configuration module for the version launcher.
//!
//! This module handles parsing and validation of the configuration document
//! that lists the servers to launch, and holds the run-time settings shared
//! by every server in one launch.
//!
//! # Examples
//!
//! Loading and validating a configuration from a file:
//!
//! ```no_run
//! use version_launcher::config::{Config, validate_config};
//!
//! let mut config = Config::from_file("servers.json").unwrap();
//! let cwd = std::env::current_dir().unwrap();
//! validate_config(&mut config, &cwd).unwrap();
//! println!("Loaded configuration with {} servers", config.servers.len());
//! ```
//!
//! Creating a configuration programmatically:
//!
//! ```
//! use version_launcher::config::{Config, ServerSpec};
//!
//! let config = Config {
//!     servers: vec![ServerSpec {
//!         version: "1.0".to_string(),
//!         host: "localhost".to_string(),
//!         port: 9001,
//!         config: "/tmp/c.cfg".into(),
//!     }],
//! };
//! assert_eq!(config.servers[0].address(), "localhost:9001");
//! ```
mod parser;
pub mod settings;
pub mod validator;

pub use parser::{Config, ServerSpec};
pub use settings::LauncherSettings;
pub use validator::validate_config;
