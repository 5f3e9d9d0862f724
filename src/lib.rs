/*!
 # Version Launcher

 A Rust library and command-line tool for running several released versions
 of a web application side by side, so an integration test suite can talk to
 all of them at once.

 ## Overview

 Version Launcher provides functionality to:
 - Validate a JSON document listing servers (version, host, port, config file)
 - Install each version into its own directory and link its config file
 - Spawn each server in the background and wait until it accepts connections
 - Record the PIDs of started servers in a PID file
 - Later, in a separate run, confirm and kill whatever is still alive

 ## Basic Usage

 ```no_run
 use version_launcher::config::{Config, LauncherSettings, validate_config};
 use version_launcher::server::{ServerPool, ServerToolkit};
 use version_launcher::registry::PidRegistry;
 use version_launcher::Result;

 #[tokio::main]
 async fn main() -> Result<()> {
     let mut config = Config::from_file("servers.json")?;
     validate_config(&mut config, &std::env::current_dir().unwrap())?;

     let settings = LauncherSettings::new("/tmp/launch", "/tmp/launch/.router.php")
         .with_timeout_secs(5)?;
     let mut pool = ServerPool::from_config(&config, settings, ServerToolkit::default())?;

     let pids = pool.start_all().await?;
     PidRegistry::new("/tmp/version-launcher-pids").save(&pids)?;

     Ok(())
 }
 ```

 ## Features

 - **Fail fast**: servers start in declaration order; the first failure stops the launch
 - **No silent adoption**: a server whose port is already taken is never started
 - **Distinct errors**: every fatal condition has its own error variant and exit code
 - **Opt-in cleanup**: partial state is left for inspection unless cleanup is requested
 - **Safe teardown**: PIDs are checked against the live process table before anything is killed
*/

pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod install_root;
pub mod logging;
pub mod process;
pub mod registry;
pub mod router;
pub mod server;
pub mod teardown;

pub use config::{Config, LauncherSettings, ServerSpec};
pub use error::{Error, Result};
pub use registry::PidRegistry;
pub use server::{ServerId, ServerInstance, ServerPool, ServerStatus, ServerToolkit};
pub use teardown::{TeardownOutcome, TeardownResolver};
