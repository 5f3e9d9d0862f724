// Shared fakes for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use version_launcher::config::{LauncherSettings, ServerSpec};
use version_launcher::error::{Error, Result};
use version_launcher::process::{LaunchRequest, ProcessLauncher, ProcessTable, Prober, Provisioner};
use version_launcher::server::ServerToolkit;

#[derive(Default)]
struct HostState {
    listening: HashSet<u16>,
    silent_ports: HashSet<u16>,
    failing_versions: HashSet<String>,
    next_pid: u32,
    provisioned: Vec<(String, PathBuf)>,
    spawned: Vec<(u32, LaunchRequest)>,
    terminated: Vec<Vec<u32>>,
}

/// In-memory stand-in for the machine servers run on.
///
/// Spawning a server makes its port connectable (unless silenced) and
/// provisioning creates a real `public/` directory under the destination.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        let host = Self::default();
        host.state.lock().unwrap().next_pid = 1000;
        host
    }

    /// Something unrelated already listens on `port`.
    pub fn occupy(&self, port: u16) {
        self.state.lock().unwrap().listening.insert(port);
    }

    /// Servers spawned on `port` never accept connections.
    pub fn silence(&self, port: u16) {
        self.state.lock().unwrap().silent_ports.insert(port);
    }

    /// Provisioning `version` fails.
    pub fn fail_provisioning(&self, version: &str) {
        self.state.lock().unwrap().failing_versions.insert(version.to_string());
    }

    pub fn provisioned(&self) -> Vec<(String, PathBuf)> {
        self.state.lock().unwrap().provisioned.clone()
    }

    pub fn spawned(&self) -> Vec<(u32, LaunchRequest)> {
        self.state.lock().unwrap().spawned.clone()
    }

    pub fn terminated(&self) -> Vec<Vec<u32>> {
        self.state.lock().unwrap().terminated.clone()
    }

    pub fn toolkit(&self) -> ServerToolkit {
        ServerToolkit::new(self.clone(), self.clone(), self.clone(), self.clone())
    }
}

#[async_trait]
impl Prober for FakeHost {
    async fn is_connectable(&self, _host: &str, port: u16) -> bool {
        self.state.lock().unwrap().listening.contains(&port)
    }
}

#[async_trait]
impl Provisioner for FakeHost {
    async fn provision(&self, version: &str, destination: &Path) -> Result<()> {
        let failing = {
            let mut state = self.state.lock().unwrap();
            state.provisioned.push((version.to_string(), destination.to_path_buf()));
            state.failing_versions.contains(version)
        };
        if failing {
            return Err(Error::Provisioning(format!("no such version {}", version)));
        }

        std::fs::create_dir_all(destination.join("public"))
            .map_err(|e| Error::Provisioning(e.to_string()))
    }
}

#[async_trait]
impl ProcessLauncher for FakeHost {
    async fn spawn(&self, request: &LaunchRequest) -> Result<u32> {
        let mut state = self.state.lock().unwrap();
        let pid = state.next_pid;
        state.next_pid += 1;
        state.spawned.push((pid, request.clone()));
        if !state.silent_ports.contains(&request.port) {
            state.listening.insert(request.port);
        }
        Ok(pid)
    }
}

impl ProcessTable for FakeHost {
    fn command_line(&self, pid: u32) -> Option<String> {
        let state = self.state.lock().unwrap();
        let killed = state.terminated.iter().flatten().any(|&p| p == pid);
        state
            .spawned
            .iter()
            .find(|(spawned, _)| *spawned == pid && !killed)
            .map(|(_, request)| format!("php -S {}", request.bind_address()))
    }

    fn terminate(&self, pids: &[u32]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.terminated.push(pids.to_vec());
        let ports: Vec<u16> = state
            .spawned
            .iter()
            .filter(|(pid, _)| pids.contains(pid))
            .map(|(_, request)| request.port)
            .collect();
        for port in ports {
            state.listening.remove(&port);
        }
        Ok(())
    }
}

/// A temporary install root with a router and a config file in it.
pub struct Workspace {
    pub dir: TempDir,
    pub config_file: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("c.cfg");
        std::fs::write(&config_file, "<?php return [];").unwrap();
        std::fs::create_dir(dir.path().join("install")).unwrap();
        Self { dir, config_file }
    }

    pub fn install_root(&self) -> PathBuf {
        self.dir.path().join("install")
    }

    pub fn settings(&self) -> LauncherSettings {
        LauncherSettings::new(self.install_root(), self.dir.path().join("router.php"))
            .with_timeout_secs(1)
            .unwrap()
            .with_poll_interval(Duration::from_millis(5))
    }

    pub fn spec(&self, version: &str, port: u16) -> ServerSpec {
        ServerSpec {
            version: version.to_string(),
            host: "localhost".to_string(),
            port,
            config: self.config_file.clone(),
        }
    }
}
