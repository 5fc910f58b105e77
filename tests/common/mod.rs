//! Shared utilities for host integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use servicehost::{Descriptor, HostConfig, ServiceCatalog, ServiceHost, ServiceType};

pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

/// Service type that records every lifecycle call it receives.
pub struct Recorder {
    log: CallLog,
    fail_setup: bool,
}

impl Recorder {
    fn setup(&mut self) -> Result<(), String> {
        self.log.lock().unwrap().push("setup");
        if self.fail_setup {
            return Err("setup refused".into());
        }
        Ok(())
    }

    /// Fails when asked to with `input=boom`.
    fn handle(&mut self, input: String) -> Result<String, String> {
        self.log.lock().unwrap().push("handle");
        if input == "boom" {
            return Err("boom requested".into());
        }
        Ok(input)
    }

    fn ping(&mut self) {
        self.log.lock().unwrap().push("ping");
    }

    fn teardown(&mut self) {
        self.log.lock().unwrap().push("teardown");
    }
}

pub fn recorder(log: CallLog, fail_setup: bool) -> ServiceType<Recorder> {
    ServiceType::new("recorder", move || Recorder {
        log: log.clone(),
        fail_setup,
    })
    .method("Setup", Recorder::setup)
    .method("Handle", Recorder::handle)
    .method("Ping", Recorder::ping)
    .method("Teardown", Recorder::teardown)
}

pub fn calls(log: &CallLog) -> Vec<&'static str> {
    log.lock().unwrap().clone()
}

/// Start a host on an ephemeral port. Returns the host and its base URL.
pub async fn start_host(catalog: ServiceCatalog, descriptors: Vec<Descriptor>) -> (ServiceHost, String) {
    start_host_with(catalog, HostConfig::default(), "", descriptors).await
}

/// Like [`start_host`], with a config and a base path prefix.
pub async fn start_host_with(
    catalog: ServiceCatalog,
    config: HostConfig,
    prefix: &str,
    descriptors: Vec<Descriptor>,
) -> (ServiceHost, String) {
    let mut host = ServiceHost::new(catalog, config);
    let addr = host
        .start(&format!("http://127.0.0.1:0{prefix}"), descriptors)
        .await
        .expect("host should start");
    (host, format!("http://{addr}{prefix}"))
}

/// Client without connection pooling, so stopping a host never waits on an
/// idle keep-alive connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
