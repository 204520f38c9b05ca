// SPDX-License-Identifier: MPL-2.0

//! Background update checks.
//!
//! A check runs as a task on the tokio runtime and hands its outcome back
//! through an unbounded channel that the UI loop drains on each tick. The
//! service owns an "alive" flag; once it is dropped, finished checks discard
//! their result instead of delivering it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::checker::{UpdateChecker, UpdateError, release_page_url};
use super::version::ReleaseVersion;

/// What started a check. Startup checks stay silent unless an update exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckTrigger {
    Startup,
    User,
}

#[derive(Debug)]
pub struct UpdateReport {
    pub trigger: CheckTrigger,
    pub current: ReleaseVersion,
    pub result: Result<Option<ReleaseVersion>, UpdateError>,
}

pub struct UpdateService {
    runtime: Handle,
    checker: UpdateChecker,
    current: ReleaseVersion,
    sender: mpsc::UnboundedSender<UpdateReport>,
    receiver: mpsc::UnboundedReceiver<UpdateReport>,
    alive: Arc<AtomicBool>,
}

impl UpdateService {
    pub fn new(runtime: Handle, checker: UpdateChecker, current: ReleaseVersion) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            runtime,
            checker,
            current,
            sender,
            receiver,
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Browser page for downloading the latest release.
    pub fn release_page(&self) -> String {
        release_page_url(self.checker.repo())
    }

    /// Start a check in the background.
    ///
    /// The returned handle resolves to whether the report was delivered.
    /// Overlapping checks are allowed; each delivers its own report.
    pub fn spawn_check(&self, trigger: CheckTrigger) -> JoinHandle<bool> {
        let checker = self.checker.clone();
        let sender = self.sender.clone();
        let alive = Arc::clone(&self.alive);
        let current = self.current;

        log::info!("Checking for updates ({:?})", trigger);

        self.runtime.spawn(async move {
            let result = checker.check_for_update(current).await;

            if !alive.load(Ordering::Acquire) {
                log::debug!("Update check finished after shutdown, dropping result");
                return false;
            }

            sender
                .send(UpdateReport {
                    trigger,
                    current,
                    result,
                })
                .is_ok()
        })
    }

    /// Collect every report that arrived since the last call.
    pub fn poll(&mut self) -> Vec<UpdateReport> {
        let mut reports = Vec::new();
        while let Ok(report) = self.receiver.try_recv() {
            reports.push(report);
        }
        reports
    }
}

impl Drop for UpdateService {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tokio::runtime::Runtime;

    const CURRENT: ReleaseVersion = ReleaseVersion::new(1, 0, 0);

    fn service(runtime: &Runtime, api_base: &str, timeout: Duration) -> UpdateService {
        let checker = UpdateChecker::with_endpoint(api_base, "owner/repo", timeout).unwrap();
        UpdateService::new(runtime.handle().clone(), checker, CURRENT)
    }

    fn wait_for_report(service: &mut UpdateService) -> UpdateReport {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(report) = service.poll().pop() {
                return report;
            }
            assert!(Instant::now() < deadline, "no update report arrived");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn report_arrives_on_poll() {
        let runtime = Runtime::new().unwrap();
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/repos/owner/repo/releases/latest")
            .with_status(200)
            .with_body(r#"{"tag_name": "v1.1.0"}"#)
            .create();

        let mut service = service(&runtime, &server.url(), Duration::from_secs(2));
        service.spawn_check(CheckTrigger::User);

        let report = wait_for_report(&mut service);
        assert_eq!(report.trigger, CheckTrigger::User);
        assert_eq!(report.current, CURRENT);
        assert_eq!(report.result.unwrap(), Some(ReleaseVersion::new(1, 1, 0)));
    }

    #[test]
    fn failure_is_reported_with_trigger() {
        let runtime = Runtime::new().unwrap();
        let mut service = service(&runtime, "http://127.0.0.1:9", Duration::from_secs(2));
        service.spawn_check(CheckTrigger::Startup);

        let report = wait_for_report(&mut service);
        assert_eq!(report.trigger, CheckTrigger::Startup);
        assert!(matches!(report.result, Err(UpdateError::Network(_))));
    }

    #[test]
    fn poll_without_checks_is_empty() {
        let runtime = Runtime::new().unwrap();
        let mut service = service(&runtime, "http://127.0.0.1:9", Duration::from_secs(1));
        assert!(service.poll().is_empty());
        assert_eq!(
            service.release_page(),
            "https://github.com/owner/repo/releases/latest"
        );
    }

    #[test]
    fn result_is_dropped_after_teardown() {
        let runtime = Runtime::new().unwrap();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        let service = service(
            &runtime,
            &format!("http://{}", address),
            Duration::from_millis(300),
        );
        let handle = service.spawn_check(CheckTrigger::User);
        drop(service);

        let delivered = runtime.block_on(handle).unwrap();
        assert!(!delivered);
        drop(listener);
    }
}
