use crate::config::DeprecationPolicy;
use crate::reporter::Recorder;
use esfixture_client::{Client, RequestInfo, ResponseHead, ResponseObserver};
use reqwest::header::WARNING;
use std::sync::Arc;

/// Response observer that surfaces `Warning` headers.
///
/// Every header value is reported once, in the order the server sent them.
pub struct DeprecationMonitor {
    policy: DeprecationPolicy,
    recorder: Arc<dyn Recorder>,
}

impl DeprecationMonitor {
    pub fn new(policy: DeprecationPolicy, recorder: Arc<dyn Recorder>) -> Self {
        Self { policy, recorder }
    }

    pub fn policy(&self) -> DeprecationPolicy {
        self.policy
    }
}

impl ResponseObserver for DeprecationMonitor {
    fn observe(&self, request: &RequestInfo, response: &ResponseHead) {
        if self.policy == DeprecationPolicy::Off {
            return;
        }
        for warning in response.headers.get_all(WARNING) {
            let line = format!(
                "[{}] Deprecation warning: {}",
                request.url,
                String::from_utf8_lossy(warning.as_bytes())
            );
            match self.policy {
                DeprecationPolicy::FailOnWarning => self.recorder.error(&line),
                _ => self.recorder.log(&line),
            }
        }
    }
}

/// Installs a [`DeprecationMonitor`] on `client` unless `policy` is off.
pub fn install_deprecation_monitor(
    client: &mut Client,
    policy: DeprecationPolicy,
    recorder: Arc<dyn Recorder>,
) -> bool {
    if policy == DeprecationPolicy::Off {
        return false;
    }
    tracing::debug!("[SETUP] deprecation monitor installed (mode={})", policy);
    client.set_response_observer(Some(Arc::new(DeprecationMonitor::new(policy, recorder))));
    true
}
