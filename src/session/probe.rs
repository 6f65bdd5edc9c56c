//! On-demand probe for the LSLib toolchain.

use crate::domain::{StatusChannel, StatusLine};
use crate::gateway::CommandGateway;

/// Checks whether the archive toolchain is present and usable
///
/// Stores the backend's raw result on success or the formatted failure
/// string otherwise; no retries, no caching beyond the last check.
pub struct LslibProbe {
    gateway: CommandGateway,
    status: StatusChannel,
    available: Option<bool>,
}

impl LslibProbe {
    pub(crate) fn new(gateway: CommandGateway, status: StatusChannel) -> Self {
        Self {
            gateway,
            status,
            available: None,
        }
    }

    /// Outcome of the last check, if one ran
    pub fn available(&self) -> Option<bool> {
        self.available
    }

    pub fn status(&self) -> Option<StatusLine> {
        self.status.current()
    }

    /// Ask the backend whether the toolchain is usable
    pub async fn check(&mut self) {
        match self.gateway.check_lslib_status().await {
            Ok(result) => {
                self.available = Some(true);
                self.status.set_success(result);
            }
            Err(err) => {
                self.available = Some(false);
                self.status.set_error(err.to_string());
            }
        }
    }
}
