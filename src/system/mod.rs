//! System utilities and monitoring
//!
//! This module contains metrics collection and health reporting.

pub mod metrics;

pub use metrics::{Metrics, Operation};

pub mod health {
    //! Health checks and system diagnostics
    use serde::Serialize;
    use std::time::Duration;

    /// Service health status levels
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ServiceStatus {
        /// Store reachable, service fully functional
        Healthy,
        /// Service running but the store did not answer
        Degraded,
    }

    /// Format an uptime like `1h 23m 45s`
    pub fn format_uptime(uptime: Duration) -> String {
        let secs = uptime.as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_uptime() {
            assert_eq!(format_uptime(Duration::from_secs(5)), "5s");
            assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
            assert_eq!(format_uptime(Duration::from_secs(5025)), "1h 23m 45s");
        }
    }
}
