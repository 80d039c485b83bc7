use crate::types::HealthRes;
use bloodwork_core::constants::SERVICE_NAME;

/// Simple health service for the HTTP API
///
/// This service provides a standardised way to report the liveness of the extraction
/// service. It holds no state and never calls the extraction collaborator.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` reporting the service as healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "healthy".into(),
            service: SERVICE_NAME.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_healthy_service() {
        let res = HealthService::check_health();
        let json = serde_json::to_value(res).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "healthy", "service": "blood-test-extraction" })
        );
    }
}
