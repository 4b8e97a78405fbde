use crate::api::{HealthStatus, ImageApi};

/// `pixeldock health`: probe the backend. Offline is reported, not raised.
pub async fn check_health<A: ImageApi>(api: &A) -> Option<HealthStatus> {
    match api.health().await {
        Ok(health) => Some(health),
        Err(e) => {
            log::warn!("Health check failed: {}", e);
            None
        }
    }
}
