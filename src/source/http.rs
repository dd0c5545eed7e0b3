//! Dashboard service source.

use async_trait::async_trait;
use pulsewatch_client::HealthApiClient;
use pulsewatch_types::DashboardSnapshot;

use super::{FetchError, FetchOptions, SnapshotSource};

/// Fetches snapshots from the dashboard service.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: HealthApiClient,
    description: String,
}

impl HttpSource {
    pub fn new(client: HealthApiClient) -> Self {
        let description = format!("api: {}", client.endpoint());
        Self {
            client,
            description,
        }
    }

    pub fn client(&self) -> &HealthApiClient {
        &self.client
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(
        &self,
        user_id: u64,
        options: FetchOptions,
    ) -> Result<DashboardSnapshot, FetchError> {
        Ok(self.client.fetch_dashboard(user_id, options).await?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn description_names_the_endpoint() {
        let client = HealthApiClient::builder().endpoint("http://health.local:5000").build().unwrap();
        let source = HttpSource::new(client);
        assert_eq!(source.description(), "api: http://health.local:5000");
    }

    #[tokio::test]
    async fn unreachable_service_surfaces_client_error() {
        let client = HealthApiClient::builder()
            .endpoint("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let source = HttpSource::new(client);

        let err = source.fetch(1, FetchOptions::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Client(ref e) if e.is_network()));
        assert_eq!(err.status(), None);
    }
}
