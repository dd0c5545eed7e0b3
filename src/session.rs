//! Account session around the dashboard client.
//!
//! Only a rejected login is fatal. When the service cannot be reached the
//! dashboard still starts and the first fetch falls back to sample data.

use pulsewatch_client::{ClientError, HealthApiClient};

/// A client plus whether it holds a signed-in session.
#[derive(Debug, Clone)]
pub struct Session {
    client: HealthApiClient,
    signed_in: bool,
}

impl Session {
    /// A session that never signed in.
    pub fn anonymous(client: HealthApiClient) -> Self {
        Self {
            client,
            signed_in: false,
        }
    }

    /// Sign in with `email` and `password`.
    ///
    /// Returns the error only when the service refused the credentials.
    /// Any other failure is logged and yields an anonymous session.
    pub async fn open(
        client: HealthApiClient,
        email: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        match client.login(email, password).await {
            Ok(user) => {
                tracing::info!(user_id = ?user.user_id, "session opened");
                Ok(Self {
                    client,
                    signed_in: true,
                })
            }
            Err(e @ ClientError::Rejected { .. }) => Err(e),
            Err(e) => {
                tracing::warn!(email, error = %e, "login failed, continuing offline");
                Ok(Self::anonymous(client))
            }
        }
    }

    pub fn client(&self) -> &HealthApiClient {
        &self.client
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    /// Log out if signed in. Failures are logged and otherwise ignored.
    pub async fn close(&mut self) {
        if !self.signed_in {
            return;
        }
        match self.client.logout().await {
            Ok(()) => tracing::info!("session closed"),
            Err(e) => tracing::warn!(error = %e, "logout failed"),
        }
        self.signed_in = false;
    }
}
