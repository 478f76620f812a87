//! One session per court type over a shared transport.

use crate::http::HttpTransport;
use crate::manager::SessionManager;
use crate::Result;
use ec_core::{ClientConfig, Clock, CourtType, SystemClock};
use std::sync::Arc;

/// Session managers for every [`CourtType`].
///
/// Sessions are independent: bootstrapping the district court session does not touch the
/// high court one.
#[derive(Debug, Clone)]
pub struct SessionPool {
    transport: Arc<HttpTransport>,
    district_court: SessionManager,
    high_court: SessionManager,
}

impl SessionPool {
    /// Pool over a fresh transport and the system clock.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(transport, Arc::new(SystemClock)))
    }

    /// Pool over an existing transport and clock.
    pub fn with_transport(transport: Arc<HttpTransport>, clock: Arc<dyn Clock>) -> Self {
        let manager =
            |court| SessionManager::new(court, Arc::clone(&transport), Arc::clone(&clock));
        Self {
            district_court: manager(CourtType::DistrictCourt),
            high_court: manager(CourtType::HighCourt),
            transport,
        }
    }

    /// Manager for `court`.
    pub fn get(&self, court: CourtType) -> &SessionManager {
        match court {
            CourtType::DistrictCourt => &self.district_court,
            CourtType::HighCourt => &self.high_court,
        }
    }

    /// Every manager, in [`CourtType::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &SessionManager> {
        CourtType::ALL.into_iter().map(|court| self.get(court))
    }

    /// Shared transport.
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::SessionPhase;

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let pool = SessionPool::new(ClientConfig::default()).unwrap();
        pool.get(CourtType::HighCourt).set_token("hc-token").await;

        let hc = pool.get(CourtType::HighCourt).snapshot().await;
        let dc = pool.get(CourtType::DistrictCourt).snapshot().await;
        assert_eq!(hc.token.as_deref(), Some("hc-token"));
        assert!(dc.token.is_none());

        let courts: Vec<_> = pool.iter().map(SessionManager::court).collect();
        assert_eq!(courts, CourtType::ALL);
        for manager in pool.iter() {
            assert_eq!(manager.phase().await, SessionPhase::Uninitialized);
        }
    }
}
