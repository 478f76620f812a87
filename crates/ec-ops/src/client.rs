//! Court lookups over per-court sessions.

use crate::payload::{
    self, CASE_HISTORY_ENDPOINT, CASE_NUMBER_SEARCH_ENDPOINT, CASE_TYPES_ENDPOINT,
    CAUSE_LIST_ENDPOINT, COURTS_ENDPOINT, DISTRICTS_ENDPOINT, STATES_ENDPOINT,
};
use crate::request::{require, CaseNumberQuery, CauseListQuery};
use crate::shape::{self, CaseType, Establishment};
use crate::Result;
use chrono::{DateTime, Utc};
use ec_core::{ClientConfig, CourtType, SessionPhase};
use ec_transport::{unix_time, Decoded, SessionPool, REGISTER_ENDPOINT};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Session health of one court type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourtHealth {
    /// Court type.
    pub court: CourtType,
    /// Current session phase.
    pub phase: SessionPhase,
    /// Whether a token is held.
    pub initialized: bool,
}

/// Health report across court types.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    /// When the report was taken.
    pub timestamp: DateTime<Utc>,
    /// One entry per court type.
    pub courts: Vec<CourtHealth>,
}

impl Health {
    /// Whether any court type holds a token.
    pub fn initialized(&self) -> bool {
        self.courts.iter().any(|court| court.initialized)
    }
}

/// eCourts client.
///
/// Every lookup makes sure the court's session is valid, then performs one authenticated
/// exchange. Input is validated before any network I/O.
#[derive(Debug, Clone)]
pub struct CourtsClient {
    pool: SessionPool,
}

impl CourtsClient {
    /// Client over fresh sessions.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_pool(SessionPool::new(config)?))
    }

    /// Client over an existing pool.
    pub fn with_pool(pool: SessionPool) -> Self {
        Self { pool }
    }

    /// Underlying sessions.
    pub fn pool(&self) -> &SessionPool {
        &self.pool
    }

    /// Register `device_uuid` with the upstream and return the token currently held.
    ///
    /// A blank `device_uuid` registers the configured device id. Registration is
    /// unauthenticated and does not mark the session fresh; the next lookup still bootstraps
    /// if needed.
    pub async fn initialize(&self, court: CourtType, device_uuid: &str) -> Result<Option<String>> {
        let session = self.pool.get(court);
        let config = session.transport().config();
        let uid = match device_uuid.trim() {
            "" => config.default_uid(),
            device => config.uid(device),
        };
        let register = json!({
            "version": config.client_version,
            "uid": uid,
        });
        info!(%court, "registering device");
        session
            .exchange(&session.endpoint(REGISTER_ENDPOINT), &register, false)
            .await?;
        Ok(session.snapshot().await.token)
    }

    /// Use a token obtained elsewhere.
    pub async fn set_token(&self, court: CourtType, token: &str) -> Result<()> {
        require("token", token)?;
        self.pool.get(court).set_token(token).await;
        Ok(())
    }

    /// Session health for every court type.
    pub async fn health(&self) -> Health {
        let mut courts = Vec::with_capacity(CourtType::ALL.len());
        for session in self.pool.iter() {
            courts.push(CourtHealth {
                court: session.court(),
                phase: session.phase().await,
                initialized: session.snapshot().await.token.is_some(),
            });
        }
        Health {
            timestamp: Utc::now(),
            courts,
        }
    }

    /// State list.
    pub async fn states(&self, court: CourtType) -> Result<Value> {
        let uid = self.uid();
        let body = self
            .lookup(court, STATES_ENDPOINT, &payload::states(&uid, &unix_time()))
            .await?;
        shape::take_field(body, "states")
    }

    /// Districts of a state.
    pub async fn districts(&self, court: CourtType, state_code: &str) -> Result<Value> {
        require("stateCode", state_code)?;
        let payload = payload::districts(state_code, &self.uid(), &unix_time());
        let body = self.lookup(court, DISTRICTS_ENDPOINT, &payload).await?;
        shape::take_field(body, "districts")
    }

    /// Court complexes of a district.
    pub async fn courts(
        &self,
        court: CourtType,
        state_code: &str,
        district_code: &str,
    ) -> Result<Value> {
        require("stateCode", state_code)?;
        require("districtCode", district_code)?;
        let payload = payload::courts(state_code, district_code);
        let body = self.lookup(court, COURTS_ENDPOINT, &payload).await?;
        shape::take_field(body, "courtComplex")
    }

    /// Establishments of one court complex. Empty when the upstream lists none.
    pub async fn establishments(
        &self,
        court: CourtType,
        state_code: &str,
        district_code: &str,
        complex_code: &str,
    ) -> Result<Vec<Establishment>> {
        require("complexCode", complex_code)?;
        match self.courts(court, state_code, district_code).await {
            Ok(complexes) => Ok(shape::establishments(&complexes, complex_code)),
            Err(crate::Error::MissingData { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Case types of an establishment.
    pub async fn case_types(
        &self,
        court: CourtType,
        state_code: &str,
        district_code: &str,
        court_code: &str,
    ) -> Result<Vec<CaseType>> {
        require("stateCode", state_code)?;
        require("districtCode", district_code)?;
        require("courtCode", court_code)?;
        let payload =
            payload::case_types(court, state_code, district_code, court_code, &self.uid());
        let body = self.lookup(court, CASE_TYPES_ENDPOINT, &payload).await?;
        let raw = shape::take_field(body, "case_types")?;
        Ok(shape::case_types(&raw))
    }

    /// Search by case type, number and year.
    pub async fn search_by_case_number(&self, query: &CaseNumberQuery) -> Result<Decoded> {
        query.validate()?;
        let payload = payload::case_number_search(query, &self.uid());
        self.lookup(query.court_type, CASE_NUMBER_SEARCH_ENDPOINT, &payload)
            .await
    }

    /// Search by CNR.
    pub async fn search_by_cnr(&self, court: CourtType, cnr: &str) -> Result<Decoded> {
        require("cnr", cnr)?;
        let (endpoint, payload) = payload::cnr_search(court, cnr, &self.uid());
        self.lookup(court, endpoint, &payload).await
    }

    /// Full history of a case.
    pub async fn case_history(&self, court: CourtType, cnr: &str) -> Result<Decoded> {
        require("cnr", cnr)?;
        let payload = payload::case_history(court, cnr, &self.uid());
        self.lookup(court, CASE_HISTORY_ENDPOINT, &payload).await
    }

    /// Cause list for a court room and date.
    pub async fn cause_list(&self, query: &CauseListQuery) -> Result<Decoded> {
        query.validate()?;
        let today = Utc::now().date_naive();
        let payload = payload::cause_list(query, today, &self.uid());
        self.lookup(query.court_type, CAUSE_LIST_ENDPOINT, &payload)
            .await
    }

    fn uid(&self) -> String {
        self.pool.transport().config().default_uid()
    }

    async fn lookup(&self, court: CourtType, endpoint: &str, payload: &Value) -> Result<Decoded> {
        let session = self.pool.get(court);
        session.ensure_valid().await?;
        debug!(%court, endpoint, "lookup");
        Ok(session
            .exchange(&session.endpoint(endpoint), payload, true)
            .await?)
    }
}
