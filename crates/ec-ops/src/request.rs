//! Inbound search requests.
//!
//! Field names follow the camelCase JSON callers send, so requests can be deserialized
//! straight from an API body.

use crate::{Error, Result};
use ec_core::CourtType;
use serde::{Deserialize, Serialize};

/// Case number search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseNumberQuery {
    /// Deployment to search; district courts when omitted.
    #[serde(default)]
    pub court_type: CourtType,
    /// Registration number within the case type and year.
    pub case_number: String,
    /// Upstream case type code.
    pub case_type: String,
    /// Registration year.
    pub year: String,
    /// Upstream state code.
    pub state_code: String,
    /// Upstream district code.
    pub district_code: String,
    /// Establishment codes to search; sent comma-joined.
    pub court_codes: Vec<String>,
}

impl CaseNumberQuery {
    /// Reject requests with a missing field.
    pub fn validate(&self) -> Result<()> {
        require("caseNumber", &self.case_number)?;
        require("caseType", &self.case_type)?;
        require("year", &self.year)?;
        require("stateCode", &self.state_code)?;
        require("districtCode", &self.district_code)?;
        if self.court_codes.iter().all(|code| code.trim().is_empty()) {
            return Err(Error::required("courtCodes"));
        }
        Ok(())
    }
}

/// Cause list lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseListQuery {
    /// Deployment to search; district courts when omitted.
    #[serde(default)]
    pub court_type: CourtType,
    /// Upstream state code.
    pub state_code: String,
    /// Upstream district code.
    pub district_code: String,
    /// Establishment code.
    pub court_code: String,
    /// Court room number.
    pub court_no: String,
    /// `YYYY-MM-DD` or `DD-MM-YYYY`.
    pub causelist_date: String,
    /// Civil/criminal flag, forwarded as `flag` when present.
    #[serde(default)]
    pub case_type: Option<String>,
}

impl CauseListQuery {
    /// Reject requests with a missing field.
    pub fn validate(&self) -> Result<()> {
        require("stateCode", &self.state_code)?;
        require("districtCode", &self.district_code)?;
        require("courtCode", &self.court_code)?;
        require("courtNo", &self.court_no)?;
        require("causelistDate", &self.causelist_date)
    }
}

pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::required(field))
    } else {
        Ok(())
    }
}
