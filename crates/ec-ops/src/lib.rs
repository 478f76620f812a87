//! Court, case and cause list lookups for the eCourts upstream.
//!
//! [`CourtsClient`] validates caller input, makes sure the court's session is valid and
//! performs one encrypted exchange per lookup. Payload shaping lives in [`payload`];
//! responses that need reshaping (case types, establishments) go through [`shape`].
//!
//! # Example
//!
//! ```no_run
//! use ec_ops::{ClientConfig, CourtType, CourtsClient};
//!
//! # async fn run() -> ec_ops::Result<()> {
//! let client = CourtsClient::new(ClientConfig::default())?;
//! let states = client.states(CourtType::DistrictCourt).await?;
//! let history = client
//!     .case_history(CourtType::DistrictCourt, "KLER010012342020")
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod payload;
pub mod request;
pub mod shape;

pub use client::{CourtHealth, CourtsClient, Health};
pub use error::{Error, Result};
pub use request::{CaseNumberQuery, CauseListQuery};
pub use shape::{CaseType, Establishment};

pub use ec_core::{ClientConfig, CourtType, SessionPhase};
pub use ec_transport::Decoded;
