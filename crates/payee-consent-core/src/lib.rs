//! # payee-consent-core: Domain Types for Payee Consent Brokering
//!
//! The leaf crate of the workspace. Defines the records exchanged between
//! the banking application, the token service, and the privacy engine,
//! plus the pure functions the API layer composes:
//!
//! - [`consent_required_items`]: narrows an assessment down to the items
//!   that need an explicit user decision.
//! - [`build_consent_message`]: renders the English sentence shown on the
//!   consent prompt.
//! - [`consent_record_id`]: the synthetic id attached to each prompt record.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `payee-consent-*` crates.
//! - No I/O, no async.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Unknown JSON fields on engine records are preserved, never dropped.

pub mod consent;
pub mod error;
pub mod types;

pub use consent::{build_consent_message, consent_record_id, consent_required_items};
pub use error::ValidationError;
pub use types::{
    AccessItem, Assessment, AssessmentRecord, ConsentDecision, ConsentMetadata,
    ConsentMetadataRecord, DecisionStatus, ItemResult, DEFAULT_ACCESS_TYPE,
};
