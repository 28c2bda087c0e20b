//! CDS Hooks workbench core
//!
//! Non-visual logic for a clinical decision support workbench: a
//! natural-language to FHIR search-query interpreter, a CQL structural
//! scanner, the CDS hook configuration model with its frontend/backend
//! transformer and validation, a REST client for the backend service API,
//! and draft/history persistence.

pub mod client;
pub mod cql;
pub mod diagnostics;
pub mod error;
pub mod fhir;
pub mod hooks;
pub mod nlq;
pub mod store;
pub mod workbench;

// Re-export main types
pub use client::{ApiError, CdsClient};
pub use cql::{CqlReport, scan_cql};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Result, WorkbenchError};
pub use fhir::{ResourceType, SearchOperator, SearchParam, SearchQuery};
pub use hooks::model::{Card, CdsRequest, CdsResponse, HookDefinition, ServiceConfig};
pub use hooks::transform::{from_service_config, to_service_config};
pub use hooks::validate::validate_hook;
pub use nlq::{InterpretedQuery, QueryInterpreter};
pub use store::WorkbenchStore;
pub use workbench::Workbench;
