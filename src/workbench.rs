//! High-level workbench facade
//!
//! Ties the backend client and the local store together for the execution
//! flow: invoke a hook, then append the outcome to the execution history so
//! the history screen survives a reload. Draft operations pass through to
//! the store.

use crate::client::CdsClient;
use crate::error::Result;
use crate::hooks::model::{CdsRequest, CdsResponse, HookDefinition};
use crate::store::{ExecutionOutcome, ExecutionRecord, WorkbenchStore};
use chrono::Utc;

/// Client plus store, with the invoke-and-record flow
#[derive(Debug, Clone)]
pub struct Workbench {
    client: CdsClient,
    store: WorkbenchStore,
}

impl Workbench {
    /// Create a workbench over a client and a store
    pub fn new(client: CdsClient, store: WorkbenchStore) -> Self {
        Self { client, store }
    }

    /// The backend client
    pub fn client(&self) -> &CdsClient {
        &self.client
    }

    /// The draft/history store
    pub fn store(&self) -> &WorkbenchStore {
        &self.store
    }

    /// Invoke a hook against the backend and record the outcome in the
    /// execution history. The history entry is written for failures too, so
    /// the history screen shows what was attempted.
    pub async fn run_hook(
        &self,
        hook: &HookDefinition,
        hook_instance: impl Into<String>,
        context: serde_json::Value,
    ) -> Result<CdsResponse> {
        let request = CdsRequest::for_hook(hook, hook_instance, context);
        match self.client.invoke(&hook.id, &request).await {
            Ok(response) => {
                self.store.record_execution(ExecutionRecord {
                    hook_id: hook.id.clone(),
                    executed_at: Utc::now(),
                    card_count: response.cards.len(),
                    outcome: ExecutionOutcome::Success,
                })?;
                Ok(response)
            }
            Err(error) => {
                self.store.record_execution(ExecutionRecord {
                    hook_id: hook.id.clone(),
                    executed_at: Utc::now(),
                    card_count: 0,
                    outcome: ExecutionOutcome::Failed {
                        message: error.to_string(),
                    },
                })?;
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::model::HookMetadata;

    fn sample_hook() -> HookDefinition {
        HookDefinition {
            id: "unreachable-hook".to_string(),
            title: "Unreachable".to_string(),
            description: None,
            hook: "patient-view".to_string(),
            conditions: Vec::new(),
            cards: Vec::new(),
            prefetch: indexmap::IndexMap::new(),
            metadata: HookMetadata::default(),
        }
    }

    #[tokio::test]
    async fn test_failed_invocation_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkbenchStore::open(dir.path()).unwrap();
        // nothing listens on this port; the invoke fails with a transport error
        let client = CdsClient::new("http://127.0.0.1:9", "http://127.0.0.1:9");
        let workbench = Workbench::new(client, store);

        let result = workbench
            .run_hook(&sample_hook(), "test-instance", serde_json::json!({}))
            .await;
        assert!(result.is_err());

        let history = workbench.store().history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].hook_id, "unreachable-hook");
        assert!(matches!(
            history[0].outcome,
            ExecutionOutcome::Failed { .. }
        ));
    }
}
