//! The Uniswap v4 plugin: the action set the host registers.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::actions::{
    Action, ActionResult, AgentRuntime, CalculatePoolIdAction, CollectingCallback, Content,
    CreatePoolAction, GetPoolKeysAction, GetPoolLiquidityAction, GetPoolStateAction,
    GetPositionInfoAction, Memory,
};
use crate::error::ActionError;

pub const PLUGIN_NAME: &str = "plugin-uniswap";
pub const PLUGIN_DESCRIPTION: &str = "Read Uniswap v4 pool data and create new v4 pools";

pub struct Plugin {
    pub name: &'static str,
    pub description: &'static str,
    pub actions: Vec<Arc<dyn Action>>,
}

/// Name and description of an action, as listed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ActionSummary {
    pub name: &'static str,
    pub description: &'static str,
}

/// Outcome of running an action to completion with a collecting callback.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRun {
    pub success: bool,
    pub responses: Vec<Content>,
}

impl Plugin {
    pub fn uniswap() -> Self {
        Self {
            name: PLUGIN_NAME,
            description: PLUGIN_DESCRIPTION,
            actions: vec![
                Arc::new(GetPoolLiquidityAction),
                Arc::new(GetPoolStateAction),
                Arc::new(GetPoolKeysAction),
                Arc::new(GetPositionInfoAction),
                Arc::new(CalculatePoolIdAction),
                Arc::new(CreatePoolAction),
            ],
        }
    }

    /// Case-insensitive lookup by action name.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn Action>> {
        self.actions
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }

    pub fn summaries(&self) -> Vec<ActionSummary> {
        self.actions
            .iter()
            .map(|a| ActionSummary {
                name: a.name(),
                description: a.description(),
            })
            .collect()
    }

    /// Runs `action` against `text`, collecting every reply. `Ok(None)` when
    /// the action does not exist.
    pub async fn run(
        &self,
        name: &str,
        runtime: &AgentRuntime,
        text: &str,
    ) -> Result<Option<ActionRun>, ActionError> {
        let Some(action) = self.find(name) else {
            return Ok(None);
        };

        let message = Memory::new(text);
        if !action.validate(runtime, &message).await {
            return Ok(Some(ActionRun {
                success: false,
                responses: Vec::new(),
            }));
        }

        info!("Running action {}", action.name());
        let callback = CollectingCallback::new();
        let result: ActionResult = action
            .handler(runtime, &message, &callback)
            .await
            .map_err(|e| {
                error!("Action {} failed: {:?}", action.name(), e);
                e
            })?;

        Ok(Some(ActionRun {
            success: result.success,
            responses: callback.responses().await,
        }))
    }
}
