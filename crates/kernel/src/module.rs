use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Borrowed view of process-wide state handed to lifecycle hooks.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// One schema change owned by a module.
///
/// `id` is unique within its module and recorded in the migration ledger once
/// `up` has committed; `up` may hold several statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A feature slice of the service: routes, docs, schema and lifecycle hooks.
///
/// Bootstrap drives every registered module through
/// `init` → migrations → `start` → serve → `stop`.
#[async_trait]
pub trait Module: Send + Sync {
    /// Stable name; also the path segment routes are nested under.
    fn name(&self) -> &'static str;

    /// Runs before migrations. Must not touch tables the module owns.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Router nested at `{api_prefix}/{name}`; state is already attached.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` relative to the module root and `components.schemas`.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    /// Runs once the schema is current and before the listener opens.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs after the server has drained.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
