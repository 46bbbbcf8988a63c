// Ports for talking to the dashboard server
use crate::domain::error::AsideError;
use crate::domain::query::{Datasource, QueryDescriptor, ResultFormat};
use async_trait::async_trait;
use serde_json::Value;

/// Opens one authenticated dashboard session
#[async_trait]
pub trait DashboardConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn DashboardClient>, AsideError>;

    /// Host shown by the stub rendering
    fn host(&self) -> &str;
}

#[async_trait]
pub trait DashboardClient: Send + Sync {
    /// Pre-aggregated result of a saved chart
    async fn fetch_chart(&self, chart_id: u32, force: bool) -> Result<Value, AsideError>;

    /// Execute a batch of ad-hoc queries against one datasource
    async fn run_queries(
        &self,
        datasource: &Datasource,
        queries: &[QueryDescriptor],
        force: bool,
        result_format: ResultFormat,
    ) -> Result<Value, AsideError>;
}
