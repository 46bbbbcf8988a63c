// Summary view builder - Dashboard counts rendered into the aside fragment
use crate::application::dashboard_client::DashboardConnector;
use crate::domain::error::{total_events, AsideError};
use crate::domain::fragment::Fragment;
use crate::domain::query::{Datasource, QueryDescriptor, ResultFormat};
use crate::infrastructure::config::AsideMode;
use askama::Template;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_RENDER_DEADLINE: Duration = Duration::from_secs(5);

/// Identifies the unit the aside is attached to
#[derive(Debug, Clone, Deserialize)]
pub struct BlockContext {
    pub course_id: String,
    pub block_type: String,
    pub block_id: String,
}

#[derive(Template)]
#[template(path = "summary.html")]
struct SummaryTemplate<'a> {
    course_id: &'a str,
    block_type: &'a str,
    block_id: &'a str,
    total_events: Option<i64>,
    superset_host: Option<&'a str>,
}

impl<'a> SummaryTemplate<'a> {
    fn for_block(ctx: &'a BlockContext) -> Self {
        Self {
            course_id: &ctx.course_id,
            block_type: &ctx.block_type,
            block_id: &ctx.block_id,
            total_events: None,
            superset_host: None,
        }
    }
}

#[derive(Clone)]
pub struct SummaryViewBuilder {
    connector: Arc<dyn DashboardConnector>,
    mode: AsideMode,
    chart_id: u32,
    datasource: Datasource,
    deadline: Duration,
}

impl SummaryViewBuilder {
    pub fn new(
        connector: Arc<dyn DashboardConnector>,
        mode: AsideMode,
        chart_id: u32,
        datasource: Datasource,
    ) -> Self {
        Self {
            connector,
            mode,
            chart_id,
            datasource,
            deadline: DEFAULT_RENDER_DEADLINE,
        }
    }

    /// Upper bound for all dashboard round trips of one render
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn should_apply_to_block(&self, _ctx: &BlockContext) -> bool {
        true
    }

    /// Fragment for the student view; dashboard failures degrade to a placeholder
    pub async fn student_view_aside(&self, ctx: &BlockContext) -> Fragment {
        match self.build_fragment(ctx).await {
            Ok(fragment) => fragment,
            Err(e) => {
                tracing::error!(
                    course_id = %ctx.course_id,
                    block_id = %ctx.block_id,
                    error = %e,
                    "dashboard summary unavailable"
                );
                Self::unavailable_fragment(ctx)
            }
        }
    }

    pub async fn build_fragment(&self, ctx: &BlockContext) -> Result<Fragment, AsideError> {
        let mut template = SummaryTemplate::for_block(ctx);
        match self.mode {
            AsideMode::Live => {
                let total = tokio::time::timeout(self.deadline, self.fetch_total_events())
                    .await
                    .map_err(|_| {
                        AsideError::Connection(format!(
                            "dashboard did not answer within {:?}",
                            self.deadline
                        ))
                    })??;
                template.total_events = Some(total);
            }
            AsideMode::Stub => template.superset_host = Some(self.connector.host()),
        }

        let mut fragment = Fragment::new("");
        fragment.add_content(&template.render()?);
        Ok(fragment)
    }

    async fn fetch_total_events(&self) -> Result<i64, AsideError> {
        let client = self.connector.connect().await?;

        let chart = client.fetch_chart(self.chart_id, true).await?;
        let total = total_events(&chart)?;

        let queries = [QueryDescriptor::video_events(), QueryDescriptor::event_count()];
        match client
            .run_queries(&self.datasource, &queries, false, ResultFormat::Json)
            .await
        {
            Ok(batch) => log_batch_rows(&batch),
            // rows are diagnostics only
            Err(e) => tracing::warn!(error = %e, "batch query failed"),
        }

        Ok(total)
    }

    fn unavailable_fragment(ctx: &BlockContext) -> Fragment {
        match SummaryTemplate::for_block(ctx).render() {
            Ok(html) => Fragment::new(html),
            Err(e) => {
                tracing::error!(error = %e, "failed to render placeholder summary");
                Fragment::default()
            }
        }
    }
}

/// Debug hook over every row of a batch response
pub fn log_batch_rows(response: &Value) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let Some(results) = response.get("result").and_then(Value::as_array) else {
        tracing::debug!("batch response carries no result list");
        return;
    };

    for (index, result) in results.iter().enumerate() {
        let rows = result.get("data").and_then(Value::as_array);
        for row in rows.into_iter().flatten() {
            tracing::debug!(query = index, %row, "batch query row");
        }
    }
}
