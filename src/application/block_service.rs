// Superset block views - Student fragment and studio settings handler
use crate::application::settings_store::BlockSettingsStore;
use crate::domain::error::AsideError;
use crate::domain::fragment::Fragment;
use crate::infrastructure::i18n::StaticResources;
use askama::Template;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_DISPLAY_NAME: &str = "Superset";
const JS_INIT_FN: &str = "SupersetXBlock";
const BLOCK_CSS: &str = include_str!("../../static/css/superset_xblock.css");
const BLOCK_JS: &str = include_str!("../../static/js/src/superset_xblock.js");

#[derive(Template)]
#[template(path = "superset_xblock.html")]
struct BlockTemplate<'a> {
    display_name: &'a str,
    usage_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct StudioSubmit {
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HandlerAck {
    pub result: &'static str,
}

#[derive(Clone)]
pub struct BlockService {
    store: Arc<dyn BlockSettingsStore>,
    resources: StaticResources,
}

impl BlockService {
    pub fn new(store: Arc<dyn BlockSettingsStore>, resources: StaticResources) -> Self {
        Self { store, resources }
    }

    pub async fn display_name(&self, usage_id: &str) -> String {
        self.store
            .display_name(usage_id)
            .await
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
    }

    pub async fn student_view(
        &self,
        usage_id: &str,
        locale: Option<&str>,
    ) -> Result<Fragment, AsideError> {
        let display_name = self.display_name(usage_id).await;
        let html = BlockTemplate {
            display_name: &display_name,
            usage_id,
        }
        .render()?;

        let mut fragment = Fragment::new(html);
        fragment.add_css(BLOCK_CSS);

        if let Some(path) = self.resources.statici18n_js_url(locale) {
            fragment.add_javascript_url(self.resources.local_resource_url(&path));
        }

        fragment.add_javascript(BLOCK_JS);
        fragment.initialize_js(JS_INIT_FN);
        Ok(fragment)
    }

    pub async fn studio_submit(&self, usage_id: &str, data: StudioSubmit) -> HandlerAck {
        tracing::info!(usage_id, display_name = ?data.display_name, "studio settings saved");
        self.store.set_display_name(usage_id, data.display_name).await;
        HandlerAck { result: "success" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings_store::InMemorySettingsStore;
    use crate::domain::fragment::ResourceKind;
    use std::path::PathBuf;

    fn service() -> BlockService {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static");
        BlockService::new(
            Arc::new(InMemorySettingsStore::new()),
            StaticResources::new(root, "/static"),
        )
    }

    #[tokio::test]
    async fn test_studio_submit_stores_display_name() {
        let service = service();
        let ack = service
            .studio_submit(
                "block-1",
                StudioSubmit {
                    display_name: Some("Weekly Stats".to_string()),
                },
            )
            .await;

        assert_eq!(ack, HandlerAck { result: "success" });
        assert_eq!(service.display_name("block-1").await, "Weekly Stats");
        assert_eq!(service.display_name("block-2").await, DEFAULT_DISPLAY_NAME);
    }

    #[tokio::test]
    async fn test_studio_submit_without_name_resets_default() {
        let service = service();
        service
            .studio_submit("block-1", StudioSubmit { display_name: Some("Old".to_string()) })
            .await;
        service
            .studio_submit("block-1", StudioSubmit { display_name: None })
            .await;

        assert_eq!(service.display_name("block-1").await, DEFAULT_DISPLAY_NAME);
    }

    #[tokio::test]
    async fn test_student_view_assets() {
        let service = service();
        let fragment = service.student_view("block-1", Some("fr-CA")).await.unwrap();

        assert!(fragment.content.contains(DEFAULT_DISPLAY_NAME));
        assert_eq!(fragment.js_init_fn.as_deref(), Some("SupersetXBlock"));
        assert_eq!(fragment.resources.len(), 3);
        assert_eq!(fragment.resources[0].mimetype, "text/css");

        // only the English bundle ships
        let bundle = &fragment.resources[1];
        assert_eq!(bundle.kind, ResourceKind::Url);
        assert_eq!(bundle.data, "/static/public/js/translations/en/text.js");
    }

    #[tokio::test]
    async fn test_student_view_without_locale_skips_bundle() {
        let fragment = service().student_view("block-1", None).await.unwrap();
        assert!(fragment.resources.iter().all(|r| r.kind == ResourceKind::Text));
    }

    #[tokio::test]
    async fn test_display_name_is_escaped() {
        let service = service();
        service
            .studio_submit(
                "block-1",
                StudioSubmit {
                    display_name: Some("<b>Stats</b>".to_string()),
                },
            )
            .await;

        let fragment = service.student_view("block-1", None).await.unwrap();
        assert!(!fragment.content.contains("<b>"));
    }
}
