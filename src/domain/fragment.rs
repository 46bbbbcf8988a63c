// Fragment domain model - HTML plus the assets the host page must load
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Text,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Head,
    Foot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentResource {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub data: String,
    pub mimetype: String,
    pub placement: Placement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub content: String,
    pub resources: Vec<FragmentResource>,
    pub js_init_fn: Option<String>,
    pub js_init_version: Option<u32>,
    pub json_init_args: Option<serde_json::Value>,
}

impl Fragment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn add_content(&mut self, content: &str) {
        self.content.push_str(content);
    }

    pub fn add_css(&mut self, css: impl Into<String>) {
        self.push_resource(ResourceKind::Text, css, "text/css", Placement::Head);
    }

    pub fn add_javascript(&mut self, js: impl Into<String>) {
        self.push_resource(ResourceKind::Text, js, "application/javascript", Placement::Foot);
    }

    pub fn add_javascript_url(&mut self, url: impl Into<String>) {
        self.push_resource(ResourceKind::Url, url, "application/javascript", Placement::Foot);
    }

    /// Name the JS function the host runtime calls once the fragment is in the page
    pub fn initialize_js(&mut self, js_init_fn: &str) {
        self.js_init_fn = Some(js_init_fn.to_string());
        self.js_init_version = Some(1);
    }

    fn push_resource(
        &mut self,
        kind: ResourceKind,
        data: impl Into<String>,
        mimetype: &str,
        placement: Placement,
    ) {
        self.resources.push(FragmentResource {
            kind,
            data: data.into(),
            mimetype: mimetype.to_string(),
            placement,
        });
    }
}
