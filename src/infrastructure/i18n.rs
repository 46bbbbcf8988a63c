// Localized JS bundle lookup and static resource URLs
use std::path::PathBuf;

const FALLBACK_LOCALE: &str = "en";

fn translation_path(code: &str) -> String {
    format!("public/js/translations/{code}/text.js")
}

/// First existing bundle for `fr-CA`, then `fr`, then `en`
pub fn resolve_statici18n_js_url(
    locale: Option<&str>,
    exists: impl Fn(&str) -> bool,
) -> Option<String> {
    let locale = locale?.trim();
    let well_formed = locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if locale.is_empty() || !well_formed {
        return None;
    }
    let lang_code = locale.split('-').next().unwrap_or(locale);

    [locale, lang_code, FALLBACK_LOCALE]
        .into_iter()
        .map(translation_path)
        .find(|path| exists(path))
}

/// Packaged resources served from disk under `/static`
#[derive(Debug, Clone)]
pub struct StaticResources {
    root: PathBuf,
    public_url: String,
}

impl StaticResources {
    pub fn new(root: PathBuf, public_url: &str) -> Self {
        Self {
            root,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }

    pub fn local_resource_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_url, path.trim_start_matches('/'))
    }

    pub fn statici18n_js_url(&self, locale: Option<&str>) -> Option<String> {
        resolve_statici18n_js_url(locale, |path| self.exists(path))
    }
}
