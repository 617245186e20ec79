//! Document Configuration

use url::Url;

/// Document configuration options
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Base URL relative references resolve against when no `xml:base`
    /// applies
    pub base_url: Option<Url>,

    /// Initial value of the animation clock (seconds)
    pub start_time: f64,

    /// Rebuild every element as soon as the loader closes it
    pub rebuild_on_element_end: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            start_time: 0.0,
            rebuild_on_element_end: false,
        }
    }
}
