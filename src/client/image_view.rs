//! State of the per-row image: spinner until loaded, fallback icon on error.

use crate::web_api::routes::IMAGES_PATH;

pub const FALLBACK_IMAGE: &str = "no-image-icon.png";
pub const DEFAULT_WIDTH: u32 = 150;
pub const DEFAULT_HEIGHT: u32 = 110;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    requested: Option<String>,
    current: String,
    alt: String,
    loaded: bool,
    failed: bool,
    pub width: u32,
    pub height: u32,
}

impl ImageView {
    pub fn new(file_name: Option<&str>, alt: impl Into<String>) -> Self {
        let mut view = Self {
            requested: None,
            current: String::new(),
            alt: alt.into(),
            loaded: false,
            failed: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        };
        view.reset(file_name);
        view
    }

    /// Point the widget at another file. Same file is a no-op; a different
    /// one starts over with the spinner.
    pub fn set_source(&mut self, file_name: Option<&str>) {
        let file_name = normalize(file_name);
        if file_name.as_deref() != self.requested.as_deref() {
            self.reset(file_name.as_deref());
        }
    }

    fn reset(&mut self, file_name: Option<&str>) {
        self.requested = normalize(file_name);
        self.loaded = false;
        match &self.requested {
            Some(name) => {
                self.current = name.clone();
                self.failed = false;
            }
            // nothing stored: go straight to the fallback
            None => {
                self.current = FALLBACK_IMAGE.to_string();
                self.failed = true;
            }
        }
    }

    pub fn on_load(&mut self) {
        self.loaded = true;
    }

    pub fn on_error(&mut self) {
        if self.failed {
            return;
        }
        self.failed = true;
        self.loaded = false;
        self.current = FALLBACK_IMAGE.to_string();
    }

    pub fn src(&self) -> String {
        format!("{}/{}", IMAGES_PATH, self.current)
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn shows_spinner(&self) -> bool {
        !self.loaded
    }

    pub fn is_fallback(&self) -> bool {
        self.failed
    }
}

fn normalize(file_name: Option<&str>) -> Option<String> {
    file_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
