use std::{path::PathBuf, sync::Arc};
use crate::{data_access::data_context::DataContext, image_acquisition::acquirer::ImageSource, settings::IMAGE_SUBDIR};

pub struct AppState {
    pub data_context: DataContext,
    pub image_source: Arc<dyn ImageSource>,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(data_context: DataContext, image_source: Arc<dyn ImageSource>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_context,
            image_source,
            public_dir: public_dir.into(),
        }
    }

    pub fn image_dir(&self) -> PathBuf {
        self.public_dir.join(IMAGE_SUBDIR)
    }
}

pub type SharedState = Arc<AppState>;
