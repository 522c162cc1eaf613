#![allow(dead_code)]

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tempfile::TempDir;
use todo_server::{
    app_state::AppState, build_router, data_access::data_context::DataContext,
    image_acquisition::error::ImageError, ImageSource,
};

/// A running server plus the temp directory holding its database and
/// public files. Dropping it removes the directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn image_dir(&self) -> PathBuf {
        image_dir_of(self.dir.path())
    }
}

/// Temp directory laid out like a deployment: `public/images` inside.
pub fn temp_root() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(image_dir_of(dir.path())).expect("create image dir");
    dir
}

pub fn image_dir_of(root: &Path) -> PathBuf {
    root.join("public").join("images")
}

pub async fn spawn_app(image_source: impl ImageSource + 'static) -> TestApp {
    spawn_app_in(temp_root(), image_source).await
}

pub async fn spawn_app_in(dir: TempDir, image_source: impl ImageSource + 'static) -> TestApp {
    let data_context = DataContext::new(dir.path().join("todos.redb")).expect("open database");
    let public_dir = dir.path().join("public");
    let state = Arc::new(AppState::new(data_context, Arc::new(image_source), public_dir));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });

    TestApp { addr, dir }
}

/// Image source stand-ins for the three outcomes the API has to handle.
pub enum StubImages {
    Nothing,
    Named(&'static str),
    Broken,
}

#[async_trait]
impl ImageSource for StubImages {
    async fn acquire(&self, _title: &str) -> Result<Option<String>, ImageError> {
        match self {
            StubImages::Nothing => Ok(None),
            StubImages::Named(name) => Ok(Some(name.to_string())),
            StubImages::Broken => Err(ImageError::FileName("https://images.invalid/".into())),
        }
    }
}
