//! Prompt → generated image → file under the public image directory.
//!
//! Soft failures (no credential configured, empty result list) come back as
//! `Ok(None)`. Everything else is an `ImageError`; deciding whether that
//! should fail the caller is left to the caller.

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{
    error::ImageError,
    generator::{FalGenerator, ImageGenerator},
};
use crate::settings::ImageServiceConfig;

/// What the Task API depends on: a title in, maybe a stored file name out.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn acquire(&self, title: &str) -> Result<Option<String>, ImageError>;
}

pub fn prompt_for(title: &str) -> String {
    format!("generate an image of {title}")
}

/// Last non-empty path segment of `url`, percent-decoded so it matches the
/// name `ServeDir` looks up for `/images/{name}`.
pub fn file_name_from_url(url: &str) -> Result<String, ImageError> {
    let invalid = || ImageError::FileName(url.to_string());
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(invalid)?;
    let name = percent_decode_str(segment).decode_utf8().map_err(|_| invalid())?;

    // must stay a single file name inside the image directory
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }
    Ok(name.into_owned())
}

pub struct ImageAcquirer {
    generator: Option<Box<dyn ImageGenerator>>,
    http: Client,
    image_dir: PathBuf,
}

impl ImageAcquirer {
    /// Production wiring: fal.ai generator when a credential is present,
    /// acquisition disabled otherwise.
    pub fn new(config: &ImageServiceConfig, image_dir: impl Into<PathBuf>) -> Result<Self, ImageError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        let generator = config.api_key.as_ref().map(|key| {
            Box::new(FalGenerator::new(http.clone(), config, key.clone())) as Box<dyn ImageGenerator>
        });
        Ok(Self {
            generator,
            http,
            image_dir: image_dir.into(),
        })
    }

    pub fn with_generator(
        generator: impl ImageGenerator + 'static,
        http: Client,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator: Some(Box::new(generator)),
            http,
            image_dir: image_dir.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Fetch `url` and store the body under the image directory, named after
    /// the URL's last path segment. An existing file of that name is replaced.
    pub async fn download(&self, url: &str) -> Result<String, ImageError> {
        let file_name = file_name_from_url(url)?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Download {
                url: url.to_string(),
                status,
            });
        }
        let bytes = response.bytes().await?;

        let path = self.image_dir.join(&file_name);
        write_replacing(&self.image_dir, &path, &bytes)
            .await
            .map_err(|source| ImageError::Write { path: path.clone(), source })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "image saved");
        Ok(file_name)
    }
}

#[async_trait]
impl ImageSource for ImageAcquirer {
    #[tracing::instrument(skip(self))]
    async fn acquire(&self, title: &str) -> Result<Option<String>, ImageError> {
        let Some(generator) = &self.generator else {
            tracing::debug!("image service not configured, skipping");
            return Ok(None);
        };

        let images = generator.generate(&prompt_for(title)).await?;
        let Some(first) = images.first() else {
            tracing::debug!("image service returned no images");
            return Ok(None);
        };

        self.download(&first.url).await.map(Some)
    }
}

// Write next to the target, then rename over it, so readers never see a
// half-written file.
async fn write_replacing(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let staging = dir.join(format!(".{}.part", Uuid::new_v4()));
    tokio::fs::write(&staging, bytes).await?;
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_acquisition::generator::GeneratedImage;

    #[test]
    fn prompt_wraps_the_title() {
        assert_eq!(prompt_for("a red bicycle"), "generate an image of a red bicycle");
    }

    #[test]
    fn file_name_is_last_path_segment() {
        assert_eq!(
            file_name_from_url("https://cdn.example.com/files/abc/cat.png").unwrap(),
            "cat.png"
        );
        assert_eq!(
            file_name_from_url("https://cdn.example.com/files/dog.jpeg?sig=1#frag").unwrap(),
            "dog.jpeg"
        );
        assert_eq!(
            file_name_from_url("https://cdn.example.com/files/owl.webp/").unwrap(),
            "owl.webp"
        );
        assert_eq!(
            file_name_from_url("https://cdn.example.com/files/my%20cat.png").unwrap(),
            "my cat.png"
        );
        assert_eq!(
            file_name_from_url("https://cdn.example.com/files/caf%C3%A9.png").unwrap(),
            "café.png"
        );
    }

    #[test]
    fn file_name_rejects_urls_without_a_usable_segment() {
        assert!(matches!(file_name_from_url("https://cdn.example.com/"), Err(ImageError::FileName(_))));
        assert!(matches!(file_name_from_url("not a url"), Err(ImageError::FileName(_))));
    }

    #[test]
    fn file_name_rejects_segments_that_decode_to_paths() {
        for url in [
            "https://cdn.example.com/files/..%2F..%2Fetc%2Fpasswd",
            "https://cdn.example.com/files/..%5Cwin.ini",
            "https://cdn.example.com/files/%2E%2E",
            "https://cdn.example.com/files/bad%00.png",
            "https://cdn.example.com/files/%FF.png",
        ] {
            assert!(matches!(file_name_from_url(url), Err(ImageError::FileName(_))), "{url}");
        }
    }

    struct FixedGenerator(Vec<&'static str>);

    #[async_trait]
    impl ImageGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<Vec<GeneratedImage>, ImageError> {
            Ok(self.0.iter().map(|url| GeneratedImage { url: url.to_string() }).collect())
        }
    }

    #[tokio::test]
    async fn empty_generation_result_means_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let acquirer = ImageAcquirer::with_generator(FixedGenerator(vec![]), Client::new(), dir.path());

        assert!(acquirer.is_enabled());
        assert_eq!(acquirer.acquire("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unusable_image_url_fails_before_any_download() {
        let dir = tempfile::tempdir().unwrap();
        let acquirer = ImageAcquirer::with_generator(
            FixedGenerator(vec!["https://cdn.example.invalid/"]),
            Client::new(),
            dir.path(),
        );

        let err = acquirer.acquire("anything").await.unwrap_err();
        assert!(matches!(err, ImageError::FileName(_)), "{err}");
    }

    #[tokio::test]
    async fn disabled_without_credential() {
        let dir = tempfile::tempdir().unwrap();
        let acquirer = ImageAcquirer::new(&ImageServiceConfig::default(), dir.path()).unwrap();

        assert!(!acquirer.is_enabled());
        assert_eq!(acquirer.acquire("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_replacing_overwrites_and_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");

        write_replacing(dir.path(), &path, b"old").await.unwrap();
        write_replacing(dir.path(), &path, b"new").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
