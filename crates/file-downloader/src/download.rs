use anyhow::bail;
use std::path::{Path, PathBuf};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::{debug, info};

pub const HUGGINGFACE_HUB_URL: &str = "https://huggingface.co";

pub struct FileDownloadConfig {
    pub url: String,
    pub resources_dir: PathBuf,
}

pub struct FileDownload {
    url: String,
    resources_dir: PathBuf,
}

impl Default for FileDownloadConfig {
    fn default() -> Self {
        Self {
            url: HUGGINGFACE_HUB_URL.to_string(),
            resources_dir: PathBuf::from("resources"),
        }
    }
}

impl FileDownloadConfig {
    /// `$LOCAL_DATA_DIR/resources` when the variable is set, `resources` otherwise.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("LOCAL_DATA_DIR") {
            config.resources_dir = Path::new(&dir).join("resources");
        }
        config
    }
}

impl FileDownload {
    pub fn new(config: FileDownloadConfig) -> Self {
        Self {
            url: config.url.trim_end_matches('/').to_string(),
            resources_dir: config.resources_dir,
        }
    }

    pub async fn download_to_path_if_not_exists(
        &self,
        uri: &str,
        file_path: impl AsRef<Path>,
    ) -> anyhow::Result<PathBuf> {
        let file_path = file_path.as_ref().to_path_buf();
        debug!("check file path: {:?}", file_path);
        if file_path.exists() {
            return Ok(file_path);
        }

        let temp_download_path = file_path.with_extension("temp");
        let download_url = format!("{}/{}", self.url, uri.trim_start_matches('/'));
        info!("downloading {}", download_url);

        let mut response = reqwest::get(&download_url).await?;
        if !response.status().is_success() {
            bail!(
                "failed to download {}: status {}",
                download_url,
                response.status()
            );
        }

        // create parent folder
        if let Some(parent_dir) = file_path.parent() {
            fs::create_dir_all(parent_dir).await?;
        }

        let mut file = File::create(&temp_download_path).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        fs::rename(&temp_download_path, &file_path).await?;

        info!("file {:?} downloaded", file_path);

        Ok(file_path)
    }

    pub async fn download_if_not_exists(&self, uri: &str) -> anyhow::Result<PathBuf> {
        let file_path = self.resources_dir.join(uri);
        self.download_to_path_if_not_exists(uri, file_path).await
    }
}
