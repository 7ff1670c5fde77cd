//! QR code generation for the check-in form link

use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;

use chrono::{DateTime, Local};
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    config::QrConfig,
    error::{AppError, AppResult},
};

/// Upper bound on `-N` suffixes tried for one timestamp
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// A stored QR image and where clients can fetch it
#[derive(Debug, Clone)]
pub struct QrCodeLink {
    pub filename: String,
    pub path: PathBuf,
    pub url: String,
}

#[derive(Clone)]
pub struct QrService {
    config: QrConfig,
}

impl QrService {
    pub fn new(config: QrConfig) -> Self {
        Self { config }
    }

    pub fn form_url(&self) -> &str {
        &self.config.form_url
    }

    /// Create the output directory if it does not exist yet
    pub async fn ensure_output_dir(&self) -> AppResult<()> {
        fs::create_dir_all(self.config.output_dir()).await?;
        Ok(())
    }

    /// Encode the configured form URL, store the PNG and return its link
    pub async fn generate(&self) -> AppResult<QrCodeLink> {
        self.generate_at(Local::now()).await
    }

    async fn generate_at(&self, now: DateTime<Local>) -> AppResult<QrCodeLink> {
        let png = render_png(&self.config.form_url)?;

        let stamp = now.format("%Y%m%d%H%M%S").to_string();
        let (filename, path, mut file) = self.create_unique_file(&stamp).await?;
        file.write_all(&png).await?;
        file.flush().await?;

        let url = format!(
            "{}/static/{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            self.config.sub_dir,
            filename
        );
        tracing::info!(path = %path.display(), "QR code generated");

        Ok(QrCodeLink { filename, path, url })
    }

    /// `{stamp}.png`, or `{stamp}-N.png` when an earlier call in the same
    /// second already took the name
    async fn create_unique_file(&self, stamp: &str) -> AppResult<(String, PathBuf, fs::File)> {
        let dir = self.config.output_dir();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let filename = if attempt == 0 {
                format!("{}.png", stamp)
            } else {
                format!("{}-{}.png", stamp, attempt)
            };
            let path = dir.join(&filename);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((filename, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(format!(
            "No free QR code filename for {}",
            stamp
        )))
    }
}

/// Render `contents` as a QR symbol in PNG format
pub fn render_png(contents: &str) -> AppResult<Vec<u8>> {
    let code = QrCode::new(contents.as_bytes()).map_err(|e| AppError::QrCode(e.to_string()))?;
    let image = code.render::<Luma<u8>>().build();

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AppError::QrCode(e.to_string()))?;
    Ok(bytes)
}
