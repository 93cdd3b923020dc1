//! ロゴ画像の取得
//!
//! リモートURLから1度だけダウンロードしてローカルにキャッシュする。
//! 取得・保存・デコードの失敗はすべて「ロゴなし」として扱う。

use crate::error::{KitReportError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// ロゴのバイト列を提供する
pub trait LogoProvider {
    /// 取得できなければ None
    fn logo_bytes(&self) -> Option<Vec<u8>>;
}

/// メモリ上のロゴ
#[derive(Debug, Clone)]
pub struct StaticLogo(pub Vec<u8>);

impl LogoProvider for StaticLogo {
    fn logo_bytes(&self) -> Option<Vec<u8>> {
        Some(self.0.clone())
    }
}

/// URL + ローカルキャッシュ
#[derive(Debug, Clone)]
pub struct CachedRemoteLogo {
    pub url: String,
    pub cache_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl CachedRemoteLogo {
    pub fn new(url: impl Into<String>, cache_path: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            cache_path,
            timeout,
        }
    }

    /// 画像としてデコードできるキャッシュだけ使う
    fn read_cache(path: &Path) -> Option<Vec<u8>> {
        let bytes = std::fs::read(path).ok()?;
        match decode_logo(&bytes) {
            Ok(_) => Some(bytes),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cache do logo inválido, baixando de novo");
                None
            }
        }
    }

    fn write_cache(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn download(&self) -> Result<Vec<u8>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| KitReportError::LogoFetch(e.to_string()))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| KitReportError::LogoFetch(format!("{}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KitReportError::LogoFetch(format!("{}: HTTP {}", self.url, status)));
        }

        let bytes = response
            .bytes()
            .map_err(|e| KitReportError::LogoFetch(format!("{}: {}", self.url, e)))?;
        Ok(bytes.to_vec())
    }
}

impl LogoProvider for CachedRemoteLogo {
    fn logo_bytes(&self) -> Option<Vec<u8>> {
        if let Some(path) = &self.cache_path {
            if let Some(bytes) = Self::read_cache(path) {
                tracing::debug!(path = %path.display(), "logo em cache");
                return Some(bytes);
            }
        }

        let bytes = match self.download() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "logo indisponível, relatório sem logo");
                return None;
            }
        };
        tracing::info!(url = %self.url, bytes = bytes.len(), "logo baixado");

        match (&self.cache_path, decode_logo(&bytes)) {
            (Some(path), Ok(_)) => {
                if let Err(e) = Self::write_cache(path, &bytes) {
                    tracing::warn!(path = %path.display(), error = %e, "falha ao gravar cache do logo");
                }
            }
            // 画像でない応答はキャッシュしない
            (Some(path), Err(e)) => {
                tracing::debug!(path = %path.display(), error = %e, "logo baixado não é imagem, cache não gravado");
            }
            (None, _) => {}
        }

        Some(bytes)
    }
}

/// デコード済みロゴ（RGB8、白背景に合成済み）
#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    pub width_px: u32,
    pub height_px: u32,
    pub rgb: Vec<u8>,
}

impl LogoImage {
    /// 高さ / 幅
    pub fn aspect(&self) -> f32 {
        self.height_px as f32 / self.width_px as f32
    }
}

/// 画像バイト列をデコード
///
/// 透過部分は白で塗りつぶす。
pub fn decode_logo(bytes: &[u8]) -> Result<LogoImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| KitReportError::ImageLoad(e.to_string()))?;
    let rgba = image.to_rgba8();
    let (width_px, height_px) = rgba.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(KitReportError::ImageLoad("imagem vazia".into()));
    }

    let mut rgb = Vec::with_capacity((width_px * height_px * 3) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        for c in [r, g, b] {
            let blended = (c as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }

    Ok(LogoImage { width_px, height_px, rgb })
}

/// 取得してデコード（失敗時は None）
pub fn load_logo(provider: &dyn LogoProvider) -> Option<LogoImage> {
    let bytes = provider.logo_bytes()?;
    match decode_logo(&bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::warn!(error = %e, "logo inválido, relatório sem logo");
            None
        }
    }
}
