// PNG export of rendered images
use crate::presentation::raster::RasterImage;
use anyhow::Context;
use std::path::Path;

/// Encode `image` and write it to `path`, creating parent directories.
pub async fn write_png(image: &RasterImage, path: &Path) -> anyhow::Result<()> {
    let bytes = image.encode_png()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(path, &bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), width = image.width(), height = image.height(), bytes = bytes.len(), "wrote image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::raster::{Canvas, ImageSize, palette};

    #[tokio::test]
    async fn test_write_png_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art").join("blank.png");
        let image = Canvas::new(ImageSize::new(4, 3), palette::PAPER).unwrap().finish();

        write_png(&image, &path).await.unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
