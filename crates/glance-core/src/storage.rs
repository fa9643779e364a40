//! Capture persistence and transport encoding
//!
//! Saved captures are organized by date:
//! `<save_dir>/<YYYY-MM-DD>/<YYYYMMDD_HHMMSS>.png`.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Local};
use tokio::fs;

/// Prefix of the embedded image representation
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Directory (relative to the save dir) for captures taken at `now`
pub fn date_folder(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// File name for a capture taken at `now`
pub fn capture_file_name(now: &DateTime<Local>) -> String {
    format!("{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Writes a capture below `save_dir`, creating the date folder if needed
///
/// Two captures within the same second share a name; the later one wins.
///
/// # Returns
/// The path of the written file
pub async fn save_capture(
    data: &[u8],
    save_dir: &Path,
    now: DateTime<Local>,
) -> std::io::Result<PathBuf> {
    let folder = save_dir.join(date_folder(&now));
    fs::create_dir_all(&folder).await?;

    let file_path = folder.join(capture_file_name(&now));
    fs::write(&file_path, data).await?;
    tracing::debug!("Capture saved to {:?}", file_path);

    Ok(file_path)
}

/// Encodes PNG bytes as a self-describing data URL
pub fn to_data_url(data: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, BASE64.encode(data))
}

/// Decodes a data URL produced by [`to_data_url`]
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let encoded = url.strip_prefix(PNG_DATA_URL_PREFIX)?;
    BASE64.decode(encoded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap()
    }

    #[test]
    fn test_date_folder_and_file_name() {
        let now = fixed_time();
        assert_eq!(date_folder(&now), "2024-03-09");
        assert_eq!(capture_file_name(&now), "20240309_070502.png");
    }

    #[tokio::test]
    async fn test_save_capture_creates_date_folder() {
        let temp_dir = TempDir::new().unwrap();
        let save_dir = temp_dir.path().join("shots");

        let path = save_capture(b"png-bytes", &save_dir, fixed_time())
            .await
            .unwrap();

        assert_eq!(
            path,
            save_dir.join("2024-03-09").join("20240309_070502.png")
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_save_capture_round_trip_matches_data_url() {
        let temp_dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..=255).collect();

        let path = save_capture(&data, temp_dir.path(), fixed_time())
            .await
            .unwrap();
        let url = to_data_url(&data);

        assert_eq!(decode_data_url(&url).unwrap(), std::fs::read(path).unwrap());
    }

    #[test]
    fn test_data_url_prefix() {
        let url = to_data_url(&[1, 2, 3]);
        assert_eq!(url, "data:image/png;base64,AQID");
    }

    #[test]
    fn test_decode_rejects_foreign_prefix() {
        assert!(decode_data_url("data:image/jpeg;base64,AQID").is_none());
        assert!(decode_data_url("data:image/png;base64,!!!").is_none());
    }
}
