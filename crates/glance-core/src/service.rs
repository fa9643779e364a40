//! Screenshot operations
//!
//! The four logical operations exposed to callers. Each delegates to the resolved
//! platform adapter, normalizes what comes back and, for captures, optionally
//! persists the image before returning it as an embedded data URL.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::normalize::{normalize_displays, normalize_windows};
use crate::ports::platform::{
    Bounds, CapturedImage, DisplayInfo, PlatformError, PlatformPort, WindowInfo,
};
use crate::storage::{save_capture, to_data_url};

/// Arguments of `screenshot_window`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScreenshotWindowRequest {
    #[serde(default)]
    pub window_id: Option<String>,
    #[serde(default)]
    pub window_title: Option<String>,
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
}

/// Arguments of `screenshot_screen`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScreenshotScreenRequest {
    #[serde(default)]
    pub display_id: Option<u32>,
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
}

/// Arguments of `screenshot_region`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScreenshotRegionRequest {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
}

/// Result of a capture operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotResult {
    /// `data:image/png;base64,...`
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub saved_path: Option<PathBuf>,
}

/// Entry point for callers of the capture toolkit
#[derive(Clone)]
pub struct ScreenshotService {
    platform: Arc<dyn PlatformPort>,
}

impl ScreenshotService {
    pub fn new(platform: Arc<dyn PlatformPort>) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &Arc<dyn PlatformPort> {
        &self.platform
    }

    /// Lists visible windows, freshly queried on every call
    pub async fn list_windows(&self) -> Vec<WindowInfo> {
        let windows = normalize_windows(self.platform.list_windows().await);
        debug!("{} window(s) listed by {}", windows.len(), self.platform.name());
        windows
    }

    /// Lists displays; never empty
    pub async fn list_displays(&self) -> Vec<DisplayInfo> {
        let displays = normalize_displays(self.platform.list_displays().await);
        if displays.len() == 1 && displays[0].is_synthetic_default() {
            warn!("Display information unavailable, returning the synthetic default display");
        }
        displays
    }

    /// Captures one window, addressed by id or by title
    ///
    /// A non-empty `window_id` takes precedence. Otherwise the first window (in
    /// enumeration order) whose title contains `window_title`, ignoring case, is used.
    ///
    /// # Errors
    /// - `MissingIdentifier` when neither field is given (no platform call is made)
    /// - `TargetNotFound` when no title matches (no capture is attempted)
    pub async fn screenshot_window(
        &self,
        request: ScreenshotWindowRequest,
    ) -> Result<ScreenshotResult, PlatformError> {
        let window_id = non_empty(request.window_id);
        let window_title = non_empty(request.window_title);

        let window_id = match (window_id, window_title) {
            (Some(id), _) => id,
            (None, Some(title)) => self.resolve_window_title(&title).await?,
            (None, None) => return Err(PlatformError::MissingIdentifier),
        };

        let start = Instant::now();
        let image = self.platform.screenshot_window(&window_id).await?;
        self.finish(image, request.save_dir, start).await
    }

    /// Captures a display; the primary display when `display_id` is omitted
    pub async fn screenshot_screen(
        &self,
        request: ScreenshotScreenRequest,
    ) -> Result<ScreenshotResult, PlatformError> {
        let start = Instant::now();
        let image = self.platform.screenshot_screen(request.display_id).await?;
        self.finish(image, request.save_dir, start).await
    }

    /// Captures a rectangle of the virtual screen
    ///
    /// # Errors
    /// Returns `InvalidTarget` for a zero-area region
    pub async fn screenshot_region(
        &self,
        request: ScreenshotRegionRequest,
    ) -> Result<ScreenshotResult, PlatformError> {
        let region = Bounds::new(request.x, request.y, request.width, request.height);
        if region.is_empty() {
            return Err(PlatformError::InvalidTarget(format!(
                "region {}x{} has no area",
                region.width, region.height
            )));
        }

        let start = Instant::now();
        let image = self.platform.screenshot_region(region).await?;
        self.finish(image, request.save_dir, start).await
    }

    async fn resolve_window_title(&self, title: &str) -> Result<String, PlatformError> {
        let needle = title.to_lowercase();
        let windows = self.list_windows().await;

        windows
            .into_iter()
            .find(|w| w.title.to_lowercase().contains(&needle))
            .map(|w| {
                debug!("Title {:?} matched window {} ({:?})", title, w.id, w.title);
                w.id
            })
            .ok_or_else(|| {
                PlatformError::TargetNotFound(format!(
                    "No window found matching title: {}. Use list_windows to see available windows.",
                    title
                ))
            })
    }

    async fn finish(
        &self,
        image: CapturedImage,
        save_dir: Option<PathBuf>,
        start: Instant,
    ) -> Result<ScreenshotResult, PlatformError> {
        if image.whole_screen {
            warn!(
                "{} cannot isolate the requested target; the whole screen was captured",
                image.tool
            );
        }

        let saved_path = match save_dir {
            Some(dir) => Some(save_capture(&image.data, &dir, Local::now()).await?),
            None => None,
        };

        match image.dimensions() {
            Some((width, height)) => info!(
                "Screenshot captured with {}: {}x{}, {} bytes PNG in {:?}",
                image.tool,
                width,
                height,
                image.data.len(),
                start.elapsed()
            ),
            None => info!(
                "Screenshot captured with {}: {} bytes in {:?}",
                image.tool,
                image.data.len(),
                start.elapsed()
            ),
        }

        Ok(ScreenshotResult {
            image: to_data_url(&image.data),
            saved_path,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::decode_data_url;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mock platform port for testing
    #[derive(Default)]
    struct MockPlatform {
        windows: Vec<WindowInfo>,
        displays: Vec<DisplayInfo>,
        captures: Mutex<Vec<String>>,
        list_calls: Mutex<usize>,
    }

    impl MockPlatform {
        fn with_windows(titles: &[(&str, &str)]) -> Self {
            Self {
                windows: titles
                    .iter()
                    .map(|(id, title)| WindowInfo {
                        id: id.to_string(),
                        title: title.to_string(),
                        app: "app".to_string(),
                        bounds: Bounds::new(0, 0, 100, 100),
                    })
                    .collect(),
                ..Default::default()
            }
        }

        fn captures(&self) -> Vec<String> {
            self.captures.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlatformPort for MockPlatform {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn list_windows(&self) -> Vec<WindowInfo> {
            *self.list_calls.lock().unwrap() += 1;
            self.windows.clone()
        }

        async fn list_displays(&self) -> Vec<DisplayInfo> {
            self.displays.clone()
        }

        async fn screenshot_window(&self, window_id: &str) -> Result<CapturedImage, PlatformError> {
            self.captures
                .lock()
                .unwrap()
                .push(format!("window:{}", window_id));
            Ok(CapturedImage::new(vec![1, 2, 3], "mock"))
        }

        async fn screenshot_screen(
            &self,
            display_id: Option<u32>,
        ) -> Result<CapturedImage, PlatformError> {
            self.captures
                .lock()
                .unwrap()
                .push(format!("screen:{:?}", display_id));
            Ok(CapturedImage::new(vec![4, 5, 6], "mock"))
        }

        async fn screenshot_region(&self, region: Bounds) -> Result<CapturedImage, PlatformError> {
            self.captures.lock().unwrap().push(format!(
                "region:{},{},{},{}",
                region.x, region.y, region.width, region.height
            ));
            Ok(CapturedImage::new(vec![7, 8, 9], "mock").whole_screen(true))
        }
    }

    fn service(platform: MockPlatform) -> (ScreenshotService, Arc<MockPlatform>) {
        let platform = Arc::new(platform);
        (ScreenshotService::new(platform.clone()), platform)
    }

    // === screenshot_window ===

    #[tokio::test]
    async fn test_window_without_identifier_is_rejected() {
        let (service, platform) = service(MockPlatform::with_windows(&[("1", "Editor")]));

        let err = service
            .screenshot_window(ScreenshotWindowRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PlatformError::MissingIdentifier));
        assert!(platform.captures().is_empty());
        assert_eq!(*platform.list_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_identifiers_count_as_missing() {
        let (service, _) = service(MockPlatform::default());
        let request = ScreenshotWindowRequest {
            window_id: Some(String::new()),
            window_title: Some("  ".to_string()),
            save_dir: None,
        };
        let err = service.screenshot_window(request).await.unwrap_err();
        assert!(matches!(err, PlatformError::MissingIdentifier));
    }

    #[tokio::test]
    async fn test_window_title_match_is_case_insensitive_substring() {
        let (service, platform) = service(MockPlatform::with_windows(&[
            ("10", "Terminal"),
            ("11", "Firefox - Rust Docs"),
            ("12", "Another FIREFOX window"),
        ]));

        let request = ScreenshotWindowRequest {
            window_title: Some("firefox".to_string()),
            ..Default::default()
        };
        let result = service.screenshot_window(request).await.unwrap();

        assert_eq!(platform.captures(), vec!["window:11"]);
        assert_eq!(decode_data_url(&result.image).unwrap(), vec![1, 2, 3]);
        assert!(result.saved_path.is_none());
    }

    #[tokio::test]
    async fn test_window_title_without_match_never_captures() {
        let (service, platform) = service(MockPlatform::with_windows(&[("10", "Terminal")]));

        let request = ScreenshotWindowRequest {
            window_title: Some("Slack".to_string()),
            ..Default::default()
        };
        let err = service.screenshot_window(request).await.unwrap_err();

        assert!(matches!(err, PlatformError::TargetNotFound(_)));
        assert!(err.to_string().contains("Slack"));
        assert!(platform.captures().is_empty());
    }

    #[tokio::test]
    async fn test_window_id_takes_precedence_over_title() {
        let (service, platform) = service(MockPlatform::with_windows(&[("10", "Terminal")]));

        let request = ScreenshotWindowRequest {
            window_id: Some("99".to_string()),
            window_title: Some("Terminal".to_string()),
            save_dir: None,
        };
        service.screenshot_window(request).await.unwrap();

        assert_eq!(platform.captures(), vec!["window:99"]);
        assert_eq!(*platform.list_calls.lock().unwrap(), 0);
    }

    // === screenshot_screen / screenshot_region ===

    #[tokio::test]
    async fn test_screen_defaults_to_primary() {
        let (service, platform) = service(MockPlatform::default());
        service
            .screenshot_screen(ScreenshotScreenRequest::default())
            .await
            .unwrap();
        assert_eq!(platform.captures(), vec!["screen:None"]);
    }

    #[tokio::test]
    async fn test_region_passes_coordinates() {
        let (service, platform) = service(MockPlatform::default());
        let request = ScreenshotRegionRequest {
            x: -20,
            y: 40,
            width: 300,
            height: 200,
            save_dir: None,
        };
        let result = service.screenshot_region(request).await.unwrap();
        assert_eq!(platform.captures(), vec!["region:-20,40,300,200"]);
        assert_eq!(decode_data_url(&result.image).unwrap(), vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn test_zero_area_region_is_rejected() {
        let (service, platform) = service(MockPlatform::default());
        let request = ScreenshotRegionRequest {
            x: 0,
            y: 0,
            width: 0,
            height: 200,
            save_dir: None,
        };
        let err = service.screenshot_region(request).await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidTarget(_)));
        assert!(platform.captures().is_empty());
    }

    // === save_dir ===

    #[tokio::test]
    async fn test_save_dir_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let (service, _) = service(MockPlatform::default());

        let request = ScreenshotScreenRequest {
            display_id: Some(2),
            save_dir: Some(temp_dir.path().to_path_buf()),
        };
        let result = service.screenshot_screen(request).await.unwrap();

        let saved_path = result.saved_path.clone().unwrap();
        assert!(saved_path.starts_with(temp_dir.path()));
        assert_eq!(
            std::fs::read(&saved_path).unwrap(),
            decode_data_url(&result.image).unwrap()
        );
    }

    // === Listing ===

    #[tokio::test]
    async fn test_list_displays_never_empty() {
        let (service, _) = service(MockPlatform::default());
        let displays = service.list_displays().await;
        assert_eq!(displays.len(), 1);
        assert!(displays[0].is_synthetic_default());
    }

    #[tokio::test]
    async fn test_list_windows_is_fresh_each_call() {
        let (service, platform) = service(MockPlatform::with_windows(&[("1", "a"), ("2", "b")]));
        let first = service.list_windows().await;
        let second = service.list_windows().await;
        assert_eq!(first, second);
        assert_eq!(*platform.list_calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_requests_deserialize_from_json_arguments() {
        let request: ScreenshotWindowRequest =
            serde_json::from_str(r#"{"window_title":"Term"}"#).unwrap();
        assert_eq!(request.window_title.as_deref(), Some("Term"));
        assert!(request.window_id.is_none());

        let request: ScreenshotRegionRequest =
            serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4,"save_dir":"/tmp"}"#)
                .unwrap();
        assert_eq!(request.width, 3);
        assert_eq!(request.save_dir, Some(PathBuf::from("/tmp")));

        assert!(serde_json::from_str::<ScreenshotRegionRequest>(r#"{"x":1}"#).is_err());
    }

    #[test]
    fn test_result_omits_missing_saved_path() {
        let result = ScreenshotResult {
            image: "data:image/png;base64,".to_string(),
            saved_path: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("saved_path"));
    }
}
