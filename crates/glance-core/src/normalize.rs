//! Result normalization
//!
//! Maps whatever an adapter scraped from native tools onto the shared data model,
//! enforcing the invariants callers rely on.

use crate::ports::platform::{DisplayInfo, WindowInfo};

/// Enforces the display-list invariants
///
/// - an empty list becomes exactly the synthetic default display
/// - when no display is flagged primary, the first one is elected
/// - when several are flagged, only the first keeps the flag
pub fn normalize_displays(mut displays: Vec<DisplayInfo>) -> Vec<DisplayInfo> {
    if displays.is_empty() {
        return vec![DisplayInfo::synthetic_default()];
    }

    let first_primary = displays.iter().position(|d| d.primary).unwrap_or(0);
    for (index, display) in displays.iter_mut().enumerate() {
        display.primary = index == first_primary;
    }

    displays
}

/// Cleans up scraped window entries
///
/// Trims surrounding whitespace left by line-oriented tool output and drops
/// entries without a usable id.
pub fn normalize_windows(windows: Vec<WindowInfo>) -> Vec<WindowInfo> {
    windows
        .into_iter()
        .filter_map(|mut window| {
            window.id = window.id.trim().to_string();
            if window.id.is_empty() {
                return None;
            }
            window.title = window.title.trim().to_string();
            window.app = window.app.trim().to_string();
            Some(window)
        })
        .collect()
}

/// Parses an integer coordinate leniently; anything unparsable is 0
pub fn parse_coord(raw: &str) -> i32 {
    raw.trim().parse::<i32>().unwrap_or(0)
}

/// Parses a size leniently; negative or unparsable values are 0
pub fn parse_size(raw: &str) -> u32 {
    let value = raw.trim().parse::<i64>().unwrap_or(0);
    value.clamp(0, u32::MAX as i64) as u32
}

/// Converts a signed size from a JSON payload, clamping negatives to 0
pub fn clamp_size(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Picks the display a screen capture should target
///
/// `None` selects the primary display, falling back to the first entry.
pub fn find_display(displays: &[DisplayInfo], display_id: Option<u32>) -> Option<&DisplayInfo> {
    match display_id {
        Some(id) => displays.iter().find(|d| d.id == id),
        None => displays.iter().find(|d| d.primary).or_else(|| displays.first()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::platform::Bounds;

    fn display(id: u32, primary: bool) -> DisplayInfo {
        DisplayInfo {
            id,
            name: format!("OUT-{}", id),
            primary,
            bounds: Bounds::new((id as i32 - 1) * 1920, 0, 1920, 1080),
        }
    }

    fn window(id: &str, title: &str) -> WindowInfo {
        WindowInfo {
            id: id.to_string(),
            title: title.to_string(),
            app: " app\n".to_string(),
            bounds: Bounds::default(),
        }
    }

    // === Displays ===

    #[test]
    fn test_empty_displays_become_synthetic_default() {
        let displays = normalize_displays(vec![]);
        assert_eq!(displays.len(), 1);
        assert!(displays[0].is_synthetic_default());
    }

    #[test]
    fn test_first_display_elected_primary() {
        let displays = normalize_displays(vec![display(1, false), display(2, false)]);
        assert!(displays[0].primary);
        assert!(!displays[1].primary);
    }

    #[test]
    fn test_explicit_primary_is_kept() {
        let displays = normalize_displays(vec![display(1, false), display(2, true)]);
        assert!(!displays[0].primary);
        assert!(displays[1].primary);
    }

    #[test]
    fn test_at_most_one_primary() {
        let displays =
            normalize_displays(vec![display(1, false), display(2, true), display(3, true)]);
        assert_eq!(displays.iter().filter(|d| d.primary).count(), 1);
        assert!(displays[1].primary);
    }

    // === Windows ===

    #[test]
    fn test_windows_are_trimmed() {
        let windows = normalize_windows(vec![window(" 0x01 ", " Terminal \n")]);
        assert_eq!(windows[0].id, "0x01");
        assert_eq!(windows[0].title, "Terminal");
        assert_eq!(windows[0].app, "app");
    }

    #[test]
    fn test_windows_without_id_are_dropped() {
        let windows = normalize_windows(vec![window("  ", "ghost"), window("7", "")]);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].id, "7");
        assert_eq!(windows[0].title, "");
    }

    // === Parsing helpers ===

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("120"), 120);
        assert_eq!(parse_coord(" -40 "), -40);
        assert_eq!(parse_coord("abc"), 0);
        assert_eq!(parse_coord(""), 0);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("800"), 800);
        assert_eq!(parse_size("-5"), 0);
        assert_eq!(parse_size("wide"), 0);
        assert_eq!(clamp_size(-1), 0);
        assert_eq!(clamp_size(640), 640);
    }

    #[test]
    fn test_find_display() {
        let displays = vec![display(1, false), display(2, true)];
        assert_eq!(find_display(&displays, None).unwrap().id, 2);
        assert_eq!(find_display(&displays, Some(1)).unwrap().id, 1);
        assert!(find_display(&displays, Some(9)).is_none());

        let no_primary = vec![display(1, false), display(2, false)];
        assert_eq!(find_display(&no_primary, None).unwrap().id, 1);
        assert!(find_display(&[], None).is_none());
    }
}
