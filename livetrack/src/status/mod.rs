//! Track status lookup.
//!
//! The render projector does not interpret raw status codes itself; it asks
//! an injected [`StatusLookup`] how the current status should be drawn. The
//! crate ships [`StaticStatusTable`], a table of the live-timing status
//! codes, but callers are free to inject their own mapping.

/// How the current track status should be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusStyle {
    /// Stroke color token for affected track, if the status colors the map.
    pub track_color: Option<String>,
    /// When true, only sectors under caution take `track_color`; otherwise
    /// the whole track does.
    pub by_sector: bool,
    /// Pulse repetition-period hint, in seconds, applied uniformly.
    pub pulse: Option<f32>,
}

/// Maps a raw status code to its render style.
pub trait StatusLookup: Send + Sync {
    /// Returns the style for a status code, or `None` when the code is
    /// unknown or absent (rendered as a neutral track).
    fn status(&self, code: Option<&str>) -> Option<StatusStyle>;
}

/// Built-in table for the live-timing track status codes.
///
/// | Code | Meaning            | Rendering                      |
/// |------|--------------------|--------------------------------|
/// | 1    | Track clear        | neutral                        |
/// | 2    | Yellow flag        | yellow, per-sector             |
/// | 4    | Safety car         | yellow, whole track            |
/// | 5    | Red flag           | red, whole track               |
/// | 6    | Virtual safety car | yellow, whole track, pulsing   |
/// | 7    | VSC ending         | yellow, whole track, pulsing   |
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticStatusTable;

impl StatusLookup for StaticStatusTable {
    fn status(&self, code: Option<&str>) -> Option<StatusStyle> {
        match code? {
            "1" => Some(StatusStyle {
                track_color: None,
                by_sector: false,
                pulse: None,
            }),
            "2" => Some(StatusStyle {
                track_color: Some("yellow".to_string()),
                by_sector: true,
                pulse: None,
            }),
            "4" => Some(StatusStyle {
                track_color: Some("yellow".to_string()),
                by_sector: false,
                pulse: None,
            }),
            "5" => Some(StatusStyle {
                track_color: Some("red".to_string()),
                by_sector: false,
                pulse: None,
            }),
            "6" => Some(StatusStyle {
                track_color: Some("yellow".to_string()),
                by_sector: false,
                pulse: Some(1.2),
            }),
            "7" => Some(StatusStyle {
                track_color: Some("yellow".to_string()),
                by_sector: false,
                pulse: Some(0.6),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_code_has_no_style() {
        assert!(StaticStatusTable.status(None).is_none());
    }

    #[test]
    fn test_unknown_code_has_no_style() {
        assert!(StaticStatusTable.status(Some("42")).is_none());
    }

    #[test]
    fn test_clear_track_is_neutral() {
        let style = StaticStatusTable.status(Some("1")).unwrap();
        assert!(style.track_color.is_none());
        assert!(!style.by_sector);
    }

    #[test]
    fn test_yellow_flag_is_per_sector() {
        let style = StaticStatusTable.status(Some("2")).unwrap();
        assert_eq!(style.track_color.as_deref(), Some("yellow"));
        assert!(style.by_sector);
    }

    #[test]
    fn test_vsc_pulses_track_wide() {
        let style = StaticStatusTable.status(Some("6")).unwrap();
        assert!(!style.by_sector);
        assert!(style.pulse.is_some());
    }
}
