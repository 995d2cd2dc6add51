use serde::{Deserialize, Serialize};

use crate::error::{Result, TabletrimError};

/// Navigation widgets that can be placed in the active column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Drop-down listing every column
    Select,
    /// Live text mirroring the active column title
    Title,
    /// Label bound to the selector
    Label,
    /// Button activating the previous column
    Prev,
    /// Button activating the next column
    Next,
}

/// Widget configuration.
///
/// Every recognized option is a field here; unknown keys in a deserialized
/// object are ignored. Hooks live in [`crate::types::Hooks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Widgets to build, in display order
    pub controls: Vec<ControlKind>,
    /// Inner HTML of the previous button
    #[serde(alias = "prevhtml")]
    pub prev_html: String,
    /// Inner HTML of the next button
    #[serde(alias = "nexthtml")]
    pub next_html: String,
    /// Inner HTML of the selector label
    #[serde(alias = "labelhtml")]
    pub label_html: String,
    /// Column that stays visible while trimmed, 0 for none
    #[serde(alias = "sticky")]
    pub sticky_index: usize,
    /// Column shown first when the table trims
    #[serde(alias = "init")]
    pub init_index: usize,
    /// Table width (px) at or below which the table trims
    pub breakpoint: f64,
    /// Debounce delay (ms) for viewport checks
    pub lag: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            controls: vec![ControlKind::Select],
            prev_html: "&lsaquo;".to_string(),
            next_html: "&rsaquo;".to_string(),
            label_html: "Column: ".to_string(),
            sticky_index: 1,
            init_index: 2,
            breakpoint: 640.0,
            lag: 100,
        }
    }
}

impl Options {
    /// Whether a sticky column is configured.
    pub fn has_sticky(&self) -> bool {
        self.sticky_index > 0
    }

    /// Check the options against a table with `columns` columns.
    ///
    /// # Errors
    /// Returns [`TabletrimError::Configuration`] when an index is out of range,
    /// `init_index` equals `sticky_index`, the breakpoint is not finite, or a
    /// control kind is listed twice.
    pub fn validate(&self, columns: usize) -> Result<()> {
        if self.sticky_index > columns {
            return Err(TabletrimError::config(format!(
                "`stickyIndex` must be 0 or within 1..={columns}, got {}",
                self.sticky_index
            )));
        }
        if self.init_index < 1 || self.init_index > columns {
            return Err(TabletrimError::config(format!(
                "`initIndex` must be within 1..={columns}, got {}",
                self.init_index
            )));
        }
        if self.init_index == self.sticky_index {
            return Err(TabletrimError::config(
                "`initIndex` must not be the same as `stickyIndex`",
            ));
        }
        if !self.breakpoint.is_finite() {
            return Err(TabletrimError::config("`breakpoint` must be a finite width"));
        }
        for (i, kind) in self.controls.iter().enumerate() {
            if self.controls.iter().skip(i + 1).any(|other| other == kind) {
                return Err(TabletrimError::config(format!(
                    "control {kind:?} is listed more than once"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_widget_defaults() {
        let options = Options::default();
        assert_eq!(options.controls, vec![ControlKind::Select]);
        assert_eq!(options.sticky_index, 1);
        assert_eq!(options.init_index, 2);
        assert_eq!(options.breakpoint, 640.0);
        assert_eq!(options.lag, 100);
        assert!(options.validate(2).is_ok());
    }

    #[test]
    fn test_deserialize_camel_case_and_legacy_names() {
        let options: Options = serde_json::from_str(
            r#"{"stickyIndex": 0, "init": 3, "controls": ["prev", "title", "next"], "nexthtml": "&raquo;"}"#,
        )
        .unwrap();
        assert_eq!(options.sticky_index, 0);
        assert_eq!(options.init_index, 3);
        assert_eq!(
            options.controls,
            vec![ControlKind::Prev, ControlKind::Title, ControlKind::Next]
        );
        assert_eq!(options.next_html, "&raquo;");
        assert_eq!(options.prev_html, "&lsaquo;");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options: Options =
            serde_json::from_str(r#"{"breakpoint": 480, "onActivate": null, "color": "red"}"#)
                .unwrap();
        assert_eq!(options.breakpoint, 480.0);
    }

    #[test]
    fn test_unknown_control_kind_is_rejected() {
        let result = serde_json::from_str::<Options>(r#"{"controls": ["slider"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_init_equal_to_sticky() {
        let options = Options {
            init_index: 1,
            ..Options::default()
        };
        assert!(matches!(
            options.validate(4),
            Err(TabletrimError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_indexes() {
        let sticky = Options {
            sticky_index: 5,
            ..Options::default()
        };
        assert!(sticky.validate(4).is_err());

        let init = Options {
            init_index: 0,
            ..Options::default()
        };
        assert!(init.validate(4).is_err());

        let init_high = Options {
            init_index: 5,
            ..Options::default()
        };
        assert!(init_high.validate(4).is_err());
    }

    #[test]
    fn test_validate_allows_no_sticky_column() {
        let options = Options {
            sticky_index: 0,
            init_index: 1,
            ..Options::default()
        };
        assert!(options.validate(3).is_ok());
        assert!(!options.has_sticky());
    }

    #[test]
    fn test_validate_rejects_duplicate_controls() {
        let options = Options {
            controls: vec![ControlKind::Next, ControlKind::Select, ControlKind::Next],
            ..Options::default()
        };
        assert!(options.validate(4).is_err());
    }
}
