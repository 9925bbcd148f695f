//! Viewer context and panel configuration
//!
//! The context carries viewer metadata the panel depends on (workflow role,
//! calibration unit, global popup switch). It is injected into the controller
//! and replaced as a whole when the viewer state changes.
//!
//! Both types can be built programmatically or loaded from environment
//! variables.

use crate::error::ConfigError;
use std::time::Duration;

/// Unit symbol used when the image has no calibrated pixel size
pub const DEFAULT_PIXEL_UNIT: &str = "px";

/// Workflow step in which admins confirm annotations
pub const REVIEW_STEP: u32 = 2;

/// Default quiet period before a classification edit is emitted
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Viewer metadata read by the annotation panel
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerContext {
    /// Whether the current user administers the review workflow
    pub is_admin: bool,
    /// Current step of the review workflow
    pub current_step: u32,
    /// Unit symbol of the calibrated pixel size, if any
    pub pixel_unit: Option<String>,
    /// Global switch for showing the shape panel
    pub shape_popup_enabled: bool,
}

impl Default for ViewerContext {
    fn default() -> Self {
        Self {
            is_admin: false,
            current_step: 0,
            pixel_unit: None,
            shape_popup_enabled: true,
        }
    }
}

impl ViewerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_current_step(mut self, step: u32) -> Self {
        self.current_step = step;
        self
    }

    pub fn with_pixel_unit(mut self, unit: impl Into<String>) -> Self {
        self.pixel_unit = Some(unit.into());
        self
    }

    pub fn with_shape_popup(mut self, enabled: bool) -> Self {
        self.shape_popup_enabled = enabled;
        self
    }

    /// Unit symbol for metric labels, falling back to pixels
    pub fn pixel_unit_symbol(&self) -> &str {
        match self.pixel_unit.as_deref() {
            Some(unit) if !unit.is_empty() => unit,
            _ => DEFAULT_PIXEL_UNIT,
        }
    }

    /// Whether the confirm control is exposed
    pub fn can_confirm(&self) -> bool {
        self.is_admin && self.current_step == REVIEW_STEP
    }

    /// Loads the context from environment variables.
    ///
    /// Environment variables:
    /// - `ROI_VIEWER_IS_ADMIN`: `true`/`false`/`1`/`0` (default: false)
    /// - `ROI_VIEWER_CURRENT_STEP`: workflow step (default: 0)
    /// - `ROI_VIEWER_PIXEL_UNIT`: calibrated unit symbol (default: unset)
    /// - `ROI_VIEWER_SHAPE_POPUP`: show the shape panel (default: true)
    ///
    /// # Errors
    /// Returns an error if any environment variable contains an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut context = Self::default();

        if let Ok(val) = std::env::var("ROI_VIEWER_IS_ADMIN") {
            context.is_admin = parse_bool("ROI_VIEWER_IS_ADMIN", &val)?;
        }

        if let Ok(val) = std::env::var("ROI_VIEWER_CURRENT_STEP") {
            context.current_step = val
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue("ROI_VIEWER_CURRENT_STEP".to_string()))?;
        }

        if let Ok(val) = std::env::var("ROI_VIEWER_PIXEL_UNIT") {
            let val = val.trim();
            context.pixel_unit = (!val.is_empty()).then(|| val.to_string());
        }

        if let Ok(val) = std::env::var("ROI_VIEWER_SHAPE_POPUP") {
            context.shape_popup_enabled = parse_bool("ROI_VIEWER_SHAPE_POPUP", &val)?;
        }

        Ok(context)
    }
}

/// Panel behaviour settings
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Quiet period before a classification edit is emitted
    pub debounce: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl PanelConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Loads the configuration from environment variables.
    ///
    /// - `ROI_PANEL_DEBOUNCE_MS`: quiet period in milliseconds (default: 500)
    ///
    /// # Errors
    /// Returns an error if the variable is not an unsigned integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ROI_PANEL_DEBOUNCE_MS") {
            let millis = val
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("ROI_PANEL_DEBOUNCE_MS".to_string()))?;
            config.debounce = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(var.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "ROI_VIEWER_IS_ADMIN",
        "ROI_VIEWER_CURRENT_STEP",
        "ROI_VIEWER_PIXEL_UNIT",
        "ROI_VIEWER_SHAPE_POPUP",
        "ROI_PANEL_DEBOUNCE_MS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_context() {
        let context = ViewerContext::default();
        assert!(!context.is_admin);
        assert!(context.shape_popup_enabled);
        assert_eq!(context.pixel_unit_symbol(), "px");
        assert!(!context.can_confirm());
    }

    #[test]
    fn test_confirm_requires_admin_in_review_step() {
        assert!(ViewerContext::new().with_admin(true).with_current_step(2).can_confirm());
        assert!(!ViewerContext::new().with_admin(true).with_current_step(1).can_confirm());
        assert!(!ViewerContext::new().with_admin(false).with_current_step(2).can_confirm());
    }

    #[test]
    fn test_empty_unit_falls_back_to_pixels() {
        let context = ViewerContext::new().with_pixel_unit("");
        assert_eq!(context.pixel_unit_symbol(), "px");

        let context = ViewerContext::new().with_pixel_unit("µm");
        assert_eq!(context.pixel_unit_symbol(), "µm");
    }

    #[test]
    #[serial]
    fn test_context_from_env() {
        clear_env();
        std::env::set_var("ROI_VIEWER_IS_ADMIN", "true");
        std::env::set_var("ROI_VIEWER_CURRENT_STEP", "2");
        std::env::set_var("ROI_VIEWER_PIXEL_UNIT", "µm");
        std::env::set_var("ROI_VIEWER_SHAPE_POPUP", "0");

        let context = ViewerContext::from_env().unwrap();
        assert!(context.is_admin);
        assert_eq!(context.current_step, 2);
        assert_eq!(context.pixel_unit.as_deref(), Some("µm"));
        assert!(!context.shape_popup_enabled);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_context_from_env_rejects_invalid_step() {
        clear_env();
        std::env::set_var("ROI_VIEWER_CURRENT_STEP", "two");

        let result = ViewerContext::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue(ref var)) if var == "ROI_VIEWER_CURRENT_STEP"
        ));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_context_from_env_rejects_invalid_bool() {
        clear_env();
        std::env::set_var("ROI_VIEWER_IS_ADMIN", "maybe");
        assert!(ViewerContext::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_panel_config_from_env() {
        clear_env();
        assert_eq!(PanelConfig::from_env().unwrap().debounce, DEFAULT_DEBOUNCE);

        std::env::set_var("ROI_PANEL_DEBOUNCE_MS", "250");
        assert_eq!(
            PanelConfig::from_env().unwrap().debounce,
            Duration::from_millis(250)
        );

        std::env::set_var("ROI_PANEL_DEBOUNCE_MS", "-1");
        assert!(PanelConfig::from_env().is_err());

        clear_env();
    }
}
