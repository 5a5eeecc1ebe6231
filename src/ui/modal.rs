//! Modal overlay host

use super::html::escape;

/// Dialog container. Open state lives with the page (in the URL); the modal
/// only decides how it is drawn and how it closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub width: String,
    pub padding: String,
    pub border_radius: String,
    pub z_index: u32,
    pub prevent_close_on_click_outside: bool,
    /// Positioned inside the parent instead of the viewport
    pub relative: bool,
}

impl Default for Modal {
    fn default() -> Self {
        Self {
            width: "400px".to_string(),
            padding: "20px".to_string(),
            border_radius: "12px".to_string(),
            z_index: 999,
            prevent_close_on_click_outside: false,
            relative: false,
        }
    }
}

impl Modal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = width.into();
        self
    }

    pub fn padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = padding.into();
        self
    }

    pub fn border_radius(mut self, radius: impl Into<String>) -> Self {
        self.border_radius = radius.into();
        self
    }

    pub fn z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn prevent_close_on_click_outside(mut self) -> Self {
        self.prevent_close_on_click_outside = true;
        self
    }

    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }

    pub fn closes_on_outside_click(&self) -> bool {
        !self.prevent_close_on_click_outside
    }

    /// Overlay markup; empty when closed. Clicking the backdrop follows
    /// `close_href` unless outside clicks are disabled.
    pub fn render(&self, is_open: bool, close_href: &str, children: &str) -> String {
        if !is_open {
            return String::new();
        }

        let position = if self.relative { "absolute" } else { "fixed" };
        let backdrop = if self.closes_on_outside_click() {
            format!(
                r#"<a class="backdrop" href="{}" aria-label="Close"></a>"#,
                escape(close_href)
            )
        } else {
            r#"<div class="backdrop"></div>"#.to_string()
        };

        format!(
            r#"<div class="overlay" style="position: {}; z-index: {};">{}<div class="modal" role="dialog" aria-modal="true" style="width: {}; padding: {}; border-radius: {};">{}</div></div>"#,
            position,
            self.z_index,
            backdrop,
            escape(&self.width),
            escape(&self.padding),
            escape(&self.border_radius),
            children
        )
    }
}
