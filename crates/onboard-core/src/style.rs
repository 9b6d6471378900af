#![forbid(unsafe_code)]

//! Default tour stylesheet.

/// Class carried by the overlay element.
pub const OVERLAY_CLASS: &str = "onboardOverlay";

/// Class toggled on the overlay while a step is highlighted.
pub const ACTIVE_CLASS: &str = "active";

/// Stylesheet installed on connect. The overlay fades via an opacity
/// transition that the popup delay waits out.
pub const DEFAULT_STYLESHEET: &str = r#"
.onboardOverlay {
    box-shadow: rgb(233 77 77 / 80%) 0 0 1px 2px,
    rgb(84 84 84 / 50%) 0 0 0 5000px;
    box-sizing: content-box;
    position: absolute;
    border-radius: 4px;
    transition: all .3s ease-out;
    z-index: 9998;
    pointer-events: none;
    opacity: 0;
}

.onboardOverlay.active {
    opacity: 1;
}

.onboard-popover {
    z-index: 9999;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::POPUP_CLASS;

    #[test]
    fn stylesheet_covers_hooks() {
        assert!(DEFAULT_STYLESHEET.contains(&format!(".{OVERLAY_CLASS}.{ACTIVE_CLASS}")));
        assert!(DEFAULT_STYLESHEET.contains(&format!(".{POPUP_CLASS}")));
    }
}
