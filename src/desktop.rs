//! Desktop-environment detection.
//!
//! Used for informational logging only — nothing branches on the result.
//! The lookup order matches what display managers actually populate:
//! `XDG_CURRENT_DESKTOP` is the freedesktop standard, the other two are
//! legacy variables still set by older GDM/LightDM sessions.

const SESSION_VARS: [&str; 3] = ["XDG_CURRENT_DESKTOP", "DESKTOP_SESSION", "GDMSESSION"];

/// Returns the current desktop environment name, if any session variable
/// is set to a non-empty value.
pub fn detect() -> Option<String> {
    detect_with(|name| std::env::var(name).ok())
}

/// Pure core: first non-empty value wins, in `SESSION_VARS` order.
fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    SESSION_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_xdg_current_desktop() {
        let result = detect_with(|name| match name {
            "XDG_CURRENT_DESKTOP" => Some("GNOME".to_string()),
            "DESKTOP_SESSION" => Some("ubuntu".to_string()),
            _ => None,
        });
        assert_eq!(result.as_deref(), Some("GNOME"));
    }

    #[test]
    fn falls_through_empty_values() {
        let result = detect_with(|name| match name {
            "XDG_CURRENT_DESKTOP" => Some(String::new()),
            "GDMSESSION" => Some("plasma".to_string()),
            _ => None,
        });
        assert_eq!(result.as_deref(), Some("plasma"));
    }

    #[test]
    fn none_when_nothing_set() {
        assert_eq!(detect_with(|_| None), None);
    }
}
