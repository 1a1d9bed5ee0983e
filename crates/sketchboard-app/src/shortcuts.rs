//! Keyboard and pointer shortcut documentation.

/// A shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of the shortcuts the input router understands.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("Enter", false, false, "Finish editing"),
            Shortcut::new("Enter", false, true, "New line while editing"),
            Shortcut::new("Escape", false, false, "Finish editing"),
            Shortcut::new("Delete", false, false, "Delete empty text or note"),
            Shortcut::new("Backspace", false, false, "Delete character, or the empty entity"),
            Shortcut::new("Wheel", true, false, "Zoom at pointer"),
            Shortcut::new("Wheel", false, false, "Pan"),
            Shortcut::new("Double-click", false, false, "Edit text or note"),
        ]
    }

    /// Shortcut table appended to the command-line help.
    pub fn help_text() -> String {
        let mut text = String::from("Shortcuts:");
        for shortcut in Self::all() {
            text.push_str(&format!("\n  {:20} {}", shortcut.format(), shortcut.description));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Z", true, true, "Redo").format(), "Ctrl+Shift+Z");
        assert_eq!(Shortcut::new("Escape", false, false, "").format(), "Escape");
    }

    #[test]
    fn test_registry_has_history_keys() {
        let all = ShortcutRegistry::all();
        assert!(all.iter().any(|s| s.format() == "Ctrl+Z" && s.description == "Undo"));
        assert_eq!(all.iter().filter(|s| s.description == "Redo").count(), 2);
    }

    #[test]
    fn test_help_text_lists_every_shortcut() {
        let text = ShortcutRegistry::help_text();
        assert!(text.starts_with("Shortcuts:"));
        assert_eq!(text.lines().count(), ShortcutRegistry::all().len() + 1);
        assert!(text.contains("Ctrl+Shift+Z"));
    }
}
