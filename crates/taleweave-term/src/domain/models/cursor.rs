use super::PANEL_COUNT;

/// Position within the committed scene plus the pending final choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardCursor {
    pub current_panel: usize,
    pub selected_choice_id: Option<String>,
}

impl Default for WizardCursor {
    fn default() -> WizardCursor {
        WizardCursor {
            current_panel: 1,
            selected_choice_id: None,
        }
    }
}

impl WizardCursor {
    pub fn next(&mut self) {
        if self.current_panel < PANEL_COUNT {
            self.current_panel += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.current_panel > 1 {
            self.current_panel -= 1;
        }
    }

    pub fn is_on_last_panel(&self) -> bool {
        self.current_panel == PANEL_COUNT
    }

    pub fn reset(&mut self) {
        *self = WizardCursor::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_within_bounds() {
        let mut cursor = WizardCursor::default();
        cursor.previous();
        assert_eq!(cursor.current_panel, 1);

        for _ in 0..10 {
            cursor.next();
        }
        assert_eq!(cursor.current_panel, PANEL_COUNT);
        assert!(cursor.is_on_last_panel());

        cursor.previous();
        assert_eq!(cursor.current_panel, 4);
    }

    #[test]
    fn test_reset_clears_selection() {
        let mut cursor = WizardCursor {
            current_panel: 5,
            selected_choice_id: Some("a".to_string()),
        };
        cursor.reset();
        assert_eq!(cursor, WizardCursor::default());
    }
}
