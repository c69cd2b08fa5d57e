//! Minimal model of the host's rendered page.
//!
//! The host application owns the real UI; this model mirrors just enough of
//! it for view models to inject themselves at startup and for the run loop to
//! re-render on state changes. Rows bound to a watch channel re-read their
//! value at render time.

use tokio::sync::watch;

pub struct Page {
    state_panel: Option<StatePanel>,
}

impl Page {
    /// A page without the printer-state panel; view models that would inject
    /// into it simply stay hidden.
    pub fn new() -> Self {
        Self { state_panel: None }
    }

    /// The default page, with the printer-state panel present.
    pub fn with_state_panel() -> Self {
        Self {
            state_panel: Some(StatePanel::new()),
        }
    }

    pub fn state_panel_mut(&mut self) -> Option<&mut StatePanel> {
        self.state_panel.as_mut()
    }

    pub fn render(&self) -> String {
        match &self.state_panel {
            Some(panel) => panel.render(),
            None => String::new(),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// The printer-state panel: labeled text rows around a progress indicator.
pub struct StatePanel {
    rows: Vec<PanelRow>,
}

enum PanelRow {
    Text {
        label: String,
        value: watch::Receiver<String>,
    },
    Progress,
}

impl StatePanel {
    fn new() -> Self {
        Self {
            rows: vec![PanelRow::Progress],
        }
    }

    /// Insert a labeled, value-bound text row immediately before the panel's
    /// progress indicator.
    pub fn insert_before_progress(&mut self, label: impl Into<String>, value: watch::Receiver<String>) {
        let at = self
            .rows
            .iter()
            .position(|r| matches!(r, PanelRow::Progress))
            .unwrap_or(self.rows.len());
        self.rows.insert(
            at,
            PanelRow::Text {
                label: label.into(),
                value,
            },
        );
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            match row {
                PanelRow::Text { label, value } => {
                    out.push_str(label);
                    out.push_str(": ");
                    out.push_str(&value.borrow());
                    out.push('\n');
                }
                PanelRow::Progress => out.push_str("[progress]\n"),
            }
        }
        out
    }
}
