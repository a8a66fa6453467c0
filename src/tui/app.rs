#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Content,
    Tables,
    Summary,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Content => ActivePane::Tables,
            ActivePane::Tables => ActivePane::Summary,
            ActivePane::Summary => ActivePane::Content,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActivePane::Content => ActivePane::Summary,
            ActivePane::Tables => ActivePane::Content,
            ActivePane::Summary => ActivePane::Tables,
        }
    }
}

/// View state only. Pipeline results live in the session context; this
/// tracks which pane is active and where each one is scrolled to.
pub struct TuiApp {
    pub active_pane: ActivePane,
    pub content_scroll: u16,
    pub summary_scroll: u16,
    pub table_index: usize,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub busy_message: Option<String>,
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            active_pane: ActivePane::Content,
            content_scroll: 0,
            summary_scroll: 0,
            table_index: 0,
            should_quit: false,
            status_message: None,
            busy_message: None,
        }
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Content => {
                self.content_scroll = self.content_scroll.saturating_sub(1);
            }
            ActivePane::Tables => {
                if self.table_index > 0 {
                    self.table_index -= 1;
                }
            }
            ActivePane::Summary => {
                self.summary_scroll = self.summary_scroll.saturating_sub(1);
            }
        }
    }

    pub fn move_down(&mut self, table_count: usize) {
        match self.active_pane {
            ActivePane::Content => {
                self.content_scroll = self.content_scroll.saturating_add(1);
            }
            ActivePane::Tables => {
                if table_count > 0 && self.table_index < table_count - 1 {
                    self.table_index += 1;
                }
            }
            ActivePane::Summary => {
                self.summary_scroll = self.summary_scroll.saturating_add(1);
            }
        }
    }

    /// A fresh scrape invalidates the table selection and scroll state.
    pub fn reset_view(&mut self) {
        self.content_scroll = 0;
        self.summary_scroll = 0;
        self.table_index = 0;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
