//! Application state and logic

use anyhow::Result;
use browser_core::Config;
use chrono::{DateTime, Local};
use infisical::Credentials;
use secret_tree::{visible_rows, ExpansionState, Query, Row, TreeNode};

use crate::data;

/// Where the secret fetch stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Whether keystrokes go to the tree or to the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browse,
    Search,
}

/// Application state
pub struct App {
    pub credentials: Credentials,
    pub config: Config,
    runtime: tokio::runtime::Runtime,

    pub state: LoadState,
    pub refresh_pending: bool,
    pub mode: Mode,
    pub show_help: bool,
    pub mask_values: bool,
    pub selected: usize,
    /// One-line feedback shown in the footer
    pub status: Option<String>,

    // Data
    pub tree: Option<TreeNode>,
    pub secret_count: usize,
    pub region: Option<String>,
    pub fetched_at: Option<DateTime<Local>>,
    pub query: Query,
    pub expansion: ExpansionState,
}

impl App {
    pub fn new(credentials: Credentials, config: Config) -> Result<Self> {
        // Authentication and listing run one after another on this thread
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            mask_values: config.mask_values,
            credentials,
            config,
            runtime,
            state: LoadState::Loading,
            refresh_pending: true,
            mode: Mode::default(),
            show_help: false,
            selected: 0,
            status: None,
            tree: None,
            secret_count: 0,
            region: None,
            fetched_at: None,
            query: Query::default(),
            expansion: ExpansionState::new(),
        })
    }

    /// Ask for a refetch; the run loop draws the loading state first
    pub fn request_refresh(&mut self) {
        self.state = LoadState::Loading;
        self.refresh_pending = true;
    }

    /// Build a fresh client and tree. Expansion state carries over because
    /// it is keyed by folder path.
    pub fn refresh(&mut self) {
        self.refresh_pending = false;

        match self.runtime.block_on(data::fetch(&self.credentials, &self.config)) {
            Ok(snapshot) => {
                self.secret_count = snapshot.secret_count;
                self.region = Some(snapshot.region);
                self.fetched_at = Some(snapshot.fetched_at);
                self.tree = Some(snapshot.tree);
                self.state = LoadState::Ready;
                self.status = None;
            }
            Err(e) => {
                tracing::error!(error = %e, region = e.region().unwrap_or("-"), "Failed to load secrets");
                self.tree = None;
                self.state = LoadState::Failed(e.to_string());
            }
        }

        self.clamp_selection();
    }

    /// Rows currently on screen
    pub fn rows(&self) -> Vec<Row<'_>> {
        match &self.tree {
            Some(tree) => visible_rows(tree, &self.query, &self.expansion),
            None => Vec::new(),
        }
    }

    pub fn selected_row(&self) -> Option<Row<'_>> {
        self.rows().into_iter().nth(self.selected)
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_mask(&mut self) {
        self.mask_values = !self.mask_values;
    }

    pub fn move_down(&mut self) {
        let len = self.rows().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_top(&mut self) {
        self.selected = 0;
    }

    pub fn move_bottom(&mut self) {
        self.selected = self.rows().len().saturating_sub(1);
    }

    /// Open or close the selected folder
    pub fn toggle_selected(&mut self) {
        if let Some(path) = self.selected_folder_path() {
            self.expansion.toggle(&path);
        }
    }

    /// Open the selected folder
    pub fn expand_selected(&mut self) {
        if let Some(path) = self.selected_folder_path() {
            self.expansion.expand(&path);
        }
    }

    /// Close the selected folder, or jump to the parent of a secret
    pub fn collapse_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };

        if row.node.is_folder() && self.expansion.is_expanded(row.node.path()) {
            let path = row.node.path().to_string();
            self.expansion.collapse(&path);
            return;
        }

        // Walk back to the nearest row one level up
        let depth = row.depth;
        if depth == 0 {
            return;
        }
        let rows = self.rows();
        if let Some(parent) = (0..self.selected).rev().find(|&i| rows[i].depth < depth) {
            self.selected = parent;
        }
    }

    /// Open the selected folder and everything below it
    pub fn expand_all_selected(&mut self) {
        let Some(tree) = &self.tree else {
            return;
        };
        let rows = visible_rows(tree, &self.query, &self.expansion);
        if let Some(row) = rows.get(self.selected) {
            if row.node.is_folder() {
                self.expansion.expand_all(row.node);
            }
        }
    }

    /// Close the selected folder only
    pub fn collapse_all_selected(&mut self) {
        let Some(tree) = &self.tree else {
            return;
        };
        let rows = visible_rows(tree, &self.query, &self.expansion);
        if let Some(row) = rows.get(self.selected) {
            if row.node.is_folder() {
                self.expansion.collapse_all(row.node);
            }
        }
    }

    pub fn start_search(&mut self) {
        self.mode = Mode::Search;
    }

    /// Leave the search box, keeping the query
    pub fn finish_search(&mut self) {
        self.mode = Mode::Browse;
    }

    pub fn clear_search(&mut self) {
        self.mode = Mode::Browse;
        self.set_query(String::new());
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut text = self.query.as_str().to_string();
        text.push(c);
        self.set_query(text);
    }

    pub fn pop_search_char(&mut self) {
        let mut text = self.query.as_str().to_string();
        text.pop();
        self.set_query(text);
    }

    fn set_query(&mut self, text: String) {
        self.query = Query::new(&text);
        self.selected = 0;
    }

    /// Web app link for the selected node's folder
    pub fn selected_url(&self) -> Option<String> {
        self.selected_row()
            .map(|row| data::web_url(&self.config, &self.credentials, &data::folder_of(row.node)))
    }

    pub fn open_selected(&mut self) {
        let Some(url) = self.selected_url() else {
            return;
        };
        self.status = Some(match open::that(&url) {
            Ok(()) => format!("Opened {}", url),
            Err(e) => format!("Could not open browser: {}", e),
        });
    }

    fn selected_folder_path(&self) -> Option<String> {
        self.selected_row()
            .filter(|row| row.node.is_folder())
            .map(|row| row.node.path().to_string())
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
