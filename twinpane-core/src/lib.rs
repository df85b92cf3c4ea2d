pub mod error;

pub mod config;

pub mod identity;
pub use identity::Identity;

pub mod fs {
    pub mod dir_scanner;
    pub mod object_info;
    pub use object_info::FileEntry;
    pub mod owner;
    pub mod working_dir;
}

pub mod model {
    pub mod command_line;
    pub mod dir_command;
    pub use dir_command::{ColumnConfig, DirCommand, SortMode};
    pub mod list_row;
    pub use list_row::ListRow;
    pub mod pane;
    pub use pane::PaneState;
    pub mod ui_state;
    pub use ui_state::{UIMode, UIState};
    pub mod view_state;
}

pub mod tasks {
    pub mod dir_worker;
    pub use dir_worker::{DirSnapshot, DirWorker};
    pub mod fuzzy_filter;
    pub mod worker_registry;
    pub use worker_registry::DirRegistry;
}

pub mod controller {
    pub mod actions;
    pub use actions::Action;

    pub mod event_loop;
    pub use event_loop::{AppEvent, EventLoop, Flow};

    pub mod keymap;
    pub use keymap::Keymap;

    pub mod navigator;
    pub use navigator::Navigator;
}

pub mod view {
    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod list_pane;
        pub use list_pane::ListPane;
        pub mod path_bar;
        pub use path_bar::PathBar;
        pub mod status_line;
        pub use status_line::StatusLine;
    }
}

pub mod logging;
pub use logging::Logger;

pub use error::AppError;
