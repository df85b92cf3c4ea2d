//! src/model/dir_command.rs
//! ============================================================================
//! # `DirCommand`: the directory worker command protocol
//!
//! Keybindings and the `:` line talk to directory workers with short string
//! tokens (`"filter foo"`, `"sort_by_size"`, `"hsize"`, ...). The strings are
//! parsed exactly once, here, into a closed enum; workers only ever see the
//! typed form. `Display` renders a command back to its token.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::fs::object_info::TimeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Name,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserColumn {
    #[default]
    Hidden,
    User,
    Group,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeColumn {
    #[default]
    Hidden,
    Human,
    Raw,
}

/// Which optional columns a worker renders on the right side of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnConfig {
    pub perm: bool,
    pub user: UserColumn,
    pub link_target: bool,
    pub link_count: bool,
    pub size: SizeColumn,
    pub time: Option<TimeKind>,
}

impl ColumnConfig {
    /// True when no optional column is on.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirCommand {
    /// Restrict the listing to names the fuzzy filter matches; empty clears.
    Filter(String),
    SortBy(SortMode),
    Perm(bool),
    User(UserColumn),
    LinkTarget(bool),
    LinkCount(bool),
    Size(SizeColumn),
    Time(Option<TimeKind>),
    /// Drop every optional column and the filter. Sort order is kept.
    ResetInfo,
}

impl DirCommand {
    /// Parses a batch, failing on the first unknown token.
    pub fn parse_all<I, S>(tokens: I) -> Result<Vec<Self>, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens.into_iter().map(|t| t.as_ref().parse()).collect()
    }
}

impl FromStr for DirCommand {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ' ');
        let name: &str = parts.next().unwrap_or_default();
        let arg: Option<&str> = parts.next();

        let cmd = match name {
            "filter" => Self::Filter(arg.unwrap_or_default().to_string()),
            "sort_by_name" => Self::SortBy(SortMode::Name),
            "sort_by_size" => Self::SortBy(SortMode::Size),
            "perm" => Self::Perm(true),
            "user_name" => Self::User(UserColumn::User),
            "group_name" => Self::User(UserColumn::Group),
            "user_group_name" => Self::User(UserColumn::Both),
            "link_target" => Self::LinkTarget(true),
            "link_count" => Self::LinkCount(true),
            "hsize" => Self::Size(SizeColumn::Human),
            "size" => Self::Size(SizeColumn::Raw),
            "atime" => Self::Time(Some(TimeKind::Access)),
            "ctime" => Self::Time(Some(TimeKind::Change)),
            "mtime" => Self::Time(Some(TimeKind::Modify)),
            "no_perm" => Self::Perm(false),
            "no_link_target" => Self::LinkTarget(false),
            "no_link_count" => Self::LinkCount(false),
            "no_size" => Self::Size(SizeColumn::Hidden),
            "no_user" => Self::User(UserColumn::Hidden),
            "no_time" => Self::Time(None),
            "reset_info" => Self::ResetInfo,
            _ => return Err(AppError::UnknownCommand(s.to_string())),
        };

        Ok(cmd)
    }
}

impl fmt::Display for DirCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token: &str = match self {
            Self::Filter(q) if q.is_empty() => "filter",
            Self::Filter(q) => return write!(f, "filter {q}"),
            Self::SortBy(SortMode::Name) => "sort_by_name",
            Self::SortBy(SortMode::Size) => "sort_by_size",
            Self::Perm(true) => "perm",
            Self::Perm(false) => "no_perm",
            Self::User(UserColumn::Hidden) => "no_user",
            Self::User(UserColumn::User) => "user_name",
            Self::User(UserColumn::Group) => "group_name",
            Self::User(UserColumn::Both) => "user_group_name",
            Self::LinkTarget(true) => "link_target",
            Self::LinkTarget(false) => "no_link_target",
            Self::LinkCount(true) => "link_count",
            Self::LinkCount(false) => "no_link_count",
            Self::Size(SizeColumn::Hidden) => "no_size",
            Self::Size(SizeColumn::Human) => "hsize",
            Self::Size(SizeColumn::Raw) => "size",
            Self::Time(None) => "no_time",
            Self::Time(Some(TimeKind::Access)) => "atime",
            Self::Time(Some(TimeKind::Change)) => "ctime",
            Self::Time(Some(TimeKind::Modify)) => "mtime",
            Self::ResetInfo => "reset_info",
        };

        f.write_str(token)
    }
}

impl ColumnConfig {
    /// Applies one column command; returns false for commands that are not
    /// about columns.
    pub fn apply(&mut self, cmd: &DirCommand) -> bool {
        match *cmd {
            DirCommand::Perm(on) => self.perm = on,
            DirCommand::User(col) => self.user = col,
            DirCommand::LinkTarget(on) => self.link_target = on,
            DirCommand::LinkCount(on) => self.link_count = on,
            DirCommand::Size(col) => self.size = col,
            DirCommand::Time(kind) => self.time = kind,
            DirCommand::ResetInfo => *self = Self::default(),
            DirCommand::Filter(_) | DirCommand::SortBy(_) => return false,
        }
        true
    }
}
