//! Error types for the dashboard shell.

use divedash_layout::LayoutError;

/// Reasons the shell rejects an action.
///
/// Rejections never change the dashboard; the app turns them into notices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    /// The stored dashboard has not been loaded yet.
    #[error("the dashboard is still loading")]
    Loading,

    /// A save is in flight.
    #[error("a save is in progress")]
    Saving,

    /// The action needs edit mode.
    #[error("press e to edit the dashboard first")]
    NotEditing,

    /// The action needs a selected widget.
    #[error("no widget selected")]
    NothingSelected,

    /// The layout engine refused the mutation.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// A specialized Result type for shell actions.
pub type Result<T> = std::result::Result<T, ShellError>;
