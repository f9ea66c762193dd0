// ABOUTME: UI components for the dashboard: repository list, command log console, status bar and overlays

pub mod add_repo;
pub mod command_log;
pub mod confirmation_dialog;
pub mod help;
pub mod layout;
pub mod repo_list;
pub mod status_bar;

pub use add_repo::AddRepoComponent;
pub use command_log::CommandLogComponent;
pub use confirmation_dialog::ConfirmationDialogComponent;
pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use repo_list::RepoListComponent;
pub use status_bar::StatusBarComponent;
