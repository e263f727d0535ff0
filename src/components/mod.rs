//! UI Components
//!
//! Pages and reusable Leptos components.

mod activity_feed;
mod archived_panel;
mod auth_pages;
mod board_column;
mod board_list;
mod board_view;
mod card_detail;
mod card_members;
mod delete_confirm_button;
mod label_manager;
mod navbar;
mod notification_bell;
mod search_panel;
mod settings_page;
mod share_board_panel;
mod toast_host;
mod user_picker;
mod workspace_page;
mod workspace_tab_bar;

pub use activity_feed::{ActivityFeed, ActivityPage};
pub use archived_panel::ArchivedPanel;
pub use auth_pages::{ForgotPasswordPage, LoginPage, RegisterPage, ResetPasswordPage, VerifyEmailPage};
pub use board_column::{BoardColumnView, DropMarker};
pub use board_list::BoardList;
pub use board_view::{use_board, BoardView};
pub use card_detail::CardDetail;
pub use card_members::CardMembers;
pub use delete_confirm_button::DeleteConfirmButton;
pub use label_manager::LabelManager;
pub use navbar::Navbar;
pub use notification_bell::NotificationBell;
pub use search_panel::SearchPanel;
pub use settings_page::SettingsPage;
pub use share_board_panel::{member_display_name, ShareBoardPanel};
pub use toast_host::{LoadingBar, ToastHost};
pub use user_picker::UserPicker;
pub use workspace_page::WorkspacePage;
pub use workspace_tab_bar::WorkspaceTabBar;
