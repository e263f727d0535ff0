//! Role Checks
//!
//! UI-level gating only; the backend enforces the real rules.

use crate::models::{CardRole, MemberRole};

use MemberRole::{Admin, Member, Owner};

fn is_manager(role: MemberRole) -> bool {
    matches!(role, Owner | Admin)
}

fn is_contributor(role: MemberRole) -> bool {
    matches!(role, Owner | Admin | Member)
}

// ========================
// Workspace
// ========================

pub fn can_edit_workspace(role: MemberRole) -> bool {
    is_manager(role)
}

pub fn can_delete_workspace(role: MemberRole) -> bool {
    role == Owner
}

pub fn can_manage_workspace_members(role: MemberRole) -> bool {
    is_manager(role)
}

// ========================
// Board
// ========================

pub fn can_edit_board(role: MemberRole) -> bool {
    is_manager(role)
}

pub fn can_delete_board(role: MemberRole) -> bool {
    role == Owner
}

pub fn can_manage_board_members(role: MemberRole) -> bool {
    is_manager(role)
}

pub fn can_create_column(role: MemberRole) -> bool {
    is_contributor(role)
}

pub fn can_edit_column(role: MemberRole) -> bool {
    is_contributor(role)
}

pub fn can_delete_column(role: MemberRole) -> bool {
    is_manager(role)
}

pub fn can_create_card(role: MemberRole) -> bool {
    is_contributor(role)
}

pub fn can_manage_labels(role: MemberRole) -> bool {
    is_contributor(role)
}

// ========================
// Card
// ========================

/// Contributors edit any card; viewers only cards they are assigned to
pub fn can_edit_card(board_role: MemberRole, card_role: Option<CardRole>) -> bool {
    is_contributor(board_role) || card_role == Some(CardRole::Assignee)
}

pub fn can_delete_card(board_role: MemberRole) -> bool {
    is_contributor(board_role)
}

pub fn can_add_comment(_board_role: MemberRole) -> bool {
    true
}

/// Authors edit their own comments; managers edit any
pub fn can_edit_comment(author_id: &str, current_user_id: &str, board_role: MemberRole) -> bool {
    author_id == current_user_id || is_manager(board_role)
}

pub fn can_delete_comment(author_id: &str, current_user_id: &str, board_role: MemberRole) -> bool {
    can_edit_comment(author_id, current_user_id, board_role)
}
