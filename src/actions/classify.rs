//! Classification flags derived from an action's category.

use serde::Serialize;

use super::opcodes::ActionCategory;

/// Derived classification of one action.
///
/// The flags are independent booleans, but the opcode table gives every
/// opcode a single category, so at most one is ever set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionFlags {
    /// Places a building.
    pub is_build_action: bool,
    /// Queues a unit.
    pub is_train_action: bool,
    /// Move, attack, stop or hold.
    pub is_micro_action: bool,
    /// Only changes the selection.
    pub is_selection_only: bool,
}

impl ActionFlags {
    /// Returns whether the action counts toward EAPM.
    #[must_use]
    pub const fn is_effective(&self) -> bool {
        self.is_build_action || self.is_train_action || self.is_micro_action
    }

    /// Returns whether the action belongs in a build order.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        self.is_build_action || self.is_train_action
    }
}

/// Maps a category onto its flags.
///
/// # Example
///
/// ```
/// use bwrep_parser::actions::{classify, ActionCategory};
///
/// let flags = classify(ActionCategory::Train);
/// assert!(flags.is_train_action);
/// assert!(flags.is_effective());
/// assert!(!classify(ActionCategory::Selection).is_effective());
/// ```
#[must_use]
pub const fn classify(category: ActionCategory) -> ActionFlags {
    ActionFlags {
        is_build_action: matches!(category, ActionCategory::Build),
        is_train_action: matches!(category, ActionCategory::Train),
        is_micro_action: matches!(category, ActionCategory::Micro),
        is_selection_only: matches!(category, ActionCategory::Selection),
    }
}
