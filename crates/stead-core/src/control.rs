//! The primary action control.
//!
//! The button's label and enabled state are a pure function of the game's
//! pending action. The table is a single exhaustive match: a new
//! [`PendingAction`] variant without an entry is a compile error, so an
//! unknown action can never silently no-op at runtime.

use crate::game::PendingAction;

/// What the button should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub label: &'static str,
    pub enabled: bool,
}

/// Look up the control presentation for an action.
pub fn control_state(action: PendingAction) -> ControlState {
    match action {
        PendingAction::BuildVillage => ControlState {
            label: "place a village",
            enabled: false,
        },
        PendingAction::BuildRoad => ControlState {
            label: "place a road",
            enabled: false,
        },
        PendingAction::RollDice => ControlState {
            label: "roll the dice",
            enabled: true,
        },
        PendingAction::NextTurn => ControlState {
            label: "end the turn",
            enabled: true,
        },
        PendingAction::SelectCards => ControlState {
            label: "select cards to discard",
            enabled: false,
        },
        PendingAction::DiscardCards => ControlState {
            label: "discard the selected cards",
            enabled: true,
        },
        PendingAction::PlaceRobber => ControlState {
            label: "place the robber",
            enabled: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_entries_are_exactly_the_dispatchable_actions() {
        let dispatchable = [
            PendingAction::RollDice,
            PendingAction::NextTurn,
            PendingAction::DiscardCards,
        ];
        let waiting = [
            PendingAction::BuildVillage,
            PendingAction::BuildRoad,
            PendingAction::SelectCards,
            PendingAction::PlaceRobber,
        ];

        for action in dispatchable {
            assert!(control_state(action).enabled, "{action:?}");
        }
        for action in waiting {
            assert!(!control_state(action).enabled, "{action:?}");
        }
    }

    #[test]
    fn every_entry_has_a_label() {
        for action in [
            PendingAction::BuildVillage,
            PendingAction::BuildRoad,
            PendingAction::RollDice,
            PendingAction::NextTurn,
            PendingAction::SelectCards,
            PendingAction::DiscardCards,
            PendingAction::PlaceRobber,
        ] {
            assert!(!control_state(action).label.is_empty());
        }
    }
}
