use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::View;
use crate::shop::ItemId;
use crate::task::{AssignmentId, GoalId};

/// Every observable state change in a session produces an Event.
/// Commands return the events they caused; the presentation layer decides
/// how to show them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// An assignment moved into `Completed` from any other status.
    AssignmentCompleted {
        id: AssignmentId,
        points: u32,
        message: String,
        at: DateTime<Utc>,
    },
    /// A goal went from not done to done.
    GoalCompleted {
        id: GoalId,
        points: u32,
        message: String,
        at: DateTime<Utc>,
    },
    /// The experience total crossed a stage threshold, in either direction.
    StageChanged {
        from: String,
        to: String,
        experience: u64,
        at: DateTime<Utc>,
    },
    ItemPurchased {
        id: ItemId,
        price: u32,
        balance: u32,
        at: DateTime<Utc>,
    },
    /// The pet's speech bubble changed outside of a celebration.
    MessageChanged {
        message: String,
        at: DateTime<Utc>,
    },
    ViewChanged {
        from: View,
        to: View,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Text the pet says for this event, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Event::AssignmentCompleted { message, .. }
            | Event::GoalCompleted { message, .. }
            | Event::MessageChanged { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Event::AssignmentCompleted { .. } | Event::GoalCompleted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::ItemPurchased {
            id: ItemId(3),
            price: 75,
            balance: 175,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ItemPurchased");
        assert_eq!(json["id"], 3);
    }

    #[test]
    fn completion_events_carry_a_message() {
        let event = Event::GoalCompleted {
            id: GoalId(7),
            points: 20,
            message: "Nice one!".to_string(),
            at: Utc::now(),
        };
        assert!(event.is_completion());
        assert_eq!(event.message(), Some("Nice one!"));

        let stage = Event::StageChanged {
            from: "Egg".to_string(),
            to: "Child".to_string(),
            experience: 50,
            at: Utc::now(),
        };
        assert!(!stage.is_completion());
        assert_eq!(stage.message(), None);
    }
}
