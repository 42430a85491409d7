//! Shipment lifecycle states and the transitions allowed between them.
//!
//! A shipment moves specimens between centres:
//! `Created -> Packed -> Sent -> Received -> Unpacked -> Completed`, or `Sent -> Lost`.
//! The UI may also step back one stage before a shipment is completed (for example to unpack
//! a packed shipment and add more specimens). `Completed` and `Lost` are terminal.
//!
//! Only the guard lives here; persisting the new state is the REST layer's job.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentState {
    Created,
    Packed,
    Sent,
    Received,
    Unpacked,
    Completed,
    Lost,
}

impl ShipmentState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ShipmentState::Completed | ShipmentState::Lost)
    }

    pub fn can_transition_to(self, to: ShipmentState) -> bool {
        use ShipmentState::*;
        matches!(
            (self, to),
            (Created, Packed)
                | (Packed, Sent)
                | (Sent, Received)
                | (Sent, Lost)
                | (Received, Unpacked)
                | (Unpacked, Completed)
                | (Packed, Created)
                | (Sent, Packed)
                | (Received, Sent)
                | (Unpacked, Received)
        )
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if `to` is not reachable from `self`.
    pub fn transition(self, to: ShipmentState) -> CoreResult<ShipmentState> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            tracing::debug!(from = %self, %to, "shipment transition rejected");
            Err(CoreError::InvalidTransition { from: self, to })
        }
    }
}

impl fmt::Display for ShipmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShipmentState::Created => "Created",
            ShipmentState::Packed => "Packed",
            ShipmentState::Sent => "Sent",
            ShipmentState::Received => "Received",
            ShipmentState::Unpacked => "Unpacked",
            ShipmentState::Completed => "Completed",
            ShipmentState::Lost => "Lost",
        };
        f.write_str(s)
    }
}

impl FromStr for ShipmentState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "created" => Ok(ShipmentState::Created),
            "packed" => Ok(ShipmentState::Packed),
            "sent" => Ok(ShipmentState::Sent),
            "received" => Ok(ShipmentState::Received),
            "unpacked" => Ok(ShipmentState::Unpacked),
            "completed" => Ok(ShipmentState::Completed),
            "lost" => Ok(ShipmentState::Lost),
            _ => Err(CoreError::Validation(format!("unknown shipment state: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_path_reaches_completed() {
        let state = ShipmentState::Created
            .transition(ShipmentState::Packed)
            .and_then(|s| s.transition(ShipmentState::Sent))
            .and_then(|s| s.transition(ShipmentState::Received))
            .and_then(|s| s.transition(ShipmentState::Unpacked))
            .and_then(|s| s.transition(ShipmentState::Completed))
            .expect("forward path");
        assert_eq!(state, ShipmentState::Completed);
        assert!(state.is_terminal());
    }

    #[test]
    fn sent_shipment_can_be_lost() {
        let state = ShipmentState::Sent
            .transition(ShipmentState::Lost)
            .expect("lost");
        assert!(state.is_terminal());
    }

    #[test]
    fn skipping_a_stage_is_rejected() {
        let err = ShipmentState::Created
            .transition(ShipmentState::Sent)
            .expect_err("skip");
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                from: ShipmentState::Created,
                to: ShipmentState::Sent
            }
        ));
        assert_eq!(
            err.to_string(),
            "invalid shipment state transition: Created -> Sent"
        );
    }

    #[test]
    fn terminal_states_are_final() {
        for to in [
            ShipmentState::Created,
            ShipmentState::Sent,
            ShipmentState::Received,
            ShipmentState::Unpacked,
        ] {
            assert!(!ShipmentState::Completed.can_transition_to(to));
            assert!(!ShipmentState::Lost.can_transition_to(to));
        }
    }

    #[test]
    fn one_step_back_is_allowed() {
        assert!(ShipmentState::Packed.can_transition_to(ShipmentState::Created));
        assert!(ShipmentState::Unpacked.can_transition_to(ShipmentState::Received));
        assert!(!ShipmentState::Received.can_transition_to(ShipmentState::Created));
    }

    #[test]
    fn parses_state_names() {
        assert_eq!(
            "Unpacked".parse::<ShipmentState>().expect("parse"),
            ShipmentState::Unpacked
        );
        assert_eq!(
            "lost".parse::<ShipmentState>().expect("parse"),
            ShipmentState::Lost
        );
        assert!("shipped".parse::<ShipmentState>().is_err());
    }
}
