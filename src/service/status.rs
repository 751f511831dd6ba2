//! Appointment status transition rules.

use crate::error::{Result, ScheduleError};
use crate::model::AppointmentStatus;

/// Validate a status transition.
///
/// The lifecycle moves forward only: `pending -> scheduled -> completed`,
/// with `pending -> completed` as a permitted skip, and either active
/// status may move to `cancelled`. `completed` and `cancelled` are
/// terminal. Re-asserting the current status is a valid no-op.
pub fn validate_transition(from: AppointmentStatus, to: AppointmentStatus) -> Result<()> {
    use AppointmentStatus::*;

    if from == to {
        return Ok(());
    }

    let allowed = match from {
        Pending => matches!(to, Scheduled | Completed | Cancelled),
        Scheduled => matches!(to, Completed | Cancelled),
        Completed | Cancelled => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(ScheduleError::InvalidStateTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(validate_transition(Pending, Scheduled).is_ok());
        assert!(validate_transition(Pending, Completed).is_ok());
        assert!(validate_transition(Scheduled, Completed).is_ok());
    }

    #[test]
    fn test_cancellation_from_active_statuses() {
        assert!(validate_transition(Pending, Cancelled).is_ok());
        assert!(validate_transition(Scheduled, Cancelled).is_ok());
    }

    #[test]
    fn test_terminal_statuses_admit_nothing() {
        for target in [Pending, Scheduled, Cancelled] {
            assert!(matches!(
                validate_transition(Completed, target),
                Err(ScheduleError::InvalidStateTransition { .. })
            ));
        }
        for target in [Pending, Scheduled, Completed] {
            assert!(matches!(
                validate_transition(Cancelled, target),
                Err(ScheduleError::InvalidStateTransition { .. })
            ));
        }
    }

    #[test]
    fn test_no_backward_transition() {
        assert!(validate_transition(Scheduled, Pending).is_err());
    }

    #[test]
    fn test_same_status_is_a_no_op() {
        for status in [Pending, Scheduled, Completed, Cancelled] {
            assert!(validate_transition(status, status).is_ok());
        }
    }
}
