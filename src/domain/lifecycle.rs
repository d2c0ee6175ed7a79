//! Application status lifecycle.
//!
//! ```text
//! pending ──► shortlisted ──► interview_scheduled
//!    │
//!    └──────► rejected
//! ```
//!
//! `rejected` and `interview_scheduled` are terminal. No operation moves an
//! application backwards.

use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::notification::NotificationKind;

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::InterviewScheduled
        )
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Shortlisted)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
                | (
                    ApplicationStatus::Shortlisted,
                    ApplicationStatus::InterviewScheduled
                )
        )
    }

    pub fn transition_to(&self, next: ApplicationStatus) -> Result<ApplicationStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }
}

/// Notification sent to the student when their application changes state.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusNotice {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

pub fn submission_notice(job_title: &str) -> StatusNotice {
    StatusNotice {
        title: "Application Submitted Successfully!".to_string(),
        message: format!(
            "Your application for {} has been submitted. We'll notify you when its status changes.",
            job_title
        ),
        kind: NotificationKind::Success,
    }
}

pub fn shortlisted_notice(job_title: &str) -> StatusNotice {
    StatusNotice {
        title: "Application Shortlisted!".to_string(),
        message: format!(
            "Congratulations! Your application for {} has been shortlisted.",
            job_title
        ),
        kind: NotificationKind::Success,
    }
}

pub fn rejected_notice(job_title: &str) -> StatusNotice {
    StatusNotice {
        title: "Application Update".to_string(),
        message: format!(
            "Thank you for your interest in {}. Unfortunately, we have decided to move forward with other candidates.",
            job_title
        ),
        kind: NotificationKind::Info,
    }
}

pub fn interview_notice(job_title: &str, when: &str, passcode: &str) -> StatusNotice {
    StatusNotice {
        title: "Interview Scheduled!".to_string(),
        message: format!(
            "Your interview for {} is scheduled for {}. Use passcode {} to join.",
            job_title, when, passcode
        ),
        kind: NotificationKind::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    const ALL: [ApplicationStatus; 4] = [Pending, Shortlisted, Rejected, InterviewScheduled];

    #[test]
    fn only_forward_edges_are_allowed() {
        let allowed = [
            (Pending, Shortlisted),
            (Pending, Rejected),
            (Shortlisted, InterviewScheduled),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [Rejected, InterviewScheduled] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(from.transition_to(to).is_err());
            }
        }
        assert!(!Pending.is_terminal());
        assert!(!Shortlisted.is_terminal());
    }

    #[test]
    fn pending_cannot_skip_to_interview() {
        match Pending.transition_to(InterviewScheduled) {
            Err(Error::InvalidTransition { from, to }) => {
                assert_eq!(from, Pending);
                assert_eq!(to, InterviewScheduled);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn notices_are_never_blank() {
        let notices = [
            submission_notice("Backend Engineer"),
            shortlisted_notice("Backend Engineer"),
            rejected_notice("Backend Engineer"),
            interview_notice("Backend Engineer", "2024-07-01 10:00 UTC", "ABC12345"),
        ];
        for notice in notices {
            assert!(!notice.title.is_empty());
            assert!(notice.message.contains("Backend Engineer"));
        }
        assert_eq!(rejected_notice("x").kind, NotificationKind::Info);
        assert_eq!(shortlisted_notice("x").kind, NotificationKind::Success);
    }
}
