//! Interview access gate.
//!
//! Classification is pure date arithmetic over the stored status and
//! `scheduled_date`. The passcode check is a usability gate for the join
//! button; it is not access control, since anyone holding the meeting URL can
//! join.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::interview::{Interview, InterviewStatus};

pub const UPCOMING_WINDOW_MINUTES: i64 = 30;
pub const LIVE_LEAD_MINUTES: i64 = 15;
pub const LIVE_TAIL_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    Scheduled,
    Upcoming,
    Live,
    Past,
    Completed,
    Cancelled,
}

impl AccessStatus {
    pub fn can_join(&self) -> bool {
        matches!(self, AccessStatus::Upcoming | AccessStatus::Live)
    }
}

pub fn classify(
    status: InterviewStatus,
    scheduled_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AccessStatus {
    match status {
        InterviewStatus::Completed => return AccessStatus::Completed,
        InterviewStatus::Cancelled => return AccessStatus::Cancelled,
        InterviewStatus::Scheduled => {}
    }

    let live_from = scheduled_date - Duration::minutes(LIVE_LEAD_MINUTES);
    let live_until = scheduled_date + Duration::minutes(LIVE_TAIL_MINUTES);
    let upcoming_from = scheduled_date - Duration::minutes(UPCOMING_WINDOW_MINUTES);

    if now > live_until {
        AccessStatus::Past
    } else if now >= live_from {
        AccessStatus::Live
    } else if now >= upcoming_from {
        AccessStatus::Upcoming
    } else {
        AccessStatus::Scheduled
    }
}

impl Interview {
    pub fn access_status(&self, now: DateTime<Utc>) -> AccessStatus {
        classify(self.status, self.scheduled_date, now)
    }
}

pub fn passcode_matches(stored: &str, supplied: &str) -> bool {
    let supplied = supplied.trim();
    !supplied.is_empty() && stored.trim().to_lowercase() == supplied.to_lowercase()
}
