//! Availability Service - Call admission policy
//!
//! Rule-based availability checks for inbound calls. Rejection
//! reasons are fixed strings surfaced to the caller verbatim.

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};

use kizuna::{Availability, AvailabilityPolicy, DomainError, User};

/// Quiet-hours window (UTC) and activity rules
#[derive(Debug, Clone)]
pub struct AvailabilityConfig {
    /// Hour (0-23) at which quiet hours begin
    pub quiet_start_hour: u32,
    /// Hour (0-23) at which quiet hours end
    pub quiet_end_hour: u32,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            quiet_start_hour: 23,
            quiet_end_hour: 7,
        }
    }
}

/// Rule-based availability policy
pub struct RuleAvailability {
    config: AvailabilityConfig,
}

impl RuleAvailability {
    pub fn new(config: Option<AvailabilityConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
        }
    }

    fn decide_at(&self, user: &User, now: DateTime<Utc>) -> Availability {
        // Priority 1: paused accounts take no calls
        if !user.active {
            return Availability::Unavailable {
                reason: "This companion is paused right now. Reactivate it in the app to call."
                    .to_string(),
            };
        }

        // Priority 2: quiet hours
        if in_quiet_hours(now.hour(), self.config.quiet_start_hour, self.config.quiet_end_hour) {
            return Availability::Unavailable {
                reason: "It's quiet hours right now. Try calling back in the morning.".to_string(),
            };
        }

        Availability::Available
    }
}

#[async_trait]
impl AvailabilityPolicy for RuleAvailability {
    async fn check(&self, user: &User) -> Result<Availability, DomainError> {
        Ok(self.decide_at(user, Utc::now()))
    }
}

/// Whether `hour` falls inside a window that may wrap midnight
fn in_quiet_hours(hour: u32, start: u32, end: u32) -> bool {
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}
