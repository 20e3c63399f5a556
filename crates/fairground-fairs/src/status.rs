//! Fair liveness evaluation.
//!
//! A fair is visible to the public either because an administrator
//! toggled it live (manual override) or because the current instant
//! falls inside its scheduled window. The manual flag wins
//! unconditionally, even outside any scheduled window.

use chrono::{DateTime, Utc};
use fairground_core::models::fair::Fair;

/// What made the fair live (or not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveSource {
    /// The manual override flag — also reported when no schedule is
    /// active, matching the platform's public status contract.
    Manual,
    /// The scheduled `[start_time, end_time]` window.
    Schedule,
}

/// Result of a liveness evaluation.
#[derive(Debug, Clone)]
pub struct FairStatus {
    pub is_live: bool,
    pub source: LiveSource,
    pub name: String,
    pub description: Option<String>,
}

/// Evaluate a fair's liveness at the given instant.
///
/// Precedence, in strict order:
/// 1. `is_live == true` → live via [`LiveSource::Manual`].
/// 2. Both schedule ends set and `start_time <= now <= end_time`
///    (inclusive on both ends) → live via [`LiveSource::Schedule`].
/// 3. Otherwise not live.
///
/// Pure — no I/O, no clock access.
pub fn evaluate(fair: &Fair, now: DateTime<Utc>) -> FairStatus {
    if fair.is_live {
        return FairStatus {
            is_live: true,
            source: LiveSource::Manual,
            name: fair.name.clone(),
            description: fair.description.clone(),
        };
    }

    if let (Some(start), Some(end)) = (fair.start_time, fair.end_time) {
        if start <= now && now <= end {
            return FairStatus {
                is_live: true,
                source: LiveSource::Schedule,
                name: fair.name.clone(),
                description: fair.description.clone(),
            };
        }
    }

    FairStatus {
        is_live: false,
        source: LiveSource::Manual,
        name: fair.name.clone(),
        description: fair.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn fair(
        is_live: bool,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Fair {
        let admin = Uuid::new_v4();
        Fair {
            id: Uuid::new_v4(),
            name: "Spring Career Fair".into(),
            description: Some("Annual spring hiring event".into()),
            is_live,
            start_time,
            end_time,
            invite_code: "AB12CD34".into(),
            created_at: Utc::now(),
            created_by: admin,
            updated_at: Utc::now(),
            updated_by: admin,
        }
    }

    #[test]
    fn manual_override_wins_outside_window() {
        let now = Utc::now();
        // Window ended an hour ago, but the manual flag is set.
        let f = fair(
            true,
            Some(now - Duration::hours(3)),
            Some(now - Duration::hours(1)),
        );

        let status = evaluate(&f, now);
        assert!(status.is_live);
        assert_eq!(status.source, LiveSource::Manual);
    }

    #[test]
    fn schedule_window_makes_fair_live() {
        let now = Utc::now();
        let f = fair(
            false,
            Some(now - Duration::hours(1)),
            Some(now + Duration::hours(1)),
        );

        let status = evaluate(&f, now);
        assert!(status.is_live);
        assert_eq!(status.source, LiveSource::Schedule);
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let start = Utc::now();
        let end = start + Duration::hours(1);
        let f = fair(false, Some(start), Some(end));

        assert!(evaluate(&f, start).is_live);
        assert!(evaluate(&f, end).is_live);
        assert!(!evaluate(&f, end + Duration::milliseconds(1)).is_live);
        assert!(!evaluate(&f, start - Duration::milliseconds(1)).is_live);
    }

    #[test]
    fn half_open_schedule_is_never_live() {
        let now = Utc::now();
        // Only one end of the window set — the schedule never applies.
        let f = fair(false, Some(now - Duration::hours(1)), None);
        assert!(!evaluate(&f, now).is_live);

        let f = fair(false, None, Some(now + Duration::hours(1)));
        assert!(!evaluate(&f, now).is_live);
    }

    #[test]
    fn not_live_reports_manual_source() {
        let f = fair(false, None, None);
        let status = evaluate(&f, Utc::now());
        assert!(!status.is_live);
        assert_eq!(status.source, LiveSource::Manual);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let now = Utc::now();
        let f = fair(false, Some(now - Duration::hours(1)), Some(now + Duration::hours(1)));

        let first = evaluate(&f, now);
        let second = evaluate(&f, now);
        assert_eq!(first.is_live, second.is_live);
        assert_eq!(first.source, second.source);
    }
}
