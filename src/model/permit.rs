use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PermitType {
    Paid,
    Unpaid,
    InternalActivity,
}

impl PermitType {
    pub fn as_str(&self) -> &str {
        match self {
            PermitType::Paid => "paid",
            PermitType::Unpaid => "unpaid",
            PermitType::InternalActivity => "internal_activity",
        }
    }
}

/// Validates the requested span: the range must not be inverted, and a time
/// range is either absent or fully specified with start before end.
pub fn validate_span(
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> Result<(), &'static str> {
    if start_date > end_date {
        return Err("start_date cannot be after end_date");
    }

    match (start_time, end_time) {
        (None, None) => Ok(()),
        (Some(s), Some(e)) => {
            if start_date == end_date && s >= e {
                Err("start_time must be before end_time")
            } else {
                Ok(())
            }
        }
        _ => Err("start_time and end_time must be provided together"),
    }
}

/// Calendar days covered by the request, inclusive of both endpoints.
pub fn requested_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn span_accepts_plain_date_range() {
        assert!(validate_span(d("2026-03-02"), d("2026-03-04"), None, None).is_ok());
    }

    #[test]
    fn span_rejects_inverted_dates() {
        assert!(validate_span(d("2026-03-04"), d("2026-03-02"), None, None).is_err());
    }

    #[test]
    fn span_rejects_half_specified_time_range() {
        assert!(validate_span(d("2026-03-02"), d("2026-03-02"), Some(t("08:00")), None).is_err());
        assert!(validate_span(d("2026-03-02"), d("2026-03-02"), None, Some(t("12:00"))).is_err());
    }

    #[test]
    fn span_rejects_inverted_times_on_same_day() {
        assert!(
            validate_span(d("2026-03-02"), d("2026-03-02"), Some(t("14:00")), Some(t("09:00")))
                .is_err()
        );
    }

    #[test]
    fn span_allows_times_across_days() {
        // Overnight shift permit: times belong to different days.
        assert!(
            validate_span(d("2026-03-02"), d("2026-03-03"), Some(t("22:00")), Some(t("06:00")))
                .is_ok()
        );
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(requested_days(d("2026-03-02"), d("2026-03-02")), 1);
        assert_eq!(requested_days(d("2026-03-02"), d("2026-03-06")), 5);
    }
}
