use super::*;
use crate::chore::Recurrence;
use chrono::{FixedOffset, MappedLocalTime, TimeZone};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn chore(due: DateTime<Utc>, rule: Recurrence) -> Chore {
    let mut chore = Chore::new("Water the plants", due).with_recurrence(rule);
    chore.id = "plants".to_string();
    chore
}

fn dates(occurrences: &[Occurrence]) -> Vec<DateTime<Utc>> {
    occurrences.iter().map(|o| o.occurrence_date).collect()
}

#[test]
fn daily_chore_yields_one_per_day_at_due_time() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 1, 9, 0), Recurrence::Daily);

    let occ = engine.expand_in_range(&c, day(2024, 1, 1), day(2024, 1, 3));

    assert_eq!(
        dates(&occ),
        vec![utc(2024, 1, 1, 9, 0), utc(2024, 1, 2, 9, 0), utc(2024, 1, 3, 9, 0)]
    );
    assert_eq!(occ[0].occurrence_id, "plants-2024-01-01T09:00:00.000Z");
    assert_eq!(occ[2].occurrence_id, "plants-2024-01-03T09:00:00.000Z");
    assert!(occ.iter().all(|o| o.chore == c));
}

#[test]
fn weekly_chore_skips_anchor_before_range() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 1, 0, 0), Recurrence::Weekly);

    let occ = engine.expand_in_range(&c, day(2024, 1, 2), day(2024, 1, 8));

    assert_eq!(dates(&occ), vec![utc(2024, 1, 8, 0, 0)]);
}

#[test]
fn monthly_chore_on_31st_clamps_to_leap_day() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 31, 9, 0), Recurrence::Monthly);

    let occ = engine.expand_in_range(&c, day(2024, 2, 1), day(2024, 2, 29));

    assert_eq!(dates(&occ), vec![utc(2024, 2, 29, 9, 0)]);
}

#[test]
fn monthly_steps_from_previous_occurrence() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 31, 9, 0), Recurrence::Monthly);

    let occ = engine.expand_in_range(&c, day(2024, 1, 1), day(2024, 4, 30));

    assert_eq!(
        dates(&occ),
        vec![
            utc(2024, 1, 31, 9, 0),
            utc(2024, 2, 29, 9, 0),
            utc(2024, 3, 29, 9, 0),
            utc(2024, 4, 29, 9, 0),
        ]
    );
}

#[test]
fn first_occurrence_inside_a_later_range() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 1, 9, 0), Recurrence::Daily);

    let occ = engine.expand_in_range(&c, day(2024, 1, 5), day(2024, 1, 5));

    assert_eq!(dates(&occ), vec![utc(2024, 1, 5, 9, 0)]);
}

#[test]
fn one_time_chore_range_edges_are_inclusive() {
    let engine = RecurrenceEngine::utc();

    let at_midnight = chore(utc(2024, 1, 1, 0, 0), Recurrence::None);
    assert_eq!(engine.expand_in_range(&at_midnight, day(2024, 1, 1), day(2024, 1, 2)).len(), 1);

    let last_ms = chore(
        Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 59).unwrap() + Duration::milliseconds(999),
        Recurrence::None,
    );
    assert_eq!(engine.expand_in_range(&last_ms, day(2024, 1, 1), day(2024, 1, 2)).len(), 1);

    let next_day = chore(utc(2024, 1, 3, 0, 0), Recurrence::None);
    assert!(engine.expand_in_range(&next_day, day(2024, 1, 1), day(2024, 1, 2)).is_empty());
}

#[test]
fn one_time_occurrence_keeps_chore_id() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 1, 9, 0), Recurrence::None);

    let occ = engine.expand_in_range(&c, day(2024, 1, 1), day(2024, 1, 1));

    assert_eq!(occ.len(), 1);
    assert_eq!(occ[0].occurrence_id, "plants");
    assert_eq!(occ[0].occurrence_date, c.due_date);
}

#[test]
fn unrecognized_rule_behaves_like_none() {
    let engine = RecurrenceEngine::utc();
    let json = r#"{"id":"plants","title":"Water the plants","due_date":"2024-01-01T09:00:00Z","recurrence":"hourly"}"#;
    let odd: Chore = serde_json::from_str(json).unwrap();
    let plain = chore(utc(2024, 1, 1, 9, 0), Recurrence::None);

    for (start, end) in [(day(2024, 1, 1), day(2024, 1, 31)), (day(2024, 1, 2), day(2024, 1, 31))] {
        assert_eq!(
            engine.expand_in_range(&odd, start, end),
            engine.expand_in_range(&plain, start, end)
        );
    }
}

#[test]
fn inverted_range_is_empty() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 1, 9, 0), Recurrence::Daily);

    assert_eq!(engine.try_expand_in_range(&c, day(2024, 1, 5), day(2024, 1, 1)), Ok(Vec::new()));
}

#[test]
fn range_before_anchor_is_empty() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 6, 1, 9, 0), Recurrence::Weekly);

    assert_eq!(engine.try_expand_in_range(&c, day(2024, 1, 1), day(2024, 1, 31)), Ok(Vec::new()));
}

#[test]
fn step_cap_reports_unreachable_range() {
    let engine = RecurrenceEngine::utc().with_max_steps(10);
    let c = chore(utc(2024, 1, 1, 9, 0), Recurrence::Daily);

    assert_eq!(
        engine.try_expand_in_range(&c, day(2024, 3, 1), day(2024, 3, 2)),
        Err(RecurrenceError::RangeUnreachable {
            rule: Recurrence::Daily,
            steps: 10
        })
    );
    assert!(engine.expand_in_range(&c, day(2024, 3, 1), day(2024, 3, 2)).is_empty());
    assert!(!engine.is_occurrence_on_date(&c, day(2024, 3, 1)));
}

#[test]
fn step_cap_allows_range_ending_on_last_reachable_step() {
    let engine = RecurrenceEngine::utc().with_max_steps(2);
    let c = chore(utc(2024, 1, 1, 9, 0), Recurrence::Daily);

    let occ = engine.try_expand_in_range(&c, day(2024, 1, 1), day(2024, 1, 3)).unwrap();
    assert_eq!(
        dates(&occ),
        vec![utc(2024, 1, 1, 9, 0), utc(2024, 1, 2, 9, 0), utc(2024, 1, 3, 9, 0)]
    );

    assert_eq!(
        engine.try_expand_in_range(&c, day(2024, 1, 1), day(2024, 1, 4)),
        Err(RecurrenceError::RangeUnreachable {
            rule: Recurrence::Daily,
            steps: 2
        })
    );
}

#[test]
fn expansion_is_idempotent() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2023, 11, 30, 17, 45), Recurrence::Monthly);

    let first = engine.expand_in_range(&c, day(2024, 1, 1), day(2024, 12, 31));
    let second = engine.expand_in_range(&c, day(2024, 1, 1), day(2024, 12, 31));

    assert_eq!(first.len(), 12);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn expand_all_concatenates_per_chore() {
    let engine = RecurrenceEngine::utc();
    let daily = chore(utc(2024, 1, 1, 9, 0), Recurrence::Daily);
    let once = chore(utc(2024, 1, 2, 12, 0), Recurrence::None);

    let occ = engine.expand_all([&daily, &once], day(2024, 1, 1), day(2024, 1, 2));

    assert_eq!(
        dates(&occ),
        vec![utc(2024, 1, 1, 9, 0), utc(2024, 1, 2, 9, 0), utc(2024, 1, 2, 12, 0)]
    );
}

#[test]
fn recurring_chore_is_on_its_own_due_day() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 1, 9, 0), Recurrence::Weekly);

    assert!(engine.is_occurrence_on_date(&c, day(2024, 1, 1)));
    assert!(engine.is_occurrence_on_date(&c, day(2024, 1, 8)));
    assert!(!engine.is_occurrence_on_date(&c, day(2024, 1, 9)));
    assert!(!engine.is_occurrence_on_date(&c, day(2023, 12, 25)));
}

#[test]
fn one_time_chore_is_on_due_day_only() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 1, 23, 0), Recurrence::None);

    assert!(engine.is_occurrence_on_date(&c, day(2024, 1, 1)));
    assert!(!engine.is_occurrence_on_date(&c, day(2024, 1, 2)));
}

#[test]
fn monthly_is_on_clamped_day() {
    let engine = RecurrenceEngine::utc();
    let c = chore(utc(2024, 1, 31, 9, 0), Recurrence::Monthly);

    assert!(engine.is_occurrence_on_date(&c, day(2024, 2, 29)));
    assert!(!engine.is_occurrence_on_date(&c, day(2024, 3, 31)));
    assert!(engine.is_occurrence_on_date(&c, day(2024, 3, 29)));
}

#[test]
fn next_occurrence_after_instant() {
    let engine = RecurrenceEngine::utc();
    let daily = chore(utc(2024, 1, 1, 9, 0), Recurrence::Daily);

    assert_eq!(engine.next_occurrence(&daily, &utc(2024, 1, 1, 8, 0)), Some(utc(2024, 1, 1, 9, 0)));
    assert_eq!(engine.next_occurrence(&daily, &utc(2024, 1, 1, 9, 0)), Some(utc(2024, 1, 2, 9, 0)));
    assert_eq!(engine.next_occurrence(&daily, &utc(2024, 1, 5, 10, 0)), Some(utc(2024, 1, 6, 9, 0)));

    let once = chore(utc(2024, 1, 1, 9, 0), Recurrence::None);
    assert_eq!(engine.next_occurrence(&once, &utc(2023, 12, 31, 0, 0)), Some(once.due_date));
    assert_eq!(engine.next_occurrence(&once, &utc(2024, 1, 2, 0, 0)), None);
}

#[test]
fn day_boundaries_follow_engine_zone() {
    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    let local = RecurrenceEngine::new(plus_two);
    let utc_engine = RecurrenceEngine::utc();
    // 01:30 on Jan 2 at +02:00
    let c = chore(utc(2024, 1, 1, 23, 30), Recurrence::None);

    assert_eq!(local.expand_in_range(&c, day(2024, 1, 2), day(2024, 1, 2)).len(), 1);
    assert!(utc_engine.expand_in_range(&c, day(2024, 1, 2), day(2024, 1, 2)).is_empty());
    assert!(local.is_occurrence_on_date(&c, day(2024, 1, 2)));
    assert_eq!(local.local_day(&c.due_date), day(2024, 1, 2));
}

#[test]
fn steps_keep_local_time_in_offset_zone() {
    let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
    let engine = RecurrenceEngine::new(minus_five);
    // 20:00 local on Jan 1
    let c = chore(utc(2024, 1, 2, 1, 0), Recurrence::Daily);

    let occ = engine.expand_in_range(&c, day(2024, 1, 1), day(2024, 1, 2));

    assert_eq!(dates(&occ), vec![utc(2024, 1, 2, 1, 0), utc(2024, 1, 3, 1, 0)]);
}

/// UTC+1, with UTC+2 summer time between 2024-03-31 01:00Z and 2024-10-27 01:00Z.
#[derive(Debug, Clone, Copy)]
struct SummerTime;

impl SummerTime {
    fn winter() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn summer() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }
}

impl TimeZone for SummerTime {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        SummerTime
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> MappedLocalTime<FixedOffset> {
        self.offset_from_local_datetime(&day_start(*local))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> MappedLocalTime<FixedOffset> {
        let fits = |offset: FixedOffset| {
            let utc = *local - Duration::seconds(i64::from(offset.local_minus_utc()));
            self.offset_from_utc_datetime(&utc) == offset
        };
        match (fits(Self::summer()), fits(Self::winter())) {
            (true, true) => MappedLocalTime::Ambiguous(Self::summer(), Self::winter()),
            (true, false) => MappedLocalTime::Single(Self::summer()),
            (false, true) => MappedLocalTime::Single(Self::winter()),
            (false, false) => MappedLocalTime::None,
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&day_start(*utc))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        let starts = day(2024, 3, 31).and_hms_opt(1, 0, 0).unwrap();
        let ends = day(2024, 10, 27).and_hms_opt(1, 0, 0).unwrap();
        if (starts..ends).contains(utc) {
            Self::summer()
        } else {
            Self::winter()
        }
    }
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

#[test]
fn resolve_local_moves_gap_times_forward_an_hour() {
    let engine = RecurrenceEngine::new(SummerTime);

    // 02:30 does not exist on the spring-forward day; 03:30 summer time does
    assert_eq!(engine.resolve_local(&local(2024, 3, 31, 2, 30)), utc(2024, 3, 31, 1, 30));
    assert_eq!(engine.resolve_local(&local(2024, 3, 31, 4, 0)), utc(2024, 3, 31, 2, 0));
}

#[test]
fn resolve_local_takes_earliest_of_repeated_hour() {
    let engine = RecurrenceEngine::new(SummerTime);

    // 02:30 happens twice on the fall-back day: at +02:00 first, then at +01:00
    assert_eq!(engine.resolve_local(&local(2024, 10, 27, 2, 30)), utc(2024, 10, 27, 0, 30));
}

#[test]
fn daily_steps_across_spring_forward() {
    let engine = RecurrenceEngine::new(SummerTime);
    // 02:30 local on Mar 30 (winter time)
    let c = chore(utc(2024, 3, 30, 1, 30), Recurrence::Daily);

    let occ = engine.expand_in_range(&c, day(2024, 3, 30), day(2024, 4, 1));

    assert_eq!(
        dates(&occ),
        vec![utc(2024, 3, 30, 1, 30), utc(2024, 3, 31, 1, 30), utc(2024, 4, 1, 0, 30)]
    );
    assert!(engine.is_occurrence_on_date(&c, day(2024, 3, 31)));
}
