use chrono::{DateTime, Weekday};
use chrono_tz::Tz;
use timetable::{ClockTime, Interval, Timetable};

const MON_TO_SAT: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn at(value: &str) -> DateTime<Tz> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Tz::UTC)
}

fn opening_hours() -> Timetable {
    let am = Interval::builder()
        .label("morning")
        .clock(
            ClockTime::from_instant(&at("0001-01-01T08:00:00Z")),
            ClockTime::from_instant(&at("0001-01-01T12:00:00Z")),
        )
        .weekdays(MON_TO_SAT)
        .build();
    let pm = Interval::builder()
        .label("afternoon")
        .clock(
            ClockTime::from_instant(&at("0001-01-01T14:30:00Z")),
            ClockTime::from_instant(&at("0001-01-01T19:30:00Z")),
        )
        .weekdays(MON_TO_SAT)
        .build();
    Timetable::new().with_interval(am).with_interval(pm)
}

#[test]
fn union_of_morning_and_afternoon_hours() {
    let timetable = opening_hours();
    for instant in [
        "0001-01-01T08:00:00Z",
        "0001-01-01T12:00:00Z",
        "0001-01-01T14:30:00Z",
        "0001-01-01T19:30:00Z",
        "0001-01-01T08:00:01Z",
        "2019-11-08T08:00:00Z",
        "2019-11-08T09:00:00Z",
        "1997-01-31T15:15:15Z",
    ] {
        assert!(timetable.contains(&at(instant)), "expected to contain {instant}");
    }

    for instant in [
        "1997-01-31T07:59:15Z",
        "1997-01-31T13:00:00Z",
        "1997-01-31T19:31:00Z",
        // Sunday
        "2019-11-10T09:00:00Z",
    ] {
        assert!(!timetable.contains(&at(instant)), "expected not to contain {instant}");
    }
}

#[test]
fn empty_timetable_contains_nothing() {
    let timetable = Timetable::new();
    assert!(timetable.is_empty());
    assert!(!timetable.contains(&at("2019-11-08T09:00:00Z")));
    assert!(timetable.matching_interval(&at("2019-11-08T09:00:00Z")).is_none());
}

#[test]
fn matching_interval_reports_first_match() {
    let timetable = opening_hours();
    let (idx, interval) = timetable
        .matching_interval(&at("1997-01-31T15:15:15Z"))
        .unwrap();
    assert_eq!(idx, 1);
    assert_eq!(interval.label(), Some("afternoon"));
}

#[test]
fn order_does_not_change_membership() {
    let forward = opening_hours();
    let reversed: Timetable = forward.clone().into_iter().rev().collect();
    for instant in [
        "1997-01-31T07:59:15Z",
        "1997-01-31T08:30:00Z",
        "1997-01-31T15:15:15Z",
        "2019-11-10T09:00:00Z",
    ] {
        let instant = at(instant);
        assert_eq!(forward.contains(&instant), reversed.contains(&instant));
    }
}

#[test]
fn batch_evaluation_matches_single_checks() {
    let timetable = opening_hours();
    let instants: Vec<_> = [
        "1997-01-31T07:59:15Z",
        "1997-01-31T08:30:00Z",
        "1997-01-31T13:00:00Z",
        "1997-01-31T15:15:15Z",
    ]
    .into_iter()
    .map(at)
    .collect();
    let expected: Vec<bool> = instants.iter().map(|i| timetable.contains(i)).collect();
    assert_eq!(timetable.contains_each(&instants), expected);
    assert_eq!(expected, vec![false, true, false, true]);
}

#[test]
fn display_lists_intervals_in_order() {
    let rendered = opening_hours().to_string();
    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#0 morning: any date, 08:00 UTC to 12:00 UTC"));
    assert!(lines[1].starts_with("#1 afternoon: any date, 14:30 UTC to 19:30 UTC"));
    assert_eq!(Timetable::new().to_string(), "(no intervals)");
}
