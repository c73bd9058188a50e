use thermos_calendar::{Calendar, CalendarError, TimeUnits, decode_dates, decode_years};

#[test]
fn mid_year_offsets_every_calendar() {
    // One value per year placed near July 1 must land in consecutive years
    // whatever the year length.
    let units = TimeUnits::parse("days since 1959-01-01 00:00:00").unwrap();
    for calendar in [
        Calendar::Standard,
        Calendar::ProlepticGregorian,
        Calendar::NoLeap,
        Calendar::AllLeap,
        Calendar::Day360,
        Calendar::Julian,
    ] {
        let year_len = match calendar {
            Calendar::Day360 => 360.0,
            Calendar::AllLeap => 366.0,
            _ => 365.25,
        };
        let offsets: Vec<f64> = (0..66).map(|i| i as f64 * year_len + 180.0).collect();
        let years = decode_years(&offsets, &units, calendar).unwrap();
        let expected: Vec<i32> = (1959..=2024).collect();
        assert_eq!(years, expected, "calendar {calendar}");
    }
}

#[test]
fn daily_noleap_sequence_has_no_feb_29() {
    let units = TimeUnits::parse("days since 2000-01-01").unwrap();
    let offsets: Vec<f64> = (0..365 * 4).map(f64::from).collect();
    let dates = decode_dates(&offsets, &units, Calendar::NoLeap).unwrap();
    assert!(dates.iter().all(|d| !(d.month() == 2 && d.day() == 29)));
    assert_eq!(dates.last().map(|d| d.year()), Some(2003));
}

#[test]
fn negative_offsets_before_epoch() {
    let units = TimeUnits::parse("days since 1950-01-01").unwrap();
    let years = decode_years(&[-1.0, -366.0], &units, Calendar::Standard).unwrap();
    assert_eq!(years, vec![1949, 1948]);
}

#[test]
fn epoch_not_on_calendar_is_an_error() {
    let units = TimeUnits::parse("days since 2000-02-29").unwrap();
    let err = decode_years(&[0.0], &units, Calendar::NoLeap).unwrap_err();
    assert!(matches!(err, CalendarError::InvalidDay { .. }));
}

#[test]
fn standard_calendar_from_year_one_is_mixed() {
    let units = TimeUnits::parse("days since 0001-01-01 00:00:00").unwrap();
    // 2000-12-31 on the mixed calendar.
    let offsets = [730_486.0];
    assert_eq!(decode_years(&offsets, &units, Calendar::Standard).unwrap(), vec![2000]);
    assert_eq!(
        decode_years(&offsets, &units, Calendar::ProlepticGregorian).unwrap(),
        vec![2001]
    );
}
