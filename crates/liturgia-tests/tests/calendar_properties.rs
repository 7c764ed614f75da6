use chrono::{Datelike, Duration, NaiveDate, Weekday};
use liturgia_core::calendar::{self, resolve};
use liturgia_core::{Cycle, Season};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn days(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |day| *day <= to)
}

fn allowed_transition(from: Season, to: Season) -> bool {
    matches!(
        (from, to),
        (Season::Advent, Season::Christmas)
            | (Season::Christmas, Season::OrdinaryTime)
            | (Season::OrdinaryTime, Season::Lent)
            | (Season::Lent, Season::Triduum)
            | (Season::Triduum, Season::Easter)
            | (Season::Easter, Season::OrdinaryTime)
            | (Season::OrdinaryTime, Season::Advent)
    )
}

#[test]
fn test_seasons_follow_each_other_in_order() {
    let mut previous = resolve(d("1990-01-01")).season;
    let mut run_start = d("1990-01-01");

    for day in days(d("1990-01-02"), d("2100-12-31")) {
        let season = resolve(day).season;
        if season == previous {
            continue;
        }

        assert!(allowed_transition(previous, season), "{:?} -> {:?} on {}", previous, season, day);

        let length = (day - run_start).num_days();
        match previous {
            Season::Triduum => assert_eq!(length, 3, "triduum ending {}", day),
            Season::Easter => assert_eq!(length, 50, "easter ending {}", day),
            Season::Advent => assert!((22..=28).contains(&length), "advent ending {}", day),
            _ => {}
        }

        previous = season;
        run_start = day;
    }
}

#[test]
fn test_season_anchors_every_year() {
    for year in 1900..=2200 {
        let easter = calendar::easter_sunday(year);
        assert_eq!(easter.weekday(), Weekday::Sun);

        assert_eq!(resolve(d(&format!("{}-12-25", year))).season, Season::Christmas);
        assert_eq!(resolve(calendar::ash_wednesday(year)).season, Season::Lent);
        assert_eq!(resolve(calendar::holy_thursday(year)).season, Season::Triduum);
        assert_eq!(resolve(easter).season, Season::Easter);
        assert_eq!(resolve(calendar::pentecost(year)).season, Season::Easter);
        assert_eq!(resolve(calendar::pentecost(year) + Duration::days(1)).season, Season::OrdinaryTime);
        assert_eq!(resolve(calendar::first_sunday_of_advent(year)).season, Season::Advent);
        assert_eq!(resolve(calendar::baptism_of_the_lord(year)).season, Season::Christmas);
        assert_eq!(
            resolve(calendar::baptism_of_the_lord(year) + Duration::days(1)).season,
            Season::OrdinaryTime
        );
    }
}

#[test]
fn test_cycle_constant_within_liturgical_year() {
    for day in days(d("2023-12-03"), d("2024-11-30")) {
        assert_eq!(resolve(day).cycle, Cycle::B, "{}", day);
    }
    assert_eq!(resolve(d("2023-12-02")).cycle, Cycle::A);
    assert_eq!(resolve(d("2024-12-01")).cycle, Cycle::C);
}

#[test]
fn test_cycle_has_period_three() {
    for year in 1950..=2150 {
        let advent = |y: i32| resolve(calendar::first_sunday_of_advent(y)).cycle;
        assert_eq!(advent(year), advent(year + 3), "year {}", year);
        assert_ne!(advent(year), advent(year + 1), "year {}", year);
    }
    assert_eq!(resolve(calendar::first_sunday_of_advent(2022)).cycle, Cycle::A);
}

#[test]
fn test_sunday_ordinals_increase_and_reset() {
    let start = calendar::sunday_on_or_after(d("1990-01-01"));
    let mut previous = resolve(start);

    let mut sunday = start + Duration::weeks(1);
    while sunday <= d("2100-12-31") {
        let current = resolve(sunday);
        assert!(current.sunday_ordinal >= 1, "{} has ordinal 0", sunday);

        if current.season == previous.season {
            assert_eq!(current.sunday_ordinal, previous.sunday_ordinal + 1, "{}", sunday);
        } else {
            match (previous.season, current.season) {
                (Season::Christmas, Season::OrdinaryTime) => assert_eq!(current.sunday_ordinal, 2, "{}", sunday),
                (_, Season::OrdinaryTime) => assert!(current.sunday_ordinal <= 34),
                _ => assert_eq!(current.sunday_ordinal, 1, "{}", sunday),
            }
        }

        previous = current;
        sunday += Duration::weeks(1);
    }
}

#[test]
fn test_named_sunday_ordinals() {
    for year in 2000..=2100 {
        assert_eq!(resolve(calendar::palm_sunday(year)).sunday_ordinal, 6);
        assert_eq!(resolve(calendar::pentecost(year)).sunday_ordinal, 8);
        assert_eq!(resolve(calendar::christ_the_king(year)).sunday_ordinal, 34);
        assert_eq!(resolve(calendar::first_sunday_of_advent(year) + Duration::weeks(3)).sunday_ordinal, 4);
    }
}

#[test]
fn test_next_sunday_is_strictly_after() {
    for day in days(d("2024-01-01"), d("2024-01-31")) {
        let next = calendar::next_sunday_after(day);
        assert_eq!(next.weekday(), Weekday::Sun);
        assert!(next > day);
        assert!((next - day).num_days() <= 7);
    }
}
