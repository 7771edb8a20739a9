#[cfg(test)]
mod term_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{DateTime, Datelike, TimeZone, Utc};

    use crate::cycle::Branch;
    use crate::error::{ChartError, EphemerisError, PillarStage};
    use crate::solar::provider::MockSolarPositionProvider;
    use crate::solar::*;
    use crate::time::julian::julian_day_from_utc;

    fn minutes_apart(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
        (a - b).num_minutes().abs()
    }

    /// Meeus engine that counts how often it is asked.
    struct Counting {
        inner: MeeusEphemeris,
        calls: AtomicUsize,
    }

    impl SolarPositionProvider for Counting {
        fn longitude_at(&self, jd_utc: f64) -> Result<f64, EphemerisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.longitude_at(jd_utc)
        }
    }

    #[test]
    fn test_every_term_solves_to_its_longitude() {
        let engine = MeeusEphemeris::new();
        let terms = locate_solar_terms(2024, &engine).unwrap();
        for term in &terms {
            let lambda = engine.longitude_at(term.julian_day).unwrap();
            let residual = normalize_180(lambda - term.longitude);
            assert!(
                residual.abs() < 1e-4,
                "{} ({}°): residual {residual}",
                term.name,
                term.longitude
            );
        }
    }

    #[test]
    fn test_known_2024_instants() {
        let terms = locate_solar_terms(2024, &MeeusEphemeris::new()).unwrap();
        let expected = [
            (2, Utc.with_ymd_and_hms(2024, 2, 4, 8, 27, 0).unwrap()),
            (5, Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap()),
            (11, Utc.with_ymd_and_hms(2024, 6, 20, 20, 51, 0).unwrap()),
            (23, Utc.with_ymd_and_hms(2024, 12, 21, 9, 20, 0).unwrap()),
        ];
        for (index, instant) in expected {
            let term = &terms[index];
            assert!(
                minutes_apart(term.utc, instant) <= 3,
                "{} solved at {}, expected {instant}",
                term.name,
                term.utc
            );
        }
        assert_eq!(terms[2].name, "입춘");
        assert_eq!(terms[2].hanja, "立春");
        assert_eq!(terms[2].longitude, 315.0);
    }

    #[test]
    fn test_terms_are_chronological_and_evenly_spaced() {
        let terms = locate_solar_terms(1990, &MeeusEphemeris::new()).unwrap();
        for pair in terms.windows(2) {
            let gap = pair[1].julian_day - pair[0].julian_day;
            assert!((14.0..16.5).contains(&gap), "gap {gap} after {}", pair[0].name);
        }
    }

    #[test]
    fn test_new_year_terms_stay_in_their_year() {
        let engine = MeeusEphemeris::new();
        for year in [1900, 1950, 1999, 2000, 2024, 2100] {
            let terms = locate_solar_terms(year, &engine).unwrap();
            assert_eq!(terms[0].utc.year(), year, "소한 {year}");
            assert_eq!(terms[1].utc.year(), year, "대한 {year}");
            assert_eq!(terms[23].utc.year(), year, "동지 {year}");
        }
    }

    #[test]
    fn test_each_month_branch_appears_twice_and_only_jie_opens_months() {
        let terms = locate_solar_terms(2024, &MeeusEphemeris::new()).unwrap();
        for branch in crate::cycle::ALL_BRANCHES {
            let count = terms.iter().filter(|t| t.month_branch == branch).count();
            assert_eq!(count, 2, "{branch}");
        }

        let mut month_changes = 0;
        for pair in terms.windows(2) {
            if pair[1].month_branch != pair[0].month_branch {
                month_changes += 1;
                assert!(pair[1].is_jie, "{} changed the month", pair[1].name);
            } else {
                assert!(!pair[1].is_jie);
            }
        }
        assert_eq!(month_changes, 11);
    }

    #[test]
    fn test_surrounding_and_governing_terms_before_lichun() {
        let engine = MeeusEphemeris::new();
        let mut locator = SolarTermLocator::new(&engine);
        let birth = julian_day_from_utc(Utc.with_ymd_and_hms(2024, 2, 4, 7, 28, 0).unwrap());

        let around = locator.find_surrounding_solar_terms(birth).unwrap();
        assert_eq!(around.preceding.name, "대한");
        assert_eq!(around.following.name, "입춘");
        assert!(around.preceding.julian_day <= birth && birth < around.following.julian_day);

        // 대한 is a qi term, so the month is still the one 소한 opened
        let jie = locator.governing_jie(birth).unwrap();
        assert_eq!(jie.name, "소한");
        assert_eq!(jie.month_branch, Branch::Chuk);
        assert_eq!(locator.next_jie(birth).unwrap().name, "입춘");
    }

    #[test]
    fn test_governing_jie_after_lichun() {
        let engine = MeeusEphemeris::new();
        let mut locator = SolarTermLocator::new(&engine);
        let after = julian_day_from_utc(Utc.with_ymd_and_hms(2024, 2, 4, 9, 0, 0).unwrap());
        let jie = locator.governing_jie(after).unwrap();
        assert_eq!(jie.index, LICHUN_INDEX);
        assert_eq!(jie.month_branch, Branch::In);
        assert_eq!(locator.next_jie(after).unwrap().name, "경칩");
    }

    #[test]
    fn test_bracketing_across_new_year() {
        let engine = MeeusEphemeris::new();
        let mut locator = SolarTermLocator::new(&engine);
        let jd = julian_day_from_utc(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let around = locator.find_surrounding_solar_terms(jd).unwrap();
        assert_eq!(around.preceding.name, "동지");
        assert_eq!(around.preceding.utc.year(), 2023);
        assert_eq!(around.following.name, "소한");
        assert_eq!(locator.governing_jie(jd).unwrap().name, "대설");
    }

    #[test]
    fn test_year_cache_avoids_resolving() {
        let counting = Counting {
            inner: MeeusEphemeris::new(),
            calls: AtomicUsize::new(0),
        };
        let mut locator = SolarTermLocator::new(&counting);
        locator.terms_for_year(2024).unwrap();
        let after_first = counting.calls.load(Ordering::SeqCst);
        assert!(after_first > 0);

        locator.terms_for_year(2024).unwrap();
        assert_eq!(locator.lichun(2024).unwrap().index, LICHUN_INDEX);
        assert_eq!(counting.calls.load(Ordering::SeqCst), after_first);
    }

    #[test]
    fn test_approximate_engine_lands_within_an_hour() {
        let precise = locate_solar_terms(2024, &MeeusEphemeris::new()).unwrap();
        let rough = locate_solar_terms(2024, &ApproximateSolarModel::new()).unwrap();
        for (p, r) in precise.iter().zip(rough.iter()) {
            assert!(minutes_apart(p.utc, r.utc) <= 60, "{}: {} vs {}", p.name, p.utc, r.utc);
        }
    }

    #[test]
    fn test_provider_failure_surfaces_as_ephemeris_unavailable() {
        let mut mock = MockSolarPositionProvider::new();
        mock.expect_longitude_at()
            .returning(|_| Err(EphemerisError::Engine("disk image missing".into())));
        let err = locate_solar_terms(2024, &mock).unwrap_err();
        assert!(err.is_recoverable_by_fallback());
    }

    #[test]
    fn test_frozen_sun_is_a_term_error() {
        let mut mock = MockSolarPositionProvider::new();
        mock.expect_longitude_at().returning(|_| Ok(100.0));
        let err = locate_solar_terms(2024, &mock).unwrap_err();
        assert!(matches!(
            err,
            ChartError::PillarComputation {
                pillar: PillarStage::SolarTerm,
                ..
            }
        ));
    }

    #[test]
    fn test_month_branch_of_indices() {
        assert_eq!(month_branch_of(0), Branch::Chuk);
        assert_eq!(month_branch_of(1), Branch::Chuk);
        assert_eq!(month_branch_of(2), Branch::In);
        assert_eq!(month_branch_of(22), Branch::Ja);
        assert_eq!(term_longitude(0), 285.0);
        assert_eq!(term_longitude(5), 0.0);
        assert_eq!(term_longitude(23), 270.0);
    }
}
