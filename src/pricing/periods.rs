//! Resolution of the tariff period governing each night of a stay.

use chrono::{Duration, NaiveDate};

use crate::models::TariffPeriod;

/// Calendar nights of a stay, from check-in inclusive to check-out exclusive.
///
/// Returns an empty list when check-out is not after check-in.
pub fn stay_nights(check_in: NaiveDate, check_out: NaiveDate) -> Vec<NaiveDate> {
    let count = (check_out - check_in).num_days().max(0);
    (0..count).map(|offset| check_in + Duration::days(offset)).collect()
}

/// Tariff periods ordered by precedence.
///
/// `first` degree periods are consulted before `second` degree ones. Among
/// periods of the same degree the narrower date range wins; equal widths keep
/// their input order.
#[derive(Debug, Clone)]
pub struct PeriodResolver<'a> {
    ordered: Vec<&'a TariffPeriod>,
}

impl<'a> PeriodResolver<'a> {
    pub fn new(periods: &'a [TariffPeriod]) -> Self {
        let mut ordered: Vec<&TariffPeriod> = periods.iter().collect();
        // sort_by_key is stable
        ordered.sort_by_key(|p| (p.degree.rank(), p.span_days()));
        Self { ordered }
    }

    /// The period governing `night`, if any covers it.
    pub fn resolve(&self, night: NaiveDate) -> Option<&'a TariffPeriod> {
        self.ordered.iter().copied().find(|p| p.contains(night))
    }

    /// One entry per night, `None` for nights outside every period.
    pub fn resolve_stay(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Vec<(NaiveDate, Option<&'a TariffPeriod>)> {
        stay_nights(check_in, check_out)
            .into_iter()
            .map(|night| (night, self.resolve(night)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Degree;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn period(name: &str, start: &str, end: &str, degree: Degree) -> TariffPeriod {
        TariffPeriod {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_date: date(start),
            end_date: date(end),
            degree,
            deposit_percentage: dec!(50),
        }
    }

    #[test]
    fn test_stay_nights_excludes_checkout() {
        let nights = stay_nights(date("2024-01-30"), date("2024-02-02"));
        assert_eq!(
            nights,
            vec![date("2024-01-30"), date("2024-01-31"), date("2024-02-01")]
        );
    }

    #[test]
    fn test_stay_nights_empty_for_zero_or_negative_range() {
        assert!(stay_nights(date("2024-01-10"), date("2024-01-10")).is_empty());
        assert!(stay_nights(date("2024-01-10"), date("2024-01-05")).is_empty());
    }

    #[test]
    fn test_first_degree_wins_regardless_of_input_order() {
        let low = period("Temporada", "2024-01-01", "2024-03-31", Degree::Second);
        let high = period("Carnaval", "2024-02-10", "2024-02-14", Degree::First);

        let forward = [low.clone(), high.clone()];
        let reverse = [high.clone(), low.clone()];

        for periods in [&forward[..], &reverse[..]] {
            let resolver = PeriodResolver::new(periods);
            assert_eq!(resolver.resolve(date("2024-02-12")).unwrap().name, "Carnaval");
            assert_eq!(resolver.resolve(date("2024-02-20")).unwrap().name, "Temporada");
        }
    }

    #[test]
    fn test_first_degree_wins_even_when_wider() {
        let second = period("Fin de semana largo", "2024-02-10", "2024-02-12", Degree::Second);
        let first = period("Verano", "2024-01-01", "2024-03-31", Degree::First);
        let periods = [second, first];
        let resolver = PeriodResolver::new(&periods);
        assert_eq!(resolver.resolve(date("2024-02-11")).unwrap().name, "Verano");
    }

    #[test]
    fn test_same_degree_overlap_narrower_wins() {
        let wide = period("Verano", "2024-01-01", "2024-03-31", Degree::First);
        let narrow = period("Reyes", "2024-01-05", "2024-01-07", Degree::First);
        let periods = [wide, narrow];
        let resolver = PeriodResolver::new(&periods);
        assert_eq!(resolver.resolve(date("2024-01-06")).unwrap().name, "Reyes");
        assert_eq!(resolver.resolve(date("2024-01-08")).unwrap().name, "Verano");
    }

    #[test]
    fn test_same_degree_equal_width_keeps_input_order() {
        let a = period("A", "2024-01-01", "2024-01-10", Degree::Second);
        let b = period("B", "2024-01-05", "2024-01-14", Degree::Second);
        let periods = [a, b];
        let resolver = PeriodResolver::new(&periods);
        assert_eq!(resolver.resolve(date("2024-01-07")).unwrap().name, "A");
    }

    #[test]
    fn test_uncovered_night_resolves_to_none() {
        let periods = [period("Verano", "2024-01-01", "2024-01-31", Degree::First)];
        let resolver = PeriodResolver::new(&periods);
        let resolved = resolver.resolve_stay(date("2024-01-30"), date("2024-02-02"));
        assert_eq!(resolved.len(), 3);
        assert!(resolved[0].1.is_some());
        assert!(resolved[1].1.is_some());
        assert!(resolved[2].1.is_none());
    }
}
