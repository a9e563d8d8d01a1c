//! Maps (month, hour, day-of-week) to a rate period and $/kWh under each plan.
//!
//! Days of week are numbered 0 = Sunday through 6 = Saturday. Months passed to
//! the classifier are 0-indexed (0 = January).

use super::{RatePeriod, RatePlan, Tariff};

/// Returns `true` for October through March (0-indexed months 9, 10, 11, 0, 1, 2).
pub fn is_winter_month(month0: u32) -> bool {
    month0 >= 9 || month0 <= 2
}

fn is_weekend(day_of_week: u32) -> bool {
    day_of_week == 0 || day_of_week == 6
}

impl Tariff {
    /// Common weekday peak window: morning or evening, never on weekends.
    ///
    /// Used to split usage into peak and off-peak independently of the plan.
    pub fn is_peak_hour(&self, hour: u32, day_of_week: u32) -> bool {
        if is_weekend(day_of_week) {
            return false;
        }
        let w = &self.config().windows;
        w.morning_peak.contains(hour) || w.evening_peak.contains(hour)
    }

    /// Nightly super off-peak window, every day of the week.
    pub fn is_super_off_peak_hour(&self, hour: u32) -> bool {
        self.config().windows.super_off_peak.contains(hour)
    }

    /// Classifies an interval under `plan`.
    pub fn period(&self, plan: RatePlan, month0: u32, hour: u32, day_of_week: u32) -> RatePeriod {
        let w = &self.config().windows;
        match plan {
            RatePlan::Flat => RatePeriod::Standard,
            RatePlan::TimeOfUse => {
                if is_weekend(day_of_week) {
                    return RatePeriod::OffPeak;
                }
                // morning peak only applies in winter
                let morning = w.morning_peak.contains(hour) && is_winter_month(month0);
                if morning || w.evening_peak.contains(hour) {
                    RatePeriod::Peak
                } else {
                    RatePeriod::OffPeak
                }
            }
            RatePlan::TimeOfUseSuper => {
                if self.is_super_off_peak_hour(hour) {
                    RatePeriod::SuperOffPeak
                } else if self.is_peak_hour(hour, day_of_week) {
                    RatePeriod::Peak
                } else {
                    RatePeriod::OffPeak
                }
            }
        }
    }

    /// Energy rate ($/kWh) for a time-varying plan.
    ///
    /// The flat plan has no time-dependent rate; it returns the tier-1 rate
    /// here and is tiered monthly by [`CostCalculator::flat_rate_cost`].
    ///
    /// [`CostCalculator::flat_rate_cost`]: super::CostCalculator::flat_rate_cost
    pub fn rate(&self, plan: RatePlan, month0: u32, hour: u32, day_of_week: u32) -> f64 {
        let c = self.config();
        let winter = is_winter_month(month0);
        match (plan, self.period(plan, month0, hour, day_of_week)) {
            (RatePlan::Flat, _) => c.flat.tier1_rate,
            (RatePlan::TimeOfUse, RatePeriod::Peak) => {
                if winter {
                    c.tou.peak_winter
                } else {
                    c.tou.peak_summer
                }
            }
            (RatePlan::TimeOfUse, _) => c.tou.off_peak,
            (RatePlan::TimeOfUseSuper, RatePeriod::SuperOffPeak) => c.tou_super.super_off_peak,
            (RatePlan::TimeOfUseSuper, RatePeriod::Peak) => {
                if winter {
                    c.tou_super.peak_winter
                } else {
                    c.tou_super.peak_summer
                }
            }
            (RatePlan::TimeOfUseSuper, _) => {
                if winter {
                    c.tou_super.mid_peak_winter
                } else {
                    c.tou_super.mid_peak_summer
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN: u32 = 0;
    const JUL: u32 = 6;
    const WED: u32 = 3;
    const SAT: u32 = 6;
    const SUN: u32 = 0;

    #[test]
    fn winter_months() {
        let winter: Vec<u32> = (0..12).filter(|m| is_winter_month(*m)).collect();
        assert_eq!(winter, vec![0, 1, 2, 9, 10, 11]);
    }

    #[test]
    fn weekends_are_never_peak() {
        let t = Tariff::default();
        for hour in 0..24 {
            for day in [SAT, SUN] {
                assert!(!t.is_peak_hour(hour, day));
                for month in 0..12 {
                    for plan in RatePlan::ALL {
                        assert_ne!(t.period(plan, month, hour, day), RatePeriod::Peak);
                    }
                }
            }
        }
    }

    #[test]
    fn weekday_peak_windows_are_half_open() {
        let t = Tariff::default();
        let peak: Vec<u32> = (0..24).filter(|h| t.is_peak_hour(*h, WED)).collect();
        assert_eq!(peak, vec![7, 8, 9, 17, 18, 19]);
    }

    #[test]
    fn super_off_peak_wraps_midnight() {
        let t = Tariff::default();
        assert!(t.is_super_off_peak_hour(23));
        assert!(t.is_super_off_peak_hour(0));
        assert!(t.is_super_off_peak_hour(6));
        assert!(!t.is_super_off_peak_hour(7));
        assert!(!t.is_super_off_peak_hour(22));
    }

    #[test]
    fn tou_morning_peak_is_winter_only() {
        let t = Tariff::default();
        assert_eq!(t.period(RatePlan::TimeOfUse, JAN, 8, WED), RatePeriod::Peak);
        assert_eq!(t.period(RatePlan::TimeOfUse, JUL, 8, WED), RatePeriod::OffPeak);
        assert_eq!(t.period(RatePlan::TimeOfUse, JUL, 18, WED), RatePeriod::Peak);
        assert_eq!(t.rate(RatePlan::TimeOfUse, JAN, 8, WED), 0.53);
        assert_eq!(t.rate(RatePlan::TimeOfUse, JUL, 8, WED), 0.13);
        assert_eq!(t.rate(RatePlan::TimeOfUse, JUL, 18, WED), 0.36);
    }

    #[test]
    fn tou_super_keeps_morning_peak_in_summer() {
        let t = Tariff::default();
        assert_eq!(t.period(RatePlan::TimeOfUseSuper, JUL, 8, WED), RatePeriod::Peak);
        assert_eq!(t.rate(RatePlan::TimeOfUseSuper, JUL, 8, WED), 0.33);
        assert_eq!(t.rate(RatePlan::TimeOfUseSuper, JAN, 18, WED), 0.50);
    }

    #[test]
    fn tou_super_night_overrides_everything() {
        let t = Tariff::default();
        for day in 0..7 {
            for hour in [23, 0, 3, 6] {
                assert_eq!(
                    t.period(RatePlan::TimeOfUseSuper, JAN, hour, day),
                    RatePeriod::SuperOffPeak
                );
                assert_eq!(t.rate(RatePlan::TimeOfUseSuper, JUL, hour, day), 0.08);
            }
        }
    }

    #[test]
    fn tou_super_mid_peak_is_seasonal() {
        let t = Tariff::default();
        assert_eq!(t.rate(RatePlan::TimeOfUseSuper, JAN, 12, WED), 0.125);
        assert_eq!(t.rate(RatePlan::TimeOfUseSuper, JUL, 12, SAT), 0.115);
    }

    #[test]
    fn flat_has_no_time_dependency() {
        let t = Tariff::default();
        for hour in 0..24 {
            assert_eq!(t.period(RatePlan::Flat, JAN, hour, WED), RatePeriod::Standard);
            assert_eq!(t.rate(RatePlan::Flat, JUL, hour, SAT), 0.172);
        }
    }
}
