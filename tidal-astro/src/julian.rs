use std::fmt;
use tidal_core::constants::{
    HOURS_PER_DAY, MJD_ZERO_POINT, SECONDS_PER_DAY_F64, UNIX_EPOCH_JD,
};

/// A Julian Date carried as a two-part sum `jd1 + jd2`.
///
/// Splitting the date preserves sub-second resolution over the full range of
/// interest: `jd1` holds the large integer-ish part and `jd2` the day
/// fraction, so differences between nearby epochs do not lose precision to
/// the ~2.4 million day magnitude of the full date.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JulianDate {
    pub jd1: f64,
    pub jd2: f64,
}

impl JulianDate {
    pub fn new(jd1: f64, jd2: f64) -> Self {
        Self { jd1, jd2 }
    }

    pub fn from_f64(jd: f64) -> Self {
        Self::new(jd, 0.0)
    }

    pub fn j2000() -> Self {
        Self::new(tidal_core::constants::J2000_JD, 0.0)
    }

    pub fn unix_epoch() -> Self {
        Self::new(UNIX_EPOCH_JD, 0.0)
    }

    /// Seconds since 1970-01-01T00:00:00 UTC.
    pub fn from_unix_seconds(seconds: f64) -> Self {
        Self::new(UNIX_EPOCH_JD, seconds / SECONDS_PER_DAY_F64)
    }

    pub fn to_f64(&self) -> f64 {
        self.jd1 + self.jd2
    }

    pub fn add_days(&self, days: f64) -> Self {
        Self::new(self.jd1, self.jd2 + days)
    }

    pub fn add_hours(&self, hours: f64) -> Self {
        self.add_days(hours / HOURS_PER_DAY)
    }

    pub fn add_seconds(&self, seconds: f64) -> Self {
        self.add_days(seconds / SECONDS_PER_DAY_F64)
    }

    /// Signed difference `self - other` in hours, combining the two parts
    /// separately to keep precision.
    pub fn hours_since(&self, other: &JulianDate) -> f64 {
        ((self.jd1 - other.jd1) + (self.jd2 - other.jd2)) * HOURS_PER_DAY
    }

    pub fn from_calendar(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: f64) -> Self {
        // Algorithm matches ERFA's eraCal2jd + eraDtf2d convention:
        // jd1 = full Julian Date at midnight (integer-ish)
        // jd2 = fraction of day
        let my = (month as i32 - 14) / 12;
        let iypmy = year + my;

        let mjd = ((1461 * (iypmy + 4800)) / 4 + (367 * (month as i32 - 2 - 12 * my)) / 12
            - (3 * ((iypmy + 4900) / 100)) / 4
            + day as i32
            - 2432076) as f64;

        let jd1 = MJD_ZERO_POINT + mjd;
        let jd2 = (60.0 * (60 * hour as i32 + minute as i32) as f64 + second) / SECONDS_PER_DAY_F64;

        Self::new(jd1, jd2)
    }

    /// Inverse of [`from_calendar`](Self::from_calendar): Gregorian calendar
    /// date and time of day. Seconds carry the sub-second fraction.
    pub fn to_calendar(&self) -> CalendarDate {
        let jd = self.to_f64() + 0.5;
        let z = libm::floor(jd) as i64;
        let day_frac = jd - z as f64;

        // Fliegel & Van Flandern inverse, Gregorian branch for z >= 2299161
        let a = if z >= 2_299_161 {
            let alpha = libm::floor((z as f64 - 1_867_216.25) / 36_524.25) as i64;
            z + 1 + alpha - alpha / 4
        } else {
            z
        };
        let b = a + 1524;
        let c = libm::floor((b as f64 - 122.1) / 365.25) as i64;
        let d = libm::floor(365.25 * c as f64) as i64;
        let e = libm::floor((b - d) as f64 / 30.6001) as i64;

        let day = (b - d - libm::floor(30.6001 * e as f64) as i64) as u8;
        let month = if e < 14 { (e - 1) as u8 } else { (e - 13) as u8 };
        let year = (if month > 2 { c - 4716 } else { c - 4715 }) as i32;

        let seconds_of_day = day_frac * SECONDS_PER_DAY_F64;
        let hour = (seconds_of_day / 3600.0) as u8;
        let minute = ((seconds_of_day - hour as f64 * 3600.0) / 60.0) as u8;
        let second = seconds_of_day - hour as f64 * 3600.0 - minute as f64 * 60.0;

        CalendarDate {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

/// A Gregorian calendar date and UTC time of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
}

impl fmt::Display for CalendarDate {
    /// RFC 3339 with whole seconds.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second as u8
        )
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.9}", self.to_f64())
    }
}

impl From<f64> for JulianDate {
    fn from(jd: f64) -> Self {
        Self::from_f64(jd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_epoch() {
        // 2023-04-10T00:00:00Z
        let jd = JulianDate::from_calendar(2023, 4, 10, 0, 0, 0.0);
        assert!((jd.to_f64() - 2_460_044.5).abs() < 1e-6);
    }

    #[test]
    fn j2000_epoch() {
        let jd = JulianDate::from_calendar(2000, 1, 1, 12, 0, 0.0);
        assert_eq!(jd.to_f64(), 2_451_545.0);
    }

    #[test]
    fn unix_epoch_round_trip() {
        let jd = JulianDate::from_unix_seconds(0.0);
        assert_eq!(jd.to_f64(), UNIX_EPOCH_JD);
        let cal = jd.to_calendar();
        assert_eq!((cal.year, cal.month, cal.day), (1970, 1, 1));
        assert_eq!((cal.hour, cal.minute), (0, 0));
    }

    #[test]
    fn calendar_round_trip() {
        let jd = JulianDate::from_calendar(2023, 4, 10, 7, 30, 15.0);
        let cal = jd.to_calendar();
        assert_eq!((cal.year, cal.month, cal.day), (2023, 4, 10));
        assert_eq!((cal.hour, cal.minute), (7, 30));
        assert!((cal.second - 15.0).abs() < 1e-4);
    }

    #[test]
    fn hours_since_is_signed() {
        let a = JulianDate::from_calendar(2023, 4, 10, 0, 0, 0.0);
        let b = a.add_hours(36.0);
        assert!((b.hours_since(&a) - 36.0).abs() < 1e-9);
        assert!((a.hours_since(&b) + 36.0).abs() < 1e-9);
    }

    #[test]
    fn add_hours_crosses_midnight() {
        let jd = JulianDate::from_calendar(2023, 4, 10, 23, 0, 0.0);
        let cal = jd.add_hours(2.0).to_calendar();
        assert_eq!((cal.year, cal.month, cal.day, cal.hour), (2023, 4, 11, 1));
    }

    #[test]
    fn display_rfc3339() {
        let jd = JulianDate::from_calendar(2023, 4, 10, 3, 48, 42.0);
        assert_eq!(jd.to_calendar().to_string(), "2023-04-10T03:48:42Z");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let original = JulianDate::new(2_460_044.5, 0.123456789);
        let json = serde_json::to_string(&original).unwrap();
        let back: JulianDate = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }
}
