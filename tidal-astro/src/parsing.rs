use crate::{AstroError, AstroResult, JulianDate};

/// Parses an ISO 8601 timestamp into a [`JulianDate`].
///
/// Accepts `YYYY-MM-DDTHH:MM:SS`, with an optional trailing `Z` and an
/// optional fractional second, or a bare `YYYY-MM-DD` (midnight UTC). A
/// space is accepted in place of the `T` separator.
pub fn parse_iso8601(s: &str) -> AstroResult<JulianDate> {
    let s = s.trim();
    let s = s.strip_suffix('Z').unwrap_or(s);

    let (date_part, time_part) = match s.find(['T', ' ']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let (year, month, day) = parse_date(date_part)?;
    let (hour, minute, second) = match time_part {
        Some(t) => parse_time(t)?,
        None => (0, 0, 0.0),
    };

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(AstroError::InvalidDate { year, month, day });
    }
    if hour > 23 || minute > 59 || !(0.0..60.0).contains(&second) {
        return Err(AstroError::Parse(format!("invalid time of day: '{}'", s)));
    }

    Ok(JulianDate::from_calendar(year, month, day, hour, minute, second))
}

fn parse_date(s: &str) -> AstroResult<(i32, u8, u8)> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        return Err(AstroError::Parse(format!(
            "invalid date '{}', expected YYYY-MM-DD",
            s
        )));
    }
    let year = parse_component(parts[0], s)?;
    let month = parse_component(parts[1], s)?;
    let day = parse_component(parts[2], s)?;
    Ok((year, month, day))
}

fn parse_time(s: &str) -> AstroResult<(u8, u8, f64)> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err(AstroError::Parse(format!(
            "invalid time '{}', expected HH:MM:SS",
            s
        )));
    }
    let hour = parse_component(parts[0], s)?;
    let minute = parse_component(parts[1], s)?;
    let second: f64 = parts[2]
        .parse()
        .map_err(|_| AstroError::Parse(format!("invalid seconds in '{}'", s)))?;
    Ok((hour, minute, second))
}

fn parse_component<T: std::str::FromStr>(part: &str, whole: &str) -> AstroResult<T> {
    part.parse()
        .map_err(|_| AstroError::Parse(format!("invalid component '{}' in '{}'", part, whole)))
}
