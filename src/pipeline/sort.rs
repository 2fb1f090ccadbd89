//! Finish-time parsing and standings ordering.
//!
//! Finish times arrive as text and stay as text in the output; this module
//! only derives a sort key from them. Anything that is not a well-formed
//! 24-hour `H:MM:SS` clock time (DNF, DSQ, empty, garbled extraction) maps to
//! a single sentinel that orders after every valid time, so malformed entries
//! sink to the bottom of the standings instead of failing the run.

use crate::output::ParticipantRecord;

/// A parsed finish time, usable as a total-order sort key.
///
/// Variant order matters: `Finished` compares by elapsed seconds and every
/// `Finished` value orders before `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RaceTime {
    /// Seconds on a 24-hour clock (`0 ..= 86_399`).
    Finished(u32),
    /// The shared sentinel for every unparsable or missing time.
    Invalid,
}

impl RaceTime {
    /// Strict `H:MM:SS` parse: exactly three colon-separated numeric fields,
    /// hour < 24, minutes and seconds < 60. One-digit fields are accepted,
    /// matching what the timing software occasionally prints.
    pub fn parse(s: &str) -> RaceTime {
        let mut parts = s.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return RaceTime::Invalid;
        };
        let field = |p: &str, max: u32| -> Option<u32> {
            if p.is_empty() || p.len() > 2 || !p.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let v: u32 = p.parse().ok()?;
            (v < max).then_some(v)
        };
        match (field(h, 24), field(m, 60), field(sec, 60)) {
            (Some(h), Some(m), Some(s)) => RaceTime::Finished(h * 3600 + m * 60 + s),
            _ => RaceTime::Invalid,
        }
    }
}

/// Stable ascending sort of the standings by parsed finish time.
///
/// Stability is required: records with equal times (including two invalid
/// ones) keep their pre-sort relative order, so equal finishers are never
/// reordered nondeterministically. Returns the number of records whose time
/// failed to parse.
pub fn sort_standings(records: &mut [ParticipantRecord]) -> usize {
    records.sort_by_key(|r| RaceTime::parse(&r.finish_time));
    records
        .iter()
        .filter(|r| RaceTime::parse(&r.finish_time) == RaceTime::Invalid)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(bib: &str, time: &str) -> ParticipantRecord {
        ParticipantRecord {
            bib_number: bib.into(),
            athlete_name: String::new(),
            birth_year: "null".into(),
            sex: String::new(),
            team: String::new(),
            nationality: String::new(),
            finish_time: time.into(),
        }
    }

    #[test]
    fn valid_times_preserve_chronological_order() {
        let times = ["00:00:00", "00:00:01", "00:59:59", "01:00:00", "23:59:59"];
        let parsed: Vec<_> = times.iter().map(|t| RaceTime::parse(t)).collect();
        for w in parsed.windows(2) {
            assert!(w[0] < w[1], "{:?} should sort before {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn sentinel_sorts_after_every_valid_time() {
        for t in ["00:00:00", "23:59:59", "12:34:56"] {
            assert!(RaceTime::parse(t) < RaceTime::Invalid);
        }
    }

    #[test]
    fn malformed_strings_share_the_sentinel() {
        for bad in ["", "DNF", "45:12", "00:45", "1:2:3:4", "24:00:00", "00:60:00",
                    "00:00:60", "0a:00:00", "123:00:00", " 00:45:12"] {
            assert_eq!(RaceTime::parse(bad), RaceTime::Invalid, "input: {bad:?}");
        }
    }

    #[test]
    fn single_digit_fields_parse() {
        assert_eq!(RaceTime::parse("1:2:3"), RaceTime::Finished(3723));
        assert_eq!(RaceTime::parse("01:02:03"), RaceTime::Finished(3723));
    }

    #[test]
    fn fastest_first_invalid_last() {
        let mut records = vec![rec("1", "DNF"), rec("2", "00:45:12"), rec("3", "00:40:00")];
        let invalid = sort_standings(&mut records);
        let order: Vec<_> = records.iter().map(|r| r.bib_number.as_str()).collect();
        assert_eq!(order, ["3", "2", "1"]);
        assert_eq!(invalid, 1);
    }

    #[test]
    fn equal_and_invalid_times_keep_input_order() {
        let mut records = vec![
            rec("a", "01:00:00"),
            rec("b", "DNF"),
            rec("c", "01:00:00"),
            rec("d", "DSQ"),
        ];
        sort_standings(&mut records);
        let order: Vec<_> = records.iter().map(|r| r.bib_number.as_str()).collect();
        assert_eq!(order, ["a", "c", "b", "d"]);
    }
}
