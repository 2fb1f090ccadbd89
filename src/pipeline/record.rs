//! Record extraction: turn cleaned body lines into participant records.
//!
//! ## Line shapes
//!
//! A participant normally occupies one line:
//!
//! ```text
//! 101 Smith 1990 M TeamX USA 00:45:12
//! bib name  year ↑ team  nat time
//! ```
//!
//! but the year, sex, and team columns are all optional, the name can span
//! several tokens, and a long name wraps onto a second physical line carrying
//! nothing else. The extractor is an explicit two-state machine:
//!
//! * `AwaitingRecordStart` — looking for a line with ≥ 5 tokens.
//! * `AccumulatingContinuation` — a record is pending; any following line
//!   with fewer than 5 plain-whitespace tokens is a wrapped name fragment and
//!   is absorbed into the pending record's athlete name.
//!
//! Making the lookahead a state rather than a manual cursor keeps the
//! continuation contract testable on its own: feed lines in, get completed
//! records out, call [`RecordExtractor::finish`] to flush the last one.
//!
//! A line with ≥ 5 tokens but an odd structure still produces a record —
//! field slices saturate to empty strings rather than failing. That is
//! accepted heuristic behaviour, not an error.

use crate::output::ParticipantRecord;
use crate::pipeline::tokenize::{raw_token_count, tokenize};

/// Minimum fixed-up token count for a line to start a record
/// (bib + at least one name token + two trailing columns + time).
const MIN_RECORD_TOKENS: usize = 5;

enum State {
    AwaitingRecordStart,
    AccumulatingContinuation(ParticipantRecord),
}

/// Streaming record extractor. One instance is threaded through all pages of
/// a document, so a name wrap across a page boundary still lands in the
/// right record.
pub struct RecordExtractor {
    state: State,
    /// Non-empty body lines discarded for having too few tokens while no
    /// record was pending.
    pub skipped_lines: usize,
    /// Wrapped-name fragments absorbed into a pending record.
    pub continuation_lines: usize,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor {
    pub fn new() -> Self {
        Self {
            state: State::AwaitingRecordStart,
            skipped_lines: 0,
            continuation_lines: 0,
        }
    }

    /// Feed one body line. Returns a completed record when this line closes
    /// the previously pending one.
    pub fn push_line(&mut self, line: &str) -> Option<ParticipantRecord> {
        if let State::AccumulatingContinuation(ref mut pending) = self.state {
            // The continuation test uses the *raw* whitespace count: a
            // wrapped name fragment is judged by what is physically on the
            // line, without the merged-token fix-up.
            if raw_token_count(line) < MIN_RECORD_TOKENS {
                let fragment = line.trim();
                if !fragment.is_empty() {
                    pending.athlete_name.push(' ');
                    pending.athlete_name.push_str(fragment);
                    self.continuation_lines += 1;
                }
                return None;
            }
            let done = match std::mem::replace(&mut self.state, State::AwaitingRecordStart) {
                State::AccumulatingContinuation(rec) => rec,
                State::AwaitingRecordStart => unreachable!(),
            };
            self.begin_record(line);
            return Some(done);
        }

        self.begin_record(line);
        None
    }

    /// Flush the pending record at end of input.
    pub fn finish(&mut self) -> Option<ParticipantRecord> {
        match std::mem::replace(&mut self.state, State::AwaitingRecordStart) {
            State::AccumulatingContinuation(rec) => Some(rec),
            State::AwaitingRecordStart => None,
        }
    }

    fn begin_record(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let tokens = tokenize(line);
        if tokens.len() < MIN_RECORD_TOKENS {
            // Insufficient data and nothing pending to attach it to: the
            // line is dropped whole, never emitted as a partial record.
            self.skipped_lines += 1;
            return;
        }
        self.state = State::AccumulatingContinuation(parse_record(&tokens));
    }
}

/// Assemble a record from a fixed-up token list (`len >= MIN_RECORD_TOKENS`).
fn parse_record(tokens: &[String]) -> ParticipantRecord {
    let bib_number = tokens[0].clone();
    let finish_time = tokens[tokens.len() - 1].clone();
    let nationality = tokens[tokens.len() - 2].clone();

    // Everything between the bib and the trailing nationality/time pair.
    let rest = &tokens[1..];

    match rest.iter().position(|w| is_year_token(w)) {
        Some(year_idx) => {
            let birth_year = rest[year_idx].clone();
            let sex = match rest.get(year_idx + 1).map(String::as_str) {
                Some("M") => "M".to_string(),
                Some("F") => "F".to_string(),
                _ => String::new(),
            };
            let athlete_name = rest[..year_idx].join(" ");
            let team_end = rest.len().saturating_sub(2);
            let team_start = (year_idx + 2).min(team_end);
            let team = rest[team_start..team_end].join(" ");
            ParticipantRecord {
                bib_number,
                athlete_name,
                birth_year,
                sex,
                team,
                nationality,
                finish_time,
            }
        }
        None => {
            // No year column at all. The sheet then prints the sex marker
            // third from the end; the name is what sits between the first
            // name token and that marker.
            let sex = rest[rest.len() - 3].clone();
            let name_end = rest.len() - 3;
            let athlete_name = rest[1.min(name_end)..name_end].join(" ");
            ParticipantRecord {
                bib_number,
                athlete_name,
                birth_year: "null".to_string(),
                sex,
                team: String::new(),
                nationality,
                finish_time,
            }
        }
    }
}

/// Exactly four ASCII digits, or the literal `null` the timing software
/// prints for an unknown year (case-insensitive).
fn is_year_token(token: &str) -> bool {
    (token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        || token.eq_ignore_ascii_case("null")
}
