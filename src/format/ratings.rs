//! Parses `movieId,userId,rating,<ignored>` rating lines.

use std::io::{BufRead, ErrorKind};

use crate::types::{CanopyError, CanopyResult, MovieId, RatingRecord, UserId};

/// Number of comma-separated fields in a rating line.
const FIELD_COUNT: usize = 4;

/// Parse one rating line. `line_no` is 1-based and only used in errors.
pub fn parse_rating_line(line_no: usize, line: &str) -> CanopyResult<RatingRecord> {
    let malformed = |reason: String| CanopyError::MalformedRecord {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            fields.len()
        )));
    }

    let movie: MovieId = fields[0]
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid movie id {:?}", fields[0])))?;
    let user: UserId = fields[1]
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid user id {:?}", fields[1])))?;
    let rating: i32 = fields[2]
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid rating {:?}", fields[2])))?;

    Ok(RatingRecord::new(movie, user, rating))
}

/// Read every non-blank line with its 1-based line number. A line that is
/// not valid UTF-8 is a malformed record.
pub fn read_numbered_lines(reader: impl BufRead) -> CanopyResult<Vec<(usize, String)>> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => CanopyError::MalformedRecord {
                line: idx + 1,
                reason: e.to_string(),
            },
            _ => CanopyError::Io(e),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        lines.push((idx + 1, line));
    }
    Ok(lines)
}
