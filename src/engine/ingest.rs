//! Rating ingest: raw lines to per-user rating vectors.

use std::io::BufRead;

use crate::format::{parse_rating_line, read_numbered_lines};
use crate::types::{CanopyResult, MovieId, UserId, UserRatingVector};

use super::stage::{LocalExecutor, Stage};

/// Parses rating lines and groups them by user. Any malformed line fails the
/// whole ingest.
#[derive(Debug, Default, Clone, Copy)]
pub struct RatingIngest;

impl RatingIngest {
    /// Create a new ingest stage.
    pub fn new() -> Self {
        Self
    }

    /// Read every rating line from `reader` and build one vector per user,
    /// ascending by user id.
    pub fn ingest(
        &self,
        executor: &LocalExecutor,
        reader: impl BufRead,
    ) -> CanopyResult<Vec<UserRatingVector>> {
        let lines = read_numbered_lines(reader)?;
        let record_count = lines.len();
        let vectors = executor.run(self, lines)?;
        log::info!(
            "Ingested {} ratings from {} users",
            record_count,
            vectors.len()
        );
        Ok(vectors)
    }
}

impl Stage for RatingIngest {
    type Input = (usize, String);
    type Key = UserId;
    type Value = (MovieId, i32);
    type Output = UserRatingVector;

    fn name(&self) -> &'static str {
        "rating-ingest"
    }

    fn map(&self, (line_no, line): (usize, String)) -> CanopyResult<Vec<(UserId, (MovieId, i32))>> {
        let record = parse_rating_line(line_no, &line)?;
        Ok(vec![(record.user, (record.movie, record.rating))])
    }

    fn reduce(
        &self,
        user: UserId,
        ratings: Vec<(MovieId, i32)>,
    ) -> CanopyResult<Vec<UserRatingVector>> {
        Ok(vec![UserRatingVector::from_ratings(user, ratings)?])
    }
}
