//! Cluster assignment: which center each movie of the universe belongs to.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{CanopyError, CanopyResult, MovieId};

/// One movie and the center it is currently assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MemberRecord {
    pub movie: MovieId,
    pub center: MovieId,
}

impl MemberRecord {
    /// Create a new member record.
    pub fn new(movie: MovieId, center: MovieId) -> Self {
        Self { movie, center }
    }
}

/// Movie -> center map over the fixed universe `1..=movie_count`.
/// `None` marks a movie no center has claimed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    /// Indexed by movie id; slot 0 is unused.
    centers: Vec<Option<MovieId>>,
}

impl ClusterAssignment {
    /// Create an assignment with every movie unassigned.
    pub fn new(movie_count: u32) -> Self {
        Self {
            centers: vec![None; movie_count as usize + 1],
        }
    }

    /// Rebuild an assignment from member records.
    pub fn from_records(movie_count: u32, records: &[MemberRecord]) -> Self {
        let mut assignment = Self::new(movie_count);
        for record in records {
            assignment.assign(record.movie, record.center);
        }
        assignment
    }

    /// Size of the movie universe.
    pub fn movie_count(&self) -> u32 {
        (self.centers.len() - 1) as u32
    }

    /// Assign a movie to a center. Ids outside the universe are ignored.
    pub fn assign(&mut self, movie: MovieId, center: MovieId) {
        if movie == 0 {
            return;
        }
        if let Some(slot) = self.centers.get_mut(movie as usize) {
            *slot = Some(center);
        }
    }

    /// The center a movie is assigned to.
    pub fn center_of(&self, movie: MovieId) -> Option<MovieId> {
        if movie == 0 {
            return None;
        }
        self.centers.get(movie as usize).copied().flatten()
    }

    /// `(movie, center)` for every movie of the universe, ascending by movie.
    pub fn iter(&self) -> impl Iterator<Item = (MovieId, Option<MovieId>)> + '_ {
        self.centers
            .iter()
            .enumerate()
            .skip(1)
            .map(|(movie, &center)| (movie as MovieId, center))
    }

    /// Movies no center has claimed.
    pub fn unassigned(&self) -> Vec<MovieId> {
        self.iter()
            .filter(|(_, center)| center.is_none())
            .map(|(movie, _)| movie)
            .collect()
    }

    /// Distinct centers, ascending.
    pub fn centers(&self) -> BTreeSet<MovieId> {
        self.iter().filter_map(|(_, center)| center).collect()
    }

    /// Number of distinct centers.
    pub fn cluster_count(&self) -> usize {
        self.centers().len()
    }

    /// Member records for every movie, failing on the first unassigned one.
    pub fn to_records(&self) -> CanopyResult<Vec<MemberRecord>> {
        self.iter()
            .map(|(movie, center)| {
                center
                    .map(|center| MemberRecord::new(movie, center))
                    .ok_or(CanopyError::Unassigned(movie))
            })
            .collect()
    }
}
