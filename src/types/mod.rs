//! All data types for the movie-canopy library.

pub mod error;
pub mod pair;
pub mod rating;

pub use error::{CanopyError, CanopyResult};
pub use pair::{MoviePairKey, MoviePairSample};
pub use rating::{RatingRecord, UserRatingVector};

/// Movie identifier. The movie universe is `1..=movie_count`.
pub type MovieId = u32;

/// User identifier.
pub type UserId = u32;

/// Loose canopy membership threshold.
pub const DEFAULT_T1: f64 = 0.80;

/// Tight canopy removal threshold.
pub const DEFAULT_T2: f64 = 0.95;

/// Number of medoid refinement rounds.
pub const DEFAULT_ITERATIONS: usize = 10;

/// Size of the movie-id universe (Netflix prize catalogue).
pub const DEFAULT_MOVIE_COUNT: u32 = 17_770;

/// Similarity substituted for an absent pair while scoring refinement
/// candidates. Applied to the incumbent center and to every candidate alike.
pub const MISSING_SIMILARITY: f64 = 0.8;

/// Similarity assigned to a pair whose co-ratings have zero magnitude on
/// either side.
pub const ZERO_MAGNITUDE_SIMILARITY: f64 = 0.0;
