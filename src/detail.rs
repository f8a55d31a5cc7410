//! Derivations for the movie detail view. Each value is independently
//! optional; linear scans with first-match-wins semantics.

use crate::models::{CastMember, CrewMember, Movie, MovieDetail};

pub const MAX_CAST: usize = 12;
pub const MAX_SIMILAR: usize = 10;

/// Key of the first YouTube video of type "Trailer".
pub fn trailer_key(detail: &MovieDetail) -> Option<&str> {
    detail
        .videos
        .as_ref()?
        .results
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
        .map(|v| v.key.as_str())
}

/// First crew entry credited as "Director". When several are listed, the
/// first one wins; there is no conflict resolution.
pub fn director(detail: &MovieDetail) -> Option<&CrewMember> {
    detail
        .credits
        .as_ref()?
        .crew
        .iter()
        .find(|c| c.job == "Director")
}

/// First `MAX_CAST` members in upstream order.
pub fn top_cast(detail: &MovieDetail) -> &[CastMember] {
    match detail.credits.as_ref() {
        Some(credits) => {
            let end = credits.cast.len().min(MAX_CAST);
            &credits.cast[..end]
        }
        None => &[],
    }
}

/// First `MAX_SIMILAR` similar titles in upstream order.
pub fn similar_movies(detail: &MovieDetail) -> &[Movie] {
    match detail.similar.as_ref() {
        Some(similar) => {
            let end = similar.results.len().min(MAX_SIMILAR);
            &similar.results[..end]
        }
        None => &[],
    }
}
