//! Review/rating aggregation.
//!
//! Reviews and ratings live in separate collections with no foreign key. A
//! review is matched to a rating through its correlation key: the `user_id`
//! stored at submission time, or for older rows the hash of the username.
//! The match is best effort and nothing enforces that either side exists.

mod stars;
mod structured_data;

pub use stars::*;
pub use structured_data::*;

use std::collections::HashMap;

use crate::db::Repository;
use crate::models::{derive_user_id, Rating, Review, ReviewDisplay, ReviewSummary};

/// Rating shown for a review whose author never rated.
///
/// Unrated reviews display as 0 stars rather than 1 so that an unrated review
/// can never be mistaken for a one-star complaint.
pub const UNRATED_DISPLAY_RATING: i64 = 0;

/// Build the reviews page view from the store.
///
/// Never fails: if either collection cannot be read the empty summary is
/// returned so the page renders a "no reviews yet" state instead of an error.
pub async fn review_summary(repo: &Repository) -> ReviewSummary {
    let (reviews, ratings) = tokio::join!(repo.list_reviews(), repo.list_ratings());

    match (reviews, ratings) {
        (Ok(reviews), Ok(ratings)) => summarize(reviews, ratings),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Serving empty review summary: {}", e);
            ReviewSummary::default()
        }
    }
}

/// Join reviews to ratings and compute the aggregate figures.
pub fn summarize(reviews: Vec<Review>, ratings: Vec<Rating>) -> ReviewSummary {
    let by_user: HashMap<&str, i64> = ratings
        .iter()
        .map(|r| (r.user_id.as_str(), r.rating))
        .collect();

    let reviews = reviews
        .into_iter()
        .map(|review| {
            let rating = by_user
                .get(correlation_key(&review).as_str())
                .copied()
                .unwrap_or(UNRATED_DISPLAY_RATING);
            ReviewDisplay {
                quote: review.comment,
                author: review.username,
                rating,
                stars: render_stars(rating as f64),
                language: review.language,
                date_published: review.date_published,
            }
        })
        .collect();

    ReviewSummary {
        reviews,
        average_rating: average_rating(&ratings),
        rating_count: ratings.len(),
        ratings,
    }
}

/// The key a review's rating is stored under.
pub fn correlation_key(review: &Review) -> String {
    match review.user_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => derive_user_id(&review.username),
    }
}

/// Mean of all ratings rounded to two decimals; 0 for an empty set.
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| r.rating).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 100.0).round() / 100.0
}
