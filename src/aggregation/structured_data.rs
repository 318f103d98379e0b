//! schema.org JSON-LD for the agency and its reviews.

use serde_json::{json, Map, Value};

use super::UNRATED_DISPLAY_RATING;
use crate::models::ReviewSummary;

/// Build the `InsuranceAgency` JSON-LD document embedded in the site pages.
///
/// `aggregateRating` is left out when nothing has been rated, and a review
/// only carries `reviewRating` when its author rated.
pub fn agency_json_ld(name: &str, url: Option<&str>, summary: &ReviewSummary) -> Value {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!("https://schema.org"));
    doc.insert("@type".into(), json!("InsuranceAgency"));
    doc.insert("name".into(), json!(name));
    if let Some(url) = url {
        doc.insert("url".into(), json!(url));
    }

    if summary.rating_count > 0 {
        doc.insert(
            "aggregateRating".into(),
            json!({
                "@type": "AggregateRating",
                "ratingValue": summary.average_rating,
                "ratingCount": summary.rating_count,
                "bestRating": 5,
                "worstRating": 1,
            }),
        );
    }

    let reviews: Vec<Value> = summary
        .reviews
        .iter()
        .map(|review| {
            let mut item = json!({
                "@type": "Review",
                "author": { "@type": "Person", "name": review.author },
                "reviewBody": review.quote,
                "datePublished": review.date_published,
                "inLanguage": review.language,
            });
            if review.rating != UNRATED_DISPLAY_RATING {
                item["reviewRating"] = json!({
                    "@type": "Rating",
                    "ratingValue": review.rating,
                    "bestRating": 5,
                    "worstRating": 1,
                });
            }
            item
        })
        .collect();
    doc.insert("review".into(), Value::Array(reviews));

    Value::Object(doc)
}
