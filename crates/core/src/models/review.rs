use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub user_id: String,
    pub clinic_id: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub appointment_id: Uuid,
    pub user_id: String,
    pub clinic_id: String,
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub average_rating: f64,
    pub total_reviews: usize,
    pub rating_distribution: BTreeMap<i16, usize>,
}

impl ReviewStats {
    /// Aggregates raw ratings; the average is rounded to one decimal place.
    pub fn from_ratings(ratings: &[i16]) -> Self {
        if ratings.is_empty() {
            return Self {
                average_rating: 0.0,
                total_reviews: 0,
                rating_distribution: BTreeMap::new(),
            };
        }

        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        let average = sum as f64 / ratings.len() as f64;

        let mut rating_distribution = BTreeMap::new();
        for rating in ratings {
            *rating_distribution.entry(*rating).or_insert(0) += 1;
        }

        Self {
            average_rating: (average * 10.0).round() / 10.0,
            total_reviews: ratings.len(),
            rating_distribution,
        }
    }
}
