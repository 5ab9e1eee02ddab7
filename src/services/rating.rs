use crate::{
    models::{Candidate, Rating, RatingTier},
    notice::Notices,
    services::metadata::MetadataClient,
};

pub const TOP_RATED_MIN: f32 = 8.0;
pub const GOOD_MIN: f32 = 6.5;
pub const AVERAGE_MIN: f32 = 5.0;

/// Bucket a rating into one of the four concrete tiers (never `All`)
pub fn classify(rating: Rating) -> RatingTier {
    let value = rating.value();
    if value >= TOP_RATED_MIN {
        RatingTier::TopRated
    } else if value >= GOOD_MIN {
        RatingTier::Good
    } else if value >= AVERAGE_MIN {
        RatingTier::Average
    } else {
        RatingTier::LowRated
    }
}

/// Keep the candidates whose rating falls in `tier`
///
/// `All` returns the input untouched without any lookups. Any other tier fetches
/// details for every candidate, one after another; there is no caching, so this is
/// meant for the short lists the search form produces.
pub async fn filter(
    candidates: Vec<Candidate>,
    tier: RatingTier,
    metadata: &MetadataClient,
    notices: &mut Notices,
) -> Vec<Candidate> {
    if tier == RatingTier::All {
        return candidates;
    }

    let total = candidates.len();
    let mut kept = Vec::with_capacity(total);
    for candidate in candidates {
        let details = metadata.fetch_details(&candidate.external_id, notices).await;
        if classify(details.rating) == tier {
            kept.push(candidate);
        }
    }

    tracing::info!(
        tier = %tier,
        total,
        kept = kept.len(),
        "Rating filter applied"
    );

    kept
}
