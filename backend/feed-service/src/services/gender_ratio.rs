//! Gender-ratio page reshaping for male viewers
//!
//! For a page of `total` posts the target is `floor(total * ratio)`
//! female-authored posts. When the page holds enough of them, a uniform
//! sample of that size is kept and the remainder is filled from the
//! male/unspecified pool. A page without enough female-authored posts is
//! returned as fetched.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{FeedPost, Gender, UserProfile};

#[derive(Debug, Clone, PartialEq)]
pub struct RatioOutcome {
    /// Newest first when `applied`, otherwise in fetch order
    pub items: Vec<FeedPost>,
    pub applied: bool,
}

/// Whether `viewer` gets a reshaped page.
pub fn applies_to(viewer: &UserProfile) -> bool {
    viewer.gender == Some(Gender::Male)
}

pub fn redistribute<R>(items: Vec<FeedPost>, female_ratio: f64, rng: &mut R) -> RatioOutcome
where
    R: Rng + ?Sized,
{
    let total = items.len();
    let target_female = (total as f64 * female_ratio).floor() as usize;
    let female_count = items.iter().filter(|post| is_female(post)).count();

    if target_female == 0 || female_count < target_female {
        return RatioOutcome {
            items,
            applied: false,
        };
    }

    let target_other = total - target_female;
    let (mut female, mut other): (Vec<FeedPost>, Vec<FeedPost>) =
        items.into_iter().partition(is_female);

    female.shuffle(rng);
    female.truncate(target_female);
    // The fill draws only on non-female posts; a short pool shrinks the page
    other.shuffle(rng);
    other.truncate(target_other);

    let mut selected = female;
    selected.extend(other);
    selected.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    RatioOutcome {
        items: selected,
        applied: true,
    }
}

fn is_female(post: &FeedPost) -> bool {
    post.author.gender == Some(Gender::Female)
}
