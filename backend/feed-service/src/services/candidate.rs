use std::collections::BTreeSet;
use uuid::Uuid;

/// Authors whose posts may appear in `viewer`'s feed: everyone they follow
/// plus the viewer, each id once.
pub fn candidate_authors<I>(viewer: Uuid, following: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = Uuid>,
{
    let mut authors: BTreeSet<Uuid> = following.into_iter().collect();
    authors.insert(viewer);
    authors.into_iter().collect()
}
