//! Per-file favorite aggregation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use sharedrop_entity::collab::PhotoSelection;

/// Favorite tally for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteCount {
    pub favorites: usize,
    /// Users who favorited the file, sorted.
    pub users: Vec<String>,
}

/// Group selections by file, counting favorites and collecting who set them.
///
/// Recomputed from scratch on every call. The result depends only on the
/// set of records, not their order. Files with no favorites are omitted.
pub fn favorite_counts<'a>(
    selections: impl IntoIterator<Item = &'a PhotoSelection>,
) -> BTreeMap<String, FavoriteCount> {
    let mut by_file: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for selection in selections.into_iter().filter(|s| s.is_favorite) {
        by_file
            .entry(selection.file_name.as_str())
            .or_default()
            .insert(selection.user_name.as_str());
    }

    by_file
        .into_iter()
        .map(|(file, users)| {
            (
                file.to_string(),
                FavoriteCount {
                    favorites: users.len(),
                    users: users.into_iter().map(str::to_string).collect(),
                },
            )
        })
        .collect()
}
