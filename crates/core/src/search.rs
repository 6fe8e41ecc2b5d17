use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::tile::Tile;

/// Indices of tiles whose name or category matches `needle`, best first.
pub fn matching_tiles(tiles: &[Tile], needle: &str) -> Vec<usize> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Vec::new();
    }
    let m = SkimMatcherV2::default();
    let mut hits: Vec<(i64, usize)> = tiles
        .iter()
        .enumerate()
        .filter_map(|(i, t)| {
            let score = m
                .fuzzy_match(&t.name, needle)
                .max(m.fuzzy_match(&t.category, needle))?;
            Some((score, i))
        })
        .collect();
    hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    hits.into_iter().map(|(_, i)| i).collect()
}
