// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordering of image sources by a user-chosen attribute.

pub mod natural;

use std::time::SystemTime;

use pagebinder_core::types::{SortCriterion, SortField, file_suffix};
use tracing::instrument;

use crate::source::ImageSource;

pub use natural::{NaturalKey, natural_cmp};

/// Return the sources ordered by `criterion`.
///
/// The sort is stable and ascending; `reversed` mirrors the finished order
/// rather than flipping the comparison, so ties come out in reverse input
/// order too. Sources whose creation time is unknown or whose size cannot be
/// read sort first. The input slice is left untouched.
#[instrument(skip(sources), fields(count = sources.len()))]
pub fn sort_sources(sources: &[ImageSource], criterion: SortCriterion) -> Vec<&ImageSource> {
    let mut ordered: Vec<&ImageSource> = sources.iter().collect();

    match criterion.field {
        SortField::Name => ordered.sort_by_cached_key(|s| NaturalKey::new(s.identifier())),
        SortField::CreationTime => {
            ordered.sort_by_cached_key(|s| s.created_at().unwrap_or(SystemTime::UNIX_EPOCH))
        }
        SortField::SizeBytes => ordered.sort_by_cached_key(|s| s.size_bytes().unwrap_or(0)),
        SortField::ExtensionType => ordered.sort_by_cached_key(|s| {
            file_suffix(s.identifier())
                .map(str::to_lowercase)
                .unwrap_or_default()
        }),
    }

    if criterion.reversed {
        ordered.reverse();
    }
    ordered
}

/// Owned variant of [`sort_sources`].
pub fn sorted(sources: &[ImageSource], criterion: SortCriterion) -> Vec<ImageSource> {
    sort_sources(sources, criterion)
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploads(names: &[&str]) -> Vec<ImageSource> {
        names
            .iter()
            .map(|n| ImageSource::upload(*n, n.as_bytes().to_vec()))
            .collect()
    }

    fn ids(sources: &[&ImageSource]) -> Vec<String> {
        sources.iter().map(|s| s.identifier().to_string()).collect()
    }

    #[test]
    fn name_sort_is_natural() {
        let input = uploads(&["b2.png", "a10.png", "a2.png"]);
        let ordered = sort_sources(&input, SortCriterion::new(SortField::Name));
        assert_eq!(ids(&ordered), vec!["a2.png", "a10.png", "b2.png"]);
    }

    #[test]
    fn reversed_is_mirror_of_ascending() {
        let input = uploads(&["b2.png", "a10.png", "a2.png", "c.gif"]);
        let ascending = ids(&sort_sources(&input, SortCriterion::new(SortField::Name)));
        let mut descending = ids(&sort_sources(
            &input,
            SortCriterion::new(SortField::Name).reversed(true),
        ));
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn sorting_is_idempotent() {
        let input = uploads(&["x10.jpg", "x9.jpg", "X1.jpg"]);
        let criterion = SortCriterion::new(SortField::Name);
        let once = sorted(&input, criterion);
        let twice = sorted(&once, criterion);
        assert_eq!(once, twice);
    }

    #[test]
    fn size_sort_uses_byte_length() {
        let input = vec![
            ImageSource::upload("big.png", vec![0u8; 30]),
            ImageSource::upload("small.png", vec![0u8; 3]),
            ImageSource::upload("mid.png", vec![0u8; 10]),
        ];
        let ordered = sort_sources(&input, SortCriterion::new(SortField::SizeBytes));
        assert_eq!(ids(&ordered), vec!["small.png", "mid.png", "big.png"]);
    }

    #[test]
    fn unreadable_size_sorts_first() {
        let dir = tempfile::tempdir().unwrap();
        let input = vec![
            ImageSource::upload("real.png", vec![0u8; 5]),
            ImageSource::file(dir.path().join("missing.png")),
        ];
        let ordered = sort_sources(&input, SortCriterion::new(SortField::SizeBytes));
        assert_eq!(ids(&ordered), vec!["missing.png", "real.png"]);
    }

    #[test]
    fn extension_sort_is_case_folded_and_stable() {
        let input = uploads(&["z.PNG", "a.jpg", "m.png", "b.JPG"]);
        let ordered = sort_sources(&input, SortCriterion::new(SortField::ExtensionType));
        assert_eq!(ids(&ordered), vec!["a.jpg", "b.JPG", "z.PNG", "m.png"]);
    }

    #[test]
    fn uploads_without_creation_time_sort_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("on_disk.png");
        std::fs::write(&path, b"x").unwrap();
        let input = vec![
            ImageSource::file(&path),
            ImageSource::upload("uploaded.png", vec![1u8]),
        ];
        let ordered = sort_sources(&input, SortCriterion::new(SortField::CreationTime));
        assert_eq!(ids(&ordered), vec!["uploaded.png", "on_disk.png"]);
    }

    #[test]
    fn creation_time_orders_folder_files_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let older = dir.path().join("z_first.png");
        let newer = dir.path().join("a_second.png");

        std::fs::write(&older, b"x").unwrap();
        // Coarse filesystem clocks still separate the two files.
        std::thread::sleep(std::time::Duration::from_millis(1100));
        std::fs::write(&newer, b"x").unwrap();

        // Platforms without creation time fall back to modification time.
        let now = SystemTime::now();
        let set_mtime = |path: &std::path::Path, at: SystemTime| {
            std::fs::File::options()
                .write(true)
                .open(path)
                .unwrap()
                .set_modified(at)
                .unwrap();
        };
        set_mtime(&older, now - std::time::Duration::from_secs(3600));
        set_mtime(&newer, now);

        let input = vec![ImageSource::file(&newer), ImageSource::file(&older)];
        let ascending = sort_sources(&input, SortCriterion::new(SortField::CreationTime));
        assert_eq!(ids(&ascending), vec!["z_first.png", "a_second.png"]);

        let descending = sort_sources(
            &input,
            SortCriterion::new(SortField::CreationTime).reversed(true),
        );
        assert_eq!(ids(&descending), vec!["a_second.png", "z_first.png"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = uploads(&["b.png", "a.png"]);
        let _ = sort_sources(&input, SortCriterion::new(SortField::Name));
        assert_eq!(input[0].identifier(), "b.png");
    }
}
