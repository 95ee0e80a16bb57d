//! Property tests for source-to-target path mapping.

use code_minify::app::paths::{normalize_root, to_target_path, PathMapper};
use proptest::prelude::*;
use std::path::Path;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,8}".prop_filter("not a dot segment", |s| s != "." && s != "..")
}

fn relative_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|parts| parts.join("/"))
}

proptest! {
    /// Every path below the source root lands below the target root with the same tail.
    #[test]
    fn prefix_is_swapped(src in relative_path(), dst in relative_path(), rel in relative_path()) {
        let source = format!("{src}/{rel}");
        let mapped = to_target_path(&source, &src, &dst);
        prop_assert_eq!(mapped, format!("{dst}/{rel}"));
    }

    /// A trailing separator on either root does not change the mapping.
    #[test]
    fn trailing_separator_is_irrelevant(src in relative_path(), dst in relative_path(), rel in relative_path()) {
        let source = format!("{src}/{rel}");
        prop_assert_eq!(
            to_target_path(&source, &src, &dst),
            to_target_path(&source, &format!("{src}/"), &format!("{dst}/"))
        );
    }

    /// Directories map onto the same tail below the target root.
    #[test]
    fn directories_follow_files(src in relative_path(), dst in relative_path(), rel in relative_path()) {
        let mapper = PathMapper::new(Path::new(&src), Path::new(&dst));
        prop_assert_eq!(mapper.map_directory(&format!("{src}/{rel}")), format!("{dst}/{rel}"));
        prop_assert_eq!(mapper.map_directory(&src), dst);
    }

    #[test]
    fn normalized_root_ends_with_one_separator(root in relative_path(), slashes in 0usize..3) {
        let root_with = format!("{root}{}", "/".repeat(slashes));
        let normalized = normalize_root(&root_with);
        prop_assert!(normalized.ends_with('/'));
        prop_assert!(!normalized.ends_with("//"));
    }
}

#[test]
fn unrelated_paths_are_left_alone() {
    assert_eq!(to_target_path("elsewhere/a.php", "src", "dist"), "elsewhere/a.php");
}
