// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonicalizes path strings to the normalized form every other component
//! assumes: `/`-separated, non-empty segments, no `.`/`..`, no leading or
//! trailing slash. The empty string denotes the root.

/// Splits a normalized path into its segments. The root (`""`) has zero
/// segments.
pub fn segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    }
}

/// Rejoins segments into a normalized path.
pub fn join(segments: &[&str]) -> String {
    segments.join("/")
}

/// Normalizes an arbitrary path string: drops empty segments produced by
/// leading, trailing or repeated slashes, and rejects `.`/`..` components by
/// silently dropping `.` and returning `None` when a `..` is encountered
/// (the caller cannot normalize a path that escapes its root).
///
/// `normalize` is idempotent: `normalize(normalize(x)) == normalize(x)` for
/// every `x` that normalizes successfully.
pub fn normalize(path: &str) -> Option<String> {
    let mut out = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => continue,
            ".." => return None,
            seg => out.push(seg),
        }
    }
    Some(out.join("/"))
}

/// The last segment and parent of a normalized path. The root has an empty
/// parent and an empty last segment.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => {
            if path.is_empty() {
                ("", "")
            } else {
                ("", path)
            }
        }
    }
}

/// Joins a parent and a child segment into a normalized path, handling the
/// case where either side is empty (root).
pub fn join_parent_child(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, true) => String::new(),
        (true, false) => child.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{parent}/{child}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn root_is_empty_string() {
        assert_eq!(normalize("").as_deref(), Some(""));
        assert_eq!(normalize("/").as_deref(), Some(""));
        assert_eq!(normalize("///").as_deref(), Some(""));
    }

    #[test]
    fn drops_leading_trailing_repeated_slashes() {
        assert_eq!(normalize("/a/b/").as_deref(), Some("a/b"));
        assert_eq!(normalize("a//b").as_deref(), Some("a/b"));
        assert_eq!(normalize("a/./b").as_deref(), Some("a/b"));
    }

    #[test]
    fn rejects_dotdot() {
        assert_eq!(normalize("a/../b"), None);
        assert_eq!(normalize(".."), None);
    }

    #[test]
    fn idempotent() {
        for p in ["", "/", "a/b/c", "a//b/", "./a/b"] {
            if let Some(once) = normalize(p) {
                let twice = normalize(&once).unwrap();
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn split_parent_root() {
        assert_eq!(split_parent(""), ("", ""));
    }

    #[test]
    fn split_parent_nested() {
        assert_eq!(split_parent("a/b/c"), ("a/b", "c"));
        assert_eq!(split_parent("c"), ("", "c"));
    }
}
