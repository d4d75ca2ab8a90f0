// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-path evaluation state threaded through a rule chain: the active
//! slice window over the path's segments, and the captures from the most
//! recent successful `match` (spec §4.5 steps 2-3, §9 on `rewrite` fallback).

/// Resolves a signed, Python-style slice index against a window of length
/// `n`: non-negative values count from the start and clamp to `n`; negative
/// values count back from the end and clamp to `0`.
fn signed_index(n: i64, v: i64) -> i64 {
    if v >= 0 {
        v.min(n)
    } else {
        (n + v).max(0)
    }
}

/// Resolves `(match_start, match_stop)` into an ordered absolute `(lo, hi)`
/// pair, both in `0..=total_len`. Per spec §4.5 step 2, `start`/`stop` are
/// only the inherited window's bounds (`default_lo`/`default_hi`) when the
/// respective key is *unset*; when a key *is* set, it is a signed index
/// into the whole path's segments (`total_len`), not into the inherited
/// window — an inner `matchStart`/`matchStop` always addresses the full
/// path, even nested under a parent that already narrowed the window.
/// `match_stop == 0` means "to the end" of the whole path. If the resolved
/// bounds are inverted the window collapses to the empty slice at `lo`
/// rather than erroring (the spec leaves this case open; an empty match is
/// the least surprising reading of "start past stop").
pub fn resolve_window(
    total_len: usize,
    default_lo: usize,
    default_hi: usize,
    match_start: Option<i32>,
    match_stop: Option<i32>,
) -> (usize, usize) {
    let n = total_len as i64;
    let lo = match match_start {
        Some(v) => signed_index(n, v as i64) as usize,
        None => default_lo,
    };
    let hi = match match_stop {
        None => default_hi,
        Some(0) => total_len,
        Some(v) => signed_index(n, v as i64) as usize,
    };
    if lo > hi {
        (lo, lo)
    } else {
        (lo, hi)
    }
}

/// The evaluation state for a single path, threaded down one rule chain.
/// Each chain (the descent through `allOf`/`anyOf`/`oneOf`/`if`/`next`) owns
/// its own `MatchState`, branching it independently from the point it was
/// handed.
#[derive(Debug, Clone)]
pub struct MatchState {
    segments: Vec<String>,
    pub start: usize,
    pub stop: usize,
    /// Captures from the most recent successful `match` anywhere in this
    /// chain, group 0 first. Empty if no `match` has fired yet.
    pub captures: Vec<Option<String>>,
    /// True once any ancestor's `match` has fired. Used by `rewrite` to
    /// decide whether to fall back to an implicit `(.*)` capture of the
    /// current slice (spec §9).
    pub matched: bool,
}

impl MatchState {
    /// The initial state for a path: the whole segment list as the window,
    /// no captures yet.
    pub fn root(path: &str) -> Self {
        let segments: Vec<String> = crate::path::segments(path).into_iter().map(str::to_string).collect();
        let stop = segments.len();
        Self {
            segments,
            start: 0,
            stop,
            captures: Vec::new(),
            matched: false,
        }
    }

    /// The segments in the active window.
    pub fn slice(&self) -> &[String] {
        &self.segments[self.start..self.stop]
    }

    /// The active window joined back into a path string, the text a
    /// `match` pattern is attempted against.
    pub fn slice_text(&self) -> String {
        let refs: Vec<&str> = self.slice().iter().map(String::as_str).collect();
        crate::path::join(&refs)
    }

    /// Resolves `matchStart`/`matchStop` into the new absolute `(start,
    /// stop)` bounds into `self.segments`: a set key is a signed index into
    /// the whole path, an unset key falls back to this state's own
    /// (already absolute) window.
    pub fn resolve(&self, match_start: Option<i32>, match_stop: Option<i32>) -> (usize, usize) {
        resolve_window(self.segments.len(), self.start, self.stop, match_start, match_stop)
    }

    /// Joins `self.segments[lo..hi]` (absolute indices, as returned by
    /// [`MatchState::resolve`]) back into a path string.
    pub fn segment_range_text(&self, lo: usize, hi: usize) -> String {
        let refs: Vec<&str> = self.segments[lo..hi].iter().map(String::as_str).collect();
        crate::path::join(&refs)
    }

    /// A child state with a narrowed window but unchanged captures: used
    /// when a node sets `matchStart`/`matchStop` without a `match` pattern
    /// of its own.
    pub fn with_window(&self, start: usize, stop: usize) -> Self {
        Self {
            segments: self.segments.clone(),
            start,
            stop,
            captures: self.captures.clone(),
            matched: self.matched,
        }
    }

    /// A child state after a successful `match`: window narrowed to the
    /// matched bounds and captures replaced with the new match's groups.
    pub fn with_match(&self, start: usize, stop: usize, captures: Vec<Option<String>>) -> Self {
        Self {
            segments: self.segments.clone(),
            start,
            stop,
            captures,
            matched: true,
        }
    }

    /// Builds the state handed to a successor rule: the same captures and
    /// slice window as `self`, re-bound to `path`'s own segments (spec §4.5
    /// step 6: "a state whose captures are inherited from the current match,
    /// and whose start/stop are the effective values of this rule"). Bounds
    /// are clamped to the new segment count since a `rewrite` can change how
    /// many segments the path has.
    pub fn rebased(&self, path: &str) -> Self {
        let segments: Vec<String> = crate::path::segments(path).into_iter().map(str::to_string).collect();
        let len = segments.len();
        let start = self.start.min(len);
        let stop = self.stop.clamp(start, len);
        Self {
            segments,
            start,
            stop,
            captures: self.captures.clone(),
            matched: self.matched,
        }
    }

    /// Splices `rewritten` (a `/`-joined slice) back into the full segment
    /// sequence at this state's active window, re-normalizing the result
    /// (spec §4.5: "splice the rewritten slice back into the full segment
    /// sequence at `[start..stop_effective]`"). Segments outside the window
    /// are untouched, so a `rewrite` under a narrowed `matchStart`/`matchStop`
    /// only ever changes the slice it matched against.
    pub fn splice_rewrite(&self, rewritten: &str) -> String {
        let mut parts: Vec<&str> = self.segments[..self.start].iter().map(String::as_str).collect();
        if !rewritten.is_empty() {
            parts.extend(rewritten.split('/'));
        }
        parts.extend(self.segments[self.stop..].iter().map(String::as_str));
        crate::path::normalize(&crate::path::join(&parts)).unwrap_or_else(|| crate::path::join(&parts))
    }
}
