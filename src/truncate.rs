//! Middle truncation for display strings.
//!
//! Long identifiers are recognisable by both ends, so instead of cutting the
//! tail off we keep a prefix and a suffix and elide the centre.

/// Marker spliced in place of the elided characters
pub const ELLIPSIS: &str = "...";

/// Default width used when identifiers are shown in messages
pub const DEFAULT_MAX_LENGTH: usize = 16;

/// Shortens `s` to at most `max_length` characters by eliding its middle.
///
/// Strings that already fit are returned unchanged. Otherwise the result is
/// `half` leading characters, [`ELLIPSIS`], and `half` trailing characters,
/// where `half = (max_length - 3) / 2`. When `max_length` leaves no room for
/// either end (`max_length < 5`) the result is the bare ellipsis.
///
/// Lengths are counted in `char`s, never bytes.
///
/// ```
/// use tutorpal::truncate::truncate_middle;
///
/// assert_eq!(truncate_middle("short", 16), "short");
/// assert_eq!(truncate_middle("abcdefghijklmnopqrstuvwxyz", 16), "abcdef...uvwxyz");
/// ```
pub fn truncate_middle(s: &str, max_length: usize) -> String {
    let len = s.chars().count();
    if len <= max_length {
        return s.to_string();
    }

    let half = max_length.saturating_sub(ELLIPSIS.len()) / 2;
    let mut out = String::with_capacity(half * 2 + ELLIPSIS.len());
    out.extend(s.chars().take(half));
    out.push_str(ELLIPSIS);
    out.extend(s.chars().skip(len - half));
    out
}
