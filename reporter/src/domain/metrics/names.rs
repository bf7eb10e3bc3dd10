//! Metric name normalization
//!
//! Pure string functions that clean raw name fragments and join them into
//! Graphite-style dotted names. Sanitizing and joining are kept separate:
//! joining never re-splits or re-cleans what it is given.

use super::error::MetricError;

/// Doubled marker the cluster uses to flag its internal metrics (`__ack-count`)
pub const INTERNAL_METRIC_MARKER: &str = "__";

/// Path separator that may appear in raw names (stream ids, file-like keys)
pub const PATH_SEPARATOR: char = '/';

/// Separator between hierarchical name fragments
pub const NAME_SEPARATOR: &str = ".";

pub const COLON: char = ':';

pub const COLON_REPLACEMENT: &str = "_";

/// Remove restricted characters from a single name fragment.
///
/// Rewrites, in this order:
/// 1. every `__` is removed (anywhere in the fragment, not only as a prefix)
/// 2. `/` becomes `.`
/// 3. `:` becomes `_`
///
/// The marker removal runs first so characters produced by later rewrites
/// can never form a new marker.
pub fn sanitize_fragment(fragment: &str) -> String {
    fragment
        .replace(INTERNAL_METRIC_MARKER, "")
        .replace(PATH_SEPARATOR, NAME_SEPARATOR)
        .replace(COLON, COLON_REPLACEMENT)
}

/// Join name fragments with `.`, dropping blank ones (empty or whitespace only).
///
/// Order is preserved. No sanitization happens here.
pub fn join_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.trim().is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push_str(NAME_SEPARATOR);
        }
        joined.push_str(fragment);
    }
    joined
}

/// Fully-qualified name of a metric: component and operation joined as-is.
///
/// Both parts are expected to be sanitized already.
pub fn metric_name(component: &str, operation: &str) -> String {
    join_fragments([component, operation])
}

/// Portion of `operation` after the first occurrence of `marker`.
///
/// The marker is assumed to be followed by exactly one separator character,
/// which is skipped too (`"default.emit"` after `"default"` is `"emit"`).
/// When the marker does not occur, `operation` is returned unchanged.
///
/// A marker that ends the operation has nothing to skip and nothing to
/// return, which is reported as [`MetricError::MarkerAtEndOfString`].
pub fn operation_suffix_after<'a>(operation: &'a str, marker: &str) -> Result<&'a str, MetricError> {
    let Some(start) = operation.find(marker) else {
        return Ok(operation);
    };

    let mut rest = operation[start + marker.len()..].chars();
    if rest.next().is_none() {
        return Err(MetricError::MarkerAtEndOfString {
            operation: operation.to_string(),
            marker: marker.to_string(),
        });
    }
    Ok(rest.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // sanitize_fragment
    // ========================================================================

    #[test]
    fn test_sanitize_clean_fragment_unchanged() {
        for clean in ["", "emit-count", "spout.default", "a_b", "latency-ms", "x y"] {
            assert_eq!(sanitize_fragment(clean), clean);
        }
    }

    #[test]
    fn test_sanitize_single_rewrites() {
        assert_eq!(sanitize_fragment("a__b"), "ab");
        assert_eq!(sanitize_fragment("a/b"), "a.b");
        assert_eq!(sanitize_fragment("a:b"), "a_b");
    }

    #[test]
    fn test_sanitize_combined() {
        assert_eq!(
            sanitize_fragment("fsfd___fdsf//dsf:fds:f"),
            "fsfd_fdsf..dsf_fds_f"
        );
    }

    #[test]
    fn test_sanitize_marker_anywhere() {
        assert_eq!(sanitize_fragment("__emit-count"), "emit-count");
        assert_eq!(sanitize_fragment("emit__count__"), "emitcount");
        assert_eq!(sanitize_fragment("____"), "");
    }

    #[test]
    fn test_sanitize_colon_does_not_form_marker() {
        // ':' becomes '_' after marker removal, so "_:" stays "__"
        assert_eq!(sanitize_fragment("_:"), "__");
    }

    // ========================================================================
    // join_fragments / metric_name
    // ========================================================================

    #[test]
    fn test_join_empty() {
        assert_eq!(join_fragments(std::iter::empty::<&str>()), "");
    }

    #[test]
    fn test_join_drops_blank_fragments() {
        assert_eq!(join_fragments(["a", "", "b"]), "a.b");
        assert_eq!(join_fragments(["  ", "a", "\t", "b", ""]), "a.b");
        assert_eq!(join_fragments(["", " "]), "");
    }

    #[test]
    fn test_join_preserves_order_and_content() {
        assert_eq!(join_fragments(["c", "b", "a"]), "c.b.a");
        // no sanitization while joining
        assert_eq!(join_fragments(["__x", "a/b"]), "__x.a/b");
    }

    #[test]
    fn test_join_owned_strings() {
        let fragments = vec!["spout".to_string(), "emit".to_string()];
        assert_eq!(join_fragments(&fragments), "spout.emit");
    }

    #[test]
    fn test_metric_name() {
        assert_eq!(metric_name("spout", "emit-count"), "spout.emit-count");
        assert_eq!(metric_name("", "emit-count"), "emit-count");
        assert_eq!(metric_name("spout", ""), "spout");
    }

    // ========================================================================
    // operation_suffix_after
    // ========================================================================

    #[test]
    fn test_suffix_marker_absent() {
        for (operation, marker) in [("emit-count", "stream"), ("", "x"), ("abc", "abcd")] {
            assert_eq!(operation_suffix_after(operation, marker), Ok(operation));
        }
    }

    #[test]
    fn test_suffix_skips_marker_and_separator() {
        assert_eq!(
            operation_suffix_after("emit-count.default.latency", "default"),
            Ok("latency")
        );
        assert_eq!(operation_suffix_after("default.x", "default"), Ok("x"));
    }

    #[test]
    fn test_suffix_uses_first_occurrence() {
        assert_eq!(operation_suffix_after("a.s.b.s.c", "s"), Ok("b.s.c"));
    }

    #[test]
    fn test_suffix_single_trailing_separator_yields_empty() {
        assert_eq!(operation_suffix_after("emit.default.", "default"), Ok(""));
    }

    #[test]
    fn test_suffix_marker_at_end_is_error() {
        assert_eq!(
            operation_suffix_after("emit.default", "default"),
            Err(MetricError::MarkerAtEndOfString {
                operation: "emit.default".to_string(),
                marker: "default".to_string(),
            })
        );
    }

    #[test]
    fn test_suffix_skips_one_whole_character() {
        assert_eq!(operation_suffix_after("sé€tail", "s"), Ok("€tail"));
    }
}
