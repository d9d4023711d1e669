//! # Path Module
//!
//! Normalization and joining of URL path chunks.
//!
//! Every path the registry hands to a host application goes through this module.
//! A normalized chunk has exactly one leading `/`, no trailing `/` (unless the
//! whole chunk is the root `/`) and no empty segments.
//!
//! ```rust
//! use brrtplus::path::{compose, normalize};
//!
//! assert_eq!(normalize("//chunk///"), "/chunk");
//! assert_eq!(normalize(""), "/");
//! assert_eq!(compose(["/a", "/b/"]), "/a/b");
//! ```
//!
//! Both functions are pure and never fail: any string input yields a valid path.

/// Normalize a raw path chunk.
///
/// Splits on `/`, drops the empty segments produced by leading, trailing or
/// repeated slashes, and rejoins the rest under a single leading `/`.
///
/// Normalization is idempotent: `normalize(&normalize(s)) == normalize(s)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Compose several raw chunks into one normalized path.
///
/// Each chunk is normalized on its own, the results are concatenated, and the
/// concatenation is normalized again so that a root chunk (`/`) does not leave
/// a doubled slash at the join point.
///
/// ```rust
/// use brrtplus::path::compose;
///
/// assert_eq!(compose(["/", "/pets"]), "/pets");
/// assert_eq!(compose(["ns", "{id}/"]), "/ns/{id}");
/// assert_eq!(compose(["", "/"]), "/");
/// ```
#[must_use]
pub fn compose<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: String = segments
        .into_iter()
        .map(|s| normalize(s.as_ref()))
        .collect();
    normalize(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_chunk_variants() {
        let valid = "/chunk";
        for raw in [
            "/chunk", "chunk", "//chunk", "///chunk", "/chunk//", "chunk/", "chunk//", "chunk///",
        ] {
            assert_eq!(normalize(raw), valid, "input {raw:?}");
        }

        let valid = "/double/chunk";
        assert_eq!(normalize("/double/chunk"), valid);
        assert_eq!(normalize("//double/chunk"), valid);
        assert_eq!(normalize("/double/chunk//"), valid);
        assert_eq!(normalize("double//chunk"), valid);
    }

    #[test]
    fn test_normalize_root_and_empty() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("////"), "/");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["", "/", "a", "//a//b//", "/x/{id}/", "a b/c", "///"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_compose_join_points() {
        assert_eq!(compose(["/a", "/b/"]), "/a/b");
        assert_eq!(compose(["a/", "/b"]), "/a/b");
        assert_eq!(compose(["/", "/b"]), "/b");
        assert_eq!(compose(["/ns", "/"]), "/ns");
        assert_eq!(compose(["/", "/"]), "/");
        assert_eq!(compose(Vec::<&str>::new()), "/");
    }

    #[test]
    fn test_compose_keeps_templates() {
        assert_eq!(
            compose(["/users/", "{user_id}", "/posts/{post_id}/"]),
            "/users/{user_id}/posts/{post_id}"
        );
    }
}
