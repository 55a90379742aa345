/// Join `base` and path segments with exactly one `/` between each.
///
/// Leading and trailing slashes on every piece are ignored, so
/// `("http://h/api/", ["reconciliators", "/wikidata"])` and
/// `("http://h/api", ["reconciliators/", "wikidata"])` give the same URL.
/// Empty segments are dropped.
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_separator() {
        let expected = "http://localhost:3002/api/reconciliators/wikidata";
        assert_eq!(join_url("http://localhost:3002/api/", &["reconciliators", "/wikidata"]), expected);
        assert_eq!(join_url("http://localhost:3002/api", &["reconciliators/", "wikidata"]), expected);
        assert_eq!(join_url("http://localhost:3002/api//", &["/reconciliators/", "//wikidata/"]), expected);
    }

    #[test]
    fn nested_relative_url_kept() {
        assert_eq!(
            join_url("http://h/api/", &["extenders", "/wikidata/entities"]),
            "http://h/api/extenders/wikidata/entities"
        );
    }

    #[test]
    fn empty_segments_dropped() {
        assert_eq!(join_url("http://h/api/", &["dataset", "", "7"]), "http://h/api/dataset/7");
        assert_eq!(join_url("http://h/api/", &[]), "http://h/api");
    }
}
