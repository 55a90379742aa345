//! Entity name formatting: raw service names become `{value, uri}` links.

use semtui_protocol::{Candidate, ColumnMetadata, EntityName, MatchResult};

/// `{value: name, uri: base_uri + local_id}`.
pub fn parse_name_field(name: &str, base_uri: &str, local_id: &str) -> EntityName {
    EntityName::linked(name, format!("{base_uri}{local_id}"))
}

/// Local part of a compound entity id (`wd:Q42` → `Q42`).
pub fn local_id(compound: &str) -> Option<&str> {
    compound.split(':').nth(1)
}

/// Link every candidate name against `base_uri`.
///
/// Candidates whose id has no `prefix:` part are left as they are.
/// Returns how many were skipped.
pub fn format_candidates(candidates: &mut [Candidate], base_uri: &str) -> usize {
    let mut skipped = 0;
    for candidate in candidates.iter_mut() {
        match local_id(&candidate.id) {
            Some(local) => {
                candidate.name = parse_name_field(candidate.name.value(), base_uri, local);
            }
            None => {
                log::warn!("entity id '{}' has no prefix separator, name left unformatted", candidate.id);
                skipped += 1;
            }
        }
    }
    skipped
}

/// Format the candidates of every reconciliation result.
pub fn format_match_results(results: &mut [MatchResult], base_uri: &str) -> usize {
    results
        .iter_mut()
        .map(|r| format_candidates(&mut r.metadata, base_uri))
        .sum()
}

/// Format the `entity` list of each column-level metadata entry.
pub fn format_column_metadata(metadata: &mut [ColumnMetadata], base_uri: &str) -> usize {
    metadata
        .iter_mut()
        .map(|m| format_candidates(&mut m.entity, base_uri))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_field_joins_uri() {
        let name = parse_name_field("Paris", "http://kg.example/", "Q90");
        assert_eq!(name, EntityName::linked("Paris", "http://kg.example/Q90"));
    }

    #[test]
    fn local_id_after_separator() {
        assert_eq!(local_id("wd:Q42"), Some("Q42"));
        assert_eq!(local_id("Q42"), None);
        assert_eq!(local_id("wd:"), Some(""));
    }

    #[test]
    fn malformed_ids_are_skipped() {
        let mut c = vec![
            Candidate { id: "wd:Q490".into(), name: EntityName::Plain("Milan".into()), ..Default::default() },
            Candidate { id: "Q220".into(), name: EntityName::Plain("Rome".into()), ..Default::default() },
        ];
        let skipped = format_candidates(&mut c, "https://www.wikidata.org/wiki/");
        assert_eq!(skipped, 1);
        assert_eq!(c[0].name.uri(), Some("https://www.wikidata.org/wiki/Q490"));
        assert_eq!(c[1].name, EntityName::Plain("Rome".into()));
    }

    #[test]
    fn formatting_twice_is_stable() {
        let mut c = vec![Candidate { id: "wd:Q490".into(), name: EntityName::Plain("Milan".into()), ..Default::default() }];
        format_candidates(&mut c, "https://www.wikidata.org/wiki/");
        let once = c.clone();
        format_candidates(&mut c, "https://www.wikidata.org/wiki/");
        assert_eq!(c, once);
    }
}
