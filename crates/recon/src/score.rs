use semtui_protocol::{AnnotationMeta, Candidate};

/// Lowest / highest confidence score over a set of candidates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScoreBounds {
    pub lowest: f64,
    pub highest: f64,
}

impl ScoreBounds {
    pub const ZERO: ScoreBounds = ScoreBounds { lowest: 0.0, highest: 0.0 };
}

/// Anything exposing an optional score and match flag.
pub trait Scored {
    fn score(&self) -> Option<f64>;
    fn is_match(&self) -> bool;
}

impl Scored for Candidate {
    fn score(&self) -> Option<f64> {
        self.score
    }

    fn is_match(&self) -> bool {
        Candidate::is_match(self)
    }
}

/// Min/max of raw score values.
///
/// Empty input, or any missing or non-finite value, yields [`ScoreBounds::ZERO`].
pub fn score_bounds<I>(scores: I) -> ScoreBounds
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut bounds: Option<ScoreBounds> = None;
    for score in scores {
        let Some(s) = score.filter(|s| s.is_finite()) else {
            return ScoreBounds::ZERO;
        };
        bounds = Some(match bounds {
            None => ScoreBounds { lowest: s, highest: s },
            Some(b) => ScoreBounds { lowest: b.lowest.min(s), highest: b.highest.max(s) },
        });
    }
    bounds.unwrap_or(ScoreBounds::ZERO)
}

/// Score bounds over a candidate list.
pub fn candidate_bounds<T: Scored>(records: &[T]) -> ScoreBounds {
    score_bounds(records.iter().map(Scored::score))
}

/// True iff at least one record is flagged as a match.
pub fn value_match<T: Scored>(records: &[T]) -> bool {
    records.iter().any(Scored::is_match)
}

/// Cell-level annotation for a freshly merged candidate list.
///
/// A cell counts as annotated once the service returned at least one
/// candidate for it.
pub fn cell_annotation<T: Scored>(records: &[T]) -> AnnotationMeta {
    let bounds = candidate_bounds(records);
    AnnotationMeta::scored(!records.is_empty(), value_match(records), bounds.lowest, bounds.highest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(score: Option<f64>, matched: Option<bool>) -> Candidate {
        Candidate { id: "wd:Q1".into(), score, match_: matched, ..Default::default() }
    }

    #[test]
    fn bounds_of_scores() {
        let c = [cand(Some(0.4), Some(false)), cand(Some(0.9), Some(true)), cand(Some(0.1), None)];
        assert_eq!(candidate_bounds(&c), ScoreBounds { lowest: 0.1, highest: 0.9 });
    }

    #[test]
    fn empty_is_zero() {
        let c: [Candidate; 0] = [];
        assert_eq!(candidate_bounds(&c), ScoreBounds::ZERO);
    }

    #[test]
    fn missing_score_is_zero() {
        let c = [cand(Some(0.4), None), cand(None, None)];
        assert_eq!(candidate_bounds(&c), ScoreBounds::ZERO);
    }

    #[test]
    fn nan_score_is_zero() {
        assert_eq!(score_bounds([Some(0.3), Some(f64::NAN)]), ScoreBounds::ZERO);
    }

    #[test]
    fn value_match_any() {
        assert!(!value_match(&[cand(Some(0.4), Some(false)), cand(Some(0.2), None)]));
        assert!(value_match(&[cand(Some(0.4), Some(false)), cand(Some(0.2), Some(true))]));
    }

    #[test]
    fn single_match_annotation() {
        let meta = cell_annotation(&[cand(Some(0.9), Some(true))]);
        assert_eq!(meta, AnnotationMeta::scored(true, true, 0.9, 0.9));
    }

    #[test]
    fn no_candidates_not_annotated() {
        let c: [Candidate; 0] = [];
        assert_eq!(cell_annotation(&c), AnnotationMeta::scored(false, false, 0.0, 0.0));
    }
}
