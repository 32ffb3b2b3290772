/// Specificity scoring for route templates
///
/// A score is a comparable key: smaller sorts first and wins ties in the
/// manifest. Segment ranks are compared position by position; a template
/// that ends earlier gets an `End` rank in that position, which sits between
/// a dynamic segment and a rest segment. That makes
///
/// - `/blog` win over `/blog/[...slug]` (End < Rest)
/// - `/blog/[id]` win over `/blog` (Dynamic < End)
/// - `/` win over `/[...rest]`
///
/// Within the same shape, deeper source files sort first.

use std::cmp::Reverse;

use super::parser::RouteTemplate;
use super::pattern::PathSegment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SegmentRank {
    Static = 0,
    Dynamic = 1,
    End = 2,
    Rest = 3,
}

impl From<&PathSegment> for SegmentRank {
    fn from(segment: &PathSegment) -> Self {
        match segment {
            PathSegment::Static(_) => SegmentRank::Static,
            PathSegment::Dynamic(_) => SegmentRank::Dynamic,
            PathSegment::Rest { .. } => SegmentRank::Rest,
        }
    }
}

/// Ordered specificity key
///
/// Field order matters: the derived `Ord` compares `ranks` first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecificityScore {
    ranks: Vec<SegmentRank>,
    nesting: Reverse<usize>,
}

impl SpecificityScore {
    /// Rank vector without the depth tie-breaker, terminated by
    /// [`SegmentRank::End`]
    pub fn shape(&self) -> &[SegmentRank] {
        &self.ranks
    }

    pub fn depth(&self) -> usize {
        self.nesting.0
    }
}

impl RouteTemplate {
    /// Computes the specificity score (pure function)
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::RouteTemplate;
    ///
    /// let about = RouteTemplate::parse("/about").unwrap().specificity();
    /// let dynamic = RouteTemplate::parse("/[page]").unwrap().specificity();
    /// let rest = RouteTemplate::parse("/[...rest]").unwrap().specificity();
    ///
    /// assert!(about < dynamic);
    /// assert!(dynamic < rest);
    /// ```
    pub fn specificity(&self) -> SpecificityScore {
        let ranks = self
            .segments()
            .iter()
            .map(SegmentRank::from)
            .chain(std::iter::once(SegmentRank::End))
            .collect();

        SpecificityScore {
            ranks,
            nesting: Reverse(self.depth()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(pattern: &str) -> SpecificityScore {
        RouteTemplate::parse(pattern).unwrap().specificity()
    }

    fn file_score(path: &str) -> SpecificityScore {
        RouteTemplate::from_file_path(path).unwrap().specificity()
    }

    #[test]
    fn test_static_beats_dynamic_beats_rest() {
        assert!(score("/about") < score("/[page]"));
        assert!(score("/[page]") < score("/[...rest]"));
    }

    #[test]
    fn test_static_prefix_beats_dynamic_prefix() {
        assert!(score("/static/[dynamic]") < score("/[dynamic]/static"));
    }

    #[test]
    fn test_exact_path_beats_rest_below_it() {
        assert!(score("/blog") < score("/blog/[...slug]"));
        assert!(score("/") < score("/[...rest]"));
    }

    #[test]
    fn test_longer_dynamic_beats_shorter() {
        assert!(score("/blog/[id]") < score("/blog"));
    }

    #[test]
    fn test_deeper_file_wins_same_shape() {
        let nested = file_score("[...rest]/index");
        let flat = file_score("[...rest]");
        assert_eq!(nested.shape(), flat.shape());
        assert!(nested < flat);
    }

    #[test]
    fn test_ranks_end_with_terminator() {
        let s = score("/a/[b]");
        assert_eq!(
            s.shape(),
            &[SegmentRank::Static, SegmentRank::Dynamic, SegmentRank::End]
        );
        assert_eq!(s.depth(), 1);
    }
}
