use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GradingError;

/// A rubric dimension along which a learner summary is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    ContentQuality,
    ContentCoverage,
    ContentCoherence,
    Argument,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::ContentQuality,
        Criterion::ContentCoverage,
        Criterion::ContentCoherence,
        Criterion::Argument,
    ];

    /// Human readable label, the one shown to the model.
    pub fn name(&self) -> &'static str {
        match self {
            Criterion::ContentQuality => "Content Quality",
            Criterion::ContentCoverage => "Content Coverage",
            Criterion::ContentCoherence => "Content Coherence",
            Criterion::Argument => "Argument",
        }
    }

    /// Compact identifier used in reports.
    pub fn key(&self) -> &'static str {
        match self {
            Criterion::ContentQuality => "ContentQuality",
            Criterion::ContentCoverage => "ContentCoverage",
            Criterion::ContentCoherence => "ContentCoherence",
            Criterion::Argument => "Argument",
        }
    }

    pub fn definition(&self) -> &'static str {
        match self {
            Criterion::ContentQuality => {
                "The degree to which ideas in the summary are related to the topic"
            }
            Criterion::ContentCoverage => {
                "The degree to which central ideas from the article are clearly expressed"
            }
            Criterion::ContentCoherence => {
                "The degree to which ideas in the summary are related to one another and coherently organized"
            }
            Criterion::Argument => {
                "The degree to which the summary states and elaborates a clear claim"
            }
        }
    }

    /// Level descriptions for scores 0 through 5.
    pub fn score_guide(&self) -> &'static str {
        match self {
            Criterion::ContentQuality => CONTENT_QUALITY_GUIDE,
            Criterion::ContentCoverage => CONTENT_COVERAGE_GUIDE,
            Criterion::ContentCoherence => CONTENT_COHERENCE_GUIDE,
            Criterion::Argument => ARGUMENT_GUIDE,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Criterion {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Criterion::ALL
            .into_iter()
            .find(|c| c.key().to_lowercase() == wanted)
            .ok_or_else(|| GradingError::ConfigurationError(format!("Unknown criterion: {s}")))
    }
}

const CONTENT_QUALITY_GUIDE: &str = "\
0: Most of the ideas in the summary and argument are not central to the topic, not expressed clearly, or are vague or repetitive.
1: Many of the ideas in the summary and argument relate to the topic, but only a few of them are central to the topic, which may be due to vagueness, repetition, lack of clarity, or failure to express central ideas.
2: About half the ideas in the summary and argument are expressed clearly and are central to the topic, but about half the ideas do not meet this combined criterion of clarity and centrality, which may be due to vagueness, repetition, lack of clarity, or failure to identify central ideas.
3: About half the ideas in the summary and argument are expressed clearly and are central to the topic, and there is little to no vagueness or repetition. However, some ideas are either unclear, or not central to the topic, or some combination.
4: Most of the ideas in the summary and argument are expressed clearly and are central to the topic; there is little to no vagueness or repetition. However, a few ideas are either unclear or not central to the topic.
5: All or nearly all the ideas in the summary and argument are related to the topic, most of them are central to it and all or nearly all are expressed clearly, with little or no vagueness or repetition.";

const CONTENT_COVERAGE_GUIDE: &str = "\
0: Most of the central ideas from the article(s) are not expressed clearly in the summary and argument, and ideas from the article(s) that are included are expressed in a way that is unclear, vague, or repetitive.
1: Some of the central ideas from the article(s) are expressed clearly in the summary and argument, but many of the central ideas from the article(s) are missing, or are included in a way that is unclear, vague, or repetitive. Most ideas from the article(s) that are expressed clearly in the summary and argument are not central to the topic.
2: Many of the central ideas from the article(s) are expressed clearly in the summary and argument, but many of the central ideas from the article(s) are missing, or are included in a way that is unclear, vague, or repetitive. Many ideas from the article that are expressed clearly in the summary and argument are not central to the topic.
3: Most of the central ideas from the article(s) are expressed clearly in the summary and argument. The remaining ideas from the article that are expressed in the summary and argument are either not central, not clear, vague or repetitive.
4: Most of the central ideas from the article(s) are expressed clearly in the summary and argument. Nearly all ideas from the article(s) expressed in the summary and argument are related to the topic, and are expressed clearly, with little vagueness or repetition.
5: All or nearly all of the central ideas from the article are expressed clearly in the summary and argument. Very few of the ideas from the article(s) are expressed in a way that is unclear, vague or repetitive.";

const CONTENT_COHERENCE_GUIDE: &str = "\
0: The ideas expressed in the summary and argument are not easy to follow, and do not relate well to one another.
1: Some of the ideas expressed in the summary and argument relate well to one another, but most do not relate well to one another, and are not easy to follow.
2: Many of the ideas expressed in the summary and argument relate well to one another, making it fairly easy to follow much of the discussion. But many of the ideas expressed in the summary and argument do not relate well to one another, so it is difficult to form a coherent understanding of the whole.
3: Most of the ideas expressed in the summary and argument relate well to one another, and the discussion as a whole is fairly easy to follow. However, some of the ideas do not relate well and, as a result, part of the discussion is hard to follow.
4: Most of the ideas expressed in the summary and argument relate well to one another, and the discussion as a whole is easy to follow. A few ideas seem out of place or less well integrated into the overall organization.
5: All or nearly all of the ideas expressed in the summary and argument relate well to one another, so the discussion as a whole flows well from one idea to the next, and the overall organization is very coherent.";

const ARGUMENT_GUIDE: &str = "\
0: Essay responds to the topic in some way but does not state a claim on the topic.
1: Essay states a claim, but no reasons are given to support the claim, or the reasons given are unrelated to or inconsistent with the claim, or they are incoherent.
2: Essay states a clear claim and gives one or two reasons to support the claim, but the reasons are not explained or supported in any coherent way. The reasons may be limited plausibility, and inconsistencies may be present.
3: Essay states a claim and gives reason(s) to support the claim, plus some explanation or elaboration of the reasons. The reasons though are not enough explanation of the information provided. There may be some inconsistencies, irrelevant information, or problems with organization and clarity.
4: Essay states a clear claim and gives reasons to support the claim. The reasons are explained clearly and logically, with few minor inconsistencies. Organization of the essay is generally good but is missing a concluding statement, or there are inconsistencies or irrelevances that weaken the argument.
5: Meets the criteria for previous level. In addition, the essay is generally well organized, includes a concluding statement. The writing is clear and logical, and irrelevances that would weaken the argument.";

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Content Quality", Criterion::ContentQuality)]
    #[case("ContentCoverage", Criterion::ContentCoverage)]
    #[case("content_coherence", Criterion::ContentCoherence)]
    #[case("ARGUMENT", Criterion::Argument)]
    fn parses_names_and_keys(#[case] raw: &str, #[case] expected: Criterion) {
        assert_eq!(Criterion::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn unknown_criterion_is_configuration_error() {
        let err = Criterion::from_str("Content Qualty").unwrap_err();
        assert!(matches!(err, GradingError::ConfigurationError(_)));
    }

    #[test]
    fn every_guide_covers_all_levels() {
        for criterion in Criterion::ALL {
            let guide = criterion.score_guide();
            for level in 0..=5 {
                assert!(
                    guide.contains(&format!("{level}: ")),
                    "{criterion} guide lacks level {level}"
                );
            }
            assert!(!criterion.definition().is_empty());
        }
    }
}
