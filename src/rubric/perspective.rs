/// Phrasing emphasis rotated across repeated samples of the same evaluation.
///
/// The rubric is identical for every variant; only the reviewer's focus
/// changes, so repeated calls to one model follow different reasoning paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerspectiveVariant {
    Precision,
    Completeness,
    Clarity,
}

impl PerspectiveVariant {
    pub const ALL: [PerspectiveVariant; 3] = [
        PerspectiveVariant::Precision,
        PerspectiveVariant::Completeness,
        PerspectiveVariant::Clarity,
    ];

    /// Variant assigned to the sample issued at `index`.
    pub fn rotation(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn emphasis(&self) -> &'static str {
        match self {
            PerspectiveVariant::Precision => {
                "Pay particular attention to whether each statement in the learner's summary is accurate and faithful to the material."
            }
            PerspectiveVariant::Completeness => {
                "Pay particular attention to which central ideas and key concepts the learner's summary includes or leaves out."
            }
            PerspectiveVariant::Clarity => {
                "Pay particular attention to how clearly and directly the learner's summary expresses its ideas."
            }
        }
    }
}

impl std::fmt::Display for PerspectiveVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PerspectiveVariant::Precision => "precision",
            PerspectiveVariant::Completeness => "completeness",
            PerspectiveVariant::Clarity => "clarity",
        };
        write!(f, "{name}")
    }
}
