use crate::style::Color;

/// Outcome of inspecting one token of a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    NotALink,
    HandledBySiteHandler,
    VerifiedImage,
    RejectedNetworkError,
    RejectedNotImage,
}

impl Classification {
    /// Color applied to the token in the re-emitted line, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Classification::HandledBySiteHandler | Classification::VerifiedImage => {
                Some(Color::Green)
            }
            Classification::RejectedNetworkError | Classification::RejectedNotImage => {
                Some(Color::LightRed)
            }
            Classification::NotALink => None,
        }
    }

    pub fn is_downloadable(self) -> bool {
        matches!(
            self,
            Classification::HandledBySiteHandler | Classification::VerifiedImage
        )
    }
}
