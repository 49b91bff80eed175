use crate::types::background::Background;
use crate::types::border::Border;
use crate::types::flex::FlexLayout;
use crate::types::spacing::BoxSides;
use crate::types::typography::Typography;

/// A settings value after defaulting, validation and shape normalization.
///
/// The variant set is closed: every composite kind has its own variant, so
/// each generator receives exactly the shape it expects.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// No value: the field has no default and the caller supplied nothing.
    Empty,
    Text(String),
    Number { value: f64, unit: String },
    Choice(String),
    Toggle(bool),
    Spacing(BoxSides),
    BorderRadius(BoxSides),
    Background(Background),
    Typography(Typography),
    Border(Border),
    Flex(FlexLayout),
    CustomCss(String),
}

impl ResolvedValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) | Self::Choice(s) | Self::CustomCss(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}
