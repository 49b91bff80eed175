pub mod background;
pub mod border;
pub mod breakpoint;
pub mod declaration;
pub mod flex;
pub mod length;
pub mod spacing;
pub mod typography;
pub mod value;

pub use background::{Background, BackgroundImage, BackgroundKind, ColorStop, Gradient, GradientKind};
pub use border::{Border, Shadow};
pub use breakpoint::{Breakpoint, Breakpoints};
pub use declaration::{Declaration, Property};
pub use flex::{FlexLayout, Gap};
pub use length::{Length, format_number};
pub use spacing::BoxSides;
pub use typography::Typography;
pub use value::ResolvedValue;
