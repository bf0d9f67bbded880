pub mod color;
pub mod geometry;
pub mod ids;
pub mod page;

pub use color::Color;
pub use geometry::{Padding, Point, Rect, Size};
pub use ids::{ResourceUri, TemplateId};
pub use page::PageSize;
