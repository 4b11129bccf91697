//! Rendering pipeline: element painting, frame composition, terminal driver.

pub mod compositor;
pub mod driver;
pub mod paint;
pub mod strip;

pub use compositor::{CellUpdate, Compositor};
pub use driver::{parse_color, Driver};
pub use paint::{chrome, content_lines, paint_box};
pub use strip::{CellStyle, Strip, StyledCell};
