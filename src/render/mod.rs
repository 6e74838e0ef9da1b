//! Rendering: JSON output, pagination, streamed page events and the
//! viewport window.

mod json;
mod options;
mod paginate;
pub mod streaming;
pub mod window;

pub use json::{to_json, JsonFormat};
pub use options::{RenderOptions, DEFAULT_PAGE_SIZE};
pub use paginate::{page_count, paginate, Page};
pub use streaming::{collect_pages, RenderEvent, StreamingRenderer};
pub use window::{PageSink, PageState, Viewport, WindowChange, WindowConfig, WindowManager};
