//! Dashboard orchestration: the controller that owns the arrangement, the
//! edit mode gate, and the per-widget fault boundary.

pub mod controller;
pub mod edit_mode;
pub mod host;

pub use controller::{GridController, Mutation, Notice, NoticeKind};
pub use edit_mode::EditModeController;
pub use host::{is_containing_panic, HostFrame, WidgetHost};
