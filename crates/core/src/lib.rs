pub mod session;
pub mod tab_strip;
pub mod tabs;

pub use session::EditingSession;
pub use tab_strip::{tab_title, TabItem, TabStrip, TabStyle};
pub use tabs::{TabSession, TabSessionManager};
