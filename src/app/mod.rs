pub mod app;
pub mod event;
pub mod mode;

pub use app::App;
pub use event::AppEvent;
pub use mode::AppMode;
