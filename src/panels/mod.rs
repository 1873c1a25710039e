mod central_panel;
mod inpaint_panel;
mod toasts;
mod tools_panel;

pub use central_panel::central_panel;
pub use inpaint_panel::inpaint_panel;
pub use toasts::toasts_overlay;
pub use tools_panel::tools_panel;
