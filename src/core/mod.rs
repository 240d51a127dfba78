pub mod input_adapter;
pub mod log_ui;

pub use input_adapter::WinitInput;
pub use log_ui::LogUi;
