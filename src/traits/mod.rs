pub mod controller;
pub mod image;
pub mod loader;
pub mod metadata;
pub mod player;
pub mod ui;

pub use self::controller::*;
pub use self::image::*;
pub use self::loader::*;
pub use self::metadata::*;
pub use self::player::*;
pub use self::ui::*;
