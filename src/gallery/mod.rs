pub mod lightbox;
pub mod photo;

pub use lightbox::{Gallery, LightboxKey, LightboxState, TileTarget};
pub use photo::Photo;
