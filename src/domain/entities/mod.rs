//! Domain entity definitions.

mod event;
mod image_info;
mod pack;
mod room;
mod token;

pub use event::{ClientEvent, MessageResponse, ROOM_MESSAGE_EVENT_TYPE};
pub use image_info::{APNG_MIME_TYPE, ImageInfo};
pub use pack::{Pack, PackImage, PackImageInfo, PackInfo, PackUsage, STICKER_THRESHOLD_PX};
pub use room::RoomId;
pub use token::AccessToken;
