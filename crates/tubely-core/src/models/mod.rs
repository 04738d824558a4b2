//! Domain models shared by the ingestion pipeline and the read path.

pub mod aspect_ratio;
pub mod storage_reference;
pub mod video;

pub use aspect_ratio::AspectRatio;
pub use storage_reference::StorageReference;
pub use video::{CreateVideoRequest, Video, VideoResponse};
