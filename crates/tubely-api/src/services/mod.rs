pub mod upload;
pub mod video_access;
