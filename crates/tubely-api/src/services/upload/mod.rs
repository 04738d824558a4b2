//! Video ingestion: multipart body to placed object and updated record.

mod video_ingest;

pub use video_ingest::VideoIngestService;
