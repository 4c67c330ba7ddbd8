pub mod directory_client;
pub mod record_reader;

pub use directory_client::DirectoryClient;
pub use record_reader::{parse_timestamp, LoadOutcome, RecordReader};
