pub mod centroid;
pub mod fire_record;
pub mod municipality;

pub use centroid::Centroid;
pub use fire_record::{FireRecord, FireRecordBuilder};
pub use municipality::{DirectoryEntry, MunicipalityDirectory, MunicipalityRef};
