/// Primary keys are UUIDs. Photo ids are minted in-process before the
/// upload touches storage; collection ids default in the database.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
