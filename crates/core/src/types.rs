/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (publication dates, intake days) carry no time zone.
pub type Date = chrono::NaiveDate;
