pub mod history;
pub mod sqlx;

pub use self::history::{CsvHistory, HistoryError, HistoryStore, TripRecord};
pub use self::sqlx::SqliteHistory;
