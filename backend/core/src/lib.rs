pub mod channel;
pub mod error;
pub mod record;
pub mod traits;

pub use channel::{EventChannel, LatestSlot};
pub use error::{PlateError, Result};
pub use record::{has_plate_len, normalize_plate, PlateRecord, COLLECTION, PLATE_LEN};
pub use traits::RecordStore;
