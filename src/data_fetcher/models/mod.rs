pub mod arrivals;
pub mod reference;

pub use arrivals::{ArrivalFields, DisplayArrival, RawArrival};
pub use reference::{
    PlatformNumber, PlatformRecord, PlatformTable, StationCode, StationTable, platform_numbers,
};
