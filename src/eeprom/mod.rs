/// Page addressing for 24xx256 style I²C EEPROMs.
///
/// 15-bit address space = 32 KiB; with 64-byte pages that is
/// 32 KiB / 64 B = 2^9 = 512 pages, numbered 0 to 511. A page starts at
/// `page * 64`, the last one at 32704.

mod driver;
mod geometry;
mod tracker;

pub use self::driver::{
	DEFAULT_DELAY,
	DriverConfig,
	DriverError,
	PagedEepromDriver,
};

pub use self::geometry::{
	AddressError,
	DEFAULT_PAGE_COUNT,
	DEFAULT_PAGE_SIZE,
	Geometry,
};

pub use self::tracker::PageAddressTracker;
