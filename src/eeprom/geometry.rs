use std::fmt;

use failure::Fail;

/// Page size of the 24xx256 family.
pub const DEFAULT_PAGE_SIZE: u32 = 64;
/// 32 KiB / 64 B
pub const DEFAULT_PAGE_COUNT: u32 = 512;

// device addresses are sent as two bytes
const ADDRESS_SPACE: u32 = 1 << 16;

#[derive(Clone, PartialEq, Eq, Debug, Fail)]
pub enum AddressError {
	#[fail(display = "page {} out of range (device has {} pages)", page, page_count)]
	OutOfRange {
		page: i32,
		page_count: u32,
	},
	#[fail(display = "invalid geometry: {} pages of {} bytes don't fit a 16-bit address space", page_count, page_size)]
	InvalidGeometry {
		page_size: u32,
		page_count: u32,
	},
}

/// Page layout of an EEPROM.
///
/// The whole device must be addressable with the two address bytes
/// prefixed to every frame.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Geometry {
	page_size: u32,
	page_count: u32,
}

impl Geometry {
	pub fn new(page_size: u32, page_count: u32) -> Result<Self, AddressError> {
		let fits = page_size
			.checked_mul(page_count)
			.map_or(false, |capacity| capacity <= ADDRESS_SPACE);
		if page_size == 0 || page_count == 0 || !fits {
			return Err(AddressError::InvalidGeometry { page_size, page_count });
		}
		Ok(Geometry { page_size, page_count })
	}

	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	pub fn page_count(&self) -> u32 {
		self.page_count
	}

	pub fn capacity(&self) -> usize {
		(self.page_size * self.page_count) as usize
	}

	/// Start address of the last page; advancing from here wraps to 0.
	pub fn last_page_address(&self) -> u16 {
		((self.page_count - 1) * self.page_size) as u16
	}

	pub fn contains_page(&self, page: i32) -> bool {
		page >= 0 && (page as u32) < self.page_count
	}

	pub fn page_address(&self, page: i32) -> Result<u16, AddressError> {
		if !self.contains_page(page) {
			return Err(AddressError::OutOfRange {
				page,
				page_count: self.page_count,
			});
		}
		Ok((page as u32 * self.page_size) as u16)
	}
}

impl Default for Geometry {
	fn default() -> Self {
		Geometry {
			page_size: DEFAULT_PAGE_SIZE,
			page_count: DEFAULT_PAGE_COUNT,
		}
	}
}

impl fmt::Display for Geometry {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} pages x {} bytes", self.page_count, self.page_size)
	}
}

impl fmt::Debug for Geometry {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Geometry")
			.field("page_size", &self.page_size)
			.field("page_count", &self.page_count)
			.field("last_page_address", &self.last_page_address())
			.finish()
	}
}
