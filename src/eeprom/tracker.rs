use std::fmt;

use super::{
	AddressError,
	Geometry,
};

/// Host side copy of the device's internal address pointer.
///
/// The address always points at the start of a page.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageAddressTracker {
	current_address: u16,
	geometry: Geometry,
}

impl PageAddressTracker {
	pub fn new(geometry: Geometry) -> Self {
		PageAddressTracker {
			current_address: 0,
			geometry,
		}
	}

	pub fn geometry(&self) -> Geometry {
		self.geometry
	}

	pub fn page_size(&self) -> u32 {
		self.geometry.page_size()
	}

	pub fn current_address(&self) -> u16 {
		self.current_address
	}

	pub fn address_of(&self, page: i32) -> Result<u16, AddressError> {
		self.geometry.page_address(page)
	}

	pub fn set_to_page(&mut self, page: i32) -> Result<(), AddressError> {
		self.current_address = self.address_of(page)?;
		Ok(())
	}

	/// Move to the next page; the last page wraps around to page 0.
	pub fn advance(&mut self) {
		if self.current_address >= self.geometry.last_page_address() {
			self.current_address = 0;
		} else {
			self.current_address += self.page_size() as u16;
		}
	}

	pub fn current_page_number(&self) -> i32 {
		(u32::from(self.current_address) / self.page_size()) as i32
	}

	/// Address as sent on the wire: high byte first.
	pub fn address_bytes(&self) -> [u8; 2] {
		[
			(self.current_address >> 8) as u8,
			self.current_address as u8,
		]
	}
}

impl Default for PageAddressTracker {
	fn default() -> Self {
		PageAddressTracker::new(Geometry::default())
	}
}

impl fmt::Debug for PageAddressTracker {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "page {} (@0x{:04x})", self.current_page_number(), self.current_address)
	}
}
