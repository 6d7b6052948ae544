use std::time::Duration;

use failure::Fail;

use super::{
	AddressError,
	Geometry,
	PageAddressTracker,
};
use crate::transport::{
	Transport,
	TransportError,
	reliable_sleep,
};

/// Write cycle time of the 24xx256 is 5ms max; leave some headroom.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Fail)]
pub enum DriverError {
	#[fail(display = "invalid page: {}", _0)]
	InvalidPage(#[cause] AddressError),
	#[fail(display = "invalid argument: {}", _0)]
	InvalidArgument(String),
	#[fail(display = "transport failure: {}", _0)]
	TransportFailure(#[cause] TransportError),
}

impl From<AddressError> for DriverError {
	fn from(e: AddressError) -> Self {
		DriverError::InvalidPage(e)
	}
}

impl From<TransportError> for DriverError {
	fn from(e: TransportError) -> Self {
		DriverError::TransportFailure(e)
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DriverConfig {
	pub geometry: Geometry,
	/// pause after every bus transaction
	pub delay: Duration,
}

impl Default for DriverConfig {
	fn default() -> Self {
		DriverConfig {
			geometry: Geometry::default(),
			delay: DEFAULT_DELAY,
		}
	}
}

/// Page-wise access to an EEPROM through a borrowed transport.
///
/// Operations transfer one page per bus transaction and keep the
/// tracker in line with the chip's internal address pointer:
///
/// - `seek` sends the two address bytes of a page.
/// - `write` sends address + payload for each page, then seeks to the
///   page following the burst. A page write leaves the chip's pointer
///   on the page just written, so without this the next read would
///   start one page early.
/// - `read` receives page after page; the chip advances its pointer
///   the same way the tracker does, so no seek is needed.
///
/// A new driver assumes the chip is at page 0 without talking to it;
/// `seek` first if that isn't known to be true.
///
/// On failure the tracker stays on the page that failed; pages finished
/// earlier in the same burst remain counted.
pub struct PagedEepromDriver<'a, T: Transport + ?Sized + 'a> {
	transport: &'a mut T,
	tracker: PageAddressTracker,
	delay: Duration,
}

impl<'a, T: Transport + ?Sized> PagedEepromDriver<'a, T> {
	pub fn new(transport: &'a mut T, config: DriverConfig) -> Self {
		PagedEepromDriver {
			transport,
			tracker: PageAddressTracker::new(config.geometry),
			delay: config.delay,
		}
	}

	pub fn tracker(&self) -> &PageAddressTracker {
		&self.tracker
	}

	pub fn geometry(&self) -> Geometry {
		self.tracker.geometry()
	}

	pub fn current_page(&self) -> i32 {
		self.tracker.current_page_number()
	}

	fn page_size(&self) -> usize {
		self.tracker.page_size() as usize
	}

	fn pause(&self) {
		if self.delay > Duration::from_secs(0) {
			reliable_sleep(self.delay);
		}
	}

	fn burst_len(&self, page_count: i32) -> Result<usize, DriverError> {
		if page_count < 1 {
			return Err(DriverError::InvalidArgument(format!("page count must be at least 1, got {}", page_count)));
		}
		(page_count as usize).checked_mul(self.page_size()).ok_or_else(|| {
			DriverError::InvalidArgument(format!("{} pages exceed the addressable buffer size", page_count))
		})
	}

	pub fn seek(&mut self, page: i32) -> Result<(), DriverError> {
		let mut target = self.tracker;
		target.set_to_page(page)?;

		if let Err(e) = self.transport.send(&target.address_bytes()) {
			warn!("seek to page {} failed: {}", page, e);
			return Err(e.into());
		}
		self.tracker = target;
		debug!("seek to page {} @{}", page, self.tracker.current_address());
		self.pause();

		Ok(())
	}

	/// Write `page_count` pages from `data` starting at the current page.
	///
	/// `data` must hold exactly `page_count` pages. Ends with a seek to
	/// `(start + page_count) % page_count_of_device`, also after a
	/// single page.
	pub fn write(&mut self, data: &[u8], page_count: i32) -> Result<(), DriverError> {
		let expected = self.burst_len(page_count)?;
		if data.len() != expected {
			return Err(DriverError::InvalidArgument(format!(
				"{} pages need {} bytes, got {}", page_count, expected, data.len()
			)));
		}

		let mut frame = Vec::with_capacity(2 + self.page_size());
		for page in data.chunks(self.page_size()) {
			frame.clear();
			frame.extend_from_slice(&self.tracker.address_bytes());
			frame.extend_from_slice(page);

			if let Err(e) = self.transport.send(&frame) {
				warn!("write of page {} failed: {}", self.tracker.current_page_number(), e);
				return Err(e.into());
			}
			debug!("wrote page {} @{}", self.tracker.current_page_number(), self.tracker.current_address());
			self.pause();
			self.tracker.advance();
		}

		let next = self.tracker.current_page_number();
		self.seek(next)
	}

	/// Read `page_count` pages starting at the current page.
	pub fn read(&mut self, page_count: i32) -> Result<Vec<u8>, DriverError> {
		let len = self.burst_len(page_count)?;
		let mut buf = vec![0u8; len];
		self.read_into(&mut buf)?;
		Ok(buf)
	}

	/// Fill `target` (a whole number of pages) starting at the current page.
	pub fn read_into(&mut self, target: &mut [u8]) -> Result<(), DriverError> {
		let page_size = self.page_size();
		if target.is_empty() || 0 != target.len() % page_size {
			return Err(DriverError::InvalidArgument(format!(
				"buffer of {} bytes is not a whole number of {}-byte pages", target.len(), page_size
			)));
		}

		for page in target.chunks_mut(page_size) {
			if let Err(e) = self.transport.receive(page) {
				warn!("read of page {} failed: {}", self.tracker.current_page_number(), e);
				return Err(e.into());
			}
			debug!("read page {} @{}", self.tracker.current_page_number(), self.tracker.current_address());
			self.pause();
			self.tracker.advance();
		}

		Ok(())
	}
}
