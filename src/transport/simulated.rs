use crate::eeprom::Geometry;

use super::{
	Transport,
	TransportError,
};

// (successful transactions to let through, bytes the failing one transfers)
type Fault = Option<(usize, usize)>;

/// In-memory stand-in for a 24xx256 style EEPROM on the bus.
///
/// Behaves like the chip: a page write rolls over inside its page and
/// leaves the internal address pointer where the roll-over ended (for a
/// full page: back at the start of the page written), while sequential
/// reads wrap around at the end of the memory.
#[derive(Clone, Debug)]
pub struct SimulatedEeprom {
	memory: Vec<u8>,
	page_size: usize,
	pointer: usize,
	sent: Vec<Vec<u8>>,
	receives: Vec<usize>,
	send_fault: Fault,
	receive_fault: Fault,
}

impl SimulatedEeprom {
	/// New erased (all 0xff) device.
	pub fn new(geometry: Geometry) -> Self {
		SimulatedEeprom {
			memory: vec![0xff; geometry.capacity()],
			page_size: geometry.page_size() as usize,
			pointer: 0,
			sent: Vec::new(),
			receives: Vec::new(),
			send_fault: None,
			receive_fault: None,
		}
	}

	pub fn memory(&self) -> &[u8] {
		&self.memory
	}

	pub fn memory_mut(&mut self) -> &mut [u8] {
		&mut self.memory
	}

	pub fn page(&self, page: usize) -> &[u8] {
		let start = page * self.page_size;
		&self.memory[start..start + self.page_size]
	}

	/// Internal address pointer of the chip.
	pub fn pointer(&self) -> usize {
		self.pointer
	}

	/// Every frame accepted or attempted by `send`, in order.
	pub fn sent_frames(&self) -> &[Vec<u8>] {
		&self.sent
	}

	/// Requested length of every `receive`, in order.
	pub fn receives(&self) -> &[usize] {
		&self.receives
	}

	pub fn transaction_count(&self) -> usize {
		self.sent.len() + self.receives.len()
	}

	pub fn clear_log(&mut self) {
		self.sent.clear();
		self.receives.clear();
	}

	/// Let `after` sends through, then NAK the next one after `accepted`
	/// bytes. The failing frame doesn't modify the device.
	pub fn inject_short_send(&mut self, after: usize, accepted: usize) {
		self.send_fault = Some((after, accepted));
	}

	/// Let `after` receives through, then stop the next one after
	/// `returned` bytes. The failing read doesn't move the pointer.
	pub fn inject_short_receive(&mut self, after: usize, returned: usize) {
		self.receive_fault = Some((after, returned));
	}

	fn trip(fault: &mut Fault) -> Option<usize> {
		match *fault {
			Some((0, transferred)) => {
				*fault = None;
				Some(transferred)
			},
			Some((ref mut after, _)) => {
				*after -= 1;
				None
			},
			None => None,
		}
	}

	fn program(&mut self, address: usize, data: &[u8]) {
		let page_start = address - address % self.page_size;
		let mut offset = address - page_start;
		for b in data {
			self.memory[page_start + offset] = *b;
			offset = (offset + 1) % self.page_size;
		}
		self.pointer = page_start + offset;
	}
}

impl Transport for SimulatedEeprom {
	fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
		self.sent.push(data.to_vec());

		if let Some(sent) = Self::trip(&mut self.send_fault) {
			let sent = sent.min(data.len());
			return Err(TransportError::ShortWrite { sent, expected: data.len() });
		}
		if data.len() < 2 {
			return Err(TransportError::Rejected(format!("{}-byte frame without full address", data.len())));
		}

		let address = ((data[0] as usize) << 8 | data[1] as usize) % self.memory.len();
		if data.len() == 2 {
			self.pointer = address;
		} else {
			self.program(address, &data[2..]);
		}
		Ok(())
	}

	fn receive(&mut self, target: &mut [u8]) -> Result<(), TransportError> {
		self.receives.push(target.len());

		if let Some(received) = Self::trip(&mut self.receive_fault) {
			let received = received.min(target.len());
			return Err(TransportError::ShortRead { received, expected: target.len() });
		}

		for t in target.iter_mut() {
			*t = self.memory[self.pointer];
			self.pointer = (self.pointer + 1) % self.memory.len();
		}
		Ok(())
	}
}
