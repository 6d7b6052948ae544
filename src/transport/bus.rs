use std::io;
use std::thread;
use std::time::{
	Duration,
	Instant,
};

use failure::Fail;

#[derive(Debug, Fail)]
pub enum TransportError {
	#[fail(display = "bus i/o failed: {}", _0)]
	Io(#[cause] io::Error),
	#[fail(display = "short write: {} of {} bytes accepted", sent, expected)]
	ShortWrite {
		sent: usize,
		expected: usize,
	},
	#[fail(display = "short read: {} of {} bytes received", received, expected)]
	ShortRead {
		received: usize,
		expected: usize,
	},
	#[fail(display = "device rejected transaction: {}", _0)]
	Rejected(String),
}

impl From<io::Error> for TransportError {
	fn from(e: io::Error) -> Self {
		TransportError::Io(e)
	}
}

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

pub trait Transport {
	/// transmit all of `data` in one transaction
	fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

	/// fill all of `target` in one transaction
	fn receive(&mut self, target: &mut [u8]) -> Result<(), TransportError>;
}

impl<'a, T: ?Sized + Transport> Transport for &'a mut T {
	fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
		T::send(*self, data)
	}

	fn receive(&mut self, target: &mut [u8]) -> Result<(), TransportError> {
		T::receive(*self, target)
	}
}
