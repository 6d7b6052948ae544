use std::fs;
use std::io::{
	self,
	Read,
	Write,
};
use std::os::unix::io::AsRawFd;
use std::path::{
	Path,
	PathBuf,
};

use libc::{
	c_ulong,
	ioctl,
};

use super::I2C_SLAVE;
use crate::transport::{
	Transport,
	TransportError,
};

/// An i2c-dev character device.
///
/// Opened with std::fs instead of buffered I/O: every `write`/`read`
/// must map to exactly one bus transaction.
#[derive(Debug)]
pub struct I2cFile {
	file: fs::File,
	path: PathBuf,
}

impl I2cFile {
	pub fn path(&self) -> &Path {
		&self.path
	}

	pub(super) fn bind_peer(&self, peer_address: u16) -> io::Result<()> {
		let res = unsafe {
			ioctl(self.file.as_raw_fd(), I2C_SLAVE as _, c_ulong::from(peer_address))
		};
		if res < 0 {
			return Err(io::Error::last_os_error());
		}
		Ok(())
	}
}

impl Transport for I2cFile {
	fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
		// the kernel sends the whole buffer as one message, or fails
		let l = self.file.write(data)?;
		if l != data.len() {
			return Err(TransportError::ShortWrite { sent: l, expected: data.len() });
		}
		Ok(())
	}

	fn receive(&mut self, target: &mut [u8]) -> Result<(), TransportError> {
		// i2c-dev limits a single read to 8192 bytes; callers read page-wise
		let l = self.file.read(target)?;
		if l != target.len() {
			return Err(TransportError::ShortRead { received: l, expected: target.len() });
		}
		Ok(())
	}
}

pub fn inner_open(path: &Path) -> io::Result<I2cFile> {
	let file = fs::OpenOptions::new()
		.read(true)
		.write(true)
		.open(path)?;

	Ok(I2cFile {
		file,
		path: path.to_path_buf(),
	})
}
