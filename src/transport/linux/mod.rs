use std::path::Path;

mod file;

pub use self::file::I2cFile;

/// ioctl to bind the peer (slave) address used by later read(2)/write(2)
/// calls; from <linux/i2c-dev.h>
pub const I2C_SLAVE: u64 = 0x0703;

/// Open `/dev/i2c-<adapter>` and bind it to `peer_address`.
///
/// Inspect /sys/class/i2c-dev/ or run "i2cdetect -l" to find the adapter.
pub fn open_bus(adapter: u32, peer_address: u16) -> crate::AResult<I2cFile> {
	let path = format!("/dev/i2c-{}", adapter);
	open_bus_path(path, peer_address)
}

pub fn open_bus_path<P: AsRef<Path>>(path: P, peer_address: u16) -> crate::AResult<I2cFile> {
	let path = path.as_ref();
	ensure!(peer_address < 0x80, "invalid 7-bit peer address: 0x{:02x}", peer_address);

	let file = with_context!(("failed to open the bus {}", path.display()), {
		Ok(file::inner_open(path)?)
	})?;
	with_context!(("cannot bind {} to peer 0x{:02x}", path.display(), peer_address), {
		Ok(file.bind_peer(peer_address)?)
	})?;
	info!("{}: bound to peer 0x{:02x}", file.path().display(), peer_address);

	Ok(file)
}
