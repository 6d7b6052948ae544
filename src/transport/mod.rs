/// Byte level access to an EEPROM on a two-wire bus.
///
/// The peer address is bound when the bus is opened; afterwards every
/// `send` is one write transaction (START, address+W, bytes, STOP) and
/// every `receive` one read transaction (START, address+R, bytes, STOP).
///
/// Frames sent to a 24xx256:
/// - 2 bytes: high and low byte of an address; only moves the internal
///   address pointer ("dummy write")
/// - 2 + n bytes: address followed by up to one page of data to program;
///   data beyond the page boundary rolls over to the start of the page
///
/// A read continues at the internal address pointer and wraps around at
/// the end of the memory.

mod bus;
mod linux;
mod simulated;

pub use self::bus::{
	Transport,
	TransportError,
	reliable_sleep,
};

// OS-specific. for now linux only.
pub use self::linux::{
	I2C_SLAVE,
	I2cFile,
	open_bus,
	open_bus_path,
};

pub use self::simulated::SimulatedEeprom;
