use std::collections::VecDeque;
use std::time::Duration;

use i2c_eeprom_pager::*;

const PAGE_SIZE: usize = 64;

fn config() -> DriverConfig {
	DriverConfig {
		delay: Duration::from_secs(0),
		..DriverConfig::default()
	}
}

fn device() -> SimulatedEeprom {
	SimulatedEeprom::new(Geometry::default())
}

#[derive(Debug, PartialEq)]
enum Call {
	Send(Vec<u8>),
	Receive(usize),
}

/// Records calls and answers receives from a queue.
#[derive(Default)]
struct ScriptedBus {
	calls: Vec<Call>,
	replies: VecDeque<Result<Vec<u8>, TransportError>>,
	accept: Option<usize>,
}

impl Transport for ScriptedBus {
	fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
		self.calls.push(Call::Send(data.to_vec()));
		match self.accept {
			Some(sent) if sent < data.len() => Err(TransportError::ShortWrite { sent, expected: data.len() }),
			_ => Ok(()),
		}
	}

	fn receive(&mut self, target: &mut [u8]) -> Result<(), TransportError> {
		self.calls.push(Call::Receive(target.len()));
		match self.replies.pop_front() {
			Some(Ok(data)) => {
				if data.len() != target.len() {
					return Err(TransportError::ShortRead { received: data.len(), expected: target.len() });
				}
				target.copy_from_slice(&data);
				Ok(())
			},
			Some(Err(e)) => Err(e),
			None => Err(TransportError::Rejected("no reply scripted".into())),
		}
	}
}

#[test]
fn test_round_trip() {
	let mut ee = device();
	let mut driver = PagedEepromDriver::new(&mut ee, config());
	let buf = vec![b'a'; 3 * PAGE_SIZE];

	driver.seek(10).unwrap();
	driver.write(&buf, 3).unwrap();
	assert_eq!(driver.current_page(), 13);

	driver.seek(10).unwrap();
	let data = driver.read(3).unwrap();
	assert_eq!(data, buf);
	assert_eq!(driver.current_page(), 13);
}

#[test]
fn test_read_after_write_continues_behind_burst() {
	let mut ee = device();
	for b in ee.memory_mut()[13 * PAGE_SIZE..14 * PAGE_SIZE].iter_mut() {
		*b = b'z';
	}
	let mut driver = PagedEepromDriver::new(&mut ee, config());

	driver.seek(10).unwrap();
	driver.write(&[b'a'; 3 * PAGE_SIZE], 3).unwrap();
	// no seek: the re-seek at the end of `write` put the chip on page 13
	let data = driver.read(1).unwrap();
	assert_eq!(data, vec![b'z'; PAGE_SIZE]);
	assert_eq!(driver.current_page(), 14);
}

#[test]
fn test_wrap_during_burst() {
	let mut ee = device();
	let mut driver = PagedEepromDriver::new(&mut ee, config());
	let buf: Vec<u8> = (0..3 * PAGE_SIZE).map(|i| i as u8).collect();

	driver.seek(510).unwrap();
	driver.write(&buf, 3).unwrap();
	assert_eq!(driver.current_page(), 1);

	driver.seek(510).unwrap();
	assert_eq!(driver.read(3).unwrap(), buf);
	assert_eq!(driver.current_page(), 1);

	assert_eq!(ee.page(510), &buf[..PAGE_SIZE]);
	assert_eq!(ee.page(511), &buf[PAGE_SIZE..2 * PAGE_SIZE]);
	assert_eq!(ee.page(0), &buf[2 * PAGE_SIZE..]);
	assert_eq!(ee.page(1), &[0xff; PAGE_SIZE][..]);
}

#[test]
fn test_full_circle_write() {
	let mut ee = device();
	let mut driver = PagedEepromDriver::new(&mut ee, config());
	let buf: Vec<u8> = (0..512 * PAGE_SIZE).map(|i| (i / PAGE_SIZE) as u8).collect();

	driver.seek(300).unwrap();
	driver.write(&buf, 512).unwrap();
	assert_eq!(driver.current_page(), 300);

	let data = driver.read(512).unwrap();
	assert_eq!(data, buf);
	assert_eq!(&ee.page(300)[..], &[0; PAGE_SIZE][..]);
	assert_eq!(&ee.page(299)[..], &[255; PAGE_SIZE][..]);
}

#[test]
fn test_original_demo_sequence() {
	// 20 pages from page 500 run over the end of the device
	let mut ee = device();
	let mut driver = PagedEepromDriver::new(&mut ee, config());
	let buf = vec![b'a'; 20 * PAGE_SIZE];

	driver.seek(500).unwrap();
	driver.write(&buf, 20).unwrap();
	assert_eq!(driver.current_page(), 8);
	driver.seek(500).unwrap();
	assert_eq!(driver.read(20).unwrap(), buf);
	assert_eq!(driver.current_page(), 8);
}

#[test]
fn test_invalid_write_length_issues_no_transaction() {
	let mut bus = ScriptedBus::default();
	let mut driver = PagedEepromDriver::new(&mut bus, config());

	match driver.write(&[0u8; 100], 2) {
		Err(DriverError::InvalidArgument(_)) => (),
		r => panic!("unexpected result: {:?}", r),
	}
	assert!(bus.calls.is_empty());
}

#[test]
fn test_invalid_seek_issues_no_transaction() {
	let mut bus = ScriptedBus::default();
	let mut driver = PagedEepromDriver::new(&mut bus, config());

	for &page in [-1, 512, i32::max_value()].iter() {
		match driver.seek(page) {
			Err(DriverError::InvalidPage(_)) => (),
			r => panic!("unexpected result: {:?}", r),
		}
	}
	assert_eq!(driver.current_page(), 0);
	assert!(bus.calls.is_empty());
}

#[test]
fn test_write_call_sequence() {
	let mut bus = ScriptedBus::default();
	let mut driver = PagedEepromDriver::new(&mut bus, config());
	let mut buf = vec![1u8; PAGE_SIZE];
	buf.extend_from_slice(&[2u8; PAGE_SIZE]);

	driver.seek(511).unwrap();
	driver.write(&buf, 2).unwrap();

	let mut first = vec![0x7f, 0xc0];
	first.extend_from_slice(&[1u8; PAGE_SIZE]);
	let mut second = vec![0x00, 0x00];
	second.extend_from_slice(&[2u8; PAGE_SIZE]);
	assert_eq!(bus.calls, vec![
		Call::Send(vec![0x7f, 0xc0]),
		Call::Send(first),
		Call::Send(second),
		Call::Send(vec![0x00, 0x40]),
	]);
}

#[test]
fn test_short_write_propagates() {
	let mut bus = ScriptedBus::default();
	bus.accept = Some(2);
	let mut driver = PagedEepromDriver::new(&mut bus, config());

	// address-only frame fits
	driver.seek(4).unwrap();
	match driver.write(&[0u8; PAGE_SIZE], 1) {
		Err(DriverError::TransportFailure(TransportError::ShortWrite { sent: 2, expected: 66 })) => (),
		r => panic!("unexpected result: {:?}", r),
	}
	assert_eq!(driver.current_page(), 4);
}

#[test]
fn test_short_seek_propagates() {
	let mut bus = ScriptedBus::default();
	bus.accept = Some(1);
	let mut driver = PagedEepromDriver::new(&mut bus, config());

	match driver.seek(4) {
		Err(DriverError::TransportFailure(TransportError::ShortWrite { sent: 1, expected: 2 })) => (),
		r => panic!("unexpected result: {:?}", r),
	}
	assert_eq!(driver.current_page(), 0);
}

#[test]
fn test_read_reports_transport_detail() {
	let mut bus = ScriptedBus::default();
	bus.replies.push_back(Ok(vec![7; PAGE_SIZE]));
	bus.replies.push_back(Ok(vec![8; 10]));
	let mut driver = PagedEepromDriver::new(&mut bus, config());

	let err = driver.read(2).unwrap_err();
	assert_eq!(err.to_string(), "transport failure: short read: 10 of 64 bytes received");
	assert_eq!(driver.current_page(), 1);
	assert_eq!(bus.calls, vec![Call::Receive(PAGE_SIZE), Call::Receive(PAGE_SIZE)]);
}

#[test]
fn test_read_into_buffer() {
	let mut bus = ScriptedBus::default();
	bus.replies.push_back(Ok(vec![1; PAGE_SIZE]));
	bus.replies.push_back(Ok(vec![2; PAGE_SIZE]));
	let mut driver = PagedEepromDriver::new(&mut bus, config());

	let mut buf = [0u8; 2 * PAGE_SIZE];
	driver.read_into(&mut buf).unwrap();
	assert_eq!(&buf[..PAGE_SIZE], &[1; PAGE_SIZE][..]);
	assert_eq!(&buf[PAGE_SIZE..], &[2; PAGE_SIZE][..]);
	assert_eq!(driver.current_page(), 2);
}

#[test]
fn test_small_geometry() {
	let geometry = Geometry::new(8, 4).unwrap();
	let mut ee = SimulatedEeprom::new(geometry);
	let mut driver = PagedEepromDriver::new(&mut ee, DriverConfig {
		geometry,
		delay: Duration::from_secs(0),
	});

	driver.seek(3).unwrap();
	driver.write(b"0123456789abcdef", 2).unwrap();
	assert_eq!(driver.current_page(), 1);
	assert!(driver.seek(4).is_err());

	assert_eq!(ee.page(3), b"01234567");
	assert_eq!(ee.page(0), b"89abcdef");
}

#[test]
fn test_delay_is_applied() {
	let mut ee = device();
	let mut driver = PagedEepromDriver::new(&mut ee, DriverConfig {
		delay: Duration::from_millis(2),
		..DriverConfig::default()
	});

	let start = std::time::Instant::now();
	driver.seek(0).unwrap();
	driver.write(&[0u8; PAGE_SIZE], 1).unwrap();
	// seek, page, re-seek
	assert!(start.elapsed() >= Duration::from_millis(6));
}

#[test]
fn test_driver_over_borrowed_handle() {
	let mut bus = ScriptedBus::default();
	bus.replies.push_back(Ok(vec![5; PAGE_SIZE]));
	{
		// the driver's transport is itself a `&mut ScriptedBus`
		let mut handle = &mut bus;
		let mut driver = PagedEepromDriver::new(&mut handle, config());
		driver.seek(2).unwrap();
		assert_eq!(driver.read(1).unwrap(), vec![5; PAGE_SIZE]);
		assert_eq!(driver.current_page(), 3);
	}
	assert_eq!(bus.calls, vec![Call::Send(vec![0x00, 0x80]), Call::Receive(PAGE_SIZE)]);
}

#[test]
fn test_log_reset_between_steps() {
	let mut ee = device();
	{
		let mut driver = PagedEepromDriver::new(&mut ee, config());
		driver.seek(42).unwrap();
		driver.write(&[9; 2 * PAGE_SIZE], 2).unwrap();
	}
	ee.clear_log();

	let mut driver = PagedEepromDriver::new(&mut ee, config());
	driver.seek(42).unwrap();
	assert_eq!(driver.read(2).unwrap(), vec![9; 2 * PAGE_SIZE]);
	assert_eq!(ee.sent_frames(), &[vec![0x0au8, 0x80]]);
	assert_eq!(ee.receives(), &[PAGE_SIZE, PAGE_SIZE]);
}
