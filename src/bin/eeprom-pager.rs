#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate i2c_eeprom_pager;
use i2c_eeprom_pager::*;

use std::io::{
	self,
	Read,
	Write,
};
use std::process::exit;
use std::time::Duration;

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid paramater {}: {}", name, e);
		e.context(msg).into()
	})
}

// decimal or 0x-prefixed hex
fn get_number(matches: &clap::ArgMatches, name: &str) -> AResult<u32> {
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	let parsed = if param.starts_with("0x") || param.starts_with("0X") {
		u32::from_str_radix(&param[2..], 16)
	} else {
		param.parse::<u32>()
	};
	parsed.map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid paramater {}: {}", name, e);
		e.context(msg).into()
	})
}

fn driver_config(matches: &clap::ArgMatches) -> AResult<DriverConfig> {
	let geometry = Geometry::new(get_number(matches, "page_size")?, get_number(matches, "pages")?)?;
	let delay = Duration::from_micros(u64::from(get_number(matches, "delay_us")?));
	Ok(DriverConfig {
		geometry,
		delay,
	})
}

fn open_transport(matches: &clap::ArgMatches, config: &DriverConfig) -> AResult<Box<dyn Transport>> {
	if matches.is_present("simulate") {
		info!("using simulated EEPROM ({})", config.geometry);
		return Ok(Box::new(SimulatedEeprom::new(config.geometry)));
	}

	let adapter = get_number(matches, "adapter")?;
	let peer = get_number(matches, "peer")?;
	ensure!(peer <= 0xffff, "peer address out of range: 0x{:x}", peer);
	Ok(Box::new(transport::open_bus(adapter, peer as u16)?))
}

fn demo(matches: &clap::ArgMatches, sub_m: &clap::ArgMatches) -> AResult<()> {
	let config = driver_config(matches)?;
	let start: i32 = get_param(sub_m, "start")?;
	let count: i32 = get_param(sub_m, "count")?;
	let fill = match sub_m.value_of("fill").map(str::as_bytes) {
		Some(&[c]) => c,
		_ => bail!("fill needs to be a single byte character"),
	};
	ensure!(count >= 1, "count must be at least 1");

	let mut transport = open_transport(matches, &config)?;
	let mut driver = PagedEepromDriver::new(&mut *transport, config);
	let geometry = driver.geometry();
	let page_size = geometry.page_size() as usize;

	let buf = vec![fill; count as usize * page_size];
	driver.seek(start)?;
	driver.write(&buf, count)?;
	info!("wrote {} pages starting at page {}, now at page {}", count, start, driver.current_page());

	driver.seek(start)?;
	let data = driver.read(count)?;
	info!("read {} pages starting at page {}, now at page {}", count, start, driver.current_page());

	for (i, page) in data.chunks(page_size).enumerate() {
		let page_number = (start as usize + i) % geometry.page_count() as usize;
		println!("{:3}: {}", page_number, String::from_utf8_lossy(page));
	}

	if data != buf {
		bail!("read back data differs from data written");
	}

	Ok(())
}

fn dump(matches: &clap::ArgMatches, sub_m: &clap::ArgMatches) -> AResult<()> {
	let config = driver_config(matches)?;
	let start: i32 = get_param(sub_m, "start")?;
	let count: i32 = get_param(sub_m, "count")?;

	let mut transport = open_transport(matches, &config)?;
	let mut driver = PagedEepromDriver::new(&mut *transport, config);

	driver.seek(start)?;
	let data = driver.read(count)?;
	io::stdout().write_all(&data)?;

	Ok(())
}

fn load(matches: &clap::ArgMatches, sub_m: &clap::ArgMatches) -> AResult<()> {
	let config = driver_config(matches)?;
	let start: i32 = get_param(sub_m, "start")?;
	let page_size = config.geometry.page_size() as usize;

	let mut data = Vec::new();
	io::stdin().read_to_end(&mut data)?;
	ensure!(!data.is_empty() && 0 == data.len() % page_size,
		"input has {} bytes, not a whole number of {}-byte pages", data.len(), page_size
	);
	let count = data.len() / page_size;
	ensure!(count <= config.geometry.page_count() as usize,
		"input has {} pages, device only {}", count, config.geometry.page_count()
	);

	let mut transport = open_transport(matches, &config)?;
	let mut driver = PagedEepromDriver::new(&mut *transport, config);

	driver.seek(start)?;
	driver.write(&data, count as i32)?;
	info!("wrote {} pages starting at page {}", count, start);

	Ok(())
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg adapter: -a --adapter +takes_value default_value("2") "I2C adapter number (/dev/i2c-N)")
		(@arg peer: -p --peer +takes_value default_value("0x52") "I2C address of the EEPROM")
		(@arg delay_us: -d --("delay-us") +takes_value default_value("10000") "pause after every bus transaction in microseconds")
		(@arg page_size: --("page-size") +takes_value default_value("64") "bytes per page")
		(@arg pages: --pages +takes_value default_value("512") "number of pages")
		(@arg simulate: -s --simulate "use an in-memory EEPROM instead of the bus")
		(@subcommand demo =>
			(about: "write pages filled with a character, read them back and print them")
			(@arg start: --start +takes_value default_value("500") "first page")
			(@arg count: --count +takes_value default_value("20") "number of pages")
			(@arg fill: --fill +takes_value default_value("a") "fill character")
		)
		(@subcommand dump =>
			(about: "dump pages as binary to stdout")
			(@arg start: --start +takes_value default_value("0") "first page")
			(@arg count: --count +takes_value default_value("512") "number of pages")
		)
		(@subcommand load =>
			(about: "write binary data from stdin (whole pages only)")
			(@arg start: --start +takes_value default_value("0") "first page")
		)
	).get_matches();

	match matches.subcommand() {
		("demo", Some(sub_m)) => {
			demo(&matches, sub_m)
		},
		("dump", Some(sub_m)) => {
			dump(&matches, sub_m)
		},
		("load", Some(sub_m)) => {
			load(&matches, sub_m)
		},
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
