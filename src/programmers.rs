//! Programmer registration and dispatch
//!
//! A programmer string is a name optionally followed by options, e.g.
//! `dummy:chip=TC58CVG2S0HxAIx` or `linux_spi:dev=/dev/spidev0.0,spispeed=4000`.

use spinand_core::transport::SpiTransport;

/// Boxed transport handed to the driver
pub type Transport = Box<dyn SpiTransport + Send>;

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all programmers enabled at compile time
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory SPI NAND emulator (chip=<name>,busy=<polls>,locked=<0|1>)",
    });

    #[cfg(feature = "linux-spi")]
    programmers.push(ProgrammerInfo {
        name: "linux_spi",
        aliases: &["linux-spi", "spidev"],
        description: "Linux spidev interface (dev=/dev/spidevX.Y,spispeed=<kHz>,mode=<0-3>)",
    });

    programmers
}

/// Generate help text listing all available programmers
pub fn programmer_help() -> String {
    let programmers = available_programmers();

    if programmers.is_empty() {
        return "No programmers available (recompile with programmer features enabled)".to_string();
    }

    let mut help = String::from("Available programmers:\n");
    for p in &programmers {
        help.push_str(&format!("  {:12} - {}\n", p.name, p.description));
        if !p.aliases.is_empty() {
            help.push_str(&format!(
                "  {:12}   aliases: {}\n",
                "",
                p.aliases.join(", ")
            ));
        }
    }
    help
}

/// Generate a short list of programmer names for CLI help
pub fn programmer_names_short() -> String {
    let programmers = available_programmers();
    let names: Vec<&str> = programmers.iter().map(|p| p.name).collect();
    names.join(", ")
}

/// Resolve a programmer name or alias to its primary name
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.contains(&name))
        .map(|p| p.name)
}

/// Open the transport named by a programmer string
#[allow(unused_variables)]
pub fn open_transport(programmer: &str) -> Result<Transport, Box<dyn std::error::Error>> {
    let (name, options) = parse_programmer_string(programmer);

    let canonical_name = match find_programmer(name) {
        Some(n) => n,
        None => return Err(unknown_programmer_error(name)),
    };

    match canonical_name {
        #[cfg(feature = "dummy")]
        "dummy" => {
            let config = parse_dummy_options(&options)?;
            log::info!("Using in-memory SPI NAND emulator");
            Ok(Box::new(spinand_dummy::DummyNand::new(config)))
        }

        #[cfg(feature = "linux-spi")]
        "linux_spi" => {
            use spinand_linux_spi::{parse_options, LinuxSpi};

            log::info!("Opening Linux SPI programmer...");

            let config = parse_options(&options)
                .map_err(|e| format!("Invalid linux_spi parameters: {}", e))?;

            let spi = LinuxSpi::open(&config).map_err(|e| {
                format!(
                    "Failed to open Linux SPI device: {}\n\
                     Make sure the device exists and you have read/write permissions.\n\
                     You may need to: sudo usermod -aG spi $USER",
                    e
                )
            })?;
            Ok(Box::new(spi))
        }

        _ => Err(unknown_programmer_error(name)),
    }
}

/// Build an emulator configuration from programmer options
#[cfg(feature = "dummy")]
fn parse_dummy_options(
    options: &[(&str, &str)],
) -> Result<spinand_dummy::DummyConfig, Box<dyn std::error::Error>> {
    use spinand_core::chip;
    use spinand_dummy::{DummyConfig, BLOCK_LOCK_ALL};

    let mut config = DummyConfig::default();
    for (key, value) in options {
        match *key {
            "chip" => {
                let found = chip::find_by_name(value)
                    .ok_or_else(|| format!("Unknown chip for dummy: {}", value))?;
                let busy = config.busy_polls;
                let lock = config.power_on_lock;
                config = DummyConfig::for_chip(found)
                    .with_busy_polls(busy)
                    .with_power_on_lock(lock);
            }
            "busy" => {
                config.busy_polls = value
                    .parse()
                    .map_err(|_| format!("Invalid busy value: {}", value))?;
            }
            "locked" => {
                config.power_on_lock = match *value {
                    "0" | "false" | "no" => 0,
                    "1" | "true" | "yes" => BLOCK_LOCK_ALL,
                    _ => return Err(format!("Invalid locked value: {}", value).into()),
                };
            }
            _ => log::warn!("dummy: Unknown option: {}={}", key, value),
        }
    }
    Ok(config)
}

/// Parse a programmer string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_programmer_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

fn unknown_programmer_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown programmer: {}\n\n", name);
    msg.push_str(&programmer_help());
    msg.push_str("\nUse 'spinand list-programmers' for more details");
    msg.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_programmer_string() {
        assert_eq!(parse_programmer_string("dummy"), ("dummy", vec![]));
        assert_eq!(
            parse_programmer_string("linux_spi:dev=/dev/spidev0.0,spispeed=4000"),
            (
                "linux_spi",
                vec![("dev", "/dev/spidev0.0"), ("spispeed", "4000")]
            )
        );
        // Options without a value are dropped
        assert_eq!(
            parse_programmer_string("dummy:busy=3,bogus"),
            ("dummy", vec![("busy", "3")])
        );
    }

    #[test]
    fn test_unknown_programmer() {
        assert!(find_programmer("ch341a").is_none());
        assert!(open_transport("ch341a").is_err());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_dummy_options() {
        let options = [("busy", "5"), ("chip", "TC58CVG2S0HxAIx")];
        let config = parse_dummy_options(&options).unwrap();
        assert_eq!(config.busy_polls, 5);
        assert_eq!(config.geometry.page_size_bytes, 4096);

        let config = parse_dummy_options(&[("locked", "no")]).unwrap();
        assert_eq!(config.power_on_lock, 0);

        assert!(parse_dummy_options(&[("chip", "W25N01GV")]).is_err());
        assert!(parse_dummy_options(&[("busy", "lots")]).is_err());
    }

    #[cfg(feature = "linux-spi")]
    #[test]
    fn test_spidev_aliases() {
        assert_eq!(find_programmer("spidev"), Some("linux_spi"));
        assert_eq!(find_programmer("linux-spi"), Some("linux_spi"));
    }
}
