//! Driver scenarios against the in-memory NAND

use std::cell::RefCell;

use spinand_core::chip::{self, DeviceGeometry};
use spinand_core::flash::NandFlash;
use spinand_core::protocol::PollConfig;
use spinand_core::spi::opcodes;
use spinand_core::transport::{SessionConfig, SpiTransport};
use spinand_core::Error;
use spinand_dummy::{DummyConfig, DummyNand, BLOCK_LOCK_ALL};

fn toshiba() -> DummyConfig {
    DummyConfig::for_chip(chip::find_by_name("TC58CVG2S0HxAIx").unwrap())
}

fn ready_flash(config: DummyConfig) -> NandFlash<DummyNand> {
    let mut flash = NandFlash::new(DummyNand::new(config));
    flash.initialize().unwrap();
    flash.reset_unlock().unwrap();
    flash.transport_mut().clear_log();
    flash
}

fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

#[test]
fn test_every_known_chip_resolves() {
    for known in chip::all_chips() {
        let mut flash = NandFlash::new(DummyNand::new(DummyConfig::for_chip(known)));
        let found = flash.initialize().unwrap();
        assert_eq!(found, known);
        assert_eq!(flash.geometry(), Some(known.geometry));
    }
}

#[test]
fn test_toshiba_geometry() {
    let mut config = DummyConfig::default();
    config.id = [0x00, 0x98, 0xCD];
    let mut flash = NandFlash::new(DummyNand::new(config));
    flash.initialize().unwrap();
    assert_eq!(flash.page_size_bytes(), 4096);
    assert_eq!(flash.block_size_pages(), 64);
    assert_eq!(flash.blocks_count(), 2048);
}

#[test]
fn test_unknown_device() {
    let mut config = DummyConfig::default();
    config.id = [0xEF, 0xAA, 0x21];
    let mut flash = NandFlash::new(DummyNand::new(config));
    assert!(matches!(
        flash.initialize(),
        Err(Error::UnknownDevice { .. })
    ));
    assert!(!flash.is_initialized());
}

#[test]
fn test_double_initialize() {
    let mut flash = NandFlash::new(DummyNand::new_default());
    flash.initialize().unwrap();
    assert_eq!(flash.initialize(), Err(Error::AlreadyInitialized));
    flash.deinitialize();
    assert!(flash.initialize().is_ok());
}

#[test]
fn test_oversized_read_sends_nothing() {
    let mut flash = ready_flash(DummyConfig::default());
    let mut buf = vec![0u8; 2049];
    assert_eq!(flash.page_read(0, 0, &mut buf), Err(Error::DataTooBig));
    assert!(flash.transport().opcode_log().is_empty());
}

#[test]
fn test_oversized_program_sends_nothing() {
    let mut flash = ready_flash(DummyConfig::default());
    assert_eq!(
        flash.page_program(0, 2000, &[0u8; 49]),
        Err(Error::DataTooBig)
    );
    assert!(flash.transport().opcode_log().is_empty());

    // Exactly up to the end of the page is fine
    assert_eq!(flash.page_program(0, 2000, &[0u8; 48]), Ok(48));
}

#[test]
fn test_poll_count_matches_busy_window() {
    for k in [0u32, 1, 4, 17] {
        let mut flash = ready_flash(DummyConfig::default().with_busy_polls(k));
        flash.block_erase(0).unwrap();
        assert_eq!(flash.transport().status_reads(), k as usize + 1);
        assert_eq!(
            flash.transport().delay_total_us(),
            (k as u64 + 1) * opcodes::PAGE_READ_TIME_US as u64
        );
    }
}

#[test]
fn test_program_then_read_round_trip() {
    let mut flash = ready_flash(toshiba());
    let geometry = flash.geometry().unwrap();
    let row = geometry.row_address(12, 5);
    let data = pattern(4096, 7);

    assert_eq!(flash.page_program(row, 0, &data), Ok(4096));
    let mut back = vec![0u8; 4096];
    assert_eq!(flash.page_read(row, 0, &mut back), Ok(4096));
    assert_eq!(back, data);
}

#[test]
fn test_partial_page_round_trip() {
    let mut flash = ready_flash(DummyConfig::default());
    let data = pattern(100, 3);
    flash.page_program(9, 300, &data).unwrap();

    let mut back = vec![0u8; 100];
    flash.page_read(9, 300, &mut back).unwrap();
    assert_eq!(back, data);

    let mut before = vec![0u8; 300];
    flash.page_read(9, 0, &mut before).unwrap();
    assert!(before.iter().all(|&b| b == 0xFF));
}

#[test]
fn test_command_sequences() {
    let mut flash = ready_flash(DummyConfig::default().with_busy_polls(0));

    let mut buf = [0u8; 16];
    flash.page_read(1, 0, &mut buf).unwrap();
    assert_eq!(
        flash.transport().opcode_log(),
        [
            opcodes::PAGE_READ,
            opcodes::GET_FEATURE,
            opcodes::READ_FROM_CACHE,
        ]
    );

    flash.transport_mut().clear_log();
    flash.page_program(1, 0, &buf).unwrap();
    assert_eq!(
        flash.transport().opcode_log(),
        [
            opcodes::WRITE_ENABLE,
            opcodes::PROGRAM_LOAD,
            opcodes::PROGRAM_EXECUTE,
            opcodes::GET_FEATURE,
        ]
    );

    flash.transport_mut().clear_log();
    flash.block_erase(64).unwrap();
    assert_eq!(
        flash.transport().opcode_log(),
        [
            opcodes::WRITE_ENABLE,
            opcodes::BLOCK_ERASE,
            opcodes::GET_FEATURE,
        ]
    );
}

#[test]
fn test_uncorrectable_ecc_is_bad_block() {
    let mut flash = ready_flash(DummyConfig::default());
    flash.transport_mut().mark_uncorrectable(42);

    let mut buf = [0u8; 8];
    assert_eq!(flash.page_read(42, 0, &mut buf), Err(Error::BadBlock));
    assert!(!flash
        .transport()
        .opcode_log()
        .contains(&opcodes::READ_FROM_CACHE));

    // Neighbouring pages are unaffected
    assert_eq!(flash.page_read(43, 0, &mut buf), Ok(8));
}

#[test]
fn test_program_failure() {
    let mut flash = ready_flash(DummyConfig::default());
    flash.transport_mut().fail_program_at(3);
    assert_eq!(
        flash.page_program(3, 0, &[0x00; 4]),
        Err(Error::ProgramFailure)
    );
    assert_eq!(flash.page_program(4, 0, &[0x00; 4]), Ok(4));
}

#[test]
fn test_erase_failure_keeps_geometry() {
    let mut flash = ready_flash(DummyConfig::default());
    let geometry = flash.geometry();
    flash.transport_mut().fail_erase_at(5);

    let row = flash.geometry().unwrap().row_address(5, 0);
    assert_eq!(flash.block_erase(row), Err(Error::EraseFailure));
    assert_eq!(flash.geometry(), geometry);
    assert!(flash.is_initialized());
}

#[test]
fn test_erase_restores_erased_state() {
    let mut flash = ready_flash(DummyConfig::default());
    let geometry: DeviceGeometry = flash.geometry().unwrap();
    let row = geometry.row_address(7, 3);
    flash.page_program(row, 0, &[0x00; 32]).unwrap();

    flash.block_erase(geometry.row_address(7, 0)).unwrap();
    let mut buf = [0u8; 32];
    flash.page_read(row, 0, &mut buf).unwrap();
    assert!(buf.iter().all(|&b| b == 0xFF));
}

#[test]
fn test_locked_device_rejects_program_and_erase() {
    let mut flash = NandFlash::new(DummyNand::new_default());
    flash.initialize().unwrap();
    assert_eq!(flash.block_lock(), Ok(BLOCK_LOCK_ALL));

    assert_eq!(
        flash.page_program(0, 0, &[0x00]),
        Err(Error::ProgramFailure)
    );
    assert_eq!(flash.block_erase(0), Err(Error::EraseFailure));

    flash.reset_unlock().unwrap();
    assert_eq!(flash.block_lock(), Ok(0));
    assert_eq!(flash.page_program(0, 0, &[0x00]), Ok(1));
}

#[test]
fn test_row_past_the_device_is_rejected() {
    let mut flash = ready_flash(DummyConfig::default());
    let geometry = flash.geometry().unwrap();

    // 0x0100_0000 would alias row 0 on a 24-bit row address
    for row in [geometry.total_pages(), 0x0100_0000] {
        assert_eq!(
            flash.page_program(row, 0, &[0x00; 4]),
            Err(Error::AddressOutOfRange)
        );
        assert_eq!(flash.block_erase(row), Err(Error::AddressOutOfRange));
    }

    assert!(flash.transport().opcode_log().is_empty());
    assert_eq!(flash.transport().programmed_pages(), 0);
    assert!(flash.transport().page(0).iter().all(|&b| b == 0xFF));
}

#[test]
fn test_never_ready_times_out() {
    let config = DummyConfig::default();
    let mut flash = NandFlash::new(DummyNand::new(config))
        .with_poll_config(PollConfig::default().with_max_polls(50));
    flash.initialize().unwrap();
    flash.transport_mut().set_never_ready(true);

    assert_eq!(flash.block_erase(0), Err(Error::Timeout));
    assert_eq!(flash.transport().status_reads(), 50);
}

#[test]
fn test_transport_failure_aborts_sequence() {
    let mut flash = ready_flash(DummyConfig::default());
    flash
        .transport_mut()
        .fail_transfers_with(Some(opcodes::PROGRAM_LOAD));

    assert_eq!(
        flash.page_program(0, 0, &[0x00; 4]),
        Err(Error::TransportFailure)
    );
    assert_eq!(
        flash.transport().opcode_log(),
        [opcodes::WRITE_ENABLE, opcodes::PROGRAM_LOAD]
    );
    assert_eq!(flash.transport().programmed_pages(), 0);
}

#[test]
fn test_identification_transport_failure() {
    let mut nand = DummyNand::new_default();
    nand.fail_transfers_with(Some(opcodes::READ_ID));
    let mut flash = NandFlash::new(nand);
    assert_eq!(flash.initialize(), Err(Error::TransportFailure));
    assert!(!flash.is_initialized());
}

#[test]
fn test_independent_instances() {
    let mut a = ready_flash(DummyConfig::default());
    let mut b = ready_flash(toshiba());

    a.page_program(0, 0, &[0x11; 4]).unwrap();
    b.page_program(0, 0, &[0x22; 4]).unwrap();

    let mut buf = [0u8; 4];
    a.page_read(0, 0, &mut buf).unwrap();
    assert_eq!(buf, [0x11; 4]);
    b.page_read(0, 0, &mut buf).unwrap();
    assert_eq!(buf, [0x22; 4]);
    assert_ne!(a.page_size_bytes(), b.page_size_bytes());
}

#[test]
fn test_session_config_callbacks() {
    let nand = RefCell::new(DummyNand::new(toshiba()));
    {
        let config = SessionConfig::new(
            |buf: &mut [u8], write_len: usize, read_len: usize| {
                nand.borrow_mut().transfer(buf, write_len, read_len)
            },
            |us: u32| nand.borrow_mut().delay_us(us),
        );
        let mut flash = NandFlash::new(config);
        flash.initialize().unwrap();
        flash.reset_unlock().unwrap();
        flash.page_program(2, 0, &[0xA5; 16]).unwrap();
    }
    assert_eq!(&nand.borrow().page(2)[..16], &[0xA5; 16]);
}
