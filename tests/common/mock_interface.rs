//! Mock interface implementation for testing the AS7343 driver

use as7343::Bank;
use device_driver::RegisterInterface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// CFG0 - bank select, reachable from both banks
pub const CFG0: u8 = 0xBF;
/// ID register (Bank 1)
pub const ID: u8 = 0x5A;
/// ENABLE register (Bank 0)
pub const ENABLE: u8 = 0x80;
/// ATIME register (Bank 0)
pub const ATIME: u8 = 0x81;
/// STATUS2 register (Bank 0)
pub const STATUS2: u8 = 0x90;
/// DATA0_L register (Bank 0)
pub const DATA0_L: u8 = 0x95;
/// CFG1 - gain (Bank 0)
pub const CFG1: u8 = 0xC6;
/// ASTEP_L register (Bank 0)
pub const ASTEP_L: u8 = 0xD4;
/// ASTEP_H register (Bank 0)
pub const ASTEP_H: u8 = 0xD5;
/// CFG20 - auto SMUX (Bank 0)
pub const CFG20: u8 = 0xD6;

const AVALID: u8 = 1 << 6;

/// Records operations performed on the mock interface
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Read register operation
    ReadRegister {
        /// Bank active during the read
        bank: Bank,
        /// Register address
        address: u8,
        /// Value that was returned
        value: u8,
    },
    /// Write register operation
    WriteRegister {
        /// Bank active during the write
        bank: Bank,
        /// Register address
        address: u8,
        /// Value that was written
        value: u8,
    },
    /// Write to CFG0 (bank select)
    BankSwitch {
        /// Bank before the write
        from: Bank,
        /// Bank after the write
        to: Bank,
    },
}

/// Shared state for mock interface (uses interior mutability)
#[derive(Debug)]
struct MockState {
    /// Simulated register file, address -> value
    registers: HashMap<u8, u8>,

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Failure injection flags
    fail_next_read: bool,
    fail_next_write: bool,
    fail_bank_switch: bool,
    bank_switches_before_failure: Option<usize>,
    fail_read_address: Option<u8>,
    fail_write_address: Option<u8>,

    /// AVALID becomes set on this status read (1-based); `None` never sets it
    ready_on_poll: Option<usize>,
    status_reads: usize,
}

impl MockState {
    fn new() -> Self {
        let mut state = Self {
            registers: HashMap::new(),
            operations: Vec::new(),
            fail_next_read: false,
            fail_next_write: false,
            fail_bank_switch: false,
            bank_switches_before_failure: None,
            fail_read_address: None,
            fail_write_address: None,
            ready_on_poll: Some(1),
            status_reads: 0,
        };

        // Part number
        state.registers.insert(ID, 0x81);

        // CFG0 power-on value: Bank 0 selected
        state.registers.insert(CFG0, 0x00);

        state
    }

    fn current_bank(&self) -> Bank {
        Bank::from_cfg0(self.registers.get(&CFG0).copied().unwrap_or(0))
    }

    /// Bank required to reach `address`, `None` when reachable from both
    fn required_bank(address: u8) -> Option<Bank> {
        match address {
            CFG0 => None,
            0x80.. => Some(Bank::Bank0),
            _ => Some(Bank::Bank1),
        }
    }

    fn check_bank(&self, address: u8) -> Result<(), MockError> {
        match Self::required_bank(address) {
            Some(bank) if bank != self.current_bank() => Err(MockError::WrongBank),
            _ => Ok(()),
        }
    }

    fn read_byte(&mut self, address: u8) -> u8 {
        let stored = self.registers.get(&address).copied().unwrap_or(0);
        if address != STATUS2 {
            return stored;
        }

        self.status_reads += 1;
        let ready = self
            .ready_on_poll
            .is_some_and(|poll| self.status_reads >= poll);
        if ready {
            stored | AVALID
        } else {
            stored & !AVALID
        }
    }
}

/// Mock interface for testing
#[derive(Clone)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl MockInterface {
    /// Create a new mock interface with default register values
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::new())),
        }
    }

    /// Set a register value
    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers.insert(address, value);
    }

    /// Get a register value
    pub fn get_register(&self, address: u8) -> u8 {
        self.state
            .borrow()
            .registers
            .get(&address)
            .copied()
            .unwrap_or(0)
    }

    /// Bank currently selected by CFG0
    pub fn current_bank(&self) -> Bank {
        self.state.borrow().current_bank()
    }

    /// Force the device into a bank without logging a switch
    pub fn force_bank(&self, bank: Bank) {
        let cfg0 = self.get_register(CFG0);
        self.set_register(CFG0, bank.merge_into(cfg0));
    }

    /// Set the ID register value
    pub fn set_device_id(&self, value: u8) {
        self.set_register(ID, value);
    }

    /// Load all 18 channel slots (little-endian pairs from DATA0_L)
    pub fn set_channel_data(&self, channels: &[u16; 18]) {
        let mut state = self.state.borrow_mut();
        for (i, value) in channels.iter().enumerate() {
            let [low, high] = value.to_le_bytes();
            let address = DATA0_L + 2 * i as u8;
            state.registers.insert(address, low);
            state.registers.insert(address + 1, high);
        }
    }

    /// AVALID reads as set from the `poll`-th status read on (1-based)
    pub fn set_ready_on_poll(&self, poll: usize) {
        let mut state = self.state.borrow_mut();
        state.ready_on_poll = Some(poll);
        state.status_reads = 0;
    }

    /// AVALID never reads as set
    pub fn set_never_ready(&self) {
        let mut state = self.state.borrow_mut();
        state.ready_on_poll = None;
        state.status_reads = 0;
    }

    /// Number of STATUS2 reads since the last readiness change
    pub fn status_reads(&self) -> usize {
        self.state.borrow().status_reads
    }

    /// Inject a read failure on the next read operation
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Inject a write failure on the next write operation
    pub fn fail_next_write(&self) {
        self.state.borrow_mut().fail_next_write = true;
    }

    /// Fail every CFG0 access while enabled
    pub fn fail_bank_switch(&self, enable: bool) {
        self.state.borrow_mut().fail_bank_switch = enable;
    }

    /// Let `successful` CFG0 writes through, then fail every later one
    pub fn fail_bank_switch_after(&self, successful: usize) {
        self.state.borrow_mut().bank_switches_before_failure = Some(successful);
    }

    /// Fail every read starting at `address`
    pub fn fail_reads_at(&self, address: Option<u8>) {
        self.state.borrow_mut().fail_read_address = address;
    }

    /// Fail every write to `address`
    pub fn fail_writes_at(&self, address: Option<u8>) {
        self.state.borrow_mut().fail_write_address = address;
    }

    /// Get the operations log
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Clear the operations log
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    /// Values written to `address`, in order
    pub fn writes_to(&self, address: u8) -> Vec<u8> {
        self.state
            .borrow()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::WriteRegister {
                    address: written,
                    value,
                    ..
                } if *written == address => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Count bank switch operations
    pub fn bank_switch_count(&self) -> usize {
        self.state
            .borrow()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::BankSwitch { .. }))
            .count()
    }
}

/// Mock error type
#[derive(Debug, Clone, PartialEq)]
pub enum MockError {
    /// Simulated communication error
    Communication,
    /// Simulated bank switch error
    BankSwitch,
    /// Register accessed while the other bank was selected
    WrongBank,
}

impl RegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(MockError::Communication);
        }
        if state.fail_read_address == Some(address) {
            return Err(MockError::Communication);
        }
        if address == CFG0 && state.fail_bank_switch {
            return Err(MockError::BankSwitch);
        }

        for (i, byte) in read_data.iter_mut().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            state.check_bank(reg_addr)?;

            *byte = state.read_byte(reg_addr);

            let bank = state.current_bank();
            state.operations.push(Operation::ReadRegister {
                bank,
                address: reg_addr,
                value: *byte,
            });
        }

        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockError::Communication);
        }
        if state.fail_write_address == Some(address) {
            return Err(MockError::Communication);
        }

        // Handle bank switch register specially
        if address == CFG0 {
            if state.fail_bank_switch {
                return Err(MockError::BankSwitch);
            }
            let remaining_switches = state.bank_switches_before_failure;
            match remaining_switches {
                Some(0) => return Err(MockError::BankSwitch),
                Some(remaining) => state.bank_switches_before_failure = Some(remaining - 1),
                None => {}
            }

            let from = state.current_bank();
            state.registers.insert(CFG0, write_data[0]);
            let to = state.current_bank();

            state.operations.push(Operation::WriteRegister {
                bank: from,
                address,
                value: write_data[0],
            });
            state.operations.push(Operation::BankSwitch { from, to });

            return Ok(());
        }

        for (i, &byte) in write_data.iter().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            state.check_bank(reg_addr)?;

            state.registers.insert(reg_addr, byte);

            let bank = state.current_bank();
            state.operations.push(Operation::WriteRegister {
                bank,
                address: reg_addr,
                value: byte,
            });
        }

        Ok(())
    }
}

impl Default for MockInterface {
    fn default() -> Self {
        Self::new()
    }
}
