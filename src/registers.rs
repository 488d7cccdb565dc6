//! Register definitions for the AS7343
//!
//! The AS7343 splits its register file into two views selected by the
//! `REG_BANK` bit of `CFG0` (0xBF):
//!
//! ## Bank Architecture
//! - **Bank 0** (`REG_BANK` = 0): measurement, configuration and channel data
//!   registers at 0x80 and above
//! - **Bank 1** (`REG_BANK` = 1): identification and auxiliary registers at
//!   0x58-0x66
//!
//! `CFG0` itself sits outside the switched region and is reachable from either
//! bank. Channel data (`DATA0_L` at 0x95 onwards) is not modelled here; it is
//! read as a raw two-byte burst per channel by the driver.

device_driver::create_device!(
    device_name: As7343,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        // ==================== BANK 1 REGISTERS ====================
        // Identification

        /// AUXID - Auxiliary identification (Bank 1, 0x58)
        register Auxid {
            const ADDRESS = 0x58;
            const SIZE_BITS = 8;

            /// Auxiliary identification
            aux_id: uint = 0..4,
            reserved_7_4: uint = 4..8,
        },

        /// REVID - Revision number identification (Bank 1, 0x59)
        register Revid {
            const ADDRESS = 0x59;
            const SIZE_BITS = 8;

            /// Revision number
            rev_id: uint = 0..3,
            reserved_7_3: uint = 3..8,
        },

        /// ID - Part number identification (Bank 1, 0x5A)
        /// Expected value: 0x81
        register Id {
            const ADDRESS = 0x5A;
            const SIZE_BITS = 8;

            /// Part number (should read 0x81)
            id: uint = 0..8,
        },

        // ==================== BANK 0 REGISTERS ====================
        // Measurement control and configuration

        /// ENABLE - Power and function enables (Bank 0, 0x80)
        register Enable {
            const ADDRESS = 0x80;
            const SIZE_BITS = 8;

            /// Power on (oscillator enable)
            pon: bool = 0,
            /// Spectral measurement enable
            sp_en: bool = 1,
            reserved_2: uint = 2..3,
            /// Wait time between measurements enable
            wen: bool = 3,
            /// SMUX command execution enable
            smuxen: bool = 4,
            reserved_5: uint = 5..6,
            /// Flicker detection enable
            fden: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// ATIME - Integration step count (Bank 0, 0x81)
        /// Integration time = (ATIME + 1) * (ASTEP + 1) * 2.78us
        register Atime {
            const ADDRESS = 0x81;
            const SIZE_BITS = 8;

            /// Number of integration steps minus one
            atime: uint = 0..8,
        },

        /// STATUS2 - Measurement status (Bank 0, 0x90)
        register DataStatus {
            const ADDRESS = 0x90;
            const SIZE_BITS = 8;

            /// Digital saturation in flicker detection
            fdsat_digital: bool = 0,
            /// Analog saturation in flicker detection
            fdsat_analog: bool = 1,
            reserved_2: uint = 2..3,
            /// Analog saturation of spectral channels
            asat_analog: bool = 3,
            /// Digital saturation of spectral channels
            asat_digital: bool = 4,
            reserved_5: uint = 5..6,
            /// Spectral measurement valid (a full cycle completed)
            avalid: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// CFG0 - Bank selection and power options (0xBF, either bank)
        register BankConfig {
            const ADDRESS = 0xBF;
            const SIZE_BITS = 8;

            reserved_1_0: uint = 0..2,
            /// Extend wait time by 16x
            wlong: bool = 2,
            reserved_3: uint = 3..4,
            /// Register bank select (0 = 0x80 and above, 1 = 0x20-0x7F)
            reg_bank: bool = 4,
            /// Low power idle mode
            low_power: bool = 5,
            reserved_7_6: uint = 6..8,
        },

        /// CFG1 - Spectral gain (Bank 0, 0xC6)
        register GainConfig {
            const ADDRESS = 0xC6;
            const SIZE_BITS = 8;

            /// Spectral engine gain code (0 = 0.5x ... 12 = 2048x)
            again: uint = 0..5,
            reserved_7_5: uint = 5..8,
        },

        /// ASTEP_L - Integration step size, low byte (Bank 0, 0xD4)
        register AstepLow {
            const ADDRESS = 0xD4;
            const SIZE_BITS = 8;

            /// ASTEP bits [7:0]
            astep_low: uint = 0..8,
        },

        /// ASTEP_H - Integration step size, high byte (Bank 0, 0xD5)
        register AstepHigh {
            const ADDRESS = 0xD5;
            const SIZE_BITS = 8;

            /// ASTEP bits [15:8]
            astep_high: uint = 0..8,
        },

        /// CFG20 - SMUX cycling configuration (Bank 0, 0xD6)
        register SmuxConfig {
            const ADDRESS = 0xD6;
            const SIZE_BITS = 8;

            reserved_4_0: uint = 0..5,
            /// Automatic channel cycling (0 = 6 channels, 2 = 12 channels, 3 = 18 channels)
            auto_smux: uint = 5..7,
            /// Flicker detection FIFO 8-bit mode
            fd_fifo_byte_mode: bool = 7,
        }
    }
);
