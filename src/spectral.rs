//! Channel layout and wavelength ordering
//!
//! With automatic SMUX cycling set to 18 channels, one measurement fills the
//! `DATA0`..`DATA17` registers in three cycles of six slots each. Slots 4/10/16
//! hold the clear (VIS) channel and slots 5/11/17 the flicker detector, so only
//! 12 of the 18 slots are distinct spectral bands. [`SORTED_CHANNEL_MAP`] picks
//! those 12 in ascending wavelength order, NIR last.

/// Number of hardware channel slots in one 18-channel measurement
pub const NUM_CHANNELS: usize = 18;

/// Number of wavelength-ordered spectral bands
pub const NUM_SORTED_CHANNELS: usize = 12;

/// All 18 channel values as read from the device, indexed by slot
pub type RawChannels = [u16; NUM_CHANNELS];

/// The 12 spectral bands, ascending wavelength (405nm ... 855nm)
pub type SortedChannels = [u16; NUM_SORTED_CHANNELS];

/// Hardware channel slot (`DATAn` register pair)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// DATA0: FZ, 450nm
    Fz = 0,
    /// DATA1: FY, 555nm
    Fy = 1,
    /// DATA2: FXL, 600nm
    Fxl = 2,
    /// DATA3: NIR, 855nm
    Nir = 3,
    /// DATA4: clear, cycle 1
    Vis1 = 4,
    /// DATA5: flicker detect, cycle 1
    Fd1 = 5,
    /// DATA6: F2, 425nm
    F2 = 6,
    /// DATA7: F3, 475nm
    F3 = 7,
    /// DATA8: F4, 515nm
    F4 = 8,
    /// DATA9: F6, 640nm
    F6 = 9,
    /// DATA10: clear, cycle 2
    Vis2 = 10,
    /// DATA11: flicker detect, cycle 2
    Fd2 = 11,
    /// DATA12: F1, 405nm
    F1 = 12,
    /// DATA13: F7, 690nm
    F7 = 13,
    /// DATA14: F8, 745nm
    F8 = 14,
    /// DATA15: F5, 550nm
    F5 = 15,
    /// DATA16: clear, cycle 3
    Vis3 = 16,
    /// DATA17: flicker detect, cycle 3
    Fd3 = 17,
}

impl Channel {
    /// Slot index into [`RawChannels`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Address of the low data byte; the high byte follows at `+1`
    #[must_use]
    pub const fn data_address(self) -> u8 {
        crate::device::DATA0_L + 2 * (self as u8)
    }
}

/// Spectral band, ordered by centre wavelength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpectralBand {
    /// Violet, 405nm
    F1 = 0,
    /// Violet-blue, 425nm
    F2 = 1,
    /// Blue (CIE Z), 450nm
    Fz = 2,
    /// Blue, 475nm
    F3 = 3,
    /// Cyan-green, 515nm
    F4 = 4,
    /// Green, 550nm
    F5 = 5,
    /// Green-yellow (CIE Y), 555nm
    Fy = 6,
    /// Orange (CIE X), 600nm
    Fxl = 7,
    /// Red, 640nm
    F6 = 8,
    /// Deep red, 690nm
    F7 = 9,
    /// Red edge, 745nm
    F8 = 10,
    /// Near infrared, 855nm
    Nir = 11,
}

impl SpectralBand {
    /// All bands in sorted order
    pub const ALL: [Self; NUM_SORTED_CHANNELS] = [
        Self::F1,
        Self::F2,
        Self::Fz,
        Self::F3,
        Self::F4,
        Self::F5,
        Self::Fy,
        Self::Fxl,
        Self::F6,
        Self::F7,
        Self::F8,
        Self::Nir,
    ];

    /// Position in [`SortedChannels`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Hardware slot this band is read from
    #[must_use]
    pub const fn channel(self) -> Channel {
        SORTED_CHANNEL_MAP[self as usize]
    }

    /// Nominal centre wavelength in nanometres
    #[must_use]
    pub const fn wavelength_nm(self) -> u16 {
        match self {
            Self::F1 => 405,
            Self::F2 => 425,
            Self::Fz => 450,
            Self::F3 => 475,
            Self::F4 => 515,
            Self::F5 => 550,
            Self::Fy => 555,
            Self::Fxl => 600,
            Self::F6 => 640,
            Self::F7 => 690,
            Self::F8 => 745,
            Self::Nir => 855,
        }
    }
}

/// Hardware slot feeding each sorted position
pub const SORTED_CHANNEL_MAP: [Channel; NUM_SORTED_CHANNELS] = [
    Channel::F1,
    Channel::F2,
    Channel::Fz,
    Channel::F3,
    Channel::F4,
    Channel::F5,
    Channel::Fy,
    Channel::Fxl,
    Channel::F6,
    Channel::F7,
    Channel::F8,
    Channel::Nir,
];

/// Reorder the 18 raw slots into the 12 wavelength-ordered bands
#[must_use]
pub fn remap(raw: &RawChannels) -> SortedChannels {
    core::array::from_fn(|i| raw[SORTED_CHANNEL_MAP[i].index()])
}

/// Like [`remap`], for a slice; `None` unless exactly 18 values are supplied
#[must_use]
pub fn remap_slice(raw: &[u16]) -> Option<SortedChannels> {
    let raw: &RawChannels = raw.try_into().ok()?;
    Some(remap(raw))
}

/// One acquisition: the raw slots and the sorted bands derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Hardware slots in register order
    pub raw: RawChannels,
    /// Spectral bands, ascending wavelength
    pub sorted: SortedChannels,
}

impl Measurement {
    /// Build a measurement from one burst read
    #[must_use]
    pub fn from_raw(raw: RawChannels) -> Self {
        Self {
            sorted: remap(&raw),
            raw,
        }
    }

    /// Value of a single spectral band
    #[must_use]
    pub const fn band(&self, band: SpectralBand) -> u16 {
        self.sorted[band as usize]
    }

    /// Value of a hardware slot
    #[must_use]
    pub const fn channel(&self, channel: Channel) -> u16 {
        self.raw[channel as usize]
    }

    /// Bands scaled to sum to 1.0
    ///
    /// A dark (all-zero) spectrum yields all zeros.
    #[must_use]
    pub fn l1_normalized(&self) -> [f32; NUM_SORTED_CHANNELS] {
        let sum: u32 = self.sorted.iter().map(|&v| u32::from(v)).sum();
        if sum == 0 {
            return [0.0; NUM_SORTED_CHANNELS];
        }
        let sum = sum as f32;
        self.sorted.map(|v| f32::from(v) / sum)
    }
}
