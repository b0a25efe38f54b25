use std::fmt;

pub const HEADER_SIZE: usize = 4;

/// Bits that must stay constant across the frames of one stream:
/// version, layer, sampling rate, channel mode and emphasis.
pub const COMPARISON_MASK: u32 = 0x001E_0CC3;

pub const SYNC_MASK: u32 = 0xFFE0_0000;

pub const BITRATE_FREE: u8 = 0x0;
pub const BITRATE_BAD: u8 = 0xF;
pub const BITRATE_MAX: u8 = 0xE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Version {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

impl Version {
    /// MPEG 2 and 2.5 share bitrate and frame geometry tables.
    pub fn is_v2(self) -> bool {
        self != Version::Mpeg1
    }

    pub(crate) fn class(self) -> usize {
        self.is_v2() as usize
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Version::Mpeg1 => "1",
            Version::Mpeg2 => "2",
            Version::Mpeg25 => "2.5",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Layer1,
    Layer2,
    Layer3,
}

impl Layer {
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Layer I frames are counted in 4-byte slots, II and III in bytes.
    pub fn slot_size(self) -> u32 {
        match self {
            Layer::Layer1 => 4,
            _ => 1,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ChannelMode::Stereo => "Stereo",
            ChannelMode::JointStereo => "Joint Stereo",
            ChannelMode::DualChannel => "Dual Channel",
            ChannelMode::Mono => "Mono",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    None,
    Ms50_15,
    CcittJ17,
}

impl fmt::Display for Emphasis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Emphasis::None => "None",
            Emphasis::Ms50_15 => "50/15 ms",
            Emphasis::CcittJ17 => "CCIT J.17",
        })
    }
}

// kbps, indexed by [version class][layer][bitrate index]
pub static BIT_RATES: [[[u32; 16]; 3]; 2] = [
    [
        // Mpeg1 Layer1
        [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0],
        // Mpeg1 Layer2
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0],
        // Mpeg1 Layer3
        [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0],
    ],
    [
        // Mpeg2/2.5 Layer1
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0],
        // Mpeg2/2.5 Layer2
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
        // Mpeg2/2.5 Layer3
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
    ],
];

pub static SAMPLING_RATES: [[u32; 4]; 3] = [
    [44100, 48000, 32000, 0], // Mpeg1
    [22050, 24000, 16000, 0], // Mpeg2
    [11025, 12000, 8000, 0],  // Mpeg25
];

pub static SAMPLES_PER_FRAME: [[u32; 3]; 2] = [
    [384, 1152, 1152], // Mpeg1
    [384, 1152, 576],  // Mpeg2/2.5
];

// indexed by [version class][channel mode]
pub static SIDE_INFORMATION_SIZES: [[u32; 4]; 2] = [
    [32, 32, 32, 17], // Mpeg1
    [17, 17, 17, 9],  // Mpeg2/2.5
];

// MPEG 1 Layer II: allowed bitrate indices, [index][is mono]
pub static LAYER2_MODE_CONSISTENCY: [[bool; 2]; 16] = [
    [true, true],   // free
    [false, true],  // 32
    [false, true],  // 48
    [false, true],  // 56
    [true, true],   // 64
    [false, true],  // 80
    [true, true],   // 96
    [true, true],   // 112
    [true, true],   // 128
    [true, true],   // 160
    [true, true],   // 192
    [true, false],  // 224
    [true, false],  // 256
    [true, false],  // 320
    [true, false],  // 384
    [false, false], // bad
];
