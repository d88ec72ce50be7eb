use serde::{Deserialize, Serialize};

pub const LIGHT_CHANNELS: usize = 4;
pub const MAX_LIGHT: u8 = 15;

const CHANNEL_BITS: u32 = 4;
const CHANNEL_MASK: u16 = 0xF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LightChannel {
    Red = 0,
    Green,
    Blue,
    Sun,
}

impl LightChannel {
    pub const fn all() -> [LightChannel; LIGHT_CHANNELS] {
        [
            LightChannel::Red,
            LightChannel::Green,
            LightChannel::Blue,
            LightChannel::Sun,
        ]
    }
}

/// Four 4-bit light channels packed into 16 bits.
/// Channel `i` lives at bits `4 * i`, in the order red, green, blue, sun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct LightValue(pub u16);

impl LightValue {
    pub const ZERO: LightValue = LightValue(0);
    pub const FULL: LightValue = LightValue::new(MAX_LIGHT, MAX_LIGHT, MAX_LIGHT, MAX_LIGHT);

    pub const fn new(r: u8, g: u8, b: u8, sun: u8) -> Self {
        debug_assert!(r <= MAX_LIGHT && g <= MAX_LIGHT && b <= MAX_LIGHT && sun <= MAX_LIGHT);

        LightValue(
            (r as u16 & CHANNEL_MASK)
                | ((g as u16 & CHANNEL_MASK) << CHANNEL_BITS)
                | ((b as u16 & CHANNEL_MASK) << (CHANNEL_BITS * 2))
                | ((sun as u16 & CHANNEL_MASK) << (CHANNEL_BITS * 3)),
        )
    }

    pub const fn channel(self, channel: LightChannel) -> u8 {
        self.channel_by_index(channel as usize)
    }

    /// Decodes channel `index` (0..4). Out of range indices read as zero.
    pub const fn channel_by_index(self, index: usize) -> u8 {
        if index >= LIGHT_CHANNELS {
            return 0;
        }
        ((self.0 >> (index as u32 * CHANNEL_BITS)) & CHANNEL_MASK) as u8
    }

    pub const fn with_channel(self, channel: LightChannel, value: u8) -> Self {
        let shift = channel as u32 * CHANNEL_BITS;
        let cleared = self.0 & !(CHANNEL_MASK << shift);
        LightValue(cleared | ((value as u16 & CHANNEL_MASK) << shift))
    }

    pub const fn r(self) -> u8 {
        self.channel(LightChannel::Red)
    }

    pub const fn g(self) -> u8 {
        self.channel(LightChannel::Green)
    }

    pub const fn b(self) -> u8 {
        self.channel(LightChannel::Blue)
    }

    pub const fn sun(self) -> u8 {
        self.channel(LightChannel::Sun)
    }

    pub fn channels(self) -> [u8; LIGHT_CHANNELS] {
        LightChannel::all().map(|channel| self.channel(channel))
    }

    /// Raises every color channel to at least `floor`, leaving sun untouched.
    pub fn with_color_floor(self, floor: u8) -> Self {
        let mut result = self;
        for channel in [LightChannel::Red, LightChannel::Green, LightChannel::Blue] {
            if result.channel(channel) < floor {
                result = result.with_channel(channel, floor);
            }
        }
        result
    }
}
