/*!
Video Identification Code timing table and resolution.

Vertical timing parameters of interlaced modes are per field; `v_active`
always holds the full frame height.
*/

use crate::cta::ShortVideoDescriptor;
use crate::error::{EdidError, Result};
use serde::Serialize;

/// Standard timing parameters of one VIC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanonicalTiming {
    pub h_active: u16,
    pub h_front_porch: u16,
    pub h_sync: u16,
    pub h_back_porch: u16,
    pub v_active: u16,
    pub v_front_porch: u16,
    pub v_sync: u16,
    pub v_back_porch: u16,
    pub pixel_clock_khz: u32,
    pub interlaced: bool,
}

impl CanonicalTiming {
    pub fn h_total(&self) -> u32 {
        u32::from(self.h_active)
            + u32::from(self.h_front_porch)
            + u32::from(self.h_sync)
            + u32::from(self.h_back_porch)
    }

    /// Lines per field (interlaced) or per frame (progressive)
    pub fn v_total(&self) -> u32 {
        let divisor = if self.interlaced { 2 } else { 1 };
        u32::from(self.v_active) / divisor
            + u32::from(self.v_front_porch)
            + u32::from(self.v_sync)
            + u32::from(self.v_back_porch)
    }

    /// Field rate for interlaced modes, frame rate otherwise
    pub fn refresh_hz(&self) -> f64 {
        let total = f64::from(self.h_total()) * f64::from(self.v_total());
        f64::from(self.pixel_clock_khz) * 1000.0 / total
    }
}

/// Lookup from VIC to canonical timing parameters
pub trait VicTable {
    fn lookup(&self, vic: u8) -> Option<&CanonicalTiming>;
}

/// A VIC resolved to its timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVic {
    pub vic: u8,
    pub native: bool,
    pub timing: CanonicalTiming,
    pub refresh_hz: f64,
}

/// Resolve one short video descriptor through a timing table
pub fn resolve(table: &dyn VicTable, svd: ShortVideoDescriptor) -> Result<ResolvedVic> {
    let vic = svd.vic()?;
    let timing = *table.lookup(vic).ok_or(EdidError::UnknownVic(vic))?;
    Ok(ResolvedVic {
        vic,
        native: svd.is_native(),
        timing,
        refresh_hz: timing.refresh_hz(),
    })
}

/// CTA-861 timing table: VICs 1-127 and 193-219.
///
/// VICs 128-192 are never written (those bytes carry the native flag) and
/// 220-255 are reserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct CtaVicTable;

impl VicTable for CtaVicTable {
    fn lookup(&self, vic: u8) -> Option<&CanonicalTiming> {
        match vic {
            1..=64 => CTA_VIC_1_64.get(usize::from(vic) - 1),
            65..=127 => CTA_VIC_65_127.get(usize::from(vic) - 65),
            193..=219 => CTA_VIC_193_219.get(usize::from(vic) - 193),
            _ => None,
        }
    }
}

const fn t(h: [u16; 4], v: [u16; 4], pixel_clock_khz: u32, interlaced: bool) -> CanonicalTiming {
    CanonicalTiming {
        h_active: h[0],
        h_front_porch: h[1],
        h_sync: h[2],
        h_back_porch: h[3],
        v_active: v[0],
        v_front_porch: v[1],
        v_sync: v[2],
        v_back_porch: v[3],
        pixel_clock_khz,
        interlaced,
    }
}

const P: bool = false;
const I: bool = true;

// h/v: [active, front porch, sync, back porch]
static CTA_VIC_1_64: [CanonicalTiming; 64] = [
    t([640, 16, 96, 48], [480, 10, 2, 33], 25_175, P),      // 1: 640x480p60
    t([720, 16, 62, 60], [480, 9, 6, 30], 27_000, P),       // 2: 720x480p60 4:3
    t([720, 16, 62, 60], [480, 9, 6, 30], 27_000, P),       // 3: 720x480p60 16:9
    t([1280, 110, 40, 220], [720, 5, 5, 20], 74_250, P),    // 4: 1280x720p60
    t([1920, 88, 44, 148], [1080, 2, 5, 15], 74_250, I),    // 5: 1920x1080i60
    t([1440, 38, 124, 114], [480, 4, 3, 15], 27_000, I),    // 6: 1440x480i60 4:3
    t([1440, 38, 124, 114], [480, 4, 3, 15], 27_000, I),    // 7: 1440x480i60 16:9
    t([1440, 38, 124, 114], [240, 4, 3, 15], 27_000, P),    // 8: 1440x240p60 4:3
    t([1440, 38, 124, 114], [240, 4, 3, 15], 27_000, P),    // 9: 1440x240p60 16:9
    t([2880, 76, 248, 228], [480, 4, 3, 15], 54_000, I),    // 10: 2880x480i60 4:3
    t([2880, 76, 248, 228], [480, 4, 3, 15], 54_000, I),    // 11: 2880x480i60 16:9
    t([2880, 76, 248, 228], [240, 4, 3, 15], 54_000, P),    // 12: 2880x240p60 4:3
    t([2880, 76, 248, 228], [240, 4, 3, 15], 54_000, P),    // 13: 2880x240p60 16:9
    t([1440, 32, 124, 120], [480, 9, 6, 30], 54_000, P),    // 14: 1440x480p60 4:3
    t([1440, 32, 124, 120], [480, 9, 6, 30], 54_000, P),    // 15: 1440x480p60 16:9
    t([1920, 88, 44, 148], [1080, 4, 5, 36], 148_500, P),   // 16: 1920x1080p60
    t([720, 12, 64, 68], [576, 5, 5, 39], 27_000, P),       // 17: 720x576p50 4:3
    t([720, 12, 64, 68], [576, 5, 5, 39], 27_000, P),       // 18: 720x576p50 16:9
    t([1280, 440, 40, 220], [720, 5, 5, 20], 74_250, P),    // 19: 1280x720p50
    t([1920, 528, 44, 148], [1080, 2, 5, 15], 74_250, I),   // 20: 1920x1080i50
    t([1440, 24, 126, 138], [576, 2, 3, 19], 27_000, I),    // 21: 1440x576i50 4:3
    t([1440, 24, 126, 138], [576, 2, 3, 19], 27_000, I),    // 22: 1440x576i50 16:9
    t([1440, 24, 126, 138], [288, 2, 3, 19], 27_000, P),    // 23: 1440x288p50 4:3
    t([1440, 24, 126, 138], [288, 2, 3, 19], 27_000, P),    // 24: 1440x288p50 16:9
    t([2880, 48, 252, 276], [576, 2, 3, 19], 54_000, I),    // 25: 2880x576i50 4:3
    t([2880, 48, 252, 276], [576, 2, 3, 19], 54_000, I),    // 26: 2880x576i50 16:9
    t([2880, 48, 252, 276], [288, 2, 3, 19], 54_000, P),    // 27: 2880x288p50 4:3
    t([2880, 48, 252, 276], [288, 2, 3, 19], 54_000, P),    // 28: 2880x288p50 16:9
    t([1440, 24, 128, 136], [576, 5, 5, 39], 54_000, P),    // 29: 1440x576p50 4:3
    t([1440, 24, 128, 136], [576, 5, 5, 39], 54_000, P),    // 30: 1440x576p50 16:9
    t([1920, 528, 44, 148], [1080, 4, 5, 36], 148_500, P),  // 31: 1920x1080p50
    t([1920, 638, 44, 148], [1080, 4, 5, 36], 74_250, P),   // 32: 1920x1080p24
    t([1920, 528, 44, 148], [1080, 4, 5, 36], 74_250, P),   // 33: 1920x1080p25
    t([1920, 88, 44, 148], [1080, 4, 5, 36], 74_250, P),    // 34: 1920x1080p30
    t([2880, 64, 248, 240], [480, 9, 6, 30], 108_000, P),   // 35: 2880x480p60 4:3
    t([2880, 64, 248, 240], [480, 9, 6, 30], 108_000, P),   // 36: 2880x480p60 16:9
    t([2880, 48, 256, 272], [576, 5, 5, 39], 108_000, P),   // 37: 2880x576p50 4:3
    t([2880, 48, 256, 272], [576, 5, 5, 39], 108_000, P),   // 38: 2880x576p50 16:9
    t([1920, 32, 168, 184], [1080, 23, 5, 57], 72_000, I),  // 39: 1920x1080i50 (1250 total)
    t([1920, 528, 44, 148], [1080, 2, 5, 15], 148_500, I),  // 40: 1920x1080i100
    t([1280, 440, 40, 220], [720, 5, 5, 20], 148_500, P),   // 41: 1280x720p100
    t([720, 12, 64, 68], [576, 5, 5, 39], 54_000, P),       // 42: 720x576p100 4:3
    t([720, 12, 64, 68], [576, 5, 5, 39], 54_000, P),       // 43: 720x576p100 16:9
    t([1440, 24, 126, 138], [576, 2, 3, 19], 54_000, I),    // 44: 1440x576i100 4:3
    t([1440, 24, 126, 138], [576, 2, 3, 19], 54_000, I),    // 45: 1440x576i100 16:9
    t([1920, 88, 44, 148], [1080, 2, 5, 15], 148_500, I),   // 46: 1920x1080i120
    t([1280, 110, 40, 220], [720, 5, 5, 20], 148_500, P),   // 47: 1280x720p120
    t([720, 16, 62, 60], [480, 9, 6, 30], 54_000, P),       // 48: 720x480p120 4:3
    t([720, 16, 62, 60], [480, 9, 6, 30], 54_000, P),       // 49: 720x480p120 16:9
    t([1440, 38, 124, 114], [480, 4, 3, 15], 54_000, I),    // 50: 1440x480i120 4:3
    t([1440, 38, 124, 114], [480, 4, 3, 15], 54_000, I),    // 51: 1440x480i120 16:9
    t([720, 12, 64, 68], [576, 5, 5, 39], 108_000, P),      // 52: 720x576p200 4:3
    t([720, 12, 64, 68], [576, 5, 5, 39], 108_000, P),      // 53: 720x576p200 16:9
    t([1440, 24, 126, 138], [576, 2, 3, 19], 108_000, I),   // 54: 1440x576i200 4:3
    t([1440, 24, 126, 138], [576, 2, 3, 19], 108_000, I),   // 55: 1440x576i200 16:9
    t([720, 16, 62, 60], [480, 9, 6, 30], 108_000, P),      // 56: 720x480p240 4:3
    t([720, 16, 62, 60], [480, 9, 6, 30], 108_000, P),      // 57: 720x480p240 16:9
    t([1440, 38, 124, 114], [480, 4, 3, 15], 108_000, I),   // 58: 1440x480i240 4:3
    t([1440, 38, 124, 114], [480, 4, 3, 15], 108_000, I),   // 59: 1440x480i240 16:9
    t([1280, 1760, 40, 220], [720, 5, 5, 20], 59_400, P),   // 60: 1280x720p24
    t([1280, 2420, 40, 220], [720, 5, 5, 20], 74_250, P),   // 61: 1280x720p25
    t([1280, 1760, 40, 220], [720, 5, 5, 20], 74_250, P),   // 62: 1280x720p30
    t([1920, 88, 44, 148], [1080, 4, 5, 36], 297_000, P),   // 63: 1920x1080p120
    t([1920, 528, 44, 148], [1080, 4, 5, 36], 297_000, P),  // 64: 1920x1080p100
];

static CTA_VIC_65_127: [CanonicalTiming; 63] = [
    t([1280, 1760, 40, 220], [720, 5, 5, 20], 59_400, P),     // 65: 1280x720p24 64:27
    t([1280, 2420, 40, 220], [720, 5, 5, 20], 74_250, P),     // 66: 1280x720p25 64:27
    t([1280, 1760, 40, 220], [720, 5, 5, 20], 74_250, P),     // 67: 1280x720p30 64:27
    t([1280, 440, 40, 220], [720, 5, 5, 20], 74_250, P),      // 68: 1280x720p50 64:27
    t([1280, 110, 40, 220], [720, 5, 5, 20], 74_250, P),      // 69: 1280x720p60 64:27
    t([1280, 440, 40, 220], [720, 5, 5, 20], 148_500, P),     // 70: 1280x720p100 64:27
    t([1280, 110, 40, 220], [720, 5, 5, 20], 148_500, P),     // 71: 1280x720p120 64:27
    t([1920, 638, 44, 148], [1080, 4, 5, 36], 74_250, P),     // 72: 1920x1080p24 64:27
    t([1920, 528, 44, 148], [1080, 4, 5, 36], 74_250, P),     // 73: 1920x1080p25 64:27
    t([1920, 88, 44, 148], [1080, 4, 5, 36], 74_250, P),      // 74: 1920x1080p30 64:27
    t([1920, 528, 44, 148], [1080, 4, 5, 36], 148_500, P),    // 75: 1920x1080p50 64:27
    t([1920, 88, 44, 148], [1080, 4, 5, 36], 148_500, P),     // 76: 1920x1080p60 64:27
    t([1920, 528, 44, 148], [1080, 4, 5, 36], 297_000, P),    // 77: 1920x1080p100 64:27
    t([1920, 88, 44, 148], [1080, 4, 5, 36], 297_000, P),     // 78: 1920x1080p120 64:27
    t([1680, 1360, 40, 220], [720, 5, 5, 20], 59_400, P),     // 79: 1680x720p24
    t([1680, 1228, 40, 220], [720, 5, 5, 20], 59_400, P),     // 80: 1680x720p25
    t([1680, 700, 40, 220], [720, 5, 5, 20], 59_400, P),      // 81: 1680x720p30
    t([1680, 260, 40, 220], [720, 5, 5, 20], 82_500, P),      // 82: 1680x720p50
    t([1680, 260, 40, 220], [720, 5, 5, 20], 99_000, P),      // 83: 1680x720p60
    t([1680, 60, 40, 220], [720, 5, 5, 95], 165_000, P),      // 84: 1680x720p100
    t([1680, 60, 40, 220], [720, 5, 5, 95], 198_000, P),      // 85: 1680x720p120
    t([2560, 998, 44, 148], [1080, 4, 5, 11], 99_000, P),     // 86: 2560x1080p24
    t([2560, 448, 44, 148], [1080, 4, 5, 36], 90_000, P),     // 87: 2560x1080p25
    t([2560, 768, 44, 148], [1080, 4, 5, 36], 118_800, P),    // 88: 2560x1080p30
    t([2560, 548, 44, 148], [1080, 4, 5, 36], 185_625, P),    // 89: 2560x1080p50
    t([2560, 248, 44, 148], [1080, 4, 5, 11], 198_000, P),    // 90: 2560x1080p60
    t([2560, 218, 44, 148], [1080, 4, 5, 161], 371_250, P),   // 91: 2560x1080p100
    t([2560, 548, 44, 148], [1080, 4, 5, 161], 495_000, P),   // 92: 2560x1080p120
    t([3840, 1276, 88, 296], [2160, 8, 10, 72], 297_000, P),  // 93: 3840x2160p24
    t([3840, 1056, 88, 296], [2160, 8, 10, 72], 297_000, P),  // 94: 3840x2160p25
    t([3840, 176, 88, 296], [2160, 8, 10, 72], 297_000, P),   // 95: 3840x2160p30
    t([3840, 1056, 88, 296], [2160, 8, 10, 72], 594_000, P),  // 96: 3840x2160p50
    t([3840, 176, 88, 296], [2160, 8, 10, 72], 594_000, P),   // 97: 3840x2160p60
    t([4096, 1020, 88, 296], [2160, 8, 10, 72], 297_000, P),  // 98: 4096x2160p24
    t([4096, 968, 88, 128], [2160, 8, 10, 72], 297_000, P),   // 99: 4096x2160p25
    t([4096, 88, 88, 128], [2160, 8, 10, 72], 297_000, P),    // 100: 4096x2160p30
    t([4096, 968, 88, 128], [2160, 8, 10, 72], 594_000, P),   // 101: 4096x2160p50
    t([4096, 88, 88, 128], [2160, 8, 10, 72], 594_000, P),    // 102: 4096x2160p60
    t([3840, 1276, 88, 296], [2160, 8, 10, 72], 297_000, P),  // 103: 3840x2160p24 64:27
    t([3840, 1056, 88, 296], [2160, 8, 10, 72], 297_000, P),  // 104: 3840x2160p25 64:27
    t([3840, 176, 88, 296], [2160, 8, 10, 72], 297_000, P),   // 105: 3840x2160p30 64:27
    t([3840, 1056, 88, 296], [2160, 8, 10, 72], 594_000, P),  // 106: 3840x2160p50 64:27
    t([3840, 176, 88, 296], [2160, 8, 10, 72], 594_000, P),   // 107: 3840x2160p60 64:27
    t([1280, 960, 40, 220], [720, 5, 5, 20], 90_000, P),      // 108: 1280x720p48
    t([1280, 960, 40, 220], [720, 5, 5, 20], 90_000, P),      // 109: 1280x720p48 64:27
    t([1680, 810, 40, 220], [720, 5, 5, 20], 99_000, P),      // 110: 1680x720p48
    t([1920, 638, 44, 148], [1080, 4, 5, 36], 148_500, P),    // 111: 1920x1080p48
    t([1920, 638, 44, 148], [1080, 4, 5, 36], 148_500, P),    // 112: 1920x1080p48 64:27
    t([2560, 998, 44, 148], [1080, 4, 5, 11], 198_000, P),    // 113: 2560x1080p48
    t([3840, 1276, 88, 296], [2160, 8, 10, 72], 594_000, P),  // 114: 3840x2160p48
    t([4096, 1020, 88, 296], [2160, 8, 10, 72], 594_000, P),  // 115: 4096x2160p48
    t([3840, 1276, 88, 296], [2160, 8, 10, 72], 594_000, P),  // 116: 3840x2160p48 64:27
    t([3840, 1056, 88, 296], [2160, 8, 10, 72], 1_188_000, P), // 117: 3840x2160p100
    t([3840, 176, 88, 296], [2160, 8, 10, 72], 1_188_000, P),  // 118: 3840x2160p120
    t([3840, 1056, 88, 296], [2160, 8, 10, 72], 1_188_000, P), // 119: 3840x2160p100 64:27
    t([3840, 176, 88, 296], [2160, 8, 10, 72], 1_188_000, P),  // 120: 3840x2160p120 64:27
    t([5120, 1996, 88, 296], [2160, 8, 10, 22], 396_000, P),  // 121: 5120x2160p24
    t([5120, 1696, 88, 296], [2160, 8, 10, 22], 396_000, P),  // 122: 5120x2160p25
    t([5120, 664, 88, 128], [2160, 8, 10, 22], 396_000, P),   // 123: 5120x2160p30
    t([5120, 746, 88, 296], [2160, 8, 10, 297], 742_500, P),  // 124: 5120x2160p48
    t([5120, 1096, 88, 296], [2160, 8, 10, 72], 742_500, P),  // 125: 5120x2160p50
    t([5120, 164, 88, 128], [2160, 8, 10, 72], 742_500, P),   // 126: 5120x2160p60
    t([5120, 1096, 88, 296], [2160, 8, 10, 72], 1_485_000, P), // 127: 5120x2160p100
];

static CTA_VIC_193_219: [CanonicalTiming; 27] = [
    t([5120, 164, 88, 128], [2160, 8, 10, 72], 1_485_000, P),    // 193: 5120x2160p120
    t([7680, 2552, 176, 592], [4320, 16, 20, 144], 1_188_000, P), // 194: 7680x4320p24
    t([7680, 2352, 176, 592], [4320, 16, 20, 44], 1_188_000, P),  // 195: 7680x4320p25
    t([7680, 552, 176, 592], [4320, 16, 20, 44], 1_188_000, P),   // 196: 7680x4320p30
    t([7680, 2552, 176, 592], [4320, 16, 20, 144], 2_376_000, P), // 197: 7680x4320p48
    t([7680, 2352, 176, 592], [4320, 16, 20, 44], 2_376_000, P),  // 198: 7680x4320p50
    t([7680, 552, 176, 592], [4320, 16, 20, 44], 2_376_000, P),   // 199: 7680x4320p60
    t([7680, 2112, 176, 592], [4320, 16, 20, 144], 4_752_000, P), // 200: 7680x4320p100
    t([7680, 352, 176, 592], [4320, 16, 20, 144], 4_752_000, P),  // 201: 7680x4320p120
    t([7680, 2552, 176, 592], [4320, 16, 20, 144], 1_188_000, P), // 202: 7680x4320p24 64:27
    t([7680, 2352, 176, 592], [4320, 16, 20, 44], 1_188_000, P),  // 203: 7680x4320p25 64:27
    t([7680, 552, 176, 592], [4320, 16, 20, 44], 1_188_000, P),   // 204: 7680x4320p30 64:27
    t([7680, 2552, 176, 592], [4320, 16, 20, 144], 2_376_000, P), // 205: 7680x4320p48 64:27
    t([7680, 2352, 176, 592], [4320, 16, 20, 44], 2_376_000, P),  // 206: 7680x4320p50 64:27
    t([7680, 552, 176, 592], [4320, 16, 20, 44], 2_376_000, P),   // 207: 7680x4320p60 64:27
    t([7680, 2112, 176, 592], [4320, 16, 20, 144], 4_752_000, P), // 208: 7680x4320p100 64:27
    t([7680, 352, 176, 592], [4320, 16, 20, 144], 4_752_000, P),  // 209: 7680x4320p120 64:27
    t([10240, 1492, 176, 592], [4320, 16, 20, 594], 1_485_000, P), // 210: 10240x4320p24
    t([10240, 2492, 176, 592], [4320, 16, 20, 44], 1_485_000, P),  // 211: 10240x4320p25
    t([10240, 288, 176, 296], [4320, 16, 20, 144], 1_485_000, P),  // 212: 10240x4320p30
    t([10240, 1492, 176, 592], [4320, 16, 20, 594], 2_970_000, P), // 213: 10240x4320p48
    t([10240, 2492, 176, 592], [4320, 16, 20, 44], 2_970_000, P),  // 214: 10240x4320p50
    t([10240, 288, 176, 296], [4320, 16, 20, 144], 2_970_000, P),  // 215: 10240x4320p60
    t([10240, 2192, 176, 592], [4320, 16, 20, 144], 5_940_000, P), // 216: 10240x4320p100
    t([10240, 288, 176, 296], [4320, 16, 20, 144], 5_940_000, P),  // 217: 10240x4320p120
    t([4096, 800, 88, 296], [2160, 8, 10, 72], 1_188_000, P),      // 218: 4096x2160p100
    t([4096, 88, 88, 128], [2160, 8, 10, 72], 1_188_000, P),       // 219: 4096x2160p120
];
