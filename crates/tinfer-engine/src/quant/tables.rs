//! Codebook constants for the I-quant formats.
//!
//! IQ2/IQ3 store grid indices instead of raw quants; each grid entry
//! packs the absolute values of 4 (IQ3) or 8 (IQ2) weights, one per byte,
//! little-endian. Sign bits ride separately: IQ3_XXS and IQ2_S use 7-bit
//! sign codes expanded through `KSIGNS_IQ2XS` (the eighth bit is the
//! parity of the low seven), IQ3_S stores sign bytes directly.

/// Non-linear 4-bit levels for IQ4_NL / IQ4_XS.
pub const KVALUES_IQ4NL: [i8; 16] = [
    -127, -104, -83, -65, -49, -35, -22, -10, 1, 13, 25, 38, 53, 69, 89, 113,
];

/// FP4 magnitude levels for MXFP4 (sign in the high nibble half).
pub const FP4_TABLE: [f32; 16] = [
    0.0, 0.5, 1.0, 1.5, 2.0, 3.0, 4.0, 6.0, -0.0, -0.5, -1.0, -1.5, -2.0, -3.0, -4.0, -6.0,
];

/// Per-position masks used when expanding sign codes.
pub const KMASK_IQ2XS: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

/// 7-bit sign codes: bit 7 of each entry is the parity of bits 0..6.
pub const KSIGNS_IQ2XS: [u8; 128] = build_ksigns();

const fn build_ksigns() -> [u8; 128] {
    let mut table = [0u8; 128];
    let mut i = 0usize;
    while i < 128 {
        let parity = (i.count_ones() & 1) as u8;
        table[i] = i as u8 | (parity << 7);
        i += 1;
    }
    table
}

pub const IQ3XXS_GRID: [u32; 256] = [
    0x04040404, 0x0404040c, 0x04040414, 0x0404041c, 0x04040424, 0x04040c04, 0x04040c0c, 0x04040c14,
    0x04040c1c, 0x04040c24, 0x04041404, 0x0404140c, 0x04041414, 0x0404141c, 0x04041424, 0x04041c04,
    0x04041c0c, 0x04041c14, 0x04041c1c, 0x04042404, 0x0404240c, 0x04042414, 0x040c0404, 0x040c040c,
    0x040c0414, 0x040c041c, 0x040c0424, 0x040c0c04, 0x040c0c0c, 0x040c0c14, 0x040c0c1c, 0x040c0c24,
    0x040c1404, 0x040c140c, 0x040c1414, 0x040c141c, 0x040c1c04, 0x040c1c0c, 0x040c1c14, 0x040c1c1c,
    0x040c2404, 0x040c240c, 0x04140404, 0x0414040c, 0x04140414, 0x0414041c, 0x04140424, 0x04140c04,
    0x04140c0c, 0x04140c14, 0x04140c1c, 0x04141404, 0x0414140c, 0x04141414, 0x0414141c, 0x04141c04,
    0x04141c0c, 0x04141c14, 0x04142404, 0x041c0404, 0x041c040c, 0x041c0414, 0x041c041c, 0x041c0c04,
    0x041c0c0c, 0x041c0c14, 0x041c0c1c, 0x041c1404, 0x041c140c, 0x041c1414, 0x041c1c04, 0x041c1c0c,
    0x04240404, 0x0424040c, 0x04240414, 0x04240c04, 0x04240c0c, 0x04241404, 0x0c040404, 0x0c04040c,
    0x0c040414, 0x0c04041c, 0x0c040424, 0x0c040c04, 0x0c040c0c, 0x0c040c14, 0x0c040c1c, 0x0c040c24,
    0x0c041404, 0x0c04140c, 0x0c041414, 0x0c04141c, 0x0c041c04, 0x0c041c0c, 0x0c041c14, 0x0c041c1c,
    0x0c042404, 0x0c04240c, 0x0c0c0404, 0x0c0c040c, 0x0c0c0414, 0x0c0c041c, 0x0c0c0424, 0x0c0c0c04,
    0x0c0c0c0c, 0x0c0c0c14, 0x0c0c0c1c, 0x0c0c0c24, 0x0c0c1404, 0x0c0c140c, 0x0c0c1414, 0x0c0c141c,
    0x0c0c1c04, 0x0c0c1c0c, 0x0c0c1c14, 0x0c0c2404, 0x0c0c240c, 0x0c140404, 0x0c14040c, 0x0c140414,
    0x0c14041c, 0x0c140c04, 0x0c140c0c, 0x0c140c14, 0x0c140c1c, 0x0c141404, 0x0c14140c, 0x0c141414,
    0x0c14141c, 0x0c141c04, 0x0c141c0c, 0x0c141c14, 0x0c142404, 0x0c1c0404, 0x0c1c040c, 0x0c1c0414,
    0x0c1c041c, 0x0c1c0c04, 0x0c1c0c0c, 0x0c1c0c14, 0x0c1c1404, 0x0c1c140c, 0x0c1c1414, 0x0c1c1c04,
    0x0c240404, 0x0c24040c, 0x0c240c04, 0x0c240c0c, 0x0c241404, 0x14040404, 0x1404040c, 0x14040414,
    0x1404041c, 0x14040424, 0x14040c04, 0x14040c0c, 0x14040c14, 0x14040c1c, 0x14041404, 0x1404140c,
    0x14041414, 0x1404141c, 0x14041c04, 0x14041c0c, 0x14041c14, 0x14042404, 0x140c0404, 0x140c040c,
    0x140c0414, 0x140c041c, 0x140c0c04, 0x140c0c0c, 0x140c0c14, 0x140c0c1c, 0x140c1404, 0x140c140c,
    0x140c1414, 0x140c141c, 0x140c1c04, 0x140c1c0c, 0x140c1c14, 0x140c2404, 0x14140404, 0x1414040c,
    0x14140414, 0x1414041c, 0x14140c04, 0x14140c0c, 0x14140c14, 0x14140c1c, 0x14141404, 0x1414140c,
    0x14141414, 0x14141c04, 0x14141c0c, 0x141c0404, 0x141c040c, 0x141c0414, 0x141c0c04, 0x141c0c0c,
    0x141c0c14, 0x141c1404, 0x141c140c, 0x14240404, 0x1424040c, 0x14240c04, 0x1c040404, 0x1c04040c,
    0x1c040414, 0x1c04041c, 0x1c040c04, 0x1c040c0c, 0x1c040c14, 0x1c040c1c, 0x1c041404, 0x1c04140c,
    0x1c041414, 0x1c041c04, 0x1c041c0c, 0x1c0c0404, 0x1c0c040c, 0x1c0c0414, 0x1c0c041c, 0x1c0c0c04,
    0x1c0c0c0c, 0x1c0c0c14, 0x1c0c1404, 0x1c0c140c, 0x1c0c1414, 0x1c0c1c04, 0x1c140404, 0x1c14040c,
    0x1c140414, 0x1c140c04, 0x1c140c0c, 0x1c140c14, 0x1c141404, 0x1c14140c, 0x1c1c0404, 0x1c1c040c,
    0x1c1c0c04, 0x1c1c0c0c, 0x24040404, 0x2404040c, 0x24040414, 0x24040c04, 0x24040c0c, 0x24041404,
    0x240c0404, 0x240c040c, 0x240c0c04, 0x240c0c0c, 0x240c1404, 0x24140404, 0x2414040c, 0x24140c04,
];

pub const IQ3S_GRID: [u32; 512] = [
    0x01010101, 0x01010103, 0x01010105, 0x01010107, 0x01010109, 0x0101010b, 0x01010301, 0x01010303,
    0x01010305, 0x01010307, 0x01010309, 0x0101030b, 0x01010501, 0x01010503, 0x01010505, 0x01010507,
    0x01010509, 0x0101050b, 0x01010701, 0x01010703, 0x01010705, 0x01010707, 0x01010709, 0x01010901,
    0x01010903, 0x01010905, 0x01010907, 0x01010b01, 0x01010b03, 0x01010b05, 0x01030101, 0x01030103,
    0x01030105, 0x01030107, 0x01030109, 0x0103010b, 0x01030301, 0x01030303, 0x01030305, 0x01030307,
    0x01030309, 0x0103030b, 0x01030501, 0x01030503, 0x01030505, 0x01030507, 0x01030509, 0x0103050b,
    0x01030701, 0x01030703, 0x01030705, 0x01030707, 0x01030709, 0x01030901, 0x01030903, 0x01030905,
    0x01030907, 0x01030b01, 0x01030b03, 0x01030b05, 0x01050101, 0x01050103, 0x01050105, 0x01050107,
    0x01050109, 0x0105010b, 0x01050301, 0x01050303, 0x01050305, 0x01050307, 0x01050309, 0x0105030b,
    0x01050501, 0x01050503, 0x01050505, 0x01050507, 0x01050509, 0x01050701, 0x01050703, 0x01050705,
    0x01050707, 0x01050709, 0x01050901, 0x01050903, 0x01050905, 0x01050907, 0x01050b01, 0x01050b03,
    0x01070101, 0x01070103, 0x01070105, 0x01070107, 0x01070109, 0x01070301, 0x01070303, 0x01070305,
    0x01070307, 0x01070309, 0x01070501, 0x01070503, 0x01070505, 0x01070507, 0x01070509, 0x01070701,
    0x01070703, 0x01070705, 0x01070707, 0x01070901, 0x01070903, 0x01070905, 0x01090101, 0x01090103,
    0x01090105, 0x01090107, 0x01090301, 0x01090303, 0x01090305, 0x01090307, 0x01090501, 0x01090503,
    0x01090505, 0x01090507, 0x01090701, 0x01090703, 0x01090705, 0x01090901, 0x010b0101, 0x010b0103,
    0x010b0105, 0x010b0301, 0x010b0303, 0x010b0305, 0x010b0501, 0x010b0503, 0x03010101, 0x03010103,
    0x03010105, 0x03010107, 0x03010109, 0x0301010b, 0x03010301, 0x03010303, 0x03010305, 0x03010307,
    0x03010309, 0x0301030b, 0x03010501, 0x03010503, 0x03010505, 0x03010507, 0x03010509, 0x0301050b,
    0x03010701, 0x03010703, 0x03010705, 0x03010707, 0x03010709, 0x03010901, 0x03010903, 0x03010905,
    0x03010907, 0x03010b01, 0x03010b03, 0x03010b05, 0x03030101, 0x03030103, 0x03030105, 0x03030107,
    0x03030109, 0x0303010b, 0x03030301, 0x03030303, 0x03030305, 0x03030307, 0x03030309, 0x0303030b,
    0x03030501, 0x03030503, 0x03030505, 0x03030507, 0x03030509, 0x03030701, 0x03030703, 0x03030705,
    0x03030707, 0x03030709, 0x03030901, 0x03030903, 0x03030905, 0x03030907, 0x03030b01, 0x03030b03,
    0x03050101, 0x03050103, 0x03050105, 0x03050107, 0x03050109, 0x0305010b, 0x03050301, 0x03050303,
    0x03050305, 0x03050307, 0x03050309, 0x03050501, 0x03050503, 0x03050505, 0x03050507, 0x03050509,
    0x03050701, 0x03050703, 0x03050705, 0x03050707, 0x03050901, 0x03050903, 0x03050905, 0x03050b01,
    0x03070101, 0x03070103, 0x03070105, 0x03070107, 0x03070109, 0x03070301, 0x03070303, 0x03070305,
    0x03070307, 0x03070309, 0x03070501, 0x03070503, 0x03070505, 0x03070507, 0x03070701, 0x03070703,
    0x03070705, 0x03070707, 0x03070901, 0x03070903, 0x03090101, 0x03090103, 0x03090105, 0x03090107,
    0x03090301, 0x03090303, 0x03090305, 0x03090307, 0x03090501, 0x03090503, 0x03090505, 0x03090701,
    0x03090703, 0x030b0101, 0x030b0103, 0x030b0105, 0x030b0301, 0x030b0303, 0x030b0501, 0x030b0503,
    0x05010101, 0x05010103, 0x05010105, 0x05010107, 0x05010109, 0x0501010b, 0x05010301, 0x05010303,
    0x05010305, 0x05010307, 0x05010309, 0x0501030b, 0x05010501, 0x05010503, 0x05010505, 0x05010507,
    0x05010509, 0x05010701, 0x05010703, 0x05010705, 0x05010707, 0x05010709, 0x05010901, 0x05010903,
    0x05010905, 0x05010907, 0x05010b01, 0x05010b03, 0x05030101, 0x05030103, 0x05030105, 0x05030107,
    0x05030109, 0x0503010b, 0x05030301, 0x05030303, 0x05030305, 0x05030307, 0x05030309, 0x05030501,
    0x05030503, 0x05030505, 0x05030507, 0x05030509, 0x05030701, 0x05030703, 0x05030705, 0x05030707,
    0x05030901, 0x05030903, 0x05030905, 0x05030b01, 0x05050101, 0x05050103, 0x05050105, 0x05050107,
    0x05050109, 0x05050301, 0x05050303, 0x05050305, 0x05050307, 0x05050309, 0x05050501, 0x05050503,
    0x05050505, 0x05050507, 0x05050509, 0x05050701, 0x05050703, 0x05050705, 0x05050707, 0x05050901,
    0x05050903, 0x05050905, 0x05070101, 0x05070103, 0x05070105, 0x05070107, 0x05070109, 0x05070301,
    0x05070303, 0x05070305, 0x05070307, 0x05070501, 0x05070503, 0x05070505, 0x05070507, 0x05070701,
    0x05070703, 0x05070705, 0x05070901, 0x05070903, 0x05090101, 0x05090103, 0x05090105, 0x05090107,
    0x05090301, 0x05090303, 0x05090305, 0x05090501, 0x05090503, 0x05090505, 0x05090701, 0x05090703,
    0x050b0101, 0x050b0103, 0x050b0301, 0x050b0303, 0x07010101, 0x07010103, 0x07010105, 0x07010107,
    0x07010109, 0x07010301, 0x07010303, 0x07010305, 0x07010307, 0x07010309, 0x07010501, 0x07010503,
    0x07010505, 0x07010507, 0x07010509, 0x07010701, 0x07010703, 0x07010705, 0x07010707, 0x07010901,
    0x07010903, 0x07010905, 0x07030101, 0x07030103, 0x07030105, 0x07030107, 0x07030109, 0x07030301,
    0x07030303, 0x07030305, 0x07030307, 0x07030309, 0x07030501, 0x07030503, 0x07030505, 0x07030507,
    0x07030701, 0x07030703, 0x07030705, 0x07030707, 0x07030901, 0x07030903, 0x07050101, 0x07050103,
    0x07050105, 0x07050107, 0x07050109, 0x07050301, 0x07050303, 0x07050305, 0x07050307, 0x07050501,
    0x07050503, 0x07050505, 0x07050507, 0x07050701, 0x07050703, 0x07050705, 0x07050901, 0x07050903,
    0x07070101, 0x07070103, 0x07070105, 0x07070107, 0x07070301, 0x07070303, 0x07070305, 0x07070307,
    0x07070501, 0x07070503, 0x07070505, 0x07070701, 0x07070703, 0x07090101, 0x07090103, 0x07090105,
    0x07090301, 0x07090303, 0x07090501, 0x07090503, 0x09010101, 0x09010103, 0x09010105, 0x09010107,
    0x09010301, 0x09010303, 0x09010305, 0x09010307, 0x09010501, 0x09010503, 0x09010505, 0x09010507,
    0x09010701, 0x09010703, 0x09010705, 0x09010901, 0x09030101, 0x09030103, 0x09030105, 0x09030107,
    0x09030301, 0x09030303, 0x09030305, 0x09030307, 0x09030501, 0x09030503, 0x09030505, 0x09030701,
    0x09030703, 0x09050101, 0x09050103, 0x09050105, 0x09050107, 0x09050301, 0x09050303, 0x09050305,
    0x09050501, 0x09050503, 0x09050505, 0x09050701, 0x09050703, 0x09070101, 0x09070103, 0x09070105,
    0x09070301, 0x09070303, 0x09070501, 0x09070503, 0x09090101, 0x0b010101, 0x0b010103, 0x0b010105,
    0x0b010301, 0x0b010303, 0x0b010305, 0x0b010501, 0x0b010503, 0x0b030101, 0x0b030103, 0x0b030105,
    0x0b030301, 0x0b030303, 0x0b030501, 0x0b030503, 0x0b050101, 0x0b050103, 0x0b050301, 0x0b050303,
];

pub const IQ2S_GRID: [u64; 1024] = [
    0x0808080808080808, 0x0808080808080819, 0x080808080808082b, 0x0808080808081908,
    0x0808080808081919, 0x080808080808192b, 0x0808080808082b08, 0x0808080808082b19,
    0x0808080808082b2b, 0x0808080808190808, 0x0808080808190819, 0x080808080819082b,
    0x0808080808191908, 0x0808080808191919, 0x080808080819192b, 0x0808080808192b08,
    0x0808080808192b19, 0x08080808082b0808, 0x08080808082b0819, 0x08080808082b082b,
    0x08080808082b1908, 0x08080808082b1919, 0x08080808082b2b08, 0x0808080819080808,
    0x0808080819080819, 0x080808081908082b, 0x0808080819081908, 0x0808080819081919,
    0x080808081908192b, 0x0808080819082b08, 0x0808080819082b19, 0x0808080819190808,
    0x0808080819190819, 0x080808081919082b, 0x0808080819191908, 0x0808080819191919,
    0x080808081919192b, 0x0808080819192b08, 0x0808080819192b19, 0x08080808192b0808,
    0x08080808192b0819, 0x08080808192b1908, 0x08080808192b1919, 0x080808082b080808,
    0x080808082b080819, 0x080808082b08082b, 0x080808082b081908, 0x080808082b081919,
    0x080808082b082b08, 0x080808082b190808, 0x080808082b190819, 0x080808082b191908,
    0x080808082b191919, 0x080808082b2b0808, 0x0808081908080808, 0x0808081908080819,
    0x080808190808082b, 0x0808081908081908, 0x0808081908081919, 0x080808190808192b,
    0x0808081908082b08, 0x0808081908082b19, 0x0808081908190808, 0x0808081908190819,
    0x080808190819082b, 0x0808081908191908, 0x0808081908191919, 0x080808190819192b,
    0x0808081908192b08, 0x0808081908192b19, 0x08080819082b0808, 0x08080819082b0819,
    0x08080819082b1908, 0x08080819082b1919, 0x0808081919080808, 0x0808081919080819,
    0x080808191908082b, 0x0808081919081908, 0x0808081919081919, 0x080808191908192b,
    0x0808081919082b08, 0x0808081919082b19, 0x0808081919190808, 0x0808081919190819,
    0x080808191919082b, 0x0808081919191908, 0x0808081919191919, 0x0808081919192b08,
    0x08080819192b0808, 0x08080819192b0819, 0x08080819192b1908, 0x08080819192b1919,
    0x080808192b080808, 0x080808192b080819, 0x080808192b081908, 0x080808192b081919,
    0x080808192b190808, 0x080808192b190819, 0x080808192b191908, 0x080808192b191919,
    0x0808082b08080808, 0x0808082b08080819, 0x0808082b0808082b, 0x0808082b08081908,
    0x0808082b08081919, 0x0808082b08082b08, 0x0808082b08190808, 0x0808082b08190819,
    0x0808082b08191908, 0x0808082b08191919, 0x0808082b082b0808, 0x0808082b19080808,
    0x0808082b19080819, 0x0808082b19081908, 0x0808082b19081919, 0x0808082b19190808,
    0x0808082b19190819, 0x0808082b19191908, 0x0808082b19191919, 0x0808082b2b080808,
    0x0808190808080808, 0x0808190808080819, 0x080819080808082b, 0x0808190808081908,
    0x0808190808081919, 0x080819080808192b, 0x0808190808082b08, 0x0808190808082b19,
    0x0808190808190808, 0x0808190808190819, 0x080819080819082b, 0x0808190808191908,
    0x0808190808191919, 0x080819080819192b, 0x0808190808192b08, 0x0808190808192b19,
    0x08081908082b0808, 0x08081908082b0819, 0x08081908082b1908, 0x08081908082b1919,
    0x0808190819080808, 0x0808190819080819, 0x080819081908082b, 0x0808190819081908,
    0x0808190819081919, 0x080819081908192b, 0x0808190819082b08, 0x0808190819082b19,
    0x0808190819190808, 0x0808190819190819, 0x080819081919082b, 0x0808190819191908,
    0x0808190819191919, 0x0808190819192b08, 0x08081908192b0808, 0x08081908192b0819,
    0x08081908192b1908, 0x08081908192b1919, 0x080819082b080808, 0x080819082b080819,
    0x080819082b081908, 0x080819082b081919, 0x080819082b190808, 0x080819082b190819,
    0x080819082b191908, 0x080819082b191919, 0x0808191908080808, 0x0808191908080819,
    0x080819190808082b, 0x0808191908081908, 0x0808191908081919, 0x080819190808192b,
    0x0808191908082b08, 0x0808191908082b19, 0x0808191908190808, 0x0808191908190819,
    0x080819190819082b, 0x0808191908191908, 0x0808191908191919, 0x0808191908192b08,
    0x08081919082b0808, 0x08081919082b0819, 0x08081919082b1908, 0x08081919082b1919,
    0x0808191919080808, 0x0808191919080819, 0x080819191908082b, 0x0808191919081908,
    0x0808191919081919, 0x0808191919082b08, 0x0808191919190808, 0x0808191919190819,
    0x0808191919191908, 0x0808191919191919, 0x0808191919192b08, 0x08081919192b0808,
    0x08081919192b0819, 0x08081919192b1908, 0x080819192b080808, 0x080819192b080819,
    0x080819192b081908, 0x080819192b081919, 0x080819192b190808, 0x080819192b190819,
    0x080819192b191908, 0x0808192b08080808, 0x0808192b08080819, 0x0808192b08081908,
    0x0808192b08081919, 0x0808192b08190808, 0x0808192b08190819, 0x0808192b08191908,
    0x0808192b08191919, 0x0808192b19080808, 0x0808192b19080819, 0x0808192b19081908,
    0x0808192b19081919, 0x0808192b19190808, 0x0808192b19190819, 0x0808192b19191908,
    0x08082b0808080808, 0x08082b0808080819, 0x08082b080808082b, 0x08082b0808081908,
    0x08082b0808081919, 0x08082b0808082b08, 0x08082b0808190808, 0x08082b0808190819,
    0x08082b0808191908, 0x08082b0808191919, 0x08082b08082b0808, 0x08082b0819080808,
    0x08082b0819080819, 0x08082b0819081908, 0x08082b0819081919, 0x08082b0819190808,
    0x08082b0819190819, 0x08082b0819191908, 0x08082b0819191919, 0x08082b082b080808,
    0x08082b1908080808, 0x08082b1908080819, 0x08082b1908081908, 0x08082b1908081919,
    0x08082b1908190808, 0x08082b1908190819, 0x08082b1908191908, 0x08082b1908191919,
    0x08082b1919080808, 0x08082b1919080819, 0x08082b1919081908, 0x08082b1919081919,
    0x08082b1919190808, 0x08082b1919190819, 0x08082b1919191908, 0x08082b2b08080808,
    0x0819080808080808, 0x0819080808080819, 0x081908080808082b, 0x0819080808081908,
    0x0819080808081919, 0x081908080808192b, 0x0819080808082b08, 0x0819080808082b19,
    0x0819080808190808, 0x0819080808190819, 0x081908080819082b, 0x0819080808191908,
    0x0819080808191919, 0x081908080819192b, 0x0819080808192b08, 0x0819080808192b19,
    0x08190808082b0808, 0x08190808082b0819, 0x08190808082b1908, 0x08190808082b1919,
    0x0819080819080808, 0x0819080819080819, 0x081908081908082b, 0x0819080819081908,
    0x0819080819081919, 0x081908081908192b, 0x0819080819082b08, 0x0819080819082b19,
    0x0819080819190808, 0x0819080819190819, 0x081908081919082b, 0x0819080819191908,
    0x0819080819191919, 0x0819080819192b08, 0x08190808192b0808, 0x08190808192b0819,
    0x08190808192b1908, 0x08190808192b1919, 0x081908082b080808, 0x081908082b080819,
    0x081908082b081908, 0x081908082b081919, 0x081908082b190808, 0x081908082b190819,
    0x081908082b191908, 0x081908082b191919, 0x0819081908080808, 0x0819081908080819,
    0x081908190808082b, 0x0819081908081908, 0x0819081908081919, 0x081908190808192b,
    0x0819081908082b08, 0x0819081908082b19, 0x0819081908190808, 0x0819081908190819,
    0x081908190819082b, 0x0819081908191908, 0x0819081908191919, 0x0819081908192b08,
    0x08190819082b0808, 0x08190819082b0819, 0x08190819082b1908, 0x08190819082b1919,
    0x0819081919080808, 0x0819081919080819, 0x081908191908082b, 0x0819081919081908,
    0x0819081919081919, 0x0819081919082b08, 0x0819081919190808, 0x0819081919190819,
    0x0819081919191908, 0x0819081919191919, 0x0819081919192b08, 0x08190819192b0808,
    0x08190819192b0819, 0x08190819192b1908, 0x081908192b080808, 0x081908192b080819,
    0x081908192b081908, 0x081908192b081919, 0x081908192b190808, 0x081908192b190819,
    0x081908192b191908, 0x0819082b08080808, 0x0819082b08080819, 0x0819082b08081908,
    0x0819082b08081919, 0x0819082b08190808, 0x0819082b08190819, 0x0819082b08191908,
    0x0819082b08191919, 0x0819082b19080808, 0x0819082b19080819, 0x0819082b19081908,
    0x0819082b19081919, 0x0819082b19190808, 0x0819082b19190819, 0x0819082b19191908,
    0x0819190808080808, 0x0819190808080819, 0x081919080808082b, 0x0819190808081908,
    0x0819190808081919, 0x081919080808192b, 0x0819190808082b08, 0x0819190808082b19,
    0x0819190808190808, 0x0819190808190819, 0x081919080819082b, 0x0819190808191908,
    0x0819190808191919, 0x0819190808192b08, 0x08191908082b0808, 0x08191908082b0819,
    0x08191908082b1908, 0x08191908082b1919, 0x0819190819080808, 0x0819190819080819,
    0x081919081908082b, 0x0819190819081908, 0x0819190819081919, 0x0819190819082b08,
    0x0819190819190808, 0x0819190819190819, 0x0819190819191908, 0x0819190819191919,
    0x0819190819192b08, 0x08191908192b0808, 0x08191908192b0819, 0x08191908192b1908,
    0x081919082b080808, 0x081919082b080819, 0x081919082b081908, 0x081919082b081919,
    0x081919082b190808, 0x081919082b190819, 0x081919082b191908, 0x0819191908080808,
    0x0819191908080819, 0x081919190808082b, 0x0819191908081908, 0x0819191908081919,
    0x0819191908082b08, 0x0819191908082b19, 0x0819191908190808, 0x0819191908190819,
    0x0819191908191908, 0x0819191908191919, 0x0819191908192b08, 0x08191919082b0808,
    0x08191919082b0819, 0x08191919082b1908, 0x0819191919080808, 0x0819191919080819,
    0x0819191919081908, 0x0819191919081919, 0x0819191919082b08, 0x0819191919190808,
    0x0819191919190819, 0x0819191919191908, 0x0819191919191919, 0x08191919192b0808,
    0x081919192b080808, 0x081919192b080819, 0x081919192b081908, 0x081919192b190808,
    0x0819192b08080808, 0x0819192b08080819, 0x0819192b08081908, 0x0819192b08081919,
    0x0819192b08190808, 0x0819192b08190819, 0x0819192b08191908, 0x0819192b19080808,
    0x0819192b19080819, 0x0819192b19081908, 0x0819192b19190808, 0x08192b0808080808,
    0x08192b0808080819, 0x08192b0808081908, 0x08192b0808081919, 0x08192b0808190808,
    0x08192b0808190819, 0x08192b0808191908, 0x08192b0808191919, 0x08192b0819080808,
    0x08192b0819080819, 0x08192b0819081908, 0x08192b0819081919, 0x08192b0819190808,
    0x08192b0819190819, 0x08192b0819191908, 0x08192b1908080808, 0x08192b1908080819,
    0x08192b1908081908, 0x08192b1908081919, 0x08192b1908190808, 0x08192b1908190819,
    0x08192b1908191908, 0x08192b1919080808, 0x08192b1919080819, 0x08192b1919081908,
    0x08192b1919190808, 0x082b080808080808, 0x082b080808080819, 0x082b08080808082b,
    0x082b080808081908, 0x082b080808081919, 0x082b080808082b08, 0x082b080808190808,
    0x082b080808190819, 0x082b080808191908, 0x082b080808191919, 0x082b0808082b0808,
    0x082b080819080808, 0x082b080819080819, 0x082b080819081908, 0x082b080819081919,
    0x082b080819190808, 0x082b080819190819, 0x082b080819191908, 0x082b080819191919,
    0x082b08082b080808, 0x082b081908080808, 0x082b081908080819, 0x082b081908081908,
    0x082b081908081919, 0x082b081908190808, 0x082b081908190819, 0x082b081908191908,
    0x082b081908191919, 0x082b081919080808, 0x082b081919080819, 0x082b081919081908,
    0x082b081919081919, 0x082b081919190808, 0x082b081919190819, 0x082b081919191908,
    0x082b082b08080808, 0x082b190808080808, 0x082b190808080819, 0x082b190808081908,
    0x082b190808081919, 0x082b190808190808, 0x082b190808190819, 0x082b190808191908,
    0x082b190808191919, 0x082b190819080808, 0x082b190819080819, 0x082b190819081908,
    0x082b190819081919, 0x082b190819190808, 0x082b190819190819, 0x082b190819191908,
    0x082b191908080808, 0x082b191908080819, 0x082b191908081908, 0x082b191908081919,
    0x082b191908190808, 0x082b191908190819, 0x082b191908191908, 0x082b191919080808,
    0x082b191919080819, 0x082b191919081908, 0x082b191919190808, 0x082b2b0808080808,
    0x1908080808080808, 0x1908080808080819, 0x190808080808082b, 0x1908080808081908,
    0x1908080808081919, 0x190808080808192b, 0x1908080808082b08, 0x1908080808082b19,
    0x1908080808190808, 0x1908080808190819, 0x190808080819082b, 0x1908080808191908,
    0x1908080808191919, 0x190808080819192b, 0x1908080808192b08, 0x1908080808192b19,
    0x19080808082b0808, 0x19080808082b0819, 0x19080808082b1908, 0x19080808082b1919,
    0x1908080819080808, 0x1908080819080819, 0x190808081908082b, 0x1908080819081908,
    0x1908080819081919, 0x190808081908192b, 0x1908080819082b08, 0x1908080819082b19,
    0x1908080819190808, 0x1908080819190819, 0x190808081919082b, 0x1908080819191908,
    0x1908080819191919, 0x1908080819192b08, 0x19080808192b0808, 0x19080808192b0819,
    0x19080808192b1908, 0x19080808192b1919, 0x190808082b080808, 0x190808082b080819,
    0x190808082b081908, 0x190808082b081919, 0x190808082b190808, 0x190808082b190819,
    0x190808082b191908, 0x190808082b191919, 0x1908081908080808, 0x1908081908080819,
    0x190808190808082b, 0x1908081908081908, 0x1908081908081919, 0x190808190808192b,
    0x1908081908082b08, 0x1908081908082b19, 0x1908081908190808, 0x1908081908190819,
    0x190808190819082b, 0x1908081908191908, 0x1908081908191919, 0x1908081908192b08,
    0x19080819082b0808, 0x19080819082b0819, 0x19080819082b1908, 0x19080819082b1919,
    0x1908081919080808, 0x1908081919080819, 0x190808191908082b, 0x1908081919081908,
    0x1908081919081919, 0x1908081919082b08, 0x1908081919190808, 0x1908081919190819,
    0x1908081919191908, 0x1908081919191919, 0x1908081919192b08, 0x19080819192b0808,
    0x19080819192b0819, 0x19080819192b1908, 0x190808192b080808, 0x190808192b080819,
    0x190808192b081908, 0x190808192b081919, 0x190808192b190808, 0x190808192b190819,
    0x190808192b191908, 0x1908082b08080808, 0x1908082b08080819, 0x1908082b08081908,
    0x1908082b08081919, 0x1908082b08190808, 0x1908082b08190819, 0x1908082b08191908,
    0x1908082b08191919, 0x1908082b19080808, 0x1908082b19080819, 0x1908082b19081908,
    0x1908082b19081919, 0x1908082b19190808, 0x1908082b19190819, 0x1908082b19191908,
    0x1908190808080808, 0x1908190808080819, 0x190819080808082b, 0x1908190808081908,
    0x1908190808081919, 0x190819080808192b, 0x1908190808082b08, 0x1908190808082b19,
    0x1908190808190808, 0x1908190808190819, 0x190819080819082b, 0x1908190808191908,
    0x1908190808191919, 0x1908190808192b08, 0x19081908082b0808, 0x19081908082b0819,
    0x19081908082b1908, 0x19081908082b1919, 0x1908190819080808, 0x1908190819080819,
    0x190819081908082b, 0x1908190819081908, 0x1908190819081919, 0x1908190819082b08,
    0x1908190819190808, 0x1908190819190819, 0x1908190819191908, 0x1908190819191919,
    0x1908190819192b08, 0x19081908192b0808, 0x19081908192b0819, 0x19081908192b1908,
    0x190819082b080808, 0x190819082b080819, 0x190819082b081908, 0x190819082b081919,
    0x190819082b190808, 0x190819082b190819, 0x190819082b191908, 0x1908191908080808,
    0x1908191908080819, 0x190819190808082b, 0x1908191908081908, 0x1908191908081919,
    0x1908191908082b08, 0x1908191908082b19, 0x1908191908190808, 0x1908191908190819,
    0x1908191908191908, 0x1908191908191919, 0x1908191908192b08, 0x19081919082b0808,
    0x19081919082b0819, 0x19081919082b1908, 0x1908191919080808, 0x1908191919080819,
    0x1908191919081908, 0x1908191919081919, 0x1908191919082b08, 0x1908191919190808,
    0x1908191919190819, 0x1908191919191908, 0x1908191919191919, 0x19081919192b0808,
    0x190819192b080808, 0x190819192b080819, 0x190819192b081908, 0x190819192b190808,
    0x1908192b08080808, 0x1908192b08080819, 0x1908192b08081908, 0x1908192b08081919,
    0x1908192b08190808, 0x1908192b08190819, 0x1908192b08191908, 0x1908192b19080808,
    0x1908192b19080819, 0x1908192b19081908, 0x1908192b19190808, 0x19082b0808080808,
    0x19082b0808080819, 0x19082b0808081908, 0x19082b0808081919, 0x19082b0808190808,
    0x19082b0808190819, 0x19082b0808191908, 0x19082b0808191919, 0x19082b0819080808,
    0x19082b0819080819, 0x19082b0819081908, 0x19082b0819081919, 0x19082b0819190808,
    0x19082b0819190819, 0x19082b0819191908, 0x19082b1908080808, 0x19082b1908080819,
    0x19082b1908081908, 0x19082b1908081919, 0x19082b1908190808, 0x19082b1908190819,
    0x19082b1908191908, 0x19082b1919080808, 0x19082b1919080819, 0x19082b1919081908,
    0x19082b1919190808, 0x1919080808080808, 0x1919080808080819, 0x191908080808082b,
    0x1919080808081908, 0x1919080808081919, 0x191908080808192b, 0x1919080808082b08,
    0x1919080808082b19, 0x1919080808190808, 0x1919080808190819, 0x191908080819082b,
    0x1919080808191908, 0x1919080808191919, 0x1919080808192b08, 0x19190808082b0808,
    0x19190808082b0819, 0x19190808082b1908, 0x19190808082b1919, 0x1919080819080808,
    0x1919080819080819, 0x191908081908082b, 0x1919080819081908, 0x1919080819081919,
    0x1919080819082b08, 0x1919080819190808, 0x1919080819190819, 0x1919080819191908,
    0x1919080819191919, 0x1919080819192b08, 0x19190808192b0808, 0x19190808192b0819,
    0x19190808192b1908, 0x191908082b080808, 0x191908082b080819, 0x191908082b081908,
    0x191908082b081919, 0x191908082b190808, 0x191908082b190819, 0x191908082b191908,
    0x1919081908080808, 0x1919081908080819, 0x191908190808082b, 0x1919081908081908,
    0x1919081908081919, 0x1919081908082b08, 0x1919081908082b19, 0x1919081908190808,
    0x1919081908190819, 0x1919081908191908, 0x1919081908191919, 0x1919081908192b08,
    0x19190819082b0808, 0x19190819082b0819, 0x19190819082b1908, 0x1919081919080808,
    0x1919081919080819, 0x1919081919081908, 0x1919081919081919, 0x1919081919082b08,
    0x1919081919190808, 0x1919081919190819, 0x1919081919191908, 0x1919081919191919,
    0x19190819192b0808, 0x191908192b080808, 0x191908192b080819, 0x191908192b081908,
    0x191908192b190808, 0x1919082b08080808, 0x1919082b08080819, 0x1919082b08081908,
    0x1919082b08081919, 0x1919082b08190808, 0x1919082b08190819, 0x1919082b08191908,
    0x1919082b19080808, 0x1919082b19080819, 0x1919082b19081908, 0x1919082b19190808,
    0x1919190808080808, 0x1919190808080819, 0x191919080808082b, 0x1919190808081908,
    0x1919190808081919, 0x1919190808082b08, 0x1919190808082b19, 0x1919190808190808,
    0x1919190808190819, 0x1919190808191908, 0x1919190808191919, 0x1919190808192b08,
    0x19191908082b0808, 0x19191908082b0819, 0x19191908082b1908, 0x1919190819080808,
    0x1919190819080819, 0x1919190819081908, 0x1919190819081919, 0x1919190819082b08,
    0x1919190819190808, 0x1919190819190819, 0x1919190819191908, 0x1919190819191919,
    0x19191908192b0808, 0x191919082b080808, 0x191919082b080819, 0x191919082b081908,
    0x191919082b190808, 0x1919191908080808, 0x1919191908080819, 0x1919191908081908,
    0x1919191908081919, 0x1919191908082b08, 0x1919191908190808, 0x1919191908190819,
    0x1919191908191908, 0x1919191908191919, 0x19191919082b0808, 0x1919191919080808,
    0x1919191919080819, 0x1919191919081908, 0x1919191919081919, 0x1919191919190808,
    0x1919191919190819, 0x1919191919191908, 0x191919192b080808, 0x1919192b08080808,
    0x1919192b08080819, 0x1919192b08081908, 0x1919192b08190808, 0x1919192b19080808,
    0x19192b0808080808, 0x19192b0808080819, 0x19192b0808081908, 0x19192b0808081919,
    0x19192b0808190808, 0x19192b0808190819, 0x19192b0808191908, 0x19192b0819080808,
    0x19192b0819080819, 0x19192b0819081908, 0x19192b0819190808, 0x19192b1908080808,
    0x19192b1908080819, 0x19192b1908081908, 0x19192b1908190808, 0x19192b1919080808,
    0x192b080808080808, 0x192b080808080819, 0x192b080808081908, 0x192b080808081919,
    0x192b080808190808, 0x192b080808190819, 0x192b080808191908, 0x192b080808191919,
    0x192b080819080808, 0x192b080819080819, 0x192b080819081908, 0x192b080819081919,
    0x192b080819190808, 0x192b080819190819, 0x192b080819191908, 0x192b081908080808,
    0x192b081908080819, 0x192b081908081908, 0x192b081908081919, 0x192b081908190808,
    0x192b081908190819, 0x192b081908191908, 0x192b081919080808, 0x192b081919080819,
    0x192b081919081908, 0x192b081919190808, 0x192b190808080808, 0x192b190808080819,
    0x192b190808081908, 0x192b190808081919, 0x192b190808190808, 0x192b190808190819,
    0x192b190808191908, 0x192b190819080808, 0x192b190819080819, 0x192b190819081908,
    0x192b190819190808, 0x192b191908080808, 0x192b191908080819, 0x192b191908081908,
    0x192b191908190808, 0x192b191919080808, 0x2b08080808080808, 0x2b08080808080819,
    0x2b0808080808082b, 0x2b08080808081908, 0x2b08080808081919, 0x2b08080808082b08,
    0x2b08080808190808, 0x2b08080808190819, 0x2b08080808191908, 0x2b08080808191919,
    0x2b080808082b0808, 0x2b08080819080808, 0x2b08080819080819, 0x2b08080819081908,
    0x2b08080819081919, 0x2b08080819190808, 0x2b08080819190819, 0x2b08080819191908,
    0x2b08080819191919, 0x2b0808082b080808, 0x2b08081908080808, 0x2b08081908080819,
    0x2b08081908081908, 0x2b08081908081919, 0x2b08081908190808, 0x2b08081908190819,
    0x2b08081908191908, 0x2b08081908191919, 0x2b08081919080808, 0x2b08081919080819,
    0x2b08081919081908, 0x2b08081919081919, 0x2b08081919190808, 0x2b08081919190819,
    0x2b08081919191908, 0x2b08082b08080808, 0x2b08190808080808, 0x2b08190808080819,
    0x2b08190808081908, 0x2b08190808081919, 0x2b08190808190808, 0x2b08190808190819,
    0x2b08190808191908, 0x2b08190808191919, 0x2b08190819080808, 0x2b08190819080819,
    0x2b08190819081908, 0x2b08190819081919, 0x2b08190819190808, 0x2b08190819190819,
    0x2b08190819191908, 0x2b08191908080808, 0x2b08191908080819, 0x2b08191908081908,
    0x2b08191908081919, 0x2b08191908190808, 0x2b08191908190819, 0x2b08191908191908,
    0x2b08191919080808, 0x2b08191919080819, 0x2b08191919081908, 0x2b08191919190808,
    0x2b082b0808080808, 0x2b19080808080808, 0x2b19080808080819, 0x2b19080808081908,
    0x2b19080808081919, 0x2b19080808190808, 0x2b19080808190819, 0x2b19080808191908,
    0x2b19080808191919, 0x2b19080819080808, 0x2b19080819080819, 0x2b19080819081908,
    0x2b19080819081919, 0x2b19080819190808, 0x2b19080819190819, 0x2b19080819191908,
    0x2b19081908080808, 0x2b19081908080819, 0x2b19081908081908, 0x2b19081908081919,
    0x2b19081908190808, 0x2b19081908190819, 0x2b19081908191908, 0x2b19081919080808,
    0x2b19081919080819, 0x2b19081919081908, 0x2b19081919190808, 0x2b19190808080808,
    0x2b19190808080819, 0x2b19190808081908, 0x2b19190808081919, 0x2b19190808190808,
    0x2b19190808190819, 0x2b19190808191908, 0x2b19190819080808, 0x2b19190819080819,
    0x2b19190819081908, 0x2b19190819190808, 0x2b19191908080808, 0x2b19191908080819,
    0x2b19191908081908, 0x2b19191908190808, 0x2b19191919080808, 0x2b2b080808080808,
];
