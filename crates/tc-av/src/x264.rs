//! x264 tuning tables for the encode presets.
//!
//! Each [`EncodePreset`] maps to a fixed set of x264 knobs passed through
//! `-x264-params`. Faster presets disable the analysis that costs the most
//! per frame.

use tc_core::EncodePreset;

/// `weightp` modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightP {
    None = 0,
    Simple = 1,
    Smart = 2,
}

/// `trellis` modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trellis {
    Off = 0,
    FinalMacroblock = 1,
    All = 2,
}

/// One preset's x264 settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X264Tuning {
    pub mbtree: bool,
    pub rc_lookahead: Option<u32>,
    pub me: &'static str,
    pub subme: u32,
    pub merange: u32,
    pub direct: &'static str,
    pub weightb: bool,
    pub weightp: WeightP,
    pub dct8x8: bool,
    pub partitions: &'static str,
    pub cabac: bool,
    pub b_pyramid: &'static str,
    pub mixed_refs: bool,
    pub chroma_me: bool,
    pub trellis: Trellis,
}

const FAST: X264Tuning = X264Tuning {
    mbtree: false,
    rc_lookahead: None,
    me: "dia",
    subme: 2,
    merange: 16,
    direct: "auto",
    weightb: false,
    weightp: WeightP::None,
    dct8x8: false,
    partitions: "none",
    cabac: false,
    b_pyramid: "none",
    mixed_refs: false,
    chroma_me: false,
    trellis: Trellis::Off,
};

const MEDIUM: X264Tuning = X264Tuning {
    mbtree: true,
    rc_lookahead: Some(40),
    me: "hex",
    subme: 6,
    weightb: true,
    weightp: WeightP::Smart,
    partitions: "p8x8,b8x8",
    ..FAST
};

const SLOW: X264Tuning = X264Tuning {
    me: "umh",
    subme: 9,
    merange: 24,
    dct8x8: true,
    partitions: "all",
    cabac: true,
    b_pyramid: "normal",
    mixed_refs: true,
    chroma_me: true,
    trellis: Trellis::FinalMacroblock,
    ..MEDIUM
};

impl X264Tuning {
    pub fn for_preset(preset: EncodePreset) -> &'static X264Tuning {
        match preset {
            EncodePreset::Fast => &FAST,
            EncodePreset::Medium => &MEDIUM,
            EncodePreset::Slow => &SLOW,
        }
    }

    /// Render as an `-x264-params` value (`key=value:key=value`).
    pub fn to_params(&self) -> String {
        let flag = |b: bool| if b { "1" } else { "0" };
        let mut params = vec![format!("mbtree={}", flag(self.mbtree))];
        if let Some(n) = self.rc_lookahead {
            params.push(format!("rc-lookahead={n}"));
        }
        params.extend([
            format!("me={}", self.me),
            format!("subme={}", self.subme),
            format!("merange={}", self.merange),
            format!("direct={}", self.direct),
            format!("weightb={}", flag(self.weightb)),
            format!("weightp={}", self.weightp as u8),
            format!("8x8dct={}", flag(self.dct8x8)),
            format!("partitions={}", self.partitions),
            format!("cabac={}", flag(self.cabac)),
            format!("b-pyramid={}", self.b_pyramid),
            format!("mixed-refs={}", flag(self.mixed_refs)),
            format!("chroma-me={}", flag(self.chroma_me)),
            format!("trellis={}", self.trellis as u8),
        ]);
        params.join(":")
    }
}
