/// CSSピクセル (96dpi) を PDF のポイント (72dpi) に換算する係数。
pub const PX_TO_PT: f64 = 72.0 / 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// 幅が高さより大きいときだけ横向き。正方形は縦向きになる。
    pub fn for_size(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// 1ページ分の用紙サイズ (px) と向き。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFormat {
    width_px: u32,
    height_px: u32,
    orientation: Orientation,
}

impl PageFormat {
    /// 向きに合わせて辺を入れ替える。横向きなら長辺が横、縦向きなら長辺が縦になる。
    pub fn new(width_px: u32, height_px: u32, orientation: Orientation) -> Self {
        let (long, short) = if width_px >= height_px {
            (width_px, height_px)
        } else {
            (height_px, width_px)
        };
        let (width_px, height_px) = match orientation {
            Orientation::Landscape => (long, short),
            Orientation::Portrait => (short, long),
        };
        Self {
            width_px,
            height_px,
            orientation,
        }
    }

    /// 画像の本来のサイズからページを決める。
    pub fn for_image(width_px: u32, height_px: u32) -> Self {
        Self::new(width_px, height_px, Orientation::for_size(width_px, height_px))
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }
    pub fn height_px(&self) -> u32 {
        self.height_px
    }
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
    pub fn width_pt(&self) -> f64 {
        self.width_px as f64 * PX_TO_PT
    }
    pub fn height_pt(&self) -> f64 {
        self.height_px as f64 * PX_TO_PT
    }
}
