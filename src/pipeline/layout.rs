// Two docking zones side by side, each showing one of the two content blocks,
// plus the divider between them and the global theme.

use std::fmt;

use crate::shared::Change;

pub const MIN_ZONE_PX: u32 = 120;
pub const MAX_ZONE_PX: u32 = 1200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentBlock {
    PadBank,
    TrackList,
}

impl ContentBlock {
    // the content ids stored in the record
    pub fn id(self) -> &'static str {
        match self {
            ContentBlock::PadBank => "pad-container",
            ContentBlock::TrackList => "track-list",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "pad-container" => Some(ContentBlock::PadBank),
            "track-list" => Some(ContentBlock::TrackList),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            ContentBlock::PadBank => ContentBlock::TrackList,
            ContentBlock::TrackList => ContentBlock::PadBank,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ContentBlock::PadBank => "Pads",
            ContentBlock::TrackList => "Tracks",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    Left,
    Right,
}

impl Zone {
    pub fn other(self) -> Self {
        match self {
            Zone::Left => Zone::Right,
            Zone::Right => Zone::Left,
        }
    }
}

// zone width as a css flex shorthand, `grow shrink basis`.
// either a fixed px basis ("0 0 300px") or a grow share ("1 1 auto")
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlexWeight(pub String);

impl FlexWeight {
    pub fn fixed(px: u32) -> Self {
        FlexWeight(format!("0 0 {px}px"))
    }

    pub fn fill() -> Self {
        FlexWeight("1 1 auto".to_string())
    }

    // The flex-basis in px, when there is one. A bare `"300px"` counts too.
    pub fn basis_px(&self) -> Option<u32> {
        let basis = self.0.split_whitespace().last()?;
        let px = basis.strip_suffix("px")?.trim().parse::<f32>().ok()?;
        (px.is_finite() && px >= 0.0).then(|| px.round() as u32)
    }

    pub fn grow(&self) -> f32 {
        self.0
            .split_whitespace()
            .next()
            .and_then(|g| g.parse::<f32>().ok())
            .filter(|g| g.is_finite() && *g >= 0.0)
            .unwrap_or(1.0)
    }
}

impl fmt::Display for FlexWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeGesture {
    pub start_px: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub left: FlexWeight,
    pub right: FlexWeight,
    // the right zone always holds the other block, so both zones can never show the same one
    left_content: ContentBlock,
    resize: Option<ResizeGesture>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            left: FlexWeight::fixed(300),
            right: FlexWeight::fill(),
            left_content: ContentBlock::PadBank,
            resize: None,
        }
    }
}

impl Layout {
    pub fn content(&self, zone: Zone) -> ContentBlock {
        match zone {
            Zone::Left => self.left_content,
            Zone::Right => self.left_content.other(),
        }
    }

    pub fn zone_of(&self, block: ContentBlock) -> Zone {
        if self.left_content == block { Zone::Left } else { Zone::Right }
    }

    // Dropping a block onto the zone holding the other block swaps them.
    pub fn move_block(&mut self, block: ContentBlock, zone: Zone) -> Change {
        if self.zone_of(block) == zone {
            return Change::None;
        }
        self.left_content = self.left_content.other();
        log::debug!("{} moved to {:?}", block.id(), zone);
        Change::Persistent
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    pub fn begin_resize(&mut self) -> Change {
        if self.resize.is_some() {
            return Change::None;
        }
        self.resize = Some(ResizeGesture { start_px: self.left.basis_px() });
        Change::Transient
    }

    // Live divider movement. Only the end of the gesture gets saved.
    pub fn resize_to(&mut self, px: u32) -> Change {
        if self.resize.is_none() {
            return Change::None;
        }
        let px = px.clamp(MIN_ZONE_PX, MAX_ZONE_PX);
        let left = FlexWeight::fixed(px);
        if self.left == left && self.right == FlexWeight::fill() {
            return Change::None;
        }
        self.left = left;
        self.right = FlexWeight::fill();
        Change::Transient
    }

    pub fn end_resize(&mut self) -> Change {
        match self.resize.take() {
            Some(gesture) => {
                log::debug!("resize {:?} -> {}", gesture.start_px, self.left);
                Change::Persistent
            }
            None => Change::None,
        }
    }

    // the divider position a resize starts from
    pub fn divider_px(&self) -> u32 {
        self.left.basis_px().unwrap_or(MIN_ZONE_PX * 2)
    }
}

// The global look, cycled independently of the zones and stored under its own key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Default,
    Alt1,
    Alt2,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Default, Theme::Alt1, Theme::Alt2];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "layout-default",
            Theme::Alt1 => "layout-alt1",
            Theme::Alt2 => "layout-alt2",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Theme::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn next(self) -> Self {
        match self {
            Theme::Default => Theme::Alt1,
            Theme::Alt1 => Theme::Alt2,
            Theme::Alt2 => Theme::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_puts_pads_left() {
        let layout = Layout::default();
        assert_eq!(layout.content(Zone::Left), ContentBlock::PadBank);
        assert_eq!(layout.content(Zone::Right), ContentBlock::TrackList);
        assert_eq!(layout.left.0, "0 0 300px");
        assert_eq!(layout.right.0, "1 1 auto");
    }

    #[test]
    fn moving_onto_the_occupied_zone_swaps() {
        let mut layout = Layout::default();
        assert_eq!(layout.move_block(ContentBlock::PadBank, Zone::Right), Change::Persistent);
        assert_eq!(layout.content(Zone::Left), ContentBlock::TrackList);
        assert_eq!(layout.content(Zone::Right), ContentBlock::PadBank);
    }

    #[test]
    fn moving_into_its_own_zone_is_a_noop() {
        let mut layout = Layout::default();
        assert_eq!(layout.move_block(ContentBlock::TrackList, Zone::Right), Change::None);
        assert_eq!(layout.zone_of(ContentBlock::TrackList), Zone::Right);
    }

    #[test]
    fn resize_only_persists_when_the_gesture_ends() {
        let mut layout = Layout::default();
        assert_eq!(layout.resize_to(400), Change::None); // no gesture yet
        assert_eq!(layout.left.0, "0 0 300px");

        assert_eq!(layout.begin_resize(), Change::Transient);
        assert_eq!(layout.resize_to(410), Change::Transient);
        assert_eq!(layout.resize_to(420), Change::Transient);
        assert_eq!(layout.left.0, "0 0 420px");
        assert_eq!(layout.end_resize(), Change::Persistent);
        assert_eq!(layout.end_resize(), Change::None);
        assert!(!layout.is_resizing());
    }

    #[test]
    fn resize_clamps_the_divider() {
        let mut layout = Layout::default();
        layout.begin_resize();
        layout.resize_to(5);
        assert_eq!(layout.left.basis_px(), Some(MIN_ZONE_PX));
        layout.resize_to(100_000);
        assert_eq!(layout.left.basis_px(), Some(MAX_ZONE_PX));
    }

    #[test]
    fn flex_weights_parse() {
        assert_eq!(FlexWeight("0 0 300px".into()).basis_px(), Some(300));
        assert_eq!(FlexWeight("250.4px".into()).basis_px(), Some(250));
        assert_eq!(FlexWeight("1 1 auto".into()).basis_px(), None);
        assert_eq!(FlexWeight("2 1 auto".into()).grow(), 2.0);
        assert_eq!(FlexWeight("junk".into()).grow(), 1.0);
    }

    #[test]
    fn content_ids_round_trip() {
        for block in [ContentBlock::PadBank, ContentBlock::TrackList] {
            assert_eq!(ContentBlock::from_id(block.id()), Some(block));
        }
        assert_eq!(ContentBlock::from_id("sidebar"), None);
    }

    #[test]
    fn themes_cycle_and_wrap() {
        let mut theme = Theme::default();
        let seen: Vec<&str> = (0..4)
            .map(|_| {
                theme = theme.next();
                theme.name()
            })
            .collect();
        assert_eq!(seen, vec!["layout-alt1", "layout-alt2", "layout-default", "layout-alt1"]);
        assert_eq!(Theme::from_name("layout-alt2"), Some(Theme::Alt2));
        assert_eq!(Theme::from_name("layout-neon"), None);
    }
}
