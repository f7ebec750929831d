use bitflags::bitflags;

use chartarea_core::z_order::ZOrder;

use crate::scene::{AxisSlot, Corner, TitleSlot};

bitflags! {
    /// Interactions a client may offer on an area.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Interaction: u16 {
        /// Clicking selects the value behind the area.
        const SELECTABLE  = 0b0000_0001;
        /// Hovering shows a tooltip or highlight.
        const ROLLOVER    = 0b0000_0010;
        /// Fields may be dropped onto the area.
        const DROP_TARGET = 0b0000_0100;
        /// The area has a context menu.
        const MENU        = 0b0000_1000;
        /// The area opens one or more hyperlinks.
        const HYPERLINK   = 0b0001_0000;
        /// Dragging selects a range.
        const BRUSH       = 0b0010_0000;
    }
}

/// The closed set of area kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaKind {
    /// Root of the tree, covering the whole image.
    Content,
    Plot,
    /// A plotted data element.
    Element,
    Axis(AxisSlot),
    /// Axis instances bound to the same field or scale.
    AxisGroup,
    AxisLabel,
    AxisLine,
    Title(TitleSlot),
    LegendGroup,
    Legend,
    LegendTitle,
    LegendItem,
    Corner(Corner),
}

impl AreaKind {
    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Plot => "plot",
            Self::Element => "element",
            Self::Axis(_) => "axis",
            Self::AxisGroup => "axis_group",
            Self::AxisLabel => "axis_label",
            Self::AxisLine => "axis_line",
            Self::Title(_) => "title",
            Self::LegendGroup => "legend_group",
            Self::Legend => "legend",
            Self::LegendTitle => "legend_title",
            Self::LegendItem => "legend_item",
            Self::Corner(_) => "corner",
        }
    }

    /// Returns the wire discriminator.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Content => 0,
            Self::Plot => 1,
            Self::Element => 2,
            Self::Axis(_) => 3,
            Self::AxisGroup => 4,
            Self::AxisLabel => 5,
            Self::AxisLine => 6,
            Self::Title(_) => 7,
            Self::LegendGroup => 8,
            Self::Legend => 9,
            Self::LegendTitle => 10,
            Self::LegendItem => 11,
            Self::Corner(_) => 12,
        }
    }

    /// Returns the slot byte written after the tag, for slotted kinds.
    pub fn slot_byte(&self) -> Option<u8> {
        match self {
            Self::Axis(slot) => Some(slot.as_u8()),
            Self::Title(slot) => Some(slot.as_u8()),
            Self::Corner(corner) => Some(corner.as_u8()),
            _ => None,
        }
    }

    /// Returns true when the tag is followed by a slot byte.
    pub fn tag_has_slot(tag: u8) -> bool {
        matches!(tag, 3 | 7 | 12)
    }

    /// Rebuilds a kind from its tag and, for slotted kinds, its slot byte.
    pub fn from_tag(tag: u8, slot: Option<u8>) -> Option<Self> {
        let kind = match (tag, slot) {
            (0, None) => Self::Content,
            (1, None) => Self::Plot,
            (2, None) => Self::Element,
            (3, Some(slot)) => Self::Axis(AxisSlot::from_u8(slot)?),
            (4, None) => Self::AxisGroup,
            (5, None) => Self::AxisLabel,
            (6, None) => Self::AxisLine,
            (7, Some(slot)) => Self::Title(TitleSlot::from_u8(slot)?),
            (8, None) => Self::LegendGroup,
            (9, None) => Self::Legend,
            (10, None) => Self::LegendTitle,
            (11, None) => Self::LegendItem,
            (12, Some(slot)) => Self::Corner(Corner::from_u8(slot)?),
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the stacking hint areas of this kind start with.
    pub fn default_z_order(&self) -> ZOrder {
        match self {
            Self::Content | Self::Corner(_) => ZOrder::Background,
            Self::Plot => ZOrder::Plot,
            Self::Element => ZOrder::Element,
            Self::Axis(_) | Self::AxisGroup | Self::AxisLabel | Self::AxisLine => ZOrder::Axis,
            Self::Title(_) => ZOrder::Title,
            Self::LegendGroup | Self::Legend | Self::LegendTitle | Self::LegendItem => {
                ZOrder::Legend
            }
        }
    }

    /// Returns the interactions areas of this kind start with.
    pub fn default_interaction(&self) -> Interaction {
        match self {
            Self::Content | Self::AxisGroup | Self::LegendGroup | Self::Corner(_) => {
                Interaction::empty()
            }
            Self::Plot => Interaction::BRUSH | Interaction::DROP_TARGET,
            Self::Element | Self::AxisLabel => {
                Interaction::SELECTABLE | Interaction::ROLLOVER | Interaction::MENU
            }
            Self::Axis(_) | Self::Legend => Interaction::DROP_TARGET,
            Self::AxisLine => Interaction::BRUSH,
            Self::Title(_) => Interaction::DROP_TARGET | Interaction::MENU,
            Self::LegendTitle => Interaction::ROLLOVER | Interaction::MENU,
            Self::LegendItem => Interaction::SELECTABLE | Interaction::ROLLOVER,
        }
    }
}

/// Primary axis along which sorted children are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Horizontal),
            1 => Some(Self::Vertical),
            _ => None,
        }
    }
}
