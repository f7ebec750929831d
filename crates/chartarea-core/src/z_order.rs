//! Stacking hints for chart areas.
//!
//! Every area carries a [`ZOrder`] that tells a client which areas sit above
//! others when regions overlap (a legend drawn over the plot, a title strip
//! sharing an edge with an axis).
//!
//! # Example
//!
//! ```
//! # use chartarea_core::z_order::ZOrder;
//! assert!(ZOrder::Legend > ZOrder::Plot);
//! assert_eq!(ZOrder::from_u8(ZOrder::Axis.as_u8()), Some(ZOrder::Axis));
//! ```

/// Defines the stacking order of chart areas.
///
/// Areas are stacked from bottom to top in the order defined by variant
/// declaration. The `Ord` derive uses declaration order, so the first variant
/// is the bottom-most.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZOrder {
    /// The outer content area and corner fills
    #[default]
    Background,
    /// The plot surface
    Plot,
    /// Plotted data elements
    Element,
    /// Axis lines and labels
    Axis,
    /// Axis and chart titles
    Title,
    /// Legends drawn over the chart
    Legend,
}

impl ZOrder {
    const ALL: [Self; 6] = [
        Self::Background,
        Self::Plot,
        Self::Element,
        Self::Axis,
        Self::Title,
        Self::Legend,
    ];

    /// Returns a human-readable name for this z-order.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Plot => "plot",
            Self::Element => "element",
            Self::Axis => "axis",
            Self::Title => "title",
            Self::Legend => "legend",
        }
    }

    /// Returns the wire representation.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parses the wire representation.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }
}
