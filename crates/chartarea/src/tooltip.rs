//! Tooltip and hyperlink resolution for plotted elements and labels.
//!
//! Tooltip text is never stored inline: keys and values are interned in the
//! chart's [`Palette`](chartarea_core::palette::Palette) and a [`Tooltip`]
//! only carries palette indices.

mod accumulator;
mod hyperlink;
mod resolver;
mod stack;
mod template;

pub use accumulator::{Tooltip, TooltipAccumulator, TooltipEntry};
pub use hyperlink::{HyperlinkRef, HyperlinkResolver};
pub use resolver::TooltipResolver;
pub use stack::stack_total;
pub use template::{PlaceholderStyle, TooltipTemplate};
