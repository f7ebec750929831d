//! Byte layout of an encoded chart, shared by the encoder and the decoder.
//!
//! All integers and floats are big-endian. Strings only appear in the
//! palette; everywhere else text is referenced by its `i32` palette index,
//! `-1` meaning no value.
//!
//! # Stream
//!
//! ```text
//! magic      [u8; 4]   "CHTA"
//! version    u16
//! length     u32       byte length of everything that follows
//! palette    u32 count, then per string: u32 byte length, UTF-8 bytes
//! flags      u8        CHART_PARTIAL
//! root       u32 byte length, node
//! shapes     u32 count, then per point: u32 row, u32 col, u32 count, regions
//! tooltips   u32 count, then per point: u32 row, u32 col, i32 text
//! links      u32 count, then per link: u32 row, u32 col, u32 shape, hyperlink
//! ```
//!
//! # Node
//!
//! ```text
//! kind         u8 tag, followed by a u8 slot for axis, title and corner
//! z-order      u8
//! interaction  u16 bits
//! flags        u8        NODE_* bits
//! position     f64 x, f64 y
//! label        i32
//! field        i32
//! value        i32
//! row          u32       if NODE_HAS_ROW
//! col          u32       if NODE_HAS_COL
//! facet        u32       if NODE_HAS_FACET
//! regions      u32 count, regions
//! tooltip      if NODE_HAS_TOOLTIP: i32 custom, u32 count,
//!              then per entry: i32 key, i32 value, u8 ENTRY_* bits
//! hyperlinks   u32 count, hyperlinks
//! composition  u8 tag; sorted: u8 direction;
//!              grid: u8 columns, u8 rows, rect,
//!              then per cell: u32 count, u32 child indices
//! children     u32 count, then per child: u32 byte length, node
//! ```
//!
//! # Region
//!
//! ```text
//! rect       u8 0, rect
//! polygon    u8 1, f64 scale, u32 count, then per point: i64 x, i64 y (scaled)
//! ellipse    u8 2, f64 cx, f64 cy, f64 rx, f64 ry
//! line       u8 3, f64 x1, f64 y1, f64 x2, f64 y2, f64 width
//! composite  u8 4, u32 count, then per part the polygon body without its tag
//! ```
//!
//! A `rect` is always four `f64`: x, y, width, height.
//!
//! # Hyperlink
//!
//! ```text
//! label i32, target i32, u32 count, then per parameter: i32 name, i32 value
//! ```

pub const MAGIC: [u8; 4] = *b"CHTA";
pub const VERSION: u16 = 1;

pub const CHART_PARTIAL: u8 = 0b0000_0001;

pub const NODE_LIGHT_WEIGHT: u8 = 0b0000_0001;
pub const NODE_HAS_ROW: u8 = 0b0000_0010;
pub const NODE_HAS_COL: u8 = 0b0000_0100;
pub const NODE_HAS_FACET: u8 = 0b0000_1000;
pub const NODE_HAS_TOOLTIP: u8 = 0b0001_0000;

pub const ENTRY_STACK_TOTAL: u8 = 0b0000_0001;
pub const ENTRY_DIMENSION: u8 = 0b0000_0010;

pub const REGION_RECT: u8 = 0;
pub const REGION_POLYGON: u8 = 1;
pub const REGION_ELLIPSE: u8 = 2;
pub const REGION_LINE: u8 = 3;
pub const REGION_COMPOSITE: u8 = 4;

pub const COMPOSITION_LEAF: u8 = 0;
pub const COMPOSITION_CONTAINER: u8 = 1;
pub const COMPOSITION_SORTED: u8 = 2;
pub const COMPOSITION_GRID: u8 = 3;
