use chartarea_core::palette::{NO_VALUE, Palette};

/// One `key: value` line of a tooltip, as palette indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipEntry {
    key: i32,
    value: i32,
    stack_total: bool,
    dimension: bool,
}

impl TooltipEntry {
    pub fn new(key: i32, value: i32) -> Self {
        Self {
            key,
            value,
            stack_total: false,
            dimension: false,
        }
    }

    /// Restores an entry with all of its flags.
    pub fn from_parts(key: i32, value: i32, stack_total: bool, dimension: bool) -> Self {
        Self {
            key,
            value,
            stack_total,
            dimension,
        }
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_stack_total(&self) -> bool {
        self.stack_total
    }

    pub fn is_dimension(&self) -> bool {
        self.dimension
    }
}

/// Finished tooltip of an area.
///
/// Either a custom text (from a template) or a list of entries; stack total
/// entries always come last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    entries: Vec<TooltipEntry>,
    custom: i32,
}

impl Tooltip {
    pub fn new(entries: Vec<TooltipEntry>, custom: i32) -> Self {
        Self { entries, custom }
    }

    pub fn entries(&self) -> &[TooltipEntry] {
        &self.entries
    }

    /// Palette index of the custom text, or [`NO_VALUE`].
    pub fn custom(&self) -> i32 {
        self.custom
    }

    /// Renders the tooltip as display text.
    pub fn to_text(&self, palette: &Palette) -> String {
        if let Some(custom) = palette.get(self.custom) {
            return custom.to_string();
        }
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{}: {}",
                    palette.get(entry.key).unwrap_or_default(),
                    palette.get(entry.value).unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Tooltip under construction for one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipAccumulator {
    entries: Vec<TooltipEntry>,
    custom: Option<String>,
}

impl TooltipAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TooltipEntry] {
        &self.entries
    }

    pub fn custom(&self) -> Option<&str> {
        self.custom.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.custom.is_none()
    }

    pub fn push(&mut self, key: i32, value: i32) {
        self.entries.push(TooltipEntry::new(key, value));
    }

    pub fn push_dimension(&mut self, key: i32, value: i32) {
        self.entries
            .push(TooltipEntry::from_parts(key, value, false, true));
    }

    pub fn push_stack_total(&mut self, key: i32, value: i32) {
        self.entries
            .push(TooltipEntry::from_parts(key, value, true, false));
    }

    pub fn set_custom(&mut self, text: String) {
        self.custom = Some(text);
    }

    /// Appends the content of a sibling sharing this element's category.
    ///
    /// Dimension entries already present are dropped, and only one stack
    /// total per key survives.
    pub fn merge_sibling(&mut self, sibling: &TooltipAccumulator) {
        for entry in &sibling.entries {
            let duplicate = (entry.dimension || entry.stack_total)
                && self.entries.iter().any(|existing| {
                    existing.key == entry.key
                        && existing.stack_total == entry.stack_total
                        && (entry.stack_total || existing.value == entry.value)
                });
            if !duplicate {
                self.entries.push(*entry);
            }
        }
        match (&mut self.custom, &sibling.custom) {
            (Some(own), Some(other)) if own != other => {
                own.push('\n');
                own.push_str(other);
            }
            (None, Some(other)) => self.custom = Some(other.clone()),
            _ => {}
        }
    }

    /// Finishes the tooltip, moving stack totals to the end.
    ///
    /// Returns `None` when there is nothing to show.
    pub fn finish(self, palette: &mut Palette) -> Option<Tooltip> {
        if self.is_empty() {
            return None;
        }
        let (mut entries, totals): (Vec<_>, Vec<_>) = self
            .entries
            .into_iter()
            .partition(|entry| !entry.stack_total);
        entries.extend(totals);

        let custom = self
            .custom
            .as_deref()
            .map_or(NO_VALUE, |text| palette.put(text));
        Some(Tooltip::new(entries, custom))
    }
}
