//! The per-year document: day entries, palette, weekday convention

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::day::{DayEntry, DayKey};
use crate::palette::{default_palette, LegacyPalettes, PaletteItem};

/// Which weekday the displayed weeks start on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstDayOfWeek {
    Mon,
    Sun,
}

impl Default for FirstDayOfWeek {
    fn default() -> Self {
        FirstDayOfWeek::Mon
    }
}

/// Everything the planner knows about one year.
///
/// This is the root aggregate of the persisted JSON resource. Exactly one instance is
/// live at a time, owned by the [`Session`](crate::session::Session) of the currently
/// displayed year; switching years discards it and loads another.
///
/// Deserialization accepts the legacy on-disk shapes (`"palettes"` with either bare
/// colors or labeled items, and a nested `"settings"` object) and folds them into the
/// canonical fields, so callers only ever see the canonical form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "DiskDocument")]
pub struct YearDocument {
    year: i32,
    days: BTreeMap<DayKey, DayEntry>,
    palette: Vec<PaletteItem>,
    #[serde(rename = "firstDayOfWeek")]
    first_day_of_week: FirstDayOfWeek,
}

impl YearDocument {
    /// Create the fresh default document a year gets when nothing is stored for it yet
    pub fn new(year: i32) -> Self {
        Self {
            year,
            days: BTreeMap::new(),
            palette: default_palette(),
            first_day_of_week: FirstDayOfWeek::default(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn days(&self) -> &BTreeMap<DayKey, DayEntry> {
        &self.days
    }

    pub fn day(&self, day: DayKey) -> Option<&DayEntry> {
        self.days.get(&day)
    }

    pub fn palette(&self) -> &[PaletteItem] {
        &self.palette
    }

    pub fn first_day_of_week(&self) -> FirstDayOfWeek {
        self.first_day_of_week
    }

    pub fn set_first_day_of_week(&mut self, first_day: FirstDayOfWeek) {
        self.first_day_of_week = first_day;
    }

    /// Set or clear the color of a day. The entry is deleted when it ends up carrying
    /// neither a color nor a note.
    pub fn set_day_color(&mut self, day: DayKey, color: Option<String>) {
        let entry = self.days.entry(day).or_insert_with(DayEntry::default);
        entry.set_color(color);
        self.prune(day);
    }

    /// Set or clear the note of a day. The note is trimmed; a blank note clears the
    /// field. The entry is deleted when it ends up carrying neither a color nor a note.
    pub fn set_day_note(&mut self, day: DayKey, note: Option<String>) {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let entry = self.days.entry(day).or_insert_with(DayEntry::default);
        entry.set_note(note);
        self.prune(day);
    }

    /// Remove both fields of a day at once. Returns whether an entry existed.
    pub fn clear_day(&mut self, day: DayKey) -> bool {
        self.days.remove(&day).is_some()
    }

    /// Recolor every day tagged `old` to `new`. Returns how many days were rewritten.
    pub fn rename_group_color(&mut self, old: &str, new: &str) -> usize {
        let mut renamed = 0;
        for entry in self.days.values_mut() {
            if entry.color() == Some(old) {
                entry.set_color(Some(new.to_string()));
                renamed += 1;
            }
        }
        renamed
    }

    /// Replace the whole palette (the "group settings" operation).
    ///
    /// Color changes are detected positionally against the current palette, and every
    /// affected day is recolored in one pass, so that swapping two group colors does not
    /// recolor the same day twice. Returns how many days were recolored.
    pub fn replace_palette(&mut self, items: Vec<PaletteItem>) -> usize {
        let mapping: HashMap<String, String> = self.palette.iter()
            .zip(items.iter())
            .filter(|(old, new)| old.color != new.color)
            .map(|(old, new)| (old.color.clone(), new.color.clone()))
            .collect();
        self.palette = items;

        if mapping.is_empty() {
            return 0;
        }
        let mut recolored = 0;
        for entry in self.days.values_mut() {
            if let Some(new) = entry.color().and_then(|c| mapping.get(c)) {
                entry.set_color(Some(new.clone()));
                recolored += 1;
            }
        }
        recolored
    }

    fn prune(&mut self, day: DayKey) {
        if self.days.get(&day).map(|e| e.is_empty()).unwrap_or(false) {
            self.days.remove(&day);
        }
    }
}


/// The raw on-disk shape, including the legacy fields. Folded into a canonical
/// [`YearDocument`] right after deserialization.
#[derive(Debug, Deserialize)]
struct DiskDocument {
    year: i32,
    #[serde(default)]
    days: BTreeMap<DayKey, DayEntry>,
    #[serde(default)]
    palette: Option<Vec<PaletteItem>>,
    #[serde(rename = "firstDayOfWeek", default)]
    first_day_of_week: Option<FirstDayOfWeek>,
    #[serde(rename = "palettes", default)]
    legacy_palettes: Option<LegacyPalettes>,
    #[serde(rename = "settings", default)]
    legacy_settings: Option<LegacySettings>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacySettings {
    #[serde(rename = "firstDayOfWeek", default)]
    first_day_of_week: Option<FirstDayOfWeek>,
}

impl From<DiskDocument> for YearDocument {
    fn from(disk: DiskDocument) -> Self {
        let year = disk.year;
        let disk_palette = disk.palette;
        let disk_first_day_of_week = disk.first_day_of_week;
        let legacy_settings = disk.legacy_settings;
        let legacy = disk.legacy_palettes.unwrap_or_default();

        let mut days = disk.days;
        days.retain(|_, entry| !entry.is_empty());

        let palette = if let Some(items) = disk_palette.filter(|v| !v.is_empty()) {
            items
        } else if let Some(items) = legacy.items.filter(|v| !v.is_empty()) {
            items
        } else if let Some(colors) = legacy.colors.filter(|v| !v.is_empty()) {
            colors.into_iter().map(|c| PaletteItem::new(c, "")).collect()
        } else {
            default_palette()
        };

        let first_day_of_week = disk_first_day_of_week
            .or_else(|| legacy_settings.and_then(|s| s.first_day_of_week))
            .unwrap_or_default();

        Self {
            year,
            days,
            palette,
            first_day_of_week,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn empty_entries_are_deleted() {
        let mut doc = YearDocument::new(2024);
        doc.set_day_color(key("2024-05-01"), Some("#000".into()));
        doc.set_day_note(key("2024-05-01"), Some("x".into()));
        assert_eq!(doc.days().len(), 1);

        doc.set_day_note(key("2024-05-01"), None);
        assert!(doc.day(key("2024-05-01")).is_some());

        doc.set_day_color(key("2024-05-01"), None);
        assert!(doc.day(key("2024-05-01")).is_none(), "no residual empty object");
    }

    #[test]
    fn blank_notes_count_as_no_note() {
        let mut doc = YearDocument::new(2024);
        doc.set_day_note(key("2024-05-01"), Some("   ".into()));
        assert!(doc.day(key("2024-05-01")).is_none());
    }

    #[test]
    fn clear_day_removes_everything() {
        let mut doc = YearDocument::new(2024);
        doc.set_day_color(key("2024-05-01"), Some("#000".into()));
        doc.set_day_note(key("2024-05-01"), Some("x".into()));
        assert!(doc.clear_day(key("2024-05-01")));
        assert!(doc.days().is_empty());
        assert!(!doc.clear_day(key("2024-05-01")));
    }

    #[test]
    fn renaming_a_group_recolors_only_its_days() {
        let mut doc = YearDocument::new(2024);
        doc.set_day_color(key("2024-01-01"), Some("#AAA".into()));
        doc.set_day_color(key("2024-01-02"), Some("#AAA".into()));
        doc.set_day_color(key("2024-01-03"), Some("#BBB".into()));

        assert_eq!(doc.rename_group_color("#AAA", "#CCC"), 2);
        assert_eq!(doc.day(key("2024-01-01")).unwrap().color(), Some("#CCC"));
        assert_eq!(doc.day(key("2024-01-02")).unwrap().color(), Some("#CCC"));
        assert_eq!(doc.day(key("2024-01-03")).unwrap().color(), Some("#BBB"));
    }

    #[test]
    fn palette_swap_does_not_recolor_twice() {
        let mut doc = YearDocument::new(2024);
        doc.replace_palette(vec![PaletteItem::new("#AAA", "a"), PaletteItem::new("#BBB", "b")]);
        doc.set_day_color(key("2024-01-01"), Some("#AAA".into()));
        doc.set_day_color(key("2024-01-02"), Some("#BBB".into()));

        // swap the two group colors
        let recolored = doc.replace_palette(vec![PaletteItem::new("#BBB", "a"), PaletteItem::new("#AAA", "b")]);
        assert_eq!(recolored, 2);
        assert_eq!(doc.day(key("2024-01-01")).unwrap().color(), Some("#BBB"));
        assert_eq!(doc.day(key("2024-01-02")).unwrap().color(), Some("#AAA"));
    }

    #[test]
    fn canonical_serde_shape() {
        let mut doc = YearDocument::new(2024);
        doc.set_day_color(key("2024-01-01"), Some("#FFB3BA".into()));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains(r#""firstDayOfWeek":"mon""#));
        assert!(json.contains(r#""palette":"#));

        let back: YearDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn legacy_colors_shape_is_normalized() {
        let json = r##"{"year": 2023, "days": {}, "palettes": {"colors": ["#111111", "#222222"]}}"##;
        let doc: YearDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.palette(), &[
            PaletteItem::new("#111111", ""),
            PaletteItem::new("#222222", ""),
        ]);
    }

    #[test]
    fn legacy_items_shape_is_normalized() {
        let json = r##"{"year": 2023,
                        "palettes": {"items": [{"color": "#333333", "label": "work"}]},
                        "settings": {"firstDayOfWeek": "sun"}}"##;
        let doc: YearDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.palette(), &[PaletteItem::new("#333333", "work")]);
        assert_eq!(doc.first_day_of_week(), FirstDayOfWeek::Sun);
    }

    #[test]
    fn missing_palette_defaults() {
        let doc: YearDocument = serde_json::from_str(r#"{"year": 2023}"#).unwrap();
        assert_eq!(doc.palette(), default_palette().as_slice());
        assert_eq!(doc.first_day_of_week(), FirstDayOfWeek::Mon);
    }

    #[test]
    fn hand_edited_empty_entries_are_pruned_on_load() {
        let json = r##"{"year": 2023, "days": {"2023-04-05": {}, "2023-04-06": {"note": "keep"}}}"##;
        let doc: YearDocument = serde_json::from_str(json).unwrap();
        assert!(doc.day(key("2023-04-05")).is_none());
        assert_eq!(doc.day(key("2023-04-06")).unwrap().note(), Some("keep"));
    }
}
