//! The live view session
//!
//! A [`Session`] owns everything the displayed year needs: the one live
//! [`YearDocument`], the twelve cached month matrices, the derived pills, and the
//! interaction state (brush, drag flag, last-picked day). Every mutation goes through
//! it, which is what keeps the "no empty day entries" invariant intact and the save
//! queue fed. Nothing here talks to a rendering backend: pointer and keyboard intents
//! come in as plain values, and whatever the session cannot do itself (open a dialog,
//! scroll a month into view) goes back to the host as a [`HostRequest`].

pub mod feedback;

use std::collections::HashMap;
use std::error::Error;

use chrono::{Datelike, NaiveDate};

use crate::day::DayKey;
use crate::document::YearDocument;
use crate::grid::{self, CalendarCell, GRID_COLS, GRID_ROWS};
use crate::mirror;
use crate::palette::PaletteItem;
use crate::pill::{compose_row, GridLayout, Pill, RowCell};
use crate::save_queue::SaveQueue;
use crate::store::YearStore;
use feedback::{Notice, NoticeSender};

/// Keys the view reacts to while it has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Char(char),
}

/// What the session asks the host to do next
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostRequest {
    /// Open the day-edit dialog for this day
    OpenEditor(DayKey),
    /// Scroll the given month (1..=12) into view
    ScrollToMonth(u32),
}

/// The values collected by the day-edit dialog
#[derive(Clone, Debug, Default)]
pub struct DayEditForm {
    /// The (possibly hand-edited) date field, `YYYY-MM-DD`
    pub date: String,
    /// The note text; blank clears the note
    pub note: String,
    /// The selected group color; `None` clears the color
    pub color: Option<String>,
}

pub struct Session {
    store: YearStore,
    queue: SaveQueue,
    doc: YearDocument,
    year: i32,
    layout: GridLayout,
    /// The 12 month matrices of the displayed year, rebuilt on year switch and when the
    /// weekday convention changes
    matrices: Vec<Vec<CalendarCell>>,
    /// Derived pills, keyed by (month 1..=12, week row 0..=5)
    pills: HashMap<(u32, usize), Vec<Pill>>,
    brush_enabled: bool,
    brush_color: String,
    dragging: bool,
    last_picked: Option<DayKey>,
    pending_scroll: Option<u32>,
    notices: Option<NoticeSender>,
}

impl Session {
    /// Open a session on `year`: load its document (or create a fresh one), regenerate
    /// the mirror, compose every pill.
    pub async fn open(store: YearStore, queue: SaveQueue, year: i32) -> Self {
        let doc = store.load(year).await;
        if let Err(err) = store.write_mirror(&doc).await {
            log::warn!("Unable to write the markdown mirror: {}", err);
        }
        let brush_color = doc.palette().first()
            .map(|item| item.color.clone())
            .unwrap_or_else(|| crate::palette::default_palette()[0].color.clone());

        let mut session = Self {
            store,
            queue,
            doc,
            year,
            layout: GridLayout::default(),
            matrices: Vec::new(),
            pills: HashMap::new(),
            brush_enabled: false,
            brush_color,
            dragging: false,
            last_picked: None,
            pending_scroll: None,
            notices: None,
        };
        session.rebuild_matrices();
        session.compose_all();
        session
    }

    /// Surface notices (rejections, confirmations) through this channel
    pub fn attach_notices(&mut self, sender: NoticeSender) {
        self.notices = Some(sender);
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn document(&self) -> &YearDocument {
        &self.doc
    }

    pub fn brush_enabled(&self) -> bool {
        self.brush_enabled
    }

    pub fn brush_color(&self) -> &str {
        &self.brush_color
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn last_picked(&self) -> Option<DayKey> {
        self.last_picked
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// The 42 cells of a month (1..=12), row-major
    pub fn month_matrix(&self, month: u32) -> &[CalendarCell] {
        month.checked_sub(1)
            .and_then(|index| self.matrices.get(index as usize))
            .map(|matrix| matrix.as_slice())
            .unwrap_or(&[])
    }

    /// The pills of one week row of one month
    pub fn pills_for(&self, month: u32, row: usize) -> &[Pill] {
        self.pills.get(&(month, row))
            .map(|pills| pills.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == grid::today()
    }

    /// The month the host should scroll to after a cross-year navigation, if any.
    /// Draining is the host's acknowledgement.
    pub fn take_pending_scroll(&mut self) -> Option<u32> {
        self.pending_scroll.take()
    }

    /* ---- year navigation ---- */

    /// Display another year: the in-memory document is discarded and the target year's
    /// document loaded (or created). There is no multi-year cache.
    pub async fn set_year(&mut self, year: i32) {
        self.year = year;
        self.doc = self.store.load(year).await;
        self.rebuild_matrices();
        self.compose_all();
    }

    pub async fn next_year(&mut self) {
        self.set_year(self.year + 1).await;
    }

    pub async fn prev_year(&mut self) {
        self.set_year(self.year - 1).await;
    }

    /// The jump-to-year prompt. Anything that does not parse as an integer in
    /// `1..=9999` is rejected with a notice and changes nothing.
    pub async fn goto_year(&mut self, input: &str) {
        match input.trim().parse::<i32>() {
            Ok(year) if (1..=9999).contains(&year) => self.set_year(year).await,
            _ => self.notify(Notice::BadYear(input.to_string())),
        }
    }

    /* ---- brush ---- */

    pub fn toggle_brush(&mut self) {
        self.brush_enabled = !self.brush_enabled;
        self.notify(Notice::Brush { enabled: self.brush_enabled });
    }

    /// Select the brush color (clicking a palette swatch)
    pub fn set_brush_color<C: Into<String>>(&mut self, color: C) {
        self.brush_color = color.into();
    }

    /* ---- pointer surface ---- */

    /// Left button pressed on an in-month day. Starts a paint-drag when the brush is on.
    pub fn pointer_down(&mut self, day: DayKey) {
        if self.brush_enabled {
            self.dragging = true;
            self.paint(day);
        }
    }

    /// The pointer moved onto an in-month day
    pub fn pointer_enter(&mut self, day: DayKey) {
        self.last_picked = Some(day);
        if self.dragging && self.brush_enabled {
            self.paint(day);
        }
    }

    /// The pointer was released, wherever that happened. Always clears the drag flag,
    /// so a release outside any day cell cannot leave it stuck.
    pub fn pointer_released(&mut self) {
        self.dragging = false;
    }

    /// A completed click on a cell.
    ///
    /// Out-of-month cells navigate to the month they belong to. On in-month cells,
    /// alt-click clears the day immediately; a plain click with the brush off asks the
    /// host to open the edit dialog.
    pub async fn click(&mut self, cell: CalendarCell, alt: bool) -> Option<HostRequest> {
        if !cell.in_month {
            return self.jump_to_month_of(cell.date).await;
        }
        let day = DayKey::from(cell.date);
        self.last_picked = Some(day);
        if alt {
            if self.doc.clear_day(day) {
                self.after_day_mutation(day);
            }
            return None;
        }
        if !self.brush_enabled {
            return Some(HostRequest::OpenEditor(day));
        }
        None
    }

    /// Right click: the edit dialog, for in-month cells
    pub fn context_menu(&mut self, cell: CalendarCell) -> Option<HostRequest> {
        if !cell.in_month {
            return None;
        }
        let day = DayKey::from(cell.date);
        self.last_picked = Some(day);
        Some(HostRequest::OpenEditor(day))
    }

    /* ---- keyboard surface ---- */

    pub async fn handle_key(&mut self, key: Key) -> Option<HostRequest> {
        match key {
            Key::ArrowLeft => {
                self.prev_year().await;
                None
            }
            Key::ArrowRight => {
                self.next_year().await;
                None
            }
            Key::Char(c) if c.eq_ignore_ascii_case(&'b') => {
                self.toggle_brush();
                None
            }
            Key::Char(c) if c.eq_ignore_ascii_case(&'n') => {
                Some(HostRequest::OpenEditor(self.editor_target()))
            }
            Key::Char(_) => None,
        }
    }

    /* ---- day edits ---- */

    /// The day the edit dialog opens on when none was explicitly chosen: the last
    /// picked day, else today, re-anchored into the displayed year if needed
    pub fn editor_target(&self) -> DayKey {
        let day = self.last_picked.unwrap_or_else(|| DayKey::from(grid::today()));
        if day.year() == self.year {
            day
        } else {
            day.with_year(self.year)
        }
    }

    /// Apply the values collected by the edit dialog. A date that does not parse is
    /// rejected with a notice and nothing is mutated.
    pub fn apply_day_edit(&mut self, form: &DayEditForm) {
        let day: DayKey = match form.date.parse() {
            Ok(day) => day,
            Err(_) => {
                self.notify(Notice::BadDate(form.date.clone()));
                return;
            }
        };
        self.doc.set_day_note(day, Some(form.note.clone()));
        self.doc.set_day_color(day, form.color.clone());
        self.last_picked = Some(day);
        self.after_day_mutation(day);
    }

    /// The edit dialog's "clear note" button
    pub fn clear_day_note(&mut self, day: DayKey) {
        self.doc.set_day_note(day, None);
        self.last_picked = Some(day);
        self.after_day_mutation(day);
    }

    /// The edit dialog's "clear color" button
    pub fn clear_day_color(&mut self, day: DayKey) {
        self.doc.set_day_color(day, None);
        self.last_picked = Some(day);
        self.after_day_mutation(day);
    }

    /* ---- groups ---- */

    /// Apply the group-settings dialog: replace the palette, bulk-recoloring the days
    /// whose group color changed, then save once.
    pub fn replace_palette(&mut self, items: Vec<PaletteItem>) {
        let recolored = self.doc.replace_palette(items);
        if recolored > 0 {
            log::info!("Group recoloring touched {} days", recolored);
        }
        self.compose_all();
        self.queue.save(&self.doc);
    }

    /* ---- mirror refresh ---- */

    /// Pull hand-made edits back out of the markdown mirror (the explicit refresh
    /// action; the mirror is never watched).
    ///
    /// A missing note or invalid content is a notice and leaves the document untouched.
    /// A document for another year switches the displayed year instead of being applied
    /// here.
    pub async fn refresh_from_markdown(&mut self) {
        let path = self.store.mirror_path_for(self.year);
        if !self.store.vault().exists(&path).await {
            self.notify(Notice::MirrorMissing(path));
            return;
        }
        let text = match self.store.vault().read(&path).await {
            Ok(text) => text,
            Err(err) => {
                self.notify(Notice::MirrorInvalid(err.to_string()));
                return;
            }
        };
        let doc = match mirror::from_markdown(&text) {
            Ok(doc) => doc,
            Err(err) => {
                self.notify(Notice::MirrorInvalid(err.to_string()));
                return;
            }
        };
        if doc.year() != self.year {
            self.set_year(doc.year()).await;
            return;
        }
        self.doc = doc;
        self.rebuild_matrices();
        self.compose_all();
        self.queue.save(&self.doc);
        self.notify(Notice::RefreshedFromMirror);
    }

    /* ---- layout ---- */

    /// The resize path: a new layout invalidates every pixel span
    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
        self.compose_all();
    }

    /// Wait until everything enqueued so far is persisted (hosts call this when the
    /// view closes)
    pub async fn flush(&self) -> Result<(), Box<dyn Error>> {
        self.queue.flush().await
    }

    /* ---- internals ---- */

    fn notify(&self, notice: Notice) {
        if let Some(sender) = &self.notices {
            let _ = sender.send(notice);
        }
    }

    fn paint(&mut self, day: DayKey) {
        self.last_picked = Some(day);
        // skip the no-op write when the day already has the brush color
        if self.doc.day(day).and_then(|entry| entry.color()) == Some(self.brush_color.as_str()) {
            return;
        }
        let color = self.brush_color.clone();
        self.doc.set_day_color(day, Some(color));
        self.after_day_mutation(day);
    }

    fn after_day_mutation(&mut self, day: DayKey) {
        self.compose_rows_containing(day);
        self.queue.save(&self.doc);
    }

    async fn jump_to_month_of(&mut self, date: NaiveDate) -> Option<HostRequest> {
        if date.year() == self.year {
            Some(HostRequest::ScrollToMonth(date.month()))
        } else {
            // switch years first; the host drains the scroll target once re-rendered
            self.pending_scroll = Some(date.month());
            self.set_year(date.year()).await;
            None
        }
    }

    fn rebuild_matrices(&mut self) {
        let first_day = self.doc.first_day_of_week();
        self.matrices = (1..=12)
            .map(|month| grid::build_month_matrix(self.year, month, first_day))
            .collect();
    }

    fn row_cells(&self, month: u32, row: usize) -> Vec<RowCell> {
        let matrix = self.month_matrix(month);
        if matrix.len() < (row + 1) * GRID_COLS {
            return Vec::new();
        }
        matrix[row * GRID_COLS..(row + 1) * GRID_COLS].iter()
            .map(|cell| {
                let entry = self.doc.day(DayKey::from(cell.date));
                RowCell {
                    in_month: cell.in_month,
                    color: entry.and_then(|e| e.color()).map(str::to_string),
                    note: entry.and_then(|e| e.note()).map(str::to_string),
                }
            })
            .collect()
    }

    /// Recompose every week row of every month
    fn compose_all(&mut self) {
        self.pills.clear();
        for month in 1..=12 {
            for row in 0..GRID_ROWS {
                let pills = compose_row(&self.row_cells(month, row), &self.layout);
                self.pills.insert((month, row), pills);
            }
        }
    }

    /// Recompose every week row (in any month) containing this day.
    ///
    /// A whole-row recomputation, not a delta: one edit can move a run's boundary or
    /// change which cell supplies its label anywhere in the row.
    fn compose_rows_containing(&mut self, day: DayKey) {
        let date = day.as_date();
        let mut touched = Vec::new();
        for (index, matrix) in self.matrices.iter().enumerate() {
            for row in 0..GRID_ROWS {
                let start = row * GRID_COLS;
                let end = start + GRID_COLS;
                if matrix.len() >= end && matrix[start..end].iter().any(|c| c.date == date) {
                    touched.push((index as u32 + 1, row));
                }
            }
        }
        let recomposed: Vec<_> = touched.into_iter()
            .map(|(month, row)| {
                let pills = compose_row(&self.row_cells(month, row), &self.layout);
                (month, row, pills)
            })
            .collect();
        for (month, row, pills) in recomposed {
            self.pills.insert((month, row), pills);
        }
    }
}
