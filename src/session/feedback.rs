//! User-facing notices emitted while interacting with the planner
//!
//! Hosts that want to surface them subscribe to a watch channel and render the latest
//! notice however they like (a toast, a status bar...).

use std::fmt::{Display, Error, Formatter};
use std::path::PathBuf;

/// Something the user should be told about
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Nothing has happened yet
    None,
    /// The brush was toggled
    Brush { enabled: bool },
    /// The jump-to-year prompt rejected its input
    BadYear(String),
    /// The edit dialog rejected a date that is not `YYYY-MM-DD`
    BadDate(String),
    /// The mirror note to refresh from does not exist
    MirrorMissing(PathBuf),
    /// The mirror note could not be read or holds no valid JSON block
    MirrorInvalid(String),
    /// The document was replaced with the mirror's content
    RefreshedFromMirror,
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Notice::None => write!(f, ""),
            Notice::Brush { enabled } => match enabled {
                true => write!(f, "Brush enabled"),
                false => write!(f, "Brush disabled"),
            },
            Notice::BadYear(input) => write!(f, "Bad year: {:?}", input),
            Notice::BadDate(input) => write!(f, "Bad date format: {:?}", input),
            Notice::MirrorMissing(path) => write!(f, "Markdown not found: {:?}", path),
            Notice::MirrorInvalid(err) => write!(f, "Invalid JSON inside markdown: {}", err),
            Notice::RefreshedFromMirror => write!(f, "Data refreshed from Markdown"),
        }
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::None
    }
}

/// See [`notice_channel`]
pub type NoticeSender = tokio::sync::watch::Sender<Notice>;
/// See [`notice_channel`]
pub type NoticeReceiver = tokio::sync::watch::Receiver<Notice>;

/// Create a notice channel, that can be used to surface session notices to the user
pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    tokio::sync::watch::channel(Notice::default())
}
