//! Live updates for Docsmith.
//!
//! [`ContentWatcher`] turns filesystem activity under the content folders
//! into debounced [`ChangeEvent`]s; [`Dispatcher`] applies each batch to a
//! [`docsmith_core::Docsmith`] pipeline and publishes the new snapshot.
//!
//! ```no_run
//! # fn main() -> Result<(), docsmith_watch::WatchError> {
//! use std::path::Path;
//!
//! use docsmith_core::{ConfigFileNames, Docsmith, Extensions};
//! use docsmith_watch::{ContentWatcher, Dispatcher, WatchFilter};
//!
//! let root = Path::new(".");
//! let mut docsmith = Docsmith::builder().build()?;
//! docsmith.initialize(root)?;
//!
//! let filter = WatchFilter::new(
//!     docsmith.content_folders(root),
//!     Extensions::default(),
//!     ConfigFileNames::default(),
//! );
//! let (receiver, _handle) = ContentWatcher::new(filter).start()?;
//!
//! let mut dispatcher = Dispatcher::new(docsmith, root);
//! dispatcher.run(&receiver, |data| println!("{} documents", data.docs.len()));
//! # Ok(())
//! # }
//! ```

mod debouncer;
mod dispatcher;
mod error;
mod event;
mod watcher;

pub use dispatcher::{BatchOutcome, Dispatcher};
pub use error::WatchError;
pub use event::{ChangeEvent, ChangeKind, ChangeReceiver, WatchHandle};
pub use watcher::{ContentWatcher, WatchFilter};
