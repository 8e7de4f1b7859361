//! atcs core: statement record model and the pure rules shared by the pipeline.
mod classify;
mod filename;
mod record;
mod reference;
mod target;

pub use classify::{Category, KeywordTable};
pub use filename::{inline_image_filename, remote_image_filename};
pub use record::{RecordDraft, StatementRecord};
pub use reference::{ImageReference, InlineImage, ReferenceError, INLINE_IMAGE_PREFIX};
pub use target::{OutputTarget, RECORD_FILENAME};
