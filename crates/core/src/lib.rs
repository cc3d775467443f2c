pub mod error;
pub mod extract;
pub mod fetch;
pub mod images;
pub mod locate;
pub mod merge;
pub mod normalize;
pub mod parse;
pub mod records;
pub mod segment;
pub mod slice;
pub mod store;
pub mod truncate;
pub mod updater;

pub use error::{Result, RetexoError};
pub use extract::{ExtractionResult, ExtractorConfig, extract_and_format, extract_from_html, format_for_republication};
pub use fetch::{FetchConfig, fetch_url};
pub use images::{
    DEFAULT_DESCRIPTION_PARAGRAPHS, ImageReference, ImageValidation, SeparatedContent, collect_images,
    separate_description_and_images, strip_text_keep_images, validate_images,
};
pub use locate::{ContentRegion, LocateConfig, locate};
pub use merge::{MergeConfig, merge_with_description};
pub use normalize::{NormalizeConfig, TransformOutcome, normalize};
pub use parse::Document;
pub use records::{StructuredRecord, extract_records, format_structured, looks_structured, render_records};
pub use segment::smart_paragraph_split;
pub use slice::slice_from;
pub use store::{PostIdentifier, RemotePost, StoreClient, StoreConfig};
pub use truncate::{BOILERPLATE_MARKERS, truncate};
pub use updater::{BATCH_DELAY, BatchReport, JobOutcome, JobSpec, PostInfo, Updater};
