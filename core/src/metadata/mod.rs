pub mod codec;

pub use codec::{MetadataCodec, METADATA_KEYWORD};
