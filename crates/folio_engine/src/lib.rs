//! Folio engine: folder collection, decoding and document emission.
mod collect;
mod config;
mod decode;
mod emit;
mod engine;
mod job;
mod persist;
mod pipeline;
mod tree;
mod types;

pub use collect::{
    check_root, collect_files, is_ignored, wildcard_match, CollectError, CollectOptions,
    ExtensionFilter, FileEntry, FileWalk,
};
pub use config::{parse_patterns, ConverterConfig, IgnorePreset, UnknownPreset};
pub use decode::{
    placeholder, DecodeError, DecodedContent, Decoder, FallbackEncoding, UnknownEncoding,
};
pub use emit::{
    create_emitter, separator_line, split_text_artifact, Cover, CsvEmitter, EmitError, Emitter,
    PdfEmitter, PdfLayout, TextArtifactError, TextEmitter,
};
pub use engine::{EngineEvents, EngineHandle};
pub use job::{ConversionJob, ValidationError};
pub use persist::{ensure_output_dir, persist_artifact, AtomicFileWriter, PersistError};
pub use pipeline::{
    convert, run_conversion, ChannelProgressSink, ConversionRequest, ConvertError, ProgressSink,
};
pub use tree::tree_lines;
pub use types::{
    EngineEvent, FailureKind, JobFailure, JobId, JobOutcome, JobProgress, OutputFormat,
    ParseFormatError,
};
