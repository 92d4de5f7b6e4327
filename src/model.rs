//! Data model shared by every stage of the pipeline (spec §3).
//!
//! Nothing in this module performs chunking; it only describes the shapes that
//! flow between stages. Chunks are produced once by a strategy and are immutable
//! after validation — later stages (overlap, enrichment, hierarchy) only ever
//! attach metadata, never rewrite `content` or the line span.

use serde::{Deserialize, Serialize};

/// A fenced code block. Never split during chunking when
/// `preserve_atomic_blocks` is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FencedBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub language: Option<String>,
    pub raw_content: String,
    pub fence_length: usize,
}

/// A pipe table, detected via a header row followed by a `|:-+-|` separator row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub start_line: usize,
    pub end_line: usize,
    pub column_count: usize,
    pub has_header: bool,
    pub raw_content: String,
}

/// An ATX or Setext header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub level: u8,
    pub text: String,
    pub start_line: usize,
}

/// Kind of list marker for a `ListBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Ordered,
    Unordered,
    Task,
}

/// A coarse-grained list span. Not atomic by default; may be split on item
/// boundaries when a strategy needs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub kind: ListKind,
    pub max_depth: usize,
}

/// Coarse classification of a chunk's dominant content (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Code,
    Table,
    List,
    Mixed,
    Header,
    Preamble,
    Section,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Table => "table",
            ContentType::List => "list",
            ContentType::Mixed => "mixed",
            ContentType::Header => "header",
            ContentType::Preamble => "preamble",
            ContentType::Section => "section",
        }
    }
}

/// Document-level content classification from spec §4.2. Distinct from
/// `ContentType`, which classifies a single chunk: this label summarizes the
/// whole document and drives the strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentContentType {
    CodeHeavy,
    Mixed,
    Structural,
    Text,
}

impl Default for DocumentContentType {
    fn default() -> Self {
        DocumentContentType::Text
    }
}

impl DocumentContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentContentType::CodeHeavy => "code_heavy",
            DocumentContentType::Mixed => "mixed",
            DocumentContentType::Structural => "structural",
            DocumentContentType::Text => "text",
        }
    }
}

/// The chunking algorithm that produced a chunk (spec §4.4, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    CodeAware,
    Structural,
    Fallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::CodeAware => "code_aware",
            Strategy::Structural => "structural",
            Strategy::Fallback => "fallback",
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code_aware" => Ok(Strategy::CodeAware),
            "structural" => Ok(Strategy::Structural),
            "fallback" => Ok(Strategy::Fallback),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// Why an oversize chunk was allowed to exceed `max_chunk_size` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversizeReason {
    CodeBlockIntegrity,
    TableIntegrity,
    SectionIntegrity,
}

impl OversizeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            OversizeReason::CodeBlockIntegrity => "code_block_integrity",
            OversizeReason::TableIntegrity => "table_integrity",
            OversizeReason::SectionIntegrity => "section_integrity",
        }
    }
}

/// The metadata map attached to every `Chunk`, covering every key enumerated in
/// spec §6. Fields are grouped by the stage that populates them; most are
/// `Option` because they are only meaningful once the relevant stage has run
/// (e.g. hierarchy fields stay `None` unless `chunk_hierarchical` was used).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    // --- core (strategies + enricher) ---
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub is_first_chunk: bool,
    pub is_last_chunk: bool,
    pub is_continuation: bool,
    pub content_type: ContentType,
    pub strategy: Strategy,
    pub start_line: usize,
    pub end_line: usize,

    // --- content statistics (enricher) ---
    pub word_count: usize,
    pub line_count: usize,
    pub char_count: usize,

    // --- structural (structural strategy) ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_headers: Vec<String>,

    // --- oversize (code-aware / structural) ---
    #[serde(default)]
    pub allow_oversize: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oversize_reason: Option<OversizeReason>,

    // --- overlap (overlap annotator) ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_size: Option<usize>,

    // --- hierarchy (hierarchy builder) ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_sibling_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_sibling_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy_level: Option<usize>,
    #[serde(default)]
    pub is_leaf: bool,
    #[serde(default)]
    pub is_root: bool,

    // --- adaptive sizing (enricher, opt-in) ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptive_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_complexity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_scale_factor: Option<f64>,
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Text
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Fallback
    }
}

/// The principal output entity (spec §3). `content` is the verbatim slice of
/// the input, trimmed of leading/trailing whitespace; `start_line`/`end_line`
/// are inclusive, 1-indexed positions in the original document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub size: usize,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(content: String, start_line: usize, end_line: usize, metadata: ChunkMetadata) -> Self {
        let size = content.chars().count();
        Self {
            content,
            start_line,
            end_line,
            size,
            metadata,
        }
    }
}

/// Aggregate statistics the content analyzer derives from a document (spec §3).
#[derive(Debug, Clone, Default)]
pub struct ContentAnalysis {
    pub total_chars: usize,
    pub total_lines: usize,
    pub total_words: usize,

    pub fenced_blocks: Vec<FencedBlock>,
    pub tables: Vec<Table>,
    pub headers: Vec<Header>,
    pub lists: Vec<ListBlock>,

    pub code_chars: usize,
    pub table_chars: usize,
    pub list_chars: usize,
    pub text_chars: usize,

    pub code_ratio: f64,
    pub table_ratio: f64,
    pub list_ratio: f64,
    pub text_ratio: f64,

    pub header_count: usize,
    pub max_header_depth: u8,
    pub nested_list_depth: usize,

    pub complexity_score: f64,
    pub content_type: DocumentContentType,

    /// Content before the first header, if any (may be empty).
    pub preamble: String,
    pub preamble_end_line: usize,
}

/// The full result of a `chunk_with_metrics` invocation (spec §3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingResult {
    pub chunks: Vec<Chunk>,
    pub strategy_used: Strategy,
    pub processing_time: std::time::Duration,
    pub total_chars: usize,
    pub total_lines: usize,
    pub content_type: DocumentContentType,
    pub complexity_score: f64,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Output of `chunk_hierarchical`: the flat chunk list plus an optional
/// synthetic root id (spec §4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchicalChunkingResult {
    pub chunks: Vec<Chunk>,
    pub root_id: Option<String>,
    pub strategy_used: Strategy,
    pub total_chars: usize,
    pub total_lines: usize,
}
