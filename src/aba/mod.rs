pub mod field;
mod codec;
mod reader;

pub use codec::{generate, validate_item, DirectEntryFile, FileOptions, FileSummary, LineEnding};
pub use field::TextPolicy;
pub use reader::{read_file, DetailRecord, FooterRecord, HeaderRecord, ParsedFile};

/// Every record in a Direct Entry file is exactly this many bytes
pub const LINE_WIDTH: usize = 120;

/// Transaction code for a credit to the named account
pub const CREDIT_CODE: &str = "53";

/// Transaction code for an externally initiated debit
pub const DEBIT_CODE: &str = "13";

/// Routing code carried by the file-total record
pub const FOOTER_ROUTING_CODE: &str = "999-999";

pub const HEADER_TYPE: char = '0';
pub const DETAIL_TYPE: char = '1';
pub const FOOTER_TYPE: char = '7';
