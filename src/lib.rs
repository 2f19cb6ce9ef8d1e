pub mod aba;
pub mod batch;
pub mod config;
pub mod error;

pub use aba::{generate, read_file, DirectEntryFile, FileOptions, LineEnding, ParsedFile, TextPolicy};
pub use batch::{bankable_items, PayeeBankProfile, PaymentBatch, PaymentItem};
pub use config::{Config, FileSettings, Originator};
pub use error::{AbaError, Result};
