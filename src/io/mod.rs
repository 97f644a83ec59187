pub mod export;
pub mod output;
pub mod source;

pub use export::{export_file_name, monthly_csv, write_csv, CSV_HEADER};
pub use output::{create_writer, JsonWriter, OutputFormat, OutputWriter, Report, TerminalWriter};
pub use source::{DocumentSource, FileSource, MemorySource, ARTIST_DOCUMENT};
