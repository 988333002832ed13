//! Well-known context keys of the analysis pipeline.

pub const EXTRACTED_FILES: &str = "extracted_files";
pub const RAW_DATA: &str = "raw_data";
pub const COMBINED_DATA: &str = "combined_data";
pub const SUMMARY_STATISTICS: &str = "summary_statistics";
pub const FIGURES: &str = "figures";
pub const OUTPUT_FILES: &str = "output_files";
