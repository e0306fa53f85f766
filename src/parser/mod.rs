//! DSTV/NC1 parser module.

mod blocks;
mod header;
mod nc1;
mod values;

pub use blocks::{is_tag_line, split_lines, tokenize_blocks, Block, Blocks, SplitLines};
pub use header::{find_grade, parse_header, parse_thickness};
pub use nc1::{parse_nc1, read_nc1_file};
pub use values::{classify_bore_line, extract_numbers, parse_bores, parse_curvature_points};
