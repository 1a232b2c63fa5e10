/// Line-level record parsing.
pub mod record_parsing;
