pub mod formatter;

pub use formatter::{
    format_assessment, format_level, format_regions, format_scenarios, format_score,
    format_session_stats, format_tsv, should_use_colors,
};
