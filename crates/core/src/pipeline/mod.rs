pub mod infrastructure;
pub mod load_reference_use_case;
pub mod pipeline_logger;
pub mod run_directory;
pub mod scan_executor;
pub mod scan_report;
pub mod scan_video_use_case;
