pub mod sequential_scan_executor;
pub mod threaded_scan_executor;
