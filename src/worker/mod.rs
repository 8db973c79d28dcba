pub mod scan_worker;

pub use scan_worker::ScanWorker;
