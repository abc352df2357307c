pub mod ports;
pub mod import_use_case;
