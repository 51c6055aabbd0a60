//! Input loading

pub mod business_list;

pub use business_list::{load_business_list, read_business_list, write_sample_business_list};
