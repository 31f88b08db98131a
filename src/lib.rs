#[cfg(feature = "scan")]
pub use chia_cat_scan as scan;

#[cfg(feature = "tools")]
pub use chia_cat_tools as tools;
