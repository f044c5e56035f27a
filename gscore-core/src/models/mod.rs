pub mod alignment;
pub mod feature;
pub mod interval;
pub mod strand;

// re-export for cleaner imports
pub use self::alignment::Alignment;
pub use self::feature::Feature;
pub use self::interval::GenomicInterval;
pub use self::strand::Strand;
