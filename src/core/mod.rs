pub mod categorize;
pub mod duplicate;
pub mod image;
pub mod palette;
pub mod phash;
pub mod quality;
