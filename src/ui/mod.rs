pub mod panels;
pub mod plot;
pub mod word_cloud;
