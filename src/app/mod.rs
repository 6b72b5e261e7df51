pub mod export;
pub mod html;
pub mod pipelines;
