pub mod atlas;
pub mod blocks;
