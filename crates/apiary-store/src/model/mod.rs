pub mod boxes;
pub mod cell;
pub mod dav;
pub mod dependent;
pub mod event;
