pub mod explore;
pub mod financing;
