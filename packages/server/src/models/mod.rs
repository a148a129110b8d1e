pub mod painting;
pub mod shared;
pub mod site;
