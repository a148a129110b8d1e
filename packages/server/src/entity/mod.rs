pub mod artist;
pub mod featured_painting;
pub mod painting;
pub mod site_setting;
