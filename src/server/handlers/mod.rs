pub mod items;
pub mod localities;
pub mod points;
