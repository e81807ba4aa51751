pub mod donations;
pub mod ngos;
pub mod pages;
pub mod requirements;
pub mod stories;
