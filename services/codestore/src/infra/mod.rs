pub mod clock;
pub mod db;
pub mod generator;
pub mod memory;
