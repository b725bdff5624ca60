mod helpers;
mod memory_test;
