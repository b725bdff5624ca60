pub mod expiring_codes;
