pub mod kits;
