// Types layer - database entities and internal types
pub mod db;
pub mod internal;
