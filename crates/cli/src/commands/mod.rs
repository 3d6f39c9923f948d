pub mod account;
pub mod allow_list;
pub mod migrate;
pub mod seed;
